pub mod args;
pub mod diagnostics;
pub mod error;
pub mod instrument;
pub mod profile;
pub mod run;

#[cfg(test)]
mod args_test;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
