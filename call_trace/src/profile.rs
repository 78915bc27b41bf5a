mod builder;
mod schema;


pub use builder::build_profile;
pub use schema::{CpuProfile, CpuProfileNode, TraceCapture};
