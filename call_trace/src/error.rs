use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CallTraceError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported syntax at {line}:{column}: {message}")]
    UnsupportedSyntax {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("return statement at {line}:{column} has no containing function")]
    ContainingFunctionNotFound { line: u32, column: u32 },

    #[error("malformed trace at event {cursor}: {message}")]
    MalformedTrace { cursor: usize, message: String },

    #[error("failed to read trace at {path}: {message}")]
    TraceParse { path: PathBuf, message: String },
}
