use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunTrace {
    pub schema_version: u32,
    pub command: String,
    pub input: String,
    pub started_at_unix_ms: Option<u128>,
    pub elapsed_ms: Option<u128>,
    pub extra: serde_json::Value,
}

fn diagnostics_dir() -> Option<PathBuf> {
    std::env::var("CALL_TRACE_DIAGNOSTICS_DIR")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Best-effort run trace for debugging; never affects the run's outcome.
pub fn maybe_write_run_trace(
    command: &str,
    input: &Path,
    started_at: Option<Instant>,
    extra: serde_json::Value,
) {
    let Some(dir) = diagnostics_dir() else {
        return;
    };
    let _ = std::fs::create_dir_all(&dir);
    let trace_path = dir.join("run_trace.json");

    let started_at_unix_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis());
    let elapsed_ms = started_at.map(|t| t.elapsed().as_millis());

    let trace = RunTrace {
        schema_version: 1,
        command: command.to_string(),
        input: input.to_string_lossy().to_string(),
        started_at_unix_ms,
        elapsed_ms,
        extra,
    };

    if let Ok(file) = std::fs::File::create(trace_path) {
        let _ = serde_json::to_writer_pretty(file, &trace);
    }
}
