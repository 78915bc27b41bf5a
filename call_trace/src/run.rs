use std::path::Path;
use std::time::Instant;

use serde_json::json;

use crate::args::{Cli, Command};
use crate::diagnostics;
use crate::error::CallTraceError;
use crate::instrument::{InstrumentOptions, instrument_source};
use crate::profile::{TraceCapture, build_profile};

pub fn run(cli: Cli) -> Result<(), CallTraceError> {
    let started = Instant::now();
    match &cli.command {
        Command::Instrument { file, time, output } => {
            let source = read_file(file)?;
            let instrumented =
                instrument_source(file, &source, InstrumentOptions { time: *time })?;
            write_output(output.as_deref(), &instrumented)?;
            diagnostics::maybe_write_run_trace(
                "instrument",
                file,
                Some(started),
                json!({ "time": time, "bytes_in": source.len() }),
            );
        }
        Command::Profile { trace, output } => {
            let raw = read_file(trace)?;
            let capture: TraceCapture =
                serde_json::from_str(&raw).map_err(|e| CallTraceError::TraceParse {
                    path: trace.clone(),
                    message: e.to_string(),
                })?;
            let profile = build_profile(&capture)?;
            let rendered =
                serde_json::to_string_pretty(&profile).map_err(|e| CallTraceError::TraceParse {
                    path: trace.clone(),
                    message: e.to_string(),
                })?;
            write_output(output.as_deref(), &rendered)?;
            diagnostics::maybe_write_run_trace(
                "profile",
                trace,
                Some(started),
                json!({ "events": capture.t.len(), "timed": capture.d.is_some() }),
            );
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, CallTraceError> {
    std::fs::read_to_string(path).map_err(|source| CallTraceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<(), CallTraceError> {
    match path {
        Some(path) => std::fs::write(path, contents).map_err(|source| CallTraceError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}
