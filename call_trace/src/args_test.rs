use clap::Parser;
use std::path::PathBuf;

use crate::args::{Cli, Command};

#[test]
fn instrument_accepts_time_and_output_flags() {
    let cli = Cli::try_parse_from([
        "call-trace",
        "instrument",
        "app.js",
        "--time",
        "-o",
        "app.instrumented.js",
    ])
    .expect("parse");

    match cli.command {
        Command::Instrument { file, time, output } => {
            assert_eq!(file, PathBuf::from("app.js"));
            assert!(time);
            assert_eq!(output, Some(PathBuf::from("app.instrumented.js")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn instrument_defaults_to_untimed_stdout() {
    let cli = Cli::try_parse_from(["call-trace", "instrument", "app.js"]).expect("parse");
    match cli.command {
        Command::Instrument { time, output, .. } => {
            assert!(!time);
            assert!(output.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn profile_takes_a_trace_path() {
    let cli = Cli::try_parse_from(["call-trace", "profile", "trace.json"]).expect("parse");
    match cli.command {
        Command::Profile { trace, output } => {
            assert_eq!(trace, PathBuf::from("trace.json"));
            assert!(output.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn missing_file_argument_is_rejected() {
    assert!(Cli::try_parse_from(["call-trace", "instrument"]).is_err());
}
