use std::path::Path;

use clap::Parser;

use call_trace::args::Cli;
use call_trace::instrument::{InstrumentOptions, instrument_source};
use call_trace::profile::{TraceCapture, build_profile};
use call_trace::run::run;

const PROGRAM: &str = "function a() {\n  b();\n  b();\n}\nfunction b() {\n}\na();\n";

#[test]
fn instrumented_program_carries_the_full_function_table() {
    let out = instrument_source(Path::new("app.js"), PROGRAM, InstrumentOptions::default())
        .expect("instrument");

    assert!(out.starts_with("var wɔk = {\n  file: \"app.js\",\n"));
    assert!(out.contains(r#"fns: ["","a_1_0","b_5_0"]"#));
    assert!(out.contains("wɔk.enter(1);"));
    assert!(out.contains("wɔk.enter(2);"));
    // The original call sites survive the rewrite.
    assert!(out.contains("b();\n  b();"));
    assert!(out.ends_with("a();\n"));
}

#[test]
fn reconstructed_tree_matches_the_executed_nesting() {
    // A trace consistent with PROGRAM's actual call structure: a() enters,
    // calls b() twice, exits.
    let capture = TraceCapture {
        file: "app.js".to_string(),
        fns: vec![
            String::new(),
            "a_1_0".to_string(),
            "b_5_0".to_string(),
        ],
        t: vec![1, 2, -2, 2, -2, -1],
        d: None,
    };

    let profile = build_profile(&capture).expect("build");
    assert_eq!(profile.head.children.len(), 1);

    let a = &profile.head.children[0];
    assert_eq!(a.function_name, "a");
    assert_eq!(a.hit_count, 1);
    assert_eq!(a.children.len(), 1);

    let b = &a.children[0];
    assert_eq!(b.function_name, "b");
    assert_eq!(b.hit_count, 2);
    assert!(b.children.is_empty());

    // One entry sample per enter event, fully consumed stream.
    assert_eq!(profile.samples, vec![2, 3, 3]);
}

#[test]
fn cli_instrument_writes_the_rewritten_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("app.js");
    let output = dir.path().join("app.instrumented.js");
    std::fs::write(&input, PROGRAM).expect("write input");

    let cli = Cli::try_parse_from([
        "call-trace",
        "instrument",
        input.to_str().expect("utf8 path"),
        "-o",
        output.to_str().expect("utf8 path"),
    ])
    .expect("parse");
    run(cli).expect("run");

    let written = std::fs::read_to_string(&output).expect("read output");
    assert!(written.contains("wɔk.enter(1);"));
    assert!(written.contains(r#"fns: ["","a_1_0","b_5_0"]"#));
}

#[test]
fn cli_profile_writes_a_cpuprofile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let trace_path = dir.path().join("trace.json");
    let profile_path = dir.path().join("trace.cpuprofile");

    let capture = TraceCapture {
        file: "app.js".to_string(),
        fns: vec![String::new(), "a_1_0".to_string()],
        t: vec![1, -1],
        d: Some(vec![10.0, 12.0]),
    };
    std::fs::write(
        &trace_path,
        serde_json::to_string(&capture).expect("serialize"),
    )
    .expect("write trace");

    let cli = Cli::try_parse_from([
        "call-trace",
        "profile",
        trace_path.to_str().expect("utf8 path"),
        "-o",
        profile_path.to_str().expect("utf8 path"),
    ])
    .expect("parse");
    run(cli).expect("run");

    let rendered = std::fs::read_to_string(&profile_path).expect("read profile");
    let value: serde_json::Value = serde_json::from_str(&rendered).expect("json");
    assert_eq!(value["head"]["children"][0]["functionName"], "a");
    assert_eq!(value["startTime"], 0.01);
    assert_eq!(value["samples"].as_array().map(|s| s.len()), Some(3));
}

#[test]
fn cli_profile_rejects_a_malformed_trace() {
    let dir = tempfile::tempdir().expect("tempdir");
    let trace_path = dir.path().join("trace.json");
    std::fs::write(
        &trace_path,
        r#"{"file":"app.js","fns":["","a_1_0"],"t":[1]}"#,
    )
    .expect("write trace");

    let cli = Cli::try_parse_from([
        "call-trace",
        "profile",
        trace_path.to_str().expect("utf8 path"),
    ])
    .expect("parse");
    assert!(run(cli).is_err());
}
