use std::path::Path;

use similar_asserts::assert_eq;

use crate::instrument::{InstrumentOptions, instrument_source};

fn instrument(source: &str) -> String {
    instrument_source(Path::new("test.js"), source, InstrumentOptions::default())
        .expect("instrument")
}

fn instrument_timed(source: &str) -> String {
    instrument_source(
        Path::new("test.js"),
        source,
        InstrumentOptions { time: true },
    )
    .expect("instrument")
}

fn untimed_preamble(fns_json: &str) -> String {
    format!(
        "var wɔk = {{\n  file: \"test.js\",\n  fns: {fns_json},\n  t: [],\n  enter: function(id) {{this.t.push(id);}},\n  exit: function(id) {{this.t.push(-id);}}\n}};\n"
    )
}

#[test]
fn empty_body_keeps_enter_ahead_of_exit_at_the_shared_anchor() {
    let out = instrument("function f() {}");
    let expected = format!(
        "{}function f() {{\nwɔk.enter(1);wɔk.exit(1);\n}}",
        untimed_preamble(r#"["","f_1_0"]"#)
    );
    assert_eq!(out, expected);
}

#[test]
fn valued_return_is_rewritten_through_the_slot() {
    let out = instrument("function add(a, b) {\n  return a + b;\n}");
    let expected = format!(
        "{}function add(a, b) {{\nwɔk.enter(1); var wɔkVar;\n  return wɔkVar = a + b, wɔk.exit(1), wɔkVar;\nwɔk.exit(1);\n}}",
        untimed_preamble(r#"["","add_1_0"]"#)
    );
    assert_eq!(out, expected);
}

#[test]
fn bare_return_records_exit_and_stays_undefined() {
    let out = instrument("function f() {\n  return;\n}");
    let expected = format!(
        "{}function f() {{\nwɔk.enter(1);\n  return wɔk.exit(1), void 0;\nwɔk.exit(1);\n}}",
        untimed_preamble(r#"["","f_1_0"]"#)
    );
    assert_eq!(out, expected);
}

#[test]
fn mixed_returns_rewrite_only_the_valued_path_through_the_slot() {
    let out = instrument("function f(x) {\n  if (x) {\n    return 1;\n  }\n  return;\n}");
    assert_eq!(out.matches(" var wɔkVar;").count(), 1);
    assert!(out.contains("return wɔkVar = 1, wɔk.exit(1), wɔkVar;"));
    assert!(out.contains("return wɔk.exit(1), void 0;"));
}

#[test]
fn return_value_expression_appears_exactly_once() {
    let out = instrument("function f() {\n  return compute(1, 2);\n}");
    assert_eq!(out.matches("compute(1, 2)").count(), 1);
    assert!(out.contains("wɔkVar = compute(1, 2), wɔk.exit(1), wɔkVar"));
}

#[test]
fn nested_functions_are_instrumented_with_their_own_ids() {
    let out = instrument("function outer() {\n  function inner() {}\n  inner();\n}");
    assert!(out.contains(r#"fns: ["","outer_1_0","inner_2_2"]"#));
    assert!(out.contains("wɔk.enter(1);"));
    assert!(out.contains("wɔk.enter(2);"));
    assert!(out.contains("wɔk.exit(2);"));
    assert!(out.contains("wɔk.exit(1);"));
}

#[test]
fn timed_preamble_adds_the_clock_hook() {
    let out = instrument_timed("function f() {}");
    assert!(out.contains("  d: [],\n"));
    assert!(out.contains("enter: function(id) {this.t.push(id); this.d.push(performance.now());}"));
    assert!(out.contains("exit: function(id) {this.t.push(-id); this.d.push(performance.now());}"));
}

#[test]
fn untimed_preamble_has_no_clock_hook() {
    let out = instrument("function f() {}");
    assert!(!out.contains("d: []"));
    assert!(!out.contains("performance.now"));
}

#[test]
fn original_text_outside_insertions_is_untouched() {
    let source = "var n = 1;\nfunction f() {}\nn += 2;\n";
    let out = instrument(source);
    assert!(out.contains("var n = 1;\n"));
    assert!(out.contains("n += 2;\n"));
}
