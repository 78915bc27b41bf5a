use super::plan::{Insertion, TRACE_VAR};

/// Applies insertions (pre-sorted by descending offset) in one segment
/// assembly pass over the immutable original text. No repeated splicing, so
/// the cost stays linear in the output size.
pub(crate) fn apply_insertions(source: &str, insertions: &[Insertion]) -> String {
    let mut pieces: Vec<&str> = Vec::with_capacity(insertions.len() * 2 + 1);
    let mut tail = source.len();
    for insertion in insertions {
        let offset = insertion.offset as usize;
        pieces.push(&source[offset..tail]);
        pieces.push(&insertion.text);
        tail = offset;
    }
    pieces.push(&source[..tail]);

    let total = pieces.iter().map(|p| p.len()).sum();
    let mut out = String::with_capacity(total);
    for piece in pieces.iter().rev() {
        out.push_str(piece);
    }
    out
}

/// Renders the recorder preamble. Serializing the recorder object after a run
/// (e.g. `JSON.stringify(wɔk)`) yields exactly the trace capture schema the
/// profile builder consumes: `file`, `fns`, `t` and, in timing mode, `d`.
pub(crate) fn render_preamble(file: &str, functions: &[String], time: bool) -> String {
    let file_json = json_text(file);
    let fns_json = serde_json::to_string(functions).unwrap_or_else(|_| "[]".to_string());

    let mut out = format!(
        "var {TRACE_VAR} = {{\n  file: {file_json},\n  fns: {fns_json},\n  t: [],\n"
    );
    if time {
        out.push_str("  d: [],\n");
        out.push_str(
            "  enter: function(id) {this.t.push(id); this.d.push(performance.now());},\n",
        );
        out.push_str(
            "  exit: function(id) {this.t.push(-id); this.d.push(performance.now());}\n",
        );
    } else {
        out.push_str("  enter: function(id) {this.t.push(id);},\n");
        out.push_str("  exit: function(id) {this.t.push(-id);}\n");
    }
    out.push_str("};\n");
    out
}

fn json_text(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
