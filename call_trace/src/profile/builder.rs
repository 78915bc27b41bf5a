use crate::error::CallTraceError;

use super::schema::{CpuProfile, CpuProfileNode, TraceCapture};

/// Arena record for one call-tree node while the stream is replayed. The
/// nested `CpuProfileNode` tree is only assembled once the replay succeeds,
/// so a malformed trace never leaks a partial tree.
#[derive(Debug)]
struct NodeRec {
    function_name: String,
    url: String,
    line_number: u32,
    column_number: u32,
    call_uid: u64,
    hit_count: u32,
    id: u32,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Replays a flat enter/exit event stream against the function table and
/// rebuilds the hierarchical CPU profile.
///
/// The replay runs iteratively with parent links instead of recursing, so
/// pathologically deep runtime call stacks cannot exhaust the native stack.
/// Timestamp policy: with `d` present, sample timestamps are
/// `floor(d[cursor] * 1000)` microseconds and closing/re-entry samples are
/// emitted as in the timed original; without `d`, only entry samples are
/// emitted, carrying a synthesized strictly increasing microsecond counter.
pub fn build_profile(capture: &TraceCapture) -> Result<CpuProfile, CallTraceError> {
    let timestamps_ms = match capture.d.as_ref() {
        Some(d) if d.len() != capture.t.len() => {
            return Err(CallTraceError::MalformedTrace {
                cursor: 0,
                message: format!(
                    "timestamp array length {} does not match event count {}",
                    d.len(),
                    capture.t.len()
                ),
            });
        }
        other => other,
    };

    let table_len = capture.fns.len();
    let mut arena: Vec<NodeRec> = vec![NodeRec {
        function_name: "(root)".to_string(),
        url: String::new(),
        line_number: 0,
        column_number: 0,
        // The root's call uid is the table length: reserved, never a real id.
        call_uid: table_len as u64,
        hit_count: 0,
        id: 1,
        parent: None,
        children: vec![],
    }];

    let mut samples: Vec<u32> = vec![];
    let mut sample_timestamps: Vec<u64> = vec![];
    let mut synth_counter: u64 = 0;
    let mut current: usize = 0;

    for (cursor, &event) in capture.t.iter().enumerate() {
        if event < 0 {
            let exited = event.unsigned_abs();
            if current == 0 || arena[current].call_uid != exited {
                return Err(CallTraceError::MalformedTrace {
                    cursor,
                    message: format!("exit event {event} does not match any open call"),
                });
            }

            let parent = arena[current].parent.unwrap_or(0);
            if let Some(d) = timestamps_ms {
                // Closing sample for the exiting call, then a sample putting
                // the caller back on top one microsecond later.
                let exit_us = (d[cursor] * 1000.0).floor() as u64;
                arena[current].hit_count += 1;
                samples.push(arena[current].id);
                sample_timestamps.push(exit_us);

                arena[parent].hit_count += 1;
                samples.push(arena[parent].id);
                sample_timestamps.push(exit_us + 1);
            }
            current = parent;
            continue;
        }

        if event == 0 || event as u64 >= table_len as u64 {
            return Err(CallTraceError::MalformedTrace {
                cursor,
                message: format!("enter event {event} is not a valid function table index"),
            });
        }
        let call_uid = event as u64;

        // Same function entered twice from the same call site reuses one
        // node; children are few per node, so a linear scan is fine.
        let existing = arena[current]
            .children
            .iter()
            .copied()
            .find(|&c| arena[c].call_uid == call_uid);
        let child = match existing {
            Some(existing) => existing,
            None => {
                let entry = &capture.fns[call_uid as usize];
                let Some((name, line, column)) = parse_table_entry(entry) else {
                    return Err(CallTraceError::MalformedTrace {
                        cursor,
                        message: format!("function table entry {entry:?} is not <name>_<line>_<column>"),
                    });
                };
                let id = arena.len() as u32 + 1;
                arena.push(NodeRec {
                    function_name: name,
                    url: capture.file.clone(),
                    line_number: line,
                    column_number: column,
                    call_uid,
                    hit_count: 0,
                    id,
                    parent: Some(current),
                    children: vec![],
                });
                let created = arena.len() - 1;
                arena[current].children.push(created);
                created
            }
        };

        arena[child].hit_count += 1;
        samples.push(arena[child].id);
        let enter_ts = match timestamps_ms {
            Some(d) => (d[cursor] * 1000.0).floor() as u64,
            None => {
                synth_counter += 1;
                synth_counter
            }
        };
        sample_timestamps.push(enter_ts);
        current = child;
    }

    if current != 0 {
        return Err(CallTraceError::MalformedTrace {
            cursor: capture.t.len(),
            message: "trace ended before exiting all entered functions".to_string(),
        });
    }

    let (start_time, end_time) = match timestamps_ms {
        Some(d) => (
            d.first().copied().unwrap_or(0.0) / 1000.0,
            d.last().copied().unwrap_or(0.0) / 1000.0,
        ),
        // Zero-based synthesized range, in seconds like the real one.
        None => (0.0, synth_counter as f64 / 1_000_000.0),
    };

    Ok(CpuProfile {
        head: assemble_tree(arena),
        start_time,
        end_time,
        samples,
        timestamps: sample_timestamps,
    })
}

/// Splits a `<name>_<line>_<column>` table entry from the right, so names
/// containing underscores survive intact.
fn parse_table_entry(entry: &str) -> Option<(String, u32, u32)> {
    let (rest, column) = entry.rsplit_once('_')?;
    let (name, line) = rest.rsplit_once('_')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), line.parse().ok()?, column.parse().ok()?))
}

/// Folds the arena into the nested node tree without recursion: children
/// always have larger arena indices than their parents, so walking indices
/// in reverse attaches every subtree exactly once.
fn assemble_tree(arena: Vec<NodeRec>) -> CpuProfileNode {
    let mut root = to_node(&arena[0]);
    let mut nested: Vec<Option<CpuProfileNode>> =
        arena.iter().skip(1).map(|rec| Some(to_node(rec))).collect();

    for index in (1..arena.len()).rev() {
        let Some(mut node) = nested[index - 1].take() else {
            continue;
        };
        // Children were attached in reverse creation order; restore
        // first-seen order before handing the subtree to its parent.
        node.children.reverse();
        match arena[index].parent {
            Some(0) | None => root.children.push(node),
            Some(parent) => {
                if let Some(parent_node) = nested[parent - 1].as_mut() {
                    parent_node.children.push(node);
                }
            }
        }
    }

    root.children.reverse();
    root
}

fn to_node(rec: &NodeRec) -> CpuProfileNode {
    CpuProfileNode {
        function_name: rec.function_name.clone(),
        script_id: "0".to_string(),
        url: rec.url.clone(),
        line_number: rec.line_number,
        column_number: rec.column_number,
        hit_count: rec.hit_count,
        call_uid: rec.call_uid,
        children: vec![],
        deopt_reason: String::new(),
        id: rec.id,
        position_ticks: vec![],
    }
}
