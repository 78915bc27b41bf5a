/// Name of the recorder object the preamble declares. The non-ASCII letter
/// keeps it from colliding with identifiers in ordinary programs.
pub(crate) const TRACE_VAR: &str = "wɔk";

/// Per-function temporary that holds a return value while the exit event is
/// recorded.
pub(crate) const RETURN_SLOT: &str = "wɔkVar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitKind {
    /// Fall-off-the-end exit recorded just before the closing brace.
    ImplicitEnd,
    /// `return;` with no value.
    ReturnNoValue,
    /// First half of the valued-return bracket, ahead of the expression.
    ReturnBeforeValue,
    /// Second half of the valued-return bracket, behind the expression.
    ReturnAfterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EntryPlan {
    pub call_id: u32,
    pub offset: u32,
    pub needs_return_value_slot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExitPlan {
    pub call_id: u32,
    pub offset: u32,
    pub kind: ExitKind,
}

/// One planned text insertion against the original, immutable source.
#[derive(Debug, Clone)]
pub(crate) struct Insertion {
    pub offset: u32,
    pub text: String,
    rank: u8,
}

pub(crate) fn entry_text(plan: &EntryPlan) -> String {
    let mut text = format!("\n{TRACE_VAR}.enter({});", plan.call_id);
    if plan.needs_return_value_slot {
        text.push_str(&format!(" var {RETURN_SLOT};"));
    }
    text
}

pub(crate) fn exit_text(plan: &ExitPlan) -> String {
    match plan.kind {
        ExitKind::ImplicitEnd => format!("{TRACE_VAR}.exit({});\n", plan.call_id),
        // `return;` becomes `return wɔk.exit(id), void 0;` so the exit fires
        // and the returned value stays undefined.
        ExitKind::ReturnNoValue => format!(" {TRACE_VAR}.exit({}), void 0", plan.call_id),
        // Together these rewrite `return e;` into
        // `return wɔkVar = e, wɔk.exit(id), wɔkVar;` — the expression is
        // evaluated exactly once, then the exit is recorded, then the saved
        // value leaves the function.
        ExitKind::ReturnBeforeValue => format!("{RETURN_SLOT} = "),
        ExitKind::ReturnAfterValue => format!(", {TRACE_VAR}.exit({}), {RETURN_SLOT}", plan.call_id),
    }
}

/// Merges entry and exit plans into one insertion list ordered by strictly
/// descending offset, exits ahead of entries at equal offsets. Applying in
/// that order keeps every not-yet-applied offset valid, and the tie-break
/// keeps enter/exit adjacency right for empty function bodies, where the two
/// anchors coincide.
pub(crate) fn merge_insertions(entries: &[EntryPlan], exits: &[ExitPlan]) -> Vec<Insertion> {
    let mut insertions: Vec<Insertion> = exits
        .iter()
        .map(|plan| Insertion {
            offset: plan.offset,
            text: exit_text(plan),
            rank: 0,
        })
        .chain(entries.iter().map(|plan| Insertion {
            offset: plan.offset,
            text: entry_text(plan),
            rank: 1,
        }))
        .collect();

    insertions.sort_by(|a, b| b.offset.cmp(&a.offset).then(a.rank.cmp(&b.rank)));
    insertions
}
