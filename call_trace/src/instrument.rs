use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::CallTraceError;

mod extract;
mod plan;
mod rewrite;
mod walker;

#[cfg(test)]
mod rewrite_test;

pub(crate) use walker::CollectedPlans;

#[derive(Debug, Clone, Copy, Default)]
pub struct InstrumentOptions {
    /// Capture a monotonic timestamp alongside every enter/exit event.
    pub time: bool,
}

/// Rewrites one JavaScript source unit so that every function reports its
/// entries and exits to a recorder object prepended ahead of the program.
pub fn instrument_source(
    path: &Path,
    source: &str,
    options: InstrumentOptions,
) -> Result<String, CallTraceError> {
    let plans = collect_plans(path, source)?;
    let insertions = plan::merge_insertions(&plans.entries, &plans.exits);
    let rewritten = rewrite::apply_insertions(source, &insertions);
    let preamble = rewrite::render_preamble(
        &path.to_string_lossy(),
        &plans.functions,
        options.time,
    );
    Ok(format!("{preamble}{rewritten}"))
}

pub(crate) fn collect_plans(path: &Path, source: &str) -> Result<CollectedPlans, CallTraceError> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_default();
    let parsed = Parser::new(&allocator, source, source_type).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .iter()
            .map(|e| format!("{e:?}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(CallTraceError::Parse {
            path: path.to_path_buf(),
            message,
        });
    }

    let mut collector = walker::TraceCollector::new(source);
    collector.visit_program(&parsed.program);
    collector.finish()
}
