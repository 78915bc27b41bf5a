use std::collections::HashMap;

use oxc_ast::AstKind;
use oxc_ast::ast::{ArrowFunctionExpression, Function, ReturnStatement};
use oxc_ast_visit::{Visit, walk};
use oxc_span::GetSpan;
use oxc_syntax::scope::ScopeFlags;

use crate::error::CallTraceError;

use super::extract::{self, LineIndex};
use super::plan::{EntryPlan, ExitKind, ExitPlan};

/// Everything one traversal discovers: the function table (index = call id,
/// slot 0 reserved) and the planned entry/exit insertions.
#[derive(Debug, Clone)]
pub(crate) struct CollectedPlans {
    pub functions: Vec<String>,
    pub entries: Vec<EntryPlan>,
    pub exits: Vec<ExitPlan>,
}

/// Pre-order walker that discovers functions and return statements in one
/// pass. `enter_node`/`leave_node` maintain an explicit ancestor stack so a
/// visitor always sees the exact chain above it; strict push/pop pairing
/// keeps sibling subtrees from observing each other's frames.
///
/// Visitor methods cannot return `Result`, so the first failure is latched
/// and every later visit becomes a no-op; `finish` surfaces it.
pub(crate) struct TraceCollector<'a> {
    source: &'a str,
    lines: LineIndex,
    ancestors: Vec<AstKind<'a>>,
    functions: Vec<String>,
    ids_by_name: HashMap<String, u32>,
    entries: Vec<EntryPlan>,
    exits: Vec<ExitPlan>,
    error: Option<CallTraceError>,
}

impl<'a> TraceCollector<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            ancestors: vec![],
            // Slot 0 is the sentinel: real call ids are always non-zero.
            functions: vec![String::new()],
            ids_by_name: HashMap::new(),
            entries: vec![],
            exits: vec![],
            error: None,
        }
    }

    pub fn finish(self) -> Result<CollectedPlans, CallTraceError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(CollectedPlans {
                functions: self.functions,
                entries: self.entries,
                exits: self.exits,
            }),
        }
    }

    fn fail(&mut self, err: CallTraceError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Nearest ancestor that is not a parenthesized expression; parens are
    /// syntactically transparent for naming purposes.
    fn effective_parent(&self) -> Option<AstKind<'a>> {
        self.ancestors
            .iter()
            .rev()
            .find(|kind| !matches!(kind, AstKind::ParenthesizedExpression(_)))
            .copied()
    }

    fn on_function(&mut self, func: &Function<'a>) {
        if self.error.is_some() {
            return;
        }

        let descriptor = match extract::function_descriptor(
            self.source,
            &self.lines,
            func,
            self.effective_parent(),
        ) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        // Call ids are assigned strictly in discovery order.
        let call_id = self.functions.len() as u32;
        self.entries.push(EntryPlan {
            call_id,
            offset: descriptor.body_start + 1,
            needs_return_value_slot: false,
        });
        self.exits.push(ExitPlan {
            call_id,
            offset: descriptor.body_end - 1,
            kind: ExitKind::ImplicitEnd,
        });

        let table_name = descriptor.table_name();
        self.ids_by_name.insert(table_name.clone(), call_id);
        self.functions.push(table_name);
    }

    fn on_return(&mut self, stmt: &ReturnStatement<'a>) {
        if self.error.is_some() {
            return;
        }

        let (line, column) = self.lines.line_col(stmt.span.start);

        // Walk the ancestor stack up to the nearest enclosing function.
        let Some(func_index) = self
            .ancestors
            .iter()
            .rposition(|kind| matches!(kind, AstKind::Function(_)))
        else {
            self.fail(CallTraceError::ContainingFunctionNotFound { line, column });
            return;
        };
        let AstKind::Function(func) = self.ancestors[func_index] else {
            return;
        };
        let func_parent = self.ancestors[..func_index]
            .iter()
            .rev()
            .find(|kind| !matches!(kind, AstKind::ParenthesizedExpression(_)))
            .copied();

        let descriptor =
            match extract::function_descriptor(self.source, &self.lines, func, func_parent) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    self.fail(err);
                    return;
                }
            };

        // Pre-order guarantees the function registered before any return in
        // its body is visited; a miss here means the invariant broke.
        let Some(&call_id) = self.ids_by_name.get(&descriptor.table_name()) else {
            self.fail(CallTraceError::ContainingFunctionNotFound { line, column });
            return;
        };

        match stmt.argument.as_ref() {
            None => {
                self.exits.push(ExitPlan {
                    call_id,
                    offset: stmt.span.end - 1,
                    kind: ExitKind::ReturnNoValue,
                });
            }
            Some(argument) => {
                // A valued return needs the temporary slot declared at entry
                // and two insertions bracketing the value expression.
                self.entries[(call_id - 1) as usize].needs_return_value_slot = true;

                let span = argument.span();
                self.exits.push(ExitPlan {
                    call_id,
                    offset: span.start,
                    kind: ExitKind::ReturnBeforeValue,
                });
                self.exits.push(ExitPlan {
                    call_id,
                    offset: span.end,
                    kind: ExitKind::ReturnAfterValue,
                });
            }
        }
    }
}

impl<'a> Visit<'a> for TraceCollector<'a> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        self.ancestors.push(kind);
    }

    fn leave_node(&mut self, _kind: AstKind<'a>) {
        self.ancestors.pop();
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.on_function(it);
        if self.error.is_none() {
            walk::walk_function(self, it, flags);
        }
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        let (line, column) = self.lines.line_col(it.span.start);
        self.fail(CallTraceError::UnsupportedSyntax {
            line,
            column,
            message: "arrow functions are not supported".to_string(),
        });
    }

    fn visit_return_statement(&mut self, it: &ReturnStatement<'a>) {
        self.on_return(it);
        if self.error.is_none() {
            walk::walk_return_statement(self, it);
        }
    }
}
