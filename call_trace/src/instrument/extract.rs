use oxc_ast::AstKind;
use oxc_ast::ast::{AssignmentTarget, BindingPatternKind, Expression, Function};
use oxc_span::GetSpan;

use crate::error::CallTraceError;

/// What the planner needs to know about one discovered function: a stable
/// name, where it sits, and the interior of its body block.
#[derive(Debug, Clone)]
pub(crate) struct FunctionDescriptor {
    pub name: String,
    pub line: u32,
    pub column: u32,
    pub body_start: u32,
    pub body_end: u32,
}

impl FunctionDescriptor {
    /// Stable table form, `<name>_<line>_<column>`. The line/column suffix
    /// keeps same-named functions apart and feeds the profile node location.
    pub fn table_name(&self) -> String {
        format!("{}_{}_{}", self.name, self.line, self.column)
    }
}

/// Byte-offset to line/column mapping over the original source.
/// Lines are 1-based, columns 0-based.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        Self { starts }
    }

    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let idx = self.starts.partition_point(|&s| s <= offset) - 1;
        (idx as u32 + 1, offset - self.starts[idx])
    }
}

/// Derives a descriptor for a function-like node given its nearest
/// non-parenthesized ancestor. Fails with `UnsupportedSyntax` for any
/// function form that cannot be named; instrumentation never degrades to a
/// partial rewrite.
pub(crate) fn function_descriptor(
    source: &str,
    lines: &LineIndex,
    func: &Function<'_>,
    parent: Option<AstKind<'_>>,
) -> Result<FunctionDescriptor, CallTraceError> {
    let (line, column) = lines.line_col(func.span.start);

    let Some(body) = func.body.as_ref() else {
        return Err(CallTraceError::UnsupportedSyntax {
            line,
            column,
            message: "function has no body to instrument".to_string(),
        });
    };

    let make = |name: String| FunctionDescriptor {
        name,
        line,
        column,
        body_start: body.span.start,
        body_end: body.span.end,
    };

    // A function carrying its own identifier names itself, whether it is a
    // declaration or a named function expression.
    if let Some(id) = func.id.as_ref() {
        return Ok(make(id.name.to_string()));
    }

    match parent {
        Some(AstKind::VariableDeclarator(decl)) => {
            if let BindingPatternKind::BindingIdentifier(ident) = &decl.id.kind {
                Ok(make(ident.name.to_string()))
            } else {
                Err(CallTraceError::UnsupportedSyntax {
                    line,
                    column,
                    message: "function expression bound to a destructuring pattern".to_string(),
                })
            }
        }
        Some(AstKind::AssignmentExpression(assign)) => {
            Ok(make(assignment_target_name(source, lines, &assign.left)?))
        }
        Some(AstKind::ReturnStatement(_)) | Some(AstKind::CallExpression(_)) => {
            Ok(make("[Anonymous]".to_string()))
        }
        _ => Err(CallTraceError::UnsupportedSyntax {
            line,
            column,
            message: "function expression in an unsupported position".to_string(),
        }),
    }
}

/// Resolves an assignment target into a dotted path name, e.g.
/// `Foo.prototype.bar` names `Foo.bar` and `obj["baz"]` names `obj.baz`.
fn assignment_target_name(
    source: &str,
    lines: &LineIndex,
    target: &AssignmentTarget<'_>,
) -> Result<String, CallTraceError> {
    match target {
        AssignmentTarget::AssignmentTargetIdentifier(ident) => Ok(ident.name.to_string()),
        AssignmentTarget::StaticMemberExpression(member) => {
            let base = expression_path(source, lines, &member.object)?;
            Ok(join_segment(base, member.property.name.as_str()))
        }
        AssignmentTarget::ComputedMemberExpression(member) => {
            let base = expression_path(source, lines, &member.object)?;
            Ok(join_segment(base, &computed_key(source, &member.expression)))
        }
        _ => {
            let (line, column) = lines.line_col(target.span().start);
            Err(CallTraceError::UnsupportedSyntax {
                line,
                column,
                message: "unrecognized assignment target for a function expression".to_string(),
            })
        }
    }
}

fn expression_path(
    source: &str,
    lines: &LineIndex,
    expr: &Expression<'_>,
) -> Result<String, CallTraceError> {
    match expr {
        Expression::Identifier(ident) => Ok(ident.name.to_string()),
        Expression::StaticMemberExpression(member) => {
            let base = expression_path(source, lines, &member.object)?;
            Ok(join_segment(base, member.property.name.as_str()))
        }
        Expression::ComputedMemberExpression(member) => {
            let base = expression_path(source, lines, &member.object)?;
            Ok(join_segment(base, &computed_key(source, &member.expression)))
        }
        Expression::ParenthesizedExpression(paren) => {
            expression_path(source, lines, &paren.expression)
        }
        _ => {
            let (line, column) = lines.line_col(expr.span().start);
            Err(CallTraceError::UnsupportedSyntax {
                line,
                column,
                message: "unrecognized member base in assignment target".to_string(),
            })
        }
    }
}

fn computed_key(source: &str, key: &Expression<'_>) -> String {
    match key {
        Expression::StringLiteral(lit) => lit.value.to_string(),
        Expression::NumericLiteral(lit) => {
            let span = lit.span;
            source[span.start as usize..span.end as usize].to_string()
        }
        // A runtime-computed key has no static name.
        _ => "(anonymous)".to_string(),
    }
}

fn join_segment(base: String, segment: &str) -> String {
    // `prototype` hops carry no naming information.
    if segment == "prototype" {
        base
    } else {
        format!("{base}.{segment}")
    }
}
