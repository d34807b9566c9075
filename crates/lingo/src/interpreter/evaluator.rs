//! Template evaluation.
//!
//! Evaluation walks the tree produced by the parser. Every node goes through
//! [`eval`], which counts nesting depth, so runaway recursion through nested
//! translations fails with [`EvalError::MaxDepthExceeded`].

use tracing::trace_span;

use crate::interpreter::builtins::call_builtin;
use crate::interpreter::{EvalContext, EvalError};
use crate::parser::{BinaryOp, Builtin, LiteralKind, Node, SelectOption, UnaryOp};
use crate::resource::Translation;
use crate::runtime::Runtime;
use crate::types::{Value, Vars, len_to_int};

/// Evaluates a template with the given runtime, locale and variables.
///
/// Nested `t` calls render as empty since no resource is attached; use an
/// [`EvalContext`] with [`EvalContext::with_resource`] for that.
pub fn eval_template(
    node: &Node,
    runtime: &dyn Runtime,
    locale: &str,
    vars: &Vars,
) -> Result<Value, EvalError> {
    let _span = trace_span!("eval_template", locale, runtime = runtime.kind()).entered();
    let mut ctx = EvalContext::new(runtime, locale, vars);
    eval(node, &mut ctx)
}

/// Evaluates a node one level deeper in `ctx`.
pub fn eval(node: &Node, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    ctx.descend()?;
    let result = eval_node(node, ctx);
    ctx.ascend();
    result
}

/// Selects the node to render from a translation: the translation's own
/// value if its condition holds, else the first match among its group.
///
/// Returns `None` when no condition matches.
pub fn choose<'t>(
    translation: &'t Translation,
    ctx: &mut EvalContext<'_>,
) -> Result<Option<&'t Node>, EvalError> {
    ctx.descend()?;
    let chosen = choose_inner(translation, ctx);
    ctx.ascend();
    chosen
}

fn choose_inner<'t>(
    translation: &'t Translation,
    ctx: &mut EvalContext<'_>,
) -> Result<Option<&'t Node>, EvalError> {
    if let Some(condition) = &translation.condition {
        if !eval(condition, ctx)?.as_bool() {
            return Ok(None);
        }
    }
    if let Some(value) = &translation.value {
        return Ok(Some(value));
    }
    for member in &translation.group {
        if let Some(node) = choose(member, ctx)? {
            return Ok(Some(node));
        }
    }
    Ok(None)
}

fn eval_node(node: &Node, ctx: &mut EvalContext<'_>) -> Result<Value, EvalError> {
    match node {
        Node::Root(fragments) => fragments
            .iter()
            .map(|fragment| match fragment {
                // Fragments that failed to parse render as nothing.
                Node::Invalid { .. } => Ok(Value::empty()),
                fragment => eval(fragment, ctx),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Slice),
        Node::Ident(name) => Ok(ctx.var(name).cloned().unwrap_or_default()),
        Node::Func(builtin) => Ok(Value::from(builtin.name())),
        Node::Literal { kind, lexeme } => Ok(literal(*kind, lexeme)),
        Node::Unary { op, operand } => {
            let operand = eval(operand, ctx)?;
            Ok(match op {
                UnaryOp::Not => operand.logical_not(),
                UnaryOp::Plus => operand.unary_plus(),
                UnaryOp::Minus => operand.negate(),
            })
        }
        Node::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, ctx),
        Node::Range { .. } => Err(EvalError::UnexpectedOperator {
            op: ":".to_string(),
        }),
        Node::Index { base, index } => {
            let base = eval(base, ctx)?;
            let index = eval(index, ctx)?.as_int();
            Ok(index_value(&base, index))
        }
        Node::Slice { base, start, end } => {
            eval_slice(base, start.as_deref(), end.as_deref(), ctx)
        }
        Node::Select { value, options } => eval_select(value, options, ctx),
        Node::Call { callee, args } => match &**callee {
            Node::Func(builtin) => call_builtin(*builtin, args, ctx),
            callee => {
                let name = eval(callee, ctx)?;
                match Builtin::from_name(&name.text()) {
                    Some(builtin) => call_builtin(builtin, args, ctx),
                    None => Ok(Value::empty()),
                }
            }
        },
        Node::Invalid { start, .. } => Err(EvalError::InvalidNode {
            lexeme: start.to_string(),
        }),
    }
}

/// Literal values. Underscores in numbers are digit separators.
fn literal(kind: LiteralKind, lexeme: &str) -> Value {
    match kind {
        LiteralKind::Text | LiteralKind::String => Value::from(lexeme),
        LiteralKind::Int => Value::Int(lexeme.replace('_', "").parse().unwrap_or(0)),
        LiteralKind::Float => Value::Float(lexeme.replace('_', "").parse().unwrap_or(0.0)),
    }
}

fn eval_binary(
    op: BinaryOp,
    lhs: &Node,
    rhs: &Node,
    ctx: &mut EvalContext<'_>,
) -> Result<Value, EvalError> {
    let lhs = eval(lhs, ctx)?;
    match op {
        BinaryOp::Or if lhs.as_bool() => return Ok(Value::Bool(true)),
        BinaryOp::And if !lhs.as_bool() => return Ok(Value::Bool(false)),
        _ => {}
    }
    let rhs = eval(rhs, ctx)?;
    Ok(match op {
        BinaryOp::Or | BinaryOp::And => Value::Bool(rhs.as_bool()),
        BinaryOp::Equal => Value::Bool(lhs.equal(&rhs)),
        BinaryOp::NotEqual => Value::Bool(!lhs.equal(&rhs)),
        BinaryOp::Greater => Value::Bool(lhs.greater(&rhs)),
        BinaryOp::GreaterEqual => Value::Bool(lhs.greater_equal(&rhs)),
        BinaryOp::Less => Value::Bool(lhs.less(&rhs)),
        BinaryOp::LessEqual => Value::Bool(lhs.less_equal(&rhs)),
        BinaryOp::Add => lhs.plus(&rhs),
        BinaryOp::Sub => lhs.minus(&rhs),
        BinaryOp::Mul => lhs.times(&rhs),
        BinaryOp::Div => lhs.divided_by(&rhs),
        BinaryOp::Rem => lhs.modulo(&rhs),
    })
}

/// Element `index` of the sequence form of `base`. Negative indices count
/// from the end; anything out of range is empty.
fn index_value(base: &Value, index: i64) -> Value {
    let items = base.as_slice();
    let len = len_to_int(items.len());
    let index = if index < 0 { index + len } else { index };
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .unwrap_or_default()
}

fn eval_slice(
    base: &Node,
    start: Option<&Node>,
    end: Option<&Node>,
    ctx: &mut EvalContext<'_>,
) -> Result<Value, EvalError> {
    let base = eval(base, ctx)?;
    if !matches!(
        base,
        Value::String(_) | Value::RawString(_) | Value::Slice(_)
    ) {
        return Err(EvalError::CannotSlice {
            kind: base.value_type(),
        });
    }

    let items = base.as_slice();
    let len = len_to_int(items.len());
    let start = match start {
        Some(node) => slice_bound(eval(node, ctx)?, "start")?,
        None => 0,
    };
    let end = match end {
        Some(node) => slice_bound(eval(node, ctx)?, "end")?,
        None => len,
    };
    let end = if end < 0 { end + len } else { end };

    match (usize::try_from(start), usize::try_from(end)) {
        (Ok(start), Ok(end)) if start <= end && end <= items.len() => {
            Ok(Value::Slice(items[start..end].to_vec()))
        }
        _ => Ok(Value::empty()),
    }
}

fn slice_bound(value: Value, bound: &'static str) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(i),
        other => Err(EvalError::InvalidSliceBound {
            bound,
            kind: other.value_type(),
        }),
    }
}

/// First option whose pattern equals the value, `_` matching anything.
fn eval_select(
    value: &Node,
    options: &[SelectOption],
    ctx: &mut EvalContext<'_>,
) -> Result<Value, EvalError> {
    let value = eval(value, ctx)?;
    for option in options {
        if option.is_wildcard() || value.equal(&eval(&option.pattern, ctx)?) {
            return eval(&option.result, ctx);
        }
    }
    Ok(Value::empty())
}
