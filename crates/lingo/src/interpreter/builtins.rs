//! Builtin function dispatch.

use tracing::trace;

use crate::interpreter::evaluator::{choose, eval};
use crate::interpreter::{EvalContext, EvalError, plural_category};
use crate::parser::{Builtin, Node};
use crate::types::Value;

/// Evaluates the arguments and calls `builtin`. Arguments that were not
/// supplied are the empty string.
pub(crate) fn call_builtin(
    builtin: Builtin,
    args: &[Node],
    ctx: &mut EvalContext<'_>,
) -> Result<Value, EvalError> {
    let values = args
        .iter()
        .map(|arg| eval(arg, ctx))
        .collect::<Result<Vec<_>, _>>()?;
    let arg = |i: usize| values.get(i).cloned().unwrap_or_default();
    let rt = ctx.runtime();

    Ok(match builtin {
        Builtin::Len => rt.length(&arg(0)),
        Builtin::Join => rt.join(&arg(0), &arg(1)),
        Builtin::Split => rt.split(&arg(0), &arg(1)),
        Builtin::Bold => rt.bold(&arg(0)),
        Builtin::Italic => rt.italic(&arg(0)),
        Builtin::Link => rt.link(&arg(0), &arg(1), &arg(2)),
        Builtin::PadLeft => rt.pad_left(&arg(0), &arg(1), &arg(2)),
        Builtin::PadRight => rt.pad_right(&arg(0), &arg(1), &arg(2)),
        Builtin::TrimLeft => rt.trim_left(&arg(0), &arg(1)),
        Builtin::TrimRight => rt.trim_right(&arg(0), &arg(1)),
        Builtin::Integer => rt.integer(&arg(0)),
        Builtin::Fraction => rt.fraction(&arg(0), &arg(1)),
        Builtin::Abs => rt.abs(&arg(0)),
        Builtin::Plural => Value::from(plural_category(ctx.locale(), arg(0).as_int())),
        Builtin::T => translate_nested(ctx, &arg(0), &arg(1), &arg(2))?,
    })
}

/// `t(key, value, opt)`: renders another translation of the same locale.
///
/// The result is post-processed by the runtime and returned as a raw string
/// so the enclosing template does not escape it a second time. Without a
/// resource, or when the key has no matching translation, the result is
/// empty.
fn translate_nested(
    ctx: &EvalContext<'_>,
    key: &Value,
    value: &Value,
    opt: &Value,
) -> Result<Value, EvalError> {
    let runtime = ctx.runtime();
    let message = runtime.t(key, value, opt);
    let Some(translation) = ctx.resource().and_then(|resource| resource.get(&message.key)) else {
        trace!(key = %message.key, "nested translation not found");
        return Ok(Value::empty());
    };

    let mut nested = ctx.nested(&message.vars);
    let Some(node) = choose(translation, &mut nested)? else {
        return Ok(Value::empty());
    };
    let value = eval(node, &mut nested)?;
    Ok(Value::raw(runtime.post_process(&value)))
}
