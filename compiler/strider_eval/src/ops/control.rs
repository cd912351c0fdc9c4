//! Control and closure operations.

use strider_ir::{NodeId, Payload};

use crate::{Exec, ExecResult, Fault, FrameRef, FuncValue, Value};

/// Structural nodes and elided operations.
pub(crate) fn nop(_: &Exec<'_>, _: NodeId, _: &FrameRef) -> ExecResult {
    Ok(())
}

/// `return e0, e1, ...`: every expression is resolved first, then the
/// values land in result slots `0..k` of the current frame.
pub(crate) fn ret(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let mut results = Vec::new();
    for &child in &cx.node(id).children {
        results.extend(cx.spread(child, frame)?);
    }
    for (slot, value) in results.into_iter().enumerate() {
        if !frame.set(slot, value) {
            return Err(Fault::malformed(id, "more results than frame slots"));
        }
    }
    Ok(())
}

/// One `case` comparison: the switch's governing expression (child 0 of
/// the enclosing `Switch`, two levels up) against this clause's expression.
/// A clause without an expression is the default and always matches.
pub(crate) fn case(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let matched = match cx.node(id).child(0) {
        None => true,
        Some(expr) => {
            let switch = cx
                .node(id)
                .parent
                .and_then(|clause| cx.node(clause).parent)
                .ok_or(Fault::malformed(id, "case outside of a switch"))?;
            let governing = cx.operand(switch, 0, frame)?;
            governing == cx.value(expr, frame)?
        }
    };
    cx.set_own(id, frame, Value::Bool(matched))
}

/// A function literal: captures the current frame.
pub(crate) fn func_lit(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let Payload::Func(decl) = cx.node(id).payload else {
        return Err(Fault::malformed(id, "function literal without declaration"));
    };
    cx.set_own(id, frame, Value::Func(FuncValue::closure(decl, FrameRef::clone(frame))))
}
