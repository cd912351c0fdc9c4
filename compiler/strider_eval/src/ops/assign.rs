//! Assignment operations.
//!
//! Destinations are written with [`resolve::store`](crate::resolve::store),
//! so an assignment inside a closure reaches the captured variable in the
//! enclosing frame.

use strider_ir::NodeId;

use crate::resolve::frame_at;
use crate::{Exec, ExecResult, Fault, FrameRef, Value};

/// `d0, d1, ... = s0, s1, ...`: children are the k destinations followed by
/// the k sources. Every source is resolved before any destination is
/// written, so `a, b = b, a` swaps.
pub(crate) fn assign(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let children = &cx.node(id).children;
    if children.is_empty() || children.len() % 2 != 0 {
        return Err(Fault::malformed(id, "assignment needs matching destinations and sources"));
    }
    let (dests, sources) = children.split_at(children.len() / 2);
    let values = sources
        .iter()
        .map(|&src| cx.value(src, frame))
        .collect::<ExecResult<Vec<_>>>()?;
    for (&dest, value) in dests.iter().zip(values) {
        cx.store(dest, frame, value)?;
    }
    Ok(())
}

/// `d0, d1, ... = f()`: the last child is a multi-result expression whose
/// values sit in contiguous slots starting at its own.
pub(crate) fn assign_x(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let children = &cx.node(id).children;
    let Some((&source, dests)) = children.split_last() else {
        return Err(Fault::malformed(id, "spread assignment without source"));
    };
    let src = cx.node(source);
    let base = src
        .slot
        .ok_or(Fault::malformed(source, "multi-result source without slot"))?;
    let values = frame_at(frame, src.level, source)?
        .range(base, dests.len())
        .ok_or(Fault::malformed(source, "result slots beyond frame size"))?;
    for (&dest, value) in dests.iter().zip(values) {
        cx.store(dest, frame, value)?;
    }
    Ok(())
}

/// `var d0, d1 T`: every child but the trailing type expression receives a
/// fresh zero value of the node's type.
pub(crate) fn assign_zero(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    // The last child is the type expression; a lone child names no
    // destination.
    let dests = node.children.split_last().map_or(&[][..], |(_, dests)| dests);
    for &dest in dests {
        // Each destination gets its own backing store.
        cx.store(dest, frame, cx.program().zero(node.ty))?;
    }
    Ok(())
}

/// `*p = v`, where `p` came from `GetIndexAddr`.
pub(crate) fn assign_ptr(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let value = cx.operand(id, 1, frame)?;
    match cx.operand(id, 0, frame)? {
        Value::Ptr(ptr) => {
            if ptr.store(value) {
                Ok(())
            } else {
                Err(Fault::malformed(id, "pointer past end of backing array"))
            }
        }
        Value::Nil => Err(Fault::NilDereference { op: "pointer store" }),
        other => Err(Fault::mismatch("pointer store", "pointer", other.type_name())),
    }
}

/// `m[k] = v`: child 0 is the `IndexExpr` `[m, k]`, child 1 the value.
pub(crate) fn assign_map(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let target = cx.child(id, 0)?;
    let map = cx.operand(target, 0, frame)?;
    let key = cx.operand(target, 1, frame)?;
    let value = cx.operand(id, 1, frame)?;
    match map.as_map("map assignment")? {
        Some(map) => {
            map.insert(key, value);
            Ok(())
        }
        None => Err(Fault::NilMap),
    }
}
