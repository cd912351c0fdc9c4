//! Operand resolution.
//!
//! `value(node, frame)` is the single way an operation reads an operand:
//! constants and declarations come straight from the node, everything else
//! from slot `node.slot` of the frame `node.level` hops up the ancestor
//! chain. `store` is the matching write used for assignment destinations.

use strider_ir::{Kind, NodeId};

use crate::{ExecResult, Fault, Frame, Program, Value};

/// Current value of `id` as seen from `frame`.
#[inline]
pub fn value(program: &Program, id: NodeId, frame: &Frame) -> ExecResult<Value> {
    let node = program.node(id);
    if matches!(node.kind, Kind::BasicLit | Kind::FuncDecl) {
        return Ok(program.carried(id).cloned().unwrap_or_default());
    }
    let owner = frame_at(frame, node.level, id)?;
    match node.slot {
        Some(slot) => owner
            .get(slot)
            .ok_or(Fault::malformed(id, "slot index beyond frame size")),
        None => Ok(program.carried(id).cloned().unwrap_or_default()),
    }
}

/// Write `value` to the location `id` denotes, honouring its level.
#[inline]
pub fn store(program: &Program, id: NodeId, frame: &Frame, value: Value) -> ExecResult {
    let node = program.node(id);
    // A destination without a slot is the blank identifier.
    let Some(slot) = node.slot else {
        return Ok(());
    };
    if frame_at(frame, node.level, id)?.set(slot, value) {
        Ok(())
    } else {
        Err(Fault::malformed(id, "slot index beyond frame size"))
    }
}

/// Drill from the struct held by `id` through the embedded-field chain
/// `seq`, returning the last field's value.
pub fn value_seq(program: &Program, id: NodeId, seq: &[usize], frame: &Frame) -> ExecResult<Value> {
    let Some((&last, path)) = seq.split_last() else {
        return value(program, id, frame);
    };
    let mut current = value(program, id, frame)?;
    for &field in path {
        let next = current.as_composite("field promotion")?.get(to_index(field))?;
        current = next;
    }
    current.as_composite("field promotion")?.get(to_index(last))
}

/// The frame `hops` ancestors above `frame`.
#[inline]
pub(crate) fn frame_at(frame: &Frame, hops: usize, id: NodeId) -> ExecResult<&Frame> {
    frame
        .ancestor(hops)
        .ok_or(Fault::malformed(id, "lexical level deeper than frame chain"))
}

/// Precomputed indices are never negative; saturate instead of wrapping.
#[inline]
pub(crate) fn to_index(i: usize) -> i64 {
    i64::try_from(i).unwrap_or(i64::MAX)
}
