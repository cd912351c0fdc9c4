//! Index expressions.

use strider_ir::NodeId;

use crate::resolve::to_index;
use crate::{Exec, ExecResult, Fault, FrameRef, Value};

/// `a[i]` on a slice, array or string. Strings index bytes.
pub(crate) fn get_index(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let collection = cx.operand(id, 0, frame)?;
    let index = cx.operand(id, 1, frame)?.as_int("index")?;
    let value = match &collection {
        Value::Str(s) => {
            let byte = usize::try_from(index)
                .ok()
                .and_then(|i| s.as_bytes().get(i).copied())
                .ok_or(Fault::IndexOutOfRange {
                    index,
                    len: s.len(),
                })?;
            Value::Int(i64::from(byte))
        }
        other => other.as_composite("index")?.get(index)?,
    };
    cx.set_own(id, frame, value)
}

/// `&a[i]`: a pointer aliasing the element in the backing array.
pub(crate) fn get_index_addr(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let collection = cx.operand(id, 0, frame)?;
    let index = cx.operand(id, 1, frame)?.as_int("address of index")?;
    let ptr = collection.as_composite("address of index")?.address(index)?;
    cx.set_own(id, frame, Value::Ptr(ptr))
}

/// `a[i][j]...` with every index known ahead of time: child 1 carries the
/// index sequence.
pub(crate) fn get_index_seq(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let seq_node = cx.child(id, 1)?;
    let seq = cx
        .node(seq_node)
        .indices()
        .ok_or(Fault::malformed(seq_node, "index sequence missing"))?;
    let mut current = cx.operand(id, 0, frame)?;
    for &index in seq {
        let next = current.as_composite("index sequence")?.get(to_index(index))?;
        current = next;
    }
    cx.set_own(id, frame, current)
}

/// `m[k]`: a missing key yields the zero value of the element type and
/// does not insert. A nil map reads as empty.
pub(crate) fn get_index_map(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let map = cx.operand(id, 0, frame)?;
    let key = cx.operand(id, 1, frame)?;
    let value = match map.as_map("map index")?.and_then(|m| m.get(&key)) {
        Some(value) => value,
        None => cx.program().zero(cx.node(id).ty),
    };
    cx.set_own(id, frame, value)
}
