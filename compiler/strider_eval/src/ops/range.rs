//! `for range` iteration.
//!
//! A range node runs once per loop iteration. Children are the key
//! destination, the value destination and the collection; a blank
//! destination has no slot and is skipped. The node's own slot receives the
//! continuation flag the walker branches on, and the slot after it holds
//! the position of the next element. A nil or zero position starts from the
//! beginning, and the position is cleared once the loop finishes so the
//! next entry into the loop starts over.
//!
//! Map iteration keeps a cursor instead of an index: a two-field struct of
//! the next index and the keys present when the loop started. Entries added
//! by the loop body are not visited, and deleted ones are skipped.

use strider_ir::NodeId;

use crate::{Composite, Exec, ExecResult, Fault, FrameRef, MapHandle, Value};

/// Key, value and the position to store for the next iteration.
type Step = (Value, Value, Value);

pub(crate) fn range(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    let slot = node
        .slot
        .ok_or(Fault::malformed(id, "range without result slot"))?;
    let key = cx.child(id, 0)?;
    let value = cx.child(id, 1)?;
    let collection = cx.operand(id, 2, frame)?;
    let position = frame
        .get(slot + 1)
        .ok_or(Fault::malformed(id, "range position slot beyond frame size"))?;

    let step = match &collection {
        Value::Map(map) => map_step(map, position)?,
        other => sequence_step(other, position)?,
    };

    match step {
        Some((k, v, next)) => {
            cx.store(key, frame, k)?;
            cx.store(value, frame, v)?;
            frame.set(slot + 1, next);
            cx.set_own(id, frame, Value::Bool(true))
        }
        None => {
            frame.set(slot + 1, Value::Nil);
            cx.set_own(id, frame, Value::Bool(false))
        }
    }
}

fn sequence_step(collection: &Value, position: Value) -> ExecResult<Option<Step>> {
    let position = match position {
        Value::Nil => 0,
        Value::Int(n) => usize::try_from(n).unwrap_or(0),
        other => return Err(Fault::mismatch("range", "int", other.type_name())),
    };
    let at = Value::Int(index(position));
    let advance = |by: usize| Value::Int(index(position + by));

    let step = match collection {
        Value::Nil => None,
        Value::Slice(items) => items
            .get(index(position))
            .ok()
            .map(|item| (at, item, advance(1))),
        Value::Str(s) => s
            .get(position..)
            .and_then(|rest| rest.chars().next())
            .map(|c| (at, Value::Int(i64::from(u32::from(c))), advance(c.len_utf8()))),
        // A channel yields its values through the first destination.
        Value::Chan(chan) => chan.recv().map(|v| (v, Value::Nil, advance(1))),
        Value::Int(n) => (index(position) < *n).then(|| (at, Value::Nil, advance(1))),
        other => {
            return Err(Fault::mismatch(
                "range",
                "slice, string, map, chan or int",
                other.type_name(),
            ))
        }
    };
    Ok(step)
}

fn map_step(map: &MapHandle, position: Value) -> ExecResult<Option<Step>> {
    let cursor = match position {
        Value::Struct(cursor) => cursor,
        Value::Nil | Value::Int(0) => {
            Composite::new(vec![Value::Int(0), Value::slice(map.keys())])
        }
        other => return Err(Fault::mismatch("range", "map cursor", other.type_name())),
    };
    let keys = cursor.get(1)?;
    let keys = keys.as_composite("range")?;

    let mut next = cursor.get(0)?.as_int("range")?;
    while let Ok(key) = keys.get(next) {
        next += 1;
        if let Some(value) = map.get(&key) {
            cursor.set(0, Value::Int(next))?;
            return Ok(Some((key, value, Value::Struct(cursor))));
        }
    }
    Ok(None)
}

#[inline]
fn index(position: usize) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
