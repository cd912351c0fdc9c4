//! Builtins and channel operators.
//!
//! Builtin calls keep the shape of a call: child 0 is the builtin's
//! identifier and the arguments follow. The channel operators `<-c` and
//! `c <- v` take their operands from child 0 onwards.
//!
//! `recv`, `send` and `sleep` suspend the calling activation. Nothing here
//! holds a frame lock while blocked.

use std::time::Duration;

use strider_ir::{NodeId, Type};

use crate::natives::join_spaced;
use crate::{zero_value, ChanHandle, Exec, ExecResult, Fault, FrameRef, MapHandle, Value};

/// `make(T)`, `make(T, n)`: a zero-filled slice of length `n`, a channel
/// buffering `n` values (unbuffered when absent), or an empty map.
pub(crate) fn make(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let type_expr = cx.child(id, 1)?;
    let ty = cx
        .node(type_expr)
        .ty
        .or(cx.node(id).ty)
        .ok_or(Fault::malformed(type_expr, "make without type"))?;
    let size = match cx.node(id).child(2) {
        Some(arg) => {
            let n = cx.value(arg, frame)?.as_int("make")?;
            usize::try_from(n).map_err(|_| Fault::IndexOutOfRange { index: n, len: 0 })?
        }
        None => 0,
    };
    let graph = cx.program().graph();
    let value = match graph.ty(ty) {
        Type::Slice { elem } => {
            Value::slice((0..size).map(|_| zero_value(graph, Some(*elem))).collect())
        }
        Type::Chan { .. } => Value::Chan(ChanHandle::new(size)),
        Type::Map { .. } => Value::Map(MapHandle::new()),
        other => return Err(Fault::mismatch("make", "slice, chan or map", other.category())),
    };
    cx.set_own(id, frame, value)
}

/// `<-c`: blocks until a value arrives; the element zero value once the
/// channel is closed and drained.
pub(crate) fn recv(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let chan = cx.operand(id, 0, frame)?;
    let value = match chan.as_chan("receive")?.recv() {
        Some(value) => value,
        None => cx.program().zero(cx.node(id).ty),
    };
    cx.set_own(id, frame, value)
}

/// `c <- v`: blocks until a receiver takes the value (unbuffered) or
/// buffer space is free.
pub(crate) fn send(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let chan = cx.operand(id, 0, frame)?;
    let value = cx.operand(id, 1, frame)?;
    chan.as_chan("send")?.send(value)
}

pub(crate) fn close(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    cx.operand(id, 1, frame)?.as_chan("close")?.close()
}

/// `len(x)`: elements, string bytes, map entries or queued channel values.
pub(crate) fn len(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let n = match cx.operand(id, 1, frame)? {
        Value::Nil => 0,
        Value::Str(s) => s.len(),
        Value::Slice(c) | Value::Struct(c) => c.len(),
        Value::Map(m) => m.len(),
        Value::Chan(c) => c.len(),
        other => return Err(Fault::mismatch("len", "slice, string, map or chan", other.type_name())),
    };
    cx.set_own(id, frame, Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
}

/// `sleep(ms)`: suspends the activation; non-positive durations return
/// immediately.
pub(crate) fn sleep(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let ms = cx.operand(id, 1, frame)?.as_int("sleep")?;
    if let Ok(ms) = u64::try_from(ms) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }
    Ok(())
}

/// `println(a, b, ...)`: operands separated by spaces, one line per call.
pub(crate) fn println(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let mut args = Vec::new();
    for &arg in cx.node(id).children.iter().skip(1) {
        args.extend(cx.spread(arg, frame)?);
    }
    cx.machine().output().write_line(&join_spaced(&args));
    Ok(())
}
