//! Call protocol.
//!
//! A call allocates the callee's frame, binds receiver and arguments into
//! their precomputed slots, walks the callee body and copies result slots
//! `0..k` back into the caller's destination slots. Natives follow the same
//! convention with the walk replaced by a host function.
//!
//! Frame linkage: an ordinary call links the new frame to the callee's
//! lexical environment (the captured frame of a closure, the global frame
//! of a top-level function). A forking call links it to the calling frame.

use strider_ir::{Kind, NodeId};
use strider_stack::ensure_sufficient_stack;

use crate::walker::run_cfg;
use crate::{
    resolve, Exec, ExecResult, Fault, Frame, FrameRef, FuncValue, Machine, NativeFunc, Value,
};

/// Receiver operand of a method call.
#[derive(Copy, Clone)]
pub(crate) struct ReceiverArg<'a> {
    pub node: NodeId,
    /// Embedded-field path from the receiver expression to the method's
    /// actual receiver.
    pub seq: Option<&'a [usize]>,
}

/// A bound, not yet started, activation.
pub(crate) struct Activation {
    pub frame: FrameRef,
    pub decl: NodeId,
    pub entry: Option<NodeId>,
    pub results: usize,
}

/// Resolve the receiver and arguments in `caller` and bind them into a
/// fresh frame for `func`.
pub(crate) fn prepare(
    cx: &Exec<'_>,
    func: &FuncValue,
    caller: &FrameRef,
    recv: Option<ReceiverArg<'_>>,
    args: &[NodeId],
    fork: bool,
) -> ExecResult<Activation> {
    let receiver = recv.map(|recv| receiver_value(cx, recv, caller)).transpose()?;
    let values = collect_args(cx, args, caller)?;
    let parent = if fork {
        FrameRef::clone(caller)
    } else {
        lexical_parent(cx.machine(), func)
    };
    bind(cx.machine(), func, parent, receiver, values)
}

/// Bind concrete values into a fresh frame for `func` linked to `parent`.
pub(crate) fn bind(
    machine: &Machine,
    func: &FuncValue,
    parent: FrameRef,
    receiver: Option<Value>,
    args: Vec<Value>,
) -> ExecResult<Activation> {
    let def = machine.program().func_def(func.decl)?;
    if args.len() != def.params.len() {
        return Err(Fault::malformed(func.decl, "argument count does not match parameters"));
    }
    let frame = Frame::new(def.frame_size, Some(parent));
    if let (Some(slot), Some(value)) = (def.receiver, receiver) {
        put(&frame, slot, value, func.decl)?;
    }
    for (&slot, value) in def.params.iter().zip(args) {
        put(&frame, slot, value, func.decl)?;
    }
    Ok(Activation {
        frame,
        decl: func.decl,
        entry: def.entry,
        results: def.results,
    })
}

/// Walk a bound activation to completion and return its result slots.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(
        func = cx.program().func_def(act.decl).map_or("", |def| def.name.as_str()),
        depth = cx.depth()
    )
)]
pub(crate) fn run_activation(cx: &Exec<'_>, act: Activation) -> ExecResult<Vec<Value>> {
    let inner = cx.enter()?;
    let outcome = ensure_sufficient_stack(|| run_cfg(&inner, act.entry, &act.frame));
    let results = outcome.and_then(|()| {
        act.frame
            .range(0, act.results)
            .ok_or(Fault::malformed(act.decl, "more results than frame slots"))
    });
    if act.frame.release_self_cycles() {
        tracing::trace!(decl = %act.decl, "released self-captured frame");
    }
    results
}

/// Call `callee` from `caller` and return its results.
pub(crate) fn invoke(
    cx: &Exec<'_>,
    callee: &Value,
    caller: &FrameRef,
    recv: Option<ReceiverArg<'_>>,
    args: &[NodeId],
    fork: bool,
) -> ExecResult<Vec<Value>> {
    match callee {
        Value::Func(func) => {
            let act = prepare(cx, func, caller, recv, args, fork)?;
            run_activation(cx, act)
        }
        Value::Native(native) => {
            let args = native_args(cx, recv, args, caller)?;
            call_native(cx.machine(), native, &args)
        }
        Value::Nil => Err(Fault::NilDereference { op: "call" }),
        other => Err(Fault::mismatch("call", "func", other.type_name())),
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(native = native.name()))]
pub(crate) fn call_native(
    machine: &Machine,
    native: &NativeFunc,
    args: &[Value],
) -> ExecResult<Vec<Value>> {
    native.call(machine, args)
}

/// `f(args...)` and `recv.m(args...)`.
pub(crate) fn call(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    let (callee, recv) = callee_parts(cx, id)?;
    let func = cx.value(callee, frame)?;
    let results = invoke(cx, &func, frame, recv, &node.children[1..], node.is_fork())?;
    write_results(cx, id, frame, results)
}

/// `go f(args...)`: arguments are evaluated now, in the caller; the body
/// runs on a new activation and the caller continues immediately.
pub(crate) fn go_call(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    let (callee, recv) = callee_parts(cx, id)?;
    let launcher = cx.machine().launcher();
    let machine = cx.machine().clone();
    let task = match cx.value(callee, frame)? {
        Value::Func(func) => {
            let act = prepare(cx, &func, frame, recv, &node.children[1..], node.is_fork())?;
            launcher.launch(move || {
                let cx = Exec::root(&machine);
                run_activation(&cx, act).map(drop)
            })?
        }
        Value::Native(native) => {
            let args = native_args(cx, recv, &node.children[1..], frame)?;
            launcher.launch(move || call_native(&machine, &native, &args).map(drop))?
        }
        Value::Nil => return Err(Fault::NilDereference { op: "go" }),
        other => return Err(Fault::mismatch("go", "func", other.type_name())),
    };
    tracing::debug!(task, node = %id, "spawned activation");
    Ok(())
}

/// Callee node and, for a method selector `x.m`, the receiver operand.
fn callee_parts<'p>(cx: &Exec<'p>, id: NodeId) -> ExecResult<(NodeId, Option<ReceiverArg<'p>>)> {
    let callee = cx.child(id, 0)?;
    let node = cx.node(callee);
    if node.kind != Kind::Selector {
        return Ok((callee, None));
    }
    let receiver = cx.child(callee, 0)?;
    let seq = node.child(1).and_then(|seq| cx.node(seq).indices());
    Ok((callee, Some(ReceiverArg { node: receiver, seq })))
}

/// The receiver itself, or the embedded field its promotion path leads to.
fn receiver_value(cx: &Exec<'_>, recv: ReceiverArg<'_>, caller: &Frame) -> ExecResult<Value> {
    match recv.seq {
        Some(seq) if !seq.is_empty() => resolve::value_seq(cx.program(), recv.node, seq, caller),
        _ => cx.value(recv.node, caller),
    }
}

fn collect_args(cx: &Exec<'_>, args: &[NodeId], caller: &Frame) -> ExecResult<Vec<Value>> {
    let mut values = Vec::with_capacity(args.len());
    for &arg in args {
        values.extend(cx.spread(arg, caller)?);
    }
    Ok(values)
}

/// Arguments for a native: the receiver, if any, comes first.
fn native_args(
    cx: &Exec<'_>,
    recv: Option<ReceiverArg<'_>>,
    args: &[NodeId],
    caller: &Frame,
) -> ExecResult<Vec<Value>> {
    let mut values = Vec::with_capacity(args.len() + 1);
    if let Some(recv) = recv {
        values.push(receiver_value(cx, recv, caller)?);
    }
    values.extend(collect_args(cx, args, caller)?);
    Ok(values)
}

/// Copy results into the call node's `width` destination slots. A call
/// used as a statement has no slot and discards its results.
fn write_results(cx: &Exec<'_>, id: NodeId, frame: &Frame, results: Vec<Value>) -> ExecResult {
    let node = cx.node(id);
    let Some(base) = node.slot else {
        return Ok(());
    };
    for (i, value) in results.into_iter().take(node.width).enumerate() {
        if !frame.set(base + i, value) {
            return Err(Fault::malformed(id, "result slots beyond frame size"));
        }
    }
    Ok(())
}

pub(crate) fn lexical_parent(machine: &Machine, func: &FuncValue) -> FrameRef {
    match &func.env {
        Some(env) => FrameRef::clone(env),
        None => FrameRef::clone(machine.globals()),
    }
}

fn put(frame: &Frame, slot: usize, value: Value, decl: NodeId) -> ExecResult {
    if frame.set(slot, value) {
        Ok(())
    } else {
        Err(Fault::malformed(decl, "parameter slot beyond frame size"))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
