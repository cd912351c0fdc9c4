//! Per-activation execution context.

use strider_ir::{Node, NodeId};

use crate::{resolve, ExecResult, Fault, Frame, Machine, Program, Value};

/// What every primitive operation receives besides its node and frame:
/// the machine and the current call depth of this activation chain.
#[derive(Clone, Copy)]
pub struct Exec<'m> {
    machine: &'m Machine,
    depth: usize,
}

impl<'m> Exec<'m> {
    /// Context for the outermost activation of a thread.
    pub(crate) fn root(machine: &'m Machine) -> Self {
        Exec { machine, depth: 0 }
    }

    pub fn machine(&self) -> &'m Machine {
        self.machine
    }

    pub fn program(&self) -> &'m Program {
        self.machine.program()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &'m Node {
        self.program().node(id)
    }

    /// Context for a nested activation, enforcing the configured depth limit.
    pub(crate) fn enter(&self) -> ExecResult<Exec<'m>> {
        let depth = self.depth + 1;
        match self.machine.config().max_call_depth {
            Some(limit) if depth > limit => Err(Fault::StackOverflow { depth: limit }),
            _ => Ok(Exec {
                machine: self.machine,
                depth,
            }),
        }
    }

    /// Child `i` of `id`.
    #[inline]
    pub(crate) fn child(&self, id: NodeId, i: usize) -> ExecResult<NodeId> {
        self.node(id)
            .child(i)
            .ok_or(Fault::malformed(id, "missing operand"))
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId, frame: &Frame) -> ExecResult<Value> {
        resolve::value(self.program(), id, frame)
    }

    /// Resolve child `i` of `id`.
    #[inline]
    pub(crate) fn operand(&self, id: NodeId, i: usize, frame: &Frame) -> ExecResult<Value> {
        self.value(self.child(id, i)?, frame)
    }

    /// Every value `id` produces: one for ordinary operands, `width`
    /// contiguous slots for a multi-result call.
    pub(crate) fn spread(&self, id: NodeId, frame: &Frame) -> ExecResult<Vec<Value>> {
        let node = self.node(id);
        match node.slot {
            Some(slot) if node.width > 1 => resolve::frame_at(frame, node.level, id)?
                .range(slot, node.width)
                .ok_or(Fault::malformed(id, "result slots beyond frame size")),
            _ => Ok(vec![self.value(id, frame)?]),
        }
    }

    /// Write an operation's result into its own slot.
    #[inline]
    pub(crate) fn set_own(&self, id: NodeId, frame: &Frame, value: Value) -> ExecResult {
        let slot = self
            .node(id)
            .slot
            .ok_or(Fault::malformed(id, "operation without result slot"))?;
        if frame.set(slot, value) {
            Ok(())
        } else {
            Err(Fault::malformed(id, "slot index beyond frame size"))
        }
    }

    /// Write to an assignment destination.
    #[inline]
    pub(crate) fn store(&self, id: NodeId, frame: &Frame, value: Value) -> ExecResult {
        resolve::store(self.program(), id, frame, value)
    }
}
