//! Scenario tests: small graphs assembled by hand, run on a real machine.

mod concurrency;
mod faults;

use std::sync::Arc;

use strider_ir::{FuncDef, Graph, GraphBuilder, Kind, Literal, Node, NodeId, Payload, Type, TypeId};

use crate::{buffer_output, Machine, MachineBuilder, MachineConfig, NativeRegistry, SharedOutput};

/// Thin assembler over [`GraphBuilder`] for hand-written test graphs.
#[derive(Default)]
pub(crate) struct Asm {
    b: GraphBuilder,
}

impl Asm {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn int(&mut self, n: i64) -> NodeId {
        self.b.add(Node::lit(Literal::Int(n)))
    }

    pub(crate) fn boolean(&mut self, b: bool) -> NodeId {
        self.b.add(Node::lit(Literal::Bool(b)))
    }

    pub(crate) fn str(&mut self, s: &str) -> NodeId {
        self.b.add(Node::lit(Literal::Str(Arc::from(s))))
    }

    /// Identifier in the current frame.
    pub(crate) fn var(&mut self, slot: usize) -> NodeId {
        self.b.add(Node::var(slot, 0))
    }

    /// Identifier `level` frames up.
    pub(crate) fn outer(&mut self, slot: usize, level: usize) -> NodeId {
        self.b.add(Node::var(slot, level))
    }

    /// The blank identifier `_`.
    pub(crate) fn blank(&mut self) -> NodeId {
        self.b.add(Node::new(Kind::Ident))
    }

    /// Identifier naming a builtin in call position.
    pub(crate) fn builtin(&mut self) -> NodeId {
        self.blank()
    }

    pub(crate) fn type_expr(&mut self, ty: TypeId) -> NodeId {
        self.b.add(Node::new(Kind::TypeExpr).with_type(ty))
    }

    pub(crate) fn ty(&mut self, ty: Type) -> TypeId {
        self.b.add_type(ty)
    }

    /// An operation with an optional result slot.
    pub(crate) fn op(&mut self, kind: Kind, slot: Option<usize>, children: &[NodeId]) -> NodeId {
        let mut node = Node::new(kind).with_children(children);
        node.slot = slot;
        self.b.add(node)
    }

    pub(crate) fn add(&mut self, node: Node) -> NodeId {
        self.b.add(node)
    }

    /// A function declaration whose layout is attached later with
    /// [`Asm::define`], once the body exists.
    pub(crate) fn decl(&mut self) -> NodeId {
        self.b.add(Node::new(Kind::FuncDecl))
    }

    pub(crate) fn define(&mut self, decl: NodeId, def: FuncDef) {
        self.b.define(decl, def);
    }

    /// Identifier bound to a function declaration.
    pub(crate) fn func_ref(&mut self, decl: NodeId) -> NodeId {
        self.b.add(Node::new(Kind::Ident).with_payload(Payload::Func(decl)))
    }

    /// Identifier bound to a native symbol.
    pub(crate) fn native(&mut self, name: &str) -> NodeId {
        self.b.add(Node::new(Kind::Ident).with_payload(Payload::Native(Arc::from(name))))
    }

    /// Call node writing `width` results from `slot`.
    pub(crate) fn call(&mut self, slot: Option<usize>, width: usize, children: &[NodeId]) -> NodeId {
        let id = self.op(Kind::Call, slot, children);
        self.b.node_mut(id).width = width;
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.b.node_mut(id)
    }

    pub(crate) fn chain(&mut self, ids: &[NodeId]) {
        self.b.chain(ids);
    }

    pub(crate) fn link(&mut self, from: NodeId, to: NodeId) {
        self.b.link(from, to);
    }

    pub(crate) fn branch(&mut self, from: NodeId, on_true: Option<NodeId>, on_false: NodeId) {
        self.b.branch(from, on_true, on_false);
    }

    pub(crate) fn globals(&mut self, size: usize) {
        self.b.global_frame_size(size);
    }

    pub(crate) fn finish(self) -> Graph {
        self.b.finish()
    }

    /// Load into a machine printing into a buffer.
    pub(crate) fn machine(self) -> (Machine, SharedOutput) {
        self.machine_with(MachineConfig::default())
    }

    pub(crate) fn machine_with(self, config: MachineConfig) -> (Machine, SharedOutput) {
        let out = buffer_output();
        let machine = builder(self.finish())
            .output(Arc::clone(&out))
            .config(config)
            .build()
            .unwrap();
        (machine, out)
    }
}

pub(crate) fn builder(graph: Graph) -> MachineBuilder {
    Machine::builder(graph).natives(NativeRegistry::with_std())
}

/// Layout of a function with `frame_size` slots.
pub(crate) fn def(name: &str, frame_size: usize, params: &[usize], results: usize, entry: NodeId) -> FuncDef {
    FuncDef {
        name: name.to_string(),
        frame_size,
        receiver: None,
        params: params.to_vec(),
        results,
        entry: Some(entry),
    }
}
