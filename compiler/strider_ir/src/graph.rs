//! Node arena and its builder.

use crate::{FuncDef, Node, NodeId, Payload, Type, TypeId};

/// A finalized, read-only control-flow graph.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    types: Vec<Type>,
    global_frame_size: usize,
}

impl Graph {
    /// Get a node by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this graph's builder.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a type descriptor by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this graph's builder.
    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slots in the package-level frame shared by all top-level functions.
    pub fn global_frame_size(&self) -> usize {
        self.global_frame_size
    }

    /// Iterate over `(id, node)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (node_id(i), n))
    }
}

fn node_id(index: usize) -> NodeId {
    NodeId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

fn type_id(index: usize) -> TypeId {
    TypeId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Incremental graph assembly.
///
/// Children must be added before their parent; adding a node records it as
/// the parent of each of its children. Successor edges and function
/// layouts can be patched afterwards, which allows loops and recursion.
#[derive(Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type descriptor.
    pub fn add_type(&mut self, ty: Type) -> TypeId {
        let id = type_id(self.graph.types.len());
        self.graph.types.push(ty);
        id
    }

    /// Add a node, adopting its children.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = node_id(self.graph.nodes.len());
        for &child in &node.children {
            self.graph.nodes[child.index()].parent = Some(id);
        }
        self.graph.nodes.push(node);
        id
    }

    /// Mutable access for late patching.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.graph.nodes[id.index()]
    }

    /// Set the unconditional successor of `from`.
    pub fn link(&mut self, from: NodeId, to: NodeId) {
        self.node_mut(from).tnext = Some(to);
    }

    /// Make `from` a branch node: `on_true` when its value is true,
    /// `on_false` otherwise.
    pub fn branch(&mut self, from: NodeId, on_true: Option<NodeId>, on_false: NodeId) {
        let node = self.node_mut(from);
        node.tnext = on_true;
        node.fnext = Some(on_false);
    }

    /// Link each node to the next one, in order.
    pub fn chain(&mut self, ids: &[NodeId]) {
        for pair in ids.windows(2) {
            self.link(pair[0], pair[1]);
        }
    }

    /// Attach a declaration layout to a `FuncDecl` node.
    pub fn define(&mut self, decl: NodeId, def: FuncDef) {
        self.node_mut(decl).payload = Payload::Def(def);
    }

    /// Set the size of the package-level frame.
    pub fn global_frame_size(&mut self, size: usize) {
        self.graph.global_frame_size = size;
    }

    /// Freeze the graph.
    pub fn finish(self) -> Graph {
        self.graph
    }
}

#[cfg(test)]
mod tests;
