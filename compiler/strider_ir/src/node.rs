//! CFG nodes.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::{Kind, NodeId, TypeId};

/// Ordered children of a node. Most operations have at most four operands.
pub type Children = SmallVec<[NodeId; 4]>;

/// Compile-time constant carried on a `BasicLit` node.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
}

/// Precomputed layout of a function or method declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FuncDef {
    /// Name, for logging.
    pub name: String,
    /// Number of slots in each activation frame.
    pub frame_size: usize,
    /// Slot receiving the method receiver, if this is a method.
    pub receiver: Option<usize>,
    /// Slot of each parameter, in declaration order.
    pub params: Vec<usize>,
    /// Number of results, stored in slots `0..results` on return.
    pub results: usize,
    /// First node of the body. `None` for an empty body.
    pub entry: Option<NodeId>,
}

/// Per-kind annotation attached by the front end.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    /// Constant value of a literal or constant identifier.
    Lit(Literal),
    /// Identifier or selector bound to a function declaration.
    Func(NodeId),
    /// Identifier bound to a native symbol, by qualified name.
    Native(Arc<str>),
    /// Field-promotion or nested-index sequence.
    Indices(Vec<usize>),
    /// Struct field index of a keyed composite element.
    Field(usize),
    /// Declaration layout, on `FuncDecl` nodes.
    Def(FuncDef),
    /// On a call node: the callee frame links to the calling frame.
    Fork,
}

/// A single CFG node.
///
/// Built once by the front end; the engine never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: Kind,
    pub children: Children,
    /// Structural parent, set when the node is attached as a child.
    pub parent: Option<NodeId>,
    /// Static type descriptor.
    pub ty: Option<TypeId>,
    /// Frame slot holding this node's value. `None` means the value is
    /// carried on the node itself.
    pub slot: Option<usize>,
    /// Ancestor-frame hops from the use site to the frame owning `slot`.
    pub level: usize,
    /// Contiguous slots occupied by the value, starting at `slot`.
    /// Greater than one for calls returning several results.
    pub width: usize,
    /// Unconditional (or true-branch) successor.
    pub tnext: Option<NodeId>,
    /// False-branch successor. When present, the node's own value selects
    /// the branch.
    pub fnext: Option<NodeId>,
    pub payload: Payload,
}

impl Node {
    /// Create a node of the given kind with no slot and no children.
    pub fn new(kind: Kind) -> Self {
        Node {
            kind,
            children: Children::new(),
            parent: None,
            ty: None,
            slot: None,
            level: 0,
            width: 1,
            tnext: None,
            fnext: None,
            payload: Payload::None,
        }
    }

    /// A constant literal.
    pub fn lit(value: Literal) -> Self {
        Node::new(Kind::BasicLit).with_payload(Payload::Lit(value))
    }

    /// An identifier stored in `slot` of the frame `level` hops up.
    pub fn var(slot: usize, level: usize) -> Self {
        Node::new(Kind::Ident).with_slot(slot).with_level(level)
    }

    #[must_use]
    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: &[NodeId]) -> Self {
        self.children = children.iter().copied().collect();
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Child at `i`, if present.
    #[inline]
    pub fn child(&self, i: usize) -> Option<NodeId> {
        self.children.get(i).copied()
    }

    /// The declaration layout, for `FuncDecl` nodes.
    pub fn func_def(&self) -> Option<&FuncDef> {
        match &self.payload {
            Payload::Def(def) => Some(def),
            _ => None,
        }
    }

    /// The index sequence carried by this node, if any.
    pub fn indices(&self) -> Option<&[usize]> {
        match &self.payload {
            Payload::Indices(seq) => Some(seq),
            _ => None,
        }
    }

    /// Whether a call through this node forks its callee's frame linkage.
    pub fn is_fork(&self) -> bool {
        matches!(self.payload, Payload::Fork)
    }
}
