//! Loaded programs.
//!
//! Loading binds each node of a finalized [`Graph`] to its primitive
//! operation and caches every value that lives on a node rather than in a
//! frame (literals, function references, native symbols). After loading the
//! program is immutable and shared by every activation.

use strider_ir::{FuncDef, Graph, Kind, Node, NodeId, Payload, TypeId};

use crate::dispatch::{op_for, Op};
use crate::{zero_value, ExecResult, Fault, FuncValue, NativeRegistry, Value};

/// A graph bound to its operations.
pub struct Program {
    graph: Graph,
    ops: Vec<Op>,
    consts: Vec<Option<Value>>,
}

impl Program {
    /// Bind `graph`, resolving native symbols against `natives`.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = graph.len()))]
    pub fn load(graph: Graph, natives: &NativeRegistry) -> ExecResult<Program> {
        let mut ops = Vec::with_capacity(graph.len());
        let mut consts = Vec::with_capacity(graph.len());
        for (id, node) in graph.iter() {
            ops.push(op_for(node.kind));
            consts.push(carried_value(id, node, natives)?);
        }
        tracing::debug!(
            constants = consts.iter().filter(|c| c.is_some()).count(),
            "program loaded"
        );
        Ok(Program { graph, ops, consts })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.graph.node(id)
    }

    #[inline]
    pub(crate) fn op(&self, id: NodeId) -> Op {
        self.ops[id.index()]
    }

    /// The value carried on the node itself, if any.
    #[inline]
    pub fn carried(&self, id: NodeId) -> Option<&Value> {
        self.consts.get(id.index()).and_then(Option::as_ref)
    }

    /// Layout of the declaration `decl`.
    pub fn func_def(&self, decl: NodeId) -> ExecResult<&FuncDef> {
        self.node(decl)
            .func_def()
            .ok_or(Fault::malformed(decl, "function value without declaration layout"))
    }

    /// Find a function declaration by name.
    pub fn func(&self, name: &str) -> Option<FuncValue> {
        self.graph.iter().find_map(|(id, node)| match node.func_def() {
            Some(def) if node.kind == Kind::FuncDecl && def.name == name => {
                Some(FuncValue::top_level(id))
            }
            _ => None,
        })
    }

    /// Zero value of `ty`.
    pub fn zero(&self, ty: Option<TypeId>) -> Value {
        zero_value(&self.graph, ty)
    }
}

fn carried_value(id: NodeId, node: &Node, natives: &NativeRegistry) -> ExecResult<Option<Value>> {
    if node.kind == Kind::FuncDecl {
        return Ok(Some(Value::Func(FuncValue::top_level(id))));
    }
    Ok(match &node.payload {
        Payload::Lit(lit) => Some(Value::from(lit)),
        Payload::Func(decl) => Some(Value::Func(FuncValue::top_level(*decl))),
        Payload::Native(name) => match natives.lookup(name) {
            Some(native) => Some(Value::Native(native.clone())),
            None => {
                return Err(Fault::UnknownNative {
                    name: name.to_string(),
                })
            }
        },
        _ if node.kind == Kind::BasicLit => Some(Value::Nil),
        _ => None,
    })
}
