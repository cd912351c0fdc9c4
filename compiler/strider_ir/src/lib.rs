//! Strider IR - the annotated control-flow graph.
//!
//! The front end (parser, type checker, CFG builder) lowers a program into a
//! [`Graph`]: an arena of [`Node`]s, each tagged with an operation [`Kind`],
//! its frame slot, lexical level and successor edges. The execution engine
//! in `strider_eval` walks this graph directly.
//!
//! The graph is read-only once [`GraphBuilder::finish`] returns it.

mod graph;
mod ids;
mod kind;
mod node;
mod types;

pub use graph::{Graph, GraphBuilder};
pub use ids::{NodeId, TypeId};
pub use kind::Kind;
pub use node::{Children, FuncDef, Literal, Node, Payload};
pub use types::{Field, Type};
