//! Runtime faults.
//!
//! A fault is fatal for the activation that raised it: the walker stops and
//! the fault propagates out through every enclosing call to the host entry
//! point (or, for a spawned activation, to the launcher). Nothing inside the
//! engine catches a fault. Outcomes a program can legitimately observe, such
//! as a receive on a closed channel or a map miss, are values, not faults.

use strider_ir::NodeId;
use thiserror::Error;

/// Result of a primitive operation or activation.
pub type ExecResult<T = ()> = Result<T, Fault>;

/// Fatal runtime condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// A slot held a value of a different variant than its reader expects.
    /// Always a front-end invariant violation.
    #[error("type mismatch in {op}: expected {expected}, found {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("index out of range [{index}] with length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("integer divide by zero")]
    DivisionByZero,

    #[error("assignment to entry in nil map")]
    NilMap,

    #[error("{op} on nil channel")]
    NilChannel { op: &'static str },

    #[error("send on closed channel")]
    SendOnClosedChannel,

    #[error("close of closed channel")]
    CloseOfClosedChannel,

    #[error("nil pointer dereference in {op}")]
    NilDereference { op: &'static str },

    #[error("call depth limit of {depth} exceeded")]
    StackOverflow { depth: usize },

    /// The graph is missing an annotation the operation depends on.
    #[error("malformed graph at node {node}: {detail}")]
    Malformed { node: NodeId, detail: &'static str },

    #[error("unknown native symbol `{name}`")]
    UnknownNative { name: String },

    #[error("no function named `{name}`")]
    UnknownFunction { name: String },

    /// A native callable reported failure.
    #[error("{name}: {message}")]
    Native { name: String, message: String },

    #[error("failed to start activation thread: {message}")]
    Spawn { message: String },

    /// A spawned activation panicked instead of returning.
    #[error("activation panicked: {message}")]
    Panicked { message: String },
}

impl Fault {
    pub(crate) fn mismatch(op: &'static str, expected: &'static str, found: &'static str) -> Self {
        Fault::TypeMismatch {
            op,
            expected,
            found,
        }
    }

    pub(crate) fn malformed(node: NodeId, detail: &'static str) -> Self {
        Fault::Malformed { node, detail }
    }
}
