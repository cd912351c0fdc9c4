//! Function values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use strider_ir::NodeId;

use super::Value;
use crate::{ExecResult, FrameRef, Machine};

/// An interpreted function: its declaration node plus, for closures, the
/// frame the literal was evaluated in.
#[derive(Clone)]
pub struct FuncValue {
    pub decl: NodeId,
    /// Lexically enclosing frame. `None` for top-level declarations, which
    /// link to the machine's global frame.
    pub env: Option<FrameRef>,
}

impl FuncValue {
    /// A top-level function.
    pub fn top_level(decl: NodeId) -> Self {
        FuncValue { decl, env: None }
    }

    /// A closure over `env`.
    pub fn closure(decl: NodeId, env: FrameRef) -> Self {
        FuncValue {
            decl,
            env: Some(env),
        }
    }

    fn env_addr(&self) -> Option<usize> {
        self.env.as_ref().map(|f| Arc::as_ptr(f) as usize)
    }
}

impl PartialEq for FuncValue {
    fn eq(&self, other: &Self) -> bool {
        self.decl == other.decl && self.env_addr() == other.env_addr()
    }
}

impl Hash for FuncValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.decl.hash(state);
        self.env_addr().hash(state);
    }
}

/// Signature of a host-provided function.
///
/// Natives follow the interpreted calling convention: arguments arrive in
/// order (multi-result arguments already spread) and the returned values
/// are copied into the caller's destination slots.
pub type NativeFn = fn(&Machine, &[Value]) -> ExecResult<Vec<Value>>;

/// A named native function.
#[derive(Clone)]
pub struct NativeFunc {
    name: Arc<str>,
    func: NativeFn,
}

impl NativeFunc {
    pub fn new(name: impl Into<Arc<str>>, func: NativeFn) -> Self {
        NativeFunc {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, machine: &Machine, args: &[Value]) -> ExecResult<Vec<Value>> {
        (self.func)(machine, args)
    }
}

impl fmt::Debug for NativeFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunc({})", self.name)
    }
}
