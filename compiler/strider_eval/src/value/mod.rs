//! Runtime values.
//!
//! A [`Value`] is what a frame slot holds. Scalars are stored inline;
//! composites (slices, arrays, structs), maps and channels are shared
//! handles, so copying a value into another slot copies only the handle and
//! both slots alias the same backing store.
//!
//! Equality follows the source language's rules for comparable values:
//! scalars and strings compare by content, every handle compares by
//! identity.

mod channel;
mod composite;
mod func;
mod zero;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use strider_ir::Literal;

use crate::{ExecResult, Fault};

pub use channel::ChanHandle;
pub use composite::{Composite, MapHandle, Pointer};
pub use func::{FuncValue, NativeFn, NativeFunc};
pub use zero::zero_value;

/// A dynamically typed slot value.
#[derive(Clone, Default)]
pub enum Value {
    /// Zero value of slices, maps, channels, pointers, functions and
    /// interfaces. Also the content of a slot no operation has written yet.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Slice or array: handle to a shared backing array.
    Slice(Composite),
    /// Struct: handle to a shared field array.
    Struct(Composite),
    /// Address of one element of a backing array.
    Ptr(Pointer),
    Map(MapHandle),
    Chan(ChanHandle),
    /// Interpreted function or closure.
    Func(FuncValue),
    /// Host-provided function.
    Native(NativeFunc),
}

impl Value {
    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// A slice over a fresh backing array.
    pub fn slice(items: Vec<Value>) -> Self {
        Value::Slice(Composite::new(items))
    }

    /// A struct over a fresh field array.
    pub fn structure(fields: Vec<Value>) -> Self {
        Value::Struct(Composite::new(fields))
    }

    /// Name of the dynamic variant, for fault messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Slice(_) => "slice",
            Value::Struct(_) => "struct",
            Value::Ptr(_) => "pointer",
            Value::Map(_) => "map",
            Value::Chan(_) => "chan",
            Value::Func(_) => "func",
            Value::Native(_) => "native func",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self, op: &'static str) -> ExecResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Fault::mismatch(op, "bool", other.type_name())),
        }
    }

    pub fn as_int(&self, op: &'static str) -> ExecResult<i64> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(Fault::mismatch(op, "int", other.type_name())),
        }
    }

    /// Slice, array or struct backing store.
    pub fn as_composite(&self, op: &'static str) -> ExecResult<&Composite> {
        match self {
            Value::Slice(c) | Value::Struct(c) => Ok(c),
            Value::Nil => Err(Fault::NilDereference { op }),
            other => Err(Fault::mismatch(op, "slice or struct", other.type_name())),
        }
    }

    /// Map handle; `Ok(None)` for a nil map.
    pub fn as_map(&self, op: &'static str) -> ExecResult<Option<&MapHandle>> {
        match self {
            Value::Map(m) => Ok(Some(m)),
            Value::Nil => Ok(None),
            other => Err(Fault::mismatch(op, "map", other.type_name())),
        }
    }

    pub fn as_chan(&self, op: &'static str) -> ExecResult<&ChanHandle> {
        match self {
            Value::Chan(c) => Ok(c),
            Value::Nil => Err(Fault::NilChannel { op }),
            other => Err(Fault::mismatch(op, "chan", other.type_name())),
        }
    }

    /// Identity of the backing allocation, for handle equality and hashing.
    fn identity(&self) -> Option<usize> {
        match self {
            Value::Slice(c) | Value::Struct(c) => Some(c.addr()),
            Value::Map(m) => Some(m.addr()),
            Value::Chan(c) => Some(c.addr()),
            _ => None,
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Str(s) => Value::Str(Arc::clone(s)),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Ptr(a), Value::Ptr(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a.name() == b.name(),
            (Value::Slice(_), Value::Slice(_))
            | (Value::Struct(_), Value::Struct(_))
            | (Value::Map(_), Value::Map(_))
            | (Value::Chan(_), Value::Chan(_)) => self.identity() == other.identity(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            // +0.0 and -0.0 are equal, so they must hash alike.
            Value::Float(x) => {
                let bits = if *x == 0.0 { 0 } else { x.to_bits() };
                bits.hash(state);
            }
            Value::Str(s) => s.hash(state),
            Value::Ptr(p) => p.hash(state),
            Value::Func(f) => f.hash(state),
            Value::Native(n) => n.name().hash(state),
            Value::Slice(_) | Value::Struct(_) | Value::Map(_) | Value::Chan(_) => {
                self.identity().hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "<nil>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Slice(c) => write_seq(f, "[", &c.snapshot(), "]"),
            Value::Struct(c) => write_seq(f, "{", &c.snapshot(), "}"),
            Value::Ptr(p) => match p.load() {
                Some(v) => write!(f, "&{v}"),
                None => write!(f, "&<dangling>"),
            },
            Value::Map(m) => {
                let mut entries: Vec<String> = m
                    .entries()
                    .into_iter()
                    .map(|(k, v)| format!("{k}:{v}"))
                    .collect();
                entries.sort();
                write!(f, "map[{}]", entries.join(" "))
            }
            Value::Chan(c) => write!(f, "chan({})", c.capacity()),
            Value::Func(func) => write!(f, "func{}", func.decl),
            Value::Native(n) => write!(f, "{}", n.name()),
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            other => write!(f, "{}({other})", other.type_name()),
        }
    }
}
