//! Static type descriptors.
//!
//! The engine consults types only to build zero values and to pick the
//! container produced by `make`.

use crate::TypeId;

/// Named struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
}

/// A type descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Type {
    Bool,
    Int,
    Float,
    String,
    Slice { elem: TypeId },
    Array { elem: TypeId, len: usize },
    Map { key: TypeId, value: TypeId },
    Chan { elem: TypeId },
    Struct { fields: Vec<Field> },
    Pointer { elem: TypeId },
    Func,
    /// Interface or otherwise dynamically typed.
    Any,
}

impl Type {
    /// Short category name, for diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::String => "string",
            Type::Slice { .. } => "slice",
            Type::Array { .. } => "array",
            Type::Map { .. } => "map",
            Type::Chan { .. } => "chan",
            Type::Struct { .. } => "struct",
            Type::Pointer { .. } => "pointer",
            Type::Func => "func",
            Type::Any => "interface",
        }
    }
}
