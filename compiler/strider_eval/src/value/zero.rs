//! Zero values of type descriptors.

use strider_ir::{Graph, Type, TypeId};

use super::Value;

/// The zero value of `ty`.
///
/// Arrays and structs get a freshly allocated backing store on every call,
/// so two zero values never alias. A missing descriptor yields `Nil`.
pub fn zero_value(graph: &Graph, ty: Option<TypeId>) -> Value {
    let Some(ty) = ty else {
        return Value::Nil;
    };
    match graph.ty(ty) {
        Type::Bool => Value::Bool(false),
        Type::Int => Value::Int(0),
        Type::Float => Value::Float(0.0),
        Type::String => Value::string(""),
        Type::Array { elem, len } => {
            Value::slice((0..*len).map(|_| zero_value(graph, Some(*elem))).collect())
        }
        Type::Struct { fields } => Value::structure(
            fields
                .iter()
                .map(|field| zero_value(graph, Some(field.ty)))
                .collect(),
        ),
        Type::Slice { .. }
        | Type::Map { .. }
        | Type::Chan { .. }
        | Type::Pointer { .. }
        | Type::Func
        | Type::Any => Value::Nil,
    }
}
