//! Composite literal construction.
//!
//! Child 0 of every literal is its type expression; the elements follow.
//! Each evaluation allocates a fresh backing store.

use strider_ir::{Kind, NodeId, Payload, Type, TypeId};

use crate::resolve::to_index;
use crate::{zero_value, Exec, ExecResult, Fault, FrameRef, MapHandle, Value};

/// `[]T{a, b, c}` or `[N]T{a, b}`; fixed-length arrays are zero-padded.
pub(crate) fn array_lit(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    let mut items = elements(cx, &node.children, frame)?;
    if let Some(Type::Array { elem, len }) =
        literal_type(cx, id).map(|ty| cx.program().graph().ty(ty))
    {
        while items.len() < *len {
            items.push(zero_value(cx.program().graph(), Some(*elem)));
        }
    }
    cx.set_own(id, frame, Value::slice(items))
}

/// `map[K]V{k: v, ...}`; a later duplicate key overwrites an earlier one.
pub(crate) fn map_lit(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let map = MapHandle::new();
    for &pair in cx.node(id).children.iter().skip(1) {
        let key = cx.operand(pair, 0, frame)?;
        let value = cx.operand(pair, 1, frame)?;
        map.insert(key, value);
    }
    cx.set_own(id, frame, Value::Map(map))
}

/// `T{a, b}`: fields in declaration order, trailing fields zero-filled.
pub(crate) fn composite_lit(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    let mut fields = elements(cx, &node.children, frame)?;
    if let Some(Type::Struct { fields: decl }) =
        literal_type(cx, id).map(|ty| cx.program().graph().ty(ty))
    {
        for field in decl.iter().skip(fields.len()) {
            fields.push(zero_value(cx.program().graph(), Some(field.ty)));
        }
    }
    cx.set_own(id, frame, Value::structure(fields))
}

/// `T{f: v, ...}`: a zero struct with only the keyed fields written.
pub(crate) fn composite_sparse(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let node = cx.node(id);
    let value = cx.program().zero(literal_type(cx, id));
    let fields = value.as_composite("keyed literal")?;
    for &pair in node.children.iter().skip(1) {
        let element = cx.node(pair);
        let Payload::Field(index) = element.payload else {
            return Err(Fault::malformed(pair, "keyed element without field index"));
        };
        let field_value = if element.kind == Kind::KeyValue {
            cx.operand(pair, 1, frame)?
        } else {
            cx.value(pair, frame)?
        };
        fields.set(to_index(index), field_value)?;
    }
    cx.set_own(id, frame, value)
}

/// The literal's own type, or failing that its type expression's.
fn literal_type(cx: &Exec<'_>, id: NodeId) -> Option<TypeId> {
    let node = cx.node(id);
    node.ty
        .or_else(|| node.child(0).and_then(|ty_expr| cx.node(ty_expr).ty))
}

fn elements(cx: &Exec<'_>, children: &[NodeId], frame: &FrameRef) -> ExecResult<Vec<Value>> {
    children
        .iter()
        .skip(1)
        .map(|&child| cx.value(child, frame))
        .collect()
}
