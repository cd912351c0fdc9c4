use super::*;
use crate::{Kind, Literal};
use pretty_assertions::assert_eq;

#[test]
fn add_adopts_children() {
    let mut b = GraphBuilder::new();
    let one = b.add(Node::lit(Literal::Int(1)));
    let x = b.add(Node::var(2, 0));
    let sum = b.add(Node::new(Kind::Add).with_slot(3).with_children(&[one, x]));
    let g = b.finish();

    assert_eq!(g.node(one).parent, Some(sum));
    assert_eq!(g.node(x).parent, Some(sum));
    assert_eq!(g.node(sum).parent, None);
    assert_eq!(g.node(sum).child(1), Some(x));
    assert_eq!(g.node(sum).child(2), None);
}

#[test]
fn chain_and_branch_wire_successors() {
    let mut b = GraphBuilder::new();
    let a = b.add(Node::new(Kind::Nop));
    let c = b.add(Node::new(Kind::Lower).with_slot(0));
    let d = b.add(Node::new(Kind::Nop));
    let e = b.add(Node::new(Kind::Nop));
    b.chain(&[a, c]);
    b.branch(c, Some(d), e);
    let g = b.finish();

    assert_eq!(g.node(a).tnext, Some(c));
    assert_eq!(g.node(c).tnext, Some(d));
    assert_eq!(g.node(c).fnext, Some(e));
    assert_eq!(g.node(d).tnext, None);
}

#[test]
fn define_attaches_layout() {
    let mut b = GraphBuilder::new();
    let decl = b.add(Node::new(Kind::FuncDecl));
    b.define(
        decl,
        FuncDef {
            name: "f".into(),
            frame_size: 4,
            params: vec![2, 3],
            results: 2,
            ..FuncDef::default()
        },
    );
    b.global_frame_size(3);
    let g = b.finish();

    let def = g.node(decl).func_def();
    assert_eq!(def.map(|d| d.params.clone()), Some(vec![2, 3]));
    assert_eq!(g.global_frame_size(), 3);
    assert_eq!(g.len(), 1);
}

#[test]
fn types_are_indexed_in_order() {
    let mut b = GraphBuilder::new();
    let int = b.add_type(Type::Int);
    let slice = b.add_type(Type::Slice { elem: int });
    let g = b.finish();

    assert_eq!(g.ty(int), &Type::Int);
    assert_eq!(g.ty(slice).category(), "slice");
}
