use pretty_assertions::assert_eq;
use strider_ir::{Kind, NodeId};

use super::{builder, def, Asm};
use crate::{Fault, Value};

/// Run a single operation over literal operands.
fn run_op(kind: Kind, operands: impl FnOnce(&mut Asm) -> Vec<NodeId>) -> Result<(), Fault> {
    let mut a = Asm::new();
    let children = operands(&mut a);
    let op = a.op(kind, Some(0), &children);
    a.globals(1);
    let (machine, _) = a.machine();
    machine.exec(op)
}

#[test]
fn integer_division_and_remainder_by_zero() {
    for kind in [Kind::Quo, Kind::Rem] {
        let fault = run_op(kind, |a| vec![a.int(1), a.int(0)]);
        assert_eq!(fault, Err(Fault::DivisionByZero));
    }
}

#[test]
fn operand_type_mismatch() {
    let fault = run_op(Kind::Add, |a| vec![a.int(1), a.str("x")]);
    assert!(matches!(fault, Err(Fault::TypeMismatch { .. })));

    let fault = run_op(Kind::Not, |a| vec![a.int(1)]);
    assert_eq!(
        fault,
        Err(Fault::TypeMismatch {
            op: "!",
            expected: "bool",
            found: "int",
        })
    );
}

#[test]
fn closing_twice_or_nil() {
    let mut a = Asm::new();
    let ch = a.var(0);
    let builtin = a.builtin();
    let close_nil = a.op(Kind::Close, None, &[builtin, ch]);
    a.globals(1);
    let (machine, _) = a.machine();
    assert_eq!(
        machine.exec(close_nil),
        Err(Fault::NilChannel { op: "close" })
    );

    machine.globals().set(0, Value::Chan(crate::ChanHandle::new(0)));
    machine.exec(close_nil).unwrap();
    assert_eq!(machine.exec(close_nil), Err(Fault::CloseOfClosedChannel));
}

#[test]
fn send_on_closed_channel() {
    let mut a = Asm::new();
    let ch = a.var(0);
    let one = a.int(1);
    let send = a.op(Kind::Send, None, &[ch, one]);
    a.globals(1);
    let (machine, _) = a.machine();

    let chan = crate::ChanHandle::new(1);
    chan.close().unwrap();
    machine.globals().set(0, Value::Chan(chan));
    assert_eq!(machine.exec(send), Err(Fault::SendOnClosedChannel));
}

#[test]
fn calling_nil_or_non_function() {
    let mut a = Asm::new();
    let callee = a.var(0);
    let call = a.call(None, 0, &[callee]);
    a.globals(1);
    let (machine, _) = a.machine();

    assert_eq!(machine.exec(call), Err(Fault::NilDereference { op: "call" }));
    machine.globals().set(0, Value::Int(3));
    assert_eq!(
        machine.exec(call),
        Err(Fault::TypeMismatch {
            op: "call",
            expected: "func",
            found: "int",
        })
    );
}

#[test]
fn unknown_native_fails_at_load() {
    let mut a = Asm::new();
    let missing = a.native("os.Exit");
    a.call(None, 0, &[missing]);
    let fault = builder(a.finish()).build().err();
    assert_eq!(
        fault,
        Some(Fault::UnknownNative {
            name: "os.Exit".to_string()
        })
    );
}

#[test]
fn native_failure_surfaces_as_fault() {
    let mut a = Asm::new();
    let itoa = a.native("strconv.Itoa");
    let s = a.str("not a number");
    let call = a.call(Some(0), 1, &[itoa, s]);
    a.globals(1);
    let (machine, _) = a.machine();
    assert!(matches!(
        machine.exec(call),
        Err(Fault::Native { name, .. }) if name == "strconv.Itoa"
    ));
}

#[test]
fn argument_count_mismatch_is_malformed() {
    let mut a = Asm::new();
    let decl = a.decl();
    let body = a.op(Kind::Nop, None, &[]);
    a.define(decl, def("unary", 1, &[0], 0, body));
    let callee = a.func_ref(decl);
    let call = a.call(None, 0, &[callee]);
    let (machine, _) = a.machine();
    assert!(matches!(machine.exec(call), Err(Fault::Malformed { .. })));
}

#[test]
fn slot_beyond_frame_is_malformed() {
    let mut a = Asm::new();
    let x = a.var(5);
    let one = a.int(1);
    let assign = a.op(Kind::Assign, None, &[x, one]);
    a.globals(1);
    let (machine, _) = a.machine();
    assert!(matches!(machine.exec(assign), Err(Fault::Malformed { .. })));
}

#[test]
fn out_of_range_index() {
    let mut a = Asm::new();
    let ty = a.add(strider_ir::Node::new(Kind::TypeExpr));
    let one = a.int(1);
    let lit = a.op(Kind::ArrayLit, Some(0), &[ty, one]);
    let s = a.var(0);
    let four = a.int(4);
    let read = a.op(Kind::GetIndex, Some(1), &[s, four]);
    a.link(lit, read);
    a.globals(2);
    let (machine, _) = a.machine();
    assert_eq!(
        machine.exec(lit),
        Err(Fault::IndexOutOfRange { index: 4, len: 1 })
    );
}

#[test]
fn negative_make_size() {
    let mut a = Asm::new();
    let int = a.ty(strider_ir::Type::Int);
    let slice = a.ty(strider_ir::Type::Slice { elem: int });
    let builtin = a.builtin();
    let ty = a.type_expr(slice);
    let n = a.int(-1);
    let make = a.op(Kind::Make, Some(0), &[builtin, ty, n]);
    a.globals(1);
    let (machine, _) = a.machine();
    assert_eq!(
        machine.exec(make),
        Err(Fault::IndexOutOfRange { index: -1, len: 0 })
    );
}

#[test]
fn fault_messages() {
    assert_eq!(Fault::DivisionByZero.to_string(), "integer divide by zero");
    assert_eq!(
        Fault::IndexOutOfRange { index: 5, len: 3 }.to_string(),
        "index out of range [5] with length 3"
    );
    assert_eq!(
        Fault::NilChannel { op: "send" }.to_string(),
        "send on nil channel"
    );
}
