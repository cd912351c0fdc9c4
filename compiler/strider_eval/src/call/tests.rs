use std::sync::Arc;

use pretty_assertions::assert_eq;
use strider_ir::{FuncDef, Kind};

use super::*;
use crate::tests::{def, Asm};

/// `func (r T) m(a, b int) int`, body `return a`, frame [r, a, b, result].
fn method_machine() -> (Machine, NodeId) {
    let mut a = Asm::new();
    let decl = a.decl();
    let arg = a.var(1);
    let ret = a.op(Kind::Return, None, &[arg]);
    a.define(
        decl,
        FuncDef {
            name: "m".into(),
            frame_size: 4,
            receiver: Some(0),
            params: vec![1, 2],
            results: 1,
            entry: Some(ret),
        },
    );
    (a.machine().0, decl)
}

#[test]
fn bind_places_receiver_and_arguments() {
    let (machine, decl) = method_machine();
    let func = FuncValue::top_level(decl);
    let act = bind(
        &machine,
        &func,
        FrameRef::clone(machine.globals()),
        Some(Value::from("self")),
        vec![Value::Int(1), Value::Int(2)],
    )
    .unwrap();

    assert_eq!(
        act.frame.snapshot(),
        vec![Value::from("self"), Value::Int(1), Value::Int(2), Value::Nil]
    );
    assert_eq!(act.results, 1);
    assert!(Arc::ptr_eq(act.frame.parent().unwrap(), machine.globals()));
}

#[test]
fn bind_rejects_wrong_argument_count() {
    let (machine, decl) = method_machine();
    let func = FuncValue::top_level(decl);
    let act = bind(
        &machine,
        &func,
        FrameRef::clone(machine.globals()),
        None,
        vec![Value::Int(1)],
    );
    assert!(matches!(act, Err(Fault::Malformed { .. })));
}

#[test]
fn run_activation_returns_result_slots() {
    let (machine, decl) = method_machine();
    let func = FuncValue::top_level(decl);
    let act = bind(
        &machine,
        &func,
        FrameRef::clone(machine.globals()),
        None,
        vec![Value::Int(8), Value::Int(9)],
    )
    .unwrap();
    // Result slot 0 overlaps the receiver slot in this layout.
    let results = run_activation(&Exec::root(&machine), act).unwrap();
    assert_eq!(results, vec![Value::Int(8)]);
}

#[test]
fn lexical_parent_prefers_captured_frame() {
    let mut a = Asm::new();
    let decl = a.decl();
    let body = a.op(Kind::Nop, None, &[]);
    a.define(decl, def("f", 0, &[], 0, body));
    let (machine, _) = a.machine();

    let top = FuncValue::top_level(decl);
    assert!(Arc::ptr_eq(&lexical_parent(&machine, &top), machine.globals()));

    let env = Frame::root(2);
    let closure = FuncValue::closure(decl, Arc::clone(&env));
    assert!(Arc::ptr_eq(&lexical_parent(&machine, &closure), &env));
}

#[test]
fn depth_limit_applies_to_activations() {
    let mut a = Asm::new();
    let decl = a.decl();
    let body = a.op(Kind::Nop, None, &[]);
    a.define(decl, def("f", 0, &[], 0, body));
    let config = crate::MachineConfig {
        max_call_depth: Some(0),
        ..crate::MachineConfig::default()
    };
    let (machine, _) = a.machine_with(config);
    let act = bind(
        &machine,
        &FuncValue::top_level(decl),
        FrameRef::clone(machine.globals()),
        None,
        vec![],
    )
    .unwrap();
    assert_eq!(
        run_activation(&Exec::root(&machine), act),
        Err(Fault::StackOverflow { depth: 0 })
    );
}
