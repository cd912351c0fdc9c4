use std::time::Duration;

use pretty_assertions::assert_eq;
use strider_ir::{Kind, NodeId, Payload, Type};

use super::{def, Asm};
use crate::{ChanHandle, Fault, Value};

/// `func producer(ch chan int) { ch <- 7 }`
fn producer(a: &mut Asm) -> NodeId {
    let decl = a.decl();
    let ch = a.var(0);
    let seven = a.int(7);
    let send = a.op(Kind::Send, None, &[ch, seven]);
    a.define(decl, def("producer", 1, &[0], 0, send));
    decl
}

/// `make(chan int)` into `slot`.
fn make_chan(a: &mut Asm, slot: usize) -> NodeId {
    let int = a.ty(Type::Int);
    let chan = a.ty(Type::Chan { elem: int });
    let builtin = a.builtin();
    let ty = a.type_expr(chan);
    a.op(Kind::Make, Some(slot), &[builtin, ty])
}

#[test]
fn spawned_send_unblocks_receive() {
    let mut a = Asm::new();
    let producer = producer(&mut a);
    let make = make_chan(&mut a, 0);
    let callee = a.func_ref(producer);
    let ch = a.var(0);
    let go = a.op(Kind::GoCall, None, &[callee, ch]);
    let ch = a.var(0);
    let recv = a.op(Kind::Recv, Some(1), &[ch]);
    a.chain(&[make, go, recv]);
    a.globals(2);

    let (machine, _) = a.machine();
    machine.exec(make).unwrap();
    assert_eq!(machine.globals().get(1), Some(Value::Int(7)));
    machine.join();
    assert_eq!(machine.launcher().spawned(), 1);
    assert!(machine.launcher().take_faults().is_empty());
}

#[test]
fn go_returns_before_the_activation_finishes() {
    let mut a = Asm::new();
    let producer = producer(&mut a);
    let make = make_chan(&mut a, 0);
    let callee = a.func_ref(producer);
    let ch = a.var(0);
    let go = a.op(Kind::GoCall, None, &[callee, ch]);
    a.link(make, go);
    a.globals(1);

    let (machine, _) = a.machine();
    // The producer is parked on an unbuffered send nobody has received yet.
    machine.exec(make).unwrap();
    assert_eq!(machine.launcher().live(), 1);

    let Some(Value::Chan(ch)) = machine.globals().get(0) else {
        panic!("expected a channel in slot 0");
    };
    assert_eq!(ch.recv(), Some(Value::Int(7)));
    machine.join();
    assert_eq!(machine.launcher().live(), 0);
}

#[test]
fn closure_capture_is_by_reference() {
    let mut a = Asm::new();
    let bool_t = a.ty(Type::Bool);
    let done_t = a.ty(Type::Chan { elem: bool_t });

    // func() { counter = 5; done <- true }
    let setter = a.decl();
    let counter = a.outer(1, 1);
    let five = a.int(5);
    let set = a.op(Kind::Assign, None, &[counter, five]);
    let done = a.outer(4, 1);
    let yes = a.boolean(true);
    let signal = a.op(Kind::Send, None, &[done, yes]);
    a.link(set, signal);
    a.define(setter, def("main.func1", 0, &[], 0, set));

    // func() int { return counter }
    let reader = a.decl();
    let counter = a.outer(1, 1);
    let ret = a.op(Kind::Return, None, &[counter]);
    a.define(reader, def("main.func2", 1, &[], 1, ret));

    // func main() int
    let main = a.decl();
    let counter = a.var(1);
    let zero = a.int(0);
    let init = a.op(Kind::Assign, None, &[counter, zero]);
    let builtin = a.builtin();
    let ty = a.type_expr(done_t);
    let make = a.op(Kind::Make, Some(4), &[builtin, ty]);
    let set_fn = a.op(Kind::FuncLit, Some(2), &[]);
    a.node_mut(set_fn).payload = Payload::Func(setter);
    let read_fn = a.op(Kind::FuncLit, Some(3), &[]);
    a.node_mut(read_fn).payload = Payload::Func(reader);
    let callee = a.var(2);
    let go = a.op(Kind::GoCall, None, &[callee]);
    let done = a.var(4);
    let wait = a.op(Kind::Recv, Some(5), &[done]);
    let callee = a.var(3);
    let read = a.call(Some(6), 1, &[callee]);
    let result = a.var(6);
    let ret = a.op(Kind::Return, None, &[result]);
    a.chain(&[init, make, set_fn, read_fn, go, wait, read, ret]);
    a.define(main, def("main", 7, &[], 1, init));

    let (machine, _) = a.machine();
    assert_eq!(machine.call_by_name("main", vec![]).unwrap(), vec![Value::Int(5)]);
    machine.join();
}

#[test]
fn fault_in_spawned_activation_is_recorded() {
    let mut a = Asm::new();
    let boom = a.decl();
    let one = a.int(1);
    let zero = a.int(0);
    let quo = a.op(Kind::Quo, Some(0), &[one, zero]);
    a.define(boom, def("boom", 1, &[], 0, quo));

    let callee = a.func_ref(boom);
    let go = a.op(Kind::GoCall, None, &[callee]);
    a.globals(0);

    let (machine, _) = a.machine();
    // The spawning activation is unaffected.
    machine.exec(go).unwrap();
    machine.join();

    let faults = machine.launcher().take_faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].fault, Fault::DivisionByZero);
}

#[test]
fn go_with_native_callee() {
    let mut a = Asm::new();
    let println = a.native("fmt.Println");
    let msg = a.str("from task");
    let go = a.op(Kind::GoCall, None, &[println, msg]);

    let (machine, out) = a.machine();
    machine.exec(go).unwrap();
    machine.join();
    assert_eq!(out.contents(), "from task\n");
}

#[test]
fn buffered_channel_does_not_block_until_full() {
    let mut a = Asm::new();
    let int = a.ty(Type::Int);
    let chan = a.ty(Type::Chan { elem: int });
    let builtin = a.builtin();
    let ty = a.type_expr(chan);
    let two = a.int(2);
    let make = a.op(Kind::Make, Some(0), &[builtin, ty, two]);
    let ch = a.var(0);
    let one = a.int(1);
    let send1 = a.op(Kind::Send, None, &[ch, one]);
    let ch = a.var(0);
    let two = a.int(2);
    let send2 = a.op(Kind::Send, None, &[ch, two]);
    let builtin = a.builtin();
    let ch = a.var(0);
    let len = a.op(Kind::Len, Some(1), &[builtin, ch]);
    a.chain(&[make, send1, send2, len]);
    a.globals(2);

    let (machine, _) = a.machine();
    machine.exec(make).unwrap();
    assert_eq!(machine.globals().get(1), Some(Value::Int(2)));
}

#[test]
fn receive_after_close_yields_zero() {
    let mut a = Asm::new();
    let make = make_chan(&mut a, 0);
    let builtin = a.builtin();
    let ch = a.var(0);
    let close = a.op(Kind::Close, None, &[builtin, ch]);
    let ch = a.var(0);
    let recv = a.op(Kind::Recv, Some(1), &[ch]);
    let int = a.ty(Type::Int);
    a.node_mut(recv).ty = Some(int);
    a.chain(&[make, close, recv]);
    a.globals(2);

    let (machine, _) = a.machine();
    machine.exec(make).unwrap();
    assert_eq!(machine.globals().get(1), Some(Value::Int(0)));
}

#[test]
fn close_fails_a_parked_sender() {
    let chan = ChanHandle::new(0);
    let sender = {
        let chan = chan.clone();
        std::thread::spawn(move || chan.send(Value::Int(1)))
    };
    std::thread::sleep(Duration::from_millis(50));
    chan.close().unwrap();

    assert_eq!(chan.recv(), None);
    assert_eq!(sender.join().unwrap(), Err(Fault::SendOnClosedChannel));
}

#[test]
fn close_keeps_buffered_values_for_receivers() {
    let chan = ChanHandle::new(2);
    chan.send(Value::Int(1)).unwrap();
    chan.close().unwrap();

    assert_eq!(chan.send(Value::Int(2)), Err(Fault::SendOnClosedChannel));
    assert_eq!(chan.recv(), Some(Value::Int(1)));
    assert_eq!(chan.recv(), None);
}

#[test]
fn close_wakes_a_parked_receiver() {
    let chan = ChanHandle::new(0);
    let receiver = {
        let chan = chan.clone();
        std::thread::spawn(move || chan.recv())
    };
    std::thread::sleep(Duration::from_millis(50));
    chan.close().unwrap();
    assert_eq!(receiver.join().unwrap(), None);
}

#[test]
fn sleep_suspends_only_the_sleeping_activation() {
    let mut a = Asm::new();
    let sleeper = a.decl();
    let builtin = a.builtin();
    let ms = a.int(50);
    let nap = a.op(Kind::Sleep, None, &[builtin, ms]);
    let ch = a.var(0);
    let seven = a.int(7);
    let send = a.op(Kind::Send, None, &[ch, seven]);
    a.link(nap, send);
    a.define(sleeper, def("sleeper", 1, &[0], 0, nap));

    let make = make_chan(&mut a, 0);
    let callee = a.func_ref(sleeper);
    let ch = a.var(0);
    let go = a.op(Kind::GoCall, None, &[callee, ch]);
    a.link(make, go);
    a.globals(1);

    let (machine, _) = a.machine();
    let started = std::time::Instant::now();
    machine.exec(make).unwrap();

    let Some(Value::Chan(ch)) = machine.globals().get(0) else {
        panic!("expected a channel in slot 0");
    };
    assert_eq!(ch.recv(), Some(Value::Int(7)));
    assert!(started.elapsed() >= Duration::from_millis(50));
    machine.join();
}

#[test]
fn channel_handle_rendezvous() {
    let ch = ChanHandle::new(0);
    let sender = ch.clone();
    let handle = std::thread::spawn(move || sender.send(Value::Int(3)));
    assert_eq!(ch.recv(), Some(Value::Int(3)));
    handle.join().unwrap().unwrap();
}
