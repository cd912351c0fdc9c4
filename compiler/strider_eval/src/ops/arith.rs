//! Arithmetic, comparison and logical operations.
//!
//! The operand type set is closed, so evaluation is a direct match on the
//! operand pair. Integer arithmetic wraps on overflow like the source
//! language; only division and remainder by zero fault.

use std::cmp::Ordering;

use strider_ir::NodeId;

use crate::{Exec, ExecResult, Fault, FrameRef, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Lower,
    LowerEqual,
    And,
    Or,
}

impl BinaryOp {
    fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Lower => "<",
            BinaryOp::LowerEqual => "<=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

/// Evaluate `left op right`.
pub(crate) fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> ExecResult<Value> {
    match op {
        BinaryOp::Equal => return Ok(Value::Bool(left == right)),
        BinaryOp::NotEqual => return Ok(Value::Bool(left != right)),
        _ => {}
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => float_binary(*a, *b, op),
        (Value::Str(a), Value::Str(b)) => string_binary(a, b, op),
        (Value::Int(_) | Value::Float(_) | Value::Str(_), _) => {
            Err(Fault::mismatch(op.name(), left.type_name(), right.type_name()))
        }
        _ => Err(Fault::mismatch(op.name(), "int, float or string", left.type_name())),
    }
}

fn int_binary(a: i64, b: i64, op: BinaryOp) -> ExecResult<Value> {
    Ok(match op {
        BinaryOp::Add => Value::Int(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOp::Quo if b == 0 => return Err(Fault::DivisionByZero),
        BinaryOp::Quo => Value::Int(a.wrapping_div(b)),
        BinaryOp::Rem if b == 0 => return Err(Fault::DivisionByZero),
        BinaryOp::Rem => Value::Int(a.wrapping_rem(b)),
        BinaryOp::And => Value::Int(a & b),
        BinaryOp::Or => Value::Int(a | b),
        _ => return compare(a.cmp(&b), op),
    })
}

fn float_binary(a: f64, b: f64, op: BinaryOp) -> ExecResult<Value> {
    Ok(match op {
        BinaryOp::Add => Value::Float(a + b),
        BinaryOp::Sub => Value::Float(a - b),
        BinaryOp::Mul => Value::Float(a * b),
        BinaryOp::Quo => Value::Float(a / b),
        BinaryOp::Rem | BinaryOp::And | BinaryOp::Or => {
            return Err(Fault::mismatch(op.name(), "int", "float"))
        }
        // NaN compares false against everything.
        _ => match a.partial_cmp(&b) {
            Some(ordering) => return compare(ordering, op),
            None => Value::Bool(false),
        },
    })
}

fn string_binary(a: &str, b: &str, op: BinaryOp) -> ExecResult<Value> {
    match op {
        BinaryOp::Add => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::string(s))
        }
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Quo | BinaryOp::Rem | BinaryOp::And | BinaryOp::Or => {
            Err(Fault::mismatch(op.name(), "int or float", "string"))
        }
        _ => compare(a.cmp(b), op),
    }
}

fn compare(ordering: Ordering, op: BinaryOp) -> ExecResult<Value> {
    let result = match op {
        BinaryOp::Greater => ordering.is_gt(),
        BinaryOp::GreaterEqual => ordering.is_ge(),
        BinaryOp::Lower => ordering.is_lt(),
        BinaryOp::LowerEqual => ordering.is_le(),
        BinaryOp::Equal => ordering.is_eq(),
        BinaryOp::NotEqual => ordering.is_ne(),
        _ => return Err(Fault::mismatch(op.name(), "comparison", "arithmetic")),
    };
    Ok(Value::Bool(result))
}

#[inline]
fn binary(cx: &Exec<'_>, id: NodeId, frame: &FrameRef, op: BinaryOp) -> ExecResult {
    let left = cx.operand(id, 0, frame)?;
    let right = cx.operand(id, 1, frame)?;
    cx.set_own(id, frame, evaluate_binary(&left, &right, op)?)
}

pub(crate) fn add(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Add)
}

pub(crate) fn sub(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Sub)
}

pub(crate) fn mul(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Mul)
}

pub(crate) fn quo(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Quo)
}

pub(crate) fn rem(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Rem)
}

pub(crate) fn equal(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Equal)
}

pub(crate) fn not_equal(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::NotEqual)
}

pub(crate) fn greater(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Greater)
}

pub(crate) fn greater_equal(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::GreaterEqual)
}

pub(crate) fn lower(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Lower)
}

pub(crate) fn lower_equal(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::LowerEqual)
}

pub(crate) fn bit_and(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::And)
}

pub(crate) fn bit_or(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    binary(cx, id, frame, BinaryOp::Or)
}

pub(crate) fn neg(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let result = match cx.operand(id, 0, frame)? {
        Value::Int(n) => Value::Int(n.wrapping_neg()),
        Value::Float(x) => Value::Float(-x),
        other => return Err(Fault::mismatch("unary -", "int or float", other.type_name())),
    };
    cx.set_own(id, frame, result)
}

pub(crate) fn not(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let b = cx.operand(id, 0, frame)?.as_bool("!")?;
    cx.set_own(id, frame, Value::Bool(!b))
}

/// `a && b`: `b` is resolved only when `a` is true.
pub(crate) fn land(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let result = cx.operand(id, 0, frame)?.as_bool("&&")?
        && cx.operand(id, 1, frame)?.as_bool("&&")?;
    cx.set_own(id, frame, Value::Bool(result))
}

/// `a || b`: `b` is resolved only when `a` is false.
pub(crate) fn lor(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    let result = cx.operand(id, 0, frame)?.as_bool("||")?
        || cx.operand(id, 1, frame)?.as_bool("||")?;
    cx.set_own(id, frame, Value::Bool(result))
}

pub(crate) fn inc(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    step(cx, id, frame, 1)
}

pub(crate) fn dec(cx: &Exec<'_>, id: NodeId, frame: &FrameRef) -> ExecResult {
    step(cx, id, frame, -1)
}

fn step(cx: &Exec<'_>, id: NodeId, frame: &FrameRef, delta: i64) -> ExecResult {
    let result = match cx.operand(id, 0, frame)? {
        Value::Int(n) => Value::Int(n.wrapping_add(delta)),
        Value::Float(x) if delta > 0 => Value::Float(x + 1.0),
        Value::Float(x) => Value::Float(x - 1.0),
        other => return Err(Fault::mismatch("++/--", "int or float", other.type_name())),
    };
    cx.set_own(id, frame, result)
}
