//! Kind-to-operation table.
//!
//! Every kind maps to exactly one primitive operation. The match is
//! exhaustive, so adding a `Kind` without an operation fails to compile.
//! [`Program::load`](crate::Program::load) materializes the mapping per node.

use strider_ir::{Kind, NodeId};

use crate::ops::{arith, assign, builtins, composite, control, index, range};
use crate::{call, Exec, ExecResult, FrameRef};

/// A primitive operation: reads operands through the resolver and writes
/// its result into the frame.
pub(crate) type Op = fn(&Exec<'_>, NodeId, &FrameRef) -> ExecResult;

pub(crate) fn op_for(kind: Kind) -> Op {
    match kind {
        Kind::BasicLit
        | Kind::Ident
        | Kind::FuncDecl
        | Kind::FuncType
        | Kind::FieldList
        | Kind::Block
        | Kind::Selector
        | Kind::KeyValue
        | Kind::TypeExpr
        | Kind::Switch
        | Kind::CaseClause
        | Kind::IndexExpr
        | Kind::Nop => control::nop,

        Kind::Add => arith::add,
        Kind::Sub => arith::sub,
        Kind::Mul => arith::mul,
        Kind::Quo => arith::quo,
        Kind::Rem => arith::rem,
        Kind::Neg => arith::neg,
        Kind::Equal => arith::equal,
        Kind::NotEqual => arith::not_equal,
        Kind::Greater => arith::greater,
        Kind::GreaterEqual => arith::greater_equal,
        Kind::Lower => arith::lower,
        Kind::LowerEqual => arith::lower_equal,
        Kind::And => arith::bit_and,
        Kind::Or => arith::bit_or,
        Kind::Not => arith::not,
        Kind::Land => arith::land,
        Kind::Lor => arith::lor,
        Kind::Inc => arith::inc,
        Kind::Dec => arith::dec,

        Kind::Assign => assign::assign,
        Kind::AssignX => assign::assign_x,
        Kind::Assign0 => assign::assign_zero,
        Kind::AssignPtr => assign::assign_ptr,
        Kind::AssignMap => assign::assign_map,

        Kind::ArrayLit => composite::array_lit,
        Kind::MapLit => composite::map_lit,
        Kind::CompositeLit => composite::composite_lit,
        Kind::CompositeSparse => composite::composite_sparse,

        Kind::GetIndex => index::get_index,
        Kind::GetIndexAddr => index::get_index_addr,
        Kind::GetIndexSeq => index::get_index_seq,
        Kind::GetIndexMap => index::get_index_map,

        Kind::Make => builtins::make,
        Kind::Recv => builtins::recv,
        Kind::Send => builtins::send,
        Kind::Close => builtins::close,
        Kind::Len => builtins::len,
        Kind::Sleep => builtins::sleep,
        Kind::Println => builtins::println,

        Kind::Range => range::range,
        Kind::Return => control::ret,
        Kind::Case => control::case,
        Kind::Call => call::call,
        Kind::GoCall => call::go_call,
        Kind::FuncLit => control::func_lit,
    }
}

