//! Primitive operations.
//!
//! Each operation has the [`Op`](crate::dispatch::Op) signature: it reads
//! operands through the resolver and writes exactly one result into its own
//! slot, except assignments (which write their destinations), `Return`
//! (which writes the result slots) and `Send`/`Close`/`Sleep` (which have no
//! result).

pub(crate) mod arith;
pub(crate) mod assign;
pub(crate) mod builtins;
pub(crate) mod composite;
pub(crate) mod control;
pub(crate) mod index;
pub(crate) mod range;
