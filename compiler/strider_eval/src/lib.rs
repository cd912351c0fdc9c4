//! Strider Eval - execution engine for annotated control-flow graphs.
//!
//! Runs a [`strider_ir::Graph`] directly against a chain of per-call value
//! frames, without producing code.
//!
//! # Architecture
//!
//! - [`Program`]: the graph with one primitive operation bound per node
//! - [`Frame`]: slot array of one activation, linked to its lexical ancestor
//! - `resolve`: the single operand read/write path (`level` hops, then `slot`)
//! - `walker::run_cfg`: follows `tnext`/`fnext` successors, one activation
//! - `call`: frame allocation, argument binding, result propagation
//! - [`Launcher`]: one thread per `go` activation
//! - [`Machine`]: the host-facing handle, built by [`MachineBuilder`]

mod call;
mod dispatch;
mod errors;
mod exec;
mod frame;
mod launcher;
mod machine;
mod natives;
mod ops;
mod output;
mod program;
mod resolve;
mod value;
mod walker;

pub use errors::{ExecResult, Fault};
pub(crate) use exec::Exec;
pub use frame::{Frame, FrameRef};
pub use launcher::{Launcher, TaskFault};
pub use machine::{Machine, MachineBuilder, MachineConfig};
pub use natives::{NativeRegistry, NativeSymbol};
pub use output::{buffer_output, silent_output, stdout_output, OutputSink, SharedOutput};
pub use program::Program;
pub use value::{
    zero_value, ChanHandle, Composite, FuncValue, MapHandle, NativeFn, NativeFunc, Pointer, Value,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Only installs a subscriber when `RUST_LOG` is set, so an embedding host
/// pays nothing by default. Safe to call more than once.
///
/// ```bash
/// RUST_LOG=strider_eval=debug my-host run script.go
/// RUST_LOG=strider_eval::walker=trace my-host run script.go
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
