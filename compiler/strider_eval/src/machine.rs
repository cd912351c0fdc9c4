//! The machine: a loaded program plus everything its activations share.

use std::sync::Arc;

use strider_ir::{Graph, NodeId};

use crate::call::{bind, call_native, lexical_parent, run_activation};
use crate::walker::run_cfg;
use crate::{
    stdout_output, Exec, ExecResult, Fault, Frame, FrameRef, Launcher, NativeRegistry, Program,
    SharedOutput, Value,
};

/// Runtime limits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// Deepest allowed nesting of interpreted calls on one activation
    /// chain. `None` relies on stack growth alone.
    pub max_call_depth: Option<usize>,
    /// Stack size of threads started for `go` statements. `None` uses the
    /// platform default.
    pub task_stack_size: Option<usize>,
}

struct Shared {
    program: Program,
    globals: FrameRef,
    output: SharedOutput,
    launcher: Launcher,
    config: MachineConfig,
}

/// Handle to a loaded program. Cloning is cheap; every clone drives the
/// same program, globals, output and launcher.
#[derive(Clone)]
pub struct Machine {
    shared: Arc<Shared>,
}

impl Machine {
    pub fn builder(graph: Graph) -> MachineBuilder {
        MachineBuilder::new(graph)
    }

    pub fn program(&self) -> &Program {
        &self.shared.program
    }

    /// The package-level frame every top-level function links to.
    pub fn globals(&self) -> &FrameRef {
        &self.shared.globals
    }

    pub fn launcher(&self) -> &Launcher {
        &self.shared.launcher
    }

    pub fn output(&self) -> &SharedOutput {
        &self.shared.output
    }

    pub fn config(&self) -> &MachineConfig {
        &self.shared.config
    }

    /// Walk top-level statements starting at `entry` in the global frame.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn exec(&self, entry: NodeId) -> ExecResult {
        let cx = Exec::root(self);
        run_cfg(&cx, Some(entry), self.globals())
    }

    /// Call `func` with concrete arguments and return its results.
    ///
    /// `receiver` is bound to the receiver slot of a method. Multi-result
    /// spreading does not apply: every argument is one value.
    pub fn call(
        &self,
        func: &Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> ExecResult<Vec<Value>> {
        match func {
            Value::Func(func) => {
                let act = bind(self, func, lexical_parent(self, func), receiver, args)?;
                run_activation(&Exec::root(self), act)
            }
            Value::Native(native) => {
                let args: Vec<Value> = receiver.into_iter().chain(args).collect();
                call_native(self, native, &args)
            }
            Value::Nil => Err(Fault::NilDereference { op: "call" }),
            other => Err(Fault::mismatch("call", "func", other.type_name())),
        }
    }

    /// Call the top-level function declared as `name`.
    pub fn call_by_name(&self, name: &str, args: Vec<Value>) -> ExecResult<Vec<Value>> {
        let func = self
            .program()
            .func(name)
            .ok_or_else(|| Fault::UnknownFunction {
                name: name.to_string(),
            })?;
        self.call(&Value::Func(func), None, args)
    }

    /// Wait for every spawned activation to finish.
    pub fn join(&self) {
        self.shared.launcher.join_all();
    }
}

/// Builder for [`Machine`].
pub struct MachineBuilder {
    graph: Graph,
    natives: Option<NativeRegistry>,
    output: Option<SharedOutput>,
    config: MachineConfig,
}

impl MachineBuilder {
    pub fn new(graph: Graph) -> Self {
        MachineBuilder {
            graph,
            natives: None,
            output: None,
            config: MachineConfig::default(),
        }
    }

    /// Native symbols visible to the program. Defaults to
    /// [`NativeRegistry::with_std`].
    #[must_use]
    pub fn natives(mut self, natives: NativeRegistry) -> Self {
        self.natives = Some(natives);
        self
    }

    /// Destination of printed output. Defaults to stdout.
    #[must_use]
    pub fn output(mut self, output: SharedOutput) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the graph and bind native symbols.
    pub fn build(self) -> ExecResult<Machine> {
        let natives = self.natives.unwrap_or_else(NativeRegistry::with_std);
        let globals = Frame::root(self.graph.global_frame_size());
        let program = Program::load(self.graph, &natives)?;
        Ok(Machine {
            shared: Arc::new(Shared {
                program,
                globals,
                output: self.output.unwrap_or_else(stdout_output),
                launcher: Launcher::new(self.config.task_stack_size),
                config: self.config,
            }),
        })
    }
}
