//! Concurrent activation launcher.
//!
//! Every `go` statement becomes one OS thread. Threads are detached from
//! the spawning activation: the launcher keeps the handles of unfinished
//! threads so a host can wait for them, and records the fault of any
//! activation that ends in one. A panic inside an activation is recorded
//! the same way. There is no cancellation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::{ExecResult, Fault};

/// Fault raised by a spawned activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFault {
    pub task: u64,
    pub fault: Fault,
}

/// Starts and tracks spawned activations.
#[derive(Default)]
pub struct Launcher {
    stack_size: Option<usize>,
    next_id: AtomicU64,
    live: Arc<AtomicUsize>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    faults: Arc<Mutex<Vec<TaskFault>>>,
}

impl Launcher {
    pub fn new(stack_size: Option<usize>) -> Self {
        Launcher {
            stack_size,
            ..Self::default()
        }
    }

    /// Run `job` on a new thread and return its task id immediately.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn launch(&self, job: impl FnOnce() -> ExecResult + Send + 'static) -> ExecResult<u64> {
        let task = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut builder = thread::Builder::new().name(format!("strider-task-{task}"));
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        let live = Arc::clone(&self.live);
        let faults = Arc::clone(&self.faults);
        live.fetch_add(1, Ordering::SeqCst);
        let spawned = builder.spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
                Err(Fault::Panicked {
                    message: panic_message(payload.as_ref()),
                })
            });
            if let Err(fault) = outcome {
                tracing::error!(task, %fault, "spawned activation faulted");
                faults.lock().push(TaskFault { task, fault });
            }
            live.fetch_sub(1, Ordering::SeqCst);
        });

        match spawned {
            Ok(handle) => {
                let mut handles = self.handles.lock();
                // Dropping a finished thread's handle releases it.
                handles.retain(|h| !h.is_finished());
                handles.push(handle);
                Ok(task)
            }
            Err(err) => {
                self.live.fetch_sub(1, Ordering::SeqCst);
                Err(Fault::Spawn {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Wait for every activation started so far, including those they
    /// start while being waited on.
    pub fn join_all(&self) {
        loop {
            let pending = std::mem::take(&mut *self.handles.lock());
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                // Panics are caught inside the thread, so a join cannot fail.
                let _ = handle.join();
            }
        }
    }

    /// Activations currently running.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Number of activations ever started.
    pub fn spawned(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Threads started but not yet reaped.
    pub fn retained(&self) -> usize {
        self.handles.lock().len()
    }

    /// Drain recorded faults.
    pub fn take_faults(&self) -> Vec<TaskFault> {
        std::mem::take(&mut *self.faults.lock())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
