//! Destination of program output (`println`, `fmt.Println`).
//!
//! Concurrent activations print whole lines: each line is written under a
//! single lock so output from two activations never interleaves mid-line.
//! Enum dispatch, since the set of sinks is closed.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where printed lines go.
pub enum OutputSink {
    /// Process stdout.
    Stdout,
    /// In-memory capture, for embedding hosts and tests.
    Buffer(Mutex<String>),
    /// Discard.
    Silent,
}

impl OutputSink {
    /// Write `line` followed by a newline.
    pub fn write_line(&self, line: &str) {
        match self {
            OutputSink::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout is not the program's fault.
                let _ = writeln!(out, "{line}");
            }
            OutputSink::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(line);
                buf.push('\n');
            }
            OutputSink::Silent => {}
        }
    }

    /// Everything captured so far; empty for uncaptured sinks.
    pub fn contents(&self) -> String {
        match self {
            OutputSink::Buffer(buf) => buf.lock().clone(),
            OutputSink::Stdout | OutputSink::Silent => String::new(),
        }
    }

    /// Return and clear the captured output.
    pub fn take(&self) -> String {
        match self {
            OutputSink::Buffer(buf) => std::mem::take(&mut *buf.lock()),
            OutputSink::Stdout | OutputSink::Silent => String::new(),
        }
    }
}

/// Sink shared by every activation of a machine.
pub type SharedOutput = Arc<OutputSink>;

pub fn stdout_output() -> SharedOutput {
    Arc::new(OutputSink::Stdout)
}

pub fn buffer_output() -> SharedOutput {
    Arc::new(OutputSink::Buffer(Mutex::new(String::new())))
}

pub fn silent_output() -> SharedOutput {
    Arc::new(OutputSink::Silent)
}
