//! Channel handles.
//!
//! An unbuffered channel is a zero-capacity `crossbeam` channel: a send
//! completes only when a receiver takes the value, with no queue in
//! between. Closing drops the sender of a second, signal-only channel. Every
//! blocked operation also waits on that signal, so a send parked on a
//! closing channel fails instead of completing later, and receivers drain
//! whatever is buffered and then observe the close.

use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use super::Value;
use crate::{ExecResult, Fault};

struct Channel {
    tx: Sender<Value>,
    rx: Receiver<Value>,
    /// Never carries a message. `None` once closed, which disconnects
    /// `closed_rx` and wakes every operation waiting on it.
    closed_tx: Mutex<Option<Sender<()>>>,
    closed_rx: Receiver<()>,
    capacity: usize,
}

/// Shared handle to a channel.
#[derive(Clone)]
pub struct ChanHandle(Arc<Channel>);

impl ChanHandle {
    /// A channel buffering up to `capacity` values; `0` is a rendezvous.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = channel::bounded(capacity);
        let (closed_tx, closed_rx) = channel::bounded(0);
        ChanHandle(Arc::new(Channel {
            tx,
            rx,
            closed_tx: Mutex::new(Some(closed_tx)),
            closed_rx,
            capacity,
        }))
    }

    /// Block until a receiver takes `value` (or buffer space frees up).
    /// Fails if the channel is closed before that happens.
    pub fn send(&self, value: Value) -> ExecResult {
        if self.is_closed() {
            return Err(Fault::SendOnClosedChannel);
        }
        crossbeam::select! {
            send(self.0.tx, value) -> sent => sent.map_err(|_| Fault::SendOnClosedChannel),
            recv(self.0.closed_rx) -> _ => Err(Fault::SendOnClosedChannel),
        }
    }

    /// Block until a value arrives. `None` once closed and drained.
    pub fn recv(&self) -> Option<Value> {
        if let Ok(value) = self.0.rx.try_recv() {
            return Some(value);
        }
        if self.is_closed() {
            return self.drain();
        }
        crossbeam::select! {
            recv(self.0.rx) -> value => value.ok(),
            recv(self.0.closed_rx) -> _ => self.drain(),
        }
    }

    /// Next buffered value of a closed channel. A rendezvous channel has no
    /// buffer, and pairing with a sender that is still parked would complete
    /// a send after the close.
    fn drain(&self) -> Option<Value> {
        if self.0.capacity == 0 {
            return None;
        }
        self.0.rx.try_recv().ok()
    }

    pub fn close(&self) -> ExecResult {
        match self.0.closed_tx.lock().take() {
            Some(_) => Ok(()),
            None => Err(Fault::CloseOfClosedChannel),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.0.closed_tx.lock().is_none()
    }

    /// Values currently buffered.
    pub fn len(&self) -> usize {
        self.0.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.0.capacity
    }

    pub(super) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}
