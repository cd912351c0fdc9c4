//! Activation frames.
//!
//! A frame is the slot array of one activation plus a link to its ancestor
//! frame. The ancestor is fixed at creation and serves two purposes:
//! lexical scoping (a node at level `n` reads the frame `n` hops up) and,
//! for forked activations, the spawning call's frame.
//!
//! Frames are reference counted. The link points from child to ancestor, so
//! an ancestor stays alive exactly as long as some closure or running task
//! can still reach it. A closure stored in the frame it captured forms a
//! cycle; [`Frame::release_self_cycles`] breaks it when an activation
//! returns and nothing outside the frame holds on to it.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{FuncValue, Value};

/// Shared handle to a frame.
pub type FrameRef = Arc<Frame>;

/// The slots of one activation.
pub struct Frame {
    slots: Mutex<Vec<Value>>,
    parent: Option<FrameRef>,
}

impl Frame {
    /// Allocate `size` nil slots linked to `parent`.
    pub fn new(size: usize, parent: Option<FrameRef>) -> FrameRef {
        Arc::new(Frame {
            slots: Mutex::new(vec![Value::Nil; size]),
            parent,
        })
    }

    /// A frame with no ancestor (the global frame).
    pub fn root(size: usize) -> FrameRef {
        Frame::new(size, None)
    }

    /// The ancestor frame.
    pub fn parent(&self) -> Option<&FrameRef> {
        self.parent.as_ref()
    }

    /// The frame `hops` ancestors up; `hops == 0` is this frame.
    pub fn ancestor(&self, hops: usize) -> Option<&Frame> {
        let mut frame = self;
        for _ in 0..hops {
            frame = frame.parent.as_deref()?;
        }
        Some(frame)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Copy of the value in `slot`.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<Value> {
        self.slots.lock().get(slot).cloned()
    }

    /// Overwrite `slot`. Returns `false` if the slot does not exist.
    #[inline]
    pub fn set(&self, slot: usize, value: Value) -> bool {
        match self.slots.lock().get_mut(slot) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Copies of `count` contiguous slots starting at `start`.
    pub fn range(&self, start: usize, count: usize) -> Option<Vec<Value>> {
        let slots = self.slots.lock();
        slots.get(start..start.checked_add(count)?).map(<[Value]>::to_vec)
    }

    /// Copy of every slot.
    pub fn snapshot(&self) -> Vec<Value> {
        self.slots.lock().clone()
    }

    /// Reset every slot to nil if the only owners of this frame, apart from
    /// the handle `self` came from, are closures held directly in its own
    /// slots. Returns whether the slots were released.
    ///
    /// Closures reached through containers or child frames are not counted,
    /// so such frames are kept.
    pub fn release_self_cycles(self: &Arc<Self>) -> bool {
        let mut slots = self.slots.lock();
        let captured = slots
            .iter()
            .filter(|value| matches!(value, Value::Func(func) if self.is_env_of(func)))
            .count();
        if captured == 0 || Arc::strong_count(self) != captured + 1 {
            return false;
        }
        let nils = vec![Value::Nil; slots.len()];
        let released = std::mem::replace(&mut *slots, nils);
        drop(slots);
        drop(released);
        true
    }

    fn is_env_of(self: &Arc<Self>, func: &FuncValue) -> bool {
        func.env.as_ref().is_some_and(|env| Arc::ptr_eq(env, self))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("slots", &*self.slots.lock())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
