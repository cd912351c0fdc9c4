//! Shared backing stores: arrays, struct field arrays and maps.
//!
//! Locks exist for memory safety only. The source language gives containers
//! no synchronization, and no guard here is ever held across a blocking
//! operation or a nested call.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Value;
use crate::{ExecResult, Fault};

/// Handle to a contiguous element array (slice, array or struct fields).
#[derive(Clone)]
pub struct Composite(Arc<RwLock<Vec<Value>>>);

impl Composite {
    pub fn new(items: Vec<Value>) -> Self {
        Composite(Arc::new(RwLock::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Element at `index`, bounds-checked.
    pub fn get(&self, index: i64) -> ExecResult<Value> {
        let items = self.0.read();
        checked(index, items.len()).map(|i| items[i].clone())
    }

    /// Overwrite the element at `index`, bounds-checked.
    pub fn set(&self, index: i64, value: Value) -> ExecResult {
        let mut items = self.0.write();
        let i = checked(index, items.len())?;
        items[i] = value;
        Ok(())
    }

    /// Address of the element at `index`, bounds-checked.
    pub fn address(&self, index: i64) -> ExecResult<Pointer> {
        let index = checked(index, self.len())?;
        Ok(Pointer {
            store: self.clone(),
            index,
        })
    }

    /// Copy of all elements.
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    pub fn ptr_eq(&self, other: &Composite) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(super) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

fn checked(index: i64, len: usize) -> ExecResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(Fault::IndexOutOfRange { index, len })
}

/// Address of one element inside a backing array.
#[derive(Clone)]
pub struct Pointer {
    store: Composite,
    index: usize,
}

impl Pointer {
    /// Current value at the address.
    pub fn load(&self) -> Option<Value> {
        self.store.0.read().get(self.index).cloned()
    }

    /// Write through the pointer.
    pub fn store(&self, value: Value) -> bool {
        match self.store.0.write().get_mut(self.index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store) && self.index == other.index
    }
}

impl Hash for Pointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.store.addr().hash(state);
        self.index.hash(state);
    }
}

/// Handle to a shared associative container.
#[derive(Clone, Default)]
pub struct MapHandle(Arc<RwLock<FxHashMap<Value, Value>>>);

impl MapHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `key`, without inserting on a miss.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Insert or overwrite.
    pub fn insert(&self, key: Value, value: Value) {
        self.0.write().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        self.0.write().remove(key)
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.0.read().contains_key(key)
    }

    /// Copy of all keys, in unspecified order.
    pub fn keys(&self) -> Vec<Value> {
        self.0.read().keys().cloned().collect()
    }

    /// Copy of all entries, in unspecified order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub(super) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}
