//! In-memory containers owned by the service.
//!
//! Each container sits behind its own [`parking_lot::Mutex`] and every
//! operation takes the lock exactly once, so a reader never observes a
//! half-applied write. The two containers are unrelated; nothing locks both.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::ServiceError;

/// String-keyed sample values.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry.
    pub fn get_all(&self) -> HashMap<String, String> {
        self.entries.lock().clone()
    }

    pub fn get(&self, key: &str) -> Result<String, ServiceError> {
        self.entries
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(key.to_owned()))
    }

    /// Inserts or overwrites, returning the stored value.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> String {
        let value = value.into();
        self.entries.lock().insert(key.into(), value.clone());
        value
    }

    /// Deletes `key` and returns what it held.
    pub fn remove(&self, key: &str) -> Result<String, ServiceError> {
        self.entries
            .lock()
            .remove(key)
            .ok_or_else(|| ServiceError::NotFound(key.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Ordered integers, duplicates allowed.
#[derive(Debug, Default)]
pub struct IntegerSequence {
    values: Mutex<Vec<i64>>,
}

impl IntegerSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_all(&self) -> Vec<i64> {
        self.values.lock().clone()
    }

    /// Appends and returns the whole sequence as it stands afterwards.
    pub fn append(&self, value: i64) -> Vec<i64> {
        let mut values = self.values.lock();
        values.push(value);
        values.clone()
    }
}
