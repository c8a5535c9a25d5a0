//! # Persistence Port
//!
//! The ledger persists its history through [`KeyValueStore`]: one named slot
//! holding one string blob.
//!
//! ```text
//! ┌──────────────┐   read(key) / write(key, json)   ┌──────────────────────┐
//! │    Ledger    │ ───────────────────────────────► │ impl KeyValueStore   │
//! └──────────────┘                                  │  • MemoryStore       │
//!                                                   │  • SqliteStore (db)  │
//!                                                   └──────────────────────┘
//! ```
//!
//! Backends report failures as [`StoreError`]; the ledger logs them and keeps
//! working from memory.

use std::collections::HashMap;
use thiserror::Error;

/// Failure of a storage backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Backend cannot be reached (locked, closed, missing permissions).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Read or write was attempted but failed.
    #[error("Storage operation failed: {0}")]
    Failed(String),
}

/// A durable key-value slot store.
pub trait KeyValueStore {
    /// Reads a slot. `Ok(None)` when nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the contents of a slot.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// Store that lives only as long as the process. Used in tests and when no
/// database can be opened.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Pre-fills a slot.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("bills"), Ok(None));

        store.write("bills", "[]").unwrap();
        assert_eq!(store.read("bills"), Ok(Some("[]".to_string())));

        store.write("bills", "[1]").unwrap();
        assert_eq!(store.get("bills"), Some("[1]"));
    }

    #[test]
    fn test_borrowed_store() {
        let mut store = MemoryStore::new();
        {
            let mut borrowed = &mut store;
            borrowed.write("k", "v").unwrap();
        }
        assert_eq!(store.get("k"), Some("v"));
    }
}
