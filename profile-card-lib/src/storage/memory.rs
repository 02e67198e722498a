use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::storage::{Backend, Result, StorageError};

/// A store that lives only as long as the process. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write and delete fail, as a full or read-only store would.
    pub fn reject_writes(&self, reject: bool) {
        self.state.write().reject_writes = reject;
    }

    /// The raw text stored under a full key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.read().entries.get(key).cloned()
    }

    /// Store raw text under a full key, bypassing encoding.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.state
            .write()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.reject_writes {
            return Err(StorageError::Rejected(key.to_string()));
        }

        state.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state.write();
        if state.reject_writes {
            return Err(StorageError::Rejected(key.to_string()));
        }

        state.entries.remove(key);
        Ok(())
    }
}
