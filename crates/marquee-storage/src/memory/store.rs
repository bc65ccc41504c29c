//! In-memory store using DashMap

use dashmap::DashMap;
use std::sync::Arc;

use marquee_core::{DurableStore, Result};

/// In-memory durable store
///
/// Does not survive the process, so it stands in for the browser store in
/// tests and short-lived sessions. Cloning creates a new handle to the SAME
/// underlying map, which is how two "tabs" sharing one origin are modelled.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.data.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.iter().map(|entry| entry.key().clone()).collect())
    }

    fn clear(&self) -> Result<()> {
        self.data.clear();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}
