//! Durable key-value store trait

use std::sync::Arc;

use crate::Error;

/// Synchronous string key-value persistence that survives reloads
///
/// Writes are complete when the call returns. There is no cross-process
/// locking: two writers doing read-modify-write on one key can lose an
/// update (last write wins).
pub trait DurableStore: Send + Sync + 'static {
    /// Read a raw value
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write a raw value
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove a key
    ///
    /// Returns `true` if the key existed.
    fn remove(&self, key: &str) -> Result<bool, Error>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>, Error>;

    /// Remove every key
    fn clear(&self) -> Result<(), Error>;

    /// Number of stored keys
    fn len(&self) -> Result<usize, Error> {
        Ok(self.keys()?.len())
    }

    /// Check if the store is empty
    fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }
}

impl<S: DurableStore + ?Sized> DurableStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, Error> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        (**self).keys()
    }

    fn clear(&self) -> Result<(), Error> {
        (**self).clear()
    }

    fn len(&self) -> Result<usize, Error> {
        (**self).len()
    }
}
