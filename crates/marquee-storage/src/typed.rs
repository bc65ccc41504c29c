//! Typed access to a durable store

use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use marquee_core::{DurableStore, Error, JsonSerializer, Result, Serializer};

/// Key prefix shared by every marquee record
pub const DEFAULT_PREFIX: &str = "marquee_";

/// Serializing wrapper around a [`DurableStore`]
///
/// Corrupt entries never reach the caller: a value that fails to decode is
/// logged, removed, and reported as absent so the caller reinitializes its
/// defaults. Cloning creates a new handle to the SAME underlying store.
pub struct TypedStore<S: DurableStore, Z: Serializer = JsonSerializer> {
    store: Arc<S>,
    serializer: Z,
    prefix: String,
}

impl<S: DurableStore> TypedStore<S, JsonSerializer> {
    /// Wrap a store with the JSON serializer and default prefix
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Wrap an already shared store
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            serializer: JsonSerializer,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl<S: DurableStore, Z: Serializer> TypedStore<S, Z> {
    /// Swap the serializer
    pub fn with_serializer<Z2: Serializer>(self, serializer: Z2) -> TypedStore<S, Z2> {
        TypedStore {
            store: self.store,
            serializer,
            prefix: self.prefix,
        }
    }

    /// Replace the key prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The underlying raw store
    pub fn raw(&self) -> &S {
        &self.store
    }

    /// Get the full key with prefix
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Read and decode a record; corrupt records are discarded
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let full_key = self.full_key(key);
        let Some(text) = self.store.get(&full_key)? else {
            return Ok(None);
        };

        match self.serializer.deserialize(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                let err = Error::StorageParse {
                    key: full_key.clone(),
                    message: err.to_string(),
                };
                tracing::warn!(target: "marquee", key = %full_key, error = %err, "discarding corrupt store entry");
                if let Err(remove_err) = self.store.remove(&full_key) {
                    tracing::warn!(target: "marquee", key = %full_key, error = %remove_err, "failed to remove corrupt store entry");
                }
                Ok(None)
            }
        }
    }

    /// Encode and write a record
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = self.serializer.serialize(value)?;
        self.store.set(&self.full_key(key), &text)
    }

    /// Remove a record
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.store.remove(&self.full_key(key))
    }

    /// Read-modify-write a record and return the value that was written
    ///
    /// `init` supplies the value when the record is absent or corrupt.
    pub fn update<T, I, F>(&self, key: &str, init: I, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        I: FnOnce() -> T,
        F: FnOnce(&mut T),
    {
        let mut value = self.load(key)?.unwrap_or_else(init);
        f(&mut value);
        self.save(key, &value)?;
        Ok(value)
    }
}

impl<S: DurableStore, Z: Serializer> Clone for TypedStore<S, Z> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            serializer: self.serializer.clone(),
            prefix: self.prefix.clone(),
        }
    }
}
