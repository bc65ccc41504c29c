//! Cache key trait and implementations

use serde::Serialize;
use serde_json::Value;

/// Stable serialization of a parameter tuple
///
/// Structurally equal tuples always produce the same string, so they share
/// one cache slot.
pub fn canonical<T: Serialize + ?Sized>(parts: &T) -> String {
    serde_json::to_string(parts).unwrap_or_else(|err| format!("!unserializable:{err}"))
}

/// Trait for types that can be used as cache keys
///
/// Implement this trait to use custom types as cache keys.
pub trait CacheKey: Send + Sync {
    /// Generate the canonical key string
    fn cache_key(&self) -> String;

    /// Query family the key belongs to, e.g. every page of the popular list
    fn family(&self) -> Option<String> {
        None
    }
}

// Implementations for common types

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

impl CacheKey for str {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl<K: CacheKey + ?Sized> CacheKey for &K {
    fn cache_key(&self) -> String {
        (**self).cache_key()
    }

    fn family(&self) -> Option<String> {
        (**self).family()
    }
}

// Tuple implementations for composite keys, serialized as JSON arrays

impl<T1: Serialize + Send + Sync, T2: Serialize + Send + Sync> CacheKey for (T1, T2) {
    fn cache_key(&self) -> String {
        canonical(self)
    }
}

impl<T1: Serialize + Send + Sync, T2: Serialize + Send + Sync, T3: Serialize + Send + Sync>
    CacheKey for (T1, T2, T3)
{
    fn cache_key(&self) -> String {
        canonical(self)
    }
}

impl<
    T1: Serialize + Send + Sync,
    T2: Serialize + Send + Sync,
    T3: Serialize + Send + Sync,
    T4: Serialize + Send + Sync,
> CacheKey for (T1, T2, T3, T4)
{
    fn cache_key(&self) -> String {
        canonical(self)
    }
}

/// Composite key builder for keys assembled at runtime
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeKey {
    parts: Vec<Value>,
    family: Option<String>,
}

impl CompositeKey {
    /// Create a new composite key builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query family
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Add a part to the key
    pub fn part(mut self, part: impl Into<Value>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// Add multiple parts
    pub fn parts<I, P>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Value>,
    {
        self.parts.extend(parts.into_iter().map(Into::into));
        self
    }
}

impl CacheKey for CompositeKey {
    fn cache_key(&self) -> String {
        canonical(&self.parts)
    }

    fn family(&self) -> Option<String> {
        self.family.clone()
    }
}
