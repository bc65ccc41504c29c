//! Pluggable serialization for durable store values

use crate::Error;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for pluggable text serialization formats
///
/// Durable stores hold strings, so serializers encode to and from text.
pub trait Serializer: Send + Sync + Clone + 'static {
    /// Name of the serializer (for debugging/metrics)
    fn name(&self) -> &str;

    /// Serialize a value to a string
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, Error>;

    /// Deserialize a string to a value
    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, Error>;
}

/// JSON serializer (default)
///
/// Human-readable and inspectable in any store viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, Error> {
        serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, Error> {
        serde_json::from_str(text).map_err(|e| Error::Deserialization(e.to_string()))
    }
}
