//! Error types for catalog, cache and storage operations

use thiserror::Error;

/// Main error type for all marquee operations
///
/// `Clone` so a single fetch result can be handed to every coalesced waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Upstream returned a non-success status, or the transport failed
    /// before any status was received (`status == None`)
    #[error("remote service error: {message}")]
    RemoteService {
        status: Option<u16>,
        message: String,
    },

    /// The requested resource does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// User input rejected before anything was persisted
    #[error("validation error: {0}")]
    Validation(String),

    /// A durable store entry could not be parsed
    #[error("corrupt store entry {key}: {message}")]
    StorageParse { key: String, message: String },

    /// The durable store itself failed (I/O, quota)
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Upstream answered with a non-success HTTP status
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        Error::RemoteService {
            status: Some(status),
            message: message.into(),
        }
    }

    /// The request never produced a response
    pub fn transport(message: impl Into<String>) -> Self {
        Error::RemoteService {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteService { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// HTTP status carried by a remote error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::RemoteService { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for marquee operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("movie 42".to_string());
        assert_eq!(err.to_string(), "not found: movie 42");

        let err = Error::remote_status(503, "Service Unavailable");
        assert_eq!(err.to_string(), "remote service error: Service Unavailable");

        let err = Error::StorageParse {
            key: "marquee_comments".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "corrupt store entry marquee_comments: expected value"
        );
    }

    #[test]
    fn test_classification() {
        assert!(Error::remote_status(500, "boom").is_remote());
        assert!(Error::transport("connection refused").is_remote());
        assert!(!Error::NotFound("1".into()).is_remote());
        assert!(Error::NotFound("1".into()).is_not_found());
        assert!(Error::Validation("empty".into()).is_validation());
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::remote_status(404, "missing").status(), Some(404));
        assert_eq!(Error::transport("dns").status(), None);
        assert_eq!(Error::Internal("x".into()).status(), None);
    }

    #[test]
    fn test_error_clone() {
        let err = Error::transport("timeout");
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
