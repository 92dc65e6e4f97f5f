//! Core traits for object store IO.
//!
//! A job reads one object and writes one object, and the collaborator surface is
//! exactly those two calls. Implementations are synchronous and may drive an async
//! client internally.

use std::error::Error;
use std::fmt;

// ============================================================================
// Core Error Type
// ============================================================================

/// Error type for object store operations.
#[derive(Debug, Clone)]
pub struct CloudIOError {
    pub message: String,
    pub kind: ErrorKind,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    NotFound,
    InvalidInput,
    Network,
    Timeout,
    ServiceUnavailable,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authentication => "authentication failed",
            Self::Authorization => "permission denied",
            Self::NotFound => "not found",
            Self::InvalidInput => "invalid input",
            Self::Network => "network error",
            Self::Timeout => "timed out",
            Self::ServiceUnavailable => "service unavailable",
            Self::Other => "object store error",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CloudIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Error for CloudIOError {}

impl CloudIOError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

pub type CloudResult<T> = Result<T, CloudIOError>;

// ============================================================================
// ObjectIO - Object Storage
// ============================================================================

/// Trait for object storage operations.
///
/// The job receives this as an explicitly constructed handle, so tests can swap in
/// [`FakeObjectIO`](crate::io::cloud::FakeObjectIO) and the binary can pass an
/// S3-backed client.
pub trait ObjectIO: Send + Sync {
    /// Upload data to object storage, creating or overwriting `bucket/key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket doesn't exist, permissions are not enough, or the upload fails
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()>;

    /// Download the full contents of `bucket/key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object doesn't exist, permissions are not enough, or the download fails
    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>>;
}

impl<T: ObjectIO + ?Sized> ObjectIO for &T {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        (**self).put_object(bucket, key, data)
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        (**self).get_object(bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = CloudIOError::new(ErrorKind::NotFound, "Object in/data.csv not found");
        assert_eq!(err.to_string(), "not found: Object in/data.csv not found");
    }

    #[test]
    fn with_source_keeps_kind() {
        let err = CloudIOError::new(ErrorKind::Network, "connection reset")
            .with_source("tcp: reset by peer");
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.source.as_deref(), Some("tcp: reset by peer"));
    }
}
