//! Error types for the LDAP test harness.
//!
//! [`LdapUnitError`] is what the access facade, the watcher and the harness
//! return. Lower layers keep their own errors ([`LdifError`],
//! [`DirectoryError`](crate::directory::DirectoryError),
//! [`ContentMismatch`]) and are wrapped here.

use crate::compare::ContentMismatch;
use crate::ldif::LdifError;
use std::path::PathBuf;

/// Main error type for harness operations.
#[derive(Debug, thiserror::Error)]
pub enum LdapUnitError {
    /// A fixture or server export is not valid LDIF
    #[error("Malformed LDIF: {0}")]
    MalformedInput(#[source] LdifError),

    /// A fixture file could not be found
    #[error("Fixture not found: {}", .path.display())]
    ResourceNotFound { path: PathBuf },

    /// The directory server rejected an operation
    #[error("Directory server error: {0}")]
    ServerOperation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Directory contents differ from the expected fixtures
    #[error("Directory contents do not match: {0}")]
    ContentMismatch(#[from] ContentMismatch),

    /// Reading a fixture or stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The test body itself failed
    #[error("Test failed: {0}")]
    TestBody(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<LdifError> for LdapUnitError {
    fn from(error: LdifError) -> Self {
        match error {
            LdifError::Io(io) => LdapUnitError::Io(io),
            other => LdapUnitError::MalformedInput(other),
        }
    }
}

impl LdapUnitError {
    /// Wrap an error raised by a directory server.
    pub fn server_operation<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ServerOperation(Box::new(error))
    }

    pub fn resource_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ResourceNotFound { path: path.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn test_body<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::TestBody(error.into())
    }
}

/// Result type for harness operations.
pub type LdapUnitResult<T> = Result<T, LdapUnitError>;
