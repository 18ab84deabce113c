//! Errors raised by directory server implementations.
//!
//! These describe why the server refused an operation (duplicate entry,
//! missing parent, listener failure). They know nothing about fixtures or
//! comparison; the access layer wraps them as server-operation faults.

use std::fmt;
use std::net::SocketAddr;

/// Errors that can occur while operating a directory server.
#[derive(Debug)]
pub enum DirectoryError {
    /// An entry with the same DN is already present.
    EntryAlreadyExists { dn: String },

    /// The entry's parent is not present.
    NoSuchParent { dn: String, parent: String },

    /// The entry does not exist.
    NoSuchEntry { dn: String },

    /// The entry lies outside every naming context served by the directory.
    OutsideNamingContexts { dn: String },

    /// The entry itself is unusable (for example an empty DN).
    InvalidEntry { dn: String, message: String },

    /// Invalid server configuration.
    Configuration {
        message: String,
        parameter: Option<String>,
    },

    /// The listener is already running.
    AlreadyListening { address: SocketAddr },

    /// The listener could not be started.
    Listener {
        message: String,
        source: Option<std::io::Error>,
    },

    /// Entries could not be encoded for export.
    Export { source: std::io::Error },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::EntryAlreadyExists { dn } => {
                write!(f, "Entry already exists: {}", dn)
            }
            DirectoryError::NoSuchParent { dn, parent } => {
                write!(f, "Parent entry '{}' of '{}' does not exist", parent, dn)
            }
            DirectoryError::NoSuchEntry { dn } => write!(f, "No such entry: {}", dn),
            DirectoryError::OutsideNamingContexts { dn } => {
                write!(f, "Entry '{}' is not within any configured base DN", dn)
            }
            DirectoryError::InvalidEntry { dn, message } => {
                write!(f, "Invalid entry '{}': {}", dn, message)
            }
            DirectoryError::Configuration { message, parameter } => {
                if let Some(param) = parameter {
                    write!(f, "Configuration error: {} (parameter: {})", message, param)
                } else {
                    write!(f, "Configuration error: {}", message)
                }
            }
            DirectoryError::AlreadyListening { address } => {
                write!(f, "Listener already running on {}", address)
            }
            DirectoryError::Listener { message, source } => {
                if let Some(source) = source {
                    write!(f, "Listener error: {} ({})", message, source)
                } else {
                    write!(f, "Listener error: {}", message)
                }
            }
            DirectoryError::Export { source } => {
                write!(f, "Failed to export entries: {}", source)
            }
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Listener { source, .. } => source
                .as_ref()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            DirectoryError::Export { source } => Some(source),
            _ => None,
        }
    }
}

impl DirectoryError {
    pub fn entry_already_exists(dn: impl Into<String>) -> Self {
        Self::EntryAlreadyExists { dn: dn.into() }
    }

    pub fn no_such_parent(dn: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::NoSuchParent {
            dn: dn.into(),
            parent: parent.into(),
        }
    }

    pub fn no_such_entry(dn: impl Into<String>) -> Self {
        Self::NoSuchEntry { dn: dn.into() }
    }

    pub fn outside_naming_contexts(dn: impl Into<String>) -> Self {
        Self::OutsideNamingContexts { dn: dn.into() }
    }

    pub fn invalid_entry(dn: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            dn: dn.into(),
            message: message.into(),
        }
    }

    /// Create a new Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            parameter: None,
        }
    }

    /// Create a new Configuration error naming the offending parameter.
    pub fn configuration_parameter(
        message: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            parameter: Some(parameter.into()),
        }
    }

    pub fn listener(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Listener {
            message: message.into(),
            source: Some(source),
        }
    }
}
