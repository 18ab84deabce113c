//! Directory server abstraction.
//!
//! The fixture harness never talks to a concrete server directly. It needs a
//! handful of operations (add an entry, bulk import, full LDIF export and a
//! listener it can start and stop), captured by the [`DirectoryServer`] trait.
//! [`InMemoryDirectoryServer`] is the bundled implementation: entries live in a
//! shared map and a small LDAP listener serves bind and search requests so the
//! code under test can connect over the network.
//!
//! # Example Usage
//!
//! ```rust
//! use ldapunit::directory::{DirectoryServer, InMemoryDirectoryServer};
//! use ldapunit::entry::DirectoryEntry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = InMemoryDirectoryServer::builder("dc=example,dc=com")
//!     .with_bind_credentials("cn=Manager,dc=example,dc=com", "secret")
//!     .build()?;
//!
//! server
//!     .add_entry(DirectoryEntry::new("dc=example,dc=com").with_attribute("dc", "example"))
//!     .await?;
//! assert!(server.entry_exists("dc=example,dc=com").await?);
//!
//! let address = server.start_listening().await?;
//! println!("LDAP listener on {}", address);
//! server.shut_down().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dn;
pub mod errors;
pub mod in_memory;
mod listener;


pub use config::{BindCredential, DirectoryServerConfig};
pub use errors::DirectoryError;
pub use in_memory::{InMemoryDirectoryServer, InMemoryDirectoryServerBuilder};

use crate::entry::DirectoryEntry;
use std::future::Future;
use std::net::SocketAddr;

/// Operations the harness needs from a running directory server.
///
/// # Design Principles
///
/// - **Append semantics**: adding an entry whose DN already exists is an error;
///   the policy for hierarchy checks belongs to the implementation.
/// - **Export as LDIF**: the comparator reads the export back through the same
///   codec that reads fixtures, so both sides are normalized identically.
/// - **Async first**: all operations return futures, matching the listener that
///   runs on the tokio runtime.
pub trait DirectoryServer: Send + Sync {
    /// The error type returned by server operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Add a single entry.
    fn add_entry(
        &self,
        entry: DirectoryEntry,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Add entries in order, optionally clearing the directory first.
    ///
    /// # Returns
    /// The number of entries added.
    ///
    /// # Behavior
    /// - Stops at the first rejected entry and returns its error
    /// - Implementations should leave the directory unchanged when an import fails
    fn import_entries(
        &self,
        clear_existing: bool,
        entries: Vec<DirectoryEntry>,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;

    /// Export the full contents as LDIF, parents before children.
    fn export_ldif(&self) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;

    /// Retrieve an entry by DN.
    fn get_entry(
        &self,
        dn: &str,
    ) -> impl Future<Output = Result<Option<DirectoryEntry>, Self::Error>> + Send;

    /// Check if an entry exists.
    fn entry_exists(&self, dn: &str) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Number of entries currently stored.
    fn entry_count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send;

    /// Remove every entry.
    fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Start accepting LDAP connections and return the bound address.
    fn start_listening(&self) -> impl Future<Output = Result<SocketAddr, Self::Error>> + Send;

    /// Stop the listener. Does nothing when it is not running.
    fn shut_down(&self) -> impl Future<Output = ()> + Send;
}
