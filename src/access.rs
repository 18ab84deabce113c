//! Directory access facade.
//!
//! [`DirectoryServerAccess`] is the narrow surface the watcher uses: load LDIF
//! into a running server and check the server's contents against expected
//! LDIF. [`StandardDirectoryAccess`] implements it for any [`DirectoryServer`]
//! by running both sides through the LDIF codec and the comparator.
//!
//! # Example Usage
//!
//! ```rust
//! use ldapunit::access::{DirectoryServerAccess, StandardDirectoryAccess};
//! use ldapunit::directory::InMemoryDirectoryServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = InMemoryDirectoryServer::builder("dc=example,dc=com").build()?;
//! let access = StandardDirectoryAccess::for_in_memory(server);
//!
//! access
//!     .import_ldif("dn: dc=example,dc=com\ndc: example\n\ndn: ou=people,dc=example,dc=com\nou: people\n".as_bytes())
//!     .await?;
//!
//! // The root context entry is ignored on the actual side
//! access
//!     .compare_contents("dn: ou=people,dc=example,dc=com\nou: people\n".as_bytes())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::compare::{self, CompareOptions};
use crate::directory::{DirectoryServer, InMemoryDirectoryServer};
use crate::error::{LdapUnitError, LdapUnitResult};
use crate::ldif;
use log::debug;
use std::future::Future;
use std::io::Read;

/// Operations the fixture lifecycle performs against a directory server.
pub trait DirectoryServerAccess: Send + Sync {
    /// Decode `source` as LDIF and add every entry to the server.
    ///
    /// Entries are added with append semantics; the server rejects duplicates.
    /// There is no partial-import recovery.
    fn import_ldif<R: Read + Send>(
        &self,
        source: R,
    ) -> impl Future<Output = LdapUnitResult<()>> + Send;

    /// Check that the server holds exactly the entries in `expected`,
    /// ignoring the root context entry.
    fn compare_contents<R: Read + Send>(
        &self,
        expected: R,
    ) -> impl Future<Output = LdapUnitResult<()>> + Send;
}

/// [`DirectoryServerAccess`] backed by any [`DirectoryServer`].
#[derive(Debug, Clone)]
pub struct StandardDirectoryAccess<S: DirectoryServer> {
    server: S,
    root_context_dn: Option<String>,
    options: CompareOptions,
}

impl<S: DirectoryServer> StandardDirectoryAccess<S> {
    /// Access without a root context; nothing is stripped from exports.
    pub fn new(server: S) -> Self {
        Self {
            server,
            root_context_dn: None,
            options: CompareOptions::default(),
        }
    }

    /// Ignore the entry named `dn` on the actual side of comparisons.
    pub fn with_root_context_dn(mut self, dn: impl Into<String>) -> Self {
        self.root_context_dn = Some(dn.into());
        self
    }

    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn root_context_dn(&self) -> Option<&str> {
        self.root_context_dn.as_deref()
    }
}

impl StandardDirectoryAccess<InMemoryDirectoryServer> {
    /// Access to an in-memory server, stripping its first base DN.
    pub fn for_in_memory(server: InMemoryDirectoryServer) -> Self {
        let root = server.root_context_dn().to_string();
        Self::new(server).with_root_context_dn(root)
    }
}

impl<S: DirectoryServer> DirectoryServerAccess for StandardDirectoryAccess<S> {
    async fn import_ldif<R: Read + Send>(&self, source: R) -> LdapUnitResult<()> {
        let entries = ldif::read_entries(source)?;
        debug!("Importing {} entries", entries.len());
        self.server
            .import_entries(false, entries)
            .await
            .map_err(LdapUnitError::server_operation)?;
        Ok(())
    }

    async fn compare_contents<R: Read + Send>(&self, expected: R) -> LdapUnitResult<()> {
        let expected = ldif::read_entries(expected)?;

        let exported = self
            .server
            .export_ldif()
            .await
            .map_err(LdapUnitError::server_operation)?;
        let mut actual = ldif::read_entries(exported.as_slice())?;
        if let Some(root) = &self.root_context_dn {
            actual = compare::without_entry(actual, root);
        }

        debug!(
            "Comparing {} expected entries with {} actual entries",
            expected.len(),
            actual.len()
        );
        compare::assert_entries_match_with(expected, actual, &self.options)?;
        Ok(())
    }
}
