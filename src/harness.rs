//! One-call setup of a listening test directory.
//!
//! [`LdapTestHarness`] builds an [`InMemoryDirectoryServer`] from a
//! [`HarnessConfig`], starts its listener, loads the root entry and hands out
//! access facades and watchers wired to it.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ldapunit::config::HarnessConfig;
//! use ldapunit::harness::LdapTestHarness;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarnessConfig::new("dc=zimory,dc=com")
//!     .with_root_entry_ldif("dn: dc=zimory,dc=com\ndc: zimory\nobjectClass: dcObject\n");
//! let harness = LdapTestHarness::start(config).await?;
//! println!("connect to {}", harness.ldap_url());
//!
//! harness.shut_down().await;
//! # Ok(())
//! # }
//! ```

use crate::access::{DirectoryServerAccess, StandardDirectoryAccess};
use crate::config::HarnessConfig;
use crate::directory::{DirectoryServer, InMemoryDirectoryServer};
use crate::error::{LdapUnitError, LdapUnitResult};
use crate::watcher::LdapWatcher;
use log::info;
use std::net::SocketAddr;

/// A running in-memory directory plus the configuration it was built from.
pub struct LdapTestHarness {
    server: InMemoryDirectoryServer,
    address: SocketAddr,
    config: HarnessConfig,
}

impl LdapTestHarness {
    /// Build the server, start listening and import the root entry, if any.
    pub async fn start(config: HarnessConfig) -> LdapUnitResult<Self> {
        config.validate()?;
        let server = InMemoryDirectoryServer::new(config.server.clone())
            .map_err(LdapUnitError::server_operation)?;
        let address = server
            .start_listening()
            .await
            .map_err(LdapUnitError::server_operation)?;

        let harness = Self {
            server,
            address,
            config,
        };
        if let Some(root) = &harness.config.root_entry_ldif {
            info!("Importing LDIF containing the root entry");
            if let Err(e) = harness.access().import_ldif(root.as_bytes()).await {
                harness.server.shut_down().await;
                return Err(e);
            }
        }
        Ok(harness)
    }

    pub fn server(&self) -> &InMemoryDirectoryServer {
        &self.server
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Address the listener is bound to.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn ldap_url(&self) -> String {
        format!("ldap://{}", self.address)
    }

    /// Access facade that strips the root context and uses the configured
    /// comparison options.
    pub fn access(&self) -> StandardDirectoryAccess<InMemoryDirectoryServer> {
        StandardDirectoryAccess::for_in_memory(self.server.clone())
            .with_options(self.config.compare)
    }

    /// Watcher resolving fixtures with the configured resolver.
    pub fn watcher(
        &self,
    ) -> LdapWatcher<impl Fn() -> StandardDirectoryAccess<InMemoryDirectoryServer> + '_> {
        LdapWatcher::new(move || self.access()).with_fixtures(self.config.fixtures.clone())
    }

    /// Stop the listener.
    pub async fn shut_down(self) {
        self.server.shut_down().await;
    }
}
