//! In-memory directory server.
//!
//! Entries are kept in a `HashMap` keyed by normalized DN behind a tokio
//! `RwLock`, shared between the test and the listener task. Intended for tests;
//! nothing is persisted.
//!
//! # Hierarchy rules
//!
//! * every entry must be a configured base DN or live beneath one;
//! * an entry that is not a base DN needs its parent to exist;
//! * DNs are unique, compared case-insensitively with whitespace around RDNs
//!   ignored. The DN is stored exactly as given.

use super::listener;
use super::{DirectoryError, DirectoryServer, DirectoryServerConfig, dn};
use crate::entry::DirectoryEntry;
use crate::ldif;
use log::{debug, info};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

struct ListenerHandle {
    address: SocketAddr,
    task: JoinHandle<()>,
}

/// Thread-safe in-memory directory server.
///
/// Cloning is cheap and every clone shares the same entries and listener.
#[derive(Clone)]
pub struct InMemoryDirectoryServer {
    config: Arc<DirectoryServerConfig>,
    // Normalized base DNs
    naming_contexts: Arc<Vec<String>>,
    // Structure: normalized dn -> entry
    entries: Arc<RwLock<HashMap<String, DirectoryEntry>>>,
    listener: Arc<Mutex<Option<ListenerHandle>>>,
}

impl InMemoryDirectoryServer {
    /// Create a server from a validated configuration.
    pub fn new(config: DirectoryServerConfig) -> Result<Self, DirectoryError> {
        config.validate()?;
        let naming_contexts = config.base_dns.iter().map(|b| dn::normalize(b)).collect();
        Ok(Self {
            config: Arc::new(config),
            naming_contexts: Arc::new(naming_contexts),
            entries: Arc::new(RwLock::new(HashMap::new())),
            listener: Arc::new(Mutex::new(None)),
        })
    }

    /// Start configuring a server for `base_dn`.
    pub fn builder(base_dn: impl Into<String>) -> InMemoryDirectoryServerBuilder {
        InMemoryDirectoryServerBuilder::new(base_dn)
    }

    pub fn config(&self) -> &DirectoryServerConfig {
        &self.config
    }

    /// The first configured base DN.
    pub fn root_context_dn(&self) -> &str {
        self.config.root_context_dn().unwrap_or_default()
    }

    /// Address of the running listener, if any.
    pub async fn listen_address(&self) -> Option<SocketAddr> {
        self.listener.lock().await.as_ref().map(|h| h.address)
    }

    /// Fail unless an entry with `dn` exists.
    pub async fn assert_entry_exists(&self, dn: &str) -> Result<(), DirectoryError> {
        if self.entries.read().await.contains_key(&dn::normalize(dn)) {
            Ok(())
        } else {
            Err(DirectoryError::no_such_entry(dn))
        }
    }

    /// Remove an entry, returning whether it existed.
    ///
    /// Entries with children cannot be removed.
    pub async fn delete_entry(&self, dn: &str) -> Result<bool, DirectoryError> {
        let key = dn::normalize(dn);
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&key) {
            return Ok(false);
        }
        if entries
            .keys()
            .any(|other| dn::parent(other).as_deref() == Some(key.as_str()))
        {
            return Err(DirectoryError::invalid_entry(dn, "entry has subordinates"));
        }
        Ok(entries.remove(&key).is_some())
    }

    /// All entries, parents before children.
    pub async fn all_entries(&self) -> Vec<DirectoryEntry> {
        let entries = self.entries.read().await;
        let mut keyed: Vec<(&String, &DirectoryEntry)> = entries.iter().collect();
        keyed.sort_by(|(a, _), (b, _)| dn::depth(a).cmp(&dn::depth(b)).then_with(|| a.cmp(b)));
        keyed.into_iter().map(|(_, entry)| entry.clone()).collect()
    }

    fn insert(
        &self,
        entries: &mut HashMap<String, DirectoryEntry>,
        entry: DirectoryEntry,
    ) -> Result<(), DirectoryError> {
        let key = dn::normalize(entry.dn());
        if key.is_empty() {
            return Err(DirectoryError::invalid_entry(entry.dn(), "empty DN"));
        }
        if entries.contains_key(&key) {
            return Err(DirectoryError::entry_already_exists(entry.dn()));
        }
        if !self.naming_contexts.iter().any(|base| dn::is_within(&key, base)) {
            return Err(DirectoryError::outside_naming_contexts(entry.dn()));
        }
        if !self.naming_contexts.contains(&key) {
            if let Some(parent) = dn::parent(&key) {
                if !entries.contains_key(&parent) {
                    return Err(DirectoryError::no_such_parent(entry.dn(), parent));
                }
            }
        }
        entries.insert(key, entry);
        Ok(())
    }
}

impl DirectoryServer for InMemoryDirectoryServer {
    type Error = DirectoryError;

    async fn add_entry(&self, entry: DirectoryEntry) -> Result<(), Self::Error> {
        let mut entries = self.entries.write().await;
        debug!("Adding entry '{}'", entry.dn());
        self.insert(&mut entries, entry)
    }

    async fn import_entries(
        &self,
        clear_existing: bool,
        entries: Vec<DirectoryEntry>,
    ) -> Result<usize, Self::Error> {
        let mut guard = self.entries.write().await;

        // Work on a copy so a rejected entry leaves the directory untouched
        let mut staged = if clear_existing {
            HashMap::new()
        } else {
            guard.clone()
        };
        let count = entries.len();
        for entry in entries {
            self.insert(&mut staged, entry)?;
        }

        *guard = staged;
        debug!("Imported {} entries", count);
        Ok(count)
    }

    async fn export_ldif(&self) -> Result<Vec<u8>, Self::Error> {
        let entries = self.all_entries().await;
        let mut out = Vec::new();
        ldif::write_entries(&mut out, &entries)
            .map_err(|source| DirectoryError::Export { source })?;
        Ok(out)
    }

    async fn get_entry(&self, dn: &str) -> Result<Option<DirectoryEntry>, Self::Error> {
        Ok(self.entries.read().await.get(&dn::normalize(dn)).cloned())
    }

    async fn entry_exists(&self, dn: &str) -> Result<bool, Self::Error> {
        Ok(self.entries.read().await.contains_key(&dn::normalize(dn)))
    }

    async fn entry_count(&self) -> Result<usize, Self::Error> {
        Ok(self.entries.read().await.len())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn start_listening(&self) -> Result<SocketAddr, Self::Error> {
        let mut handle = self.listener.lock().await;
        if let Some(running) = handle.as_ref() {
            return Err(DirectoryError::AlreadyListening {
                address: running.address,
            });
        }

        let requested = self.config.listen_socket();
        let tcp = TcpListener::bind(requested).await.map_err(|e| {
            DirectoryError::listener(format!("failed to bind {}", requested), e)
        })?;
        let address = tcp
            .local_addr()
            .map_err(|e| DirectoryError::listener("failed to read bound address", e))?;

        let task = tokio::spawn(listener::serve(tcp, self.clone()));
        info!(
            "Directory listener '{}' accepting connections on {}",
            self.config.listener_name, address
        );
        *handle = Some(ListenerHandle { address, task });
        Ok(address)
    }

    async fn shut_down(&self) {
        if let Some(handle) = self.listener.lock().await.take() {
            handle.task.abort();
            info!("Directory listener on {} stopped", handle.address);
        }
    }
}

/// Builder for [`InMemoryDirectoryServer`].
///
/// ```rust
/// use ldapunit::directory::InMemoryDirectoryServer;
///
/// let server = InMemoryDirectoryServer::builder("dc=example,dc=com")
///     .with_base_dn("o=test")
///     .with_listener("test-ldap-listener", 0)
///     .with_bind_credentials("cn=Manager,dc=example,dc=com", "opensesame")
///     .build()
///     .unwrap();
/// assert_eq!(server.config().base_dns.len(), 2);
/// ```
pub struct InMemoryDirectoryServerBuilder {
    config: DirectoryServerConfig,
}

impl InMemoryDirectoryServerBuilder {
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            config: DirectoryServerConfig::new(base_dn),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: DirectoryServerConfig) -> Self {
        Self { config }
    }

    /// Serve an additional naming context.
    pub fn with_base_dn(mut self, base_dn: impl Into<String>) -> Self {
        self.config.base_dns.push(base_dn.into());
        self
    }

    /// Name the listener and pick its port (`0` for any free port).
    pub fn with_listener(mut self, name: impl Into<String>, port: u16) -> Self {
        self.config.listener_name = name.into();
        self.config.listen_port = port;
        self
    }

    pub fn with_listen_address(mut self, address: IpAddr) -> Self {
        self.config.listen_address = address;
        self
    }

    pub fn with_bind_credentials(
        mut self,
        dn: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.add_bind_credentials(dn, password);
        self
    }

    /// Build the server, validating the configuration.
    pub fn build(self) -> Result<InMemoryDirectoryServer, DirectoryError> {
        InMemoryDirectoryServer::new(self.config)
    }
}
