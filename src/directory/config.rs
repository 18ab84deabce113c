//! Configuration for the in-memory directory server.

use super::DirectoryError;
use super::dn;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// A DN/password pair accepted by simple bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindCredential {
    pub dn: String,
    pub password: String,
}

/// Settings for [`InMemoryDirectoryServer`](super::InMemoryDirectoryServer).
///
/// A server serves one or more naming contexts (base DNs); every entry added
/// to it must live beneath one of them. The listener binds to
/// `listen_address:listen_port`, where port `0` lets the OS choose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryServerConfig {
    pub base_dns: Vec<String>,
    pub listener_name: String,
    pub listen_address: IpAddr,
    pub listen_port: u16,
    pub bind_credentials: Vec<BindCredential>,
}

impl Default for DirectoryServerConfig {
    fn default() -> Self {
        Self {
            base_dns: Vec::new(),
            listener_name: "test-ldap-listener".to_string(),
            listen_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            listen_port: 0,
            bind_credentials: Vec::new(),
        }
    }
}

impl DirectoryServerConfig {
    /// Configuration serving a single base DN.
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            base_dns: vec![base_dn.into()],
            ..Self::default()
        }
    }

    /// Accept an extra DN/password pair for simple bind.
    pub fn add_bind_credentials(&mut self, dn: impl Into<String>, password: impl Into<String>) {
        self.bind_credentials.push(BindCredential {
            dn: dn.into(),
            password: password.into(),
        });
    }

    pub fn listen_socket(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.listen_port)
    }

    /// The first configured base DN, conventionally the root context.
    pub fn root_context_dn(&self) -> Option<&str> {
        self.base_dns.first().map(String::as_str)
    }

    /// Whether `dn`/`password` match one of the configured credentials.
    pub fn accepts(&self, bind_dn: &str, password: &str) -> bool {
        let bind_dn = dn::normalize(bind_dn);
        self.bind_credentials
            .iter()
            .any(|c| dn::normalize(&c.dn) == bind_dn && c.password == password)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.base_dns.is_empty() {
            return Err(DirectoryError::configuration_parameter(
                "at least one base DN is required",
                "base_dns",
            ));
        }
        if self.base_dns.iter().any(|b| b.trim().is_empty()) {
            return Err(DirectoryError::configuration_parameter(
                "base DNs cannot be empty",
                "base_dns",
            ));
        }
        for credential in &self.bind_credentials {
            if credential.dn.trim().is_empty() || credential.password.is_empty() {
                return Err(DirectoryError::configuration_parameter(
                    "bind credentials need a DN and a password",
                    "bind_credentials",
                ));
            }
        }
        if self.listener_name.is_empty() {
            return Err(DirectoryError::configuration_parameter(
                "listener name cannot be empty",
                "listener_name",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_base_dn() {
        let config = DirectoryServerConfig::default();
        assert!(matches!(
            config.validate(),
            Err(DirectoryError::Configuration { .. })
        ));
        assert!(DirectoryServerConfig::new("dc=example,dc=com").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_incomplete_credentials() {
        let mut config = DirectoryServerConfig::new("dc=example,dc=com");
        config.add_bind_credentials("cn=Manager,dc=example,dc=com", "");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accepts_normalizes_dn() {
        let mut config = DirectoryServerConfig::new("dc=example,dc=com");
        config.add_bind_credentials("cn=Manager,dc=example,dc=com", "opensesame");

        assert!(config.accepts("CN=Manager, dc=example,dc=com", "opensesame"));
        assert!(!config.accepts("cn=Manager,dc=example,dc=com", "wrong"));
        assert!(!config.accepts("cn=Other,dc=example,dc=com", "opensesame"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: DirectoryServerConfig =
            serde_json::from_str(r#"{"base_dns": ["dc=example,dc=com"], "listen_port": 10389}"#)
                .unwrap();
        assert_eq!(config.root_context_dn(), Some("dc=example,dc=com"));
        assert_eq!(config.listener_name, "test-ldap-listener");
        assert_eq!(config.listen_socket().to_string(), "127.0.0.1:10389");
    }
}
