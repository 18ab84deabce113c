//! Harness configuration.
//!
//! A [`HarnessConfig`] gathers everything needed to stand up a test directory:
//! where fixtures live, how the in-memory server is configured and how
//! contents are compared. Every section has defaults, so a JSON file only
//! needs the fields it changes:
//!
//! ```json
//! {
//!   "server": {
//!     "base_dns": ["dc=zimory,dc=com"],
//!     "bind_credentials": [{"dn": "cn=Manager,dc=zimory,dc=com", "password": "opensesame"}]
//!   },
//!   "fixtures": {"resource_root": "tests/resources"},
//!   "compare": {"value_order": "ordered"}
//! }
//! ```

use crate::compare::CompareOptions;
use crate::directory::DirectoryServerConfig;
use crate::error::{LdapUnitError, LdapUnitResult};
use crate::watcher::FixtureResolver;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub fixtures: FixtureResolver,
    pub server: DirectoryServerConfig,
    pub compare: CompareOptions,
    /// Entry added right after the server starts, usually the root context.
    pub root_entry_ldif: Option<String>,
}

impl HarnessConfig {
    /// Configuration for a server with a single base DN.
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            server: DirectoryServerConfig::new(base_dn),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration.
    pub fn from_json_str(json: &str) -> LdapUnitResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LdapUnitError::configuration(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LdapUnitResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LdapUnitError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_root_entry_ldif(mut self, ldif: impl Into<String>) -> Self {
        self.root_entry_ldif = Some(ldif.into());
        self
    }

    pub fn validate(&self) -> LdapUnitResult<()> {
        self.server
            .validate()
            .map_err(|e| LdapUnitError::configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ValueOrder;
    use std::path::PathBuf;

    #[test]
    fn test_from_json_str_with_defaults() {
        let config = HarnessConfig::from_json_str(
            r#"{"server": {"base_dns": ["dc=zimory,dc=com"]}, "compare": {"value_order": "ordered"}}"#,
        )
        .unwrap();

        assert_eq!(config.server.root_context_dn(), Some("dc=zimory,dc=com"));
        assert_eq!(config.compare.value_order, ValueOrder::Ordered);
        assert_eq!(config.fixtures.resource_root, PathBuf::from("tests/resources"));
        assert_eq!(config.root_entry_ldif, None);
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let result = HarnessConfig::from_json_str("{not json");
        assert!(matches!(result, Err(LdapUnitError::Configuration { .. })));
    }

    #[test]
    fn test_missing_base_dn_is_configuration_error() {
        let result = HarnessConfig::from_json_str("{}");
        match result {
            Err(LdapUnitError::Configuration { message }) => {
                assert!(message.contains("base DN"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = HarnessConfig::from_json_file("does/not/exist.json");
        assert!(matches!(result, Err(LdapUnitError::Configuration { .. })));
    }
}
