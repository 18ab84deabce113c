//! Shared setup for the integration tests.
//!
//! Every test starts its own in-memory server for `dc=zimory,dc=com` with a
//! manager credential and the root entry already imported.

#![allow(dead_code)]

use ldapunit::access::StandardDirectoryAccess;
use ldapunit::config::HarnessConfig;
use ldapunit::directory::InMemoryDirectoryServer;
use ldapunit::harness::LdapTestHarness;
use ldapunit::watcher::FixtureResolver;
use std::path::PathBuf;

pub const ROOT_CONTEXT_DN: &str = "dc=zimory,dc=com";

pub const ROOT_CONTEXT_ENTRY: &str = "dn: dc=zimory,dc=com\n\
    dc: zimory\n\
    objectClass: dcObject\n\
    objectClass: organizationalUnit\n\
    ou: zimory.com";

pub const MANAGER_DN: &str = "cn=Manager,dc=zimory,dc=com";
pub const MANAGER_PASSWORD: &str = "opensesame";

/// Initialize logging once; `RUST_LOG=debug` shows the harness at work.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `tests/resources` of this crate, independent of the working directory.
pub fn resource_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("resources")
}

pub fn harness_config() -> HarnessConfig {
    let mut config = HarnessConfig::new(ROOT_CONTEXT_DN).with_root_entry_ldif(ROOT_CONTEXT_ENTRY);
    config
        .server
        .add_bind_credentials(MANAGER_DN, MANAGER_PASSWORD);
    config.fixtures = FixtureResolver::new(resource_root());
    config
}

pub async fn start_harness() -> LdapTestHarness {
    init_logging();
    LdapTestHarness::start(harness_config())
        .await
        .expect("harness should start")
}

/// A server with the root entry, plus an access facade stripping it.
pub fn access_for(
    server: &InMemoryDirectoryServer,
) -> StandardDirectoryAccess<InMemoryDirectoryServer> {
    StandardDirectoryAccess::for_in_memory(server.clone())
}
