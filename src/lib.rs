//! LDAP fixture harness for Rust tests.
//!
//! Seeds an embedded directory server from LDIF fixtures before a test and
//! checks its contents against expected LDIF afterwards, reporting the first
//! difference in a stable, readable form.
//!
//! # Core Components
//!
//! - [`ldif`] - LDIF reader and writer
//! - [`compare`] - Canonical ordering and comparison of entry sets
//! - [`directory`] - [`DirectoryServer`] trait and the in-memory server with its LDAP listener
//! - [`access`] - Import and compare against a running server
//! - [`watcher`] - Fixture lifecycle around a test
//! - [`harness`] - One-call setup of a listening server
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ldapunit::config::HarnessConfig;
//! use ldapunit::harness::LdapTestHarness;
//! use ldapunit::watcher::{ShouldMatchDataSet, TestDescription, TestPlan, UsingDataSet};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let harness = LdapTestHarness::start(
//!     HarnessConfig::new("dc=example,dc=com")
//!         .with_root_entry_ldif("dn: dc=example,dc=com\ndc: example\n"),
//! )
//! .await?;
//!
//! let plan = TestPlan::new(
//!     TestDescription::new("UserTest", "addsUser")
//!         .using(UsingDataSet::new())
//!         .should_match(ShouldMatchDataSet::new()),
//! );
//! harness
//!     .watcher()
//!     .watch(&plan, || async {
//!         // talk to harness.ldap_url() here
//!         Ok::<_, std::io::Error>(())
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod compare;
pub mod config;
pub mod directory;
pub mod entry;
pub mod error;
pub mod harness;
pub mod ldif;
pub mod ports;
pub mod watcher;

// Re-export commonly used types for convenience
pub use access::{DirectoryServerAccess, StandardDirectoryAccess};
pub use compare::{CompareOptions, ContentMismatch, ValueOrder, assert_entries_match};
pub use config::HarnessConfig;
pub use directory::{DirectoryError, DirectoryServer, InMemoryDirectoryServer};
pub use entry::{Attribute, DirectoryEntry, EntrySet};
pub use error::{LdapUnitError, LdapUnitResult};
pub use harness::LdapTestHarness;
pub use watcher::{LdapWatcher, ShouldMatchDataSet, TestDescription, TestPlan, UsingDataSet};
