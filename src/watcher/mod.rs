//! Fixture lifecycle around a single test.
//!
//! [`LdapWatcher`] is driven by the test runner's hooks. Before a test it
//! imports the fixtures declared with [`UsingDataSet`] on the setup methods and
//! the test itself; after a successful test it compares the directory with the
//! fixtures declared with [`ShouldMatchDataSet`] on the test and its teardown
//! methods. Fixtures of one phase are concatenated and handed to the access
//! facade in a single call.
//!
//! The watcher holds a factory for the access facade rather than a server, so
//! every phase talks to whatever server the factory currently points at.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ldapunit::access::StandardDirectoryAccess;
//! use ldapunit::directory::InMemoryDirectoryServer;
//! use ldapunit::watcher::{LdapWatcher, TestDescription, TestPlan, UsingDataSet, ShouldMatchDataSet};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = InMemoryDirectoryServer::builder("dc=example,dc=com").build()?;
//! let watcher = LdapWatcher::new(|| StandardDirectoryAccess::for_in_memory(server.clone()));
//!
//! let plan = TestPlan::new(
//!     TestDescription::new("WidgetTest", "testFoo")
//!         .using(UsingDataSet::new())
//!         .should_match(ShouldMatchDataSet::new()),
//! );
//!
//! // Imports tests/resources/ldifs/WidgetTest/testFoo.ldif, runs the body, then
//! // compares with tests/resources/ldifs/WidgetTest/expected-testFoo.ldif
//! watcher
//!     .watch(&plan, || async { Ok::<_, std::io::Error>(()) })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod fixtures;

pub use dataset::{EXPECTED_PREFIX, ShouldMatchDataSet, TestDescription, TestPlan, UsingDataSet};
pub use fixtures::{FixtureResolver, LDIF_DIR};

use crate::access::DirectoryServerAccess;
use crate::error::{LdapUnitError, LdapUnitResult};
use log::{debug, info};
use std::future::Future;

/// Imports and verifies LDIF fixtures around a test.
pub struct LdapWatcher<F> {
    access: F,
    fixtures: FixtureResolver,
}

impl<F, A> LdapWatcher<F>
where
    F: Fn() -> A,
    A: DirectoryServerAccess,
{
    /// Create a watcher resolving fixtures under `tests/resources/ldifs`.
    pub fn new(access: F) -> Self {
        Self {
            access,
            fixtures: FixtureResolver::default(),
        }
    }

    pub fn with_fixtures(mut self, fixtures: FixtureResolver) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn fixtures(&self) -> &FixtureResolver {
        &self.fixtures
    }

    /// Import the fixtures of the setup methods and the test.
    ///
    /// Does nothing when none of them carries a [`UsingDataSet`] marker.
    pub async fn starting(&self, plan: &TestPlan) -> LdapUnitResult<()> {
        let paths = plan.import_paths();
        if paths.is_empty() {
            return Ok(());
        }

        for path in &paths {
            debug!("Importing LDIF from '{}'", path);
        }
        let ldif = self.fixtures.concatenate(&paths).await?;
        (self.access)().import_ldif(ldif.as_slice()).await?;
        info!(
            "Imported {} fixture(s) for {}.{}",
            paths.len(),
            plan.test.class_name,
            plan.test.method_name
        );
        Ok(())
    }

    /// Compare the directory with the fixtures of the test and its teardown
    /// methods.
    ///
    /// Does nothing when none of them carries a [`ShouldMatchDataSet`] marker.
    pub async fn succeeded(&self, plan: &TestPlan) -> LdapUnitResult<()> {
        let paths = plan.expected_paths();
        if paths.is_empty() {
            return Ok(());
        }

        for path in &paths {
            debug!("Using LDIF from '{}' to match against LDAP contents", path);
        }
        let ldif = self.fixtures.concatenate(&paths).await?;
        (self.access)().compare_contents(ldif.as_slice()).await?;
        info!(
            "Directory contents match for {}.{}",
            plan.test.class_name, plan.test.method_name
        );
        Ok(())
    }

    /// Run `body` between [`starting`](Self::starting) and
    /// [`succeeded`](Self::succeeded).
    ///
    /// The comparison only runs when the body returns `Ok`; a failing body is
    /// reported as [`LdapUnitError::TestBody`].
    pub async fn watch<B, Fut, T, E>(&self, plan: &TestPlan, body: B) -> LdapUnitResult<T>
    where
        B: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.starting(plan).await?;
        let value = body().await.map_err(LdapUnitError::test_body)?;
        self.succeeded(plan).await?;
        Ok(value)
    }
}
