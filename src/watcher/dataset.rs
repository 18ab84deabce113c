//! Fixture markers and test plans.
//!
//! A [`TestDescription`] names a test (or a setup/teardown method) and the
//! fixtures it declares. A [`TestPlan`] groups the test with the setup and
//! teardown methods that run around it.

use serde::{Deserialize, Serialize};

/// Prefix of the default expected-fixture name.
pub const EXPECTED_PREFIX: &str = "expected-";

/// Seed the directory from a fixture before the test runs.
///
/// Without a path the fixture defaults to `<class>/<method>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsingDataSet {
    #[serde(default)]
    pub path: Option<String>,
}

/// Compare the directory against a fixture after the test succeeds.
///
/// Without a path the fixture defaults to `<class>/expected-<method>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShouldMatchDataSet {
    #[serde(default)]
    pub path: Option<String>,
}

impl UsingDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ShouldMatchDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

/// A test or lifecycle method and the fixtures it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDescription {
    pub class_name: String,
    pub method_name: String,
    #[serde(default)]
    pub using: Option<UsingDataSet>,
    #[serde(default)]
    pub should_match: Option<ShouldMatchDataSet>,
}

impl TestDescription {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            using: None,
            should_match: None,
        }
    }

    pub fn using(mut self, marker: UsingDataSet) -> Self {
        self.using = Some(marker);
        self
    }

    pub fn should_match(mut self, marker: ShouldMatchDataSet) -> Self {
        self.should_match = Some(marker);
        self
    }

    /// Fixture to import, or `None` without a [`UsingDataSet`] marker.
    pub fn using_path(&self) -> Option<String> {
        let marker = self.using.as_ref()?;
        Some(explicit(&marker.path).unwrap_or_else(|| {
            format!("{}/{}", self.class_name, self.method_name)
        }))
    }

    /// Fixture to compare against, or `None` without a [`ShouldMatchDataSet`] marker.
    pub fn should_match_path(&self) -> Option<String> {
        let marker = self.should_match.as_ref()?;
        Some(explicit(&marker.path).unwrap_or_else(|| {
            format!("{}/{}{}", self.class_name, EXPECTED_PREFIX, self.method_name)
        }))
    }

    fn same_method(&self, other: &TestDescription) -> bool {
        self.class_name == other.class_name && self.method_name == other.method_name
    }
}

// An empty path counts as omitted
fn explicit(path: &Option<String>) -> Option<String> {
    path.as_deref().filter(|p| !p.is_empty()).map(str::to_string)
}

/// A test together with the setup and teardown methods around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    #[serde(default)]
    pub setup: Vec<TestDescription>,
    pub test: TestDescription,
    #[serde(default)]
    pub teardown: Vec<TestDescription>,
}

impl TestPlan {
    pub fn new(test: TestDescription) -> Self {
        Self {
            setup: Vec::new(),
            test,
            teardown: Vec::new(),
        }
    }

    pub fn with_setup(mut self, setup: TestDescription) -> Self {
        self.setup.push(setup);
        self
    }

    pub fn with_teardown(mut self, teardown: TestDescription) -> Self {
        self.teardown.push(teardown);
        self
    }

    /// Fixtures to import: setup methods first, then the test.
    pub fn import_paths(&self) -> Vec<String> {
        distinct(self.setup.iter().chain(std::iter::once(&self.test)))
            .into_iter()
            .filter_map(TestDescription::using_path)
            .collect()
    }

    /// Fixtures to compare against: the test first, then teardown methods.
    pub fn expected_paths(&self) -> Vec<String> {
        distinct(std::iter::once(&self.test).chain(self.teardown.iter()))
            .into_iter()
            .filter_map(TestDescription::should_match_path)
            .collect()
    }
}

// Keeps the first occurrence of each class/method pair, in order
fn distinct<'a>(
    descriptions: impl Iterator<Item = &'a TestDescription>,
) -> Vec<&'a TestDescription> {
    let mut seen: Vec<&TestDescription> = Vec::new();
    for description in descriptions {
        if !seen.iter().any(|s| s.same_method(description)) {
            seen.push(description);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let test = TestDescription::new("WidgetTest", "testFoo")
            .using(UsingDataSet::new())
            .should_match(ShouldMatchDataSet::new());

        assert_eq!(test.using_path().as_deref(), Some("WidgetTest/testFoo"));
        assert_eq!(
            test.should_match_path().as_deref(),
            Some("WidgetTest/expected-testFoo")
        );
    }

    #[test]
    fn test_explicit_and_empty_paths() {
        let test = TestDescription::new("WidgetTest", "testFoo")
            .using(UsingDataSet::at("shared/base"))
            .should_match(ShouldMatchDataSet::at(""));

        assert_eq!(test.using_path().as_deref(), Some("shared/base"));
        assert_eq!(
            test.should_match_path().as_deref(),
            Some("WidgetTest/expected-testFoo")
        );
    }

    #[test]
    fn test_unmarked_description_has_no_paths() {
        let test = TestDescription::new("WidgetTest", "testFoo");
        assert_eq!(test.using_path(), None);
        assert_eq!(test.should_match_path(), None);
    }

    #[test]
    fn test_import_order_is_setup_then_test() {
        let plan = TestPlan::new(
            TestDescription::new("WidgetTest", "testFoo").using(UsingDataSet::new()),
        )
        .with_setup(TestDescription::new("WidgetTest", "setUp").using(UsingDataSet::new()))
        .with_setup(TestDescription::new("WidgetTest", "unmarked"))
        .with_teardown(TestDescription::new("WidgetTest", "tearDown").using(UsingDataSet::new()));

        assert_eq!(
            plan.import_paths(),
            vec!["WidgetTest/setUp", "WidgetTest/testFoo"]
        );
    }

    #[test]
    fn test_expected_order_is_test_then_teardown() {
        let plan = TestPlan::new(
            TestDescription::new("WidgetTest", "testFoo").should_match(ShouldMatchDataSet::new()),
        )
        .with_setup(
            TestDescription::new("WidgetTest", "setUp").should_match(ShouldMatchDataSet::new()),
        )
        .with_teardown(
            TestDescription::new("WidgetTest", "tearDown")
                .should_match(ShouldMatchDataSet::at("common/after")),
        );

        assert_eq!(
            plan.expected_paths(),
            vec!["WidgetTest/expected-testFoo", "common/after"]
        );
    }

    #[test]
    fn test_duplicate_descriptions_collapse() {
        let setup = TestDescription::new("WidgetTest", "setUp").using(UsingDataSet::new());
        let plan = TestPlan::new(TestDescription::new("WidgetTest", "testFoo"))
            .with_setup(setup.clone())
            .with_setup(setup);

        assert_eq!(plan.import_paths(), vec!["WidgetTest/setUp"]);
    }

    #[test]
    fn test_plan_from_json() {
        let plan: TestPlan = serde_json::from_str(
            r#"{"test": {"class_name": "WidgetTest", "method_name": "testFoo", "using": {}}}"#,
        )
        .unwrap();
        assert_eq!(plan.import_paths(), vec!["WidgetTest/testFoo"]);
        assert!(plan.expected_paths().is_empty());
    }
}
