//! Canonical ordering and comparison of entry sets.
//!
//! Two snapshots of a directory (the expected fixture and the live server
//! export) rarely list entries or attributes in the same order. The comparator
//! therefore sorts both sides before walking them in lock step:
//!
//! 1. entries are sorted by DN (plain lexicographic string order);
//! 2. the entry counts must match;
//! 3. the DNs at every index must match;
//! 4. attributes of each entry are sorted by name and their counts must match;
//! 5. attributes are compared pairwise, name and values.
//!
//! Comparison stops at the first divergence, so a [`ContentMismatch`] always
//! describes exactly one problem.
//!
//! # Value order
//!
//! Directory attributes are sets of values, so by default the order in which
//! values are listed is ignored ([`ValueOrder::Unordered`]). Callers that want
//! list semantics can opt into [`ValueOrder::Ordered`].
//!
//! ```rust
//! use ldapunit::compare::assert_entries_match;
//! use ldapunit::entry::DirectoryEntry;
//!
//! let expected = vec![
//!     DirectoryEntry::new("cn=a,dc=example,dc=com").with_attribute("cn", "a"),
//!     DirectoryEntry::new("cn=b,dc=example,dc=com").with_attribute("cn", "b"),
//! ];
//! let mut actual = expected.clone();
//! actual.reverse();
//!
//! assert!(assert_entries_match(expected, actual).is_ok());
//! ```

pub mod report;


pub use report::ContentMismatch;

use crate::directory::dn;
use crate::entry::{Attribute, DirectoryEntry};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Whether the order of values inside an attribute is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrder {
    /// Values are compared as sets.
    #[default]
    Unordered,
    /// Values are compared as lists.
    Ordered,
}

/// Knobs for [`assert_entries_match_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompareOptions {
    #[serde(default)]
    pub value_order: ValueOrder,
}

impl CompareOptions {
    pub fn with_value_order(mut self, value_order: ValueOrder) -> Self {
        self.value_order = value_order;
        self
    }
}

/// Compare two entry sets with the default options.
pub fn assert_entries_match(
    expected: Vec<DirectoryEntry>,
    actual: Vec<DirectoryEntry>,
) -> Result<(), ContentMismatch> {
    assert_entries_match_with(expected, actual, &CompareOptions::default())
}

/// Compare two entry sets.
///
/// Both sets are consumed: they are sorted in place and, on failure, moved
/// into the returned report.
pub fn assert_entries_match_with(
    mut expected: Vec<DirectoryEntry>,
    mut actual: Vec<DirectoryEntry>,
    options: &CompareOptions,
) -> Result<(), ContentMismatch> {
    sort_entries(&mut expected);
    sort_entries(&mut actual);

    if expected.len() != actual.len() {
        return Err(ContentMismatch::EntryCount { expected, actual });
    }

    for (index, (expected, actual)) in expected.into_iter().zip(actual).enumerate() {
        if expected.dn() != actual.dn() {
            return Err(ContentMismatch::Dn {
                index,
                expected: expected.dn().to_string(),
                actual: actual.dn().to_string(),
            });
        }
        trace!("Comparing attributes of '{}'", expected.dn());
        assert_attributes_match(index, expected, actual, options)?;
    }

    Ok(())
}

fn assert_attributes_match(
    index: usize,
    expected: DirectoryEntry,
    actual: DirectoryEntry,
    options: &CompareOptions,
) -> Result<(), ContentMismatch> {
    let (dn, mut expected) = expected.into_parts();
    let (_, mut actual) = actual.into_parts();
    sort_attributes(&mut expected);
    sort_attributes(&mut actual);

    if expected.len() != actual.len() {
        return Err(ContentMismatch::AttributeCount {
            index,
            dn,
            expected,
            actual,
        });
    }

    let diverging = expected
        .iter()
        .zip(&actual)
        .position(|(e, a)| !attributes_equal(e, a, options.value_order));

    match diverging {
        Some(position) => Err(ContentMismatch::Attribute {
            index,
            dn,
            expected: expected.swap_remove(position),
            actual: actual.swap_remove(position),
        }),
        None => Ok(()),
    }
}

/// Sort entries by DN.
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| a.dn().cmp(b.dn()));
}

/// Sort attributes by name; attributes sharing a name keep their relative order.
pub fn sort_attributes(attributes: &mut [Attribute]) {
    attributes.sort_by(|a, b| a.name().cmp(b.name()));
}

/// Structural attribute equality under the given value order.
///
/// Unordered values compare as sets, so repeated values do not count twice.
pub fn attributes_equal(expected: &Attribute, actual: &Attribute, order: ValueOrder) -> bool {
    if expected.name() != actual.name() {
        return false;
    }
    match order {
        ValueOrder::Ordered => expected.values() == actual.values(),
        ValueOrder::Unordered => {
            let e: BTreeSet<&[u8]> = expected.values().iter().map(Vec::as_slice).collect();
            let a: BTreeSet<&[u8]> = actual.values().iter().map(Vec::as_slice).collect();
            e == a
        }
    }
}

/// Drop the entry named `dn`, such as a server's root context entry.
///
/// DNs are matched in normalized form, so `DC=Example, dc=com` removes
/// `dc=example,dc=com`.
pub fn without_entry(entries: Vec<DirectoryEntry>, dn: &str) -> Vec<DirectoryEntry> {
    let key = dn::normalize(dn);
    entries
        .into_iter()
        .filter(|e| dn::normalize(e.dn()) != key)
        .collect()
}
