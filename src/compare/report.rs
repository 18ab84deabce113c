//! The divergence report produced by the comparator.

use crate::entry::{Attribute, DirectoryEntry};
use std::fmt;

/// The first difference found between an expected and an actual entry set.
///
/// Indices refer to positions after sorting by DN. The `Display` output is the
/// assertion message a test author reads, so it spells out counts, DNs and the
/// full attribute dumps involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentMismatch {
    /// The sets hold a different number of entries.
    EntryCount {
        expected: Vec<DirectoryEntry>,
        actual: Vec<DirectoryEntry>,
    },

    /// Same size, but a different DN at `index`.
    Dn {
        index: usize,
        expected: String,
        actual: String,
    },

    /// The entry at `index` has a different number of attributes.
    AttributeCount {
        index: usize,
        dn: String,
        expected: Vec<Attribute>,
        actual: Vec<Attribute>,
    },

    /// The entry at `index` has an attribute whose name or values differ.
    Attribute {
        index: usize,
        dn: String,
        expected: Attribute,
        actual: Attribute,
    },
}

impl ContentMismatch {
    /// Index of the diverging entry, if the mismatch concerns a single entry.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::EntryCount { .. } => None,
            Self::Dn { index, .. }
            | Self::AttributeCount { index, .. }
            | Self::Attribute { index, .. } => Some(*index),
        }
    }
}

impl fmt::Display for ContentMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentMismatch::EntryCount { expected, actual } => {
                writeln!(
                    f,
                    "Number of entries differs: expected {}, actual {}",
                    expected.len(),
                    actual.len()
                )?;
                writeln!(f, "\tExpected entries:")?;
                write_entries(f, expected)?;
                writeln!(f)?;
                writeln!(f, "\tActual entries:")?;
                write_entries(f, actual)
            }
            ContentMismatch::Dn {
                index,
                expected,
                actual,
            } => write!(
                f,
                "Entries' DNs differ at index {}: expected '{}', actual '{}'",
                index, expected, actual
            ),
            ContentMismatch::AttributeCount {
                index,
                dn,
                expected,
                actual,
            } => {
                writeln!(
                    f,
                    "Number of attributes differs for entry at index {} ('{}'): expected {}, actual {}",
                    index,
                    dn,
                    expected.len(),
                    actual.len()
                )?;
                write!(f, "\tExpected attributes: ")?;
                write_attributes(f, expected)?;
                writeln!(f)?;
                write!(f, "\tActual attributes: ")?;
                write_attributes(f, actual)
            }
            ContentMismatch::Attribute {
                index,
                dn,
                expected,
                actual,
            } => write!(
                f,
                "Attributes differ for entry at index {} ('{}'):\n\tExpected: {}\n\tActual: {}",
                index, dn, expected, actual
            ),
        }
    }
}

impl std::error::Error for ContentMismatch {}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[DirectoryEntry]) -> fmt::Result {
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "\t\t{}", entry)?;
    }
    Ok(())
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &[Attribute]) -> fmt::Result {
    f.write_str("[")?;
    for (i, attribute) in attributes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", attribute)?;
    }
    f.write_str("]")
}
