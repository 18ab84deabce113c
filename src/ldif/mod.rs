//! LDIF reading and writing.
//!
//! Implements the content-record subset of RFC 2849 needed for directory
//! fixtures: an optional `version: 1` header, `#` comments, folded lines,
//! plain (`attr: value`) and base64 (`attr:: dmFsdWU=`) values, and blank lines
//! between records. Change records are rejected.
//!
//! # Example Usage
//!
//! ```rust
//! use ldapunit::ldif;
//!
//! let input = "dn: cn=alice,dc=example,dc=com\ncn: alice\nobjectClass: person\n";
//! let entries = ldif::read_entries(input.as_bytes()).unwrap();
//! assert_eq!(entries.len(), 1);
//!
//! let bytes = ldif::to_bytes(&entries);
//! assert_eq!(ldif::read_entries(bytes.as_slice()).unwrap(), entries);
//! ```

pub mod errors;
pub mod reader;
pub mod writer;


pub use errors::{LdifError, LdifResult};
pub use reader::read_entries;
pub use writer::{to_bytes, write_entries, write_entry};

/// Separator terminating every line written by this crate.
pub const LINE_SEPARATOR: &[u8] = b"\n";

/// An empty line: what separates two records.
pub const ENTRY_SEPARATOR: &[u8] = b"\n\n";
