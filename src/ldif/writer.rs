//! LDIF encoding.

use super::LINE_SEPARATOR;
use crate::entry::DirectoryEntry;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::io::{self, Write};

/// Maximum line width before folding.
const MAX_LINE_WIDTH: usize = 76;

/// Write every entry, each followed by a blank line.
pub fn write_entries<W: Write>(writer: &mut W, entries: &[DirectoryEntry]) -> io::Result<()> {
    for entry in entries {
        write_entry(writer, entry)?;
    }
    writer.flush()
}

/// Write a single entry followed by a blank line.
///
/// Values that are not LDIF safe strings (leading space, colon or `<`,
/// trailing space, control bytes, non-ASCII) are base64 encoded, so binary
/// values survive unchanged.
pub fn write_entry<W: Write>(writer: &mut W, entry: &DirectoryEntry) -> io::Result<()> {
    write_line(writer, "dn", entry.dn().as_bytes())?;
    for attribute in entry.attributes() {
        for value in attribute.values() {
            write_line(writer, attribute.name(), value)?;
        }
    }
    writer.write_all(LINE_SEPARATOR)
}

/// Encode entries into an in-memory LDIF document.
pub fn to_bytes(entries: &[DirectoryEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    write_entries(&mut out, entries).expect("writing LDIF into a Vec never fails");
    out
}

fn write_line<W: Write>(writer: &mut W, name: &str, value: &[u8]) -> io::Result<()> {
    let line = if is_safe_string(value) {
        let mut line = format!("{}: ", name).into_bytes();
        line.extend_from_slice(value);
        line
    } else {
        format!("{}:: {}", name, STANDARD.encode(value)).into_bytes()
    };
    write_folded(writer, &line)
}

fn write_folded<W: Write>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    let (first, mut rest) = line.split_at(line.len().min(MAX_LINE_WIDTH));
    writer.write_all(first)?;
    writer.write_all(LINE_SEPARATOR)?;
    while !rest.is_empty() {
        let (chunk, tail) = rest.split_at(rest.len().min(MAX_LINE_WIDTH - 1));
        writer.write_all(b" ")?;
        writer.write_all(chunk)?;
        writer.write_all(LINE_SEPARATOR)?;
        rest = tail;
    }
    Ok(())
}

/// RFC 2849 SAFE-STRING.
pub(crate) fn is_safe_string(value: &[u8]) -> bool {
    let Some((&first, _)) = value.split_first() else {
        return true;
    };
    if matches!(first, b' ' | b':' | b'<') || value.last() == Some(&b' ') {
        return false;
    }
    value
        .iter()
        .all(|&b| (0x01..=0x7f).contains(&b) && b != b'\n' && b != b'\r')
}
