//! LDIF decoding.

use super::{LdifError, LdifResult};
use crate::entry::DirectoryEntry;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::trace;
use std::io::{BufRead, BufReader, Read};

/// A line after unfolding, tagged with the physical line it started on.
struct LogicalLine {
    number: usize,
    content: Vec<u8>,
    comment: bool,
}

/// Read every entry from an LDIF stream.
///
/// The reader is consumed and dropped before this function returns, whether
/// parsing succeeds or not.
///
/// # Errors
///
/// Returns [`LdifError::Syntax`] for malformed input (a continuation line with
/// nothing to continue, a record that does not start with `dn:`, a line without
/// a `:` separator, invalid base64, change records) and [`LdifError::Io`] when
/// the stream cannot be read.
pub fn read_entries<R: Read>(reader: R) -> LdifResult<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();
    let mut record: Vec<LogicalLine> = Vec::new();

    for (index, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let mut line = line?;
        let number = index + 1;
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if line.is_empty() {
            finish_record(&mut record, &mut entries)?;
            continue;
        }

        if line[0] == b' ' {
            match record.last_mut() {
                Some(previous) => previous.content.extend_from_slice(&line[1..]),
                None => {
                    return Err(LdifError::syntax(
                        number,
                        "continuation line without a preceding line",
                    ));
                }
            }
            continue;
        }

        record.push(LogicalLine {
            number,
            comment: line[0] == b'#',
            content: line,
        });
    }

    finish_record(&mut record, &mut entries)?;
    trace!("Decoded {} LDIF entries", entries.len());
    Ok(entries)
}

/// Turn one blank-line separated record into an entry.
///
/// A `version:` line may open any record, since fixtures that each carry
/// their own header are concatenated into one stream.
fn finish_record(record: &mut Vec<LogicalLine>, entries: &mut Vec<DirectoryEntry>) -> LdifResult<()> {
    let mut lines = std::mem::take(record)
        .into_iter()
        .filter(|line| !line.comment);

    let Some(first) = lines.next() else {
        return Ok(());
    };
    let (mut name, mut value) = parse_line(&first)?;
    let mut dn_line = first.number;

    if name.eq_ignore_ascii_case("version") {
        if value != b"1" {
            return Err(LdifError::syntax(
                first.number,
                format!(
                    "unsupported LDIF version '{}'",
                    String::from_utf8_lossy(&value)
                ),
            ));
        }
        let Some(next) = lines.next() else {
            return Ok(());
        };
        (name, value) = parse_line(&next)?;
        dn_line = next.number;
    }

    if !name.eq_ignore_ascii_case("dn") {
        return Err(LdifError::syntax(
            dn_line,
            format!("record must begin with 'dn:', found '{}:'", name),
        ));
    }
    let dn = String::from_utf8(value)
        .map_err(|_| LdifError::syntax(dn_line, "DN is not valid UTF-8"))?;

    let mut entry = DirectoryEntry::new(dn);
    for line in lines {
        let (name, value) = parse_line(&line)?;
        if name.eq_ignore_ascii_case("changetype") {
            return Err(LdifError::syntax(
                line.number,
                "change records are not supported",
            ));
        }
        entry.add_value(&name, value);
    }

    entries.push(entry);
    Ok(())
}

fn parse_line(line: &LogicalLine) -> LdifResult<(String, Vec<u8>)> {
    let content = &line.content;
    let colon = content
        .iter()
        .position(|&b| b == b':')
        .ok_or_else(|| LdifError::syntax(line.number, "missing ':' separator"))?;

    let name = &content[..colon];
    if name.is_empty() || !name.iter().all(|&b| is_name_char(b)) {
        return Err(LdifError::syntax(
            line.number,
            format!(
                "invalid attribute description '{}'",
                String::from_utf8_lossy(name)
            ),
        ));
    }
    // is_name_char only admits ASCII
    let name = String::from_utf8_lossy(name).into_owned();

    let rest = &content[colon + 1..];
    let value = match rest.first() {
        Some(b':') => {
            let encoded = rest[1..].trim_ascii();
            STANDARD.decode(encoded).map_err(|e| {
                LdifError::syntax(line.number, format!("invalid base64 value for '{}': {}", name, e))
            })?
        }
        Some(b'<') => {
            return Err(LdifError::syntax(
                line.number,
                format!("URL values are not supported (attribute '{}')", name),
            ));
        }
        _ => rest.trim_ascii_start().to_vec(),
    };

    Ok((name, value))
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b';' | b'.' | b'_')
}
