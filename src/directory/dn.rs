//! Distinguished-name helpers used by the in-memory directory.
//!
//! Only what the directory needs for hierarchy checks: splitting on unescaped
//! commas and a normalized key (RDNs trimmed, ASCII-lowercased). No schema
//! aware matching.

/// Split a DN into its RDNs, honouring backslash escapes.
pub fn rdns(dn: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in dn.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            ',' => {
                parts.push(dn[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = dn[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

/// Normalized form used as the storage key and for DN equality.
pub fn normalize(dn: &str) -> String {
    rdns(dn)
        .iter()
        .map(|rdn| rdn.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

/// The parent DN in normalized form, or `None` for a single-RDN DN.
pub fn parent(dn: &str) -> Option<String> {
    let rdns = rdns(dn);
    if rdns.len() < 2 {
        return None;
    }
    Some(
        rdns[1..]
            .iter()
            .map(|rdn| rdn.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Whether normalized `dn` equals or lies beneath normalized `base`.
pub fn is_within(dn: &str, base: &str) -> bool {
    base.is_empty() || dn == base || dn.ends_with(&format!(",{}", base))
}

/// Number of RDNs in a DN.
pub fn depth(dn: &str) -> usize {
    rdns(dn).len()
}
