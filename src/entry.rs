//! Directory entry model shared by the LDIF codec, the comparator and the
//! in-memory directory server.
//!
//! A [`DirectoryEntry`] is a distinguished name plus an ordered list of
//! [`Attribute`]s. Attribute values are opaque byte sequences; most of them are
//! UTF-8 text, but binary values (certificates, photos) must survive every
//! import/export untouched.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::borrow::Cow;
use std::fmt;

/// An ordered sequence of entries, as read from LDIF or exported from a server.
pub type EntrySet = Vec<DirectoryEntry>;

/// A named attribute with one or more values.
///
/// The name is kept exactly as written (comparison is case-sensitive) and the
/// values keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Vec<Vec<u8>>,
}

impl Attribute {
    /// Create an attribute holding a single value.
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Create an attribute from any number of values.
    pub fn with_values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    /// Values decoded as UTF-8, replacing invalid sequences.
    pub fn string_values(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.values.iter().map(|v| String::from_utf8_lossy(v))
    }

    pub fn add_value(&mut self, value: impl Into<Vec<u8>>) {
        self.values.push(value.into());
    }

    pub fn has_value(&self, value: &[u8]) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Whether the attribute name matches, ignoring ASCII case.
    pub(crate) fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute(name={}, values={{", self.name)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_value(f, value)?;
        }
        f.write_str("})")
    }
}

/// Printable values are quoted, everything else is shown as base64.
fn write_value(f: &mut fmt::Formatter<'_>, value: &[u8]) -> fmt::Result {
    match std::str::from_utf8(value) {
        Ok(text) if !text.chars().any(char::is_control) => write!(f, "'{}'", text),
        _ => write!(f, "base64:{}", STANDARD.encode(value)),
    }
}

/// A directory entry: a DN plus its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    dn: String,
    attributes: Vec<Attribute>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style variant of [`add_value`](Self::add_value).
    pub fn with_attribute(mut self, name: &str, value: impl Into<Vec<u8>>) -> Self {
        self.add_value(name, value);
        self
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.attributes
    }

    /// Look up an attribute by its exact name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Append a value to the attribute called `name`, creating the attribute
    /// at the end of the list when it does not exist yet.
    pub fn add_value(&mut self, name: &str, value: impl Into<Vec<u8>>) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attribute) => attribute.add_value(value),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn into_parts(self) -> (String, Vec<Attribute>) {
        (self.dn, self.attributes)
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry(dn='{}', attributes={{", self.dn)?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", attribute)?;
        }
        f.write_str("})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_value_merges_into_existing_attribute() {
        let entry = DirectoryEntry::new("cn=alice,dc=example,dc=com")
            .with_attribute("objectClass", "top")
            .with_attribute("cn", "alice")
            .with_attribute("objectClass", "person");

        assert_eq!(entry.attributes().len(), 2);
        assert_eq!(entry.attributes()[0].name(), "objectClass");
        assert_eq!(
            entry.attribute("objectClass").unwrap().values(),
            &[b"top".to_vec(), b"person".to_vec()]
        );
    }

    #[test]
    fn test_attribute_lookup_is_case_sensitive() {
        let entry = DirectoryEntry::new("dc=example,dc=com").with_attribute("dc", "example");
        assert!(entry.attribute("dc").is_some());
        assert!(entry.attribute("DC").is_none());
        assert!(entry.attributes()[0].is_named("DC"));
    }

    #[test]
    fn test_display_renders_text_and_binary_values() {
        let entry = DirectoryEntry::new("cn=bob,dc=example,dc=com")
            .with_attribute("cn", "bob")
            .with_attribute("jpegPhoto", vec![0xff, 0xd8, 0x00]);

        assert_eq!(
            entry.to_string(),
            "Entry(dn='cn=bob,dc=example,dc=com', attributes={Attribute(name=cn, values={'bob'}), \
             Attribute(name=jpegPhoto, values={base64:/9gA})})"
        );
    }

    #[test]
    fn test_string_values_are_lossy() {
        let attribute = Attribute::with_values("description", vec![b"ok".to_vec(), vec![0xc3]]);
        let values: Vec<_> = attribute.string_values().collect();
        assert_eq!(values[0], "ok");
        assert_eq!(values[1], "\u{fffd}");
    }
}
