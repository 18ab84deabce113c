//! Locating and loading LDIF fixture files.

use crate::error::{LdapUnitError, LdapUnitResult};
use crate::ldif::ENTRY_SEPARATOR;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the resource root that holds fixtures.
pub const LDIF_DIR: &str = "ldifs";

/// Default resource root, relative to the working directory.
pub const DEFAULT_RESOURCE_ROOT: &str = "tests/resources";

const LDIF_EXTENSION: &str = "ldif";

/// Maps fixture names such as `WidgetTest/testFoo` to files.
///
/// A name resolves to `<resource_root>/ldifs/<name>.ldif`; the extension is
/// only appended when the name does not already end in `.ldif`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureResolver {
    pub resource_root: PathBuf,
    pub ldif_dir: String,
}

impl Default for FixtureResolver {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from(DEFAULT_RESOURCE_ROOT),
            ldif_dir: LDIF_DIR.to_string(),
        }
    }
}

impl FixtureResolver {
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            resource_root: resource_root.into(),
            ..Self::default()
        }
    }

    /// File backing the fixture `relative`.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let relative = relative.trim_start_matches('/');
        let mut path = self.resource_root.join(&self.ldif_dir).join(relative);
        let has_extension = Path::new(relative)
            .extension()
            .is_some_and(|ext| ext == LDIF_EXTENSION);
        if !has_extension {
            path.as_mut_os_string().push(".");
            path.as_mut_os_string().push(LDIF_EXTENSION);
        }
        path
    }

    /// Read one fixture.
    pub async fn load(&self, relative: &str) -> LdapUnitResult<Vec<u8>> {
        let path = self.resolve(relative);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LdapUnitError::resource_not_found(path))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read several fixtures into one LDIF stream.
    ///
    /// An empty line follows every fixture so entries from neighbouring files
    /// never merge.
    pub async fn concatenate<S: AsRef<str>>(&self, names: &[S]) -> LdapUnitResult<Vec<u8>> {
        let mut out = Vec::new();
        for name in names {
            let name = name.as_ref();
            debug!("Reading LDIF fixture '{}'", name);
            out.extend_from_slice(&self.load(name).await?);
            out.extend_from_slice(ENTRY_SEPARATOR);
        }
        Ok(out)
    }
}
