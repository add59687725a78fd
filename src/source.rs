//! Dependency source configuration
//!
//! Identifies the native dependency being vendored: a name prefix used to
//! match directory and archive entries under the scan root, and the URL the
//! source archive is fetched from when nothing is present locally.

use std::path::{Path, PathBuf};

/// Identifies a vendorable native dependency.
///
/// Passed explicitly into every pipeline stage rather than read from
/// process-wide state, so tests can point the pipeline at arbitrary
/// roots and servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySource {
    /// Prefix matched (case-insensitively) against entry names under the scan root
    pub name_prefix: String,
    /// URL of the gzip-compressed source tarball
    pub url: String,
}

impl DependencySource {
    /// Create a source from an explicit prefix and URL.
    #[must_use]
    pub fn new(name_prefix: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into().to_lowercase(),
            url: url.into(),
        }
    }

    /// The default vendored dependency: LuaJIT.
    ///
    /// The URL can be overridden via `SMELT_SOURCE_URL`.
    #[must_use]
    pub fn luajit() -> Self {
        Self::new(crate::DEFAULT_NAME_PREFIX, crate::source_url())
    }

    /// Check whether an entry name belongs to this dependency.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().starts_with(&self.name_prefix)
    }

    /// Local filename for the downloaded archive (final URL path segment).
    ///
    /// Falls back to `<prefix>.tar.gz` for URLs without a usable last
    /// segment (e.g. a trailing slash).
    #[must_use]
    pub fn archive_filename(&self) -> String {
        let rest = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);

        match rest.trim_end_matches('/').rsplit_once('/') {
            Some((_, name)) if !name.is_empty() => name.to_string(),
            _ => format!("{}.tar.gz", self.name_prefix),
        }
    }

    /// Where the downloaded archive lands under `root`.
    #[must_use]
    pub fn archive_path(&self, root: &Path) -> PathBuf {
        root.join(self.archive_filename())
    }
}
