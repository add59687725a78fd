//! Scan root inspection
//!
//! Lists the scan root once and classifies every entry belonging to the
//! vendored dependency (matched by name prefix) as an extracted source
//! tree, a source archive, or something else. The classification is shared
//! by the pipeline and the status/clean commands so the same predicate is
//! applied everywhere.

use crate::source::DependencySource;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of filesystem entry a matching name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory, presumed to be an extracted source tree
    Directory,
    /// A gzip-compressed tarball of the dependency source
    Archive,
    /// A matching name that is neither (stray file, symlink, etc.)
    Other,
}

/// A classified entry under the scan root.
///
/// Transient: recomputed on every scan, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Entry name as enumerated
    pub name: String,
    /// Full path to the entry
    pub path: PathBuf,
    /// Classification by filesystem type
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Whether this entry is an extracted source tree.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether this entry is a source archive.
    #[must_use]
    pub fn is_archive(&self) -> bool {
        self.kind == EntryKind::Archive
    }
}

/// List `root` once and return every entry matching `source`, classified.
///
/// Order is filesystem enumeration order, which is not stable across
/// platforms; callers may only rely on "first match wins". No side effects.
///
/// # Errors
///
/// Returns an error if the root directory cannot be read.
pub fn scan(root: &Path, source: &DependencySource) -> io::Result<Vec<DirectoryEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();

        if !source.matches(&name) {
            continue;
        }

        let path = entry.path();
        let kind = classify(&path, &name);

        entries.push(DirectoryEntry { name, path, kind });
    }

    Ok(entries)
}

/// Matching entries that are extracted source trees.
#[must_use]
pub fn source_trees(entries: &[DirectoryEntry]) -> Vec<&DirectoryEntry> {
    entries.iter().filter(|entry| entry.is_tree()).collect()
}

/// Matching entries that are source archives.
#[must_use]
pub fn archives(entries: &[DirectoryEntry]) -> Vec<&DirectoryEntry> {
    entries.iter().filter(|entry| entry.is_archive()).collect()
}

fn classify(path: &Path, name: &str) -> EntryKind {
    if path.is_dir() {
        EntryKind::Directory
    } else if name.to_lowercase().ends_with(".tar.gz") {
        EntryKind::Archive
    } else {
        EntryKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn luajit_source() -> DependencySource {
        DependencySource::new("luajit", "https://example.com/LuaJIT-2.0.0.tar.gz")
    }

    #[test]
    fn empty_root_yields_no_entries() {
        let temp = TempDir::new().unwrap();

        let entries = scan(temp.path(), &luajit_source()).unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn classifies_tree_archive_and_other() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("LuaJIT-2.0.0")).unwrap();
        fs::write(temp.path().join("LuaJIT-2.0.0.tar.gz"), b"not really a tarball").unwrap();
        fs::write(temp.path().join("luajit-notes.txt"), b"scratch").unwrap();

        let entries = scan(temp.path(), &luajit_source()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(source_trees(&entries).len(), 1);
        assert_eq!(archives(&entries).len(), 1);
        assert!(
            entries
                .iter()
                .any(|entry| entry.kind == EntryKind::Other && entry.name == "luajit-notes.txt")
        );
    }

    #[test]
    fn excludes_non_matching_names() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("lua-5.4.6")).unwrap();
        fs::write(temp.path().join("README.md"), b"docs").unwrap();

        let entries = scan(temp.path(), &luajit_source()).unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("LuaJIT-2.0.0")).unwrap();

        let entries = scan(temp.path(), &luajit_source()).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries.first().unwrap().is_tree());
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");

        assert!(scan(&missing, &luajit_source()).is_err());
    }
}
