//! Build artifact resolution
//!
//! A completed native build leaves a library file under the source tree's
//! `src/` directory, named by platform convention. Resolution iterates a
//! fixed candidate table rather than branching on host OS detection, so a
//! tree cross-built for another platform still resolves.

use std::path::{Path, PathBuf};

/// The platform-specific forms a build artifact may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// POSIX static library (`libluajit.a`)
    StaticArchive,
    /// Windows import library (`lua51.lib`), linked against a DLL that
    /// must ship alongside the extension
    ImportLibrary,
}

/// Candidate kinds in resolution order. First existing file wins, so the
/// POSIX name shadows the Windows pair when both are present.
pub const CANDIDATE_KINDS: [ArtifactKind; 2] =
    [ArtifactKind::StaticArchive, ArtifactKind::ImportLibrary];

impl ArtifactKind {
    /// The library filename this kind is recognized by.
    #[must_use]
    pub const fn library_filename(self) -> &'static str {
        match self {
            Self::StaticArchive => "libluajit.a",
            Self::ImportLibrary => "lua51.lib",
        }
    }

    /// Co-located dynamic library that must be redistributed, if any.
    #[must_use]
    pub const fn redistributable(self) -> Option<&'static str> {
        match self {
            Self::StaticArchive => None,
            Self::ImportLibrary => Some("lua51.dll"),
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StaticArchive => "static archive",
            Self::ImportLibrary => "import library",
        }
    }
}

/// A build output confirmed to exist on disk.
///
/// Only constructed by [`resolve`] after the existence check; immutable
/// once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    /// Absolute (or root-relative) path to the built library file
    pub library_path: PathBuf,
    /// Platform form of the artifact
    pub kind: ArtifactKind,
    /// Include directory associated with the source tree
    pub include_dir: PathBuf,
}

/// Look for a completed build inside `source_dir`.
///
/// Checks `source_dir/src` for each candidate filename in table order.
/// `None` means "build required" before a build attempt and "artifact
/// missing" (fatal) after one; the caller decides which.
#[must_use]
pub fn resolve(source_dir: &Path) -> Option<BuildArtifact> {
    let build_dir = source_dir.join("src");
    if !build_dir.is_dir() {
        return None;
    }

    for kind in CANDIDATE_KINDS {
        let library_path = build_dir.join(kind.library_filename());

        if library_path.is_file() {
            crate::debug!(
                "resolved {} at {}",
                kind.description(),
                library_path.display()
            );

            return Some(BuildArtifact {
                library_path,
                kind,
                include_dir: build_dir,
            });
        }
    }

    None
}

/// Whether `source_dir` contains a build directory at all.
///
/// Trees without a `src/` subdirectory are not buildable and are skipped
/// by the pipeline instead of handed to the build tool.
#[must_use]
pub fn has_build_dir(source_dir: &Path) -> bool {
    source_dir.join("src").is_dir()
}
