//! Source archive extraction
//!
//! Unpacks a gzip-compressed source tarball under the scan root. The
//! archive's own top-level entries name the directories that appear, so a
//! `LuaJIT-2.0.0.tar.gz` yields a `LuaJIT-2.0.0/` tree next to it.

use flate2::read::GzDecoder;
use std::fs;
use std::path::{Path, PathBuf};
use tar::Archive;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to unpack archive {path}: {source}")]
    Unpack {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fully extract the gzip tarball at `archive_path` under `dest_root`.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or any member cannot
/// be written (corrupt archive, permissions, disk full). A failed
/// extraction may leave partial trees behind; re-running the pipeline
/// re-scans rather than assuming a clean root.
pub fn extract(archive_path: &Path, dest_root: &Path) -> Result<(), ExtractError> {
    crate::debug!("extracting {} -> {}", archive_path.display(), dest_root.display());

    let file = fs::File::open(archive_path).map_err(|source| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let gz = GzDecoder::new(file);
    let mut archive = Archive::new(gz);

    archive
        .unpack(dest_root)
        .map_err(|source| ExtractError::Unpack {
            path: archive_path.to_path_buf(),
            source,
        })
}
