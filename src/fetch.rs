//! Source archive download
//!
//! Fetches the dependency's source tarball over HTTP(S), streaming the
//! body to a temporary file that is atomically persisted at the final
//! path. One attempt only: the pipeline treats a failed fetch as fatal
//! for the run, so there is no retry loop here.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} error fetching {url}")]
    Http { status: u16, url: String },

    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to write downloaded archive: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to persist downloaded archive to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },
}

impl FetchError {
    /// Wrap an IO error for use in `map_err`
    fn wrap_io(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

/// Downloads source archives.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    expected_sha256: Option<String>,
}

impl Fetcher {
    /// Create a fetcher with the default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        // Transport defaults only: no retry, no overall timeout
        let client = reqwest::Client::builder()
            .user_agent(format!("smelt/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            expected_sha256: None,
        })
    }

    /// Require the downloaded archive to match a SHA-256 digest.
    ///
    /// Verification is opt-in; with no expected digest the archive is
    /// accepted as-is.
    #[must_use]
    pub fn with_expected_sha256(mut self, digest: Option<String>) -> Self {
        self.expected_sha256 = digest.map(|d| d.to_lowercase());
        self
    }

    /// Download `url` to `dest_path`, returning the written path.
    ///
    /// Streams the response body to a temporary file next to the
    /// destination and renames it into place, so a killed run never
    /// leaves a half-written archive at the final path.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success response, a
    /// write failure, or (when configured) a checksum mismatch.
    pub async fn fetch(&self, url: &str, dest_path: &Path) -> Result<PathBuf, FetchError> {
        crate::debug!("fetching {url} -> {}", dest_path.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let dest_dir = dest_path.parent().unwrap_or_else(|| Path::new("."));
        let temp_file = tempfile::NamedTempFile::new_in(dest_dir).map_err(FetchError::wrap_io)?;

        {
            let file_std = temp_file
                .as_file()
                .try_clone()
                .map_err(FetchError::wrap_io)?;
            let mut file = tokio::fs::File::from_std(file_std);

            let mut stream = response.bytes_stream();
            while let Some(chunk_result) = stream.next().await {
                let chunk = chunk_result.map_err(|source| FetchError::Network {
                    url: url.to_string(),
                    source,
                })?;
                file.write_all(&chunk).await.map_err(FetchError::wrap_io)?;
            }

            file.flush().await.map_err(FetchError::wrap_io)?;
        } // File is closed here

        if let Some(expected) = &self.expected_sha256 {
            let actual = compute_sha256(temp_file.path()).map_err(FetchError::wrap_io)?;
            if &actual != expected {
                return Err(FetchError::ChecksumMismatch {
                    url: url.to_string(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        // Atomic rename
        temp_file
            .persist(dest_path)
            .map_err(|source| FetchError::Persist {
                path: dest_path.to_path_buf(),
                source,
            })?;

        Ok(dest_path.to_path_buf())
    }
}

/// Compute the SHA-256 digest of a file as lowercase hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_sha256(path: &Path) -> std::io::Result<String> {
    use sha2::{Digest, Sha256};
    use std::io::Read;

    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(buffer.get(..count).unwrap_or(&[]));
    }

    Ok(format!("{:x}", hasher.finalize()))
}
