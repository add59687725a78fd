//! Acquisition and build orchestration
//!
//! Drives the whole pipeline for one packaging invocation: scan the root,
//! materialize a source tree if nothing is present, build trees that lack
//! an artifact, resolve the artifact, and emit the build configuration.
//! Strictly sequential; every stage failure is fatal and no partial
//! configuration is ever produced.
//!
//! Concurrent invocations against the same root are unsupported: the
//! filesystem under the root is the one shared mutable resource and no
//! locking is provided. A run killed mid-fetch or mid-build may leave
//! partial state behind; the next run tolerates it by re-scanning instead
//! of assuming a clean root.

use crate::artifact::{self, ArtifactKind};
use crate::build::{self, BuildError, BuildOptions};
use crate::emit::{self, BuildConfig};
use crate::extract::{self, ExtractError};
use crate::fetch::{FetchError, Fetcher};
use crate::locate::{self, DirectoryEntry};
use crate::source::DependencySource;
use anyhow::Result;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to scan {root}: {source}")]
    Scan {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("No build artifact found in {dir} after building")]
    ArtifactNotFound { dir: PathBuf },

    #[error("No {prefix} source tree could be located or acquired under {root}")]
    NoSource { prefix: String, root: PathBuf },
}

/// Observable state of a scan root, one step of the pipeline's
/// `empty -> source present -> built` progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootState {
    /// No matching source tree or archive
    Empty,
    /// A source tree or archive exists but nothing resolves yet
    SourcePresent,
    /// At least one tree contains a resolvable artifact
    Built,
}

/// One extracted source tree and what resolution found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStatus {
    /// Path to the tree
    pub path: PathBuf,
    /// Resolved artifact kind, if the tree is built
    pub built: Option<ArtifactKind>,
}

/// Read-only summary of a scan root, used by the status command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootStatus {
    /// Matching archives under the root
    pub archives: Vec<PathBuf>,
    /// Matching source trees and their build state
    pub trees: Vec<TreeStatus>,
}

impl RootStatus {
    /// Collapse the summary into the pipeline's state machine view.
    #[must_use]
    pub fn state(&self) -> RootState {
        if self.trees.iter().any(|tree| tree.built.is_some()) {
            RootState::Built
        } else if self.trees.is_empty() && self.archives.is_empty() {
            RootState::Empty
        } else {
            RootState::SourcePresent
        }
    }
}

/// The acquisition/build/resolve pipeline for one dependency.
#[derive(Debug)]
pub struct Pipeline {
    source: DependencySource,
    build_options: BuildOptions,
    fetcher: Fetcher,
}

impl Pipeline {
    /// Create a pipeline for `source` using `build_options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(source: DependencySource, build_options: BuildOptions) -> Result<Self> {
        Ok(Self {
            source,
            build_options,
            fetcher: Fetcher::new()?,
        })
    }

    /// Replace the fetcher (checksum configuration).
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// The dependency this pipeline vendors.
    #[must_use]
    pub fn source(&self) -> &DependencySource {
        &self.source
    }

    /// Run the full pipeline against `root` and emit the configuration.
    ///
    /// Stages run to completion in order: locate, fetch + extract (only
    /// when nothing is present), then per-tree resolve / build / resolve.
    /// The first tree yielding an artifact wins. Re-running against a
    /// built root skips the build and produces an identical configuration.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the run: fetch, extraction, or build
    /// errors propagate verbatim; a tree that still lacks an artifact
    /// after its build attempt is fatal; so is a root where no source
    /// could be located or acquired at all.
    pub async fn run(&self, root: &Path) -> Result<BuildConfig, PipelineError> {
        let mut entries = self.scan(root)?;

        if locate::source_trees(&entries).is_empty() {
            self.materialize(root, &entries).await?;
            entries = self.scan(root)?;
        }

        for tree in locate::source_trees(&entries) {
            if !artifact::has_build_dir(&tree.path) {
                crate::debug!("skipping {} (no src directory)", tree.path.display());
                continue;
            }

            if let Some(found) = artifact::resolve(&tree.path) {
                // Already built, skip the build step entirely
                return Ok(emit::emit(&found));
            }

            build::build(&tree.path, &self.build_options)?;

            return match artifact::resolve(&tree.path) {
                Some(found) => Ok(emit::emit(&found)),
                None => Err(PipelineError::ArtifactNotFound {
                    dir: tree.path.clone(),
                }),
            };
        }

        Err(PipelineError::NoSource {
            prefix: self.source.name_prefix.clone(),
            root: root.to_path_buf(),
        })
    }

    /// Acquire a source tree without building: download the archive if no
    /// matching one exists, then extract it under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be scanned or the fetch or
    /// extraction fails.
    pub async fn acquire(&self, root: &Path) -> Result<(), PipelineError> {
        let entries = self.scan(root)?;
        self.materialize(root, &entries).await
    }

    /// Summarize the root without side effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be scanned.
    pub fn status(&self, root: &Path) -> Result<RootStatus, PipelineError> {
        let entries = self.scan(root)?;

        let archives = locate::archives(&entries)
            .into_iter()
            .map(|entry| entry.path.clone())
            .collect();

        let trees = locate::source_trees(&entries)
            .into_iter()
            .map(|entry| TreeStatus {
                path: entry.path.clone(),
                built: artifact::resolve(&entry.path).map(|found| found.kind),
            })
            .collect();

        Ok(RootStatus { archives, trees })
    }

    fn scan(&self, root: &Path) -> Result<Vec<DirectoryEntry>, PipelineError> {
        locate::scan(root, &self.source).map_err(|source| PipelineError::Scan {
            root: root.to_path_buf(),
            source,
        })
    }

    /// Ensure an extracted tree exists: reuse a present archive, fetching
    /// one first when the root has none.
    async fn materialize(&self, root: &Path, entries: &[DirectoryEntry]) -> Result<(), PipelineError> {
        let archive_path = match locate::archives(entries).first() {
            Some(existing) => existing.path.clone(),
            None => {
                let dest = self.source.archive_path(root);
                self.fetcher.fetch(&self.source.url, &dest).await?
            }
        };

        extract::extract(&archive_path, root)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_source() -> DependencySource {
        // Unroutable URL: these tests never fetch
        DependencySource::new("luajit", "http://127.0.0.1:1/LuaJIT-2.0.0.tar.gz")
    }

    fn pipeline_with_command(command: &str) -> Pipeline {
        let options = BuildOptions::default().with_command(command);
        Pipeline::new(test_source(), options).unwrap()
    }

    #[cfg(unix)]
    fn stub_build_tool(dir: &Path, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-make");
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    fn unbuilt_tree(root: &Path) -> PathBuf {
        let tree = root.join("LuaJIT-2.0.0");
        fs::create_dir_all(tree.join("src")).unwrap();
        fs::write(tree.join("src/luajit.c"), b"").unwrap();
        tree
    }

    #[tokio::test]
    async fn built_tree_short_circuits_without_building() {
        let temp = TempDir::new().unwrap();
        let tree = unbuilt_tree(temp.path());
        fs::write(tree.join("src/libluajit.a"), b"archive").unwrap();

        // Nonexistent build command proves the builder is never invoked
        let pipeline = pipeline_with_command("smelt-test-no-such-tool");
        let config = pipeline.run(temp.path()).await.unwrap();

        assert_eq!(config.extra_objects, vec![tree.join("src/libluajit.a")]);
        assert_eq!(config.include_dirs, vec![tree.join("src")]);
        assert_eq!(config.redistributable, None);
    }

    #[tokio::test]
    async fn reruns_produce_identical_configs() {
        let temp = TempDir::new().unwrap();
        let tree = unbuilt_tree(temp.path());
        fs::write(tree.join("src/libluajit.a"), b"archive").unwrap();

        let pipeline = pipeline_with_command("smelt-test-no-such-tool");
        let first = pipeline.run(temp.path()).await.unwrap();
        let second = pipeline.run(temp.path()).await.unwrap();

        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unbuilt_tree_is_built_then_resolved() {
        let temp = TempDir::new().unwrap();
        let tree = unbuilt_tree(temp.path());

        // Stub build drops the expected static archive into src/
        let stub = stub_build_tool(temp.path(), "touch src/libluajit.a");
        let pipeline = pipeline_with_command(&stub);

        let config = pipeline.run(temp.path()).await.unwrap();

        assert_eq!(config.extra_objects, vec![tree.join("src/libluajit.a")]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_artifact_after_build_is_fatal() {
        let temp = TempDir::new().unwrap();
        unbuilt_tree(temp.path());

        // Build "succeeds" but produces nothing
        let stub = stub_build_tool(temp.path(), "exit 0");
        let pipeline = pipeline_with_command(&stub);

        let err = pipeline.run(temp.path()).await.unwrap_err();

        assert!(matches!(err, PipelineError::ArtifactNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_build_aborts_the_run() {
        let temp = TempDir::new().unwrap();
        unbuilt_tree(temp.path());

        let stub = stub_build_tool(temp.path(), "exit 2");
        let pipeline = pipeline_with_command(&stub);

        let err = pipeline.run(temp.path()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Build(BuildError::Failed { .. })));
    }

    #[tokio::test]
    async fn tree_without_build_dir_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("luajit-notes")).unwrap();

        let pipeline = pipeline_with_command("smelt-test-no-such-tool");
        let err = pipeline.run(temp.path()).await.unwrap_err();

        assert!(matches!(err, PipelineError::NoSource { .. }));
    }

    #[tokio::test]
    async fn empty_root_with_unreachable_url_is_fetch_error() {
        let temp = TempDir::new().unwrap();

        let pipeline = pipeline_with_command("smelt-test-no-such-tool");
        let err = pipeline.run(temp.path()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(_)));
    }

    #[tokio::test]
    async fn present_archive_is_extracted_without_fetching() {
        let temp = TempDir::new().unwrap();

        // A real tarball holding an already-built tree; the unroutable
        // URL would fail the run if a fetch were attempted.
        let archive = temp.path().join("LuaJIT-2.0.0.tar.gz");
        write_tree_tarball(&archive, "LuaJIT-2.0.0", &["src/libluajit.a"]);

        let pipeline = pipeline_with_command("smelt-test-no-such-tool");
        let config = pipeline.run(temp.path()).await.unwrap();

        assert_eq!(
            config.extra_objects,
            vec![temp.path().join("LuaJIT-2.0.0/src/libluajit.a")]
        );
    }

    #[tokio::test]
    async fn corrupt_archive_aborts_with_extract_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("luajit-2.0.0.tar.gz"), b"garbage").unwrap();

        let pipeline = pipeline_with_command("smelt-test-no-such-tool");
        let err = pipeline.run(temp.path()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Extract(_)));
    }

    #[test]
    fn status_reports_state_progression() {
        let temp = TempDir::new().unwrap();
        let pipeline = pipeline_with_command("smelt-test-no-such-tool");

        assert_eq!(pipeline.status(temp.path()).unwrap().state(), RootState::Empty);

        let tree = unbuilt_tree(temp.path());
        assert_eq!(
            pipeline.status(temp.path()).unwrap().state(),
            RootState::SourcePresent
        );

        fs::write(tree.join("src/libluajit.a"), b"archive").unwrap();
        let status = pipeline.status(temp.path()).unwrap();
        assert_eq!(status.state(), RootState::Built);
        assert_eq!(
            status.trees.first().and_then(|t| t.built),
            Some(ArtifactKind::StaticArchive)
        );
    }

    fn write_tree_tarball(dest: &Path, dir: &str, files: &[&str]) {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let file = fs::File::create(dest).unwrap();
        let gz = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(gz);

        for name in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(0);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, format!("{dir}/{name}"), &b""[..])
                .unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
    }
}
