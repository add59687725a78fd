//! Build configuration emission
//!
//! Assembles the final configuration the downstream extension compile step
//! consumes: link objects, include directories, and the redistributable
//! dynamic library (import-library platforms only).

use crate::artifact::BuildArtifact;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The pipeline's final output.
///
/// Derived once per run from exactly one resolved artifact; never emitted
/// with zero link objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Extra object/library files to pass to the linker
    pub extra_objects: Vec<PathBuf>,
    /// Header search paths
    pub include_dirs: Vec<PathBuf>,
    /// Dynamic library to bundle alongside the compiled extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redistributable: Option<String>,
}

impl BuildConfig {
    /// Serialize for consumption by an external compile step.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "extra objects:")?;
        for object in &self.extra_objects {
            writeln!(f, "  {}", object.display())?;
        }

        writeln!(f, "include dirs:")?;
        for dir in &self.include_dirs {
            writeln!(f, "  {}", dir.display())?;
        }

        if let Some(redistributable) = &self.redistributable {
            writeln!(f, "redistributable: {redistributable}")?;
        }

        Ok(())
    }
}

/// Derive the build configuration from a resolved artifact.
///
/// Pure: input is already validated by resolution, so there are no
/// failure modes.
#[must_use]
pub fn emit(artifact: &BuildArtifact) -> BuildConfig {
    BuildConfig {
        extra_objects: vec![artifact.library_path.clone()],
        include_dirs: vec![artifact.include_dir.clone()],
        redistributable: artifact.kind.redistributable().map(str::to_string),
    }
}
