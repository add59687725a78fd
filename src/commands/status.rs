//! Status command
//!
//! Reports what the scan root currently holds: matching archives,
//! extracted source trees, and whether any tree is already built.
//! Read-only.

use anyhow::Result;
use smelt::{BuildOptions, Pipeline, RootState};
use std::path::Path;

/// Run the status command
pub(crate) fn run(root: &str, prefix: Option<&str>) -> Result<()> {
    let source = super::dependency_source(prefix, None);
    let pipeline = Pipeline::new(source, BuildOptions::default())?;

    let status = pipeline.status(Path::new(root))?;

    match status.state() {
        RootState::Empty => {
            println!(
                "Nothing vendored under {root}: a run would fetch {}",
                pipeline.source().url
            );
            return Ok(());
        }
        RootState::SourcePresent => println!("Source present, not built"),
        RootState::Built => println!("Built"),
    }

    if !status.archives.is_empty() {
        println!("archives:");
        for archive in &status.archives {
            println!("  {}", archive.display());
        }
    }

    if !status.trees.is_empty() {
        println!("source trees:");
        for tree in &status.trees {
            match tree.built {
                Some(kind) => println!("  {} ({})", tree.path.display(), kind.description()),
                None => println!("  {} (not built)", tree.path.display()),
            }
        }
    }

    Ok(())
}
