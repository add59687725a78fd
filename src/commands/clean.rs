//! Clean command
//!
//! Removes vendored state from the scan root: downloaded archives,
//! extracted source trees, or both.

use anyhow::{Context, Result};
use smelt::scan;
use std::fs;
use std::path::Path;

/// Run the clean command
pub(crate) fn run(
    root: &str,
    prefix: Option<&str>,
    archives_only: bool,
    trees_only: bool,
    dry_run: bool,
) -> Result<()> {
    let source = super::dependency_source(prefix, None);
    let root = Path::new(root);

    let entries = scan(root, &source)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    // Neither flag means both
    let remove_archives = archives_only || !trees_only;
    let remove_trees = trees_only || !archives_only;

    let mut removed = 0_usize;

    for entry in &entries {
        let (remove, kind) = if entry.is_archive() {
            (remove_archives, "archive")
        } else if entry.is_tree() {
            (remove_trees, "source tree")
        } else {
            continue;
        };

        if !remove {
            continue;
        }

        if dry_run {
            println!("Would remove {kind} {}", entry.path.display());
            removed += 1;
            continue;
        }

        if entry.is_tree() {
            fs::remove_dir_all(&entry.path)
        } else {
            fs::remove_file(&entry.path)
        }
        .with_context(|| format!("Failed to remove {}", entry.path.display()))?;

        println!("Removed {kind} {}", entry.path.display());
        removed += 1;
    }

    if removed == 0 {
        println!("Nothing to clean under {}", root.display());
    }

    Ok(())
}
