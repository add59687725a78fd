//! Fetch command
//!
//! Acquires a source tree (download + extract) without building it.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use smelt::{Fetcher, Pipeline};
use std::path::Path;
use std::time::Duration;

/// Run the fetch command
pub(crate) async fn run(
    root: &str,
    url: Option<&str>,
    prefix: Option<&str>,
    sha256: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let source = super::dependency_source(prefix, url);
    let prefix = source.name_prefix.clone();

    let sha256 = sha256
        .map(str::to_string)
        .or_else(smelt::env_vars::expected_sha256);
    let fetcher = Fetcher::new()?.with_expected_sha256(sha256);

    let pipeline = Pipeline::new(source, smelt::BuildOptions::default())?.with_fetcher(fetcher);
    let root = Path::new(root);

    // Nothing to do once a source tree exists; a lone archive still
    // needs extracting, which acquire handles without re-downloading.
    if !pipeline.status(root)?.trees.is_empty() {
        if !quiet {
            println!("{prefix} source already present under {}", root.display());
        }
        return Ok(());
    }

    let progress = if quiet {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid progress template")?,
        );
        spinner.set_message("Fetching...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    let result = pipeline.acquire(root).await;

    if let Some(spinner) = progress {
        spinner.finish_and_clear();
    }

    result.context("Fetch failed")?;

    if !quiet {
        println!("Fetched and extracted {prefix} under {}", root.display());
    }

    Ok(())
}
