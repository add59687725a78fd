//! Vendor command
//!
//! Runs the full acquisition/build/resolve pipeline and prints the
//! resulting build configuration.

use super::OutputFormat;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use smelt::{Fetcher, Pipeline};
use std::path::Path;
use std::time::Duration;

/// Configuration for the vendor command
#[derive(Debug)]
pub(crate) struct VendorOptions<'a> {
    /// Scan root the dependency is vendored under
    pub root: &'a str,
    /// Source archive URL override
    pub url: Option<&'a str>,
    /// Entry name prefix override
    pub prefix: Option<&'a str>,
    /// Build tool override
    pub make: Option<&'a str>,
    /// Build parallelism override
    pub jobs: Option<u32>,
    /// Disable the position-independent-code flag
    pub no_pic: bool,
    /// Expected SHA-256 of the fetched archive
    pub sha256: Option<&'a str>,
    /// Output format for the configuration
    pub format: OutputFormat,
    /// Enable verbose output
    pub verbose: bool,
    /// Suppress progress output
    pub quiet: bool,
}

/// Run the vendor command
pub(crate) async fn run(options: VendorOptions<'_>) -> Result<()> {
    let source = super::dependency_source(options.prefix, options.url);
    let build_options = super::build_options(options.make, options.jobs, options.no_pic);

    if options.verbose {
        println!("Vendoring {} from {}", source.name_prefix, source.url);
        println!("Scan root: {}", options.root);
    }

    let sha256 = options
        .sha256
        .map(str::to_string)
        .or_else(smelt::env_vars::expected_sha256);
    let fetcher = Fetcher::new()?.with_expected_sha256(sha256);

    let pipeline = Pipeline::new(source, build_options)?.with_fetcher(fetcher);

    let progress = if options.verbose || options.quiet {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid progress template")?,
        );
        spinner.set_message("Vendoring...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    let result = pipeline.run(Path::new(options.root)).await;

    if let Some(spinner) = progress {
        spinner.finish_and_clear();
    }

    let config = result.context("Vendoring failed")?;

    match options.format {
        OutputFormat::Text => print!("{config}"),
        OutputFormat::Json => println!("{}", config.to_json()?),
    }

    Ok(())
}
