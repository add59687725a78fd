//! Emit command
//!
//! Resolves an already-built artifact and prints its build configuration.
//! Never fetches or builds; fails if nothing under the root is built.

use super::OutputFormat;
use anyhow::{Result, bail};
use smelt::{BuildOptions, Pipeline, emit, resolve};
use std::path::Path;

/// Run the emit command
pub(crate) fn run(root: &str, prefix: Option<&str>, format: OutputFormat) -> Result<()> {
    let source = super::dependency_source(prefix, None);
    let prefix = source.name_prefix.clone();
    let pipeline = Pipeline::new(source, BuildOptions::default())?;

    let status = pipeline.status(Path::new(root))?;

    // First built tree wins, same as the pipeline's resolution order
    let artifact = status
        .trees
        .iter()
        .filter(|tree| tree.built.is_some())
        .find_map(|tree| resolve(&tree.path));

    let Some(artifact) = artifact else {
        bail!("No built {prefix} artifact under {root}; run `smelt vendor` first");
    };

    let config = emit(&artifact);

    match format {
        OutputFormat::Text => print!("{config}"),
        OutputFormat::Json => println!("{}", config.to_json()?),
    }

    Ok(())
}
