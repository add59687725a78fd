//! CLI command implementations
//!
//! Each submodule exposes a `run` function invoked from the dispatcher in
//! `main.rs`.

pub(crate) mod clean;
pub(crate) mod completion;
pub(crate) mod emit;
pub(crate) mod fetch;
pub(crate) mod status;
pub(crate) mod vendor;

use clap::ValueEnum;
use smelt::{BuildOptions, DependencySource};

/// How a build configuration is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON for a downstream compile step
    Json,
}

/// Build the dependency source from CLI overrides, falling back to the
/// LuaJIT defaults (and `SMELT_SOURCE_URL`).
pub(crate) fn dependency_source(prefix: Option<&str>, url: Option<&str>) -> DependencySource {
    let defaults = DependencySource::luajit();

    DependencySource::new(
        prefix.unwrap_or(&defaults.name_prefix),
        url.unwrap_or(&defaults.url),
    )
}

/// Build options from CLI overrides on top of the env-aware defaults.
pub(crate) fn build_options(make: Option<&str>, jobs: Option<u32>, no_pic: bool) -> BuildOptions {
    let mut options = BuildOptions::default();

    if let Some(make) = make {
        options = options.with_command(make);
    }
    if let Some(jobs) = jobs {
        options = options.with_jobs(jobs);
    }
    if no_pic {
        options = options.without_pic();
    }

    options
}
