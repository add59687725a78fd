//! Smelt CLI internal library code

/// Default source archive URL for the vendored dependency
pub const DEFAULT_SOURCE_URL: &str = "https://luajit.org/download/LuaJIT-2.0.0.tar.gz";

/// Default name prefix matched against scan root entries
pub const DEFAULT_NAME_PREFIX: &str = "luajit";

/// Get the source archive URL to use.
/// Priority: `SMELT_SOURCE_URL` env var -> `DEFAULT_SOURCE_URL` constant.
#[must_use]
pub fn source_url() -> String {
    env_vars::source_url().unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string())
}

pub mod artifact;
pub mod build;
pub mod debug;
pub mod emit;
pub mod env_vars;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod pipeline;
pub mod source;

// Re-export common types for convenience
pub use artifact::{ArtifactKind, BuildArtifact, CANDIDATE_KINDS, resolve};
pub use build::{BuildError, BuildOptions, build};
pub use debug::{init_debug, is_debug_enabled};
pub use emit::{BuildConfig, emit};
pub use extract::{ExtractError, extract};
pub use fetch::{FetchError, Fetcher, compute_sha256};
pub use locate::{DirectoryEntry, EntryKind, archives, scan, source_trees};
pub use pipeline::{Pipeline, PipelineError, RootState, RootStatus, TreeStatus};
pub use source::DependencySource;
