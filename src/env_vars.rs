//! Environment variable handling.
//!
//! Every override the pipeline honors is read through here so the rest of
//! the crate never touches `std::env` directly.

use std::env;

// Helper for boolean environment variables that accept "1", "true", "yes"
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| {
        let s = s.to_lowercase();
        s == "1" || s == "true" || s == "yes"
    })
}

/// Get the source archive URL override from `SMELT_SOURCE_URL`.
pub fn source_url() -> Option<String> {
    env::var("SMELT_SOURCE_URL").ok().filter(|s| !s.is_empty())
}

/// Get the build tool to invoke (checks `SMELT_MAKE` then `MAKE`,
/// defaults to `make`).
pub fn make_command() -> String {
    env::var("SMELT_MAKE")
        .or_else(|_| env::var("MAKE"))
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "make".to_string())
}

/// Get the build parallelism override from `SMELT_JOBS`.
pub fn jobs() -> Option<u32> {
    env::var("SMELT_JOBS").ok().and_then(|s| s.parse().ok())
}

/// Get the expected archive SHA-256 digest from `SMELT_SHA256`.
pub fn expected_sha256() -> Option<String> {
    env::var("SMELT_SHA256").ok().filter(|s| !s.is_empty())
}

/// Check whether debug logging is forced on via `SMELT_DEBUG`.
pub fn debug() -> bool {
    is_enabled("SMELT_DEBUG")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env var mutation is process-wide, so these tests only exercise the
    // helpers against whatever the ambient environment provides.

    #[test]
    fn make_command_defaults_to_make() {
        if env::var("SMELT_MAKE").is_err() && env::var("MAKE").is_err() {
            assert_eq!(make_command(), "make");
        }
    }

    #[test]
    fn jobs_requires_a_number() {
        if env::var("SMELT_JOBS").is_err() {
            assert_eq!(jobs(), None);
        }
    }
}
