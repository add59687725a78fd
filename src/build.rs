//! Native build invocation
//!
//! Runs the vendored dependency's own `make`-based build inside an
//! extracted source tree. The artifact ends up linked into a
//! dynamically-loaded extension module, so the compiler is told to emit
//! position-independent code.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to run {command} in {dir}: {source}")]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} in {dir} failed with {status}")]
    Failed {
        command: String,
        dir: PathBuf,
        status: ExitStatus,
        /// Combined stdout and stderr of the failed build
        output: String,
    },
}

/// How the native build is invoked.
///
/// Defaults match the vendored dependency's expected invocation
/// (`make -j 4 CFLAGS=-fPIC`). The command itself is configurable so tests
/// can substitute a stub executable, and `SMELT_MAKE`/`MAKE` can point at
/// e.g. `gmake` on BSDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Build tool to invoke
    pub command: String,
    /// Parallelism degree passed as `-j <jobs>`
    pub jobs: u32,
    /// Pass `CFLAGS=-fPIC` for position-independent code
    pub pic: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            command: crate::env_vars::make_command(),
            jobs: crate::env_vars::jobs().unwrap_or(Self::DEFAULT_JOBS),
            pic: true,
        }
    }
}

impl BuildOptions {
    /// Default build parallelism
    pub const DEFAULT_JOBS: u32 = 4;

    /// Override the build command (used by tests and `--make`).
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Override the parallelism degree.
    #[must_use]
    pub const fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs;
        self
    }

    /// Disable the position-independent-code flag.
    #[must_use]
    pub const fn without_pic(mut self) -> Self {
        self.pic = false;
        self
    }
}

/// Run the native build in `source_dir`, blocking until it exits.
///
/// Returns the build's combined stdout and stderr on success. A non-zero
/// exit is fatal; the error carries the process's exit status verbatim.
/// This is the pipeline's only external process invocation.
///
/// # Errors
///
/// Returns an error if the build tool cannot be spawned or exits non-zero.
pub fn build(source_dir: &Path, options: &BuildOptions) -> Result<String, BuildError> {
    let mut cmd = Command::new(&options.command);
    cmd.current_dir(source_dir);
    cmd.arg("-j").arg(options.jobs.to_string());

    if options.pic {
        cmd.arg("CFLAGS=-fPIC");
    }

    crate::debug!(
        "running {} -j {}{} in {}",
        options.command,
        options.jobs,
        if options.pic { " CFLAGS=-fPIC" } else { "" },
        source_dir.display()
    );

    let result = cmd.output().map_err(|source| BuildError::Spawn {
        command: options.command.clone(),
        dir: source_dir.to_path_buf(),
        source,
    })?;

    let mut output = String::from_utf8_lossy(&result.stdout).to_string();
    output.push_str(&String::from_utf8_lossy(&result.stderr));

    if result.status.success() {
        Ok(output)
    } else {
        Err(BuildError::Failed {
            command: options.command.clone(),
            dir: source_dir.to_path_buf(),
            status: result.status,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn stub_command(dir: &Path, name: &str, script: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn default_options() {
        let options = BuildOptions::default();
        assert_eq!(options.jobs, 4);
        assert!(options.pic);
    }

    #[test]
    fn builder_style_overrides() {
        let options = BuildOptions::default()
            .with_command("gmake")
            .with_jobs(8)
            .without_pic();

        assert_eq!(options.command, "gmake");
        assert_eq!(options.jobs, 8);
        assert!(!options.pic);
    }

    #[cfg(unix)]
    #[test]
    fn successful_build_returns_output() {
        let temp = TempDir::new().unwrap();
        let stub = stub_command(temp.path(), "fake-make", "echo compiled");
        let options = BuildOptions::default().with_command(stub);

        let output = build(temp.path(), &options).unwrap();

        assert!(output.contains("compiled"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_build_surfaces_exit_status() {
        let temp = TempDir::new().unwrap();
        let stub = stub_command(temp.path(), "fake-make", "echo broken >&2; exit 2");
        let options = BuildOptions::default().with_command(stub);

        let err = build(temp.path(), &options).unwrap_err();

        match err {
            BuildError::Failed { status, output, .. } => {
                assert_eq!(status.code(), Some(2));
                assert!(output.contains("broken"));
            }
            BuildError::Spawn { .. } => panic!("expected a Failed error"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn stub_receives_parallelism_and_pic_flags() {
        let temp = TempDir::new().unwrap();
        let stub = stub_command(temp.path(), "fake-make", r#"echo "$@""#);
        let options = BuildOptions::default().with_command(stub);

        let output = build(temp.path(), &options).unwrap();

        assert!(output.contains("-j 4"));
        assert!(output.contains("CFLAGS=-fPIC"));
    }

    #[test]
    fn missing_command_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let options = BuildOptions::default().with_command("smelt-test-no-such-tool");

        let err = build(temp.path(), &options).unwrap_err();

        assert!(matches!(err, BuildError::Spawn { .. }));
    }
}
