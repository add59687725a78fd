//! Smelt command-line interface
//!
//! Vendors a native dependency (LuaJIT by default) for linking into a
//! dynamically-loaded extension module: locate or acquire the source,
//! drive its own build, and emit the link/include configuration the
//! downstream compile step consumes.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::OutputFormat;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    // Show backtrace if enabled
    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "smelt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Vendors and builds a native dependency for extension linking", long_about = None)]
#[command(disable_version_flag = true)]
pub(crate) struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    _version: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: locate or acquire, build, emit configuration
    Vendor {
        /// Directory the dependency is vendored under
        #[arg(long, default_value = ".")]
        root: String,

        /// Source archive URL (defaults to the LuaJIT release tarball)
        #[arg(long)]
        url: Option<String>,

        /// Entry name prefix to match under the root
        #[arg(long)]
        prefix: Option<String>,

        /// Build tool to invoke (default: SMELT_MAKE, MAKE, then make)
        #[arg(long)]
        make: Option<String>,

        /// Build parallelism (default 4)
        #[arg(long, short = 'j')]
        jobs: Option<u32>,

        /// Do not pass CFLAGS=-fPIC to the build
        #[arg(long)]
        no_pic: bool,

        /// Expected SHA-256 of the fetched archive (hex)
        #[arg(long)]
        sha256: Option<String>,

        /// Output format for the resulting configuration
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Enable verbose output
        #[arg(long)]
        verbose: bool,

        /// Suppress progress output
        #[arg(long, short, conflicts_with = "verbose")]
        quiet: bool,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,

        /// Show error backtraces
        #[arg(long)]
        backtrace: bool,
    },

    /// Download and extract the source archive without building
    Fetch {
        /// Directory the dependency is vendored under
        #[arg(long, default_value = ".")]
        root: String,

        /// Source archive URL (defaults to the LuaJIT release tarball)
        #[arg(long)]
        url: Option<String>,

        /// Entry name prefix to match under the root
        #[arg(long)]
        prefix: Option<String>,

        /// Expected SHA-256 of the fetched archive (hex)
        #[arg(long)]
        sha256: Option<String>,

        /// Suppress progress output
        #[arg(long, short)]
        quiet: bool,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,

        /// Show error backtraces
        #[arg(long)]
        backtrace: bool,
    },

    /// Report what the root holds and whether anything is built
    Status {
        /// Directory the dependency is vendored under
        #[arg(long, default_value = ".")]
        root: String,

        /// Entry name prefix to match under the root
        #[arg(long)]
        prefix: Option<String>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,

        /// Show error backtraces
        #[arg(long)]
        backtrace: bool,
    },

    /// Print the configuration for an already-built artifact
    Emit {
        /// Directory the dependency is vendored under
        #[arg(long, default_value = ".")]
        root: String,

        /// Entry name prefix to match under the root
        #[arg(long)]
        prefix: Option<String>,

        /// Output format for the configuration
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,

        /// Show error backtraces
        #[arg(long)]
        backtrace: bool,
    },

    /// Remove vendored archives and/or source trees
    Clean {
        /// Directory the dependency is vendored under
        #[arg(long, default_value = ".")]
        root: String,

        /// Entry name prefix to match under the root
        #[arg(long)]
        prefix: Option<String>,

        /// Only remove downloaded archives
        #[arg(long, conflicts_with = "trees")]
        archives: bool,

        /// Only remove extracted source trees
        #[arg(long)]
        trees: bool,

        /// Show what would be removed without removing it
        #[arg(long)]
        dry_run: bool,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,

        /// Show error backtraces
        #[arg(long)]
        backtrace: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Extract debug and backtrace flags before consuming cli.command
    let (debug, backtrace) = match &cli.command {
        Commands::Vendor {
            debug, backtrace, ..
        }
        | Commands::Fetch {
            debug, backtrace, ..
        }
        | Commands::Status {
            debug, backtrace, ..
        }
        | Commands::Emit {
            debug, backtrace, ..
        }
        | Commands::Clean {
            debug, backtrace, ..
        } => (*debug, *backtrace),
        Commands::Completion { .. } => (false, false),
    };

    // Initialize debug mode
    smelt::init_debug(debug);

    let result = match cli.command {
        Commands::Vendor {
            root,
            url,
            prefix,
            make,
            jobs,
            no_pic,
            sha256,
            format,
            verbose,
            quiet,
            ..
        } => {
            commands::vendor::run(commands::vendor::VendorOptions {
                root: &root,
                url: url.as_deref(),
                prefix: prefix.as_deref(),
                make: make.as_deref(),
                jobs,
                no_pic,
                sha256: sha256.as_deref(),
                format,
                verbose,
                quiet,
            })
            .await
        }
        Commands::Fetch {
            root,
            url,
            prefix,
            sha256,
            quiet,
            ..
        } => {
            commands::fetch::run(
                &root,
                url.as_deref(),
                prefix.as_deref(),
                sha256.as_deref(),
                quiet,
            )
            .await
        }
        Commands::Status { root, prefix, .. } => commands::status::run(&root, prefix.as_deref()),
        Commands::Emit {
            root,
            prefix,
            format,
            ..
        } => commands::emit::run(&root, prefix.as_deref(), format),
        Commands::Clean {
            root,
            prefix,
            archives,
            trees,
            dry_run,
            ..
        } => commands::clean::run(&root, prefix.as_deref(), archives, trees, dry_run),
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        // Display error with formatting
        display_error(&e, backtrace);
        process::exit(1);
    }
}

mod commands;
