//! yang-schema — materializes and caches the compiled YANG schema of a project.
//!
//! Provides `yang-schema build` to bring the cache up to date, `status` to
//! check it without compiling, `dump` to print the finalized schema, and
//! `clean` to delete the cache file.

#![warn(missing_docs)]

mod build;
mod clean;
mod dump;
mod pipeline;
mod status;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Materialize the compiled YANG schema of a project, reusing the cache when
/// no input changed.
#[derive(Parser, Debug)]
#[command(name = "yang-schema", version, about = "Cached YANG schema builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root. Defaults to the nearest ancestor containing
    /// `yang-schema.toml`, or the current directory.
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the schema if the cache is stale, otherwise load it.
    Build,
    /// Report whether the cache is fresh, stale, or absent.
    Status,
    /// Print the finalized schema.
    Dump(DumpArgs),
    /// Delete the cache file.
    Clean,
}

/// Arguments for the `dump` subcommand.
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = DumpFormat::Text)]
    pub format: DumpFormat,
}

/// Output format for `dump`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// One line per module and SID.
    Text,
    /// The schema as JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Explicit project root.
    pub root: Option<String>,
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        root: cli.root,
    };

    let result = match cli.command {
        Command::Build => build::run(&global),
        Command::Status => status::run(&global),
        Command::Dump(ref args) => dump::run(args, &global),
        Command::Clean => clean::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
