//! Command-line arguments for the `casework` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "casework",
    version,
    about = "A declarative test execution engine."
)]
pub struct CaseworkArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the bundled self-check suite through the engine and report it.
    Selfcheck {
        /// Only run cases whose name matches this regex.
        #[arg(long)]
        filter: Option<String>,
        /// YAML run configuration.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print a JSON report instead of colored text.
        #[arg(long)]
        json: bool,
        #[arg(long)]
        no_color: bool,
        /// Stop after the first failed case.
        #[arg(long)]
        fail_fast: bool,
    },
}
