//! # gist2repo CLI
//!
//! This is the binary entry point for the `gist2repo` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and the temporary clone directory.
//! - Running the pipeline and logging every error it reports.
//!
//! The core logic lives in the `gist2repo` library crate; the binary is a thin
//! wrapper around it.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
