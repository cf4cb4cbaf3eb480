//! # Auto Addons CLI
//!
//! This is the binary entry point for the `auto-addons` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging.
//! - Executing the appropriate command and reporting top-level errors.
//!
//! The resolution logic lives in the `auto_addons` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
