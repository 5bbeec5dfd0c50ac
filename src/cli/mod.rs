//! Command-line interface wiring for the `cardforge` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod generate;
pub mod preview;

/// Parsed CLI entrypoint for the `cardforge` binary.
#[derive(Parser, Debug)]
#[command(name = "cardforge", version, about = "Playing-card deck compositor")]
pub struct Cli {
    /// Log asset resolution and suit extraction details.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the deck into the output folder.
    Generate(generate::GenerateArgs),
    /// Render a single card to a PNG file.
    Preview(preview::PreviewArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::handle(args),
        Command::Preview(args) => preview::handle(args),
    }
}
