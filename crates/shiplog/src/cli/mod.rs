//! CLI definition and command handling

pub mod commands;

use clap::{Parser, Subcommand};

use commands::GenerateCommand;

/// Shiplog - Categorized changelog generator
#[derive(Debug, Parser)]
#[command(name = "shiplog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Classify internal commits instead of silently dropping them
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress warnings, print only the document
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rendered Markdown document
    #[default]
    Text,
    /// Taxonomy as JSON
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a categorized changelog between two refs
    Generate(GenerateCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Generate(ref cmd) => cmd.execute(&self),
        }
    }
}
