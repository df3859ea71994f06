//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::emit::EmitArgs;

#[derive(Parser, Debug)]
#[command(name = "fieldlog")]
#[command(about = "Write structured JSON log entries from the shell", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one entry
    Emit(EmitArgs),

    /// List the severity levels
    Levels,
}
