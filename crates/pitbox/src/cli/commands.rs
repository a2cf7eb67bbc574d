//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Decode command arguments.
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// The spark-plug designation to decode (e.g. CR9EK)
    pub code: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Tables command arguments.
#[derive(Debug, Args)]
pub struct TablesCommand {
    /// Which table to print; all of them when omitted
    #[arg(value_enum)]
    pub table: Option<TableKind>,
}

/// Which reference table to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableKind {
    /// Heat-rating table
    Heat,
    /// Thread-type codes
    Thread,
    /// Construction, reach and electrode codes
    Codes,
}

/// Log command arguments.
#[derive(Debug, Args)]
pub struct LogCommand {
    /// Session length in minutes (config default when omitted)
    #[arg(short, long)]
    pub minutes: Option<u64>,

    /// Serial device of the tap harness (config default when omitted)
    #[arg(short, long)]
    pub device: Option<PathBuf>,

    /// Directory for the session CSV (config default when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Dyno sheet commands.
#[derive(Debug, Subcommand)]
pub enum DynoCommand {
    /// Show the setup comparison and the performance table
    Show,

    /// Show the speed-per-gear table
    Speeds,

    /// Show the ASCII power graph
    Graph,

    /// Edit one tuned curve point
    Edit {
        /// Engine speed of the row to edit
        #[arg(long)]
        rpm: u32,

        /// New power value in hp
        #[arg(long)]
        power: f64,

        /// New torque value in Nm
        #[arg(long)]
        torque: f64,
    },

    /// Reset the tuned curve back to stock
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
