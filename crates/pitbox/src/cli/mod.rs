//! Command-line interface for pitbox.
//!
//! This module provides the CLI structure consumed by the `pitbox` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, DecodeCommand, DynoCommand, LogCommand, TableKind, TablesCommand};

/// pitbox - garage toolkit for motorcycle maintenance and tuning
///
/// Decode NGK spark-plug designations, record engine sensors through an
/// ESP32 tap harness, and browse the stock vs. tuned dyno sheets.
#[derive(Debug, Parser)]
#[command(name = "pitbox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode a spark-plug designation
    Decode(DecodeCommand),

    /// Print the reference code tables
    Tables(TablesCommand),

    /// Record a sensor session to CSV
    Log(LogCommand),

    /// Show or edit the dyno sheets
    #[command(subcommand)]
    Dyno(DynoCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "pitbox");
    }

    #[test]
    fn test_parse_decode() {
        let cli = Cli::try_parse_from(["pitbox", "decode", "CR9EK"]).unwrap();
        match cli.command {
            Command::Decode(cmd) => {
                assert_eq!(cmd.code, "CR9EK");
                assert!(!cmd.json);
            }
            other => panic!("expected decode, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_decode_json() {
        let cli = Cli::try_parse_from(["pitbox", "decode", "--json", "BPR6ES"]).unwrap();
        assert!(matches!(cli.command, Command::Decode(cmd) if cmd.json));
    }

    #[test]
    fn test_parse_tables_all_and_specific() {
        let cli = Cli::try_parse_from(["pitbox", "tables"]).unwrap();
        assert!(matches!(cli.command, Command::Tables(cmd) if cmd.table.is_none()));

        let cli = Cli::try_parse_from(["pitbox", "tables", "heat"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Tables(TablesCommand {
                table: Some(TableKind::Heat)
            })
        ));
    }

    #[test]
    fn test_parse_log_with_options() {
        let cli =
            Cli::try_parse_from(["pitbox", "log", "-m", "5", "-d", "/dev/ttyACM0"]).unwrap();
        match cli.command {
            Command::Log(cmd) => {
                assert_eq!(cmd.minutes, Some(5));
                assert_eq!(cmd.device, Some(PathBuf::from("/dev/ttyACM0")));
                assert!(cmd.output.is_none());
            }
            other => panic!("expected log, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_dyno_edit() {
        let cli = Cli::try_parse_from([
            "pitbox", "dyno", "edit", "--rpm", "10000", "--power", "115.5", "--torque", "64",
        ])
        .unwrap();
        match cli.command {
            Command::Dyno(DynoCommand::Edit { rpm, power, torque }) => {
                assert_eq!(rpm, 10_000);
                assert!((power - 115.5).abs() < f64::EPSILON);
                assert!((torque - 64.0).abs() < f64::EPSILON);
            }
            other => panic!("expected dyno edit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_dyno_reset_requires_no_args() {
        let cli = Cli::try_parse_from(["pitbox", "dyno", "reset", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Dyno(DynoCommand::Reset { yes: true })
        ));
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["pitbox", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["pitbox", "-c", "/tmp/p.toml", "-v", "tables"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_verbosity_mapping() {
        let base = |verbose, quiet| Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Tables(TablesCommand { table: None }),
        };
        assert_eq!(base(0, true).verbosity(), crate::logging::Verbosity::Quiet);
        assert_eq!(base(0, false).verbosity(), crate::logging::Verbosity::Normal);
        assert_eq!(base(1, false).verbosity(), crate::logging::Verbosity::Verbose);
        assert_eq!(base(2, false).verbosity(), crate::logging::Verbosity::Trace);
    }
}
