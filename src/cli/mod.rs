//! Command-line interface definitions.

pub mod config;
pub mod contracts;
pub mod output;
pub mod run;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flashpair - connect a wallet and dispatch flash loans on a contract pair.
#[derive(Parser, Debug)]
#[command(name = "flashpair")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (optional; defaults are used if absent)
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect and dispatch every 3 seconds until Ctrl-C
    Run,

    /// Connect and dispatch exactly once
    Once,

    /// Show the contract pair, target network and gas settings
    Contracts,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `flashpair config`
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration file
    Validate,
    /// Print the effective configuration
    Show,
}
