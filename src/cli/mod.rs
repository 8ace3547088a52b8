//! CLI module for the triage engine
//!
//! # Commands
//!
//! - `serve` - Start the diagnosis API server
//! - `diagnose` - Run one diagnosis from the command line
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the server with default config
//! triage serve
//!
//! # One-shot diagnosis
//! triage diagnose -a "washing machine" -b Bosch \
//!     -p "shows E13 and will not drain" -e jo@example.com
//!
//! # Generate shell completions
//! triage completions bash > ~/.bash_completion.d/triage
//! ```

pub mod completions;
pub mod config;
pub mod diagnose;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Triage - appliance fault diagnosis engine
#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    about = "Appliance fault triage engine - cache-first AI diagnosis pipeline"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the diagnosis API server
    Serve(ServeArgs),
    /// Run one diagnosis from the command line
    Diagnose(DiagnoseArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Log level (overrides config)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "triage.toml")]
    pub config: PathBuf,

    /// Appliance type, e.g. "washing machine"
    #[arg(short, long)]
    pub appliance: String,

    /// Appliance brand, e.g. "Bosch"
    #[arg(short, long)]
    pub brand: String,

    /// Problem description (10-500 characters)
    #[arg(short, long)]
    pub problem: String,

    /// Contact email (rate-limiting identity)
    #[arg(short, long)]
    pub email: String,

    /// Print the raw JSON result instead of formatted output
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path
    #[arg(short, long, default_value = "triage.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
