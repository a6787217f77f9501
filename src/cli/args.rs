//! Command line argument parsing for the hassy CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::HassyConfig;
use crate::error::Result;

/// hassy - Hassaniya-Arabic text normalizer
#[derive(Parser, Debug, Clone)]
#[command(name = "hassy")]
#[command(about = "Normalize Hassaniya-Arabic text with variant lookup and letter rules")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct HassyArgs {
    /// Verbosity level (repeat for more: -v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the variant and exception files
    #[arg(short = 'd', long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl HassyArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }

    /// Build the configuration: file (or defaults), then environment, then
    /// `--data-dir`.
    pub fn load_config(&self) -> Result<HassyConfig> {
        let config = match &self.config {
            Some(path) => HassyConfig::from_file(path)?,
            None => HassyConfig::default(),
        };
        let mut config = config.with_env_overrides()?;
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Normalize text and print or write the result
    Normalize(NormalizeArgs),

    /// Show normalized text with changed words highlighted
    Diff(DiffArgs),

    /// Load and lint the data files
    Validate(ValidateArgs),

    /// Normalize text and report word statistics
    Stats(StatsArgs),
}

/// Arguments for normalizing text
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Input file ('-' or omitted for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Arguments for the diff view
#[derive(Parser, Debug, Clone)]
pub struct DiffArgs {
    /// Input file ('-' or omitted for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Render HTML instead of terminal output
    #[arg(long)]
    pub html: bool,
}

impl DiffArgs {
    /// Resolve `--color`/`--no-color`, falling back to whether stdout is a
    /// terminal.
    pub fn use_color(&self, stdout_is_terminal: bool) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            stdout_is_terminal
        }
    }
}

/// Arguments for validating data files
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Fail when lint findings are reported
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for word statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Input file ('-' or omitted for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Number of unknown words to list
    #[arg(short, long, default_value = "20")]
    pub top: usize,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
