//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Auditor CLI - Audit engineering specifications against lists and drawings.
#[derive(Debug, Parser)]
#[command(name = "auditor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Pipeline preset (default, fast, thorough)
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Model override
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Report, table and chart (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (report text only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Audit an SP against engineering lists
    Audit(AuditArgs),

    /// Extract a consolidated bill of materials from an SP
    Extract(ExtractArgs),

    /// Cross-check an SP against technical drawings
    Check(CheckArgs),

    /// Ask a free-form question about documents
    Ask(AskArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the audit command.
#[derive(Debug, Parser)]
pub struct AuditArgs {
    /// Source-of-truth document (.docx)
    #[arg(long)]
    pub sp: PathBuf,

    /// Engineering list (.csv or .xlsx); repeat for several lists
    #[arg(short, long = "list")]
    pub lists: Vec<PathBuf>,

    /// Write the report and records to the export directory
    #[arg(short, long)]
    pub export: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Source-of-truth document (.docx)
    #[arg(long)]
    pub sp: PathBuf,

    /// Write the report and records to the export directory
    #[arg(short, long)]
    pub export: bool,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Source-of-truth document (.docx)
    #[arg(long)]
    pub sp: PathBuf,

    /// Technical drawing (.pdf); repeat for several drawings
    #[arg(short, long = "drawing")]
    pub drawings: Vec<PathBuf>,

    /// Write the report to the export directory
    #[arg(short, long)]
    pub export: bool,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Context document; repeat for several documents
    #[arg(short, long = "doc")]
    pub documents: Vec<PathBuf>,

    /// The question
    pub question: String,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
