//! Auditor CLI library.
//!
//! Command-line front end for the audit pipeline: one-shot subcommands, an
//! interactive session, terminal rendering of reports, tables and charts,
//! and file export.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod repl;
pub mod session;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::{open_session, Session};
