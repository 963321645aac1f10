//! Show command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use auditor_pipeline::ResultStore;

/// Print the active result of the session.
pub fn execute_show(store: &ResultStore, formatter: &Formatter) -> Result<()> {
    let (kind, result) = store.active().ok_or(CliError::NoResult)?;
    println!("{}", formatter.format_result(kind, result)?);
    Ok(())
}
