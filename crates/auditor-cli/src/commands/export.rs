//! Export command implementation.

use crate::error::{CliError, Result};
use crate::export::{export_result, ExportPaths};
use crate::output::Formatter;
use auditor_pipeline::ResultStore;
use std::path::Path;

/// Export the active result into `dir`.
pub fn execute_export(store: &ResultStore, dir: &Path, formatter: &Formatter) -> Result<ExportPaths> {
    let (kind, result) = store.active().ok_or(CliError::NoResult)?;
    let paths = export_result(dir, kind, result)?;

    println!("{}", formatter.success(&format!("Report written to {}", paths.report.display())));
    if let Some(data) = &paths.data {
        println!("{}", formatter.success(&format!("Records written to {}", data.display())));
    }
    Ok(paths)
}
