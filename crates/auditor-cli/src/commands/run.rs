//! Audit, extraction and drawing-check commands.

use crate::error::{CliError, Result};
use crate::export::export_result;
use crate::output::Formatter;
use auditor_domain::traits::{DocumentExtractor, LlmProvider};
use auditor_domain::OperationKind;
use auditor_ingest::{FileType, IngestError};
use auditor_llm::LlmError;
use auditor_pipeline::{is_supporting_file, OperationRequest, Pipeline};
use std::path::Path;

/// Check file types before anything is read.
pub fn validate_request(request: &OperationRequest) -> Result<()> {
    if let Some(sp) = &request.sp {
        if FileType::from_path(sp) != FileType::Docx {
            return Err(CliError::InvalidInput(format!(
                "SP must be a .docx file: {}",
                sp.display()
            )));
        }
    }

    let (supporting, expected) = match request.kind {
        OperationKind::Audit => (&request.lists, ".csv or .xlsx"),
        OperationKind::DrawingCheck => (&request.drawings, ".pdf"),
        OperationKind::Extraction => return Ok(()),
    };
    if let Some(bad) = supporting.iter().find(|p| !is_supporting_file(request.kind, p)) {
        return Err(CliError::InvalidInput(format!(
            "Expected a {} file: {}",
            expected,
            bad.display()
        )));
    }
    Ok(())
}

/// Execute one operation, print its result and optionally export it.
pub async fn execute_run<L, D>(
    request: OperationRequest,
    export: bool,
    pipeline: &mut Pipeline<L, D>,
    formatter: &Formatter,
    export_dir: &Path,
) -> Result<()>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    D: DocumentExtractor<Error = IngestError>,
{
    validate_request(&request)?;

    let kind = request.kind;
    let outcome = pipeline.run(request).await?;
    eprintln!("{}", formatter.outcome(&outcome));

    let result = pipeline.store().get(kind).ok_or(CliError::NoResult)?;
    println!("{}", formatter.format_result(kind, result)?);

    if export {
        let paths = export_result(export_dir, kind, result)?;
        eprintln!("{}", formatter.success(&format!("Report written to {}", paths.report.display())));
        if let Some(data) = paths.data {
            eprintln!("{}", formatter.success(&format!("Records written to {}", data.display())));
        }
    }

    Ok(())
}
