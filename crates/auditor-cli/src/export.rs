//! Report and record export.
//!
//! Each export writes `relatorio_<kind>_<stamp>.md` with the report text and,
//! when the result has records, `dados_<kind>_<stamp>.csv` with one row per
//! record. The stamp is the time the result was generated, taken from its
//! run id, so exporting later names the files the same way.

use crate::error::Result;
use auditor_domain::{AuditResult, OperationKind, Record};
use chrono::{DateTime, Local, Utc};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files written by one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Markdown report
    pub report: PathBuf,
    /// Records as CSV, if there were any
    pub data: Option<PathBuf>,
}

/// Timestamp used in export file names
pub fn file_stamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Local time at which `result` was generated
pub fn generated_at(result: &AuditResult) -> DateTime<Local> {
    i64::try_from(result.run_id.timestamp())
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.with_timezone(&Local))
        .unwrap_or_else(Local::now)
}

/// `relatorio_<kind>_<stamp>.md`
pub fn report_file_name(kind: OperationKind, stamp: &str) -> String {
    format!("relatorio_{}_{}.md", kind.as_str(), stamp)
}

/// `dados_<kind>_<stamp>.csv`
pub fn data_file_name(kind: OperationKind, stamp: &str) -> String {
    format!("dados_{}_{}.csv", kind.as_str(), stamp)
}

/// Write `result` into `dir`, creating the directory if needed.
pub fn export_result(dir: &Path, kind: OperationKind, result: &AuditResult) -> Result<ExportPaths> {
    fs::create_dir_all(dir)?;
    let stamp = file_stamp(&generated_at(result));

    let report = dir.join(report_file_name(kind, &stamp));
    fs::write(&report, format!("{}\n", result.report_text))?;

    let data = if result.has_records() {
        let path = dir.join(data_file_name(kind, &stamp));
        write_records_csv(fs::File::create(&path)?, &result.records)?;
        Some(path)
    } else {
        None
    };

    info!(report = %report.display(), records = result.records.len(), "Exported {} result", kind);
    Ok(ExportPaths { report, data })
}

/// Write records as CSV with a header row; nothing is written for no records.
pub fn write_records_csv<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(first.headers())?;
    for record in records {
        csv_writer.write_record(record.columns())?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_domain::{ExtractedItem, PendingItem, PendingKind, RunId};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 14, 30, 5).single().unwrap()
    }

    /// A result whose run id carries the `at()` timestamp
    fn generated(result: AuditResult) -> AuditResult {
        let millis = at().timestamp_millis() as u128;
        AuditResult {
            run_id: RunId::from_value(millis << 80),
            ..result
        }
    }

    #[test]
    fn test_generated_at_reads_run_id() {
        let result = generated(AuditResult::new(Vec::new(), "Resumo", 0));
        assert_eq!(generated_at(&result), at());
    }

    #[test]
    fn test_stamp_is_stable_across_exports() {
        let dir = TempDir::new().unwrap();
        let result = AuditResult::new(Vec::new(), "Resumo", 0);

        let first = export_result(&dir.path().join("a"), OperationKind::Extraction, &result).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = export_result(&dir.path().join("b"), OperationKind::Extraction, &result).unwrap();

        assert_eq!(first.report.file_name(), second.report.file_name());
    }

    #[test]
    fn test_file_names() {
        let stamp = file_stamp(&at());
        assert_eq!(stamp, "20240501_143005");
        assert_eq!(report_file_name(OperationKind::Audit, &stamp), "relatorio_audit_20240501_143005.md");
        assert_eq!(
            data_file_name(OperationKind::Extraction, &stamp),
            "dados_extraction_20240501_143005.csv"
        );
    }

    #[test]
    fn test_export_with_records() {
        let dir = TempDir::new().unwrap();
        let result = generated(AuditResult::new(
            vec![Record::Pending(PendingItem {
                kind: PendingKind::Missing,
                list_name: "Geral/Não Encontrado".to_string(),
                detail: "Ar condicionado, 12.000 BTU".to_string(),
            })],
            "### PENDÊNCIAS",
            0,
        ));

        let paths = export_result(dir.path(), OperationKind::Audit, &result).unwrap();

        let report = fs::read_to_string(&paths.report).unwrap();
        assert_eq!(report, "### PENDÊNCIAS\n");

        let csv_text = fs::read_to_string(paths.data.unwrap()).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(lines.next(), Some("Tipo,Lista,Item"));
        assert_eq!(lines.next(), Some("FALTANTE,Geral/Não Encontrado,\"Ar condicionado, 12.000 BTU\""));
    }

    #[test]
    fn test_export_without_records_writes_report_only() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("relatorios");
        let result = generated(AuditResult::new(Vec::new(), "Planta conforme.", 0));

        let paths = export_result(&target, OperationKind::DrawingCheck, &result).unwrap();

        assert!(paths.data.is_none());
        assert_eq!(
            paths.report.file_name().unwrap().to_str().unwrap(),
            "relatorio_drawing-check_20240501_143005.md"
        );
        assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
    }

    #[test]
    fn test_extraction_csv_headers() {
        let mut buffer = Vec::new();
        let records = vec![Record::Extracted(ExtractedItem {
            category: "Elétrica".to_string(),
            item_name: "Gerador".to_string(),
            quantity: "1".to_string(),
            spec_summary: "500 kVA".to_string(),
        })];
        write_records_csv(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Categoria,Item,Quantidade,Especificacao\n"));
    }
}
