//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use auditor_domain::{AuditResult, OperationKind, PendingKind, Record};
use auditor_pipeline::{category_counts, pending_counts, AskAnswer, OperationOutcome, ResultNotice};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Widest bar drawn in the chart
const MAX_BAR_WIDTH: usize = 40;

/// Bar colour for extraction categories
const CATEGORY_COLOR: (u8, u8, u8) = (0x4c, 0x78, 0xa8);

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a stored result.
    pub fn format_result(&self, kind: OperationKind, result: &AuditResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_result_json(kind, result),
            OutputFormat::Table => Ok(self.format_result_table(kind, result)),
            OutputFormat::Quiet => Ok(result.report_text.clone()),
        }
    }

    fn format_result_json(&self, kind: OperationKind, result: &AuditResult) -> Result<String> {
        let value = serde_json::json!({
            "kind": kind.as_str(),
            "run_id": result.run_id.to_string(),
            "timestamp_ms": result.run_id.timestamp(),
            "report": result.report_text,
            "records": records_json(&result.records),
            "skipped_lines": result.skipped_lines,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_result_table(&self, kind: OperationKind, result: &AuditResult) -> String {
        let mut sections = vec![self.colorize(&format!("== {} ==", kind_title(kind)), "cyan")];
        sections.push(result.report_text.clone());

        if result.has_records() {
            sections.push(self.format_records(&result.records));
            if let Some(chart) = self.format_chart(&result.records) {
                sections.push(chart);
            }
        }
        sections.push(self.notice(ResultNotice::of(result)));
        if result.skipped_lines > 0 {
            sections.push(self.info(&format!(
                "{} table line(s) did not match the expected columns and were skipped",
                result.skipped_lines
            )));
        }

        sections.join("\n\n")
    }

    /// Format records as a table.
    pub fn format_records(&self, records: &[Record]) -> String {
        let Some(first) = records.first() else {
            return self.colorize("No records.", "yellow");
        };

        let mut builder = Builder::default();
        builder.push_record(first.headers().iter().copied());
        for record in records {
            builder.push_record(record.columns());
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Horizontal bar chart of the records, grouped by list and kind for
    /// audits and by category for extractions.
    pub fn format_chart(&self, records: &[Record]) -> Option<String> {
        let pending = pending_counts(records);
        let rows: Vec<(String, usize, (u8, u8, u8))> = if !pending.is_empty() {
            pending
                .into_iter()
                .map(|c| (format!("{}  {}", c.list_name, c.kind), c.count, kind_color(c.kind)))
                .collect()
        } else {
            category_counts(records)
                .into_iter()
                .map(|c| (c.category, c.count, CATEGORY_COLOR))
                .collect()
        };
        if rows.is_empty() {
            return None;
        }

        let label_width = rows.iter().map(|(label, ..)| label.chars().count()).max().unwrap_or(0);
        let max_count = rows.iter().map(|(_, count, _)| *count).max().unwrap_or(1);

        let lines: Vec<String> = rows
            .iter()
            .map(|(label, count, color)| {
                let bar = "█".repeat(bar_width(*count, max_count));
                format!("{:<label_width$}  {} {}", label, self.paint(&bar, *color), count)
            })
            .collect();
        Some(lines.join("\n"))
    }

    /// Message describing what a result contains.
    pub fn notice(&self, notice: ResultNotice) -> String {
        match notice {
            ResultNotice::Records(n) => self.info(&format!("{} record(s) recovered", n)),
            ResultNotice::NoFindings => self.success("No discrepancies found"),
            ResultNotice::NoStructuredData => {
                self.warning("No structured data could be recovered; showing the report only")
            }
        }
    }

    /// Summary line for a finished operation.
    pub fn outcome(&self, outcome: &OperationOutcome) -> String {
        let mut lines = vec![self.info(&format!(
            "Sent {} chars to {}",
            group_thousands(outcome.sent_chars),
            outcome.model_name
        ))];
        if !outcome.source_names.is_empty() {
            lines.push(self.info(&format!("Sources: {}", outcome.source_names.join(", "))));
        }
        lines.push(self.success(&format!(
            "{} finished in {:.1}s",
            kind_title(outcome.kind),
            outcome.elapsed_ms as f64 / 1000.0
        )));
        lines.join("\n")
    }

    /// Format the answer to a question.
    pub fn format_answer(&self, answer: &AskAnswer) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "answer": answer.text,
                    "sources": answer.source_names,
                    "sent_chars": answer.sent_chars,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table | OutputFormat::Quiet => Ok(answer.text.clone()),
        }
    }

    /// Format an error with its remediation hint.
    pub fn failure(&self, err: &CliError) -> String {
        match err.hint() {
            Some(hint) => format!("{}\n{}", self.error(&err.to_string()), self.info(hint)),
            None => self.error(&err.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }

    fn paint(&self, text: &str, (r, g, b): (u8, u8, u8)) -> String {
        if self.color_enabled {
            text.truecolor(r, g, b).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Chart colour per discrepancy kind
pub fn kind_color(kind: PendingKind) -> (u8, u8, u8) {
    match kind {
        PendingKind::Missing => (0xe4, 0x57, 0x56),
        PendingKind::TechMismatch => (0xf5, 0x85, 0x18),
        PendingKind::QtyMismatch => (0x4c, 0x78, 0xa8),
        PendingKind::ImplicitMissing => (0x54, 0xa2, 0x4b),
    }
}

/// Human title for an operation kind.
pub fn kind_title(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Audit => "Audit",
        OperationKind::Extraction => "Extraction",
        OperationKind::DrawingCheck => "Drawing check",
    }
}

fn records_json(records: &[Record]) -> Vec<serde_json::Value> {
    records
        .iter()
        .map(|record| {
            let row: serde_json::Map<String, serde_json::Value> = record
                .headers()
                .iter()
                .zip(record.columns())
                .map(|(header, value)| (header.to_string(), serde_json::Value::from(value)))
                .collect();
            serde_json::Value::Object(row)
        })
        .collect()
}

fn bar_width(count: usize, max_count: usize) -> usize {
    if count == 0 || max_count == 0 {
        return 0;
    }
    (count * MAX_BAR_WIDTH).div_ceil(max_count)
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditor_domain::{ExtractedItem, PendingItem};

    fn audit_result() -> AuditResult {
        let records = vec![
            Record::Pending(PendingItem {
                kind: PendingKind::Missing,
                list_name: "LME".to_string(),
                detail: "Ar condicionado".to_string(),
            }),
            Record::Pending(PendingItem {
                kind: PendingKind::Missing,
                list_name: "LME".to_string(),
                detail: "Gerador".to_string(),
            }),
            Record::Pending(PendingItem {
                kind: PendingKind::QtyMismatch,
                list_name: "LMM".to_string(),
                detail: "Bomba".to_string(),
            }),
        ];
        AuditResult::new(records, "### PENDÊNCIAS", 1)
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_result(OperationKind::Audit, &audit_result()).unwrap();
        assert!(output.starts_with("== Audit =="));
        assert!(output.contains("### PENDÊNCIAS"));
        assert!(output.contains("Tipo"));
        assert!(output.contains("Ar condicionado"));
        assert!(output.contains("3 record(s) recovered"));
        assert!(output.contains("1 table line(s)"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_result(OperationKind::Audit, &audit_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["kind"], "audit");
        assert_eq!(value["records"][2]["Tipo"], "DISCREPANCIA_QUANTIDADE");
        assert_eq!(value["records"][2]["Lista"], "LMM");
        assert_eq!(value["skipped_lines"], 1);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_result(OperationKind::Audit, &audit_result()).unwrap();
        assert_eq!(output, "### PENDÊNCIAS");
    }

    #[test]
    fn test_chart_groups_by_list_and_kind() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let chart = formatter.format_chart(&audit_result().records).unwrap();
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("LME  FALTANTE"));
        assert!(lines[0].ends_with(&format!("{} 2", "█".repeat(MAX_BAR_WIDTH))));
        assert!(lines[1].starts_with("LMM  DISCREPANCIA_QUANTIDADE"));
        assert!(lines[1].ends_with(&format!("{} 1", "█".repeat(MAX_BAR_WIDTH / 2))));
    }

    #[test]
    fn test_chart_for_extraction() {
        let records = vec![Record::Extracted(ExtractedItem {
            category: "Elétrica".to_string(),
            item_name: "Gerador".to_string(),
            quantity: "1".to_string(),
            spec_summary: "500 kVA".to_string(),
        })];
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_chart(&records).unwrap().starts_with("Elétrica"));
        assert!(formatter.format_chart(&[]).is_none());
    }

    #[test]
    fn test_no_findings_notice() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let clean = AuditResult::new(Vec::new(), "Auditoria Concluída. Nenhuma pendência encontrada.", 0);
        let output = formatter.format_result(OperationKind::Audit, &clean).unwrap();
        assert!(output.contains("✓ No discrepancies found"));
        assert!(!output.contains("Tipo"));
    }

    #[test]
    fn test_failure_includes_hint() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let err = CliError::Pipeline(auditor_pipeline::PipelineError::Timeout(300));
        let output = formatter.failure(&err);
        assert!(output.starts_with("✗ LLM call timed out after 300s"));
        assert!(output.lines().nth(1).unwrap().starts_with("ℹ "));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.paint("██", kind_color(PendingKind::Missing)), "██");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar_width(0, 5), 0);
        assert_eq!(bar_width(1, 100), 1);
        assert_eq!(bar_width(5, 5), MAX_BAR_WIDTH);
    }
}
