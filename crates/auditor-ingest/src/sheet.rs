//! Spreadsheet (.csv, .xlsx) text extraction
//!
//! Both formats are rendered as a whitespace-aligned text table: the first row
//! (the header) followed by every data row. Only the first worksheet of an
//! xlsx workbook is read.

use crate::error::IngestError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

/// Extract a .csv file as an aligned text table
pub fn read_csv(path: &Path) -> Result<String, IngestError> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::extraction(path, e))?;

    let rows = csv_rows(reader).map_err(|e| IngestError::extraction(path, e))?;
    Ok(render_rows(rows))
}

fn csv_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Vec<String>>, csv::Error> {
    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(|cell| cell.trim().to_string()).collect()))
        .collect()
}

/// Extract the first worksheet of an .xlsx workbook as an aligned text table
pub fn read_xlsx(path: &Path) -> Result<String, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| IngestError::extraction(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::extraction(path, "workbook has no worksheets"))?
        .map_err(|e| IngestError::extraction(path, e))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(render_rows(rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Render rows as an aligned table; short rows are padded with empty cells
pub(crate) fn render_rows(mut rows: Vec<Vec<String>>) -> String {
    rows.retain(|row| row.iter().any(|cell| !cell.is_empty()));
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return String::new();
    }

    let mut builder = Builder::default();
    for mut row in rows {
        row.resize(width, String::new());
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_header_and_rows() {
        let file = csv_file("Item,Quantidade\nBomba centrífuga,2\nGerador,1\n");
        let text = read_csv(file.path()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Item") && lines[0].contains("Quantidade"));
        assert!(lines[1].contains("Bomba centrífuga") && lines[1].contains('2'));
        assert!(lines[2].contains("Gerador"));
    }

    #[test]
    fn test_csv_columns_are_aligned() {
        let file = csv_file("A,B\nlonger value,x\n");
        let text = read_csv(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].find('B'), lines[1].find('x'));
    }

    #[test]
    fn test_csv_ragged_rows() {
        let file = csv_file("A,B,C\n1\n2,3\n");
        let text = read_csv(file.path()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_csv_missing_file() {
        let err = read_csv(Path::new("/nonexistent/lista.csv")).unwrap_err();
        assert_eq!(err.file(), "lista.csv");
    }

    #[test]
    fn test_xlsx_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"definitely not a workbook").unwrap();

        let err = read_xlsx(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::Extraction { .. }));
    }

    #[test]
    fn test_render_rows_skips_blank_rows() {
        let rows = vec![
            vec!["H1".to_string(), "H2".to_string()],
            vec![String::new(), String::new()],
            vec!["a".to_string(), "b".to_string()],
        ];
        assert_eq!(render_rows(rows).lines().count(), 2);
        assert_eq!(render_rows(Vec::new()), "");
    }
}
