use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use log::debug;

use super::model::{RawColumn, RawTable};
use crate::error::CleanError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular file into a [`RawTable`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – delimited text, first row as header
/// * `.xlsx` / `.xlsm` – spreadsheet, first worksheet, first row as header
///
/// Anything the file refuses to yield as a rectangular table (malformed
/// structure, corrupt binary, an extension no parser claims, duplicate or
/// absent headers) is an [`CleanError::UnreadableInput`].
pub fn load_table(path: &Path) -> Result<RawTable, CleanError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let result = match ext.as_str() {
        "csv" => load_csv(path),
        "xlsx" | "xlsm" => load_workbook(path),
        other => Err(anyhow!("unsupported file extension: .{other}")),
    };

    let table = result
        .and_then(validate)
        .map_err(|e| CleanError::unreadable(path, e))?;

    debug!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Structural checks shared by both formats.
fn validate(table: RawTable) -> Result<RawTable> {
    ensure!(table.column_count() > 0, "no columns found");

    let mut seen = HashSet::new();
    for col in &table.columns {
        if !seen.insert(col.name.as_str()) {
            bail!("duplicate column header '{}'", col.name);
        }
    }
    Ok(table)
}

/// A trimmed cell; empty text counts as missing.
fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (idx, field) in record.iter().enumerate().take(headers.len()) {
            cells[idx].push(clean_cell(field));
        }
    }

    Ok(build_table(headers, cells))
}

// ---------------------------------------------------------------------------
// Workbook loader (xlsx / xlsm)
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets"))?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| anyhow!("worksheet is empty"))?;
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_to_text(c).unwrap_or_default())
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_to_text));
        }
    }

    Ok(build_table(headers, cells))
}

/// Render a spreadsheet cell to trimmed text. Date-typed cells come out in
/// ISO form so the coercer parses them the same way as text dates; error
/// cells (`#DIV/0!` and friends) count as missing.
fn cell_to_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other
            .as_string()
            .map(|s| s.to_string())
            .unwrap_or_else(|| other.to_string()),
    };
    clean_cell(&text)
}

fn build_table(headers: Vec<String>, cells: Vec<Vec<Option<String>>>) -> RawTable {
    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, column_cells)| RawColumn {
            original_name: name.clone(),
            name,
            cells: column_cells,
        })
        .collect();
    RawTable { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_headers_and_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "input.csv",
            "Sample_ID,Result_Value\nA1,1.5\nA2,\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns[0].name, "Sample_ID");
        assert_eq!(table.columns[1].cells[0].as_deref(), Some("1.5"));
        assert_eq!(table.columns[1].cells[1], None);
    }

    #[test]
    fn ragged_csv_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "ragged.csv", "a,b\n1,2\n3,4,5\n");

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, CleanError::UnreadableInput { .. }));
    }

    #[test]
    fn duplicate_headers_are_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "dup.csv", "a,a\n1,2\n");

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, CleanError::UnreadableInput { .. }));
    }

    #[test]
    fn unknown_extension_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "input.txt", "a,b\n1,2\n");

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, CleanError::UnreadableInput { .. }));
    }

    #[test]
    fn corrupt_workbook_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "broken.xlsx", "this is not a zip archive");

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, CleanError::UnreadableInput { .. }));
    }
}
