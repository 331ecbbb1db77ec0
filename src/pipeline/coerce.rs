use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::data::model::{Column, ColumnData, Dataset, RawColumn, RawTable};

// ---------------------------------------------------------------------------
// Type coercion: RawTable → Dataset
// ---------------------------------------------------------------------------

/// Assign every column a storage type and convert its cells.
///
/// Two rules, in order:
/// 1. A column whose (mapped) name contains `date` (case-insensitive) is a
///    date column; cells that fail to parse become missing.
/// 2. Every other column first has sentinel tokens blanked out, then all
///    remaining cells are parsed as numbers. One successful parse makes the
///    whole column Numeric, with unparseable cells as holes; zero successful
///    parses leaves it Categorical.
///
/// Cell-level failures are data-quality defects for the imputer, never
/// errors.
pub fn coerce(table: RawTable, sentinels: &[String]) -> Dataset {
    let columns = table
        .columns
        .into_iter()
        .map(|column| coerce_column(column, sentinels))
        .collect();
    Dataset { columns }
}

fn coerce_column(column: RawColumn, sentinels: &[String]) -> Column {
    let RawColumn {
        original_name,
        name,
        cells,
    } = column;

    let data = if name.to_lowercase().contains("date") {
        coerce_dates(&name, &cells)
    } else {
        coerce_values(&name, &cells, sentinels)
    };

    Column {
        original_name,
        name,
        data,
    }
}

fn coerce_dates(name: &str, cells: &[Option<String>]) -> ColumnData {
    let parsed: Vec<Option<NaiveDate>> = cells
        .iter()
        .map(|cell| cell.as_deref().and_then(parse_date))
        .collect();

    let failed = cells.iter().flatten().count() - parsed.iter().flatten().count();
    if failed > 0 {
        debug!("column '{name}': {failed} unparseable date cells became missing");
    }
    ColumnData::Date(parsed)
}

fn coerce_values(name: &str, cells: &[Option<String>], sentinels: &[String]) -> ColumnData {
    // Sentinel tokens are holes, whatever type the column turns out to be.
    let scrubbed: Vec<Option<&str>> = cells
        .iter()
        .map(|cell| {
            cell.as_deref()
                .filter(|value| !sentinels.iter().any(|s| s.as_str() == *value))
        })
        .collect();

    let numbers: Vec<Option<f64>> = scrubbed
        .iter()
        .map(|cell| cell.and_then(parse_number))
        .collect();

    if numbers.iter().any(Option::is_some) {
        let holes = scrubbed.iter().flatten().count() - numbers.iter().flatten().count();
        if holes > 0 {
            debug!("column '{name}': {holes} non-numeric cells became missing");
        }
        ColumnData::Numeric(numbers)
    } else {
        ColumnData::Categorical(
            scrubbed
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

/// Datetime layouts tried before plain dates; the time part is dropped.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Plain-date layouts, month-first before day-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y"];

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Finite numbers only: a literal "NaN" or "inf" in a cell is a defect to
/// impute, not a value.
fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnType;

    fn raw(name: &str, cells: &[Option<&str>]) -> RawTable {
        RawTable {
            columns: vec![RawColumn {
                original_name: name.to_string(),
                name: name.to_string(),
                cells: cells.iter().map(|c| c.map(str::to_string)).collect(),
            }],
        }
    }

    fn sentinels() -> Vec<String> {
        crate::config::CleanerConfig::default().sentinel_values
    }

    #[test]
    fn date_named_columns_parse_leniently() {
        let ds = coerce(
            raw(
                "Test Date",
                &[Some("2024-03-01"), Some("03/05/2024"), Some("not a date"), None],
            ),
            &sentinels(),
        );
        match &ds.columns[0].data {
            ColumnData::Date(cells) => {
                assert_eq!(cells[0], NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(cells[1], NaiveDate::from_ymd_opt(2024, 3, 5));
                assert_eq!(cells[2], None);
                assert_eq!(cells[3], None);
            }
            other => panic!("expected date column, got {:?}", other.column_type()),
        }
    }

    #[test]
    fn date_detection_matches_substring_case_insensitively() {
        let ds = coerce(raw("UPDATED_DATE", &[Some("2024-01-02")]), &sentinels());
        assert_eq!(ds.columns[0].data.column_type(), ColumnType::Date);
    }

    #[test]
    fn sentinels_become_missing_then_numbers_parse() {
        let ds = coerce(
            raw("Temperature (°C)", &[Some("20.0"), Some("N/A"), Some("22.0")]),
            &sentinels(),
        );
        match &ds.columns[0].data {
            ColumnData::Numeric(cells) => {
                assert_eq!(cells, &vec![Some(20.0), None, Some(22.0)]);
            }
            other => panic!("expected numeric column, got {:?}", other.column_type()),
        }
    }

    #[test]
    fn one_parsed_number_makes_the_column_numeric() {
        let ds = coerce(
            raw("Reading", &[Some("pending"), Some("7"), Some("error")]),
            &sentinels(),
        );
        match &ds.columns[0].data {
            ColumnData::Numeric(cells) => {
                assert_eq!(cells, &vec![None, Some(7.0), None]);
            }
            other => panic!("expected numeric column, got {:?}", other.column_type()),
        }
    }

    #[test]
    fn all_text_columns_stay_categorical() {
        let ds = coerce(
            raw("Sample ID", &[Some("A1"), Some("NA"), Some("B2")]),
            &sentinels(),
        );
        match &ds.columns[0].data {
            ColumnData::Categorical(cells) => {
                assert_eq!(
                    cells,
                    &vec![Some("A1".to_string()), None, Some("B2".to_string())]
                );
            }
            other => panic!("expected categorical column, got {:?}", other.column_type()),
        }
    }

    #[test]
    fn all_sentinel_column_is_categorical_and_fully_missing() {
        let ds = coerce(raw("Result Value", &[Some("<0.3"), Some("<0.3")]), &sentinels());
        assert_eq!(ds.columns[0].data.missing_count(), 2);
        assert_eq!(ds.columns[0].data.column_type(), ColumnType::Categorical);
    }
}
