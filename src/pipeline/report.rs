use serde::Serialize;

use crate::data::model::{ColumnType, Dataset};

// ---------------------------------------------------------------------------
// Metadata report: the per-column audit summary
// ---------------------------------------------------------------------------

/// One row of the metadata report.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Header as it appeared in the source file.
    pub original_name: String,
    /// Header after mapping (equals `original_name` for unmapped columns).
    pub name: String,
    pub column_type: ColumnType,
    /// Missing cells before imputation filled them.
    pub missing_values: usize,
    /// Distinct non-missing values before imputation and deduplication.
    pub distinct_values: usize,
}

/// Per-column audit summary describing the dataset's quality as received.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataReport {
    pub columns: Vec<ColumnSummary>,
}

/// Summarize the post-coercion dataset. This runs on the snapshot taken
/// before imputation and deduplication: the report must describe the data
/// quality the file arrived with, not the laundered result (where the
/// missing count would always read zero).
pub fn summarize(dataset: &Dataset) -> MetadataReport {
    let columns = dataset
        .columns
        .iter()
        .map(|column| ColumnSummary {
            original_name: column.original_name.clone(),
            name: column.name.clone(),
            column_type: column.data.column_type(),
            missing_values: column.data.missing_count(),
            distinct_values: column.data.distinct_count(),
        })
        .collect();
    MetadataReport { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, ColumnData};

    #[test]
    fn counts_reflect_the_pre_imputation_state() {
        let dataset = Dataset {
            columns: vec![Column {
                original_name: "Temp (°C)".into(),
                name: "Temperature (°C)".into(),
                data: ColumnData::Numeric(vec![Some(20.0), None, Some(22.0)]),
            }],
        };

        let report = summarize(&dataset);
        let summary = &report.columns[0];
        assert_eq!(summary.original_name, "Temp (°C)");
        assert_eq!(summary.name, "Temperature (°C)");
        assert_eq!(summary.column_type, ColumnType::Numeric);
        assert_eq!(summary.missing_values, 1);
        assert_eq!(summary.distinct_values, 2);
    }

    #[test]
    fn one_summary_per_column_in_order() {
        let dataset = Dataset {
            columns: vec![
                Column {
                    original_name: "Sample ID".into(),
                    name: "Sample ID".into(),
                    data: ColumnData::Categorical(vec![Some("A1".into())]),
                },
                Column {
                    original_name: "Test_Date".into(),
                    name: "Test Date".into(),
                    data: ColumnData::Date(vec![None]),
                },
            ],
        };

        let report = summarize(&dataset);
        let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sample ID", "Test Date"]);
        assert_eq!(report.columns[1].missing_values, 1);
        assert_eq!(report.columns[1].distinct_values, 0);
    }
}
