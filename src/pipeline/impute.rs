use std::collections::HashMap;
use std::hash::Hash;

use log::debug;

use crate::data::model::{
    CleanColumn, CleanDataset, Column, ColumnData, Dataset, FilledData,
};
use crate::error::CleanError;

// ---------------------------------------------------------------------------
// Missing-value imputation: Dataset → CleanDataset
// ---------------------------------------------------------------------------

/// Fill every hole, column by column: Numeric columns take the arithmetic
/// mean of their non-missing values, Date and Categorical columns take the
/// most frequent non-missing value (ties broken by first occurrence).
///
/// A column with nothing to impute from has no mean and no mode; that is
/// [`CleanError::EmptyColumn`], not a guess.
pub fn impute(dataset: Dataset) -> Result<CleanDataset, CleanError> {
    let columns = dataset
        .columns
        .into_iter()
        .map(impute_column)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CleanDataset { columns })
}

fn impute_column(column: Column) -> Result<CleanColumn, CleanError> {
    let Column {
        original_name,
        name,
        data,
    } = column;

    let holes = data.missing_count();
    if holes > 0 {
        debug!("column '{name}': imputing {holes} missing cells");
    }

    let data = match data {
        ColumnData::Numeric(cells) => {
            let mean = mean(&cells).ok_or_else(|| CleanError::EmptyColumn {
                column: name.clone(),
            })?;
            FilledData::Numeric(cells.into_iter().map(|c| c.unwrap_or(mean)).collect())
        }
        ColumnData::Date(cells) => {
            let fill = mode(&cells).ok_or_else(|| CleanError::EmptyColumn {
                column: name.clone(),
            })?;
            FilledData::Date(cells.into_iter().map(|c| c.unwrap_or(fill)).collect())
        }
        ColumnData::Categorical(cells) => {
            let fill = mode(&cells).ok_or_else(|| CleanError::EmptyColumn {
                column: name.clone(),
            })?;
            FilledData::Categorical(
                cells
                    .into_iter()
                    .map(|c| c.unwrap_or_else(|| fill.clone()))
                    .collect(),
            )
        }
    };

    Ok(CleanColumn {
        original_name,
        name,
        data,
    })
}

/// Arithmetic mean of the non-missing values; `None` when there are none.
fn mean(cells: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in cells.iter().flatten() {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

/// Most frequent non-missing value. A tie goes to the value whose first
/// occurrence comes earliest, which keeps the result deterministic.
fn mode<T: Clone + Eq + Hash>(cells: &[Option<T>]) -> Option<T> {
    let mut counts: HashMap<&T, (usize, usize)> = HashMap::new();
    for (index, value) in cells.iter().enumerate() {
        if let Some(value) = value {
            let entry = counts.entry(value).or_insert((0, index));
            entry.0 += 1;
        }
    }

    counts
        .into_iter()
        .min_by_key(|(_, (count, first_index))| (std::cmp::Reverse(*count), *first_index))
        .map(|(value, _)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset(name: &str, data: ColumnData) -> Dataset {
        Dataset {
            columns: vec![Column {
                original_name: name.to_string(),
                name: name.to_string(),
                data,
            }],
        }
    }

    #[test]
    fn numeric_holes_take_the_column_mean() {
        let ds = dataset(
            "Temperature (°C)",
            ColumnData::Numeric(vec![Some(20.0), None, Some(22.0)]),
        );
        let clean = impute(ds).unwrap();
        match &clean.columns[0].data {
            FilledData::Numeric(cells) => assert_eq!(cells, &vec![20.0, 21.0, 22.0]),
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn imputation_preserves_the_non_missing_mean() {
        let cells = vec![Some(1.0), None, Some(2.0), Some(6.0), None];
        let before = mean(&cells).unwrap();
        let ds = dataset("v", ColumnData::Numeric(cells));
        let clean = impute(ds).unwrap();
        let FilledData::Numeric(filled) = &clean.columns[0].data else {
            panic!("expected numeric");
        };
        let after: f64 = filled.iter().sum::<f64>() / filled.len() as f64;
        assert!((before - after).abs() < 1e-12);
    }

    #[test]
    fn categorical_holes_take_the_mode() {
        let ds = dataset(
            "Operator",
            ColumnData::Categorical(vec![
                Some("Alice".into()),
                None,
                Some("Bob".into()),
                Some("Bob".into()),
            ]),
        );
        let clean = impute(ds).unwrap();
        match &clean.columns[0].data {
            FilledData::Categorical(cells) => assert_eq!(cells[1], "Bob"),
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn mode_ties_break_by_first_occurrence() {
        let cells = vec![
            Some("blue".to_string()),
            Some("red".to_string()),
            Some("red".to_string()),
            Some("blue".to_string()),
        ];
        assert_eq!(mode(&cells), Some("blue".to_string()));
    }

    #[test]
    fn date_holes_take_the_most_frequent_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let ds = dataset(
            "Test Date",
            ColumnData::Date(vec![Some(d1), Some(d2), Some(d2), None]),
        );
        let clean = impute(ds).unwrap();
        match &clean.columns[0].data {
            FilledData::Date(cells) => assert_eq!(cells[3], d2),
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn fully_missing_column_is_fatal_and_named() {
        let ds = dataset("Result Value", ColumnData::Categorical(vec![None, None]));
        match impute(ds) {
            Err(CleanError::EmptyColumn { column }) => assert_eq!(column, "Result Value"),
            other => panic!("expected EmptyColumn, got {other:?}"),
        }
    }
}
