use std::collections::HashSet;

use log::debug;

use crate::data::model::{CleanColumn, CleanDataset, FilledData};

// ---------------------------------------------------------------------------
// Exact-duplicate removal
// ---------------------------------------------------------------------------

/// Drop every row that equals an earlier row across all columns, keeping
/// the first occurrence. Survivors keep their relative order. Comparison
/// happens on imputed values, so rows that only differed in their missing
/// cells collapse together.
pub fn drop_duplicates(dataset: CleanDataset) -> CleanDataset {
    let row_count = dataset.row_count();
    let mut seen = HashSet::with_capacity(row_count);
    let keep: Vec<usize> = (0..row_count)
        .filter(|&row| seen.insert(dataset.row_key(row)))
        .collect();

    if keep.len() == row_count {
        return dataset;
    }
    debug!("dropping {} duplicate rows", row_count - keep.len());

    let columns = dataset
        .columns
        .into_iter()
        .map(|column| {
            let CleanColumn {
                original_name,
                name,
                data,
            } = column;
            let data = match data {
                FilledData::Numeric(v) => {
                    FilledData::Numeric(keep.iter().map(|&i| v[i]).collect())
                }
                FilledData::Date(v) => FilledData::Date(keep.iter().map(|&i| v[i]).collect()),
                FilledData::Categorical(v) => {
                    FilledData::Categorical(keep.iter().map(|&i| v[i].clone()).collect())
                }
            };
            CleanColumn {
                original_name,
                name,
                data,
            }
        })
        .collect();

    CleanDataset { columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(ids: &[&str], values: &[f64]) -> CleanDataset {
        CleanDataset {
            columns: vec![
                CleanColumn {
                    original_name: "Sample_ID".into(),
                    name: "Sample ID".into(),
                    data: FilledData::Categorical(ids.iter().map(|s| s.to_string()).collect()),
                },
                CleanColumn {
                    original_name: "Result_Value".into(),
                    name: "Result Value".into(),
                    data: FilledData::Numeric(values.to_vec()),
                },
            ],
        }
    }

    #[test]
    fn exact_duplicates_keep_only_the_first() {
        let ds = dataset(&["A1", "A1", "A2"], &[1.0, 1.0, 1.0]);
        let out = drop_duplicates(ds);
        assert_eq!(out.row_count(), 2);
        match &out.columns[0].data {
            FilledData::Categorical(ids) => assert_eq!(ids, &vec!["A1".to_string(), "A2".into()]),
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn rows_differing_in_one_column_survive() {
        let ds = dataset(&["A1", "A1"], &[1.0, 2.0]);
        let out = drop_duplicates(ds);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn survivor_order_is_stable() {
        let ds = dataset(&["C", "A", "C", "B", "A"], &[1.0, 2.0, 1.0, 3.0, 2.0]);
        let out = drop_duplicates(ds);
        match &out.columns[0].data {
            FilledData::Categorical(ids) => {
                assert_eq!(ids, &vec!["C".to_string(), "A".into(), "B".into()]);
            }
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn duplicate_pair_drops_exactly_one_row() {
        let ds = dataset(&["A1", "A1"], &[21.0, 21.0]);
        let before = ds.row_count();
        let out = drop_duplicates(ds);
        assert_eq!(out.row_count(), before - 1);
    }
}
