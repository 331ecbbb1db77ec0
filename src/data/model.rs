use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// RawTable – the dataset as loaded, before any typing
// ---------------------------------------------------------------------------

/// One column straight out of the source file: trimmed string cells,
/// `None` where the cell was structurally empty.
#[derive(Debug, Clone)]
pub struct RawColumn {
    /// Header as it appeared in the source file.
    pub original_name: String,
    /// Current header; equals `original_name` until the normalizer runs.
    pub name: String,
    pub cells: Vec<Option<String>>,
}

/// Ordered columns of untyped cells. All columns have equal length.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<RawColumn>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

// ---------------------------------------------------------------------------
// Dataset – typed columns with missing-value holes (post-coercion)
// ---------------------------------------------------------------------------

/// Storage type a column settled into during coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    #[serde(rename = "text")]
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Categorical => write!(f, "text"),
        }
    }
}

/// Per-column typed storage. Every later stage matches on this tag instead
/// of re-inferring types from cell contents.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Date(Vec<Option<NaiveDate>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Date(_) => ColumnType::Date,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Date(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    /// Number of distinct non-missing values. Floats are distinguished by
    /// bit pattern so the count is exact and deterministic.
    pub fn distinct_count(&self) -> usize {
        use std::collections::HashSet;
        match self {
            ColumnData::Numeric(v) => v
                .iter()
                .flatten()
                .map(|x| x.to_bits())
                .collect::<HashSet<_>>()
                .len(),
            ColumnData::Date(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
            ColumnData::Categorical(v) => v.iter().flatten().collect::<HashSet<_>>().len(),
        }
    }
}

/// A named, typed column. `original_name` survives header normalization so
/// the metadata report can show both sides of the mapping.
#[derive(Debug, Clone)]
pub struct Column {
    pub original_name: String,
    pub name: String,
    pub data: ColumnData,
}

/// The coerced dataset: ordered typed columns, equal lengths, holes where
/// cells were missing or unparseable.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// CleanDataset – hole-free columns (post-imputation)
// ---------------------------------------------------------------------------

/// Column storage once every hole has been imputed.
#[derive(Debug, Clone)]
pub enum FilledData {
    Numeric(Vec<f64>),
    Date(Vec<NaiveDate>),
    Categorical(Vec<String>),
}

impl FilledData {
    pub fn len(&self) -> usize {
        match self {
            FilledData::Numeric(v) => v.len(),
            FilledData::Date(v) => v.len(),
            FilledData::Categorical(v) => v.len(),
        }
    }

    /// The cell at `row` as a dedup key.
    pub fn key_at(&self, row: usize) -> CellKey {
        match self {
            FilledData::Numeric(v) => CellKey::Number(v[row].to_bits()),
            FilledData::Date(v) => CellKey::Date(v[row]),
            FilledData::Categorical(v) => CellKey::Text(v[row].clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CleanColumn {
    pub original_name: String,
    pub name: String,
    pub data: FilledData,
}

/// The final dataset: no missing cells, ready for deduplication and output.
#[derive(Debug, Clone)]
pub struct CleanDataset {
    pub columns: Vec<CleanColumn>,
}

impl CleanDataset {
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    /// Full-row equality key across all columns.
    pub fn row_key(&self, row: usize) -> Vec<CellKey> {
        self.columns.iter().map(|c| c.data.key_at(row)).collect()
    }
}

// ---------------------------------------------------------------------------
// CellKey – hashable cell identity for exact-duplicate detection
// ---------------------------------------------------------------------------

/// Cell identity used when comparing whole rows. Floats compare by bit
/// pattern; imputed cells in a column all carry the column mean, so rows
/// that became identical through imputation still count as duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Number(u64),
    Date(NaiveDate),
    Text(String),
}
