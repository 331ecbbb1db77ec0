use std::path::{Path, PathBuf};

use thiserror::Error;

/// Fatal failures of a cleaning run. Cell-level defects (bad dates,
/// sentinel tokens, unparseable numbers) never reach this enum; they are
/// absorbed as missing values during coercion.
#[derive(Error, Debug)]
pub enum CleanError {
    /// The input file could not be parsed as tabular data.
    #[error("cannot read '{path}' as tabular data: {source}")]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A column has no non-missing values, so neither a mean nor a mode
    /// exists to impute from.
    #[error("column '{column}' has no non-missing values to impute from")]
    EmptyColumn { column: String },

    /// The cleaned workbook could not be persisted.
    #[error("failed to write cleaned workbook '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CleanError {
    /// Wrap any parse-stage failure for the given input path.
    pub fn unreadable(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CleanError::UnreadableInput {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Wrap a persistence failure for the given output path.
    pub fn write(
        path: &Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        CleanError::Write {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
