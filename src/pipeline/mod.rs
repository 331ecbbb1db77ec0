/// Cleaning pipeline: five stages, each consuming the previous stage's
/// value and producing the next.
///
/// ```text
///   path ──▶ loader ──▶ RawTable
///                          │ headers::normalize
///                          ▼
///                       RawTable (standardized names)
///                          │ coerce::coerce
///                          ▼
///                       Dataset ──▶ report::summarize   (audit snapshot)
///                          │ impute::impute
///                          ▼
///                       CleanDataset
///                          │ dedupe::drop_duplicates
///                          ▼
///                       CleanDataset ──▶ writer::write_workbook ──▶ path
/// ```
///
/// The report is taken from the post-coercion snapshot on purpose: it must
/// describe the data quality the file arrived with, which imputation and
/// deduplication erase.
pub mod coerce;
pub mod dedupe;
pub mod headers;
pub mod impute;
pub mod report;
pub mod writer;

use std::path::{Path, PathBuf};

use log::info;

use crate::config::CleanerConfig;
use crate::data::loader;
use crate::error::CleanError;

/// Run the full cleaning pipeline on one tabular file and return the path
/// of the written workbook.
pub fn clean_file(input: &Path, config: &CleanerConfig) -> Result<PathBuf, CleanError> {
    let table = loader::load_table(input)?;
    info!(
        "loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        input.display()
    );

    let table = headers::normalize(table, &config.header_mapping);
    let remapped = table
        .columns
        .iter()
        .filter(|c| c.name != c.original_name)
        .count();
    info!("standardized headers ({remapped} remapped)");

    let dataset = coerce::coerce(table, &config.sentinel_values);
    let snapshot = report::summarize(&dataset);
    let missing: usize = snapshot.columns.iter().map(|c| c.missing_values).sum();
    info!("coerced column types ({missing} missing cells recorded)");

    let clean = impute::impute(dataset)?;
    let rows_before = clean.row_count();
    let clean = dedupe::drop_duplicates(clean);
    info!(
        "imputed missing cells, dropped {} duplicate rows",
        rows_before - clean.row_count()
    );

    let output = writer::write_workbook(&clean, &snapshot, &config.output_path())?;
    info!("cleaned workbook written to {}", output.display());
    Ok(output)
}
