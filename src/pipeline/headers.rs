use std::collections::BTreeMap;

use log::debug;

use crate::data::model::RawTable;

/// Rewrite column names through the fixed header mapping. Columns absent
/// from the map keep their name verbatim; `original_name` is left untouched
/// either way so the report can show what changed. Column order never moves.
///
/// Mapping an already-standardized name is a no-op, so running the
/// normalizer twice changes nothing.
pub fn normalize(mut table: RawTable, mapping: &BTreeMap<String, String>) -> RawTable {
    for column in &mut table.columns {
        if let Some(mapped) = mapping.get(&column.name) {
            debug!("header '{}' remapped to '{}'", column.name, mapped);
            column.name = mapped.clone();
        }
    }
    table
}
