/// Data layer: core table types and file loading.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .xlsm
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (string cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │   RawTable    │  ordered columns of Option<String>
///   └──────────────┘
///        │  (pipeline stages)
///        ▼
///   Dataset (typed, with holes) → CleanDataset (holes imputed)
/// ```
pub mod loader;
pub mod model;
