// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, encoding fallback, and export directory loading

mod csv_parser;
mod dataset_loader;

pub use csv_parser::CsvParser;
pub use dataset_loader::{DatasetLoader, LoadEntry, LoadOutcome, LoadReport, OURA_EXPORT_FILES};
