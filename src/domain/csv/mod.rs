// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types for loaded health datasets
// No I/O, no async, no external dependencies

mod column_type;
mod csv_row;

pub use column_type::ColumnType;
pub use csv_row::{title_case, CsvField, CsvRow, Dataset, NA_VALUES};
