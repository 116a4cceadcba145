// ============================================================
// CSV ROW TYPES
// ============================================================
// Data structures representing a loaded health dataset

use super::ColumnType;
use serde::{Deserialize, Serialize};

/// Tokens treated as missing values, matching the pandas defaults
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell in a CSV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvField {
    /// Column name (header)
    pub name: String,

    /// Raw cell text
    pub value: String,

    /// Whether the cell holds a missing-value token
    pub is_missing: bool,

    /// Parsed numeric value, when the cell is a number
    pub numeric: Option<f64>,
}

impl CsvField {
    /// Create a new CSV field
    pub fn new(name: String, value: String) -> Self {
        let is_missing = Self::is_missing_value(&value);
        let numeric = if is_missing {
            None
        } else {
            Self::parse_numeric(&value)
        };

        Self {
            name,
            value,
            is_missing,
            numeric,
        }
    }

    /// A field for a cell the source row did not contain
    pub fn missing(name: String) -> Self {
        Self::new(name, String::new())
    }

    fn is_missing_value(value: &str) -> bool {
        NA_VALUES.contains(&value.trim())
    }

    fn parse_numeric(value: &str) -> Option<f64> {
        let trimmed = value.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .or_else(|| trimmed.parse::<i64>().ok().map(|v| v as f64))
    }
}

/// A single row in a CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Row index (0-based)
    pub index: usize,

    /// One field per header, in header order
    pub fields: Vec<CsvField>,
}

impl CsvRow {
    /// Create a new CSV row
    pub fn new(index: usize, fields: Vec<CsvField>) -> Self {
        Self { index, fields }
    }

    /// Format this row as `name=value` pairs
    pub fn format_inline(&self) -> String {
        self.fields
            .iter()
            .map(|f| {
                if f.is_missing {
                    format!("{}=NaN", f.name)
                } else {
                    format!("{}={}", f.name, f.value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A named table loaded verbatim from one CSV source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Logical dataset name (e.g. `daily_sleep`)
    pub name: String,

    /// Column names, in file order
    pub headers: Vec<String>,

    /// All rows
    pub rows: Vec<CsvRow>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<CsvRow>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// `(row count, column count)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.headers.len())
    }

    /// All fields of the column at `index`, top to bottom
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CsvField> + '_ {
        self.rows.iter().filter_map(move |row| row.fields.get(index))
    }

    pub fn column_type(&self, index: usize) -> ColumnType {
        ColumnType::infer(self.column(index))
    }

    pub fn missing_count(&self, index: usize) -> usize {
        self.column(index).filter(|f| f.is_missing).count()
    }

    /// Numeric view of a column; `None` marks a missing or non-numeric cell
    pub fn numeric_column(&self, index: usize) -> Vec<Option<f64>> {
        self.column(index).map(|f| f.numeric).collect()
    }

    /// Indices of the columns that take part in numeric analysis
    pub fn numeric_column_indices(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|&idx| self.column_type(idx).is_numeric())
            .collect()
    }

    /// Human-friendly title: `daily_sleep` -> `Daily Sleep`
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }
}

/// Replace underscores with spaces and capitalize each word
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|s| !s.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
