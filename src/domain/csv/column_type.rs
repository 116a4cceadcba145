// ============================================================
// COLUMN TYPE ENUM
// ============================================================
// Type tag inferred for each dataset column

use super::CsvField;
use serde::{Deserialize, Serialize};

/// Type tag inferred from every value of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Every non-missing value is an integer and nothing is missing
    Integer,

    /// Every non-missing value is numeric (or the column is entirely missing)
    Float,

    /// Every value is a `True`/`False` literal
    Bool,

    /// Anything else: dates, identifiers, free text, mixed content
    Text,
}

impl ColumnType {
    /// Infer the type of a column from its fields
    pub fn infer<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a CsvField>,
    {
        let mut present = 0usize;
        let mut missing = 0usize;
        let mut all_int = true;
        let mut all_numeric = true;
        let mut all_bool = true;

        for field in fields {
            if field.is_missing {
                missing += 1;
                continue;
            }
            present += 1;

            let trimmed = field.value.trim();
            if field.numeric.is_none() {
                all_numeric = false;
                all_int = false;
            } else if trimmed.parse::<i64>().is_err() {
                all_int = false;
            }
            if !is_bool_literal(trimmed) {
                all_bool = false;
            }
        }

        if present == 0 {
            return ColumnType::Float;
        }
        if all_numeric {
            if all_int && missing == 0 {
                return ColumnType::Integer;
            }
            return ColumnType::Float;
        }
        if all_bool && missing == 0 {
            return ColumnType::Bool;
        }
        ColumnType::Text
    }

    /// Whether the column takes part in numeric analysis
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

fn is_bool_literal(value: &str) -> bool {
    matches!(value, "True" | "TRUE" | "true" | "False" | "FALSE" | "false")
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "int64"),
            ColumnType::Float => write!(f, "float64"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Text => write!(f, "object"),
        }
    }
}
