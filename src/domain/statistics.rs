// ============================================================
// DATASET STATISTICS
// ============================================================
// Derived, per-dataset summary produced by one analysis pass

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics for one numeric column.
///
/// Undefined values (e.g. the standard deviation of a single observation)
/// are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Square Pearson correlation matrix over the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatistics {
    pub dataset_name: String,
    /// `(rows, columns)`
    pub shape: (usize, usize),
    pub columns: Vec<String>,
    pub missing_values: BTreeMap<String, usize>,
    pub data_types: BTreeMap<String, String>,
    /// One entry per numeric column, in column order
    pub numeric_summary: Vec<NumericSummary>,
    /// Present only when the dataset has at least two numeric columns
    pub correlations: Option<CorrelationMatrix>,
}

impl DatasetStatistics {
    pub fn total_missing(&self) -> usize {
        self.missing_values.values().sum()
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.numeric_summary
            .iter()
            .map(|s| s.column.as_str())
            .collect()
    }

    pub fn summary_for(&self, column: &str) -> Option<&NumericSummary> {
        self.numeric_summary.iter().find(|s| s.column == column)
    }
}
