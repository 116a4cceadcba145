// ============================================================
// DATASET ANALYZER USE CASE
// ============================================================
// Descriptive statistics and chart layouts for every loaded dataset

mod figures;
mod statistics;

pub use figures::{build_figure, histogram};
pub use statistics::{compute_statistics, describe, pearson, quantile};

use crate::domain::csv::{ColumnType, CsvRow, Dataset};
use crate::domain::dictionary::DataDictionary;
use crate::domain::error::{AppError, Result};
use crate::domain::figure::Figure;
use crate::domain::statistics::DatasetStatistics;
use std::fmt;
use tracing::{error, info, warn};

pub const NO_DESCRIPTION: &str = "(No description available)";
const PREVIEW_ROWS: usize = 3;

/// Statistics and figure for a single dataset.
///
/// Fails only when the dataset is malformed (a row that does not line up
/// with the header).
pub fn analyze_dataset(dataset: &Dataset) -> Result<(DatasetStatistics, Figure)> {
    let width = dataset.headers.len();
    if let Some(row) = dataset.rows.iter().find(|row| row.fields.len() != width) {
        return Err(AppError::ValidationError(format!(
            "Row {} of '{}' has {} fields, expected {}",
            row.index,
            dataset.name,
            row.fields.len(),
            width
        )));
    }

    let numeric_indices = dataset.numeric_column_indices();
    let stats = compute_statistics(dataset, &numeric_indices);
    let figure = build_figure(dataset, &numeric_indices);
    Ok((stats, figure))
}

/// `(name, rows, columns)` for the dataset listing
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetListing {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

/// Human-readable profile of one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub name: String,
    pub shape: (usize, usize),
    /// `None` when the dictionary has no entry for this dataset
    pub descriptions: Option<Vec<(String, String)>>,
    pub data_types: Vec<(String, ColumnType)>,
    /// Only columns with at least one missing value
    pub missing: Vec<(String, usize)>,
    pub preview: Vec<CsvRow>,
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} Dataset Information",
            crate::domain::csv::title_case(&self.name)
        )?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Shape: {} rows, {} columns", self.shape.0, self.shape.1)?;

        if let Some(descriptions) = &self.descriptions {
            writeln!(f, "\nColumn Descriptions:")?;
            for (column, description) in descriptions {
                writeln!(f, "  {}: {}", column, description)?;
            }
        }

        writeln!(f, "\nData Types:")?;
        for (column, column_type) in &self.data_types {
            writeln!(f, "  {}: {}", column, column_type)?;
        }

        writeln!(f, "\nMissing Values:")?;
        if self.missing.is_empty() {
            writeln!(f, "  No missing values")?;
        } else {
            for (column, count) in &self.missing {
                writeln!(f, "  {}: {}", column, count)?;
            }
        }

        writeln!(f, "\nFirst {} rows:", self.preview.len())?;
        for row in &self.preview {
            writeln!(f, "  [{}] {}", row.index, row.format_inline())?;
        }
        Ok(())
    }
}

/// Loaded datasets plus the results of the latest analysis pass.
///
/// Datasets and results keep load order; results are replaced wholesale by
/// each call to [`HealthAnalysis::analyze_all`].
#[derive(Debug, Clone, Default)]
pub struct HealthAnalysis {
    datasets: Vec<Dataset>,
    stats: Vec<DatasetStatistics>,
    figures: Vec<Figure>,
}

impl HealthAnalysis {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self {
            datasets,
            stats: Vec::new(),
            figures: Vec::new(),
        }
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Statistics in dataset order; empty until analysis has run
    pub fn statistics(&self) -> &[DatasetStatistics] {
        &self.stats
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn has_analysis(&self) -> bool {
        !self.stats.is_empty()
    }

    /// Analyze every dataset. A dataset that fails is logged and left out;
    /// the others still complete.
    pub fn analyze_all(&mut self) {
        if self.datasets.is_empty() {
            warn!("No health data loaded; nothing to analyze");
            return;
        }

        info!(datasets = self.datasets.len(), "Analyzing all datasets");
        self.stats.clear();
        self.figures.clear();

        for dataset in &self.datasets {
            match analyze_dataset(dataset) {
                Ok((stats, figure)) => {
                    info!(dataset = %dataset.name, "Completed analysis");
                    self.stats.push(stats);
                    self.figures.push(figure);
                }
                Err(err) => {
                    error!(dataset = %dataset.name, error = %err, "Error analyzing dataset");
                }
            }
        }

        info!(analyzed = self.stats.len(), "Completed analysis");
    }

    pub fn list_datasets(&self) -> Vec<DatasetListing> {
        self.datasets
            .iter()
            .map(|dataset| {
                let (rows, columns) = dataset.shape();
                DatasetListing {
                    name: dataset.name.clone(),
                    rows,
                    columns,
                }
            })
            .collect()
    }

    pub fn dataset_info(&self, name: &str, dictionary: &DataDictionary) -> Result<DatasetInfo> {
        let dataset = self
            .dataset(name)
            .ok_or_else(|| AppError::NotFound(format!("Dataset '{}' not found.", name)))?;

        let descriptions = dictionary.has_dataset(name).then(|| {
            dataset
                .headers
                .iter()
                .map(|column| {
                    let description = dictionary.describe(name, column).unwrap_or(NO_DESCRIPTION);
                    (column.clone(), description.to_string())
                })
                .collect()
        });

        let data_types = dataset
            .headers
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.clone(), dataset.column_type(idx)))
            .collect();

        let missing = dataset
            .headers
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.clone(), dataset.missing_count(idx)))
            .filter(|(_, count)| *count > 0)
            .collect();

        Ok(DatasetInfo {
            name: dataset.name.clone(),
            shape: dataset.shape(),
            descriptions,
            data_types,
            missing,
            preview: dataset.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
        })
    }

    pub fn summary_stats(&self, name: &str) -> Result<&DatasetStatistics> {
        self.stats
            .iter()
            .find(|s| s.dataset_name == name)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No statistics available for '{}'. Run the analysis first.",
                    name
                ))
            })
    }

    pub fn figure(&self, name: &str) -> Result<&Figure> {
        self.figures
            .iter()
            .find(|f| f.dataset_name == name)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No figure available for '{}'. Run the analysis first.",
                    name
                ))
            })
    }
}

/// Completeness overview across every analyzed dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataQualitySummary {
    pub total_datasets: usize,
    pub total_records: usize,
    pub complete: Vec<String>,
    /// `(dataset, missing cells)` for datasets with gaps
    pub incomplete: Vec<(String, usize)>,
}

impl DataQualitySummary {
    pub fn from_statistics(stats: &[DatasetStatistics]) -> Self {
        let mut summary = Self {
            total_datasets: stats.len(),
            total_records: stats.iter().map(|s| s.shape.0).sum(),
            ..Self::default()
        };
        for dataset in stats {
            match dataset.total_missing() {
                0 => summary.complete.push(dataset.dataset_name.clone()),
                missing => summary
                    .incomplete
                    .push((dataset.dataset_name.clone(), missing)),
            }
        }
        summary
    }
}
