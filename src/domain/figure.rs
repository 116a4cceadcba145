// ============================================================
// FIGURE MODEL
// ============================================================
// Chart specification produced for each analyzed dataset.
// Rendering is left to whichever front end consumes the JSON.

use serde::{Deserialize, Serialize};

pub const HISTOGRAM_BINS: usize = 30;
pub const MAX_PANELS_PER_ROW: usize = 4;
pub const MIN_GRID_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    /// At most four panels per row and never fewer than two rows.
    pub fn for_panels(count: usize) -> Self {
        if count == 0 {
            return Self { rows: 1, cols: 1 };
        }
        let cols = count.min(MAX_PANELS_PER_ROW);
        let rows = ((count + cols - 1) / cols).max(MIN_GRID_ROWS);
        Self { rows, cols }
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Histogram {
        column: String,
        title: String,
        bins: Vec<HistogramBin>,
        /// Vertical marker drawn at the column mean
        mean: Option<f64>,
        mean_label: Option<String>,
    },
    /// Column has no non-missing values
    NoData { column: String, text: String },
    /// Dataset has no numeric columns at all
    Info { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub dataset_name: String,
    pub title: String,
    pub layout: GridLayout,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn histogram_count(&self) -> usize {
        self.panels
            .iter()
            .filter(|p| matches!(p, Panel::Histogram { .. }))
            .count()
    }
}
