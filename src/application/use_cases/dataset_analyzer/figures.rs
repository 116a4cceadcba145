use super::statistics::mean;
use crate::domain::csv::Dataset;
use crate::domain::figure::{Figure, GridLayout, HistogramBin, Panel, HISTOGRAM_BINS};

/// Chart layout for one dataset: a histogram per numeric column, or an info
/// panel when there is nothing numeric to plot.
pub fn build_figure(dataset: &Dataset, numeric_indices: &[usize]) -> Figure {
    let title = dataset.display_name();

    if numeric_indices.is_empty() {
        let (rows, cols) = dataset.shape();
        return Figure {
            dataset_name: dataset.name.clone(),
            title: format!("{} Dataset Info", title),
            layout: GridLayout::for_panels(0),
            panels: vec![Panel::Info {
                text: format!(
                    "{}\n\nShape: ({}, {})\nNo numeric columns for plotting",
                    dataset.name, rows, cols
                ),
            }],
        };
    }

    let panels = numeric_indices
        .iter()
        .map(|&idx| {
            let column = dataset.headers[idx].clone();
            let values: Vec<f64> = dataset.numeric_column(idx).into_iter().flatten().collect();
            column_panel(column, &values)
        })
        .collect();

    Figure {
        dataset_name: dataset.name.clone(),
        title: format!("{} Analysis", title),
        layout: GridLayout::for_panels(numeric_indices.len()),
        panels,
    }
}

fn column_panel(column: String, values: &[f64]) -> Panel {
    if values.is_empty() {
        return Panel::NoData {
            text: format!("{}\n(No data)", column),
            column,
        };
    }

    let mean = mean(values);
    Panel::Histogram {
        title: format!("{} Distribution", column),
        bins: histogram(values, HISTOGRAM_BINS),
        mean_label: mean.map(|m| format!("Mean: {:.2}", m)),
        mean,
        column,
    }
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// A single distinct value gets the range `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &value in values {
        let idx = if value >= hi {
            bins - 1
        } else {
            (((value - lo) / width) as usize).min(bins - 1)
        };
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|v| v as f64).collect();
        let bins = histogram(&values, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[29].upper, 99.0);
    }

    #[test]
    fn test_histogram_max_lands_in_last_bin() {
        let bins = histogram(&[0.0, 10.0], 10);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[9].count, 1);
    }

    #[test]
    fn test_histogram_single_value_range_is_widened() {
        let bins = histogram(&[5.0, 5.0, 5.0], 30);
        assert_eq!(bins[0].lower, 4.5);
        assert_eq!(bins[29].upper, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(bins[15].count, 3);
    }
}
