use crate::domain::csv::Dataset;
use crate::domain::statistics::{CorrelationMatrix, DatasetStatistics, NumericSummary};
use std::collections::BTreeMap;

/// Statistics for every column of one dataset
pub fn compute_statistics(dataset: &Dataset, numeric_indices: &[usize]) -> DatasetStatistics {
    let mut missing_values = BTreeMap::new();
    let mut data_types = BTreeMap::new();
    for (idx, header) in dataset.headers.iter().enumerate() {
        missing_values.insert(header.clone(), dataset.missing_count(idx));
        data_types.insert(header.clone(), dataset.column_type(idx).to_string());
    }

    let columns: Vec<(String, Vec<Option<f64>>)> = numeric_indices
        .iter()
        .map(|&idx| (dataset.headers[idx].clone(), dataset.numeric_column(idx)))
        .collect();

    let numeric_summary = columns
        .iter()
        .map(|(name, values)| describe(name, values))
        .collect();

    let correlations = if columns.len() > 1 {
        Some(correlation_matrix(&columns))
    } else {
        None
    };

    DatasetStatistics {
        dataset_name: dataset.name.clone(),
        shape: dataset.shape(),
        columns: dataset.headers.clone(),
        missing_values,
        data_types,
        numeric_summary,
        correlations,
    }
}

/// count / mean / sample std / min / quartiles / max over the present values
pub fn describe(column: &str, values: &[Option<f64>]) -> NumericSummary {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(|a, b| a.total_cmp(b));

    let count = present.len();
    let mean = mean(&present);
    let std = match (mean, count) {
        (Some(mean), n) if n > 1 => {
            let sum_sq: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
            Some((sum_sq / (n - 1) as f64).sqrt())
        }
        _ => None,
    };

    NumericSummary {
        column: column.to_string(),
        count,
        mean,
        std,
        min: present.first().copied(),
        p25: quantile(&present, 0.25),
        p50: quantile(&present, 0.5),
        p75: quantile(&present, 0.75),
        max: present.last().copied(),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Linear interpolation between closest ranks; `sorted` must be ascending
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Pearson correlation over rows where both values are present
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some((cov / denominator).clamp(-1.0, 1.0))
}

/// Square over the numeric columns; the diagonal is exactly 1.0 wherever the
/// column has variance
fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let values = columns
        .iter()
        .enumerate()
        .map(|(i, (_, a))| {
            columns
                .iter()
                .enumerate()
                .map(|(j, (_, b))| {
                    let r = pearson(a, b);
                    if i == j {
                        r.map(|_| 1.0)
                    } else {
                        r
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 1e-9).unwrap_or(false)
    }

    #[test]
    fn test_describe_matches_sample_statistics() {
        let values = [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)];
        let summary = describe("score", &values);

        assert_eq!(summary.count, 4);
        assert!(close(summary.mean, 2.5));
        assert!(close(summary.std, 1.2909944487358056));
        assert!(close(summary.min, 1.0));
        assert!(close(summary.p25, 1.75));
        assert!(close(summary.p50, 2.5));
        assert!(close(summary.p75, 3.25));
        assert!(close(summary.max, 4.0));
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let summary = describe("x", &[Some(7.0)]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std, None);
        assert!(close(summary.p75, 7.0));
    }

    #[test]
    fn test_describe_all_missing() {
        let summary = describe("x", &[None, None]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.min, None);
    }

    #[test]
    fn test_pearson_uses_pairwise_complete_rows() {
        let a = [Some(1.0), Some(2.0), Some(3.0), None];
        let b = [Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        assert!(close(pearson(&a, &b), 1.0));

        let c = [Some(3.0), Some(2.0), Some(1.0), Some(0.0)];
        assert!(close(pearson(&a, &c), -1.0));
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
        assert_eq!(
            pearson(&[Some(5.0), Some(5.0)], &[Some(1.0), Some(2.0)]),
            None
        );
    }
}
