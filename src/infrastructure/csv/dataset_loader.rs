// ============================================================
// DATASET LOADER
// ============================================================
// Load the fixed set of wearable export files from a directory

use super::CsvParser;
use crate::domain::csv::Dataset;
use std::path::Path;
use tracing::{info, warn};

/// Expected export file name -> logical dataset name
pub const OURA_EXPORT_FILES: [(&str, &str); 14] = [
    ("dailyactivity_2023-01-07_2025-06-18.csv", "daily_activity"),
    ("dailycardiovascularage_2023-01-07_2025-06-18.csv", "cardiovascular_age"),
    ("dailyreadiness_2023-01-07_2025-06-18.csv", "daily_readiness"),
    ("dailyresilience_2023-01-07_2025-06-18.csv", "daily_resilience"),
    ("dailysleep_2023-01-07_2025-06-18.csv", "daily_sleep"),
    ("dailyspo2_2023-01-07_2025-06-18.csv", "daily_spo2"),
    ("dailystress_2023-01-07_2025-06-18.csv", "daily_stress"),
    ("heartrate_2023-01-07_2025-06-18.csv", "heart_rate"),
    ("ringconfiguration_2023-01-07_2025-06-18.csv", "ring_config"),
    ("session_2023-01-07_2025-06-18.csv", "sessions"),
    ("sleep_2023-01-07_2025-06-18.csv", "sleep_detailed"),
    ("tag_2023-01-07_2025-06-18.csv", "tags"),
    ("vo2max_2023-01-07_2025-06-18.csv", "vo2_max"),
    ("workout_2023-01-07_2025-06-18.csv", "workouts"),
];

/// What happened to one expected file
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { rows: usize, columns: usize },
    Missing,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadEntry {
    pub file_name: String,
    pub dataset_name: String,
    pub outcome: LoadOutcome,
}

/// Per-file result of one load pass; partial success is normal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub entries: Vec<LoadEntry>,
}

impl LoadReport {
    pub fn loaded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, LoadOutcome::Loaded { .. }))
            .count()
    }

    pub fn missing(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.outcome == LoadOutcome::Missing)
            .map(|e| e.file_name.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.outcome {
                LoadOutcome::Failed { reason } => Some((e.file_name.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }
}

pub struct DatasetLoader {
    mapping: Vec<(String, String)>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::with_mapping(
            OURA_EXPORT_FILES
                .iter()
                .map(|(file, name)| (file.to_string(), name.to_string())),
        )
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for a custom `(file name, dataset name)` mapping
    pub fn with_mapping<I>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            mapping: mapping.into_iter().collect(),
        }
    }

    pub fn mapping(&self) -> &[(String, String)] {
        &self.mapping
    }

    /// Load every mapped file that exists and parses; never aborts the batch.
    /// Datasets come back in mapping order.
    pub fn load_dir(&self, dir: &Path) -> (Vec<Dataset>, LoadReport) {
        info!(dir = %dir.display(), "Loading health data files");

        let mut datasets = Vec::new();
        let mut report = LoadReport::default();

        for (file_name, dataset_name) in &self.mapping {
            let path = dir.join(file_name);
            let outcome = if !path.is_file() {
                warn!(file = %file_name, "File not found");
                LoadOutcome::Missing
            } else {
                match CsvParser::parse_file_auto_detect(dataset_name, &path) {
                    Ok(dataset) => {
                        let (rows, columns) = dataset.shape();
                        info!(dataset = %dataset_name, rows, columns, "Loaded dataset");
                        datasets.push(dataset);
                        LoadOutcome::Loaded { rows, columns }
                    }
                    Err(err) => {
                        warn!(file = %file_name, error = %err, "Error loading file");
                        LoadOutcome::Failed {
                            reason: err.to_string(),
                        }
                    }
                }
            };

            report.entries.push(LoadEntry {
                file_name: file_name.clone(),
                dataset_name: dataset_name.clone(),
                outcome,
            });
        }

        info!(loaded = datasets.len(), "Finished loading datasets");
        (datasets, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_mapping_covers_all_exports() {
        let loader = DatasetLoader::new();
        assert_eq!(loader.mapping().len(), 14);
        assert!(loader
            .mapping()
            .iter()
            .any(|(_, name)| name == "sleep_detailed"));
    }

    #[test]
    fn test_loads_present_files_and_skips_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("dailysleep_2023-01-07_2025-06-18.csv"),
            "day,score\n2024-01-01,80\n2024-01-02,82\n2024-01-03,79\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("vo2max_2023-01-07_2025-06-18.csv"),
            "day;vo2_max\n2024-01-01;41.2\n",
        )
        .unwrap();

        let (datasets, report) = DatasetLoader::new().load_dir(dir.path());

        let names: Vec<_> = datasets.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["daily_sleep", "vo2_max"]);
        assert_eq!(datasets[0].shape(), (3, 2));
        assert_eq!(datasets[1].shape(), (1, 2));
        assert_eq!(report.loaded_count(), 2);
        assert_eq!(report.missing().len(), 12);
        assert!(report.failed().is_empty());
    }

    #[test]
    fn test_unparseable_file_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.csv"), "").unwrap();
        fs::write(dir.path().join("good.csv"), "a,b\n1,2\n").unwrap();

        let loader = DatasetLoader::with_mapping(vec![
            ("broken.csv".to_string(), "broken".to_string()),
            ("good.csv".to_string(), "good".to_string()),
        ]);
        let (datasets, report) = loader.load_dir(dir.path());

        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].name, "good");
        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].0, "broken.csv");
    }
}
