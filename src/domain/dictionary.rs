use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dataset name -> column name -> human-readable description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataDictionary {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl DataDictionary {
    pub fn new(entries: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn describe(&self, dataset: &str, column: &str) -> Option<&str> {
        self.entries
            .get(dataset)
            .and_then(|columns| columns.get(column))
            .map(String::as_str)
    }

    pub fn has_dataset(&self, dataset: &str) -> bool {
        self.entries.contains_key(dataset)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Two-space indented JSON, keys sorted.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }
}
