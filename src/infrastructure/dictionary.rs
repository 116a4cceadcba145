use crate::domain::dictionary::DataDictionary;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Column descriptions for the Oura export, compiled into the binary
pub const BUNDLED_DICTIONARY: &str = include_str!("../../assets/oura_data_dictionary.json");

/// Load the column dictionary from `path`, or the bundled one when no path is
/// configured. A configured file that is missing or malformed is not fatal:
/// the bundled dictionary is used instead.
pub fn load_dictionary(path: Option<&Path>) -> DataDictionary {
    let Some(path) = path else {
        return bundled_dictionary();
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Data dictionary not available, using bundled one"
            );
            return bundled_dictionary();
        }
    };

    match DataDictionary::from_json_str(&content) {
        Ok(dictionary) => {
            info!(
                path = %path.display(),
                datasets = dictionary.len(),
                "Loaded data dictionary"
            );
            dictionary
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Data dictionary is not valid JSON, using bundled one"
            );
            bundled_dictionary()
        }
    }
}

pub fn bundled_dictionary() -> DataDictionary {
    match DataDictionary::from_json_str(BUNDLED_DICTIONARY) {
        Ok(dictionary) => dictionary,
        Err(e) => {
            warn!(error = %e, "Bundled data dictionary is not valid JSON");
            DataDictionary::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_bundled_dictionary() {
        let dictionary = load_dictionary(None);
        assert_eq!(dictionary.len(), 14);
        assert!(dictionary.describe("daily_sleep", "score").is_some());
    }

    #[test]
    fn test_missing_file_falls_back_to_bundled() {
        let dictionary = load_dictionary(Some(Path::new("/nonexistent/dictionary.json")));
        assert_eq!(dictionary, bundled_dictionary());
    }

    #[test]
    fn test_malformed_file_falls_back_to_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_dictionary(Some(&path)).len(), 14);
    }

    #[test]
    fn test_configured_file_overrides_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        fs::write(&path, r#"{"tags": {"tag": "Free-text tag"}}"#).unwrap();

        let dictionary = load_dictionary(Some(&path));
        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.describe("tags", "tag"), Some("Free-text tag"));
    }
}
