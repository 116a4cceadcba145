use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

pub const DEFAULT_NAME: &str = "User";
pub const DEFAULT_AGE: &str = "Not specified";
pub const DEFAULT_GOALS: &str = "General health";

/// Who the advice is for. Supplied once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 130))]
    pub age: Option<u32>,
    #[validate(length(max = 1024))]
    pub goals: Option<String>,
    pub activity_level: Option<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    /// Free-form metadata carried alongside the fixed fields
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or(DEFAULT_NAME)
    }

    pub fn age_label(&self) -> String {
        self.age
            .map(|age| age.to_string())
            .unwrap_or_else(|| DEFAULT_AGE.to_string())
    }

    pub fn goals_label(&self) -> &str {
        non_blank(self.goals.as_deref()).unwrap_or(DEFAULT_GOALS)
    }

    /// Name component used in artifact file names
    pub fn file_slug(&self) -> String {
        let raw = non_blank(self.name.as_deref()).unwrap_or("user");
        let slug: String = raw
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if slug.is_empty() {
            "user".to_string()
        } else {
            slug
        }
    }

    /// `(label, value)` pairs for display, fixed fields first
    pub fn describe(&self) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Name".to_string(), self.display_name().to_string()),
            ("Age".to_string(), self.age_label()),
            ("Goals".to_string(), self.goals_label().to_string()),
        ];
        if let Some(level) = non_blank(self.activity_level.as_deref()) {
            lines.push(("Activity Level".to_string(), level.to_string()));
        }
        if !self.focus_areas.is_empty() {
            lines.push(("Focus Areas".to_string(), self.focus_areas.join(", ")));
        }
        for (key, value) in &self.extra {
            lines.push((key.clone(), value.clone()));
        }
        lines
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_when_absent() {
        let profile = UserProfile::default();
        assert_eq!(profile.display_name(), "User");
        assert_eq!(profile.age_label(), "Not specified");
        assert_eq!(profile.goals_label(), "General health");
        assert_eq!(profile.file_slug(), "user");
    }

    #[test]
    fn test_file_slug_sanitizes_name() {
        let profile = UserProfile::new("Emma Rose/2");
        assert_eq!(profile.file_slug(), "Emma_Rose_2");
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        let profile = UserProfile::new("");
        assert!(profile.validate().is_err());
        assert!(UserProfile::new("Emma").validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_unrealistic_age() {
        let profile = UserProfile {
            age: Some(0),
            ..UserProfile::new("Emma")
        };
        assert!(profile.validate().is_err());
    }
}
