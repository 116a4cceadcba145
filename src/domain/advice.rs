use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of recovering JSON from an LLM reply.
///
/// `RawText` keeps the reply verbatim; it is the only artifact left for
/// manual recovery when the model ignored the output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LlmJson<T> {
    Parsed(T),
    RawText { raw: String, reason: String },
}

impl<T> LlmJson<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, LlmJson::Parsed(_))
    }

    pub fn parsed(&self) -> Option<&T> {
        match self {
            LlmJson::Parsed(value) => Some(value),
            LlmJson::RawText { .. } => None,
        }
    }

    pub fn into_parsed(self) -> Option<T> {
        match self {
            LlmJson::Parsed(value) => Some(value),
            LlmJson::RawText { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub actionable_steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceSection {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceSections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavioral: Option<AdviceSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<AdviceSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<AdviceSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplementation: Option<AdviceSection>,
}

impl AdviceSections {
    /// `(key, section)` for every section present, in the fixed order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AdviceSection)> {
        [
            ("behavioral", self.behavioral.as_ref()),
            ("exercise", self.exercise.as_ref()),
            ("nutrition", self.nutrition.as_ref()),
            ("supplementation", self.supplementation.as_ref()),
        ]
        .into_iter()
        .filter_map(|(key, section)| section.map(|s| (key, s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdviceProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<serde_json::Value>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

/// Parsed shape of a structured advice reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAdvice {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<AdviceProfile>,
    #[serde(default)]
    pub sections: AdviceSections,
}

impl StructuredAdvice {
    /// Typed view of a parsed reply; `None` when the reply has another shape
    pub fn from_value(value: &Value) -> Option<Self> {
        typed_view(value)
    }

    pub fn recommendation_count(&self) -> usize {
        self.sections
            .iter()
            .map(|(_, section)| section.recommendations.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One flippable card: actionable items on the front, backing on the back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sources: Vec<ProgramSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPrograms {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cards: Vec<ProgramCard>,
}

impl DailyPrograms {
    pub fn from_value(value: &Value) -> Option<Self> {
        typed_view(value)
    }

    pub fn card(&self, title: &str) -> Option<&ProgramCard> {
        self.cards
            .iter()
            .find(|card| card.title.eq_ignore_ascii_case(title))
    }
}

fn typed_view<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}
