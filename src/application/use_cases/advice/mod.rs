mod llm_output;

pub use llm_output::parse_llm_json;

use crate::application::use_cases::advice_prompts::{
    build_advice_prompt, build_daily_advice_prompt, build_daily_programs_prompt,
    build_structured_advice_prompt, WOMENS_HEALTH_RESEARCH,
};
use crate::domain::advice::{DailyPrograms, LlmJson, StructuredAdvice};
use crate::domain::dictionary::DataDictionary;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::profile::UserProfile;
use crate::domain::statistics::DatasetStatistics;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::storage::ArtifactStore;
use crate::shared::token_counter::{TokenCounter, CONTEXT_WINDOW};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Turns analysis results into model-written advice and persists each reply.
///
/// Without a client every entry point fails with
/// [`AppError::ClientUnavailable`] before anything else is checked.
pub struct AdviceUseCase {
    llm_client: Option<Arc<dyn LLMClient + Send + Sync>>,
    config: LLMConfig,
    daily_max_tokens: u32,
    dictionary: DataDictionary,
    knowledge: String,
    store: ArtifactStore,
}

impl AdviceUseCase {
    pub fn new(
        llm_client: Option<Arc<dyn LLMClient + Send + Sync>>,
        config: LLMConfig,
        daily_max_tokens: u32,
        dictionary: DataDictionary,
        store: ArtifactStore,
    ) -> Self {
        Self {
            llm_client,
            config,
            daily_max_tokens,
            dictionary,
            knowledge: WOMENS_HEALTH_RESEARCH.to_string(),
            store,
        }
    }

    pub fn with_knowledge(mut self, knowledge: impl Into<String>) -> Self {
        self.knowledge = knowledge.into();
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    fn client(&self) -> Result<&Arc<dyn LLMClient + Send + Sync>> {
        self.llm_client.as_ref().ok_or(AppError::ClientUnavailable)
    }

    async fn ask(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let client = self.client()?;
        let max_tokens = config.max_tokens.unwrap_or_default() as usize;
        if !TokenCounter::fits_in_context(prompt, max_tokens, CONTEXT_WINDOW) {
            warn!(
                estimated_tokens = TokenCounter::estimate_tokens(prompt),
                max_tokens,
                "Prompt may exceed the model context window"
            );
        }
        info!(
            model = %config.model,
            estimated_tokens = TokenCounter::estimate_tokens(prompt),
            "Requesting advice"
        );
        client.generate(config, "", prompt).await
    }

    /// Free-text advice. The reply is saved raw and as a dated markdown file.
    pub async fn generate_advice(
        &self,
        profile: &UserProfile,
        stats: &[DatasetStatistics],
    ) -> Result<String> {
        self.client()?;
        let prompt = build_advice_prompt(profile, &self.dictionary, stats, &self.knowledge)?;

        let advice = self.ask(&self.config, &prompt).await?;
        persist(self.store.save_raw_response(&advice));
        persist(self.store.save_advice_markdown(profile, &advice));
        Ok(advice)
    }

    /// Advice as JSON sections. Any valid JSON reply is `Parsed` and written
    /// as structured JSON exactly as the model produced it; use
    /// [`StructuredAdvice::from_value`] for a typed view. A reply that does
    /// not parse comes back as [`LlmJson::RawText`].
    pub async fn generate_structured_advice(
        &self,
        profile: &UserProfile,
        stats: &[DatasetStatistics],
    ) -> Result<LlmJson<Value>> {
        self.client()?;
        let prompt =
            build_structured_advice_prompt(profile, &self.dictionary, stats, &self.knowledge)?;

        let reply = self.ask(&self.config, &prompt).await?;
        persist(self.store.save_raw_response(&reply));

        let advice = parse_llm_json::<Value>(&reply);
        match &advice {
            LlmJson::Parsed(structured) => {
                match StructuredAdvice::from_value(structured) {
                    Some(view) => info!(
                        recommendations = view.recommendation_count(),
                        "Parsed structured advice"
                    ),
                    None => warn!("Structured advice does not follow the requested layout"),
                }
                persist(self.store.save_structured(structured));
            }
            LlmJson::RawText { reason, .. } => {
                warn!(reason = %reason, "Structured advice kept as raw text")
            }
        }
        Ok(advice)
    }

    /// Three program cards derived from earlier advice.
    pub async fn generate_daily_programs(
        &self,
        profile: &UserProfile,
        prior_advice: &str,
    ) -> Result<LlmJson<Value>> {
        self.client()?;
        let prior_advice = require_prior(prior_advice)?;
        let prompt = build_daily_programs_prompt(profile, prior_advice);

        let config = self.config.with_max_tokens(self.daily_max_tokens);
        let reply = self.ask(&config, &prompt).await?;

        let programs = parse_llm_json::<Value>(&reply);
        match &programs {
            LlmJson::Parsed(parsed) => {
                match DailyPrograms::from_value(parsed) {
                    Some(view) => info!(cards = view.cards.len(), "Parsed daily programs"),
                    None => warn!("Daily programs do not follow the requested layout"),
                }
                persist(self.store.save_daily_structured(parsed));
            }
            LlmJson::RawText { reason, .. } => {
                warn!(reason = %reason, "Daily programs kept as raw text")
            }
        }
        Ok(programs)
    }

    /// Markdown variant of the daily programs, saved as a dated file.
    pub async fn generate_daily_advice(
        &self,
        profile: &UserProfile,
        prior_advice: &str,
    ) -> Result<String> {
        self.client()?;
        let prior_advice = require_prior(prior_advice)?;
        let prompt = build_daily_advice_prompt(profile, prior_advice);

        let advice = self.ask(&self.config, &prompt).await?;
        persist(self.store.save_daily_markdown(profile, &advice));
        Ok(advice)
    }
}

/// A failed write never discards the advice already in hand
fn persist<T>(result: Result<T>) {
    if let Err(err) = result {
        warn!(error = %err, "Could not save advice artifact");
    }
}

fn require_prior(prior_advice: &str) -> Result<&str> {
    let trimmed = prior_advice.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            "Prior advice is empty; generate advice first".to_string(),
        ));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{
        DAILY_STRUCTURED_RESPONSE_FILE, RAW_RESPONSE_FILE, STRUCTURED_RESPONSE_FILE,
    };
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: String,
        calls: AtomicUsize,
        last_max_tokens: Mutex<Option<u32>>,
        last_prompt: Mutex<String>,
    }

    impl ScriptedClient {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_max_tokens: Mutex::new(None),
                last_prompt: Mutex::new(String::new()),
            })
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(&self, config: &LLMConfig, _system: &str, user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_max_tokens.lock().unwrap() = config.max_tokens;
            *self.last_prompt.lock().unwrap() = user.to_string();
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl LLMClient for FailingClient {
        async fn generate(&self, _: &LLMConfig, _: &str, _: &str) -> Result<String> {
            Err(AppError::LLMError("API error (500): boom".to_string()))
        }
    }

    fn stats() -> Vec<DatasetStatistics> {
        vec![DatasetStatistics {
            dataset_name: "daily_sleep".to_string(),
            shape: (3, 2),
            columns: vec!["day".to_string(), "score".to_string()],
            missing_values: BTreeMap::new(),
            data_types: BTreeMap::new(),
            numeric_summary: Vec::new(),
            correlations: None,
        }]
    }

    fn use_case(
        client: Option<Arc<dyn LLMClient + Send + Sync>>,
        dir: &std::path::Path,
    ) -> AdviceUseCase {
        AdviceUseCase::new(
            client,
            LLMConfig::default(),
            3000,
            DataDictionary::default(),
            ArtifactStore::new(dir),
        )
        .with_knowledge("KNOWLEDGE")
    }

    #[tokio::test]
    async fn test_no_client_reports_unavailable_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        let advice = use_case(None, dir.path());
        let profile = UserProfile::new("Emma");

        let err = advice.generate_advice(&profile, &[]).await.unwrap_err();
        assert!(matches!(err, AppError::ClientUnavailable));
        assert_eq!(
            err.to_string(),
            "Claude API client not available. Please set ANTHROPIC_API_KEY environment variable."
        );
        assert!(matches!(
            advice.generate_structured_advice(&profile, &stats()).await,
            Err(AppError::ClientUnavailable)
        ));
        assert!(matches!(
            advice.generate_daily_programs(&profile, "").await,
            Err(AppError::ClientUnavailable)
        ));
        assert!(matches!(
            advice.generate_daily_advice(&profile, "prior").await,
            Err(AppError::ClientUnavailable)
        ));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_no_analysis_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new("unused");
        let advice = use_case(Some(client.clone()), dir.path());

        let err = advice
            .generate_advice(&UserProfile::new("Emma"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NoAnalysis));
        assert_eq!(
            err.to_string(),
            "No analysis data available. Please run the dataset analysis first."
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_free_text_advice_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new("Emma's Personalized Health Advice:\nSleep more.");
        let advice = use_case(Some(client.clone()), dir.path());

        let text = advice
            .generate_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap();
        assert_eq!(text, "Emma's Personalized Health Advice:\nSleep more.");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert!(client.last_prompt.lock().unwrap().contains("KNOWLEDGE"));

        assert_eq!(advice.store().load_raw_response().unwrap(), text);
        let markdown = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("health_advice_Emma_"));
        assert!(markdown);
    }

    #[tokio::test]
    async fn test_structured_advice_parsed_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let reply = "```json\n{\"title\": \"Emma's Personalized Health Advice\", \"sections\": {\"behavioral\": {\"title\": \"Behavioral Recommendations\", \"icon\": \"🧠\", \"recommendations\": [{\"title\": \"Wind down\"}]}}}\n```";
        let advice = use_case(Some(ScriptedClient::new(reply)), dir.path());

        let result = advice
            .generate_structured_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap();
        let parsed = StructuredAdvice::from_value(result.parsed().unwrap()).unwrap();
        assert_eq!(parsed.recommendation_count(), 1);

        assert!(dir.path().join(RAW_RESPONSE_FILE).exists());
        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(STRUCTURED_RESPONSE_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["title"], "Emma's Personalized Health Advice");
    }

    #[tokio::test]
    async fn test_structured_advice_keeps_any_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let reply = r#"{"title": "Emma", "summary": "Recovery first",
            "sections": {
                "behavioral": {"recommendations": [{"description": "Sleep earlier", "priority": "high"}]},
                "sleep": {"title": "Sleep"}
            }}"#;
        let advice = use_case(Some(ScriptedClient::new(reply)), dir.path());

        let result = advice
            .generate_structured_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap();
        assert!(result.is_parsed());

        let saved: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(STRUCTURED_RESPONSE_FILE)).unwrap(),
        )
        .unwrap();
        let expected: Value = serde_json::from_str(reply).unwrap();
        assert_eq!(saved, expected);
        assert_eq!(saved["summary"], "Recovery first");
        assert_eq!(
            saved["sections"]["behavioral"]["recommendations"][0]["priority"],
            "high"
        );
        assert_eq!(saved["sections"]["sleep"]["title"], "Sleep");
    }

    #[tokio::test]
    async fn test_daily_programs_keep_cards_without_titles() {
        let dir = tempfile::tempdir().unwrap();
        let reply = r#"{"cards": [{"items": ["Walk 20 minutes"]}]}"#;
        let advice = use_case(Some(ScriptedClient::new(reply)), dir.path());

        let programs = advice
            .generate_daily_programs(&UserProfile::new("Emma"), "Earlier advice body")
            .await
            .unwrap();
        assert!(programs.is_parsed());
        let saved: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(DAILY_STRUCTURED_RESPONSE_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["cards"][0]["items"][0], "Walk 20 minutes");
    }

    #[tokio::test]
    async fn test_reply_is_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let reply = "  not json at all\n\n\n\nsecond para <internal>note</internal>\n";

        let free_text = use_case(Some(ScriptedClient::new(reply)), dir.path());
        let text = free_text
            .generate_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap();
        assert_eq!(text, reply);
        assert_eq!(free_text.store().load_raw_response().unwrap(), reply);

        let result = free_text
            .generate_structured_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap();
        match result {
            LlmJson::RawText { raw, .. } => assert_eq!(raw, reply),
            LlmJson::Parsed(_) => panic!("expected raw text"),
        }
        assert_eq!(free_text.store().load_raw_response().unwrap(), reply);
    }

    #[tokio::test]
    async fn test_structured_advice_raw_text_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let advice = use_case(Some(ScriptedClient::new("Sorry, no JSON today.")), dir.path());

        let result = advice
            .generate_structured_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap();
        match result {
            LlmJson::RawText { raw, .. } => assert_eq!(raw, "Sorry, no JSON today."),
            LlmJson::Parsed(_) => panic!("expected raw text"),
        }
        assert!(dir.path().join(RAW_RESPONSE_FILE).exists());
        assert!(!dir.path().join(STRUCTURED_RESPONSE_FILE).exists());
    }

    #[tokio::test]
    async fn test_daily_programs_use_prior_and_smaller_budget() {
        let dir = tempfile::tempdir().unwrap();
        let reply = r#"{"title": "Emma's Daily Health Programs", "cards": [
            {"title": "Movement", "items": ["Burpees 60 seconds"]},
            {"title": "Mindfulness", "items": ["Box breathing"]},
            {"title": "Nutrition", "items": ["BREAKFAST: Oats"]}
        ]}"#;
        let client = ScriptedClient::new(reply);
        let advice = use_case(Some(client.clone()), dir.path());

        let programs = advice
            .generate_daily_programs(&UserProfile::new("Emma"), "Earlier advice body")
            .await
            .unwrap();
        let view = DailyPrograms::from_value(programs.parsed().unwrap()).unwrap();
        assert_eq!(view.cards.len(), 3);
        assert_eq!(*client.last_max_tokens.lock().unwrap(), Some(3000));
        assert!(client
            .last_prompt
            .lock()
            .unwrap()
            .contains("Earlier advice body"));
        assert!(dir.path().join(DAILY_STRUCTURED_RESPONSE_FILE).exists());
        assert!(!dir.path().join(RAW_RESPONSE_FILE).exists());
    }

    #[tokio::test]
    async fn test_daily_requires_prior_advice() {
        let dir = tempfile::tempdir().unwrap();
        let client = ScriptedClient::new("{}");
        let advice = use_case(Some(client.clone()), dir.path());

        let err = advice
            .generate_daily_advice(&UserProfile::new("Emma"), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_llm_failure_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let advice = use_case(Some(Arc::new(FailingClient)), dir.path());

        let err = advice
            .generate_advice(&UserProfile::new("Emma"), &stats())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Error generating advice: API error (500): boom");
        assert!(!dir.path().join(RAW_RESPONSE_FILE).exists());
    }
}
