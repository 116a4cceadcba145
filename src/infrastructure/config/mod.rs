use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DAILY_PROGRAMS_MAX_TOKENS};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_PREFIX: &str = "AURIENT_";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_CONFIG_FILE: &str = "aurient.toml";

/// Runtime settings, resolved once and handed to each component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Overrides the bundled data dictionary when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<PathBuf>,
    pub llm: LLMConfig,
    pub daily_max_tokens: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            dictionary_path: None,
            llm: LLMConfig::default(),
            daily_max_tokens: DAILY_PROGRAMS_MAX_TOKENS,
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file, then `AURIENT_*` variables
    /// (`AURIENT_LLM__MODEL` reaches `llm.model`). The API key comes from
    /// `ANTHROPIC_API_KEY`, which may live in a `.env` file.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let figment = Self::figment(config_file)?;
        let config: AppConfig = figment.extract()?;

        info!(
            data_dir = %config.data_dir.display(),
            output_dir = %config.output_dir.display(),
            model = %config.llm.model,
            credential = config.llm.has_credential(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn figment(config_file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        match config_file {
            Some(path) if !path.is_file() => {
                return Err(AppError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[API_KEY_ENV])
                    .map(|_| "llm.api_key".into()),
            ))
    }
}
