use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLIENT_UNAVAILABLE_MESSAGE: &str =
    "Claude API client not available. Please set ANTHROPIC_API_KEY environment variable.";

pub const NO_ANALYSIS_MESSAGE: &str =
    "No analysis data available. Please run the dataset analysis first.";

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    ValidationError(String),
    ParseError(String),
    LLMError(String),
    IoError(String),
    ConfigError(String),
    /// No credential was configured, so no LLM client exists.
    ClientUnavailable,
    /// Statistics have not been computed yet.
    NoAnalysis,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::LLMError(msg) => write!(f, "Error generating advice: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ClientUnavailable => f.write_str(CLIENT_UNAVAILABLE_MESSAGE),
            AppError::NoAnalysis => f.write_str(NO_ANALYSIS_MESSAGE),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages() {
        assert_eq!(
            AppError::ClientUnavailable.to_string(),
            CLIENT_UNAVAILABLE_MESSAGE
        );
        assert_eq!(AppError::NoAnalysis.to_string(), NO_ANALYSIS_MESSAGE);
    }

    #[test]
    fn test_llm_error_is_prefixed() {
        let err = AppError::LLMError("API error (500): boom".to_string());
        assert_eq!(
            err.to_string(),
            "Error generating advice: API error (500): boom"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::IoError(msg) if msg.contains("gone")));
    }
}
