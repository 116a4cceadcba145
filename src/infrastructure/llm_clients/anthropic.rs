use super::LLMClient;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DEFAULT_MAX_TOKENS};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::ClientUnavailable)
    }

    fn messages_url(base_url: &str) -> String {
        if base_url.ends_with('/') {
            format!("{}v1/messages", base_url)
        } else {
            format!("{}/v1/messages", base_url)
        }
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for AnthropicClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = Self::messages_url(&config.base_url);

        let mut body = json!({
            "model": config.model,
            "max_tokens": config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [
                {
                    "role": "user",
                    "content": user
                }
            ],
        });
        if !system.trim().is_empty() {
            body["system"] = json!(system);
        }
        if let Some(temperature) = config.temperature {
            body["temperature"] = json!(temperature);
        }

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        json["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|block| block["type"].as_str().unwrap_or("text") == "text")
            })
            .and_then(|block| block["text"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::LLMError("Invalid response format".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LLMConfig {
        LLMConfig {
            base_url: server.uri(),
            api_key: Some("test-key".to_string()),
            ..LLMConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generate_sends_messages_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-5-sonnet-20241022",
                "max_tokens": 4000,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "Emma's Personalized Health Advice:"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = AnthropicClient::new()
            .generate(&config_for(&server), "", "hello")
            .await
            .unwrap();
        assert_eq!(reply, "Emma's Personalized Health Advice:");
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = AnthropicClient::new()
            .generate(&config_for(&server), "", "hello")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Error generating advice:"));
        assert!(message.contains("overloaded"));
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = LLMConfig {
            base_url: server.uri(),
            ..LLMConfig::default()
        };
        let err = AnthropicClient::new()
            .generate(&config, "", "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ClientUnavailable));
    }

    #[test]
    fn test_messages_url_handles_trailing_slash() {
        assert_eq!(
            AnthropicClient::messages_url("http://localhost:1234/"),
            "http://localhost:1234/v1/messages"
        );
        assert_eq!(
            AnthropicClient::messages_url("https://api.anthropic.com"),
            "https://api.anthropic.com/v1/messages"
        );
    }
}
