use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::gateway::{
    LlmGateway, LlmGatewayError, LlmGatewayFuture, LlmGatewayRequest, LlmGatewayResponse,
    LlmTokenUsage,
};
use crate::config::ConfigError;
use crate::config_env::{
    optional_trimmed_env, parse_f32_env, parse_u32_env, parse_u64_env, require_non_empty_env,
};

const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
const DEFAULT_MAX_TOKENS: u32 = 1_000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

pub const API_KEY_ENV_VARS: [&str; 2] = ["GROQ_API_KEY", "VITE_GROQ_API_KEY"];

#[derive(Debug, Clone)]
pub struct GroqGatewayConfig {
    pub chat_completions_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl GroqGatewayConfig {
    pub fn from_env() -> Result<Self, GroqConfigError> {
        let api_key = require_non_empty_env(&API_KEY_ENV_VARS)?;
        let chat_completions_url = optional_trimmed_env("GROQ_CHAT_COMPLETIONS_URL")
            .unwrap_or_else(|| DEFAULT_CHAT_COMPLETIONS_URL.to_string());
        if !chat_completions_url.starts_with("http://")
            && !chat_completions_url.starts_with("https://")
        {
            return Err(GroqConfigError::InvalidConfiguration(
                "GROQ_CHAT_COMPLETIONS_URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(Self {
            chat_completions_url,
            api_key,
            model: optional_trimmed_env("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_u32_env("GROQ_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            temperature: parse_f32_env("GROQ_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            timeout_ms: parse_u64_env("GROQ_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?,
        })
    }
}

#[derive(Debug, Error)]
pub enum GroqConfigError {
    #[error(transparent)]
    Env(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build Groq http client: {0}")]
    HttpClient(String),
}

impl GroqConfigError {
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::Env(ConfigError::MissingVar(_)))
    }
}

/// Chat-completion client; one attempt per request, no retries.
#[derive(Clone)]
pub struct GroqGateway {
    client: reqwest::Client,
    config: GroqGatewayConfig,
}

impl GroqGateway {
    pub fn new(config: GroqGatewayConfig) -> Result<Self, GroqConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| GroqConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_once(
        &self,
        request: &LlmGatewayRequest,
    ) -> Result<LlmGatewayResponse, LlmGatewayError> {
        let request_body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": request.user_prompt }
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature
        });

        let response = self
            .client
            .post(&self.config.chat_completions_url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmGatewayError::Timeout
                } else {
                    LlmGatewayError::ProviderFailure("request_unavailable".to_string())
                }
            })?;

        let status = response.status();
        let header_request_id = header_request_id(response.headers());
        let body = response.text().await.map_err(|err| {
            if err.is_timeout() {
                LlmGatewayError::Timeout
            } else {
                LlmGatewayError::InvalidProviderPayload("response_body_read_failed".to_string())
            }
        })?;

        if !status.is_success() {
            let provider_code = parse_provider_error_code(&body);
            return Err(LlmGatewayError::ProviderFailure(format!(
                "status={} code={provider_code}",
                status.as_u16()
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|_| {
            LlmGatewayError::InvalidProviderPayload("response_json_parse_failed".to_string())
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmGatewayError::InvalidProviderPayload("missing_choice".to_string()))?
            .message
            .content;

        let content = match content {
            Value::String(raw) => raw,
            value @ Value::Object(_) => value.to_string(),
            _ => {
                return Err(LlmGatewayError::InvalidProviderPayload(
                    "unsupported_content_shape".to_string(),
                ));
            }
        };

        Ok(LlmGatewayResponse {
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            provider_request_id: header_request_id.or(parsed.id),
            content,
            usage: parsed.usage.map(|usage| LlmTokenUsage {
                prompt_tokens: clamp_u64_to_u32(usage.prompt_tokens.unwrap_or(0)),
                completion_tokens: clamp_u64_to_u32(usage.completion_tokens.unwrap_or(0)),
                total_tokens: clamp_u64_to_u32(usage.total_tokens.unwrap_or(0)),
            }),
        })
    }
}

impl LlmGateway for GroqGateway {
    fn generate<'a>(&'a self, request: LlmGatewayRequest) -> LlmGatewayFuture<'a> {
        Box::pin(async move { self.send_once(&request).await })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    id: Option<String>,
    model: Option<String>,
    choices: Vec<ChatCompletionChoice>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

fn header_request_id(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn parse_provider_error_code(body: &str) -> String {
    #[derive(Deserialize)]
    struct ProviderErrorEnvelope {
        error: Option<ProviderErrorDetails>,
    }

    #[derive(Deserialize)]
    struct ProviderErrorDetails {
        code: Option<Value>,
    }

    let parsed = serde_json::from_str::<ProviderErrorEnvelope>(body).ok();
    let Some(provider_error_code) = parsed
        .and_then(|envelope| envelope.error)
        .and_then(|details| details.code)
    else {
        return "unknown".to_string();
    };

    match provider_error_code {
        Value::String(code) => code,
        Value::Number(code) => code.to_string(),
        _ => "unknown".to_string(),
    }
}

fn clamp_u64_to_u32(value: u64) -> u32 {
    value.min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::{clamp_u64_to_u32, parse_provider_error_code};

    #[test]
    fn parse_provider_error_code_reads_string_and_numeric_codes() {
        assert_eq!(
            parse_provider_error_code(r#"{"error":{"code":"invalid_api_key"}}"#),
            "invalid_api_key"
        );
        assert_eq!(parse_provider_error_code(r#"{"error":{"code":429}}"#), "429");
    }

    #[test]
    fn parse_provider_error_code_defaults_to_unknown() {
        assert_eq!(parse_provider_error_code("<html>bad gateway</html>"), "unknown");
        assert_eq!(parse_provider_error_code(r#"{"error":{}}"#), "unknown");
    }

    #[test]
    fn clamp_u64_to_u32_saturates() {
        assert_eq!(clamp_u64_to_u32(42), 42);
        assert_eq!(clamp_u64_to_u32(u64::MAX), u32::MAX);
    }
}
