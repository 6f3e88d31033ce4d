//! Azure OpenAI chat-completions provider.
//!
//! Posts the system/user conversation to a deployment's
//! `chat/completions` endpoint and returns the first choice's text.
//!
//! No retries are attempted: a failed call surfaces immediately as an
//! [`LlmError`] and the caller decides what to do with it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::AzureConfig;
use crate::error::LlmError;
use crate::llms::base_llm::{instruction_messages, BaseLLM, ChatMessage};

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// Azure OpenAI chat-completions client.
#[derive(Clone)]
pub struct AzureCompletion {
    /// Deployment name (Azure routes by deployment, not model).
    pub deployment: String,
    /// Resource endpoint, e.g. `https://myresource.openai.azure.com`.
    pub endpoint: String,
    /// Azure API version query parameter.
    pub api_version: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for AzureCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCompletion")
            .field("deployment", &self.deployment)
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .finish_non_exhaustive()
    }
}

impl AzureCompletion {
    /// Create a client for `deployment` at `endpoint`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        deployment: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        api_version: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            deployment: deployment.into(),
            endpoint: endpoint.into(),
            api_version: api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            api_key,
            client,
        })
    }

    /// Create a client from loaded environment configuration.
    pub fn from_config(config: &AzureConfig) -> Result<Self, LlmError> {
        Self::new(
            config.deployment.clone(),
            config.endpoint.clone(),
            Some(config.api_key.clone()),
            Some(config.api_version.clone()),
            config.timeout,
        )
    }

    /// Full URL for chat completions on this deployment.
    pub fn api_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    fn build_request_body(messages: &[ChatMessage], temperature: f64) -> Value {
        serde_json::json!({
            "messages": messages,
            "temperature": temperature,
        })
    }

    /// Pull the assistant text out of a chat-completions response.
    fn parse_response(response: &Value) -> Result<String, LlmError> {
        if let Some(error) = response.get("error") {
            let msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown Azure API error");
            return Err(LlmError::InvalidBody(format!("Azure API error: {}", msg)));
        }

        let message = response
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| LlmError::InvalidBody("No choices in Azure response".to_string()))?;

        message
            .get("content")
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| LlmError::InvalidBody("No text content in Azure response".to_string()))
    }

    fn extract_token_usage(response: &Value) -> HashMap<&'static str, i64> {
        let mut usage = HashMap::new();
        if let Some(usage_obj) = response.get("usage") {
            for key in ["prompt_tokens", "completion_tokens", "total_tokens"] {
                if let Some(n) = usage_obj.get(key).and_then(|v| v.as_i64()) {
                    usage.insert(key, n);
                }
            }
        }
        usage
    }
}

#[async_trait]
impl BaseLLM for AzureCompletion {
    fn model(&self) -> &str {
        &self.deployment
    }

    fn provider(&self) -> &str {
        "azure"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::NotConfigured(
                "Azure API key not set. Set AZURE_OPENAI_API_KEY.".to_string(),
            )
        })?;

        let messages = instruction_messages(system_prompt, user_text);
        let body = Self::build_request_body(&messages, temperature);

        log::debug!(
            "AzureCompletion.generate: deployment={}, endpoint={}, user_chars={}",
            self.deployment,
            self.endpoint,
            user_text.len(),
        );

        let response = self
            .client
            .post(self.api_url())
            .header("api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::InvalidBody(format!(
                "Failed to parse Azure response: {} - Body: {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })?;

        let usage = Self::extract_token_usage(&response_json);
        if !usage.is_empty() {
            log::debug!("Azure usage: {:?}", usage);
        }

        Self::parse_response(&response_json)
    }
}
