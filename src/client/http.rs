//! HTTP client for the translation server.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::translation::TranslationResult;

use super::batch::TranslationSource;

/// Request body of both translate endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
}

/// Response body of both translate endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: TranslationResult,
}

/// Talks to a running translation server.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    base_url: String,
    client: reqwest::Client,
}

impl TranslationClient {
    /// Client for the server at `base_url`, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Call `POST /translate/{language}/`.
    pub async fn translate(&self, language: &str, text: &str) -> Result<Value, ClientError> {
        let url = format!("{}/translate/{}/", self.base_url, language);
        self.post_text(&url, text).await
    }

    /// Call `POST /translate/` for the fixed batch language set.
    pub async fn translate_batch(&self, text: &str) -> Result<TranslationResult, ClientError> {
        let url = format!("{}/translate/", self.base_url);
        let translated = self.post_text(&url, text).await?;
        serde_json::from_value(translated).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// The translation into `language`, accepting either reply shape.
    pub async fn fetch_translation(&self, text: &str, language: &str) -> Result<String, ClientError> {
        let translated = self.translate(language, text).await?;
        extract_translation(&translated, language).ok_or_else(|| ClientError::MissingTranslation {
            language: language.to_string(),
        })
    }

    /// POST `{"text": ...}` and return the `translated_text` field untouched.
    async fn post_text(&self, url: &str, text: &str) -> Result<Value, ClientError> {
        tracing::debug!(url = %url, "Requesting translation");
        let response = self
            .client
            .post(url)
            .json(&TranslateRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut json: Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        json.get_mut("translated_text")
            .map(Value::take)
            .ok_or_else(|| ClientError::Decode("missing translated_text".to_string()))
    }
}

/// Pull `language`'s text out of a `translated_text` value.
///
/// An object is looked up by language; a bare string is taken as-is. Empty
/// text counts as no translation.
pub fn extract_translation(translated: &Value, language: &str) -> Option<String> {
    let text = match translated {
        Value::Object(map) => map.get(language)?.as_str()?,
        Value::String(text) => text.as_str(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[async_trait]
impl TranslationSource for TranslationClient {
    async fn fetch_translation(&self, text: &str, language: &str) -> Result<String, ClientError> {
        TranslationClient::fetch_translation(self, text, language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::client::batch::{translate_all, BatchOptions};
    use crate::client::TranslationSession;
    use crate::languages::{BATCH_LANGUAGES, SUPPORTED_LANGUAGES};
    use crate::llms::testing::{Reply, ScriptedLLM};
    use crate::server::{app_router, AppState};
    use crate::translation::Translator;

    #[test]
    fn test_extract_translation_shapes() {
        let map = serde_json::json!({"French": "Bonjour"});
        assert_eq!(extract_translation(&map, "French").as_deref(), Some("Bonjour"));
        assert_eq!(extract_translation(&map, "Spanish"), None);
        assert_eq!(
            extract_translation(&serde_json::json!("Hola"), "Spanish").as_deref(),
            Some("Hola")
        );
        assert_eq!(extract_translation(&serde_json::json!(""), "Spanish"), None);
        assert_eq!(extract_translation(&Value::Null, "Spanish"), None);
        assert_eq!(extract_translation(&serde_json::json!({"French": 1}), "French"), None);
    }

    async fn spawn_server(llm: ScriptedLLM) -> TranslationClient {
        let state = AppState::new(Translator::new(Arc::new(llm)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app_router(state)).await.unwrap();
        });
        TranslationClient::new(format!("http://{}/", addr), Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_translation_against_server() {
        let client = spawn_server(ScriptedLLM::echo_json()).await;
        let text = client.fetch_translation("Hello", "Greek").await.unwrap();
        assert_eq!(text, "Greek:Hello");
    }

    #[tokio::test]
    async fn test_unsupported_language_is_status_400() {
        let client = spawn_server(ScriptedLLM::echo_json()).await;
        match client.fetch_translation("Hello", "Klingon").await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("Supported languages are"));
            }
            other => panic!("expected 400, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_endpoint_round_trip() {
        let reply: serde_json::Map<String, Value> = BATCH_LANGUAGES
            .iter()
            .map(|l| (l.to_string(), Value::String(format!("[{l}]"))))
            .collect();
        let client =
            spawn_server(ScriptedLLM::new(Reply::Text(Value::Object(reply).to_string()))).await;

        let result = client.translate_batch("Hello").await.unwrap();
        assert_eq!(result.languages().len(), 10);
        assert_eq!(result.for_language("Arabic"), Some("[Arabic]"));
    }

    #[tokio::test]
    async fn test_batch_over_http_isolates_failures() {
        let llm = ScriptedLLM::echo_json()
            .with_reply("Punjabi", Reply::Text("not json".to_string()))
            .with_reply("Thai", Reply::Fail("quota".to_string()));
        let client = spawn_server(llm).await;

        let mut session = TranslationSession::new("P1", "Hello");
        let report = translate_all(
            &client,
            &mut session,
            &SUPPORTED_LANGUAGES,
            &BatchOptions::default(),
            None,
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(session.len(), 23);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| matches!(
            f.error,
            ClientError::Status { status: 500, .. }
        )));
        assert_eq!(report.progress.fraction(), 1.0);
    }
}
