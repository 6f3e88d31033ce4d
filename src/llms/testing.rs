//! Scripted model stand-in for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::llms::base_llm::BaseLLM;

/// A canned reply, or a failure message.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Text(String),
    Fail(String),
}

/// Replies according to the language named in the system prompt.
///
/// The translation prompts always name their target language, so tests key
/// replies by language. Unscripted prompts get `fallback`.
#[derive(Debug)]
pub(crate) struct ScriptedLLM {
    replies: HashMap<String, Reply>,
    fallback: Reply,
    calls: Mutex<Vec<(String, String, f64)>>,
}

impl ScriptedLLM {
    pub(crate) fn new(fallback: Reply) -> Self {
        Self {
            replies: HashMap::new(),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Model answers `{"<lang>": "<lang>:<user text>"}` for every language.
    pub(crate) fn echo_json() -> Self {
        Self::new(Reply::Text(String::new()))
    }

    pub(crate) fn with_reply(mut self, language: &str, reply: Reply) -> Self {
        self.replies.insert(language.to_string(), reply);
        self
    }

    /// Every `(system_prompt, user_text, temperature)` seen so far.
    pub(crate) fn calls(&self) -> Vec<(String, String, f64)> {
        self.calls.lock().unwrap().clone()
    }

    fn target_language(system_prompt: &str) -> Option<String> {
        let marker = "English text to ";
        let start = system_prompt.find(marker)? + marker.len();
        let rest = &system_prompt[start..];
        let end = rest.find('.')?;
        Some(rest[..end].to_string())
    }
}

#[async_trait]
impl BaseLLM for ScriptedLLM {
    fn model(&self) -> &str {
        "scripted"
    }

    fn provider(&self) -> &str {
        "test"
    }

    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
        temperature: f64,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((
            system_prompt.to_string(),
            user_text.to_string(),
            temperature,
        ));

        let language = Self::target_language(system_prompt);
        let reply = language
            .as_ref()
            .and_then(|l| self.replies.get(l))
            .unwrap_or(&self.fallback);

        match reply {
            Reply::Fail(msg) => Err(LlmError::InvalidBody(msg.clone())),
            Reply::Text(text) if text.is_empty() => {
                let language = language.unwrap_or_default();
                Ok(serde_json::json!({ language.clone(): format!("{}:{}", language, user_text) })
                    .to_string())
            }
            Reply::Text(text) => Ok(text.clone()),
        }
    }
}
