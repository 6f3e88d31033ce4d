//! The translation service: prompt, model call, and reply pipeline.

use std::sync::Arc;

use crate::error::TranslationError;
use crate::languages::{self, BATCH_LANGUAGES};
use crate::llms::BaseLLM;

use super::prompt::{batch_prompt, single_language_prompt};
use super::response::{clean_reply, parse_reply, validate_batch, validate_single, TranslationResult};

/// Sampling temperature for every translation call.
pub const TRANSLATION_TEMPERATURE: f64 = 0.0;

/// Translates text by instructing a model and validating its JSON reply.
#[derive(Debug, Clone)]
pub struct Translator {
    llm: Arc<dyn BaseLLM>,
}

impl Translator {
    pub fn new(llm: Arc<dyn BaseLLM>) -> Self {
        Self { llm }
    }

    /// Translate `text` into one supported `language`.
    ///
    /// Rejects unsupported languages before any model call is made.
    pub async fn translate(
        &self,
        language: &str,
        text: &str,
    ) -> Result<TranslationResult, TranslationError> {
        if !languages::is_supported(language) {
            tracing::warn!(language = %language, "Rejected unsupported language");
            return Err(TranslationError::InvalidLanguage {
                language: language.to_string(),
            });
        }

        let system_prompt = single_language_prompt(language);
        tracing::info!(
            language = %language,
            provider = self.llm.provider(),
            model = self.llm.model(),
            "Translating text"
        );
        tracing::debug!(prompt = %system_prompt, "Request to model");

        let cleaned = self.complete(&system_prompt, text).await?;
        let value = self.parse_logged(&cleaned)?;
        validate_single(value, language).map_err(|e| {
            tracing::error!(language = %language, content = %cleaned, "Unexpected reply shape");
            e
        })
    }

    /// Translate `text` into every batch language with one model call.
    pub async fn translate_batch(&self, text: &str) -> Result<TranslationResult, TranslationError> {
        let system_prompt = batch_prompt(&BATCH_LANGUAGES);
        tracing::info!(
            languages = BATCH_LANGUAGES.len(),
            provider = self.llm.provider(),
            "Translating text in batch"
        );

        let cleaned = self.complete(&system_prompt, text).await?;
        let value = self.parse_logged(&cleaned)?;
        validate_batch(value).map_err(|e| {
            tracing::error!(content = %cleaned, "Unexpected batch reply shape");
            e
        })
    }

    async fn complete(&self, system_prompt: &str, text: &str) -> Result<String, TranslationError> {
        let raw = self
            .llm
            .generate(system_prompt, text, TRANSLATION_TEMPERATURE)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Model call failed");
                TranslationError::Upstream(e)
            })?;
        tracing::debug!(response = %raw, "Model response");
        Ok(clean_reply(&raw))
    }

    fn parse_logged(&self, cleaned: &str) -> Result<serde_json::Value, TranslationError> {
        parse_reply(cleaned).map_err(|e| {
            tracing::error!(content = %cleaned, "JSON decode error in model reply");
            e
        })
    }
}
