//! Turning raw model text into a translation.
//!
//! Three stages, each usable on its own:
//!
//! 1. [`clean_reply`] strips whitespace and Markdown code fences.
//! 2. [`parse_reply`] parses the cleaned text as JSON.
//! 3. [`validate_single`] / [`validate_batch`] check the JSON has the shape
//!    the endpoint variant promises and produce a [`TranslationResult`].

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TranslationError;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json|```").unwrap());

/// A translation as returned by the endpoints.
///
/// Serializes as a bare string or as a `{language: text}` object, which is
/// the shape of the `translated_text` field on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationResult {
    /// One translation with no language key.
    Single(String),
    /// Translations keyed by language name.
    Multi(BTreeMap<String, String>),
}

impl TranslationResult {
    /// The translation for `language`, if this result carries one.
    ///
    /// A `Single` result is assumed to be in whichever language was asked for.
    pub fn for_language(&self, language: &str) -> Option<&str> {
        match self {
            Self::Single(text) => Some(text.as_str()),
            Self::Multi(map) => map.get(language).map(String::as_str),
        }
    }

    /// Languages explicitly named by this result.
    pub fn languages(&self) -> Vec<&str> {
        match self {
            Self::Single(_) => Vec::new(),
            Self::Multi(map) => map.keys().map(String::as_str).collect(),
        }
    }
}

/// Trim the reply and drop every ```` ```json ```` / ```` ``` ```` marker.
pub fn clean_reply(raw: &str) -> String {
    CODE_FENCE.replace_all(raw.trim(), "").trim().to_string()
}

/// Parse cleaned model text as JSON.
pub fn parse_reply(cleaned: &str) -> Result<Value, TranslationError> {
    serde_json::from_str(cleaned).map_err(|_| TranslationError::MalformedResponse {
        raw: cleaned.to_string(),
    })
}

/// Accept a single-language reply for `language`.
///
/// A bare string is taken as the translation. An object must carry a string
/// under `language`; its other string entries are kept as-is.
pub fn validate_single(value: Value, language: &str) -> Result<TranslationResult, TranslationError> {
    match value {
        Value::String(text) => Ok(TranslationResult::Single(text)),
        Value::Object(ref map) if map.get(language).is_some_and(Value::is_string) => {
            Ok(TranslationResult::Multi(string_entries(map)))
        }
        other => Err(TranslationError::MalformedResponse {
            raw: other.to_string(),
        }),
    }
}

/// Accept a batched reply: an object whose values are all strings.
pub fn validate_batch(value: Value) -> Result<TranslationResult, TranslationError> {
    match value {
        Value::Object(ref map) if map.values().all(Value::is_string) => {
            Ok(TranslationResult::Multi(string_entries(map)))
        }
        other => Err(TranslationError::MalformedResponse {
            raw: other.to_string(),
        }),
    }
}

fn string_entries(map: &serde_json::Map<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}
