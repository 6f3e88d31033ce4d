//! Language sets known to the translation service.
//!
//! Languages are identified by their English display name (`"French"`,
//! `"Arabic"`, ...). The name is what the model is asked to translate into,
//! what the JSON reply is keyed by, and what the store records, so matching
//! is exact and case-sensitive throughout.

use serde::{Deserialize, Serialize};

/// Every language the per-language endpoint accepts, in presentation order.
pub const SUPPORTED_LANGUAGES: [&str; 25] = [
    "French",
    "Spanish",
    "Italian",
    "German",
    "Portuguese",
    "Russian",
    "Chinese",
    "Japanese",
    "Korean",
    "Arabic",
    "Hindi",
    "Bengali",
    "Punjabi",
    "Tamil",
    "Telugu",
    "Turkish",
    "Vietnamese",
    "Thai",
    "Swedish",
    "Dutch",
    "Greek",
    "Hebrew",
    "Indonesian",
    "Malay",
    "Persian",
];

/// Languages produced by a single call to the batched endpoint.
pub const BATCH_LANGUAGES: [&str; 10] = [
    "French",
    "Spanish",
    "Italian",
    "German",
    "Portuguese",
    "Russian",
    "Chinese",
    "Japanese",
    "Korean",
    "Arabic",
];

/// Languages written right-to-left.
///
/// Farsi and Urdu are not translation targets but saved records may still
/// carry them, so presentation recognises them.
pub const RTL_LANGUAGES: [&str; 5] = ["Arabic", "Farsi", "Hebrew", "Urdu", "Persian"];

/// Whether `language` is accepted by the per-language endpoint.
pub fn is_supported(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

/// Whether `language` is rendered right-to-left.
pub fn is_rtl(language: &str) -> bool {
    RTL_LANGUAGES.contains(&language)
}

/// The supported set joined the way error messages list it.
pub fn supported_list() -> String {
    SUPPORTED_LANGUAGES.join(", ")
}

/// Horizontal text direction for presenting a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Direction used to present `language`.
    pub fn of(language: &str) -> Self {
        if is_rtl(language) {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }
}

impl std::fmt::Display for TextDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ltr => write!(f, "ltr"),
            Self::Rtl => write!(f, "rtl"),
        }
    }
}
