//! Error types for the translation service, its model collaborator, the
//! store and the HTTP client.

use thiserror::Error;

/// Failures of a translation request.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The requested language is outside the supported set.
    #[error(
        "Language '{language}' not found. Supported languages are: {}",
        crate::languages::supported_list()
    )]
    InvalidLanguage { language: String },

    /// The model reply could not be turned into a translation.
    ///
    /// `raw` holds the cleaned model text for diagnosis; it is logged, not
    /// returned to callers.
    #[error("Invalid JSON format in response")]
    MalformedResponse { raw: String },

    /// The model collaborator itself failed.
    #[error("{0}")]
    Upstream(#[from] LlmError),
}

impl TranslationError {
    /// Whether the caller is at fault (as opposed to the service or model).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidLanguage { .. })
    }
}

/// Failures reported by a text-generation collaborator.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The client is missing credentials or an endpoint.
    #[error("LLM client not configured: {0}")]
    NotConfigured(String),

    /// The request never produced an HTTP response.
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered 2xx but the body was not a usable completion.
    #[error("Unexpected LLM response: {0}")]
    InvalidBody(String),
}

/// Failures of the translation store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An SQLite statement failed.
    #[error("Database operation error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked.
    #[error("Database connection lock poisoned")]
    LockPoisoned,

    /// The database directory could not be prepared.
    #[error("Database path error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the translation server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("Request to translation server failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Failed to fetch translation. Status code: {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 200 with a body that is not the expected JSON.
    #[error("Error decoding JSON response: {0}")]
    Decode(String),

    /// The server answered 200 but carried no translation for the language.
    #[error("No translation received for {language}")]
    MissingTranslation { language: String },
}

/// Invalid or missing environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing required environment variable {var}")]
    Missing { var: &'static str },

    /// A variable is set but cannot be used.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
