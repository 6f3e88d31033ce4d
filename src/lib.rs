//! # transdesk
//!
//! Translate a text into many languages with a large language model and keep
//! the results per project.
//!
//! The crate has two halves that talk over HTTP:
//!
//! - the **server** ([`server`]) exposes `POST /translate/{language}/` and
//!   `POST /translate/`, builds an instruction prompt, calls the model
//!   ([`llms`]) at temperature 0 and turns its reply into JSON
//!   ([`translation`]);
//! - the **client** ([`client`]) walks a list of languages one request at a
//!   time, collects the results into a session and saves them on request to
//!   the SQLite [`store`], one record per `(project, language)`.

pub mod client;
pub mod config;
pub mod error;
pub mod languages;
pub mod llms;
pub mod server;
pub mod store;
pub mod translation;

pub use client::{TranslationClient, TranslationSession};
pub use error::{ClientError, ConfigError, LlmError, StoreError, TranslationError};
pub use llms::BaseLLM;
pub use store::{SaveOutcome, Store, TranslationRecord};
pub use translation::{TranslationResult, Translator};

/// Crate version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
