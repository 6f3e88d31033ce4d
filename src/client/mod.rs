//! Client side of the translation service: the HTTP client, the batch loop
//! over many languages, the per-user session and presentation helpers.

pub mod batch;
pub mod http;
pub mod render;
pub mod session;

pub use batch::{
    translate_all, BatchEvent, BatchFailure, BatchOptions, BatchProgress, BatchReport,
    TranslationSource,
};
pub use http::{extract_translation, TranslateRequest, TranslateResponse, TranslationClient};
pub use session::TranslationSession;
