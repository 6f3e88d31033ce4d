//! Translation requests: prompt construction, the model call and the
//! clean → parse → validate pipeline over the model's reply.

pub mod prompt;
pub mod response;
pub mod service;

pub use response::{clean_reply, parse_reply, validate_batch, validate_single, TranslationResult};
pub use service::{Translator, TRANSLATION_TEMPERATURE};
