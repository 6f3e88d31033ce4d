//! Text-generation collaborators.
//!
//! - [`base_llm`] - the [`BaseLLM`] trait the translation service calls
//! - [`providers`] - concrete provider clients (Azure OpenAI)

pub mod base_llm;
pub mod providers;

#[cfg(test)]
pub(crate) mod testing;

pub use base_llm::{BaseLLM, ChatMessage, Role};
