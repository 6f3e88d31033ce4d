//! LLM provider implementations.
//!
//! Each provider implements [`BaseLLM`](crate::llms::base_llm::BaseLLM) and
//! owns its own authentication, request format and error mapping.

pub mod azure;

pub use azure::AzureCompletion;
