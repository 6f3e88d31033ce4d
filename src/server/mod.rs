//! HTTP server for the translation service.
//!
//! # Endpoints
//!
//! - `POST /translate/{language}/` — translate into one supported language
//! - `POST /translate/`            — translate into the fixed batch set
//! - `GET  /health`                — liveness probe
//!
//! plus the `/languages` listing and, with a store, the `/projects` routes.

pub mod routes;

pub use routes::{app_router, AppState, SaveTranslationRequest};
