//! Axum route handlers for the translation server.
//!
//! # Routes
//!
//! - `GET  /health`                                   — liveness probe
//! - `GET  /languages`                                — supported, batch and RTL sets
//! - `POST /translate/{language}/`                    — translate into one language
//! - `POST /translate/`                               — translate into the batch set
//! - `GET  /projects`                                 — saved project names
//! - `GET  /projects/{project}/translations`          — a project's translations
//! - `GET  /projects/{project}/translations/{language}` — one saved translation
//! - `PUT  /projects/{project}/translations/{language}` — save or update one
//!
//! The `/projects` routes exist only when the state carries a store.
//! Errors are `{"detail": "..."}` with 400 for caller mistakes and 500 for
//! model or storage failures.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::http::{TranslateRequest, TranslateResponse};
use crate::client::render::render_html;
use crate::error::{StoreError, TranslationError};
use crate::languages::{self, BATCH_LANGUAGES, RTL_LANGUAGES, SUPPORTED_LANGUAGES};
use crate::store::{SaveOutcome, Store, TranslationRecord};
use crate::translation::Translator;

type ApiError = (StatusCode, Json<Value>);

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub translator: Translator,
    /// Backing store for the project routes.
    pub store: Option<Arc<Store>>,
}

impl AppState {
    pub fn new(translator: Translator) -> Self {
        Self {
            translator,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<Store>) -> Self {
        self.store = Some(store);
        self
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/languages", get(languages_handler))
        .route("/translate/:language/", post(translate_handler))
        .route("/translate/:language", post(translate_handler))
        .route("/translate/", post(translate_batch_handler))
        .route("/translate", post(translate_batch_handler));

    if state.store.is_some() {
        router = router
            .route("/projects", get(list_projects_handler))
            .route("/projects/:project/translations", get(project_translations_handler))
            .route(
                "/projects/:project/translations/:language",
                get(get_translation_handler).put(save_translation_handler),
            );
    }

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn detail(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "detail": message.into() })))
}

fn translation_failure(err: TranslationError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    detail(status, err.to_string())
}

fn store_failure(err: StoreError) -> ApiError {
    tracing::error!(error = %err, "Store operation failed");
    detail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// Run a blocking store operation off the async executor.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
{
    let store = state
        .store
        .clone()
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "No store configured"))?;

    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| {
            detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store task panicked: {}", e),
            )
        })?
        .map_err(store_failure)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "transdesk",
    }))
}

/// GET /languages — the fixed language sets.
async fn languages_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "supported": SUPPORTED_LANGUAGES,
        "batch": BATCH_LANGUAGES,
        "rtl": RTL_LANGUAGES,
    }))
}

/// POST /translate/{language}/ — translate into one supported language.
///
/// Request: `{"text": "..."}`. Response: `{"translated_text": "..." | {"<language>": "..."}}`.
async fn translate_handler(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translated_text = state
        .translator
        .translate(&language, &request.text)
        .await
        .map_err(translation_failure)?;
    Ok(Json(TranslateResponse { translated_text }))
}

/// POST /translate/ — translate into every batch language in one model call.
async fn translate_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translated_text = state
        .translator
        .translate_batch(&request.text)
        .await
        .map_err(translation_failure)?;
    Ok(Json(TranslateResponse { translated_text }))
}

/// GET /projects — distinct saved project names.
async fn list_projects_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let projects = with_store(&state, |store| store.list_projects()).await?;
    Ok(Json(serde_json::json!({ "projects": projects })))
}

/// GET /projects/{project}/translations — every saved language of a project.
async fn project_translations_handler(
    State(state): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let key = project.clone();
    let rows = with_store(&state, move |store| store.get_project_translations(&key)).await?;

    let translations: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            serde_json::json!({
                "rtl": languages::is_rtl(&row.language),
                "html": render_html(&row.language, &row.translation),
                "language": row.language,
                "original_text": row.original_text,
                "translation": row.translation,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "project": project,
        "translations": translations,
    })))
}

/// GET /projects/{project}/translations/{language} — one saved record.
async fn get_translation_handler(
    State(state): State<AppState>,
    Path((project, language)): Path<(String, String)>,
) -> Result<Json<TranslationRecord>, ApiError> {
    let (p, l) = (project.clone(), language.clone());
    let record = with_store(&state, move |store| store.get_record(&p, &l)).await?;
    record.map(Json).ok_or_else(|| {
        detail(
            StatusCode::NOT_FOUND,
            format!("No saved translation for project '{}' in {}", project, language),
        )
    })
}

/// Body of `PUT /projects/{project}/translations/{language}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTranslationRequest {
    #[serde(default)]
    pub original_text: String,
    pub translation: String,
}

/// PUT /projects/{project}/translations/{language} — upsert one translation.
async fn save_translation_handler(
    State(state): State<AppState>,
    Path((project, language)): Path<(String, String)>,
    Json(body): Json<SaveTranslationRequest>,
) -> Result<Json<Value>, ApiError> {
    if project.trim().is_empty() {
        return Err(detail(StatusCode::BAD_REQUEST, "Project name must not be empty"));
    }
    let outcome: SaveOutcome = with_store(&state, move |store| {
        store.save_or_update(&project, &language, &body.original_text, &body.translation)
    })
    .await?;
    Ok(Json(serde_json::json!({ "outcome": outcome })))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::llms::testing::{Reply, ScriptedLLM};

    fn state_with(llm: ScriptedLLM) -> AppState {
        AppState::new(Translator::new(Arc::new(llm)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app_router(state_with(ScriptedLLM::echo_json()));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "transdesk");
    }

    #[tokio::test]
    async fn test_languages_endpoint() {
        let app = app_router(state_with(ScriptedLLM::echo_json()));
        let request = Request::builder().uri("/languages").body(Body::empty()).unwrap();
        let json = read_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(json["supported"].as_array().unwrap().len(), 25);
        assert_eq!(json["batch"].as_array().unwrap().len(), 10);
        assert!(json["rtl"].as_array().unwrap().contains(&Value::from("Urdu")));
    }

    #[tokio::test]
    async fn test_translate_single_language() {
        let app = app_router(state_with(ScriptedLLM::echo_json()));
        let response = app
            .oneshot(post_json("/translate/French/", serde_json::json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json, serde_json::json!({"translated_text": {"French": "French:Hello"}}));
    }

    #[tokio::test]
    async fn test_translate_without_trailing_slash() {
        let app = app_router(state_with(ScriptedLLM::echo_json()));
        let response = app
            .oneshot(post_json("/translate/Hindi", serde_json::json!({"text": "Hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_translate_unsupported_language_is_400() {
        let app = app_router(state_with(ScriptedLLM::echo_json()));
        let response = app
            .oneshot(post_json("/translate/Klingon/", serde_json::json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        let msg = json["detail"].as_str().unwrap();
        assert!(msg.contains("Klingon"));
        assert!(msg.contains("Indonesian"));
    }

    #[tokio::test]
    async fn test_translate_malformed_reply_is_500_never_200() {
        let llm = ScriptedLLM::echo_json().with_reply("French", Reply::Text("not json".to_string()));
        let app = app_router(state_with(llm));
        let response = app
            .oneshot(post_json("/translate/French/", serde_json::json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert_eq!(json["detail"], "Invalid JSON format in response");
    }

    #[tokio::test]
    async fn test_translate_upstream_failure_is_500_with_message() {
        let llm = ScriptedLLM::echo_json().with_reply("French", Reply::Fail("auth failed".to_string()));
        let app = app_router(state_with(llm));
        let response = app
            .oneshot(post_json("/translate/French/", serde_json::json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("auth failed"));
    }

    #[tokio::test]
    async fn test_translate_batch() {
        let llm = ScriptedLLM::new(Reply::Text(
            "```json\n{\"French\": \"Bonjour\", \"Spanish\": \"Hola\"}\n```".to_string(),
        ));
        let app = app_router(state_with(llm));
        let response = app
            .oneshot(post_json("/translate/", serde_json::json!({"text": "Hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["translated_text"]["Spanish"], "Hola");
    }

    #[tokio::test]
    async fn test_project_routes_absent_without_store() {
        let app = app_router(state_with(ScriptedLLM::echo_json()));
        let request = Request::builder().uri("/projects").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_project_routes_save_and_read() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        let state = state_with(ScriptedLLM::echo_json()).with_store(store.clone());
        let app = app_router(state);

        for (translation, expected) in [("Bonjour", "inserted"), ("Salut", "updated")] {
            let request = Request::builder()
                .method("PUT")
                .uri("/projects/P1/translations/French")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"original_text": "Hello", "translation": translation})
                        .to_string(),
                ))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(read_json(response).await["outcome"], expected);
        }
        store.save_or_update("P1", "Arabic", "Hello", "مرحبا").unwrap();

        let request = Request::builder().uri("/projects").body(Body::empty()).unwrap();
        let json = read_json(app.clone().oneshot(request).await.unwrap()).await;
        assert_eq!(json["projects"], serde_json::json!(["P1"]));

        let request = Request::builder()
            .uri("/projects/P1/translations")
            .body(Body::empty())
            .unwrap();
        let json = read_json(app.clone().oneshot(request).await.unwrap()).await;
        let rows = json["translations"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["translation"], "Salut");
        assert_eq!(rows[0]["rtl"], false);
        assert_eq!(rows[0]["html"], "Salut");
        assert_eq!(rows[1]["rtl"], true);
        assert_eq!(
            rows[1]["html"],
            "<div style=\"direction: rtl; text-align: right;\">مرحبا</div>"
        );

        let request = Request::builder()
            .uri("/projects/P1/translations/French")
            .body(Body::empty())
            .unwrap();
        let json = read_json(app.clone().oneshot(request).await.unwrap()).await;
        assert_eq!(json["translation"], "Salut");
        assert_eq!(json["original_text"], "Hello");

        let request = Request::builder()
            .uri("/projects/P1/translations/German")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_on_broken_store_is_500() {
        let store = Arc::new(Store::open_in_memory().unwrap());
        store
            .lock()
            .unwrap()
            .execute_batch("DROP TABLE translations")
            .unwrap();
        let app = app_router(state_with(ScriptedLLM::echo_json()).with_store(store));

        let request = Request::builder()
            .method("PUT")
            .uri("/projects/P1/translations/French")
            .header("Content-Type", "application/json")
            .body(Body::from(
                serde_json::json!({"original_text": "Hello", "translation": "Bonjour"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("translations"));
    }
}
