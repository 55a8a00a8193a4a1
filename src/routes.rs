use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error};
use uuid::Uuid;

use crate::service::{TranslationOutcome, TranslationRequest};
use crate::state::AppState;
use crate::ui;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Form page
        .route("/", get(index))

        // Health check
        .route("/api/health", get(health_check))

        // REST API routes
        .route("/api/languages", get(list_languages))
        .route("/api/translate", post(translate))
        .route("/api/audio/:id", get(get_audio).delete(delete_audio))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let config = &state.config;
    Html(ui::render_page(
        &config.server.title,
        state.languages(),
        &config.languages.default_source,
        &config.languages.default_target,
    ))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "languages": state.languages().len(),
        "audio_clips": state.audio().len()
    }))
}

async fn list_languages(State(state): State<AppState>) -> Json<Value> {
    let languages: Vec<Value> = state
        .languages()
        .records()
        .iter()
        .map(|r| json!({ "name": r.language, "code": r.code }))
        .collect();

    Json(json!({
        "languages": languages,
        "default_source": state.config.languages.default_source,
        "default_target": state.config.languages.default_target
    }))
}

#[derive(Debug, Serialize)]
pub struct TranslateReply {
    pub display_text: String,
    pub audio_id: Option<Uuid>,
    pub audio_url: Option<String>,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl From<TranslationOutcome> for TranslateReply {
    fn from(outcome: TranslationOutcome) -> Self {
        let audio_id = outcome.audio.map(|audio| audio.id);
        Self {
            display_text: outcome.display_text,
            audio_id,
            audio_url: audio_id.map(|id| format!("/api/audio/{}", id)),
            error: outcome.error.is_some(),
            error_kind: outcome.error,
        }
    }
}

/// Failures are reported in the body; the page always gets a 200
async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Json<TranslateReply> {
    let outcome = state
        .service
        .handle(&request.text, &request.source_language, &request.target_language)
        .await;
    Json(outcome.into())
}

async fn get_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Request,
) -> Response {
    let Some(path) = state.audio().path(&id) else {
        debug!("Audio clip {} not found", id);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Audio clip not found"})),
        )
            .into_response();
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!("Failed to serve audio clip {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn delete_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    if state.audio().release(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Audio clip not found"})),
        ))
    }
}
