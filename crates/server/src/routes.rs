//! HTTP routes.
//!
//! | Method | Path       | Handler        |
//! |--------|------------|----------------|
//! | GET    | `/health`  | [`health`]     |
//! | POST   | `/api/ask` | [`ask`]        |

use crate::answer::{answer_question, AnswerResponse};
use crate::error::{panic_response, ApiError};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/ask", post(ask))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// JSON response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Number of directory records loaded.
    pub data: usize,
    /// Number of index entries loaded.
    pub index: usize,
    /// Model currently bound, or null when generation is disabled.
    pub model: Option<String>,
}

/// Handler for `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        data: state.directory.len(),
        index: state.directory.index_len(),
        model: state.model_name().await,
    })
}

/// JSON request body for `POST /api/ask`.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, rename = "townPref")]
    pub town_pref: Option<String>,
}

impl AskRequest {
    /// Parse a request body.
    ///
    /// The content type is not checked. An empty body or a JSON `null`
    /// reads as a request without a question.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice::<Option<Self>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                tracing::debug!("Rejected request body: {}", e);
                ApiError::bad_request(format!("Invalid request body: {}", e))
            })
    }
}

/// Handler for `POST /api/ask`.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/ask \
///   -H 'content-type: application/json' \
///   -d '{"question":"Who delivers meals?","townPref":"Linden"}'
/// ```
pub async fn ask(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnswerResponse>, ApiError> {
    let request = AskRequest::from_body(&body)?;
    let response =
        answer_question(&state, request.question.as_deref(), request.town_pref.as_deref()).await?;
    Ok(Json(response))
}
