//! API routes

use axum::{
    body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::core::ChatError;
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

/// Largest request body the chat endpoint reads
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Everything the chat endpoint can answer with besides a reply
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error(transparent)]
    Chat(#[from] ChatError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
            ApiError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"),
            ApiError::Chat(ChatError::Validation) => (StatusCode::BAD_REQUEST, "Message is required"),
            ApiError::Chat(err) => {
                tracing::error!(error = %err, "CHEESA AI error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn chat(State(state): State<AppState>, request: Request) -> Result<Response, ApiError> {
    let method = request.method().clone();
    match method {
        Method::OPTIONS => Ok(StatusCode::NO_CONTENT.into_response()),
        Method::POST => {
            let bytes = body::to_bytes(request.into_body(), BODY_LIMIT)
                .await
                .map_err(|_| ApiError::PayloadTooLarge)?;
            // Unparseable bodies carry no message and fail validation.
            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            let reply = state.chat_engine.reply(&body).await?;
            Ok(Json(ChatResponse { reply }).into_response())
        }
        _ => Err(ApiError::MethodNotAllowed),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/chat", any(chat))
        .route("/api/chat", any(chat))
}

/// The full application: routes, CORS headers and request tracing
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(router())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
