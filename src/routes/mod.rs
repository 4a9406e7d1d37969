use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequest, Query, Request, State},
    http::header::CONTENT_TYPE,
    middleware::{self as axum_middleware},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::TokenManager;
use crate::error::{ApiError, Result};
use crate::http_client::ZoomApiClient;
use crate::middleware;
use crate::models::zoom::{
    AuthorizeQuery, CreateMeetingPayload, RegisterMeetingRequest, RelayResponse,
};

/// Application version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest accepted request body
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub token_manager: Arc<TokenManager>,
    pub zoom_client: Arc<ZoomApiClient>,
}

/// Short id to correlate the log lines of one request
fn request_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Meeting request body, sent either as JSON or as an urlencoded form
///
/// Any body that can't be read rejects with the same fixed 400 as an
/// upstream failure.
pub struct MeetingRequestBody(pub RegisterMeetingRequest);

#[async_trait]
impl<S> FromRequest<S> for MeetingRequestBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            Form::<RegisterMeetingRequest>::from_request(req, state)
                .await
                .map(|Form(request)| Self(request))
                .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
        } else {
            Json::<RegisterMeetingRequest>::from_request(req, state)
                .await
                .map(|Json(request)| Self(request))
                .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
        }
    }
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// OAuth redirect route (authorization code exchange)
pub fn oauth_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(authorize_handler))
        .with_state(state)
}

/// Meeting routes (token is refreshed first when expired)
pub fn meeting_routes(state: AppState) -> Router {
    Router::new()
        .route("/meetings", get(list_meetings_handler))
        .route("/register-meeting", post(register_meeting_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::token_expiration_middleware,
        ))
        .with_state(state)
}

/// Build the application with all routes and middleware
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(oauth_routes(state.clone()))
        .merge(meeting_routes(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// GET /health - Health check
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": VERSION
    }))
}

/// GET /?code=... - OAuth redirect target
///
/// Exchanges the authorization code and answers with the raw access token
/// as plain text.
async fn authorize_handler(
    State(state): State<AppState>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<String> {
    let request_id = request_id();

    let code = match query.code.filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => {
            tracing::warn!("[{}] Redirect without authorization code", request_id);
            return Err(ApiError::CodeExchange(
                "missing authorization code".to_string(),
            ));
        }
    };

    tracing::info!("[{}] Exchanging authorization code", request_id);

    state
        .token_manager
        .exchange_code(&code)
        .await
        .map_err(|e| ApiError::CodeExchange(format!("{:#}", e)))
}

/// GET /meetings - List the user's meetings
async fn list_meetings_handler(State(state): State<AppState>) -> Result<Json<RelayResponse>> {
    let request_id = request_id();
    tracing::info!("[{}] Request to /meetings", request_id);

    let access_token = state.token_manager.access_token().await;
    let data = state.zoom_client.list_meetings(&access_token).await?;

    Ok(Json(RelayResponse::meetings(data)))
}

/// POST /register-meeting - Schedule a new meeting
async fn register_meeting_handler(
    State(state): State<AppState>,
    MeetingRequestBody(request): MeetingRequestBody,
) -> Result<Json<RelayResponse>> {
    let request_id = request_id();
    tracing::info!(
        "[{}] Request to /register-meeting: name={}, start={}",
        request_id,
        request.meeting_name,
        request.selected_date_time
    );

    let payload = CreateMeetingPayload::from_request(&request);
    let access_token = state.token_manager.access_token().await;
    let data = state
        .zoom_client
        .create_meeting(&access_token, &payload)
        .await?;

    tracing::info!("[{}] Meeting Data: {}", request_id, data);

    Ok(Json(RelayResponse::meeting_created(data)))
}
