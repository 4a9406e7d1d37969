// Token expiration and CORS middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tower_http::cors::{Any, CorsLayer};

use crate::routes::AppState;

/// Token expiration middleware
///
/// Refreshes the shared Zoom credential when it has expired, then hands the
/// request on. A failed refresh does not stop the request; the handler runs
/// with the stale token and reports whatever the Zoom API answers.
pub async fn token_expiration_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    state.token_manager.ensure_valid().await;
    next.run(request).await
}

/// Create CORS middleware layer
///
/// Configures CORS to allow all origins, methods, and headers.
/// Handles OPTIONS preflight requests automatically.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
