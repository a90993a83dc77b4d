//! Router assembly for the gateway.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router around the resolved asset handler.
///
/// The asset router owns the fallback (every path not claimed here);
/// the gateway adds only the liveness probe and the HTTP layers.
pub fn create_router(assets: Router) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(assets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}
