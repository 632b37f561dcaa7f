use crate::server::AppContext;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/config", get(show_config))
}

async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "alist_url": ctx.config.alist.url,
        "strm_save_dir": ctx.config.strm.save_dir,
    }))
}

/// Effective configuration with the AList token masked
async fn show_config(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.config.redacted())
}
