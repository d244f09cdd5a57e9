//! Health route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// GET /api/health — liveness plus graph size.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.service.stats();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "lexigraph",
        "port": state.config.port,
        "llm_backend": state.backend_name,
        "total_nodes": stats.total_nodes,
        "total_edges": stats.total_edges,
    }))
}
