//! Knowledge graph routes — build, view, query and summarize.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use lexigraph_core::RecordingId;
use lexigraph_resolve::{GraphQuery, QueryResult};
use lexigraph_runtime::{BuildReport, RecordingGraph, RecordingInput};
use lexigraph_store::GraphSummary;
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/knowledge-graph", post(build_graph))
        .route("/knowledge-graph/{recording_id}", get(get_graph))
        .route("/query-graph", post(query_graph))
        .route("/graph/summary", get(get_summary))
}

/// POST /api/knowledge-graph — extract a recording and merge it.
async fn build_graph(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RecordingInput>,
) -> Json<BuildReport> {
    Json(state.service.build_recording(&input).await)
}

/// GET /api/knowledge-graph/{recording_id} — nodes, edges and summary.
async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(recording_id): Path<RecordingId>,
) -> Json<RecordingGraph> {
    Json(state.service.graph(Some(recording_id)))
}

/// POST /api/query-graph
async fn query_graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphQuery>,
) -> Json<QueryResult> {
    Json(state.service.query(&req.query, req.recording_id).await)
}

#[derive(Deserialize)]
struct SummaryParams {
    recording_id: Option<RecordingId>,
}

/// GET /api/graph/summary?recording_id=
async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Json<GraphSummary> {
    Json(state.service.summary(params.recording_id))
}
