//! Snapshot API - the seam the presentation layer consumes
//!
//! Two endpoints:
//! - `GET /api/snapshot` — run the pipeline once, return the consolidated
//!   snapshot (or a 502 envelope when a raw fetch fails)
//! - `GET /api/health` — liveness probe
//!
//! Every request runs its own isolated pipeline cycle over private data, so
//! concurrent requests cannot interfere with each other.

use crate::ingest::{EnvironmentSource, MovementSource};
use crate::llm::LlmBackend;
use crate::pipeline::{HiveSnapshot, PipelineCoordinator};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Capabilities the snapshot handler runs against. Built once in the
/// composition root, shared read-only by requests.
pub struct ApiContext {
    pub coordinator: PipelineCoordinator,
    pub movements: Arc<dyn MovementSource>,
    pub environment: Arc<dyn EnvironmentSource>,
    pub backend: Arc<dyn LlmBackend>,
}

/// Create the snapshot API router.
pub fn router(context: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(context)
}

async fn get_snapshot(
    State(context): State<Arc<ApiContext>>,
) -> Result<Json<HiveSnapshot>, (StatusCode, Json<serde_json::Value>)> {
    match context
        .coordinator
        .run(
            context.movements.as_ref(),
            context.environment.as_ref(),
            context.backend.as_ref(),
        )
        .await
    {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!(error = %e, "pipeline run failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
