//! Health-check endpoint, mounted on both surfaces.

use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use super::Surface;
use crate::AppState;

/// `GET /api/health` — liveness probe.
///
/// Returns status, which surface answered, uptime, version, and the number of
/// provisioned devices.
pub async fn health(
    State(state): State<AppState>,
    Extension(surface): Extension<Surface>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "surface": surface.as_str(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
        "devices": state.registry.len().await,
    }))
}
