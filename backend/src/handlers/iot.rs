use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use indexmap::IndexMap;
use serde_json::{json, Value};
use shared::{IotUpdate, LiveTote};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::AppState;

/// Device ingest: record the latest reading for one tote.
///
/// The body is parsed by hand so malformed JSON gets the same `{"error"}`
/// shape as a missing id.
pub async fn iot_update(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let update: IotUpdate = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected IoT update with invalid JSON: {}", e);
        (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid JSON" })))
    })?;

    let received_at = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
    let record = app_state
        .totes
        .apply_update(&update, received_at)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))))?;

    debug!(
        "Reading from {}: temp={:?} humidity={:?} lux={:?} -> {}",
        record.id, record.temperature, record.humidity, record.lux, record.status
    );

    Ok(Json(json!({ "ok": true })))
}

/// Live snapshot of every tote, keyed by id in first-seen order.
pub async fn live(State(app_state): State<Arc<AppState>>) -> Json<IndexMap<String, LiveTote>> {
    Json(app_state.totes.live().await)
}
