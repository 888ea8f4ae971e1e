use axum::{extract::State, Json};
use shared::AppConfig;
use std::sync::Arc;

use crate::AppState;

pub async fn get_config(State(app_state): State<Arc<AppState>>) -> Json<AppConfig> {
    Json(app_state.config.clone())
}
