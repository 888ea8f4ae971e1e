use axum::{body::to_bytes, response::Response, Router};
use serde_json::Value;
use shared::AppConfig;
use std::sync::Arc;
use tempfile::TempDir;

use crate::{build_router, labels::LabelStore, store::ToteStore, AppState};

/// Router over a fresh store with labels in a temporary directory. Keep the
/// directory alive for the duration of the test.
pub fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let app_state = Arc::new(AppState {
        totes: ToteStore::new(),
        labels: LabelStore::open(dir.path()).unwrap(),
        config: AppConfig::default(),
    });
    (build_router(app_state), dir)
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
