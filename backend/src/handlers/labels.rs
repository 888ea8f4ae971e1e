use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared::{endpoints::LABEL_EXTENSION, UploadLabelResponse};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::AppState;

/// Maximum label image size: 10 MB
pub const MAX_LABEL_SIZE: usize = 10 * 1024 * 1024;

type UploadResult = Result<Json<UploadLabelResponse>, (StatusCode, Json<UploadLabelResponse>)>;

fn rejected(status: StatusCode, message: &str) -> (StatusCode, Json<UploadLabelResponse>) {
    (
        status,
        Json(UploadLabelResponse {
            ok: false,
            error: Some(message.to_string()),
        }),
    )
}

/// Store the multipart field `file` as the tote's label image.
pub async fn upload_label(
    State(app_state): State<Arc<AppState>>,
    Path(tote_id): Path<String>,
    mut multipart: Multipart,
) -> UploadResult {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejected(e.status(), &e.body_text()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| rejected(e.status(), &e.body_text()))?;
            file_data = Some(bytes.to_vec());
            break;
        }
    }

    let file_data = match file_data {
        Some(data) if !data.is_empty() => data,
        _ => return Err(rejected(StatusCode::BAD_REQUEST, "file missing")),
    };

    if file_data.len() > MAX_LABEL_SIZE {
        return Err(rejected(StatusCode::PAYLOAD_TOO_LARGE, "file too large"));
    }

    app_state
        .labels
        .save(&tote_id, &file_data)
        .await
        .map_err(|e| {
            error!("Failed to store label for {}: {}", tote_id, e);
            rejected(StatusCode::INTERNAL_SERVER_ERROR, "could not store label")
        })?;

    info!("Label upload: {} ({} bytes)", tote_id, file_data.len());

    Ok(Json(UploadLabelResponse {
        ok: true,
        error: None,
    }))
}

/// Serve `<id>.png`. A missing label is a plain 404.
pub async fn get_label(
    State(app_state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> Result<Response, StatusCode> {
    let tote_id = file
        .strip_suffix(LABEL_EXTENSION)
        .ok_or(StatusCode::NOT_FOUND)?;

    match app_state.labels.load(tote_id).await {
        Ok(Some(bytes)) => Ok((
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            bytes,
        )
            .into_response()),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            warn!("Failed to read label for {}: {}", tote_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
