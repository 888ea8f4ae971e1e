//! HTTP side of synchronization (gloo-net).
//!
//! These functions perform the requests the engine describes and map every
//! failure onto [`ApiError`]; none of them panic or retry.

use gloo_net::http::Request;
use shared::{endpoints, parse_live_snapshot, ApiError, AppConfig, Snapshot, UploadLabelResponse};

use crate::utils;

/// `GET /iot/live`
pub async fn fetch_snapshot() -> Result<Snapshot, ApiError> {
    let response = Request::get(&utils::api_url(endpoints::LIVE_PATH))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Server {
            status: response.status(),
            message: response.status_text(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))?;
    parse_live_snapshot(&body)
}

/// Check whether a label image exists. A 404 is the ordinary "no label yet"
/// answer, not an error.
pub async fn probe_label(url: &str) -> Result<bool, ApiError> {
    let response = Request::get(&utils::api_url(url))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    match response.status() {
        200..=299 => Ok(true),
        404 => Ok(false),
        status => Err(ApiError::Server {
            status,
            message: response.status_text(),
        }),
    }
}

/// `POST /upload_label/{id}` with the file as multipart field `file`.
pub async fn upload_label(
    url: &str,
    file: &web_sys::File,
) -> Result<UploadLabelResponse, ApiError> {
    let form = web_sys::FormData::new()
        .map_err(|_| ApiError::Network("FormData is unavailable".to_string()))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| ApiError::Network("Failed to attach file".to_string()))?;

    let response = Request::post(&utils::api_url(url))
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let status = response.status();
    // The backend answers `{ok: false, error}` with a 4xx; keep its message
    match response.json::<UploadLabelResponse>().await {
        Ok(body) => Ok(body),
        Err(_) if !response.ok() => Err(ApiError::Server {
            status,
            message: response.status_text(),
        }),
        Err(e) => Err(ApiError::Parse(e.to_string())),
    }
}

/// `GET /api/config`; callers fall back to defaults on error.
pub async fn fetch_app_config() -> Result<AppConfig, ApiError> {
    let response = Request::get(&utils::api_url(endpoints::CONFIG_PATH))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    response
        .json::<AppConfig>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}
