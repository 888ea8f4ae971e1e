//! HTTP route paths shared by the backend router and its clients.

use crate::GeoPoint;

/// Live snapshot of every tote
pub const LIVE_PATH: &str = "/iot/live";

/// Device ingest
pub const IOT_UPDATE_PATH: &str = "/api/iot/update";

/// Dashboard configuration
pub const CONFIG_PATH: &str = "/api/config";

/// Axum route pattern for label uploads
pub const UPLOAD_LABEL_ROUTE: &str = "/upload_label/:tote_id";

/// Axum route pattern for label images (`<id>.png`)
pub const LABEL_IMAGE_ROUTE: &str = "/label/:file";

/// Suffix of stored label images
pub const LABEL_EXTENSION: &str = ".png";

/// `POST` target for a tote's label image
pub fn upload_label_path(tote_id: &str) -> String {
    format!("/upload_label/{}", encode_segment(tote_id))
}

/// Location of a tote's label image. A cache-bust token forces the browser
/// to fetch the bytes again after an upload.
pub fn label_image_path(tote_id: &str, cache_bust: Option<&str>) -> String {
    let base = format!("/label/{}{}", encode_segment(tote_id), LABEL_EXTENSION);
    match cache_bust {
        Some(token) => format!("{}?v={}", base, token),
        None => base,
    }
}

/// "Open in maps" link for a position
pub fn maps_link(point: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        point.lat(),
        point.lon()
    )
}

/// Percent-encode a path segment. Tote ids are usually plain alphanumerics,
/// so only the reserved characters are escaped.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
