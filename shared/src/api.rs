//! API error and wire types
//!
//! These types describe the HTTP contract between the backend, the
//! dashboard (gloo-net) and the simulator (reqwest).

use serde::{Deserialize, Serialize};

use crate::{GeoPoint, ToteRecord, ToteStatus};

/// API error types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiError {
    /// Network or connection error
    Network(String),
    /// Server returned an error status
    Server { status: u16, message: String },
    /// Failed to parse response
    Parse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// A tote record as emitted by `GET /iot/live`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveTote {
    pub id: String,
    pub name: String,
    pub status: ToteStatus,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub lux: Option<f64>,
    /// Location description
    #[serde(default)]
    pub location: Option<String>,
    /// `"lat,lon"`, or empty when the device sent no usable position
    #[serde(default)]
    pub coords: String,
    #[serde(default, rename = "lastUpdated")]
    pub last_updated: Option<f64>,
}

impl From<&ToteRecord> for LiveTote {
    fn from(record: &ToteRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.display_name().to_string(),
            status: record.status,
            temp: record.temperature,
            humidity: record.humidity,
            lux: record.lux,
            location: record.location.clone(),
            coords: record.coords.map(|c| c.to_pair()).unwrap_or_default(),
            last_updated: record.last_updated,
        }
    }
}

/// Device position as sent by the sensor firmware
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceLocation {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Body of `POST /api/iot/update`, one sensor reading from one tote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IotUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tote_id: Option<String>,
    /// Older firmware sends `id` instead of `tote_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lux: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DeviceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    /// Seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl IotUpdate {
    /// The reporting tote, preferring `tote_id` over `id`. Blank ids count
    /// as missing.
    pub fn tote_id(&self) -> Option<&str> {
        self.tote_id
            .as_deref()
            .or(self.id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Device position, if both coordinates form a valid point.
    pub fn coords(&self) -> Option<GeoPoint> {
        let location = self.location.as_ref()?;
        GeoPoint::new(location.lat?, location.lon?)
    }
}

/// Response from `POST /upload_label/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadLabelResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Dashboard configuration served by `GET /api/config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Title displayed in the dashboard header
    pub app_title: String,
    /// Seconds between live polls
    pub poll_interval_secs: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_title: "Tote Monitor".to_string(),
            poll_interval_secs: 5,
        }
    }
}
