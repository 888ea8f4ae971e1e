//! Tote data model shared between the backend, the dashboard frontend and
//! the device simulator.
//!
//! Everything in this crate must stay WASM compatible.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// API error and wire types
pub mod api;
pub use api::{ApiError, AppConfig, DeviceLocation, IotUpdate, LiveTote, UploadLabelResponse};

// Route paths and URL builders
pub mod endpoints;

// Lenient parsing of the `/iot/live` payload
pub mod live;
pub use live::parse_live_snapshot;

/// Health category of a tote. Drives badge color and KPI bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToteStatus {
    Normal,
    Warning,
    Critical,
}

impl ToteStatus {
    pub const ALL: [ToteStatus; 3] = [
        ToteStatus::Normal,
        ToteStatus::Warning,
        ToteStatus::Critical,
    ];

    /// Parse a status name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(ToteStatus::Normal),
            "warning" => Some(ToteStatus::Warning),
            "critical" => Some(ToteStatus::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToteStatus::Normal => "normal",
            ToteStatus::Warning => "warning",
            ToteStatus::Critical => "critical",
        }
    }

    /// Human readable label (e.g. for badges and KPI tiles)
    pub fn label(&self) -> &'static str {
        match self {
            ToteStatus::Normal => "Normal",
            ToteStatus::Warning => "Warning",
            ToteStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for ToteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated latitude/longitude pair.
///
/// Construction always goes through [`GeoPoint::new`] so a `GeoPoint` is
/// finite and inside the valid WGS84 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(GeoPoint { lat, lon })
    }

    /// Parse the `"lat,lon"` form used by the live feed.
    pub fn parse_pair(value: &str) -> Option<Self> {
        let (lat, lon) = value.split_once(',')?;
        let lat = lat.trim().parse::<f64>().ok()?;
        let lon = lon.trim().parse::<f64>().ok()?;
        GeoPoint::new(lat, lon)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Format as `"lat,lon"`, the inverse of [`GeoPoint::parse_pair`].
    pub fn to_pair(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// One physical tote as last reported by the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToteRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: ToteStatus,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub lux: Option<f64>,
    /// Free-text location description (e.g. "Warehouse A - Section 1")
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub coords: Option<GeoPoint>,
    /// Seconds since the Unix epoch
    #[serde(default)]
    pub last_updated: Option<f64>,
}

impl ToteRecord {
    /// A record with only an id; every reading unknown.
    pub fn new(id: impl Into<String>, status: ToteStatus) -> Self {
        Self {
            id: id.into(),
            name: None,
            status,
            temperature: None,
            humidity: None,
            lux: None,
            location: None,
            coords: None,
            last_updated: None,
        }
    }

    /// The name if present and non-blank, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

/// One complete, immutable view of every tote at a point in time.
///
/// Iteration follows arrival order of the live payload. Cloning is cheap;
/// the map is shared and never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    totes: Arc<IndexMap<String, ToteRecord>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from records in arrival order. A later record with
    /// an id already seen replaces the earlier one in place.
    pub fn from_records(records: impl IntoIterator<Item = ToteRecord>) -> Self {
        let totes = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect::<IndexMap<_, _>>();
        Self {
            totes: Arc::new(totes),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ToteRecord> {
        self.totes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.totes.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToteRecord> {
        self.totes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.totes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.totes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totes.is_empty()
    }

    /// True when both snapshots share the same underlying map.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.totes, &other.totes)
    }
}

/// Derive a status from raw readings.
///
/// Temperature is checked first, then humidity, then lux; the first
/// non-normal verdict wins. Missing readings are skipped.
pub fn compute_status(
    temperature: Option<f64>,
    humidity: Option<f64>,
    lux: Option<f64>,
) -> ToteStatus {
    if let Some(t) = temperature.filter(|t| t.is_finite()) {
        if !(-5.0..=60.0).contains(&t) {
            return ToteStatus::Critical;
        }
        if !(0.0..=25.0).contains(&t) {
            return ToteStatus::Warning;
        }
    }

    if let Some(h) = humidity.filter(|h| h.is_finite()) {
        if h > 90.0 {
            return ToteStatus::Critical;
        }
        if h > 70.0 {
            return ToteStatus::Warning;
        }
    }

    if let Some(lx) = lux.filter(|lx| lx.is_finite()) {
        if lx > 1000.0 {
            return ToteStatus::Critical;
        }
        if lx >= 300.0 {
            return ToteStatus::Warning;
        }
    }

    ToteStatus::Normal
}
