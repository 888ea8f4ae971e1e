//! Card grid projection.
//!
//! Produces a display description per tote; the Yew components only map
//! these fields onto markup.

use chrono::{DateTime, TimeZone};
use shared::{endpoints, Snapshot, ToteRecord, ToteStatus};
use std::collections::HashMap;
use std::fmt::Display;

/// Shown in place of a missing reading
pub const MISSING: &str = "--";

pub const UNKNOWN_LOCATION: &str = "Unknown location";
pub const UNKNOWN_TIME: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct ToteCard {
    pub id: String,
    pub title: String,
    pub status: ToteStatus,
    pub temperature: String,
    pub humidity: String,
    pub lux: String,
    pub location: String,
    /// Present only when the tote has a valid position
    pub maps_url: Option<String>,
    pub last_updated: String,
    /// Carries the tote's label revision so a new upload changes the URL
    pub label_url: String,
}

/// One card per id, in the given order. Ids absent from the snapshot are
/// skipped. `label_revisions` maps a tote id to the cache-bust value of its
/// latest uploaded label.
pub fn render<Tz>(
    ids: &[String],
    snapshot: &Snapshot,
    tz: &Tz,
    label_revisions: &HashMap<String, String>,
) -> Vec<ToteCard>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ids.iter()
        .filter_map(|id| snapshot.get(id))
        .map(|record| {
            let revision = label_revisions.get(&record.id).map(String::as_str);
            card_for(record, tz, revision)
        })
        .collect()
}

pub fn card_for<Tz>(record: &ToteRecord, tz: &Tz, label_revision: Option<&str>) -> ToteCard
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ToteCard {
        id: record.id.clone(),
        title: record.display_name().to_string(),
        status: record.status,
        temperature: reading(record.temperature, "°C"),
        humidity: reading(record.humidity, "%"),
        lux: reading(record.lux, " lx"),
        location: record
            .location
            .clone()
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        maps_url: record.coords.map(endpoints::maps_link),
        last_updated: format_timestamp(record.last_updated, tz),
        label_url: endpoints::label_image_path(&record.id, label_revision),
    }
}

/// Format a reading with at most one decimal, or the placeholder.
fn reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}{}", v, unit),
        Some(v) => format!("{:.1}{}", v, unit),
        None => MISSING.to_string(),
    }
}

/// Render epoch seconds in the viewer's time zone.
pub fn format_timestamp<Tz>(seconds: Option<f64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    seconds
        .filter(|s| s.is_finite() && *s >= 0.0)
        .and_then(|s| DateTime::from_timestamp(s.trunc() as i64, 0))
        .map(|utc| {
            utc.with_timezone(tz)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}
