//! Lenient parsing of the `/iot/live` payload.
//!
//! Devices and backend versions disagree on field names and types, so each
//! record is read field by field. An absent or wrong-typed field means
//! "unknown"; only a payload that is not a JSON object at all is an error.

use indexmap::IndexMap;
use serde_json::Value;

use crate::{compute_status, ApiError, GeoPoint, Snapshot, ToteRecord, ToteStatus};

/// Parse a live payload body into a snapshot, keeping arrival order.
pub fn parse_live_snapshot(body: &str) -> Result<Snapshot, ApiError> {
    let records: IndexMap<String, Value> = serde_json::from_str(body)
        .map_err(|e| ApiError::Parse(format!("live payload is not a JSON object: {}", e)))?;

    Ok(Snapshot::from_records(
        records
            .into_iter()
            .map(|(id, value)| parse_record(id, &value)),
    ))
}

/// Read one record. The map key is authoritative for the id.
pub fn parse_record(id: String, value: &Value) -> ToteRecord {
    let Some(fields) = value.as_object() else {
        return ToteRecord::new(id, ToteStatus::Normal);
    };
    let field = |names: &[&str]| names.iter().find_map(|name| fields.get(*name));

    let temperature = field(&["temperature", "temp"]).and_then(as_number);
    let humidity = field(&["humidity"]).and_then(as_number);
    let lux = field(&["lux"]).and_then(as_number);

    let status = field(&["status"])
        .and_then(Value::as_str)
        .and_then(ToteStatus::parse)
        .unwrap_or_else(|| compute_status(temperature, humidity, lux));

    let name = field(&["name", "label"])
        .and_then(Value::as_str)
        .map(str::to_string);

    // `location` is either a description or an object carrying the position
    let (location_text, location_point) = match field(&["location"]) {
        Some(Value::String(text)) => (Some(text.clone()), None),
        Some(Value::Object(obj)) => {
            let text = ["label", "description", "name"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            let point = match (
                obj.get("lat").and_then(as_number),
                obj.get("lon").or_else(|| obj.get("lng")).and_then(as_number),
            ) {
                (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
                _ => None,
            };
            (text, point)
        }
        _ => (None, None),
    };
    let location = location_text
        .or_else(|| {
            field(&["location_label"])
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|text| !text.trim().is_empty());

    let coords = field(&["coords"])
        .and_then(Value::as_str)
        .and_then(GeoPoint::parse_pair)
        .or(location_point);

    let last_updated = field(&["lastUpdated", "timestamp", "last_updated"])
        .and_then(as_number)
        .filter(|ts| *ts >= 0.0);

    ToteRecord {
        id,
        name,
        status,
        temperature,
        humidity,
        lux,
        location,
        coords,
        last_updated,
    }
}

/// A finite number, given either as a JSON number or a numeric string.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}
