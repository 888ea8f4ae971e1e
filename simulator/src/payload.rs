//! Random sensor readings shaped like the tote firmware's reports.

use rand::Rng;
use shared::{DeviceLocation, GeoPoint, IotUpdate};

pub const TEMPERATURE_RANGE: (f64, f64) = (-10.0, 80.0);
pub const HUMIDITY_RANGE: (f64, f64) = (20.0, 95.0);
pub const LUX_MAX: u32 = 1200;
/// Maximum offset from the base point, in degrees
pub const JITTER_DEGREES: f64 = 0.02;

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// One reading for `tote_id` near `base`, stamped with `timestamp` seconds.
pub fn random_update<R: Rng + ?Sized>(
    rng: &mut R,
    tote_id: &str,
    base: GeoPoint,
    timestamp: f64,
) -> IotUpdate {
    let temperature = round_to(rng.gen_range(TEMPERATURE_RANGE.0..=TEMPERATURE_RANGE.1), 1);
    let humidity = round_to(rng.gen_range(HUMIDITY_RANGE.0..=HUMIDITY_RANGE.1), 1);
    let lux = rng.gen_range(0..=LUX_MAX);

    let lat = round_to(base.lat() + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES), 6);
    let lon = round_to(base.lon() + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES), 6);

    IotUpdate {
        tote_id: Some(tote_id.to_string()),
        temperature: Some(temperature),
        humidity: Some(humidity),
        lux: Some(f64::from(lux)),
        location: Some(DeviceLocation {
            lat: Some(lat),
            lon: Some(lon),
        }),
        timestamp: Some(timestamp),
        ..Default::default()
    }
}
