//! Tile-free marker surface for the map panel.
//!
//! Markers are kept as plain data and projected (equirectangular) into
//! percentage offsets of the framed viewport, which the map component turns
//! into absolutely positioned pins.

use std::collections::BTreeMap;

use shared::{GeoPoint, ToteStatus};

use super::map::{GeoBounds, MarkerSurface};

/// Span used to frame a lone marker, in degrees
const MIN_SPAN_DEGREES: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(u32);

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub tote_id: String,
    pub at: GeoPoint,
    pub status: ToteStatus,
}

/// A marker projected into the viewport, in percent from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct PinPosition {
    pub tote_id: String,
    pub status: ToteStatus,
    pub left_pct: f64,
    pub top_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedMap {
    next_id: u32,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    viewport: Option<GeoBounds>,
}

impl ProjectedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<GeoBounds> {
        self.viewport
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Pins inside the current viewport. Nothing is drawn before the first
    /// fit.
    pub fn pins(&self) -> Vec<PinPosition> {
        let Some(view) = self.viewport else {
            return Vec::new();
        };
        let lat_span = (view.north - view.south).max(f64::EPSILON);
        let lon_span = (view.east - view.west).max(f64::EPSILON);

        self.markers
            .values()
            .map(|marker| PinPosition {
                tote_id: marker.tote_id.clone(),
                status: marker.status,
                left_pct: (marker.at.lon() - view.west) / lon_span * 100.0,
                top_pct: (view.north - marker.at.lat()) / lat_span * 100.0,
            })
            .filter(|pin| {
                (0.0..=100.0).contains(&pin.left_pct) && (0.0..=100.0).contains(&pin.top_pct)
            })
            .collect()
    }
}

impl MarkerSurface for ProjectedMap {
    type Handle = MarkerId;

    fn place(&mut self, tote_id: &str, at: GeoPoint, status: ToteStatus) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            PlacedMarker {
                tote_id: tote_id.to_string(),
                at,
                status,
            },
        );
        id
    }

    fn move_to(&mut self, handle: &MarkerId, at: GeoPoint) {
        if let Some(marker) = self.markers.get_mut(handle) {
            marker.at = at;
        }
    }

    fn restyle(&mut self, handle: &MarkerId, status: ToteStatus) {
        if let Some(marker) = self.markers.get_mut(handle) {
            marker.status = status;
        }
    }

    fn remove(&mut self, handle: MarkerId) {
        self.markers.remove(&handle);
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding: f64) {
        self.viewport = Some(bounds.padded(padding, MIN_SPAN_DEGREES));
    }
}
