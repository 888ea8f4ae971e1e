//! Map marker reconciliation.
//!
//! Keeps exactly one marker per geolocated tote on a [`MarkerSurface`],
//! using the smallest set of place/move/restyle/remove calls that brings the
//! surface in line with a new snapshot.

use indexmap::IndexMap;
use shared::{GeoPoint, Snapshot, ToteStatus};

/// Drawing capability the reconciler drives. Implemented by the map panel
/// and by test recorders.
pub trait MarkerSurface {
    type Handle;

    fn place(&mut self, tote_id: &str, at: GeoPoint, status: ToteStatus) -> Self::Handle;
    fn move_to(&mut self, handle: &Self::Handle, at: GeoPoint);
    fn restyle(&mut self, handle: &Self::Handle, status: ToteStatus);
    fn remove(&mut self, handle: Self::Handle);
    /// Frame `bounds`, widened by `padding` (fraction of the span per axis).
    fn fit_bounds(&mut self, bounds: GeoBounds, padding: f64);
}

/// Axis-aligned lat/lon box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box containing every point; `None` for no points.
    pub fn enclosing(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => GeoBounds {
                    south: p.lat(),
                    west: p.lon(),
                    north: p.lat(),
                    east: p.lon(),
                },
                Some(b) => GeoBounds {
                    south: b.south.min(p.lat()),
                    west: b.west.min(p.lon()),
                    north: b.north.max(p.lat()),
                    east: b.east.max(p.lon()),
                },
            })
        })
    }

    /// Widen by `padding` times the span on each axis. Degenerate spans
    /// (a single marker) are widened by `min_span` instead.
    pub fn padded(&self, padding: f64, min_span: f64) -> Self {
        let lat_pad = ((self.north - self.south) * padding).max(min_span / 2.0);
        let lon_pad = ((self.east - self.west) * padding).max(min_span / 2.0);
        GeoBounds {
            south: (self.south - lat_pad).max(-90.0),
            west: (self.west - lon_pad).max(-180.0),
            north: (self.north + lat_pad).min(90.0),
            east: (self.east + lon_pad).min(180.0),
        }
    }
}

/// What a reconcile pass changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub placed: usize,
    pub moved: usize,
    pub restyled: usize,
    pub removed: usize,
    pub refitted: bool,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        *self == ReconcileReport::default()
    }
}

struct TrackedMarker<H> {
    handle: H,
    at: GeoPoint,
    status: ToteStatus,
}

pub struct MapReconciler<S: MarkerSurface> {
    surface: S,
    markers: IndexMap<String, TrackedMarker<S::Handle>>,
    padding: f64,
    framed: Option<GeoBounds>,
}

impl<S: MarkerSurface> MapReconciler<S> {
    pub fn new(surface: S, padding: f64) -> Self {
        Self {
            surface,
            markers: IndexMap::new(),
            padding,
            framed: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Ids that currently have a marker, in placement order.
    pub fn tracked_ids(&self) -> impl Iterator<Item = &str> {
        self.markers.keys().map(String::as_str)
    }

    /// Bring the marker set in line with `snapshot`.
    pub fn reconcile(&mut self, snapshot: &Snapshot) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for record in snapshot.iter() {
            let Some(at) = record.coords else { continue };
            match self.markers.get_mut(&record.id) {
                Some(marker) => {
                    if marker.at != at {
                        self.surface.move_to(&marker.handle, at);
                        marker.at = at;
                        report.moved += 1;
                    }
                    if marker.status != record.status {
                        self.surface.restyle(&marker.handle, record.status);
                        marker.status = record.status;
                        report.restyled += 1;
                    }
                }
                None => {
                    let handle = self.surface.place(&record.id, at, record.status);
                    self.markers.insert(
                        record.id.clone(),
                        TrackedMarker {
                            handle,
                            at,
                            status: record.status,
                        },
                    );
                    report.placed += 1;
                }
            }
        }

        let orphaned: Vec<String> = self
            .markers
            .keys()
            .filter(|id| snapshot.get(id).and_then(|record| record.coords).is_none())
            .cloned()
            .collect();
        for id in orphaned {
            if let Some(marker) = self.markers.shift_remove(&id) {
                self.surface.remove(marker.handle);
                report.removed += 1;
            }
        }

        // An empty marker set leaves the viewport where it is
        if let Some(bounds) = GeoBounds::enclosing(self.markers.values().map(|m| m.at)) {
            if self.framed != Some(bounds) {
                self.surface.fit_bounds(bounds, self.padding);
                self.framed = Some(bounds);
                report.refitted = true;
            }
        }

        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::ToteRecord;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Op {
        Place(String, GeoPoint),
        Move(String, GeoPoint),
        Restyle(String, ToteStatus),
        Remove(String),
        Fit(GeoBounds),
    }

    /// Surface that records every call; the handle is the tote id.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub ops: Vec<Op>,
    }

    impl MarkerSurface for Recorder {
        type Handle = String;

        fn place(&mut self, tote_id: &str, at: GeoPoint, _status: ToteStatus) -> String {
            self.ops.push(Op::Place(tote_id.to_string(), at));
            tote_id.to_string()
        }

        fn move_to(&mut self, handle: &String, at: GeoPoint) {
            self.ops.push(Op::Move(handle.clone(), at));
        }

        fn restyle(&mut self, handle: &String, status: ToteStatus) {
            self.ops.push(Op::Restyle(handle.clone(), status));
        }

        fn remove(&mut self, handle: String) {
            self.ops.push(Op::Remove(handle));
        }

        fn fit_bounds(&mut self, bounds: GeoBounds, _padding: f64) {
            self.ops.push(Op::Fit(bounds));
        }
    }

    pub(crate) fn located(id: &str, status: ToteStatus, lat: f64, lon: f64) -> ToteRecord {
        let mut record = ToteRecord::new(id, status);
        record.coords = GeoPoint::new(lat, lon);
        record
    }

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn reconciler() -> MapReconciler<Recorder> {
        MapReconciler::new(Recorder::default(), 0.1)
    }

    fn marker_ops(reconciler: &MapReconciler<Recorder>) -> Vec<&Op> {
        reconciler
            .surface()
            .ops
            .iter()
            .filter(|op| !matches!(op, Op::Fit(_)))
            .collect()
    }

    #[test]
    fn places_only_geolocated_totes() {
        let snapshot = Snapshot::from_records(vec![
            located("A", ToteStatus::Critical, 40.1, -73.9),
            ToteRecord::new("B", ToteStatus::Normal),
        ]);
        let mut map = reconciler();
        let report = map.reconcile(&snapshot);

        assert_eq!(report.placed, 1);
        assert!(report.refitted);
        assert_eq!(map.tracked_ids().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn second_reconcile_with_same_snapshot_is_quiet() {
        let snapshot = Snapshot::from_records(vec![
            located("A", ToteStatus::Normal, 10.0, 10.0),
            located("B", ToteStatus::Warning, 11.0, 12.0),
        ]);
        let mut map = reconciler();
        map.reconcile(&snapshot);
        let ops_after_first = map.surface().ops.len();

        let report = map.reconcile(&snapshot);
        assert!(report.is_noop());
        assert_eq!(map.surface().ops.len(), ops_after_first);
    }

    #[test]
    fn changed_coordinates_move_the_existing_marker() {
        let mut map = reconciler();
        map.reconcile(&Snapshot::from_records(vec![located(
            "A",
            ToteStatus::Normal,
            10.0,
            10.0,
        )]));
        let before = map.surface().ops.len();

        let report = map.reconcile(&Snapshot::from_records(vec![located(
            "A",
            ToteStatus::Normal,
            20.0,
            20.0,
        )]));

        assert_eq!(report.moved, 1);
        assert_eq!(report.placed, 0);
        assert_eq!(report.removed, 0);
        let new_ops: Vec<_> = map.surface().ops[before..]
            .iter()
            .filter(|op| !matches!(op, Op::Fit(_)))
            .collect();
        assert_eq!(new_ops, vec![&Op::Move("A".to_string(), point(20.0, 20.0))]);
    }

    #[test]
    fn removes_vanished_and_delocated_totes() {
        let mut map = reconciler();
        map.reconcile(&Snapshot::from_records(vec![
            located("A", ToteStatus::Normal, 1.0, 1.0),
            located("B", ToteStatus::Normal, 2.0, 2.0),
            located("C", ToteStatus::Normal, 3.0, 3.0),
        ]));

        let report = map.reconcile(&Snapshot::from_records(vec![
            located("A", ToteStatus::Normal, 1.0, 1.0),
            ToteRecord::new("B", ToteStatus::Normal),
        ]));

        assert_eq!(report.removed, 2);
        assert_eq!(map.tracked_ids().collect::<Vec<_>>(), vec!["A"]);
        assert!(marker_ops(&map).contains(&&Op::Remove("B".to_string())));
        assert!(marker_ops(&map).contains(&&Op::Remove("C".to_string())));
    }

    #[test]
    fn status_change_restyles_without_moving() {
        let mut map = reconciler();
        map.reconcile(&Snapshot::from_records(vec![located(
            "A",
            ToteStatus::Normal,
            1.0,
            1.0,
        )]));
        let report = map.reconcile(&Snapshot::from_records(vec![located(
            "A",
            ToteStatus::Critical,
            1.0,
            1.0,
        )]));

        assert_eq!(report.restyled, 1);
        assert_eq!(report.moved, 0);
        assert!(!report.refitted);
    }

    #[test]
    fn empty_marker_set_leaves_viewport_alone() {
        let mut map = reconciler();
        map.reconcile(&Snapshot::from_records(vec![located(
            "A",
            ToteStatus::Normal,
            1.0,
            1.0,
        )]));
        let report = map.reconcile(&Snapshot::empty());

        assert_eq!(report.removed, 1);
        assert!(!report.refitted);
        assert!(matches!(map.surface().ops.last(), Some(Op::Remove(_))));
    }

    #[test]
    fn marker_ids_match_geolocated_ids_after_every_pass() {
        let snapshots = vec![
            Snapshot::from_records(vec![
                located("A", ToteStatus::Normal, 1.0, 1.0),
                ToteRecord::new("B", ToteStatus::Normal),
            ]),
            Snapshot::from_records(vec![
                located("B", ToteStatus::Warning, 5.0, 5.0),
                located("C", ToteStatus::Normal, 6.0, 6.0),
            ]),
            Snapshot::from_records(vec![ToteRecord::new("C", ToteStatus::Normal)]),
            Snapshot::from_records(vec![located("A", ToteStatus::Normal, 2.0, 2.0)]),
        ];

        let mut map = reconciler();
        for snapshot in &snapshots {
            map.reconcile(snapshot);
            let mut tracked: Vec<_> = map.tracked_ids().collect();
            let mut expected: Vec<_> = snapshot
                .iter()
                .filter(|r| r.coords.is_some())
                .map(|r| r.id.as_str())
                .collect();
            tracked.sort();
            expected.sort();
            assert_eq!(tracked, expected);
        }
    }

    #[test]
    fn bounds_enclose_and_pad() {
        let bounds = GeoBounds::enclosing(vec![point(10.0, 20.0), point(12.0, 24.0)]).unwrap();
        assert_eq!(
            bounds,
            GeoBounds {
                south: 10.0,
                west: 20.0,
                north: 12.0,
                east: 24.0
            }
        );
        let padded = bounds.padded(0.5, 0.0);
        assert_eq!(padded.south, 9.0);
        assert_eq!(padded.east, 26.0);

        let single = GeoBounds::enclosing(vec![point(10.0, 20.0)]).unwrap();
        let padded = single.padded(0.1, 0.02);
        assert!((padded.north - padded.south - 0.02).abs() < 1e-9);
        assert!(GeoBounds::enclosing(Vec::new()).is_none());
    }
}
