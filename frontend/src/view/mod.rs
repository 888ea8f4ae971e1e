//! Pure projections from a snapshot to what the dashboard shows.
//!
//! - `filter`: status chip + search box selection
//! - `kpi`: per-status counts for the KPI strip
//! - `cards`: per-tote card descriptions
//! - `map`: marker reconciliation against a `MarkerSurface`
//! - `projected_map`: the surface the map panel draws from

pub mod cards;
pub mod filter;
pub mod kpi;
pub mod map;
pub mod projected_map;

pub use cards::ToteCard;
pub use filter::StatusFilter;
pub use kpi::Kpis;
pub use map::{GeoBounds, MapReconciler, MarkerSurface, ReconcileReport};
pub use projected_map::ProjectedMap;
