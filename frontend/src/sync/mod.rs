//! Snapshot synchronization: the state store, the poll/render engine and
//! the HTTP calls that feed it.

pub mod engine;
pub mod fetcher;
pub mod store;

pub use engine::{DashboardView, PollOutcome, PollTicket, PollTrigger, SyncEngine};
pub use store::StateStore;
