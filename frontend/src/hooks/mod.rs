//! Custom Yew hooks for the frontend application.

mod use_live_dashboard;

pub use use_live_dashboard::{use_live_dashboard, DashboardEngine, SharedEngine, UseLiveDashboard};
