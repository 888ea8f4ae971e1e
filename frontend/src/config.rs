//! Dashboard runtime configuration

use shared::AppConfig;

/// What the synchronization loop does while the label modal is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressionPolicy {
    /// Keep polling and installing snapshots, but do not recompute the
    /// cards/KPIs/map until the modal closes.
    #[default]
    WithholdView,
    /// Do not issue timer polls at all while the modal is open.
    SkipPoll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Interval between timer-driven polls
    pub poll_interval_ms: u32,
    /// Viewport margin around the framed markers, as a fraction of the
    /// marker span on each axis
    pub map_padding: f64,
    pub suppression: SuppressionPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            map_padding: 0.1,
            suppression: SuppressionPolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Apply server-provided settings. A zero interval is ignored.
    pub fn with_app_config(mut self, app: &AppConfig) -> Self {
        if app.poll_interval_secs > 0 {
            self.poll_interval_ms = app.poll_interval_secs.saturating_mul(1_000);
        }
        self
    }
}
