//! KPI tiles: per-status counts over the displayed subset.

use shared::{Snapshot, ToteStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kpis {
    pub total: usize,
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
    /// Totes reporting light (lid open); not part of the status buckets
    pub lux_active: usize,
}

impl Kpis {
    pub fn count(&self, status: ToteStatus) -> usize {
        match status {
            ToteStatus::Normal => self.normal,
            ToteStatus::Warning => self.warning,
            ToteStatus::Critical => self.critical,
        }
    }
}

/// Count the given ids per status. Ids missing from the snapshot are not
/// counted at all, so `normal + warning + critical == total` always holds.
pub fn aggregate(ids: &[String], snapshot: &Snapshot) -> Kpis {
    let mut kpis = Kpis::default();
    for record in ids.iter().filter_map(|id| snapshot.get(id)) {
        kpis.total += 1;
        match record.status {
            ToteStatus::Normal => kpis.normal += 1,
            ToteStatus::Warning => kpis.warning += 1,
            ToteStatus::Critical => kpis.critical += 1,
        }
        if record.lux.is_some_and(|lux| lux > 0.0) {
            kpis.lux_active += 1;
        }
    }
    kpis
}
