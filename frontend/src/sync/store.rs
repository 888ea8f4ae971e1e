//! Single-owner holder of the last installed snapshot.

use shared::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct StateStore {
    current: Snapshot,
    generation: u64,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a complete snapshot, returning its generation. Readers see
    /// either the old or the new snapshot, never a blend.
    pub fn replace(&mut self, snapshot: Snapshot) -> u64 {
        self.current = snapshot;
        self.generation += 1;
        self.generation
    }

    /// Latest installed snapshot; empty until the first successful poll.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// 0 until the first replace
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
