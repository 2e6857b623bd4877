//! Global baryon budget accumulator.

use std::collections::BTreeMap;

use super::identity::Snapshot;

/// Running totals of baryonic mass created over cosmic time, indexed by
/// snapshot. The build orchestrator zero-fills the snapshot range before
/// the accretion stage writes into it.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct TotalBaryon {
    baryon_total_created: BTreeMap<Snapshot, f64>,
}

impl TotalBaryon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the accumulator to zero over the inclusive snapshot range.
    pub fn zero_fill(&mut self, min: Snapshot, max: Snapshot) {
        self.baryon_total_created.clear();
        for snapshot in Snapshot::range_inclusive(min, max) {
            self.baryon_total_created.insert(snapshot, 0.0);
        }
    }

    pub(crate) fn record_created(&mut self, snapshot: Snapshot, total: f64) {
        self.baryon_total_created.insert(snapshot, total);
    }

    /// Total baryonic mass created up to and including `snapshot`.
    pub fn created_at(&self, snapshot: Snapshot) -> f64 {
        self.baryon_total_created
            .get(&snapshot)
            .copied()
            .unwrap_or(0.0)
    }

    /// All (snapshot, running total) entries, ascending in snapshot.
    pub fn created(&self) -> impl Iterator<Item = (Snapshot, f64)> + '_ {
        self.baryon_total_created
            .iter()
            .map(|(snapshot, total)| (*snapshot, *total))
    }
}
