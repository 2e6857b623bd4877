//! The staging catalog: arena ownership of all ingested entities.
//!
//! The ingest layer fills a `HaloCatalog` in input order. The linker
//! resolves edges in place; tree adoption then moves every halo that
//! reached a tree (with its subhalos) out of the catalog. Entities left
//! behind are pruned branches and drop with the catalog.

use super::halo::Halo;
use super::identity::Snapshot;
use super::subhalo::Subhalo;
use super::tree::{HaloIdx, SubhaloIdx};

#[derive(Default, Debug)]
pub struct HaloCatalog {
    halos: Vec<Option<Halo>>,
    subhalos: Vec<Option<Subhalo>>,
    /// Halo handles in ingest order.
    order: Vec<HaloIdx>,
}

impl HaloCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a halo, returning its handle. Input order is preserved.
    pub fn add_halo(&mut self, halo: Halo) -> HaloIdx {
        let idx = HaloIdx::new(self.halos.len());
        self.halos.push(Some(halo));
        self.order.push(idx);
        idx
    }

    /// Add a subhalo to a host halo's satellite list, returning its handle.
    pub fn add_subhalo(&mut self, host: HaloIdx, mut subhalo: Subhalo) -> SubhaloIdx {
        let idx = SubhaloIdx::new(self.subhalos.len());
        subhalo.host = host;
        self.subhalos.push(Some(subhalo));
        self.halo_mut(host).satellite_subhalos.push(idx);
        idx
    }

    pub fn halo_count(&self) -> usize {
        self.order.len()
    }

    pub fn subhalo_count(&self) -> usize {
        self.subhalos.len()
    }

    /// Halo handles in ingest order. Handles stay valid after entities are
    /// taken; the slots just become empty.
    pub fn halos_in_order(&self) -> impl Iterator<Item = HaloIdx> + '_ {
        self.order.iter().copied()
    }

    /// Distinct snapshots present among the (remaining) halos, ascending.
    pub fn snapshots_present(&self) -> Vec<Snapshot> {
        let mut snapshots: Vec<Snapshot> = self
            .halos
            .iter()
            .flatten()
            .map(|halo| halo.snapshot)
            .collect();
        snapshots.sort_unstable();
        snapshots.dedup();
        snapshots
    }

    pub fn halo(&self, idx: HaloIdx) -> &Halo {
        self.halos[idx.index()]
            .as_ref()
            .expect("halo slot already vacated")
    }

    pub(crate) fn halo_mut(&mut self, idx: HaloIdx) -> &mut Halo {
        self.halos[idx.index()]
            .as_mut()
            .expect("halo slot already vacated")
    }

    pub fn subhalo(&self, idx: SubhaloIdx) -> &Subhalo {
        self.subhalos[idx.index()]
            .as_ref()
            .expect("subhalo slot already vacated")
    }

    pub(crate) fn subhalo_mut(&mut self, idx: SubhaloIdx) -> &mut Subhalo {
        self.subhalos[idx.index()]
            .as_mut()
            .expect("subhalo slot already vacated")
    }

    /// Move a halo out of its slot. `None` if already taken.
    pub(crate) fn take_halo(&mut self, idx: HaloIdx) -> Option<Halo> {
        self.halos[idx.index()].take()
    }

    /// Move a subhalo out of its slot. `None` if already taken.
    pub(crate) fn take_subhalo(&mut self, idx: SubhaloIdx) -> Option<Subhalo> {
        self.subhalos[idx.index()].take()
    }

    /// Detach a subhalo from its host halo's membership lists. The arena
    /// slot stays occupied; the subhalo just becomes unreachable.
    pub(crate) fn detach_subhalo(&mut self, host: HaloIdx, sub: SubhaloIdx) {
        self.halo_mut(host).remove_subhalo(sub);
    }
}
