//! Merger trees and the arena handles used for non-owning edges.

use std::collections::BTreeMap;
use std::fmt;

use super::halo::Halo;
use super::identity::{Snapshot, TreeId};
use super::subhalo::Subhalo;

/// Non-owning handle to a halo within an arena.
///
/// Handles address the staging catalog while trees are being linked, and a
/// tree's private arena afterwards; tree adoption rewrites every stored
/// handle when entities move between the two.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HaloIdx(usize);

impl HaloIdx {
    pub(crate) const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// Non-owning handle to a subhalo within an arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SubhaloIdx(usize);

impl SubhaloIdx {
    pub(crate) const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// A merger tree: the connected set of halos reachable backward in time
/// from one terminal-snapshot halo.
///
/// The tree owns its halos and subhalos outright; all handles stored on the
/// entities are local to these arenas. Disjoint ownership is what lets the
/// post-link build stages run one worker per tree without sharing.
#[derive(Clone, Debug)]
pub struct MergerTree {
    id: TreeId,
    halos: Vec<Halo>,
    subhalos: Vec<Subhalo>,
    halos_by_snapshot: BTreeMap<Snapshot, Vec<HaloIdx>>,
}

impl MergerTree {
    pub(crate) fn from_parts(
        id: TreeId,
        halos: Vec<Halo>,
        subhalos: Vec<Subhalo>,
        halos_by_snapshot: BTreeMap<Snapshot, Vec<HaloIdx>>,
    ) -> Self {
        Self {
            id,
            halos,
            subhalos,
            halos_by_snapshot,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn halo_count(&self) -> usize {
        self.halos.len()
    }

    pub fn subhalo_count(&self) -> usize {
        self.subhalos.len()
    }

    /// Snapshots at which this tree has halos, ascending.
    pub fn snapshots(&self) -> impl DoubleEndedIterator<Item = Snapshot> + '_ {
        self.halos_by_snapshot.keys().copied()
    }

    /// Halos at one snapshot, in the order they joined the tree.
    pub fn halos_at(&self, snapshot: Snapshot) -> &[HaloIdx] {
        self.halos_by_snapshot
            .get(&snapshot)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All (snapshot, halos) buckets, ascending in snapshot.
    pub fn halos_by_snapshot(&self) -> impl Iterator<Item = (Snapshot, &[HaloIdx])> {
        self.halos_by_snapshot
            .iter()
            .map(|(snapshot, halos)| (*snapshot, halos.as_slice()))
    }

    pub fn halo(&self, idx: HaloIdx) -> &Halo {
        &self.halos[idx.index()]
    }

    pub fn subhalo(&self, idx: SubhaloIdx) -> &Subhalo {
        &self.subhalos[idx.index()]
    }

    pub(crate) fn halo_mut(&mut self, idx: HaloIdx) -> &mut Halo {
        &mut self.halos[idx.index()]
    }

    pub(crate) fn subhalo_mut(&mut self, idx: SubhaloIdx) -> &mut Subhalo {
        &mut self.subhalos[idx.index()]
    }

    /// Handles of all halos in the tree, snapshot-ascending then bucket
    /// order.
    pub fn halo_handles(&self) -> impl Iterator<Item = HaloIdx> + '_ {
        self.halos_by_snapshot.values().flatten().copied()
    }
}

impl fmt::Display for MergerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "merger tree {} ({} halos)", self.id, self.halos.len())
    }
}
