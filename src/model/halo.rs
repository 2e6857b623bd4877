//! Halos: snapshot-level dark-matter structures hosting subhalos.

use std::fmt;

use super::identity::{HaloId, Snapshot, TreeId};
use super::subhalo::Vec3;
use super::tree::{HaloIdx, SubhaloIdx};

/// A dark-matter halo at one snapshot.
///
/// A halo owns the membership of its subhalos, partitioned into at most one
/// central and any number of satellites. Ascendant/descendant edges and the
/// owning-tree back-reference are installed by the build pipeline.
#[derive(Clone, Debug)]
pub struct Halo {
    pub id: HaloId,
    pub snapshot: Snapshot,
    /// Virial mass.
    pub mvir: f64,
    /// Virial velocity.
    pub vvir: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub concentration: f64,
    /// Spin parameter.
    pub lambda: f64,

    pub(crate) central_subhalo: Option<SubhaloIdx>,
    pub(crate) satellite_subhalos: Vec<SubhaloIdx>,
    pub(crate) ascendants: Vec<HaloIdx>,
    pub(crate) descendant: Option<HaloIdx>,
    pub(crate) tree: Option<TreeId>,
}

impl Halo {
    /// A halo with zeroed physical state, to be filled in by the ingest
    /// layer.
    pub fn new(id: HaloId, snapshot: Snapshot) -> Self {
        Self {
            id,
            snapshot,
            mvir: 0.0,
            vvir: 0.0,
            position: [0.0; 3],
            velocity: [0.0; 3],
            concentration: 0.0,
            lambda: 0.0,
            central_subhalo: None,
            satellite_subhalos: Vec::new(),
            ascendants: Vec::new(),
            descendant: None,
            tree: None,
        }
    }

    /// The central subhalo, once one has been defined.
    pub fn central_subhalo(&self) -> Option<SubhaloIdx> {
        self.central_subhalo
    }

    /// Satellite subhalos in membership order.
    pub fn satellite_subhalos(&self) -> &[SubhaloIdx] {
        &self.satellite_subhalos
    }

    /// All subhalos of this halo: the central first (when defined), then
    /// the satellites in membership order.
    pub fn all_subhalos(&self) -> impl Iterator<Item = SubhaloIdx> + '_ {
        self.central_subhalo
            .into_iter()
            .chain(self.satellite_subhalos.iter().copied())
    }

    pub fn subhalo_count(&self) -> usize {
        usize::from(self.central_subhalo.is_some()) + self.satellite_subhalos.len()
    }

    /// Progenitor halos at earlier snapshots, de-duplicated, in linking
    /// order.
    pub fn ascendants(&self) -> &[HaloIdx] {
        &self.ascendants
    }

    /// Resolved descendant halo at the next snapshot.
    pub fn descendant(&self) -> Option<HaloIdx> {
        self.descendant
    }

    /// The merger tree this halo belongs to, once assigned.
    pub fn merger_tree(&self) -> Option<TreeId> {
        self.tree
    }

    /// Insert an ascendant, keeping the list de-duplicated. Returns whether
    /// the halo was newly inserted.
    pub(crate) fn insert_ascendant(&mut self, asc: HaloIdx) -> bool {
        if self.ascendants.contains(&asc) {
            false
        } else {
            self.ascendants.push(asc);
            true
        }
    }

    /// Drop a subhalo from this halo's membership lists. Returns whether it
    /// was present.
    pub(crate) fn remove_subhalo(&mut self, sub: SubhaloIdx) -> bool {
        if self.central_subhalo == Some(sub) {
            self.central_subhalo = None;
            return true;
        }
        if let Some(pos) = self.satellite_subhalos.iter().position(|&s| s == sub) {
            self.satellite_subhalos.remove(pos);
            return true;
        }
        false
    }

    /// Remove a subhalo from the satellite list only. Returns whether it
    /// was present.
    pub(crate) fn remove_satellite(&mut self, sub: SubhaloIdx) -> bool {
        if let Some(pos) = self.satellite_subhalos.iter().position(|&s| s == sub) {
            self.satellite_subhalos.remove(pos);
            true
        } else {
            false
        }
    }
}

impl fmt::Display for Halo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "halo {} at snapshot {}", self.id, self.snapshot)
    }
}
