//! Subhalos: the bound substructures that carry galaxy-formation state.

use std::fmt;

use super::identity::{HaloId, Snapshot, SubhaloId};
use super::tree::{HaloIdx, SubhaloIdx};

/// A 3-vector of physical quantities (position, velocity, angular momentum).
pub type Vec3 = [f64; 3];

/// Role of a subhalo within its host halo.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubhaloType {
    Central,
    Satellite,
}

impl SubhaloType {
    pub fn as_str(self) -> &'static str {
        match self {
            SubhaloType::Central => "central",
            SubhaloType::Satellite => "satellite",
        }
    }
}

/// Nominal descendant reference produced by the halo finder.
///
/// Names the halo and subhalo the finder believes this subhalo evolves
/// into one snapshot later. Resolution into concrete edges is the linker's
/// job; until then these are just ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescendantLink {
    pub halo_id: HaloId,
    pub subhalo_id: SubhaloId,
}

/// A gravitationally bound substructure within a halo.
///
/// Physical quantities come straight from the halo finder and are public;
/// relationship fields are installed by the build pipeline and only
/// readable from outside the crate.
#[derive(Clone, Debug)]
pub struct Subhalo {
    pub id: SubhaloId,
    pub snapshot: Snapshot,
    /// Virial mass.
    pub mvir: f64,
    /// Virial velocity.
    pub vvir: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Angular momentum vector.
    pub l: Vec3,
    /// Spin parameter.
    pub lambda: f64,
    pub concentration: f64,
    /// Nominal descendant named by the halo finder, if any.
    pub descendant_link: Option<DescendantLink>,
    /// Whether the finder flagged this subhalo as the main progenitor of
    /// its descendant.
    pub main_progenitor: bool,
    /// Whether this subhalo was interpolated between finder detections.
    pub is_interpolated: bool,

    pub(crate) subhalo_type: SubhaloType,
    pub(crate) host: HaloIdx,
    pub(crate) ascendants: Vec<SubhaloIdx>,
    pub(crate) descendant: Option<SubhaloIdx>,
    pub(crate) last_snapshot_identified: Option<Snapshot>,
    pub(crate) accreted_mass: f64,
}

impl Subhalo {
    /// A subhalo with zeroed physical state, to be filled in by the ingest
    /// layer. The host handle is assigned when the subhalo is added to a
    /// catalog.
    pub fn new(id: SubhaloId, snapshot: Snapshot) -> Self {
        Self {
            id,
            snapshot,
            mvir: 0.0,
            vvir: 0.0,
            position: [0.0; 3],
            velocity: [0.0; 3],
            l: [0.0; 3],
            lambda: 0.0,
            concentration: 0.0,
            descendant_link: None,
            main_progenitor: false,
            is_interpolated: false,
            subhalo_type: SubhaloType::Satellite,
            host: HaloIdx::new(0),
            ascendants: Vec::new(),
            descendant: None,
            last_snapshot_identified: None,
            accreted_mass: 0.0,
        }
    }

    pub fn has_descendant(&self) -> bool {
        self.descendant_link.is_some()
    }

    pub fn subhalo_type(&self) -> SubhaloType {
        self.subhalo_type
    }

    /// Handle of the host halo, valid within the owning arena.
    pub fn host_halo(&self) -> HaloIdx {
        self.host
    }

    /// Progenitor subhalos at the previous snapshot, in linking order.
    pub fn ascendants(&self) -> &[SubhaloIdx] {
        &self.ascendants
    }

    /// Resolved descendant subhalo at the next snapshot.
    pub fn descendant(&self) -> Option<SubhaloIdx> {
        self.descendant
    }

    /// Last snapshot at which this subhalo was identified as a distinct
    /// structure; set for non-main progenitors during central definition.
    pub fn last_snapshot_identified(&self) -> Option<Snapshot> {
        self.last_snapshot_identified
    }

    /// Baryonic mass accreted onto this subhalo, set during the accretion
    /// stage for centrals.
    pub fn accreted_mass(&self) -> f64 {
        self.accreted_mass
    }
}

impl fmt::Display for Subhalo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subhalo {} at snapshot {}", self.id, self.snapshot)
    }
}
