//! Build errors (linking, consistency enforcement).
//!
//! Three capability families, mirroring how callers react: structural
//! violations in the inputs or the link graph, violated post-conditions
//! after central definition, and unresolvable descendant references.

use thiserror::Error;

use crate::model::{HaloId, Snapshot, SubhaloId, TreeId};

/// Structural violation in the inputs or during linking.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidData {
    #[error("execution parameters name no output snapshots, cannot choose a terminal snapshot")]
    NoOutputSnapshots,

    #[error(
        "no halo definitions found at terminal snapshot {terminal}, cannot proceed with merger \
         tree creation; halos found at snapshots {observed:?}, snapshots considered this run \
         {configured:?}"
    )]
    NoRootHalos {
        terminal: Snapshot,
        configured: Vec<Snapshot>,
        observed: Vec<Snapshot>,
    },

    #[error(
        "subhalo {descendant} at snapshot {descendant_snapshot} is not a direct descendant of \
         subhalo {subhalo} at snapshot {snapshot}"
    )]
    NotDirectDescendant {
        subhalo: SubhaloId,
        snapshot: Snapshot,
        descendant: SubhaloId,
        descendant_snapshot: Snapshot,
    },

    #[error(
        "subhalo {subhalo} already has descendant {existing}, but subhalo {claimed} is claiming \
         to be its descendant as well"
    )]
    SubhaloDescendantTaken {
        subhalo: SubhaloId,
        existing: SubhaloId,
        claimed: SubhaloId,
    },

    #[error(
        "halo {halo} already has descendant {existing}, but halo {claimed} is claiming to be its \
         descendant as well"
    )]
    HaloDescendantConflict {
        halo: HaloId,
        existing: HaloId,
        claimed: HaloId,
    },

    #[error("descendant halo {halo} has no merger tree associated to it")]
    UnassignedTree { halo: HaloId },

    #[error("halo {halo} does not have subhalo {subhalo} among its satellites")]
    NotASatellite { halo: HaloId, subhalo: SubhaloId },

    #[error("halo {halo} is not actually part of merger tree {tree}")]
    ForeignHalo { halo: HaloId, tree: TreeId },

    #[error("halo {halo} at snapshot {snapshot} has no subhalos")]
    NoSubhalos { halo: HaloId, snapshot: Snapshot },

    #[error("halo {halo} has no central subhalo when computing accretion")]
    MissingCentral { halo: HaloId },

    #[error("dangling {entity} handle while adopting halos into merger tree {tree}")]
    DanglingHandle { entity: &'static str, tree: TreeId },
}

/// Violated post-condition after central-subhalo definition.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidArgument {
    #[error("halo {halo} has no central subhalo at snapshot {snapshot}")]
    NoCentralSubhalo { halo: HaloId, snapshot: Snapshot },

    #[error("halo {halo} has more than 1 central subhalo at snapshot {snapshot}")]
    MultipleCentralSubhalos { halo: HaloId, snapshot: Snapshot },
}

/// A descendant subhalo reference that resolves to a halo but not to any
/// subhalo within it. Carries the missing id for caller inspection.
#[derive(Debug, Error, Clone)]
#[error(
    "descendant subhalo id={descendant_id} for subhalo {subhalo} (mass: {mvir:.4e}) not found in \
     the subhalo's descendant halo {descendant_halo}"
)]
pub struct SubhaloNotFound {
    pub subhalo: SubhaloId,
    pub mvir: f64,
    pub descendant_id: SubhaloId,
    pub descendant_halo: HaloId,
}

/// Taxonomy tag for [`BuildError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidData,
    InvalidArgument,
    SubhaloNotFound,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidData => "invalid_data",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::SubhaloNotFound => "subhalo_not_found",
        }
    }
}

/// Canonical error enum for tree building. All variants abort the build.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum BuildError {
    #[error(transparent)]
    InvalidData(#[from] InvalidData),

    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    #[error(transparent)]
    SubhaloNotFound(#[from] SubhaloNotFound),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::InvalidData(_) => ErrorKind::InvalidData,
            BuildError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            BuildError::SubhaloNotFound(_) => ErrorKind::SubhaloNotFound,
        }
    }
}
