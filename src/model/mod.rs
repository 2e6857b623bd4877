//! Entity model: halos, subhalos, merger trees and their identifiers.
//!
//! Module order follows ownership: identities are plain values, subhalos
//! are owned by halos, halos by the staging catalog before linking and by
//! their merger tree afterwards.

pub mod baryon;
pub mod catalog;
pub mod halo;
pub mod identity;
pub mod subhalo;
pub mod tree;

pub use baryon::TotalBaryon;
pub use catalog::HaloCatalog;
pub use halo::Halo;
pub use identity::{HaloId, Snapshot, SubhaloId, TreeId};
pub use subhalo::{DescendantLink, Subhalo, SubhaloType, Vec3};
pub use tree::{HaloIdx, MergerTree, SubhaloIdx};
