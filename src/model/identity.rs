//! Identity atoms: halo/subhalo/tree identifiers and snapshot indices.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Halo identifier. Opaque, unique across the whole simulation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HaloId(u64);

impl HaloId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HaloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HaloId({})", self.0)
    }
}

impl fmt::Display for HaloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subhalo identifier. Opaque, unique across the whole simulation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubhaloId(u64);

impl SubhaloId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SubhaloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubhaloId({})", self.0)
    }
}

impl fmt::Display for SubhaloId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merger-tree identifier: a dense counter in tree creation order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(usize);

impl TreeId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation snapshot index. Larger values are later cosmic times.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Snapshot(i32);

impl Snapshot {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// The snapshot directly after this one.
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The snapshot directly before this one.
    pub const fn prev(self) -> Self {
        Self(self.0 - 1)
    }

    /// Inclusive ascending range of snapshots. Empty when `min > max`.
    pub fn range_inclusive(min: Snapshot, max: Snapshot) -> impl DoubleEndedIterator<Item = Snapshot> {
        (min.0..=max.0).map(Snapshot)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
