//! Merger-tree construction for semi-analytic galaxy formation.
//!
//! Given a catalog of dark-matter halos identified at discrete simulation
//! snapshots, each hosting one or more subhalos annotated with nominal
//! descendant identifiers, this crate stitches the population into a forest
//! of merger trees:
//!
//! 1. Seed one tree per halo at the terminal output snapshot.
//! 2. Link every subhalo to its descendant, installing bidirectional
//!    ascendant/descendant edges at both halo and subhalo granularity and
//!    propagating tree membership back in time.
//! 3. Verify that every tree is self-contained.
//! 4. Optionally enforce monotonic halo mass growth along descendant chains.
//! 5. Promote one subhalo per halo to central along main-progenitor branches.
//! 6. Compute per-halo baryonic accretion from dark-matter growth and
//!    accumulate the global baryon budget.
//!
//! Stages after linking run in parallel, one worker task per tree; trees own
//! their halos (and halos their subhalos), so workers never share mutable
//! state.
//!
//! ```no_run
//! use halotree::{Cosmology, ExecutionParams, HaloCatalog, SimulationParams,
//!                GasCoolingParams, TotalBaryon, TreeBuilder};
//!
//! # fn catalog() -> HaloCatalog { HaloCatalog::new() }
//! let exec = ExecutionParams::default();
//! let sim = SimulationParams::default();
//! let cosmology = Cosmology::default();
//! let mut baryons = TotalBaryon::new();
//!
//! let builder = TreeBuilder::new(exec, 4);
//! let trees = builder
//!     .build(catalog(), &sim, &GasCoolingParams::default(), &cosmology, &mut baryons)
//!     .unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod build;
pub mod config;
pub mod cosmology;
pub mod error;
pub mod ingest;
pub mod model;
pub mod telemetry;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use build::{BuildError, ErrorKind, InvalidArgument, InvalidData, SubhaloNotFound, TreeBuilder};
pub use config::{
    Config, ConfigError, CosmologyParams, ExecutionParams, GasCoolingParams, SimulationParams,
};
pub use cosmology::Cosmology;
pub use ingest::{Attribute, Dataset, DatasetStore, Group, IngestError, Values};
pub use model::{
    DescendantLink, Halo, HaloCatalog, HaloId, HaloIdx, MergerTree, Snapshot, Subhalo, SubhaloId,
    SubhaloIdx, SubhaloType, TotalBaryon, TreeId,
};
