//! Configuration: parameter schema, validation and TOML loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Snapshot;

mod load;
mod schema;

pub use load::load_path;
pub use schema::{Config, CosmologyParams, ExecutionParams, GasCoolingParams, SimulationParams};

/// Configuration errors: unreadable or unparsable files and violated
/// parameter constraints.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("execution parameters name no output snapshots")]
    NoOutputSnapshots,

    #[error("simulation snapshot range is reversed: min {min} > max {max}")]
    SnapshotRangeReversed { min: Snapshot, max: Snapshot },

    #[error("omega_m must be positive, got {omega_m}")]
    NonPositiveOmegaMatter { omega_m: f64 },

    #[error("omega_b {omega_b} outside [0, omega_m = {omega_m}]")]
    BaryonDensityOutOfRange { omega_b: f64, omega_m: f64 },
}
