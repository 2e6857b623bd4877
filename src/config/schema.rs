//! Parameter structs consumed by the build pipeline.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::model::Snapshot;

/// Aggregate configuration, one section per parameter group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationParams,
    pub execution: ExecutionParams,
    pub gas_cooling: GasCoolingParams,
    pub cosmology: CosmologyParams,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.execution.validate()?;
        self.cosmology.validate()?;
        Ok(())
    }
}

/// Snapshot extent of the underlying N-body simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub min_snapshot: Snapshot,
    pub max_snapshot: Snapshot,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            min_snapshot: Snapshot::new(0),
            max_snapshot: Snapshot::new(0),
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_snapshot > self.max_snapshot {
            return Err(ConfigError::SnapshotRangeReversed {
                min: self.min_snapshot,
                max: self.max_snapshot,
            });
        }
        Ok(())
    }
}

/// Knobs controlling a single build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionParams {
    /// Snapshots requested for output. The first element is the terminal
    /// snapshot at which trees are seeded.
    pub output_snapshots: Vec<Snapshot>,
    /// Overwrite descendant masses so halos never shrink.
    pub ensure_mass_growth: bool,
    /// Treat an unresolvable descendant subhalo as prunable instead of an
    /// error.
    pub skip_missing_descendants: bool,
    /// Emit a warning for every skipped missing descendant.
    pub warn_on_missing_descendants: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            output_snapshots: Vec::new(),
            ensure_mass_growth: true,
            skip_missing_descendants: false,
            warn_on_missing_descendants: true,
        }
    }
}

impl ExecutionParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_snapshots.is_empty() {
            return Err(ConfigError::NoOutputSnapshots);
        }
        Ok(())
    }

    /// The snapshot at which trees are rooted.
    pub fn terminal_snapshot(&self) -> Option<Snapshot> {
        self.output_snapshots.first().copied()
    }
}

/// Gas cooling parameters. Only the accretion cap lives here; it is
/// carried through to the accretion stage but the cap is currently
/// disabled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GasCoolingParams {
    pub max_fractional_accreted_mass: f64,
}

impl Default for GasCoolingParams {
    fn default() -> Self {
        Self {
            max_fractional_accreted_mass: 1.0,
        }
    }
}

/// Density parameters defining the background cosmology.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmologyParams {
    pub omega_m: f64,
    pub omega_b: f64,
    pub omega_lambda: f64,
    pub hubble_h: f64,
}

impl Default for CosmologyParams {
    fn default() -> Self {
        // Planck 2015 values.
        Self {
            omega_m: 0.3121,
            omega_b: 0.0491,
            omega_lambda: 0.6879,
            hubble_h: 0.6751,
        }
    }
}

impl CosmologyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.omega_m <= 0.0 {
            return Err(ConfigError::NonPositiveOmegaMatter {
                omega_m: self.omega_m,
            });
        }
        if self.omega_b < 0.0 || self.omega_b > self.omega_m {
            return Err(ConfigError::BaryonDensityOutOfRange {
                omega_b: self.omega_b,
                omega_m: self.omega_m,
            });
        }
        Ok(())
    }
}
