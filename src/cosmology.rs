//! Cosmology: the narrow interface the tree builder needs.
//!
//! The full cosmology machinery (distances, growth factors, tables) lives
//! outside this crate; tree construction only consumes the universal
//! baryon fraction derived from the density parameters.

use crate::config::{ConfigError, CosmologyParams};

/// Validated cosmology derived from density parameters.
#[derive(Clone, Debug)]
pub struct Cosmology {
    params: CosmologyParams,
}

impl Cosmology {
    pub fn new(params: CosmologyParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CosmologyParams {
        &self.params
    }

    /// Ratio of baryonic to total matter density, `omega_b / omega_m`.
    pub fn universal_baryon_fraction(&self) -> f64 {
        self.params.omega_b / self.params.omega_m
    }
}

impl Default for Cosmology {
    fn default() -> Self {
        Self {
            params: CosmologyParams::default(),
        }
    }
}
