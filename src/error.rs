//! Crate-level convenience error.
//!
//! A thin wrapper over the canonical capability errors; callers that care
//! about the failure family match on the inner enums.

use thiserror::Error;

use crate::build::BuildError;
use crate::config::ConfigError;
use crate::ingest::IngestError;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}
