//! Ingest surface: the hierarchical dataset namespace and the catalog
//! loader built on it.
//!
//! The full snapshot reader lives outside this crate; what tree building
//! needs is a namespace with '/'-separated dataset and attribute lookups
//! plus the column layout `load_catalog` consumes.

use thiserror::Error;

use crate::model::{HaloId, SubhaloId};

mod loader;
mod store;

pub use loader::load_catalog;
pub use store::{Attribute, Dataset, DatasetStore, Group, Values};

/// Errors resolving the dataset namespace or assembling a catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    #[error("empty dataset path")]
    EmptyPath,

    #[error("group `{component}` not found while resolving `{path}`")]
    GroupNotFound { path: String, component: String },

    #[error("dataset `{path}` not found")]
    DatasetNotFound { path: String },

    #[error("attribute `{path}` not found")]
    AttributeNotFound { path: String },

    #[error("dataset `{path}` holds {actual} values, expected {expected}")]
    ColumnLength {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("dataset `{path}` has the wrong element type, expected {expected}")]
    ColumnType { path: String, expected: &'static str },

    #[error("dataset `{path}` holds value {value} outside the representable range")]
    ValueOutOfRange { path: String, value: i64 },

    #[error("subhalo {subhalo} names host halo {halo} which is not in the catalog")]
    UnknownHostHalo { subhalo: SubhaloId, halo: HaloId },
}
