//! In-memory hierarchical dataset namespace.
//!
//! Mirrors the layout a snapshot reader exposes: groups nest, datasets and
//! attributes hang off groups, and lookup paths use '/' separators. A path
//! without separators resolves at the top level; otherwise every
//! intermediate component names a group and the final component names the
//! dataset or attribute.

use std::collections::BTreeMap;

use super::IngestError;

/// One typed column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Float(v) => v.len(),
            Values::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named array of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Values,
}

impl Dataset {
    pub fn new(values: Values) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn floats(&self) -> Option<&[f64]> {
        match &self.values {
            Values::Float(v) => Some(v),
            Values::Int(_) => None,
        }
    }

    pub fn ints(&self) -> Option<&[i64]> {
        match &self.values {
            Values::Int(v) => Some(v),
            Values::Float(_) => None,
        }
    }
}

/// A scalar annotation attached somewhere in the namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Int(i64),
    Float(f64),
    Text(String),
}

/// A namespace node holding child groups, datasets and attributes.
#[derive(Debug, Clone, Default)]
pub struct Group {
    groups: BTreeMap<String, Group>,
    datasets: BTreeMap<String, Dataset>,
    attributes: BTreeMap<String, Attribute>,
}

impl Group {
    /// Child group with the given name, created when absent.
    pub fn group(&mut self, name: &str) -> &mut Group {
        self.groups.entry(name.to_string()).or_default()
    }

    pub fn set_dataset(&mut self, name: &str, values: Values) {
        self.datasets.insert(name.to_string(), Dataset::new(values));
    }

    pub fn set_attribute(&mut self, name: &str, attribute: Attribute) {
        self.attributes.insert(name.to_string(), attribute);
    }
}

/// The root of a hierarchical dataset namespace.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    root: Group,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&mut self) -> &mut Group {
        &mut self.root
    }

    /// Resolve a '/'-separated path to a dataset.
    pub fn get_dataset(&self, path: &str) -> Result<&Dataset, IngestError> {
        let (group, name) = self.resolve(path)?;
        group
            .datasets
            .get(name)
            .ok_or_else(|| IngestError::DatasetNotFound { path: path.into() })
    }

    /// Resolve a '/'-separated path to an attribute. Group-qualified
    /// attributes traverse the same way datasets do.
    pub fn get_attribute(&self, path: &str) -> Result<&Attribute, IngestError> {
        let (group, name) = self.resolve(path)?;
        group
            .attributes
            .get(name)
            .ok_or_else(|| IngestError::AttributeNotFound { path: path.into() })
    }

    /// Walk the intermediate components of a path, returning the group
    /// holding the final component and the component itself.
    fn resolve<'a, 'b>(&'a self, path: &'b str) -> Result<(&'a Group, &'b str), IngestError> {
        let components: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let Some((name, intermediate)) = components.split_last() else {
            return Err(IngestError::EmptyPath);
        };

        let mut group = &self.root;
        for component in intermediate {
            group = group.groups.get(*component).ok_or_else(|| {
                IngestError::GroupNotFound {
                    path: path.into(),
                    component: (*component).into(),
                }
            })?;
        }
        Ok((group, name))
    }
}
