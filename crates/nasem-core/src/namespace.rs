//! The variable namespace shared by all equations of one evaluation.
//!
//! Values are written exactly once. A second write to the same name is a wiring
//! defect and fails with [`NasemError::DuplicateWrite`].

use crate::amino_acids::AaSeries;
use crate::errors::{NasemError, NasemResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shape of a value stored in the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// A single float
    Scalar,
    /// One value per amino acid
    AminoAcids,
    /// One value per feed row of the ration
    PerFeed,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar => write!(f, "Scalar"),
            ValueKind::AminoAcids => write!(f, "AminoAcids"),
            ValueKind::PerFeed => write!(f, "PerFeed"),
        }
    }
}

/// A value held in the namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateValue {
    Scalar(f64),
    AminoAcids(AaSeries),
    PerFeed(Array1<f64>),
}

impl StateValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            StateValue::Scalar(_) => ValueKind::Scalar,
            StateValue::AminoAcids(_) => ValueKind::AminoAcids,
            StateValue::PerFeed(_) => ValueKind::PerFeed,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            StateValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&AaSeries> {
        match self {
            StateValue::AminoAcids(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_per_feed(&self) -> Option<&Array1<f64>> {
        match self {
            StateValue::PerFeed(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Scalar(value)
    }
}

impl From<AaSeries> for StateValue {
    fn from(value: AaSeries) -> Self {
        StateValue::AminoAcids(value)
    }
}

impl From<Array1<f64>> for StateValue {
    fn from(value: Array1<f64>) -> Self {
        StateValue::PerFeed(value)
    }
}

/// Write-once mapping from variable name to value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableNamespace {
    values: BTreeMap<String, StateValue>,
}

impl VariableNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value. `writer` names the component or input source for error reporting.
    pub fn set(&mut self, name: &str, value: StateValue, writer: &str) -> NasemResult<()> {
        if self.values.contains_key(name) {
            return Err(NasemError::DuplicateWrite {
                name: name.to_string(),
                writer: writer.to_string(),
            });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str, reader: &str) -> NasemResult<&StateValue> {
        self.values
            .get(name)
            .ok_or_else(|| NasemError::UndefinedVariable {
                name: name.to_string(),
                reader: reader.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Consume the namespace into an immutable snapshot.
    pub fn snapshot(self) -> NamespaceSnapshot {
        NamespaceSnapshot {
            values: self.values,
        }
    }
}

/// Immutable view of a finished evaluation, handed to reporting code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceSnapshot {
    values: BTreeMap<String, StateValue>,
}

impl NamespaceSnapshot {
    pub fn get(&self, name: &str) -> Option<&StateValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Look up a scalar value.
    pub fn scalar(&self, name: &str) -> NasemResult<f64> {
        let value = self.require(name)?;
        value
            .as_scalar()
            .ok_or_else(|| kind_mismatch(name, ValueKind::Scalar, value.kind()))
    }

    /// Look up an amino-acid series.
    pub fn series(&self, name: &str) -> NasemResult<&AaSeries> {
        let value = self.require(name)?;
        value
            .as_series()
            .ok_or_else(|| kind_mismatch(name, ValueKind::AminoAcids, value.kind()))
    }

    /// Look up a per-feed vector.
    pub fn per_feed(&self, name: &str) -> NasemResult<&Array1<f64>> {
        let value = self.require(name)?;
        value
            .as_per_feed()
            .ok_or_else(|| kind_mismatch(name, ValueKind::PerFeed, value.kind()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All scalar values, keyed by name.
    pub fn scalars(&self) -> BTreeMap<&str, f64> {
        self.values
            .iter()
            .filter_map(|(k, v)| v.as_scalar().map(|s| (k.as_str(), s)))
            .collect()
    }

    fn require(&self, name: &str) -> NasemResult<&StateValue> {
        self.values
            .get(name)
            .ok_or_else(|| NasemError::UndefinedVariable {
                name: name.to_string(),
                reader: "NamespaceSnapshot".to_string(),
            })
    }
}

pub(crate) fn kind_mismatch(name: &str, expected: ValueKind, found: ValueKind) -> NasemError {
    NasemError::ValueKindMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    }
}
