//! Named biological coefficients.
//!
//! A [`CoefficientSet`] is an immutable mapping from coefficient name to value.
//! Overrides never mutate a set in place; they derive a new one, so a single base
//! set can be shared read-only between many concurrent evaluations.
//!
//! Per-amino-acid coefficients are stored under templated names such as
//! `MiTPLysProf`. Equations never build these names themselves: they ask for an
//! [`AaCoefficient`] and receive a typed [`AaSeries`].

use crate::amino_acids::{AaSeries, AminoAcid};
use crate::errors::{NasemError, NasemResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A family of per-amino-acid coefficients sharing one name template.
///
/// The template contains `{AA}` where the amino-acid abbreviation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AaCoefficient(pub &'static str);

impl AaCoefficient {
    pub fn template(&self) -> &'static str {
        self.0
    }

    /// The concrete coefficient names for every amino acid in `order`.
    pub fn names(&self, order: &[AminoAcid]) -> Vec<String> {
        order.iter().map(|aa| aa.expand(self.0)).collect()
    }
}

/// An immutable set of named coefficients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientSet {
    values: BTreeMap<String, f64>,
}

impl CoefficientSet {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    /// Build a set from a static `(name, value)` table.
    pub fn from_table(table: &[(&str, f64)]) -> Self {
        Self {
            values: table
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    /// Parse a complete set from a TOML document of `name = value` pairs.
    pub fn from_toml_str(document: &str) -> NasemResult<Self> {
        let values: BTreeMap<String, f64> =
            toml::from_str(document).map_err(|e| NasemError::Config(e.to_string()))?;
        Ok(Self { values })
    }

    /// Parse a TOML document and overlay it onto `defaults`.
    ///
    /// Keys absent from `defaults` are accepted but logged, since they are
    /// usually a misspelt coefficient name.
    pub fn from_toml_str_with_defaults(document: &str, defaults: &CoefficientSet) -> NasemResult<Self> {
        let overlay = Self::from_toml_str(document)?;
        Ok(defaults.with_overrides(overlay.values))
    }

    /// Parse a complete set from a JSON object of `name: value` pairs.
    pub fn from_json_str(document: &str) -> NasemResult<Self> {
        let values: BTreeMap<String, f64> =
            serde_json::from_str(document).map_err(|e| NasemError::Config(e.to_string()))?;
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Look up a single coefficient.
    pub fn get(&self, name: &str) -> NasemResult<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| NasemError::MissingCoefficient {
                names: vec![name.to_string()],
            })
    }

    /// Check that every name in `names` is present.
    ///
    /// The error lists all missing names, sorted, not just the first.
    pub fn require<S: AsRef<str>>(&self, names: &[S]) -> NasemResult<()> {
        let mut missing: Vec<String> = names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| !self.values.contains_key(*n))
            .map(|n| n.to_string())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        missing.dedup();
        Err(NasemError::MissingCoefficient { names: missing })
    }

    /// Resolve a per-amino-acid coefficient family into a series.
    pub fn per_aa(&self, coefficient: AaCoefficient, order: &[AminoAcid]) -> NasemResult<AaSeries> {
        let names = coefficient.names(order);
        self.require(&names)?;
        AaSeries::try_from_fn(order, |aa| self.get(&aa.expand(coefficient.template())))
    }

    /// Derive a new set with one value replaced or added.
    pub fn with_override(&self, name: &str, value: f64) -> Self {
        self.with_overrides([(name.to_string(), value)])
    }

    /// Derive a new set with several values replaced or added.
    pub fn with_overrides<I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut values = self.values.clone();
        for (name, value) in overrides {
            if !values.contains_key(&name) {
                warn!("Coefficient override '{name}' is not part of the base set");
            }
            values.insert(name, value);
        }
        Self { values }
    }

    /// Derive a new set with one coefficient removed.
    pub fn without(&self, name: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(name);
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CoefficientSet {
        CoefficientSet::from_table(&[("En_CP", 5.65), ("En_FA", 9.4), ("MiTPArgProf", 5.47)])
    }

    #[test]
    fn test_require_lists_all_missing() {
        let set = base();
        let err = set.require(&["En_CP", "Zeta", "Alpha"]).unwrap_err();
        assert_eq!(
            err,
            NasemError::MissingCoefficient {
                names: vec!["Alpha".to_string(), "Zeta".to_string()]
            }
        );
        assert!(set.require(&["En_CP", "En_FA"]).is_ok());
    }

    #[test]
    fn test_override_derives_new_set() {
        let set = base();
        let derived = set.with_override("En_CP", 6.0);
        assert_eq!(set.get("En_CP").unwrap(), 5.65);
        assert_eq!(derived.get("En_CP").unwrap(), 6.0);
        assert_eq!(derived.get("En_FA").unwrap(), 9.4);
    }

    #[test]
    fn test_without() {
        let set = base().without("En_FA");
        assert!(!set.contains("En_FA"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_per_aa_reports_missing_names() {
        let set = base();
        let err = set
            .per_aa(AaCoefficient("MiTP{AA}Prof"), &[AminoAcid::Arg, AminoAcid::His])
            .unwrap_err();
        assert_eq!(
            err,
            NasemError::MissingCoefficient {
                names: vec!["MiTPHisProf".to_string()]
            }
        );

        let series = set
            .per_aa(AaCoefficient("MiTP{AA}Prof"), &[AminoAcid::Arg])
            .unwrap();
        assert_eq!(series.get(AminoAcid::Arg), Some(5.47));
    }

    #[test]
    fn test_toml_overlay() {
        let doc = r#"
            En_CP = 5.5
            Extra = 1.0
        "#;
        let set = CoefficientSet::from_toml_str_with_defaults(doc, &base()).unwrap();
        assert_eq!(set.get("En_CP").unwrap(), 5.5);
        assert_eq!(set.get("En_FA").unwrap(), 9.4);
        assert_eq!(set.get("Extra").unwrap(), 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let set = base();
        let json = serde_json::to_string(&set).unwrap();
        let parsed = CoefficientSet::from_json_str(&json).unwrap();
        assert_eq!(set, parsed);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            CoefficientSet::from_toml_str("En_CP = \"high\""),
            Err(NasemError::Config(_))
        ));
    }
}
