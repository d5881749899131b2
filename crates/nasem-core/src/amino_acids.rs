//! The ten essential amino acids and AA-indexed series.
//!
//! Amino acid identity, not position, is the join key for every series operation.
//! An [`AaSeries`] keeps its values in whatever order they were inserted, and all
//! lookups and elementwise operations resolve values by [`AminoAcid`].
//! Reordering the internal storage therefore never changes which value is paired
//! with which amino acid.

use crate::errors::{NasemError, NasemResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the ten essential amino acids modelled by NASEM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AminoAcid {
    Arg,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Thr,
    Trp,
    Val,
}

impl AminoAcid {
    /// Canonical ordering: Arg, His, Ile, Leu, Lys, Met, Phe, Thr, Trp, Val
    pub const ALL: [AminoAcid; 10] = [
        AminoAcid::Arg,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Leu,
        AminoAcid::Lys,
        AminoAcid::Met,
        AminoAcid::Phe,
        AminoAcid::Thr,
        AminoAcid::Trp,
        AminoAcid::Val,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AminoAcid::Arg => "Arg",
            AminoAcid::His => "His",
            AminoAcid::Ile => "Ile",
            AminoAcid::Leu => "Leu",
            AminoAcid::Lys => "Lys",
            AminoAcid::Met => "Met",
            AminoAcid::Phe => "Phe",
            AminoAcid::Thr => "Thr",
            AminoAcid::Trp => "Trp",
            AminoAcid::Val => "Val",
        }
    }

    /// Expand a coefficient name template, replacing `{AA}` with this amino acid.
    ///
    /// `AminoAcid::Lys.expand("MiTP{AA}Prof")` gives `"MiTPLysProf"`.
    pub fn expand(&self, template: &str) -> String {
        template.replace("{AA}", self.name())
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AminoAcid {
    type Err = NasemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AminoAcid::ALL
            .iter()
            .copied()
            .find(|aa| aa.name() == s)
            .ok_or_else(|| NasemError::Config(format!("Unknown amino acid '{s}'")))
    }
}

/// A value per amino acid, keyed by [`AminoAcid`].
///
/// Values are stored in insertion order. Every amino acid appears at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AaSeries {
    values: Vec<(AminoAcid, f64)>,
}

impl AaSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self { values: vec![] }
    }

    /// Build a series by evaluating `f` for each amino acid in `order`.
    pub fn from_fn<F>(order: &[AminoAcid], mut f: F) -> Self
    where
        F: FnMut(AminoAcid) -> f64,
    {
        let mut series = AaSeries::new();
        for &aa in order {
            series.insert(aa, f(aa));
        }
        series
    }

    /// Build a series from a fallible per-AA function, stopping at the first error.
    pub fn try_from_fn<F>(order: &[AminoAcid], mut f: F) -> NasemResult<Self>
    where
        F: FnMut(AminoAcid) -> NasemResult<f64>,
    {
        let mut series = AaSeries::new();
        for &aa in order {
            series.insert(aa, f(aa)?);
        }
        Ok(series)
    }

    /// A series with the same value for every amino acid in `order`.
    pub fn constant(order: &[AminoAcid], value: f64) -> Self {
        Self::from_fn(order, |_| value)
    }

    /// Insert or replace the value for `aa`.
    pub fn insert(&mut self, aa: AminoAcid, value: f64) {
        match self.values.iter_mut().find(|(a, _)| *a == aa) {
            Some(slot) => slot.1 = value,
            None => self.values.push((aa, value)),
        }
    }

    pub fn get(&self, aa: AminoAcid) -> Option<f64> {
        self.values.iter().find(|(a, _)| *a == aa).map(|(_, v)| *v)
    }

    /// Like [`AaSeries::get`] but fails when `aa` is missing.
    pub fn require(&self, aa: AminoAcid, series_name: &str) -> NasemResult<f64> {
        self.get(aa).ok_or_else(|| NasemError::UndefinedVariable {
            name: format!("{series_name}[{aa}]"),
            reader: "AaSeries".to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Amino acids in storage order.
    pub fn amino_acids(&self) -> impl Iterator<Item = AminoAcid> + '_ {
        self.values.iter().map(|(aa, _)| *aa)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AminoAcid, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().map(|(_, v)| v).sum()
    }

    /// Sum over a subset of amino acids. Missing members contribute nothing.
    pub fn sum_of(&self, subset: &[AminoAcid]) -> f64 {
        self.values
            .iter()
            .filter(|(aa, _)| subset.contains(aa))
            .map(|(_, v)| v)
            .sum()
    }

    /// Sum of squared values over a subset of amino acids.
    pub fn sum_of_squares(&self, subset: &[AminoAcid]) -> f64 {
        self.values
            .iter()
            .filter(|(aa, _)| subset.contains(aa))
            .map(|(_, v)| v * v)
            .sum()
    }

    /// Apply `f` to every value.
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(AminoAcid, f64) -> f64,
    {
        Self {
            values: self.values.iter().map(|&(aa, v)| (aa, f(aa, v))).collect(),
        }
    }

    /// Combine two series elementwise, joining on amino acid.
    ///
    /// The result follows the storage order of `self`. Fails if `other` lacks an
    /// amino acid present in `self`.
    pub fn zip_with<F>(&self, other: &AaSeries, mut f: F) -> NasemResult<Self>
    where
        F: FnMut(AminoAcid, f64, f64) -> f64,
    {
        let mut values = Vec::with_capacity(self.values.len());
        for &(aa, a) in &self.values {
            let b = other.require(aa, "rhs")?;
            values.push((aa, f(aa, a, b)));
        }
        Ok(Self { values })
    }

    /// Elementwise fallible combination, joining on amino acid.
    pub fn try_zip_with<F>(&self, other: &AaSeries, mut f: F) -> NasemResult<Self>
    where
        F: FnMut(AminoAcid, f64, f64) -> NasemResult<f64>,
    {
        let mut values = Vec::with_capacity(self.values.len());
        for &(aa, a) in &self.values {
            let b = other.require(aa, "rhs")?;
            values.push((aa, f(aa, a, b)?));
        }
        Ok(Self { values })
    }

    pub fn add(&self, other: &AaSeries) -> NasemResult<Self> {
        self.zip_with(other, |_, a, b| a + b)
    }

    pub fn sub(&self, other: &AaSeries) -> NasemResult<Self> {
        self.zip_with(other, |_, a, b| a - b)
    }

    pub fn mul(&self, other: &AaSeries) -> NasemResult<Self> {
        self.zip_with(other, |_, a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map(|_, v| v * factor)
    }

    /// Dot product, joining on amino acid.
    pub fn dot(&self, other: &AaSeries) -> NasemResult<f64> {
        Ok(self.mul(other)?.sum())
    }

    /// Return the series in canonical order, which is convenient for display.
    pub fn canonical(&self) -> Self {
        let mut values = self.values.clone();
        values.sort_by_key(|(aa, _)| *aa);
        Self { values }
    }
}

/// Equality is by amino acid, independent of storage order.
impl PartialEq for AaSeries {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .all(|&(aa, v)| other.get(aa).map(|o| o == v).unwrap_or(false))
    }
}
