//! Amino-acid profiles and efficiencies
//!
//! Each table lists one value per amino acid in canonical order
//! (Arg, His, Ile, Leu, Lys, Met, Phe, Thr, Trp, Val) and is expanded into
//! the coefficient set under its name template.
//!
//! # Reference
//!
//! NASEM (2021) Nutrient Requirements of Dairy Cattle, 8th ed., chapter 6.

use nasem_core::amino_acids::AminoAcid;
use nasem_core::coefficients::AaCoefficient;

/// A per-amino-acid coefficient family with its default values.
pub struct AaTable {
    pub coefficient: AaCoefficient,
    pub values: [f64; 10],
}

impl AaTable {
    pub const fn new(coefficient: AaCoefficient, values: [f64; 10]) -> Self {
        Self {
            coefficient,
            values,
        }
    }

    /// Concrete coefficient names paired with their values.
    pub fn entries(&self) -> Vec<(String, f64)> {
        AminoAcid::ALL
            .iter()
            .zip(self.values.iter())
            .map(|(aa, &value)| (aa.expand(self.coefficient.template()), value))
            .collect()
    }
}

/// Microbial true protein composition
/// unit: g AA/100 g MiTP
pub const MICROBIAL_PROFILE: AaCoefficient = AaCoefficient("MiTP{AA}Prof");
/// Milk true protein composition
/// unit: g AA/100 g TP
pub const MILK_PROFILE: AaCoefficient = AaCoefficient("Mlk_{AA}_TP");
/// Body protein gain composition
pub const BODY_PROFILE: AaCoefficient = AaCoefficient("Body_{AA}_TP");
/// Gravid uterus protein composition
pub const GESTATION_PROFILE: AaCoefficient = AaCoefficient("Gest_{AA}_TP");
/// Scurf protein composition
pub const SCURF_PROFILE: AaCoefficient = AaCoefficient("Scrf_{AA}_TP");
/// Endogenous urinary AA loss per unit of urinary endogenous NP
pub const URINARY_ENDOGENOUS_PROFILE: AaCoefficient = AaCoefficient("Ur_{AA}End_TP");
/// Efficiency of converting absorbed AA to exported AA at the target
pub const TARGET_EFFICIENCY: AaCoefficient = AaCoefficient("Trg_Abs{AA}_NPxprtAA");

pub const NRC_MILK_PROTEIN: AaCoefficient = AaCoefficient("mPrt_k_{AA}_NRC");
pub const VT1_MILK_PROTEIN: AaCoefficient = AaCoefficient("mPrt_k_{AA}_VT1");
pub const VT2_MILK_PROTEIN: AaCoefficient = AaCoefficient("mPrt_k_{AA}_VT2");

pub fn default_tables() -> Vec<AaTable> {
    vec![
        AaTable::new(
            MICROBIAL_PROFILE,
            [5.47, 2.21, 6.99, 9.23, 9.44, 2.63, 6.30, 6.23, 1.37, 6.88],
        ),
        AaTable::new(
            MILK_PROFILE,
            [3.74, 2.92, 6.18, 10.56, 8.82, 3.03, 5.26, 4.62, 1.65, 6.90],
        ),
        AaTable::new(
            BODY_PROFILE,
            [8.20, 3.04, 3.69, 8.27, 7.90, 2.37, 4.41, 4.76, 1.27, 5.15],
        ),
        AaTable::new(
            GESTATION_PROFILE,
            [6.60, 2.76, 3.77, 7.11, 6.22, 1.85, 3.76, 4.14, 1.09, 4.72],
        ),
        AaTable::new(
            SCURF_PROFILE,
            [5.90, 1.76, 2.96, 6.93, 5.64, 1.40, 3.61, 4.01, 0.73, 4.66],
        ),
        AaTable::new(
            URINARY_ENDOGENOUS_PROFILE,
            [0.95, 1.72, 0.57, 0.92, 0.54, 0.26, 0.60, 0.79, 0.39, 0.72],
        ),
        AaTable::new(
            TARGET_EFFICIENCY,
            [0.58, 0.76, 0.71, 0.73, 0.72, 0.73, 0.60, 0.64, 0.86, 0.74],
        ),
        AaTable::new(
            NRC_MILK_PROTEIN,
            [0.0, 1.675, 0.885, 0.466, 1.153, 1.839, 0.0, 0.0, 0.0, 0.0],
        ),
        AaTable::new(
            VT1_MILK_PROTEIN,
            [0.45, 1.50, 0.81, 0.41, 1.05, 1.72, 0.0, 0.0, 0.0, 0.0],
        ),
        AaTable::new(
            VT2_MILK_PROTEIN,
            [0.0, 1.62, 0.86, 0.44, 1.10, 1.78, 0.0, 0.38, 0.0, 0.0],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_canonical_order() {
        let tables = default_tables();
        let microbial = tables
            .iter()
            .find(|t| t.coefficient == MICROBIAL_PROFILE)
            .unwrap();
        let entries = microbial.entries();
        assert_eq!(entries[0], ("MiTPArgProf".to_string(), 5.47));
        assert_eq!(entries[9], ("MiTPValProf".to_string(), 6.88));
    }

    #[test]
    fn test_templates_are_unique() {
        let tables = default_tables();
        for (i, a) in tables.iter().enumerate() {
            for b in tables.iter().skip(i + 1) {
                assert_ne!(a.coefficient, b.coefficient);
            }
        }
    }
}
