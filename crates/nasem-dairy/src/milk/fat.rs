//! Milk fat regression on digested fatty acids and absorbed Ile and Met

use nasem_core::component::EvaluationContext;
use nasem_core::errors::NasemResult;

/// Days in milk beyond which the lactation-stage term stays constant
pub const LACT_DAY_CAP: f64 = 375.0;

pub const MILK_FAT_COEFFICIENTS: [&str; 7] = [
    "mFat_Int",
    "mFat_k_LactDay",
    "mFat_k_DMIn_FA",
    "mFat_k_DigC160",
    "mFat_k_DigC183",
    "mFat_k_AbsIle",
    "mFat_k_AbsMet",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilkFatParameters {
    pub intercept: f64,
    pub k_lact_day: f64,
    pub k_dmi_non_fa: f64,
    pub k_dig_c160: f64,
    pub k_dig_c183: f64,
    pub k_abs_ile: f64,
    pub k_abs_met: f64,
}

impl MilkFatParameters {
    pub fn from_context(context: &EvaluationContext) -> NasemResult<Self> {
        Ok(Self {
            intercept: context.coefficient("mFat_Int")?,
            k_lact_day: context.coefficient("mFat_k_LactDay")?,
            k_dmi_non_fa: context.coefficient("mFat_k_DMIn_FA")?,
            k_dig_c160: context.coefficient("mFat_k_DigC160")?,
            k_dig_c183: context.coefficient("mFat_k_DigC183")?,
            k_abs_ile: context.coefficient("mFat_k_AbsIle")?,
            k_abs_met: context.coefficient("mFat_k_AbsMet")?,
        })
    }
}

/// Supply terms of the milk fat regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilkFatSupply {
    pub lact_day: f64,
    /// kg/d
    pub dmi: f64,
    /// kg/d
    pub fa_in: f64,
    /// kg/d
    pub dig_c160: f64,
    /// kg/d
    pub dig_c183: f64,
    /// g/d
    pub abs_ile: f64,
    /// g/d
    pub abs_met: f64,
}

/// Milk fat, g/d.
pub fn milk_fat_regression(params: &MilkFatParameters, supply: &MilkFatSupply) -> f64 {
    params.intercept
        + params.k_lact_day * supply.lact_day.min(LACT_DAY_CAP)
        + params.k_dmi_non_fa * (supply.dmi - supply.fa_in)
        + params.k_dig_c160 * supply.dig_c160 * 1000.0
        + params.k_dig_c183 * supply.dig_c183 * 1000.0
        + params.k_abs_ile * supply.abs_ile
        + params.k_abs_met * supply.abs_met
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::default_coefficients;
    use nasem_core::amino_acids::AminoAcid;

    fn supply(lact_day: f64) -> MilkFatSupply {
        MilkFatSupply {
            lact_day,
            dmi: 25.0,
            fa_in: 0.9,
            dig_c160: 0.2,
            dig_c183: 0.05,
            abs_ile: 140.0,
            abs_met: 60.0,
        }
    }

    #[test]
    fn test_lactation_day_is_capped() {
        let coefficients = default_coefficients();
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);
        let params = MilkFatParameters::from_context(&context).unwrap();
        assert_eq!(
            milk_fat_regression(&params, &supply(375.0)),
            milk_fat_regression(&params, &supply(500.0))
        );
        assert!(
            milk_fat_regression(&params, &supply(100.0)) > milk_fat_regression(&params, &supply(300.0))
        );
    }
}
