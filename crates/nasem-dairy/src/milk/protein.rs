//! Milk net protein from absorbed amino acids and digestible energy
//!
//! Each absorbed amino acid enters the regression as `k·AA + k2·AA²`, where
//! the quadratic coefficient `k2` is shared by a group of essential amino
//! acids. The herd's 305 d milk protein yield scales the maximum response
//! of every amino acid, and the linear coefficient is then re-derived so
//! the adjusted curve passes through the same value at 10 % of its vertex.

use crate::dispatch::MilkProteinEquation;
use crate::parameters::{NRC_MILK_PROTEIN, VT1_MILK_PROTEIN, VT2_MILK_PROTEIN};
use nasem_core::amino_acids::AaSeries;
use nasem_core::coefficients::AaCoefficient;
use nasem_core::component::{
    aa_coefficient_names, coefficient_names, Component, EvaluationContext, InputState,
    OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::ratio_or_zero;
use serde::{Deserialize, Serialize};

/// Reference 305 d milk true protein yield, kg
pub const REFERENCE_305RHA_MLKTP: f64 = 280.0;
/// Mean digestible NDF of the calibration data, % DM
pub const REFERENCE_DIG_NDF: f64 = 17.06;
/// Mean bodyweight of the calibration data, kg
pub const REFERENCE_BW: f64 = 612.0;

/// Per-AA regression coefficients of a milk protein coefficient family.
pub fn milk_protein_family(equation: MilkProteinEquation) -> AaCoefficient {
    match equation {
        MilkProteinEquation::Target | MilkProteinEquation::Nrc2021 => NRC_MILK_PROTEIN,
        MilkProteinEquation::Vt1 => VT1_MILK_PROTEIN,
        MilkProteinEquation::Vt2 => VT2_MILK_PROTEIN,
    }
}

/// Scale on the maximum response for the herd's rolling 305 d protein yield.
pub fn max_response_scale(rha_true_protein: f64, k_rha: f64) -> f64 {
    1.0 + k_rha * (rha_true_protein / REFERENCE_305RHA_MLKTP - 1.0)
}

/// Quadratic response of milk protein to one absorbed amino acid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AaResponse {
    /// Unadjusted maximum response, g/d
    pub max_response: f64,
    /// Maximum response after the 305 d yield scale, g/d
    pub scaled_max_response: f64,
    /// Absorbed AA at the vertex, g/d
    pub vertex: f64,
    /// Response at 10 % of the vertex, g/d
    pub response_at_tenth: f64,
    /// Adjusted linear coefficient
    pub slope: f64,
}

/// Derive the adjusted response for linear coefficient `k` and shared
/// quadratic coefficient `k2`.
///
/// The adjusted slope is zero when the vertex is zero or the adjusted curve
/// cannot pass through the 10 % point.
pub fn aa_response(k: f64, k2: f64, scale: f64) -> AaResponse {
    let max_response = ratio_or_zero(-k * k, 4.0 * k2);
    let scaled_max_response = max_response * scale;
    let vertex = ratio_or_zero(-k, 2.0 * k2);
    let tenth = 0.1 * vertex;
    let response_at_tenth = tenth * k + tenth * tenth * k2;

    let discriminant = scaled_max_response.powi(2) - response_at_tenth * scaled_max_response;
    let slope = if tenth == 0.0 || discriminant < 0.0 {
        0.0
    } else {
        -(2.0 * discriminant.sqrt() - 2.0 * scaled_max_response) / tenth
    };
    AaResponse {
        max_response,
        scaled_max_response,
        vertex,
        response_at_tenth,
        slope,
    }
}

/// Non-AA coefficients of one milk protein regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilkProteinParameters {
    pub intercept: f64,
    pub k_neaa: f64,
    pub k_other_aa: f64,
    pub k_eaa2: f64,
    pub k_de_in_protein_free: f64,
    pub k_dig_ndf: f64,
    pub k_de_starch_fa: f64,
    pub k_de_ndf: f64,
    pub k_bw: f64,
}

impl MilkProteinParameters {
    pub fn names(source: &str) -> Vec<String> {
        [
            "mPrt_Int",
            "mPrt_k_NEAA",
            "mPrt_k_OthAA",
            "mPrt_k_EAA2",
            "mPrt_k_DEInp",
            "mPrt_k_DigNDF",
            "mPrt_k_DEIn_StFA",
            "mPrt_k_DEIn_NDF",
            "mPrt_k_BW",
        ]
        .iter()
        .map(|name| format!("{name}_{source}"))
        .collect()
    }

    pub fn from_context(context: &EvaluationContext, source: &str) -> NasemResult<Self> {
        let get = |name: &str| context.coefficient(&format!("{name}_{source}"));
        Ok(Self {
            intercept: get("mPrt_Int")?,
            k_neaa: get("mPrt_k_NEAA")?,
            k_other_aa: get("mPrt_k_OthAA")?,
            k_eaa2: get("mPrt_k_EAA2")?,
            k_de_in_protein_free: get("mPrt_k_DEInp")?,
            k_dig_ndf: get("mPrt_k_DigNDF")?,
            k_de_starch_fa: get("mPrt_k_DEIn_StFA")?,
            k_de_ndf: get("mPrt_k_DEIn_NDF")?,
            k_bw: get("mPrt_k_BW")?,
        })
    }
}

/// Supply-side terms of the milk protein regression.
#[derive(Debug, Clone, PartialEq)]
pub struct MilkProteinSupply<'a> {
    pub absorbed_aa: &'a AaSeries,
    pub slopes: &'a AaSeries,
    pub neaa: f64,
    pub other_aa: f64,
    pub eaa2: f64,
    pub de_in_protein_free: f64,
    pub dig_ndf: f64,
    pub de_starch_fa: f64,
    pub de_ndf: f64,
    pub bw: f64,
}

/// Milk net protein, g/d.
pub fn milk_protein_regression(
    params: &MilkProteinParameters,
    supply: &MilkProteinSupply,
) -> NasemResult<f64> {
    Ok(params.intercept
        + supply.absorbed_aa.dot(supply.slopes)?
        + params.k_neaa * supply.neaa
        + params.k_other_aa * supply.other_aa
        + params.k_eaa2 * supply.eaa2
        + params.k_de_in_protein_free * supply.de_in_protein_free
        + params.k_dig_ndf * (supply.dig_ndf - REFERENCE_DIG_NDF)
        + params.k_de_starch_fa * supply.de_starch_fa
        + params.k_de_ndf * supply.de_ndf
        + params.k_bw * (supply.bw - REFERENCE_BW))
}

/// Adjusted per-AA coefficients of the selected milk protein family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxMilkProtein {
    equation: MilkProteinEquation,
}

impl MaxMilkProtein {
    pub fn new(equation: MilkProteinEquation) -> Self {
        Self { equation }
    }
}

#[typetag::serde]
impl Component for MaxMilkProtein {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_305RHA_MlkTP", "kg"),
            RequirementDefinition::scalar_output("f_mPrt_max", ""),
            RequirementDefinition::series_output("mPrtmx_AA", "g/d"),
            RequirementDefinition::series_output("mPrtmx_AA2", "g/d"),
            RequirementDefinition::series_output("AA_mPrtmx", "g/d"),
            RequirementDefinition::series_output("mPrt_AA_01", "g/d"),
            RequirementDefinition::series_output("mPrt_k_AA", ""),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        let source = self.equation.source();
        let mut names = aa_coefficient_names(milk_protein_family(self.equation));
        names.extend(coefficient_names(&["K_305RHA_MlkTP"]));
        names.push(format!("mPrt_k_EAA2_{source}"));
        names
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let scale = max_response_scale(
            input_state.scalar("An_305RHA_MlkTP")?,
            context.coefficient("K_305RHA_MlkTP")?,
        );
        let k2 = context.coefficient(&format!("mPrt_k_EAA2_{}", self.equation.source()))?;
        let linear = context.per_aa(milk_protein_family(self.equation))?;
        let field =
            |f: fn(&AaResponse) -> f64| linear.map(|_, k| f(&aa_response(k, k2, scale)));

        let mut output = OutputState::new();
        output
            .set_scalar("f_mPrt_max", scale)
            .set_series("mPrtmx_AA", field(|r| r.max_response))
            .set_series("mPrtmx_AA2", field(|r| r.scaled_max_response))
            .set_series("AA_mPrtmx", field(|r| r.vertex))
            .set_series("mPrt_AA_01", field(|r| r.response_at_tenth))
            .set_series("mPrt_k_AA", field(|r| r.slope));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::default_coefficients;
    use approx::assert_relative_eq;
    use nasem_core::amino_acids::AminoAcid;
    use nasem_core::namespace::StateValue;

    #[test]
    fn test_reference_herd_keeps_slope() {
        let response = aa_response(1.675, -0.00215, 1.0);
        assert_relative_eq!(response.vertex, 1.675 / 0.0043, max_relative = 1e-12);
        assert_relative_eq!(response.slope, 1.675, max_relative = 1e-9);
    }

    #[test]
    fn test_higher_herd_yield_raises_slope() {
        let base = aa_response(1.153, -0.00215, 1.0);
        let high = aa_response(1.153, -0.00215, max_response_scale(320.0, 1.0));
        assert!(high.slope > base.slope);
        assert!(high.scaled_max_response > high.max_response);
    }

    #[test]
    fn test_degenerate_responses_have_zero_slope() {
        // Zero linear coefficient puts the vertex at zero
        assert_eq!(aa_response(0.0, -0.00215, 1.0).slope, 0.0);
        // Zero quadratic coefficient
        assert_eq!(aa_response(1.0, 0.0, 1.0).slope, 0.0);
        // A scale low enough to make the discriminant negative
        let response = aa_response(1.675, -0.00215, 0.1);
        assert!(response.scaled_max_response < response.response_at_tenth);
        assert_eq!(response.slope, 0.0);
    }

    #[test]
    fn test_component_uses_selected_family() {
        let values: Vec<(&str, StateValue)> = vec![("An_305RHA_MlkTP", 280.0.into())];
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (*n, v)).collect();
        let input_state = InputState::build("MaxMilkProtein", refs);
        let coefficients = default_coefficients();
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);

        let nrc = MaxMilkProtein::new(MilkProteinEquation::Nrc2021)
            .solve(&input_state, &context)
            .unwrap();
        let slopes = nrc.series("mPrt_k_AA").unwrap();
        assert_eq!(slopes.get(AminoAcid::Arg), Some(0.0));
        assert_relative_eq!(slopes.get(AminoAcid::Met).unwrap(), 1.839, max_relative = 1e-9);

        let vt1 = MaxMilkProtein::new(MilkProteinEquation::Vt1)
            .solve(&input_state, &context)
            .unwrap();
        assert_relative_eq!(
            vt1.series("mPrt_k_AA").unwrap().get(AminoAcid::Arg).unwrap(),
            0.45,
            max_relative = 1e-9
        );
    }
}
