//! Metabolizable protein and absorbed amino acids
//!
//! Absorbed amino acids come from digested microbial protein, digested RUP
//! and post-ruminal infusions. Amino acids infused into the rumen are
//! degraded there and count only as degradable protein.

use nasem_core::amino_acids::{AaSeries, AminoAcid};
use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

/// Converts metabolizable protein to the mass of free amino acids
pub const MP_TO_AA: f64 = 1.15;

pub const HILKM: [AminoAcid; 5] = [
    AminoAcid::His,
    AminoAcid::Ile,
    AminoAcid::Leu,
    AminoAcid::Lys,
    AminoAcid::Met,
];
pub const RHILKM: [AminoAcid; 6] = [
    AminoAcid::Arg,
    AminoAcid::His,
    AminoAcid::Ile,
    AminoAcid::Leu,
    AminoAcid::Lys,
    AminoAcid::Met,
];
pub const HILKMT: [AminoAcid; 6] = [
    AminoAcid::His,
    AminoAcid::Ile,
    AminoAcid::Leu,
    AminoAcid::Lys,
    AminoAcid::Met,
    AminoAcid::Thr,
];

/// Essential amino acids outside the HILKM group
const OTHER_EAA: [AminoAcid; 5] = [
    AminoAcid::Arg,
    AminoAcid::Phe,
    AminoAcid::Thr,
    AminoAcid::Trp,
    AminoAcid::Val,
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AminoAcidAbsorption {}

impl AminoAcidAbsorption {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for AminoAcidAbsorption {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::series_input("Du_IdAAMic", "g/d"),
            RequirementDefinition::series_input("Dt_IdAARUPIn", "g/d"),
            RequirementDefinition::series_input("Inf_AA_g", "g/d"),
            RequirementDefinition::scalar_input("Inf_SI", ""),
            RequirementDefinition::scalar_input("Inf_Art", ""),
            RequirementDefinition::scalar_input("Du_idMiTP_g", "g/d"),
            RequirementDefinition::scalar_input("An_idRUPIn", "kg/d"),
            RequirementDefinition::scalar_input("Inf_ArtCPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
            RequirementDefinition::scalar_output("An_MPIn_g", "g/d"),
            RequirementDefinition::scalar_output("An_MPIn", "kg/d"),
            RequirementDefinition::scalar_output("An_MP", "% DM"),
            RequirementDefinition::series_output("Abs_AA_g", "g/d"),
            RequirementDefinition::series_output("Abs_AA_MPp", "% MP"),
            RequirementDefinition::scalar_output("Abs_EAA_g", "g/d"),
            RequirementDefinition::scalar_output("Abs_neAA_g", "g/d"),
            RequirementDefinition::scalar_output("Abs_OthAA_g", "g/d"),
            RequirementDefinition::scalar_output("Abs_EAA2_HILKM_g", "g^2/d"),
            RequirementDefinition::scalar_output("Abs_EAA2_RHILKM_g", "g^2/d"),
            RequirementDefinition::scalar_output("Abs_EAA2_HILKMT_g", "g^2/d"),
        ]
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let post_ruminal = input_state.scalar("Inf_SI")? + input_state.scalar("Inf_Art")?;
        let infused: AaSeries = input_state.series("Inf_AA_g")?.scale(post_ruminal);
        let abs_aa = input_state
            .series("Du_IdAAMic")?
            .add(input_state.series("Dt_IdAARUPIn")?)?
            .add(&infused)?;

        let mp_in_g = input_state.scalar("Du_idMiTP_g")?
            + (input_state.scalar("An_idRUPIn")? + input_state.scalar("Inf_ArtCPIn")?) * 1000.0;
        let abs_eaa = abs_aa.sum();
        let abs_neaa = mp_in_g * MP_TO_AA - abs_eaa;
        let abs_aa_mpp = abs_aa.scale(checked_div("Abs_AA_MPp", 100.0, mp_in_g)?);

        let mut output = OutputState::new();
        output
            .set_scalar("An_MPIn_g", mp_in_g)
            .set_scalar("An_MPIn", mp_in_g / 1000.0)
            .set_scalar(
                "An_MP",
                checked_div("An_MP", mp_in_g / 1000.0, input_state.scalar("An_DMIn")?)? * 100.0,
            )
            .set_scalar("Abs_EAA_g", abs_eaa)
            .set_scalar("Abs_neAA_g", abs_neaa)
            .set_scalar("Abs_OthAA_g", abs_neaa + abs_aa.sum_of(&OTHER_EAA))
            .set_scalar("Abs_EAA2_HILKM_g", abs_aa.sum_of_squares(&HILKM))
            .set_scalar("Abs_EAA2_RHILKM_g", abs_aa.sum_of_squares(&RHILKM))
            .set_scalar("Abs_EAA2_HILKMT_g", abs_aa.sum_of_squares(&HILKMT))
            .set_series("Abs_AA_MPp", abs_aa_mpp)
            .set_series("Abs_AA_g", abs_aa);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nasem_core::coefficients::CoefficientSet;
    use nasem_core::namespace::StateValue;

    fn solve(order: &[AminoAcid], inf_si: f64) -> OutputState {
        let mic = AaSeries::from_fn(order, |aa| 10.0 + aa as usize as f64);
        let rup = AaSeries::constant(order, 5.0);
        let infused = AaSeries::from_fn(order, |aa| if aa == AminoAcid::Met { 20.0 } else { 0.0 });
        let values: Vec<(&str, StateValue)> = vec![
            ("Du_IdAAMic", mic.into()),
            ("Dt_IdAARUPIn", rup.into()),
            ("Inf_AA_g", infused.into()),
            ("Inf_SI", inf_si.into()),
            ("Inf_Art", 0.0.into()),
            ("Du_idMiTP_g", 1500.0.into()),
            ("An_idRUPIn", 1.0.into()),
            ("Inf_ArtCPIn", 0.0.into()),
            ("An_DMIn", 20.0.into()),
        ];
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (*n, v)).collect();
        let input_state = InputState::build("AminoAcidAbsorption", refs);
        let coefficients = CoefficientSet::default();
        let context = EvaluationContext::new(&coefficients, order);
        AminoAcidAbsorption::new().solve(&input_state, &context).unwrap()
    }

    #[test]
    fn test_rumen_infusion_is_not_absorbed() {
        let rumen = solve(&AminoAcid::ALL, 0.0);
        let abomasal = solve(&AminoAcid::ALL, 1.0);
        let met = |o: &OutputState| o.series("Abs_AA_g").unwrap().get(AminoAcid::Met).unwrap();
        assert_relative_eq!(met(&abomasal) - met(&rumen), 20.0, max_relative = 1e-12);
        assert_relative_eq!(rumen.scalar("An_MPIn_g").unwrap(), 2500.0);
    }

    #[test]
    fn test_order_does_not_change_totals() {
        let mut reversed = AminoAcid::ALL;
        reversed.reverse();
        let canonical = solve(&AminoAcid::ALL, 1.0);
        let shuffled = solve(&reversed, 1.0);
        for name in ["Abs_EAA_g", "Abs_OthAA_g", "Abs_EAA2_HILKM_g", "Abs_EAA2_RHILKM_g"] {
            assert_relative_eq!(
                canonical.scalar(name).unwrap(),
                shuffled.scalar(name).unwrap(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_nonessential_balance() {
        let output = solve(&AminoAcid::ALL, 0.0);
        let eaa = output.scalar("Abs_EAA_g").unwrap();
        assert_relative_eq!(
            output.scalar("Abs_neAA_g").unwrap(),
            2500.0 * 1.15 - eaa,
            max_relative = 1e-12
        );
    }
}
