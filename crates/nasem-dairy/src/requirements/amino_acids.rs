//! Target absorbed amino-acid requirements
//!
//! Net protein exported in milk, scurf, body gain and the gravid uterus is
//! split into amino acids with tissue-specific profiles, then converted to
//! absorbed amino acid with a per-AA target efficiency. Endogenous urinary
//! amino acids are added at full efficiency.

use crate::inputs::PhysiologicalState;
use crate::parameters::{
    BODY_PROFILE, GESTATION_PROFILE, MILK_PROFILE, SCURF_PROFILE, TARGET_EFFICIENCY,
    URINARY_ENDOGENOUS_PROFILE,
};
use nasem_core::coefficients::AaCoefficient;
use nasem_core::component::{
    aa_coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetAminoAcids {
    state: PhysiologicalState,
}

impl TargetAminoAcids {
    pub fn new(state: PhysiologicalState) -> Self {
        Self { state }
    }
}

#[typetag::serde]
impl Component for TargetAminoAcids {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Trg_Mlk_NP_g", "g/d"),
            RequirementDefinition::scalar_input("Scrf_NP_g", "g/d"),
            RequirementDefinition::scalar_input("Body_NPgain_g", "g/d"),
            RequirementDefinition::scalar_input("Gest_NPgain_g", "g/d"),
            RequirementDefinition::scalar_input("Ur_NPend_g", "g/d"),
            RequirementDefinition::series_input("Abs_AA_g", "g/d"),
            RequirementDefinition::series_output("Mlk_AA_g", "g/d"),
            RequirementDefinition::series_output("Scrf_AA_g", "g/d"),
            RequirementDefinition::series_output("Body_AAGain_g", "g/d"),
            RequirementDefinition::series_output("Gest_AA_g", "g/d"),
            RequirementDefinition::series_output("Ur_AAEnd_g", "g/d"),
            RequirementDefinition::series_output("Trg_AbsAA_g", "g/d"),
            RequirementDefinition::series_output("An_AABal_g", "g/d"),
            RequirementDefinition::scalar_output("Trg_AbsEAA_g", "g/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        [
            MILK_PROFILE,
            SCURF_PROFILE,
            BODY_PROFILE,
            GESTATION_PROFILE,
            URINARY_ENDOGENOUS_PROFILE,
            TARGET_EFFICIENCY,
        ]
        .into_iter()
        .flat_map(aa_coefficient_names)
        .collect()
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let milk_np = if self.state.is_lactating() {
            input_state.scalar("Trg_Mlk_NP_g")?
        } else {
            0.0
        };
        let from_profile = |np: f64, profile: AaCoefficient| -> NasemResult<_> {
            Ok(context.per_aa(profile)?.scale(np / 100.0))
        };
        let milk = from_profile(milk_np, MILK_PROFILE)?;
        let scurf = from_profile(input_state.scalar("Scrf_NP_g")?, SCURF_PROFILE)?;
        let body = from_profile(input_state.scalar("Body_NPgain_g")?, BODY_PROFILE)?;
        let gest = from_profile(input_state.scalar("Gest_NPgain_g")?, GESTATION_PROFILE)?;
        let urine = from_profile(input_state.scalar("Ur_NPend_g")?, URINARY_ENDOGENOUS_PROFILE)?;

        let exported = milk.add(&scurf)?.add(&body)?.add(&gest)?;
        let efficiency = context.per_aa(TARGET_EFFICIENCY)?;
        let target = exported
            .try_zip_with(&efficiency, |aa, np, eff| {
                checked_div(&aa.expand("Trg_Abs{AA}_g"), np, eff)
            })?
            .add(&urine)?;
        let balance = input_state.series("Abs_AA_g")?.sub(&target)?;

        let mut output = OutputState::new();
        output
            .set_scalar("Trg_AbsEAA_g", target.sum())
            .set_series("Mlk_AA_g", milk)
            .set_series("Scrf_AA_g", scurf)
            .set_series("Body_AAGain_g", body)
            .set_series("Gest_AA_g", gest)
            .set_series("Ur_AAEnd_g", urine)
            .set_series("Trg_AbsAA_g", target)
            .set_series("An_AABal_g", balance);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::default_coefficients;
    use approx::assert_relative_eq;
    use nasem_core::amino_acids::{AaSeries, AminoAcid};
    use nasem_core::namespace::StateValue;

    fn solve(state: PhysiologicalState, order: &[AminoAcid]) -> OutputState {
        let values: Vec<(&str, StateValue)> = vec![
            ("Trg_Mlk_NP_g", 1000.0.into()),
            ("Scrf_NP_g", 10.0.into()),
            ("Body_NPgain_g", 0.0.into()),
            ("Gest_NPgain_g", 0.0.into()),
            ("Ur_NPend_g", 200.0.into()),
            ("Abs_AA_g", AaSeries::constant(order, 100.0).into()),
        ];
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (*n, v)).collect();
        let input_state = InputState::build("TargetAminoAcids", refs);
        let coefficients = default_coefficients();
        let context = EvaluationContext::new(&coefficients, order);
        TargetAminoAcids::new(state)
            .solve(&input_state, &context)
            .unwrap()
    }

    #[test]
    fn test_lysine_target() {
        let output = solve(PhysiologicalState::LactatingCow, &AminoAcid::ALL);
        let lys = output.series("Trg_AbsAA_g").unwrap().get(AminoAcid::Lys).unwrap();
        let expected = (1000.0 * 8.82 + 10.0 * 5.64) / 100.0 / 0.72 + 200.0 * 0.54 / 100.0;
        assert_relative_eq!(lys, expected, max_relative = 1e-12);
        let balance = output.series("An_AABal_g").unwrap().get(AminoAcid::Lys).unwrap();
        assert_relative_eq!(balance, 100.0 - expected, max_relative = 1e-12);
    }

    #[test]
    fn test_dry_cow_exports_no_milk() {
        let output = solve(PhysiologicalState::DryCow, &AminoAcid::ALL);
        assert_eq!(output.series("Mlk_AA_g").unwrap().sum(), 0.0);
    }

    #[test]
    fn test_total_is_order_independent() {
        let mut reversed = AminoAcid::ALL;
        reversed.reverse();
        let a = solve(PhysiologicalState::LactatingCow, &AminoAcid::ALL);
        let b = solve(PhysiologicalState::LactatingCow, &reversed);
        assert_relative_eq!(
            a.scalar("Trg_AbsEAA_g").unwrap(),
            b.scalar("Trg_AbsEAA_g").unwrap(),
            max_relative = 1e-12
        );
        assert_eq!(a.series("Trg_AbsAA_g"), b.series("Trg_AbsAA_g"));
    }
}
