//! Digestible and metabolizable energy supply

use crate::dispatch::Toggle;
use crate::inputs::PhysiologicalState;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

/// Truly digestible fraction of residual organic matter
pub const DC_ROM_TRUE: f64 = 0.96;

/// Digestible and gross energy of the total intake.
///
/// Digestible energy is summed nutrient by nutrient from the apparently
/// digested amounts. Non-protein nitrogen is assumed fully digested and
/// carries its own energy value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestibleEnergy {}

impl DigestibleEnergy {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for DigestibleEnergy {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("An_CPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_NDFIn", "kg/d"),
            RequirementDefinition::scalar_input("An_StIn", "kg/d"),
            RequirementDefinition::scalar_input("An_FAIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_rOMIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_NPNCPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DigStIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DigFAIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DigCPaIn", "kg/d"),
            RequirementDefinition::scalar_input("Inf_DEIn_GlcVFA", "Mcal/d"),
            RequirementDefinition::scalar_output("Fe_rOMend", "kg/d"),
            RequirementDefinition::scalar_output("Dt_DigrOMtIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_DigrOMaIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DENDFIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DEStIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DErOMIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DEFAIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DECPIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DEIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DEInp", "Mcal/d"),
            RequirementDefinition::scalar_output("An_DE", "Mcal/kg"),
            RequirementDefinition::scalar_output("An_GEIn", "Mcal/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&[
            "En_NDF",
            "En_St",
            "En_FA",
            "En_CP",
            "En_NPNCP",
            "En_rOM",
            "Fe_rOMend_DMI",
        ])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let en_ndf = context.coefficient("En_NDF")?;
        let en_st = context.coefficient("En_St")?;
        let en_fa = context.coefficient("En_FA")?;
        let en_cp = context.coefficient("En_CP")?;
        let en_npn = context.coefficient("En_NPNCP")?;
        let en_rom = context.coefficient("En_rOM")?;

        let dmi = input_state.scalar("An_DMIn")?;
        let rom_in = input_state.scalar("Dt_rOMIn")?;
        let npn_cp_in = input_state.scalar("Dt_NPNCPIn")?;
        let infused = input_state.scalar("Inf_DEIn_GlcVFA")?;

        let fe_rom_end = context.coefficient("Fe_rOMend_DMI")? / 100.0 * dmi;
        let dig_rom_t = DC_ROM_TRUE * rom_in;
        let dig_rom_a = dig_rom_t - fe_rom_end;

        let de_ndf = input_state.scalar("An_DigNDFIn")? * en_ndf;
        let de_st = input_state.scalar("An_DigStIn")? * en_st;
        let de_rom = dig_rom_a * en_rom;
        let de_fa = input_state.scalar("An_DigFAIn")? * en_fa;
        let de_cp =
            (input_state.scalar("An_DigCPaIn")? - npn_cp_in) * en_cp + npn_cp_in * en_npn;
        let de_in = de_ndf + de_st + de_rom + de_fa + de_cp + infused;

        let ge_in = input_state.scalar("An_NDFIn")? * en_ndf
            + input_state.scalar("An_StIn")? * en_st
            + input_state.scalar("An_FAIn")? * en_fa
            + (input_state.scalar("An_CPIn")? - npn_cp_in) * en_cp
            + npn_cp_in * en_npn
            + rom_in * en_rom
            + infused;

        let mut output = OutputState::new();
        output
            .set_scalar("Fe_rOMend", fe_rom_end)
            .set_scalar("Dt_DigrOMtIn", dig_rom_t)
            .set_scalar("Dt_DigrOMaIn", dig_rom_a)
            .set_scalar("An_DENDFIn", de_ndf)
            .set_scalar("An_DEStIn", de_st)
            .set_scalar("An_DErOMIn", de_rom)
            .set_scalar("An_DEFAIn", de_fa)
            .set_scalar("An_DECPIn", de_cp)
            .set_scalar("An_DEIn", de_in)
            .set_scalar("An_DEInp", de_in - de_cp)
            .set_scalar("An_DE", checked_div("An_DE", de_in, dmi)?)
            .set_scalar("An_GEIn", ge_in);
        Ok(output)
    }
}

/// Metabolizable energy: digestible energy less methane and urine energy.
///
/// For calves with the rumen-development discount on, ME from dry feed is
/// reduced by `RumDevDisc_Clf_ME`. Liquid feed is not discounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetabolizableEnergy {
    state: PhysiologicalState,
    rumen_development_discount: Toggle,
}

impl MetabolizableEnergy {
    pub fn new(state: PhysiologicalState, rumen_development_discount: Toggle) -> Self {
        Self {
            state,
            rumen_development_discount,
        }
    }

    fn discounts(&self) -> bool {
        self.state.is_calf() && self.rumen_development_discount.is_on()
    }
}

#[typetag::serde]
impl Component for MetabolizableEnergy {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("An_DEIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_GasEOut", "Mcal/d"),
            RequirementDefinition::scalar_input("Ur_DEout", "Mcal/d"),
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
        ];
        if self.discounts() {
            definitions.extend([
                RequirementDefinition::scalar_input("Dt_DMIn_ClfLiq", "kg/d"),
                RequirementDefinition::scalar_input("Dt_ME_ClfLiq", "Mcal/kg"),
            ]);
        }
        definitions.extend([
            RequirementDefinition::scalar_output("An_ME_ClfDisc", "Mcal/d"),
            RequirementDefinition::scalar_output("An_MEIn", "Mcal/d"),
            RequirementDefinition::scalar_output("An_ME", "Mcal/kg"),
        ]);
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        if self.discounts() {
            coefficient_names(&["RumDevDisc_Clf_ME"])
        } else {
            vec![]
        }
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let me_in = input_state.scalar("An_DEIn")?
            - input_state.scalar("An_GasEOut")?
            - input_state.scalar("Ur_DEout")?;
        let discount = if self.discounts() {
            let liquid = input_state.scalar("Dt_DMIn_ClfLiq")? * input_state.scalar("Dt_ME_ClfLiq")?;
            context.coefficient("RumDevDisc_Clf_ME")? * (me_in - liquid).max(0.0)
        } else {
            0.0
        };
        let me_in = me_in - discount;

        let mut output = OutputState::new();
        output
            .set_scalar("An_ME_ClfDisc", discount)
            .set_scalar("An_MEIn", me_in)
            .set_scalar(
                "An_ME",
                checked_div("An_ME", me_in, input_state.scalar("An_DMIn")?)?,
            );
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

    fn solve<T: Component>(component: &T, values: &[(&str, f64)]) -> OutputState {
        let values: Vec<(&str, StateValue)> =
            values.iter().map(|(n, v)| (*n, StateValue::Scalar(*v))).collect();
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (*n, v)).collect();
        let input_state = InputState::build("test", refs);
        let coefficients = default_coefficients();
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);
        component.solve(&input_state, &context).unwrap()
    }

    #[test]
    fn test_digestible_energy_sums_nutrients() {
        let output = solve(
            &DigestibleEnergy::new(),
            &[
                ("An_DMIn", 20.0),
                ("An_CPIn", 3.4),
                ("An_NDFIn", 6.0),
                ("An_StIn", 5.0),
                ("An_FAIn", 0.6),
                ("Dt_rOMIn", 3.0),
                ("Dt_NPNCPIn", 0.2),
                ("An_DigNDFIn", 3.0),
                ("An_DigStIn", 4.5),
                ("An_DigFAIn", 0.45),
                ("An_DigCPaIn", 2.4),
                ("Inf_DEIn_GlcVFA", 0.0),
            ],
        );
        // rOM: 0.96 * 3.0 - 0.0343 * 20
        assert_relative_eq!(output.scalar("Dt_DigrOMaIn").unwrap(), 2.194, max_relative = 1e-12);
        let de_cp = 2.2 * 5.65 + 0.2 * 0.89;
        assert_relative_eq!(output.scalar("An_DECPIn").unwrap(), de_cp, max_relative = 1e-12);
        let de = 3.0 * 4.2 + 4.5 * 4.23 + 2.194 * 4.0 + 0.45 * 9.4 + de_cp;
        assert_relative_eq!(output.scalar("An_DEIn").unwrap(), de, max_relative = 1e-12);
        assert_relative_eq!(output.scalar("An_DEInp").unwrap(), de - de_cp, max_relative = 1e-12);
        assert!(output.scalar("An_GEIn").unwrap() > de);
    }

    #[test]
    fn test_calf_rumen_discount() {
        let values = [
            ("An_DEIn", 8.0),
            ("An_GasEOut", 0.0),
            ("Ur_DEout", 0.2),
            ("An_DMIn", 2.0),
            ("Dt_DMIn_ClfLiq", 1.0),
            ("Dt_ME_ClfLiq", 4.8),
        ];
        let discounted = solve(
            &MetabolizableEnergy::new(PhysiologicalState::Calf, Toggle::On),
            &values,
        );
        // 10 % of the 3.0 Mcal from dry feed
        assert_relative_eq!(discounted.scalar("An_ME_ClfDisc").unwrap(), 0.3, max_relative = 1e-9);
        assert_relative_eq!(discounted.scalar("An_MEIn").unwrap(), 7.5, max_relative = 1e-9);

        let cow = solve(
            &MetabolizableEnergy::new(PhysiologicalState::LactatingCow, Toggle::On),
            &values,
        );
        assert_eq!(cow.scalar("An_ME_ClfDisc"), Some(0.0));
        assert_relative_eq!(cow.scalar("An_MEIn").unwrap(), 7.8, max_relative = 1e-12);
    }
}
