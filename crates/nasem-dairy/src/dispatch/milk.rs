use crate::dispatch::{MilkFatEquation, MilkProductionEquation, MilkProteinEquation};
use crate::inputs::PhysiologicalState;
use crate::milk::fat::{milk_fat_regression, MilkFatParameters, MilkFatSupply, MILK_FAT_COEFFICIENTS};
use crate::milk::protein::{milk_protein_regression, MilkProteinParameters, MilkProteinSupply};
use nasem_core::amino_acids::AminoAcid;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// Squared essential AA term of a milk protein coefficient family.
fn eaa2_input(equation: MilkProteinEquation) -> &'static str {
    match equation {
        MilkProteinEquation::Target | MilkProteinEquation::Nrc2021 => "Abs_EAA2_HILKM_g",
        MilkProteinEquation::Vt1 => "Abs_EAA2_RHILKM_g",
        MilkProteinEquation::Vt2 => "Abs_EAA2_HILKMT_g",
    }
}

/// Milk net protein, `Mlk_NP_g`.
///
/// The regression of the selected family is always reported under its own
/// name. Output is zero for an animal that is not lactating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilkProteinSelection {
    equation: MilkProteinEquation,
    state: PhysiologicalState,
}

impl MilkProteinSelection {
    pub fn new(equation: MilkProteinEquation, state: PhysiologicalState) -> Self {
        Self { equation, state }
    }
}

#[typetag::serde]
impl Component for MilkProteinSelection {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::series_input("Abs_AA_g", "g/d"),
            RequirementDefinition::series_input("mPrt_k_AA", ""),
            RequirementDefinition::scalar_input("Abs_neAA_g", "g/d"),
            RequirementDefinition::scalar_input("Abs_OthAA_g", "g/d"),
            RequirementDefinition::scalar_input(eaa2_input(self.equation), "g²/d²"),
            RequirementDefinition::scalar_input("An_DEInp", "Mcal/d"),
            RequirementDefinition::scalar_input("An_DigNDF", "% DM"),
            RequirementDefinition::scalar_input("An_DEStIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_DEFAIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_DErOMIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_DENDFIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_BW", "kg"),
            RequirementDefinition::scalar_output(self.equation.variant_name(), "g/d"),
            RequirementDefinition::scalar_output("Mlk_NP_g", "g/d"),
            RequirementDefinition::scalar_output("Mlk_NP", "kg/d"),
        ];
        if self.equation == MilkProteinEquation::Target {
            definitions.push(RequirementDefinition::scalar_input("Trg_Mlk_NP_g", "g/d"));
        }
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        MilkProteinParameters::names(self.equation.source())
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let params = MilkProteinParameters::from_context(context, self.equation.source())?;
        let supply = MilkProteinSupply {
            absorbed_aa: input_state.series("Abs_AA_g")?,
            slopes: input_state.series("mPrt_k_AA")?,
            neaa: input_state.scalar("Abs_neAA_g")?,
            other_aa: input_state.scalar("Abs_OthAA_g")?,
            eaa2: input_state.scalar(eaa2_input(self.equation))?,
            de_in_protein_free: input_state.scalar("An_DEInp")?,
            dig_ndf: input_state.scalar("An_DigNDF")?,
            de_starch_fa: input_state.scalar("An_DEStIn")?
                + input_state.scalar("An_DEFAIn")?
                + input_state.scalar("An_DErOMIn")?,
            de_ndf: input_state.scalar("An_DENDFIn")?,
            bw: input_state.scalar("An_BW")?,
        };
        let predicted = milk_protein_regression(&params, &supply)?;

        let selected = if !self.state.is_lactating() {
            0.0
        } else if self.equation == MilkProteinEquation::Target {
            input_state.scalar("Trg_Mlk_NP_g")?
        } else {
            predicted
        };

        let mut output = OutputState::new();
        output
            .set_scalar(self.equation.variant_name(), predicted)
            .set_scalar("Mlk_NP_g", selected)
            .set_scalar("Mlk_NP", selected / 1000.0);
        Ok(output)
    }
}

/// Milk fat, `Mlk_Fat_g`.
///
/// The regression is always reported as `Mlk_Fat_g_NRC`. Output is zero
/// for an animal that is not lactating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilkFatSelection {
    equation: MilkFatEquation,
    state: PhysiologicalState,
}

impl MilkFatSelection {
    pub fn new(equation: MilkFatEquation, state: PhysiologicalState) -> Self {
        Self { equation, state }
    }
}

#[typetag::serde]
impl Component for MilkFatSelection {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("An_LactDay", "d"),
            RequirementDefinition::scalar_input("Dt_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_FAIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_DigC160In", "kg/d"),
            RequirementDefinition::scalar_input("Dt_DigC183In", "kg/d"),
            RequirementDefinition::series_input("Abs_AA_g", "g/d"),
            RequirementDefinition::scalar_output("Mlk_Fat_g_NRC", "g/d"),
            RequirementDefinition::scalar_output("Mlk_Fat_g", "g/d"),
            RequirementDefinition::scalar_output("Mlk_Fat", "kg/d"),
        ];
        if self.equation == MilkFatEquation::Target {
            definitions.push(RequirementDefinition::scalar_input("Trg_Mlk_Fat_g", "g/d"));
        }
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&MILK_FAT_COEFFICIENTS)
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let absorbed = input_state.series("Abs_AA_g")?;
        let supply = MilkFatSupply {
            lact_day: input_state.scalar("An_LactDay")?,
            dmi: input_state.scalar("Dt_DMIn")?,
            fa_in: input_state.scalar("Dt_FAIn")?,
            dig_c160: input_state.scalar("Dt_DigC160In")?,
            dig_c183: input_state.scalar("Dt_DigC183In")?,
            abs_ile: absorbed.require(AminoAcid::Ile, "Abs_AA_g")?,
            abs_met: absorbed.require(AminoAcid::Met, "Abs_AA_g")?,
        };
        let predicted = milk_fat_regression(&MilkFatParameters::from_context(context)?, &supply);

        let selected = match (self.state.is_lactating(), self.equation) {
            (false, _) => 0.0,
            (true, MilkFatEquation::Target) => input_state.scalar("Trg_Mlk_Fat_g")?,
            (true, MilkFatEquation::Regression) => predicted,
        };

        let mut output = OutputState::new();
        output
            .set_scalar("Mlk_Fat_g_NRC", predicted)
            .set_scalar("Mlk_Fat_g", selected)
            .set_scalar("Mlk_Fat", selected / 1000.0);
        Ok(output)
    }
}

/// Milk yield, `Mlk_Prod`, from the target or one of the predictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilkProductionSelection {
    equation: MilkProductionEquation,
    state: PhysiologicalState,
}

impl MilkProductionSelection {
    pub fn new(equation: MilkProductionEquation, state: PhysiologicalState) -> Self {
        Self { equation, state }
    }

    fn variant_inputs(&self) -> &'static [&'static str] {
        match self.equation {
            MilkProductionEquation::Target => &["Trg_MilkProd"],
            MilkProductionEquation::ComponentBased => &["Mlk_Prod_comp"],
            MilkProductionEquation::EnergyAllowable => &["Mlk_Prod_NEalow"],
            MilkProductionEquation::ProteinAllowable => &["Mlk_Prod_MPalow"],
            MilkProductionEquation::MinimumAllowable => &["Mlk_Prod_NEalow", "Mlk_Prod_MPalow"],
        }
    }
}

#[typetag::serde]
impl Component for MilkProductionSelection {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions: Vec<_> = self
            .variant_inputs()
            .iter()
            .map(|name| RequirementDefinition::scalar_input(name, "kg/d"))
            .collect();
        definitions.push(RequirementDefinition::scalar_output("Mlk_Prod", "kg/d"));
        definitions
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let milk = if !self.state.is_lactating() {
            0.0
        } else {
            match self.equation {
                MilkProductionEquation::Target => input_state.scalar("Trg_MilkProd")?,
                MilkProductionEquation::ComponentBased => input_state.scalar("Mlk_Prod_comp")?,
                MilkProductionEquation::EnergyAllowable => input_state.scalar("Mlk_Prod_NEalow")?,
                MilkProductionEquation::ProteinAllowable => input_state.scalar("Mlk_Prod_MPalow")?,
                MilkProductionEquation::MinimumAllowable => input_state
                    .scalar("Mlk_Prod_NEalow")?
                    .min(input_state.scalar("Mlk_Prod_MPalow")?),
            }
        };

        let mut output = OutputState::new();
        output.set_scalar("Mlk_Prod", milk);
        Ok(output)
    }
}
