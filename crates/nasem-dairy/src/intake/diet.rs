//! Diet and whole-animal nutrient intakes
//!
//! [`DietIntakes`] scales the diet composition by the selected dry matter
//! intake. [`AnimalIntakes`] adds infused nutrients on top, giving the `An_`
//! totals most downstream equations read.

use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

/// Fatty acids are reported as triglyceride-equivalents when hydrolysed
pub const FA_HYDROLYSIS: f64 = 1.06;
/// Mass of NPN dry matter per unit of NPN crude protein equivalent
pub const NPN_CP_DM: f64 = 2.81;

/// Composition in % of DM and the intake it gives
const COMPOSITION: [(&str, &str); 7] = [
    ("Dt_NDF", "Dt_NDFIn"),
    ("Dt_ADF", "Dt_ADFIn"),
    ("Dt_Lg", "Dt_LgIn"),
    ("Dt_Ash", "Dt_AshIn"),
    ("Dt_ForNDF", "Dt_ForNDFIn"),
    ("Dt_C160", "Dt_C160In"),
    ("Dt_C183", "Dt_C183In"),
];

/// Residual organic matter: everything organic not accounted for by fibre,
/// starch, fat or protein.
pub fn residual_organic_matter(
    dmi: f64,
    ash_in: f64,
    ndf_in: f64,
    starch_in: f64,
    fa_in: f64,
    cp_in: f64,
    npn_cp_in: f64,
) -> f64 {
    let tp_in = cp_in - npn_cp_in;
    let npn_dm_in = npn_cp_in / NPN_CP_DM;
    dmi - ash_in - ndf_in - starch_in - fa_in * FA_HYDROLYSIS - tp_in - npn_dm_in
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DietIntakes {}

impl DietIntakes {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for DietIntakes {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("Dt_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_CPIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_RUPIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_StIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_FAIn", "kg/d"),
        ];
        for (content, intake) in COMPOSITION {
            definitions.push(RequirementDefinition::scalar_input(content, "% DM"));
            definitions.push(RequirementDefinition::scalar_output(intake, "kg/d"));
        }
        definitions.extend([
            RequirementDefinition::scalar_input("Dt_NPNCP", "% CP"),
            RequirementDefinition::scalar_output("Dt_NPNCPIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_RDPIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_rOMIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_rOM", "% DM"),
        ]);
        definitions
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let dmi = input_state.scalar("Dt_DMIn")?;
        let mut output = OutputState::new();
        for (content, intake) in COMPOSITION {
            output.set_scalar(intake, input_state.scalar(content)? / 100.0 * dmi);
        }

        let cp_in = input_state.scalar("Dt_CPIn")?;
        let npn_cp_in = input_state.scalar("Dt_NPNCP")? / 100.0 * cp_in;
        let rom_in = residual_organic_matter(
            dmi,
            input_state.scalar("Dt_Ash")? / 100.0 * dmi,
            input_state.scalar("Dt_NDF")? / 100.0 * dmi,
            input_state.scalar("Dt_StIn")?,
            input_state.scalar("Dt_FAIn")?,
            cp_in,
            npn_cp_in,
        );

        output
            .set_scalar("Dt_NPNCPIn", npn_cp_in)
            .set_scalar("Dt_RDPIn", cp_in - input_state.scalar("Dt_RUPIn")?)
            .set_scalar("Dt_rOMIn", rom_in)
            .set_scalar("Dt_rOM", checked_div("Dt_rOM", rom_in, dmi)? * 100.0);
        Ok(output)
    }
}

/// Nutrients summed over diet and infusion.
const ANIMAL_TOTALS: [(&str, &str, &str); 9] = [
    ("Dt_DMIn", "Inf_DMIn", "An_DMIn"),
    ("Dt_CPIn", "Inf_CPIn", "An_CPIn"),
    ("Dt_RDPIn", "Inf_RDPIn", "An_RDPIn"),
    ("Dt_RUPIn", "Inf_RUPIn", "An_RUPIn"),
    ("Dt_idRUPIn", "Inf_idRUPIn", "An_idRUPIn"),
    ("Dt_NDFIn", "Inf_NDFIn", "An_NDFIn"),
    ("Dt_ADFIn", "Inf_ADFIn", "An_ADFIn"),
    ("Dt_StIn", "Inf_StIn", "An_StIn"),
    ("Dt_FAIn", "Inf_FAIn", "An_FAIn"),
];

/// Concentrations in total dry matter intake, `(intake, concentration)`.
const ANIMAL_CONCENTRATIONS: [(&str, &str); 6] = [
    ("An_CPIn", "An_CP"),
    ("An_RDPIn", "An_RDP"),
    ("An_NDFIn", "An_NDF"),
    ("An_ADFIn", "An_ADF"),
    ("An_StIn", "An_St"),
    ("An_FAIn", "An_FA"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimalIntakes {}

impl AnimalIntakes {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for AnimalIntakes {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![RequirementDefinition::scalar_input("An_BW", "kg")];
        for (diet, infusion, total) in ANIMAL_TOTALS {
            definitions.push(RequirementDefinition::scalar_input(diet, "kg/d"));
            definitions.push(RequirementDefinition::scalar_input(infusion, "kg/d"));
            definitions.push(RequirementDefinition::scalar_output(total, "kg/d"));
        }
        definitions.extend(
            ANIMAL_CONCENTRATIONS
                .iter()
                .map(|(_, concentration)| RequirementDefinition::scalar_output(concentration, "% DM")),
        );
        definitions.push(RequirementDefinition::scalar_output("An_DMIn_BW", "kg/kg"));
        definitions
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let mut output = OutputState::new();
        let mut totals = Vec::with_capacity(ANIMAL_TOTALS.len());
        for (diet, infusion, total) in ANIMAL_TOTALS {
            let value = input_state.scalar(diet)? + input_state.scalar(infusion)?;
            totals.push((total, value));
            output.set_scalar(total, value);
        }

        let dmi = input_state.scalar("Dt_DMIn")? + input_state.scalar("Inf_DMIn")?;
        for (intake, concentration) in ANIMAL_CONCENTRATIONS {
            let value = totals
                .iter()
                .find(|(name, _)| *name == intake)
                .map(|(_, v)| *v)
                .unwrap_or_default();
            output.set_scalar(concentration, checked_div(concentration, value, dmi)? * 100.0);
        }
        output.set_scalar(
            "An_DMIn_BW",
            checked_div("An_DMIn_BW", dmi, input_state.scalar("An_BW")?)?,
        );
        Ok(output)
    }
}
