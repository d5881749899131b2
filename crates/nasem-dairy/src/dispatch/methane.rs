use crate::dispatch::Toggle;
use crate::excretion::methane::{
    dry_cow_gas_energy, heifer_gas_energy, lactating_gas_energy, methane_mass, CH4_DENSITY,
};
use crate::inputs::PhysiologicalState;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// Gaseous energy loss, `An_GasEOut`, by physiological state.
///
/// Calves are given no gaseous energy loss. When monensin is fed the
/// selected regression is scaled by `Monensin_GasE_Adj`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Methane {
    state: PhysiologicalState,
    monensin: Toggle,
}

impl Methane {
    pub fn new(state: PhysiologicalState, monensin: Toggle) -> Self {
        Self { state, monensin }
    }

    fn variant_name(&self) -> Option<&'static str> {
        match self.state {
            PhysiologicalState::LactatingCow => Some("An_GasEOut_Lact"),
            PhysiologicalState::Heifer => Some("An_GasEOut_Heif"),
            PhysiologicalState::DryCow | PhysiologicalState::Other => Some("An_GasEOut_Dry"),
            PhysiologicalState::Calf => None,
        }
    }

    fn variant_inputs(&self) -> &'static [(&'static str, &'static str)] {
        match self.state {
            PhysiologicalState::LactatingCow => {
                &[("An_DMIn", "kg/d"), ("An_FA", "% DM"), ("An_DigNDF", "% DM")]
            }
            PhysiologicalState::Heifer => &[("An_GEIn", "Mcal/d"), ("An_NDF", "% DM")],
            PhysiologicalState::DryCow | PhysiologicalState::Other => {
                &[("An_GEIn", "Mcal/d"), ("An_FA", "% DM")]
            }
            PhysiologicalState::Calf => &[],
        }
    }
}

#[typetag::serde]
impl Component for Methane {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions: Vec<_> = self
            .variant_inputs()
            .iter()
            .map(|(name, unit)| RequirementDefinition::scalar_input(name, unit))
            .collect();
        if let Some(name) = self.variant_name() {
            definitions.push(RequirementDefinition::scalar_output(name, "Mcal/d"));
        }
        definitions.extend([
            RequirementDefinition::scalar_output("An_GasEOut", "Mcal/d"),
            RequirementDefinition::scalar_output("CH4out_g", "g/d"),
            RequirementDefinition::scalar_output("CH4out_L", "L/d"),
        ]);
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        let mut names = coefficient_names(&["En_CH4"]);
        if self.monensin.is_on() {
            names.push("Monensin_GasE_Adj".to_string());
        }
        names
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let predicted = match self.state {
            PhysiologicalState::LactatingCow => lactating_gas_energy(
                input_state.scalar("An_DMIn")?,
                input_state.scalar("An_FA")?,
                input_state.scalar("An_DigNDF")?,
            ),
            PhysiologicalState::Heifer => heifer_gas_energy(
                input_state.scalar("An_GEIn")?,
                input_state.scalar("An_NDF")?,
            ),
            PhysiologicalState::DryCow | PhysiologicalState::Other => dry_cow_gas_energy(
                input_state.scalar("An_GEIn")?,
                input_state.scalar("An_FA")?,
            ),
            PhysiologicalState::Calf => 0.0,
        };
        let gas_energy = if self.monensin.is_on() {
            predicted * context.coefficient("Monensin_GasE_Adj")?
        } else {
            predicted
        };
        let methane_g = methane_mass(gas_energy, context.coefficient("En_CH4")?);

        let mut output = OutputState::new();
        if let Some(name) = self.variant_name() {
            output.set_scalar(name, predicted);
        }
        output
            .set_scalar("An_GasEOut", gas_energy)
            .set_scalar("CH4out_g", methane_g)
            .set_scalar("CH4out_L", methane_g / CH4_DENSITY);
        Ok(output)
    }
}
