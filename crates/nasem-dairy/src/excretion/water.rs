use crate::inputs::PhysiologicalState;
use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// Drinking water of a lactating cow, kg/d.
///
/// Dietary Na and K are converted from % DM to mEq per kg DM.
pub fn lactating_water_intake(
    dmi: f64,
    dm_pct: f64,
    na_pct: f64,
    k_pct: f64,
    cp_pct: f64,
    temperature: f64,
) -> f64 {
    -91.1 + 2.93 * dmi + 0.61 * dm_pct + 0.062 * (na_pct / 0.023 + k_pct / 0.039) * 10.0
        + 2.49 * cp_pct
        + 0.76 * temperature
}

/// Drinking water of a heifer or dry cow, kg/d.
pub fn non_lactating_water_intake(dmi: f64, dm_pct: f64, temperature: f64) -> f64 {
    1.16 * dmi + 0.23 * dm_pct + 0.44 * temperature + 0.061 * (temperature - 16.4).powi(2)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Water {
    state: PhysiologicalState,
}

impl Water {
    pub fn new(state: PhysiologicalState) -> Self {
        Self { state }
    }
}

#[typetag::serde]
impl Component for Water {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("Dt_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_DM", "% as fed"),
            RequirementDefinition::scalar_input("Env_TempCurr", "°C"),
            RequirementDefinition::scalar_output("An_WaIn", "kg/d"),
        ];
        if self.state.is_lactating() {
            definitions.extend([
                RequirementDefinition::scalar_input("Dt_Na", "% DM"),
                RequirementDefinition::scalar_input("Dt_K", "% DM"),
                RequirementDefinition::scalar_input("Dt_CP", "% DM"),
            ]);
        }
        definitions
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let dmi = input_state.scalar("Dt_DMIn")?;
        let dm = input_state.scalar("Dt_DM")?;
        let temperature = input_state.scalar("Env_TempCurr")?;
        let water = if self.state.is_lactating() {
            lactating_water_intake(
                dmi,
                dm,
                input_state.scalar("Dt_Na")?,
                input_state.scalar("Dt_K")?,
                input_state.scalar("Dt_CP")?,
                temperature,
            )
        } else {
            non_lactating_water_intake(dmi, dm, temperature)
        };

        let mut output = OutputState::new();
        output.set_scalar("An_WaIn", water);
        Ok(output)
    }
}
