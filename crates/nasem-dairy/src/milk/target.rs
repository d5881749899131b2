use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// Net energy of milk, Mcal/kg, from its fat, true protein and lactose contents (%).
pub fn milk_energy_density(fat_pct: f64, true_protein_pct: f64, lactose_pct: f64) -> f64 {
    0.0929 * fat_pct + 0.0585 * true_protein_pct + 0.0395 * lactose_pct
}

/// Energy and component output of the target milk yield.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetMilk {}

impl TargetMilk {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for TargetMilk {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Trg_MilkProd", "kg/d"),
            RequirementDefinition::scalar_input("Trg_MilkFatp", "%"),
            RequirementDefinition::scalar_input("Trg_MilkTPp", "%"),
            RequirementDefinition::scalar_input("Trg_MilkLacp", "%"),
            RequirementDefinition::scalar_output("Trg_NEmilk_Milk", "Mcal/kg"),
            RequirementDefinition::scalar_output("Trg_NEmilkOut", "Mcal/d"),
            RequirementDefinition::scalar_output("Trg_Mlk_NP_g", "g/d"),
            RequirementDefinition::scalar_output("Trg_Mlk_Fat_g", "g/d"),
        ]
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let milk = input_state.scalar("Trg_MilkProd")?;
        let fat_pct = input_state.scalar("Trg_MilkFatp")?;
        let tp_pct = input_state.scalar("Trg_MilkTPp")?;
        let density = milk_energy_density(fat_pct, tp_pct, input_state.scalar("Trg_MilkLacp")?);

        let mut output = OutputState::new();
        output
            .set_scalar("Trg_NEmilk_Milk", density)
            .set_scalar("Trg_NEmilkOut", density * milk)
            .set_scalar("Trg_Mlk_NP_g", milk * tp_pct / 100.0 * 1000.0)
            .set_scalar("Trg_Mlk_Fat_g", milk * fat_pct / 100.0 * 1000.0);
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
    fn test_target_milk_outputs() {
        let values: Vec<(&str, StateValue)> = vec![
            ("Trg_MilkProd", 35.0.into()),
            ("Trg_MilkFatp", 4.0.into()),
            ("Trg_MilkTPp", 3.2.into()),
            ("Trg_MilkLacp", 4.85.into()),
        ];
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (*n, v)).collect();
        let input_state = InputState::build("TargetMilk", refs);
        let coefficients = default_coefficients();
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);
        let output = TargetMilk::new().solve(&input_state, &context).unwrap();

        let density = 0.0929 * 4.0 + 0.0585 * 3.2 + 0.0395 * 4.85;
        assert_relative_eq!(output.scalar("Trg_NEmilk_Milk").unwrap(), density, max_relative = 1e-12);
        assert_relative_eq!(output.scalar("Trg_NEmilkOut").unwrap(), density * 35.0, max_relative = 1e-12);
        assert_relative_eq!(output.scalar("Trg_Mlk_NP_g").unwrap(), 1120.0, max_relative = 1e-12);
        assert_relative_eq!(output.scalar("Trg_Mlk_Fat_g").unwrap(), 1400.0, max_relative = 1e-12);
    }
}
