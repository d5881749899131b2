//! Urinary and manure nitrogen by difference
//!
//! Urinary N is intake N less every other measured fate: feces, scurf,
//! milk, body gain and the gravid uterus.

use crate::rumen::microbial::CP_N;
use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// N to protein factor of milk protein
pub const MILK_CP_N: f64 = 6.34;
/// Digestible energy lost per g of urinary N, Mcal/g
pub const UR_DE_PER_N: f64 = 0.0143;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Urine {}

impl Urine {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for Urine {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_CPIn", "kg/d"),
            RequirementDefinition::scalar_input("Fe_N_g", "g/d"),
            RequirementDefinition::scalar_input("Scrf_CP_g", "g/d"),
            RequirementDefinition::scalar_input("Mlk_NP_g", "g/d"),
            RequirementDefinition::scalar_input("Body_NPgain_g", "g/d"),
            RequirementDefinition::scalar_input("Gest_NCPgain_g", "g/d"),
            RequirementDefinition::scalar_output("An_NIn_g", "g/d"),
            RequirementDefinition::scalar_output("Scrf_N_g", "g/d"),
            RequirementDefinition::scalar_output("Mlk_N_g", "g/d"),
            RequirementDefinition::scalar_output("Body_Ngain_g", "g/d"),
            RequirementDefinition::scalar_output("Gest_Ngain_g", "g/d"),
            RequirementDefinition::scalar_output("Ur_Nout_g", "g/d"),
            RequirementDefinition::scalar_output("Ur_DEout", "Mcal/d"),
            RequirementDefinition::scalar_output("Man_Nout_g", "g/d"),
        ]
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let n_in = input_state.scalar("An_CPIn")? * 1000.0 / CP_N;
        let fecal = input_state.scalar("Fe_N_g")?;
        let scurf = input_state.scalar("Scrf_CP_g")? / CP_N;
        let milk = input_state.scalar("Mlk_NP_g")? / MILK_CP_N;
        let body = input_state.scalar("Body_NPgain_g")? / CP_N;
        let gest = input_state.scalar("Gest_NCPgain_g")? / CP_N;
        let urine = n_in - fecal - scurf - milk - body - gest;

        let mut output = OutputState::new();
        output
            .set_scalar("An_NIn_g", n_in)
            .set_scalar("Scrf_N_g", scurf)
            .set_scalar("Mlk_N_g", milk)
            .set_scalar("Body_Ngain_g", body)
            .set_scalar("Gest_Ngain_g", gest)
            .set_scalar("Ur_Nout_g", urine)
            .set_scalar("Ur_DEout", UR_DE_PER_N * urine)
            .set_scalar("Man_Nout_g", urine + fecal);
        Ok(output)
    }
}
