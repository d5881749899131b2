//! Milk yield predictions and the composition of the predicted milk

use crate::milk::fat::LACT_DAY_CAP;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::ratio_or_zero;
use serde::{Deserialize, Serialize};

/// Mean lactation day of the calibration data
pub const REFERENCE_LACT_DAY: f64 = 137.1;

const COMPOSITION_COEFFICIENTS: [&str; 9] = [
    "mProd_Int",
    "mProd_k_NP",
    "mProd_k_Fat",
    "mProd_k_DEIn",
    "mProd_k_LactDay",
    "mProd_k_LactDay2",
    "mProd_k_LactDay3",
    "mProd_k_LactDay4",
    "mProd_k_Parity",
];

/// Milk yield from predicted protein and fat output, `Mlk_Prod_comp`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilkComposition {}

impl MilkComposition {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for MilkComposition {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Mlk_NP", "kg/d"),
            RequirementDefinition::scalar_input("Mlk_Fat", "kg/d"),
            RequirementDefinition::scalar_input("An_DEIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_LactDay", "d"),
            RequirementDefinition::scalar_input("An_Parity_rl", ""),
            RequirementDefinition::scalar_output("An_LactDay_MlkPred", "d"),
            RequirementDefinition::scalar_output("Mlk_Prod_comp", "kg/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&COMPOSITION_COEFFICIENTS)
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let lact_day = input_state.scalar("An_LactDay")?.min(LACT_DAY_CAP);
        let d = lact_day - REFERENCE_LACT_DAY;
        let k = |name: &str| context.coefficient(name);

        let milk = k("mProd_Int")?
            + k("mProd_k_NP")? * input_state.scalar("Mlk_NP")?
            + k("mProd_k_Fat")? * input_state.scalar("Mlk_Fat")?
            + k("mProd_k_DEIn")? * input_state.scalar("An_DEIn")?
            + k("mProd_k_LactDay")? * d
            + k("mProd_k_LactDay2")? * d.powi(2)
            + k("mProd_k_LactDay3")? * d.powi(3)
            + k("mProd_k_LactDay4")? * d.powi(4)
            + k("mProd_k_Parity")? * input_state.scalar("An_Parity_rl")?;

        let mut output = OutputState::new();
        output
            .set_scalar("An_LactDay_MlkPred", lact_day)
            .set_scalar("Mlk_Prod_comp", milk);
        Ok(output)
    }
}

/// Milk yields allowed by the energy and protein left after every other use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilkAllowances {}

impl MilkAllowances {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for MilkAllowances {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_MEIn", "Mcal/d"),
            RequirementDefinition::scalar_input("An_MEmUse", "Mcal/d"),
            RequirementDefinition::scalar_input("Frm_MEgain", "Mcal/d"),
            RequirementDefinition::scalar_input("Rsrv_MEgain", "Mcal/d"),
            RequirementDefinition::scalar_input("Gest_MEuse", "Mcal/d"),
            RequirementDefinition::scalar_input("Trg_MEuse", "Mcal/d"),
            RequirementDefinition::scalar_input("Trg_NEmilk_Milk", "Mcal/kg"),
            RequirementDefinition::scalar_input("An_MPIn_g", "g/d"),
            RequirementDefinition::scalar_input("An_MPuse_g_Trg", "g/d"),
            RequirementDefinition::scalar_input("Mlk_MPUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_input("Trg_MilkTPp", "%"),
            RequirementDefinition::scalar_output("An_MEbal", "Mcal/d"),
            RequirementDefinition::scalar_output("An_MEavail_Milk", "Mcal/d"),
            RequirementDefinition::scalar_output("Mlk_NEalow", "Mcal/d"),
            RequirementDefinition::scalar_output("Mlk_Prod_NEalow", "kg/d"),
            RequirementDefinition::scalar_output("An_MPavail_Milk_Trg", "g/d"),
            RequirementDefinition::scalar_output("Mlk_NPalow_g", "g/d"),
            RequirementDefinition::scalar_output("Mlk_Prod_MPalow", "kg/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&["Kl_ME_NE", "Kl_MP_NP_Trg"])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let me_in = input_state.scalar("An_MEIn")?;
        let me_avail = me_in
            - input_state.scalar("An_MEmUse")?
            - input_state.scalar("Frm_MEgain")?
            - input_state.scalar("Rsrv_MEgain")?
            - input_state.scalar("Gest_MEuse")?;
        let ne_allow = me_avail * context.coefficient("Kl_ME_NE")?;

        let mp_milk = input_state.scalar("Mlk_MPUse_g_Trg")?;
        let mp_avail =
            input_state.scalar("An_MPIn_g")? - (input_state.scalar("An_MPuse_g_Trg")? - mp_milk);
        let np_allow = mp_avail * context.coefficient("Kl_MP_NP_Trg")?;

        let mut output = OutputState::new();
        output
            .set_scalar("An_MEbal", me_in - input_state.scalar("Trg_MEuse")?)
            .set_scalar("An_MEavail_Milk", me_avail)
            .set_scalar("Mlk_NEalow", ne_allow)
            .set_scalar(
                "Mlk_Prod_NEalow",
                ratio_or_zero(ne_allow, input_state.scalar("Trg_NEmilk_Milk")?),
            )
            .set_scalar("An_MPavail_Milk_Trg", mp_avail)
            .set_scalar("Mlk_NPalow_g", np_allow)
            .set_scalar(
                "Mlk_Prod_MPalow",
                ratio_or_zero(np_allow, input_state.scalar("Trg_MilkTPp")? / 100.0) / 1000.0,
            );
        Ok(output)
    }
}

/// Fat and protein contents of the predicted milk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilkSummary {}

impl MilkSummary {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for MilkSummary {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Mlk_Prod", "kg/d"),
            RequirementDefinition::scalar_input("Mlk_Fat", "kg/d"),
            RequirementDefinition::scalar_input("Mlk_NP", "kg/d"),
            RequirementDefinition::scalar_output("Mlk_Fatp", "%"),
            RequirementDefinition::scalar_output("Mlk_NPp", "%"),
        ]
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let milk = input_state.scalar("Mlk_Prod")?;
        let mut output = OutputState::new();
        output
            .set_scalar("Mlk_Fatp", ratio_or_zero(input_state.scalar("Mlk_Fat")?, milk) * 100.0)
            .set_scalar("Mlk_NPp", ratio_or_zero(input_state.scalar("Mlk_NP")?, milk) * 100.0);
        Ok(output)
    }
}
