//! Body weight partitions and the composition of body gain
//!
//! Gain is split into frame gain (structural growth) and reserve gain
//! (change in body condition). Both are converted to an empty-body basis and
//! then into fat, protein and retained energy.

use crate::inputs::PhysiologicalState;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

/// Fat content of frame gain, rising as the animal approaches mature size.
pub fn frame_fat_fraction(bw: f64, bw_mature: f64) -> NasemResult<f64> {
    Ok(0.067 + 0.375 * checked_div("FatGain_FrmGain", bw, bw_mature)?)
}

/// Crude protein content of frame gain, falling as the animal approaches mature size.
pub fn frame_cp_fraction(bw: f64, bw_mature: f64) -> NasemResult<f64> {
    Ok(0.201 - 0.081 * checked_div("CPGain_FrmGain", bw, bw_mature)?)
}

fn gut_fill_coefficient(state: PhysiologicalState) -> &'static str {
    if state.is_calf() {
        "An_GutFill_BW_Clf"
    } else {
        "An_GutFill_BW"
    }
}

/// Weight partitions of the animal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyWeight {
    state: PhysiologicalState,
}

impl BodyWeight {
    pub fn new(state: PhysiologicalState) -> Self {
        Self { state }
    }
}

#[typetag::serde]
impl Component for BodyWeight {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_BW", "kg"),
            RequirementDefinition::scalar_input("An_BW_mature", "kg"),
            RequirementDefinition::scalar_input("GrUter_Wt", "kg"),
            RequirementDefinition::scalar_output("An_GutFill_Wt", "kg"),
            RequirementDefinition::scalar_output("An_BW_empty", "kg"),
            RequirementDefinition::scalar_output("An_BWnp", "kg"),
            RequirementDefinition::scalar_output("An_EBWnp", "kg"),
            RequirementDefinition::scalar_output("An_BWnp3", "kg^0.75"),
            RequirementDefinition::scalar_output("An_BW_mature_empty", "kg"),
            RequirementDefinition::scalar_output("An_BW_EBWmature", "kg/kg"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&[gut_fill_coefficient(self.state), "An_EBW_BW_mature"])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let bw = input_state.scalar("An_BW")?;
        let gut_fill = context.coefficient(gut_fill_coefficient(self.state))?;
        let bw_np = bw - input_state.scalar("GrUter_Wt")?;
        let ebw_np = bw_np * (1.0 - gut_fill);
        let mature_empty =
            input_state.scalar("An_BW_mature")? * context.coefficient("An_EBW_BW_mature")?;

        let mut output = OutputState::new();
        output
            .set_scalar("An_GutFill_Wt", bw * gut_fill)
            .set_scalar("An_BW_empty", bw * (1.0 - gut_fill))
            .set_scalar("An_BWnp", bw_np)
            .set_scalar("An_EBWnp", ebw_np)
            .set_scalar("An_BWnp3", bw_np.max(0.0).powf(0.75))
            .set_scalar("An_BW_mature_empty", mature_empty)
            .set_scalar(
                "An_BW_EBWmature",
                checked_div("An_BW_EBWmature", ebw_np, mature_empty)?,
            );
        Ok(output)
    }
}

/// Fat, protein and energy retained in frame and reserve gain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyComposition {
    state: PhysiologicalState,
}

impl BodyComposition {
    pub fn new(state: PhysiologicalState) -> Self {
        Self { state }
    }
}

#[typetag::serde]
impl Component for BodyComposition {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_BW", "kg"),
            RequirementDefinition::scalar_input("An_BW_mature", "kg"),
            RequirementDefinition::scalar_input("Trg_FrmGain", "kg/d"),
            RequirementDefinition::scalar_input("Trg_RsrvGain", "kg/d"),
            RequirementDefinition::scalar_output("Frm_Gain_empty", "kg/d"),
            RequirementDefinition::scalar_output("Frm_Fatgain", "kg/d"),
            RequirementDefinition::scalar_output("Frm_CPgain", "kg/d"),
            RequirementDefinition::scalar_output("Frm_NPgain", "kg/d"),
            RequirementDefinition::scalar_output("Frm_NEgain", "Mcal/d"),
            RequirementDefinition::scalar_output("Rsrv_Fatgain", "kg/d"),
            RequirementDefinition::scalar_output("Rsrv_CPgain", "kg/d"),
            RequirementDefinition::scalar_output("Rsrv_NPgain", "kg/d"),
            RequirementDefinition::scalar_output("Rsrv_NEgain", "Mcal/d"),
            RequirementDefinition::scalar_output("Body_Fatgain", "kg/d"),
            RequirementDefinition::scalar_output("Body_NPgain", "kg/d"),
            RequirementDefinition::scalar_output("Body_NPgain_g", "g/d"),
            RequirementDefinition::scalar_output("Body_NEgain", "Mcal/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&[
            gut_fill_coefficient(self.state),
            "FatGain_RsrvGain",
            "CPGain_RsrvGain",
            "Body_NP_CP",
            "En_Fat_Body",
            "En_CP_Body",
        ])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let bw = input_state.scalar("An_BW")?;
        let bw_mature = input_state.scalar("An_BW_mature")?;
        let gut_fill = context.coefficient(gut_fill_coefficient(self.state))?;
        let np_cp = context.coefficient("Body_NP_CP")?;
        let en_fat = context.coefficient("En_Fat_Body")?;
        let en_cp = context.coefficient("En_CP_Body")?;

        let frame_gain = input_state.scalar("Trg_FrmGain")? * (1.0 - gut_fill);
        let frame_fat = frame_gain * frame_fat_fraction(bw, bw_mature)?;
        let frame_cp = frame_gain * frame_cp_fraction(bw, bw_mature)?;
        let frame_ne = frame_fat * en_fat + frame_cp * en_cp;

        // Reserve gain is already on an empty-body basis
        let reserve_gain = input_state.scalar("Trg_RsrvGain")?;
        let reserve_fat = reserve_gain * context.coefficient("FatGain_RsrvGain")?;
        let reserve_cp = reserve_gain * context.coefficient("CPGain_RsrvGain")?;
        let reserve_ne = reserve_fat * en_fat + reserve_cp * en_cp;

        let body_np = (frame_cp + reserve_cp) * np_cp;

        let mut output = OutputState::new();
        output
            .set_scalar("Frm_Gain_empty", frame_gain)
            .set_scalar("Frm_Fatgain", frame_fat)
            .set_scalar("Frm_CPgain", frame_cp)
            .set_scalar("Frm_NPgain", frame_cp * np_cp)
            .set_scalar("Frm_NEgain", frame_ne)
            .set_scalar("Rsrv_Fatgain", reserve_fat)
            .set_scalar("Rsrv_CPgain", reserve_cp)
            .set_scalar("Rsrv_NPgain", reserve_cp * np_cp)
            .set_scalar("Rsrv_NEgain", reserve_ne)
            .set_scalar("Body_Fatgain", frame_fat + reserve_fat)
            .set_scalar("Body_NPgain", body_np)
            .set_scalar("Body_NPgain_g", body_np * 1000.0)
            .set_scalar("Body_NEgain", frame_ne + reserve_ne);
        Ok(output)
    }
}
