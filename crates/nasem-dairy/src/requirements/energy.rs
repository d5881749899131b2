//! Metabolizable energy requirements
//!
//! Net energy for maintenance, growth, reserves, pregnancy and milk is
//! converted to metabolizable energy with a function-specific efficiency and
//! summed to the target ME use, `Trg_MEuse`.

use crate::inputs::PhysiologicalState;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

/// Non-stressed maintenance, Mcal NE per kg^0.75 of non-pregnant BW
pub const NEM_NON_STRESSED: f64 = 0.10;
/// Calf maintenance, Mcal NE per kg^0.75 of empty BW
pub const NEM_CALF: f64 = 0.0769;

/// Walking to and from the parlour, Mcal per kg BW per km.
pub fn parlor_activity(dist_parlor: f64, trips_parlor: f64, bw: f64) -> f64 {
    0.00035 * dist_parlor / 1000.0 * trips_parlor * bw
}

/// Climbing, Mcal per kg BW per km of vertical distance.
pub fn topography_activity(topography: f64, bw: f64) -> f64 {
    0.0067 * topography / 1000.0 * bw
}

fn maintenance_efficiency(state: PhysiologicalState) -> &'static str {
    match state {
        PhysiologicalState::Calf => "Km_ME_NE_Clf",
        PhysiologicalState::Heifer => "Km_ME_NE_Heif",
        _ => "Km_ME_NE_Cow",
    }
}

fn frame_efficiency(state: PhysiologicalState) -> &'static str {
    if state.is_calf() {
        "Kf_ME_RE_Clf"
    } else {
        "Kf_ME_RE"
    }
}

/// Efficiency of ME use for reserve energy.
///
/// Mobilised or unchanged reserves are used at `Kr_ME_RE_Mobil`. Reserves
/// deposited during lactation use `Kr_ME_RE_Lact`, any other deposit
/// `Kr_ME_RE_Dry`.
pub fn reserve_efficiency(state: PhysiologicalState, reserve_ne_gain: f64) -> &'static str {
    if reserve_ne_gain <= 0.0 {
        "Kr_ME_RE_Mobil"
    } else if state.is_lactating() {
        "Kr_ME_RE_Lact"
    } else {
        "Kr_ME_RE_Dry"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyRequirement {
    state: PhysiologicalState,
}

impl EnergyRequirement {
    pub fn new(state: PhysiologicalState) -> Self {
        Self { state }
    }
}

#[typetag::serde]
impl Component for EnergyRequirement {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_BW", "kg"),
            RequirementDefinition::scalar_input("An_BWnp3", "kg^0.75"),
            RequirementDefinition::scalar_input("An_EBWnp", "kg"),
            RequirementDefinition::scalar_input("Env_DistParlor", "m"),
            RequirementDefinition::scalar_input("Env_TripsParlor", "trips/d"),
            RequirementDefinition::scalar_input("Env_Topo", "m"),
            RequirementDefinition::scalar_input("Frm_NEgain", "Mcal/d"),
            RequirementDefinition::scalar_input("Rsrv_NEgain", "Mcal/d"),
            RequirementDefinition::scalar_input("Gest_REgain", "Mcal/d"),
            RequirementDefinition::scalar_input("Trg_NEmilkOut", "Mcal/d"),
            RequirementDefinition::scalar_output("An_NEmUse_NS", "Mcal/d"),
            RequirementDefinition::scalar_output("An_NEm_Act", "Mcal/d"),
            RequirementDefinition::scalar_output("An_NEmUse", "Mcal/d"),
            RequirementDefinition::scalar_output("An_MEmUse", "Mcal/d"),
            RequirementDefinition::scalar_output("Kr_ME_RE", ""),
            RequirementDefinition::scalar_output("Frm_MEgain", "Mcal/d"),
            RequirementDefinition::scalar_output("Rsrv_MEgain", "Mcal/d"),
            RequirementDefinition::scalar_output("An_MEgain", "Mcal/d"),
            RequirementDefinition::scalar_output("Gest_MEuse", "Mcal/d"),
            RequirementDefinition::scalar_output("Trg_Mlk_MEout", "Mcal/d"),
            RequirementDefinition::scalar_output("Trg_MEuse", "Mcal/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&[
            maintenance_efficiency(self.state),
            frame_efficiency(self.state),
            "Kr_ME_RE_Lact",
            "Kr_ME_RE_Mobil",
            "Kr_ME_RE_Dry",
            "Ky_ME_NE",
            "Kl_ME_NE",
        ])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let bw = input_state.scalar("An_BW")?;
        let nem_ns = if self.state.is_calf() {
            NEM_CALF * input_state.scalar("An_EBWnp")?.max(0.0).powf(0.75)
        } else {
            NEM_NON_STRESSED * input_state.scalar("An_BWnp3")?
        };
        let activity = parlor_activity(
            input_state.scalar("Env_DistParlor")?,
            input_state.scalar("Env_TripsParlor")?,
            bw,
        ) + topography_activity(input_state.scalar("Env_Topo")?, bw);
        let nem_use = nem_ns + activity;
        let mem_use = checked_div(
            "An_MEmUse",
            nem_use,
            context.coefficient(maintenance_efficiency(self.state))?,
        )?;

        let frame_me = checked_div(
            "Frm_MEgain",
            input_state.scalar("Frm_NEgain")?,
            context.coefficient(frame_efficiency(self.state))?,
        )?;
        let reserve_ne = input_state.scalar("Rsrv_NEgain")?;
        let kr = context.coefficient(reserve_efficiency(self.state, reserve_ne))?;
        let reserve_me = checked_div("Rsrv_MEgain", reserve_ne, kr)?;
        let gest_me = checked_div(
            "Gest_MEuse",
            input_state.scalar("Gest_REgain")?,
            context.coefficient("Ky_ME_NE")?,
        )?;
        let milk_me = if self.state.is_lactating() {
            checked_div(
                "Trg_Mlk_MEout",
                input_state.scalar("Trg_NEmilkOut")?,
                context.coefficient("Kl_ME_NE")?,
            )?
        } else {
            0.0
        };

        let mut output = OutputState::new();
        output
            .set_scalar("An_NEmUse_NS", nem_ns)
            .set_scalar("An_NEm_Act", activity)
            .set_scalar("An_NEmUse", nem_use)
            .set_scalar("An_MEmUse", mem_use)
            .set_scalar("Kr_ME_RE", kr)
            .set_scalar("Frm_MEgain", frame_me)
            .set_scalar("Rsrv_MEgain", reserve_me)
            .set_scalar("An_MEgain", frame_me + reserve_me)
            .set_scalar("Gest_MEuse", gest_me)
            .set_scalar("Trg_Mlk_MEout", milk_me)
            .set_scalar("Trg_MEuse", mem_use + frame_me + reserve_me + gest_me + milk_me);
        Ok(output)
    }
}
