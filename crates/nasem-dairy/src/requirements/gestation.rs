//! Gravid uterus growth
//!
//! The uterus and its contents grow exponentially towards their weight at
//! calving, with a synthesis rate that decays over gestation. After calving
//! the uterus involutes back to its non-pregnant weight.
//!
//! # Reference
//!
//! During gestation, for a weight at calving $W_{part}$, gestation length $L$ and day $d$:
//!
//! $$W = W_{part} \cdot e^{-(k_{syn} - k_{decay} d)(L - d)}$$
//!
//! After calving, on lactation day $t$:
//!
//! $$W = (W_{part} - W_{np}) e^{-k_{part} t} + W_{np}$$

use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// Days after calving over which involution is modelled
pub const INVOLUTION_DAYS: f64 = 100.0;

/// Phase of the reproductive cycle that drives uterine weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestationPhase {
    Pregnant,
    Involuting,
    Open,
}

pub fn gestation_phase(gest_day: f64, gest_length: f64, lact_day: f64, parity: f64) -> GestationPhase {
    if gest_day > 0.0 && gest_day <= gest_length {
        GestationPhase::Pregnant
    } else if parity > 0.0 && lact_day > 0.0 && lact_day < INVOLUTION_DAYS {
        GestationPhase::Involuting
    } else {
        GestationPhase::Open
    }
}

/// Daily fractional synthesis rate on a gestation day.
pub fn synthesis_rate(k_syn: f64, k_decay: f64, gest_day: f64) -> f64 {
    k_syn - k_decay * gest_day
}

/// Weight on a gestation day, growing towards `weight_at_calving`.
pub fn pregnant_weight(
    weight_at_calving: f64,
    k_syn: f64,
    k_decay: f64,
    gest_day: f64,
    gest_length: f64,
) -> f64 {
    weight_at_calving * (-synthesis_rate(k_syn, k_decay, gest_day) * (gest_length - gest_day)).exp()
}

/// Weight after calving, involuting towards `weight_non_pregnant`.
pub fn involuting_weight(weight_at_calving: f64, weight_non_pregnant: f64, k_part: f64, lact_day: f64) -> f64 {
    (weight_at_calving - weight_non_pregnant) * (-k_part * lact_day).exp() + weight_non_pregnant
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gestation {}

impl Gestation {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for Gestation {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_GestDay", "d"),
            RequirementDefinition::scalar_input("An_GestLength", "d"),
            RequirementDefinition::scalar_input("An_LactDay", "d"),
            RequirementDefinition::scalar_input("An_Parity_rl", ""),
            RequirementDefinition::scalar_input("Fet_BWbrth", "kg"),
            RequirementDefinition::scalar_output("Uter_Wtpart", "kg"),
            RequirementDefinition::scalar_output("GrUter_Wtpart", "kg"),
            RequirementDefinition::scalar_output("Uter_Wt", "kg"),
            RequirementDefinition::scalar_output("GrUter_Wt", "kg"),
            RequirementDefinition::scalar_output("Uter_BWgain", "kg/d"),
            RequirementDefinition::scalar_output("GrUter_BWgain", "kg/d"),
            RequirementDefinition::scalar_output("Gest_NCPgain_g", "g/d"),
            RequirementDefinition::scalar_output("Gest_NPgain_g", "g/d"),
            RequirementDefinition::scalar_output("Gest_REgain", "Mcal/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&[
            "UterWt_FetBWbrth",
            "Uter_Ksyn",
            "Uter_KsynDecay",
            "Uter_Kpart",
            "Uter_Wt_NonPreg",
            "GrUterWt_FetBWbrth",
            "GrUter_Ksyn",
            "GrUter_KsynDecay",
            "CP_GrUtWt",
            "NE_GrUtWt",
            "Body_NP_CP",
        ])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let gest_day = input_state.scalar("An_GestDay")?;
        let gest_length = input_state.scalar("An_GestLength")?;
        let lact_day = input_state.scalar("An_LactDay")?;
        let parity = input_state.scalar("An_Parity_rl")?;
        let fetal_bw = input_state.scalar("Fet_BWbrth")?;

        let uter_ksyn = context.coefficient("Uter_Ksyn")?;
        let uter_decay = context.coefficient("Uter_KsynDecay")?;
        let gr_uter_ksyn = context.coefficient("GrUter_Ksyn")?;
        let gr_uter_decay = context.coefficient("GrUter_KsynDecay")?;
        let k_part = context.coefficient("Uter_Kpart")?;
        let non_pregnant = context.coefficient("Uter_Wt_NonPreg")?;

        let uter_part = fetal_bw * context.coefficient("UterWt_FetBWbrth")?;
        let gr_uter_part = fetal_bw * context.coefficient("GrUterWt_FetBWbrth")?;

        let (mut uter_wt, mut gr_uter_wt, uter_gain, gr_uter_gain) =
            match gestation_phase(gest_day, gest_length, lact_day, parity) {
                GestationPhase::Pregnant => {
                    let uter = pregnant_weight(uter_part, uter_ksyn, uter_decay, gest_day, gest_length);
                    let gr_uter =
                        pregnant_weight(gr_uter_part, gr_uter_ksyn, gr_uter_decay, gest_day, gest_length);
                    (
                        uter,
                        gr_uter,
                        synthesis_rate(uter_ksyn, uter_decay, gest_day) * uter,
                        synthesis_rate(gr_uter_ksyn, gr_uter_decay, gest_day) * gr_uter,
                    )
                }
                GestationPhase::Involuting => {
                    let uter = involuting_weight(uter_part, non_pregnant, k_part, lact_day);
                    let loss = -k_part * (uter - non_pregnant);
                    (uter, uter, loss, loss)
                }
                GestationPhase::Open => (0.0, 0.0, 0.0, 0.0),
            };

        // A parous uterus never shrinks below its non-pregnant weight
        if parity > 0.0 {
            uter_wt = uter_wt.max(non_pregnant);
            gr_uter_wt = gr_uter_wt.max(uter_wt);
        }

        let ncp_gain_g = gr_uter_gain * context.coefficient("CP_GrUtWt")? * 1000.0;

        let mut output = OutputState::new();
        output
            .set_scalar("Uter_Wtpart", uter_part)
            .set_scalar("GrUter_Wtpart", gr_uter_part)
            .set_scalar("Uter_Wt", uter_wt)
            .set_scalar("GrUter_Wt", gr_uter_wt)
            .set_scalar("Uter_BWgain", uter_gain)
            .set_scalar("GrUter_BWgain", gr_uter_gain)
            .set_scalar("Gest_NCPgain_g", ncp_gain_g)
            .set_scalar("Gest_NPgain_g", ncp_gain_g * context.coefficient("Body_NP_CP")?)
            .set_scalar("Gest_REgain", gr_uter_gain * context.coefficient("NE_GrUtWt")?);
        Ok(output)
    }
}
