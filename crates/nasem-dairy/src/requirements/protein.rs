//! Metabolizable protein requirements
//!
//! Each net protein output is converted to MP use with its own efficiency.
//! Growth efficiency depends on the physiological state and on how close the
//! animal is to mature empty body weight.
//!
//! Heifers are evaluated in two passes. The first pass uses the target
//! growth efficiency. Heifer MP use may not fall below a minimum set by
//! approximate ME intake and maturity, see [`heifer_minimum_use`]. When the
//! first estimate is below it, the shortfall is added to frame MP use, frame
//! NP gain rises by the shortfall at the first-pass efficiency, and the
//! growth efficiency is recomputed from the new frame NP and MP.

use crate::inputs::PhysiologicalState;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

/// Scurf CP, g per kg^0.60 of BW
pub const SCURF_CP: f64 = 0.20;
pub const SCURF_CP_CALF: f64 = 0.219;
/// Endogenous urinary N, g per kg BW
pub const UR_N_END: f64 = 0.053;
/// True protein share of endogenous fecal CP
pub const FE_NP_CP_END: f64 = 0.73;
/// Lowest efficiency of MP use for growth
pub const KG_MP_NP_FLOOR: f64 = 0.394;

/// ME of digested protein that is not retained, Mcal/kg
pub const EN_CP_CATABOLISED: f64 = 4.0;

/// Fractions of mature empty BW bounding the heifer efficiency curve
const HEIFER_YOUNG: f64 = 0.12;
const HEIFER_MATURE: f64 = 0.83;

/// Target efficiency of MP use for growth before any recalculation.
///
/// `ebw_mature_fraction` is non-pregnant empty BW over mature empty BW.
/// `cow_efficiency` applies to every state other than calves and heifers.
pub fn growth_efficiency(state: PhysiologicalState, ebw_mature_fraction: f64, cow_efficiency: f64) -> f64 {
    let efficiency = match state {
        PhysiologicalState::Calf => 0.70 - 0.532 * ebw_mature_fraction,
        PhysiologicalState::Heifer if ebw_mature_fraction < HEIFER_YOUNG => 0.69,
        PhysiologicalState::Heifer if ebw_mature_fraction <= HEIFER_MATURE => {
            0.64 - 0.3 * ebw_mature_fraction
        }
        PhysiologicalState::Heifer => KG_MP_NP_FLOOR,
        _ => cow_efficiency,
    };
    efficiency.max(KG_MP_NP_FLOOR)
}

/// Lowest heifer MP use in g/d:
/// `(MinMPuse_Int_Heif - MinMPuse_BW_Heif * BW / BW_mature) * ME_approx`.
pub fn heifer_minimum_use(intercept: f64, slope: f64, bw_mature_fraction: f64, me_approx: f64) -> f64 {
    (intercept - slope * bw_mature_fraction) * me_approx
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinRequirement {
    state: PhysiologicalState,
}

impl ProteinRequirement {
    pub fn new(state: PhysiologicalState) -> Self {
        Self { state }
    }

    fn uses_cow_efficiency(&self) -> bool {
        !matches!(self.state, PhysiologicalState::Calf | PhysiologicalState::Heifer)
    }

    fn is_heifer(&self) -> bool {
        matches!(self.state, PhysiologicalState::Heifer)
    }

    /// ME intake less methane, leaving out urinary energy. Digested true
    /// protein that is not retained is counted at [`EN_CP_CATABOLISED`].
    fn approximate_me_intake(
        input_state: &InputState,
        context: &EvaluationContext,
        body_np: f64,
    ) -> NasemResult<f64> {
        let npn_cp_in = input_state.scalar("Dt_NPNCPIn")?;
        let digested_tp = input_state.scalar("An_DigCPaIn")? - npn_cp_in;
        Ok(input_state.scalar("An_DEInp")?
            + npn_cp_in * context.coefficient("En_NPNCP")?
            + (digested_tp - body_np) * EN_CP_CATABOLISED
            + body_np * context.coefficient("En_CP")?
            - input_state.scalar("An_GasEOut")?)
    }
}

#[typetag::serde]
impl Component for ProteinRequirement {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("An_BW", "kg"),
            RequirementDefinition::scalar_input("An_BW_EBWmature", "kg/kg"),
            RequirementDefinition::scalar_input("Fe_CPend_g", "g/d"),
            RequirementDefinition::scalar_input("Frm_NPgain", "kg/d"),
            RequirementDefinition::scalar_input("Rsrv_NPgain", "kg/d"),
            RequirementDefinition::scalar_input("Gest_NPgain_g", "g/d"),
            RequirementDefinition::scalar_input("Trg_Mlk_NP_g", "g/d"),
            RequirementDefinition::scalar_input("An_MPIn_g", "g/d"),
        ];
        if self.is_heifer() {
            definitions.extend([
                RequirementDefinition::scalar_input("An_BW_mature", "kg"),
                RequirementDefinition::scalar_input("An_DEInp", "Mcal/d"),
                RequirementDefinition::scalar_input("An_DigCPaIn", "kg/d"),
                RequirementDefinition::scalar_input("Dt_NPNCPIn", "kg/d"),
                RequirementDefinition::scalar_input("An_GasEOut", "Mcal/d"),
                RequirementDefinition::scalar_output("An_MEIn_approx", "Mcal/d"),
            ]);
        }
        definitions.extend([
            RequirementDefinition::scalar_output("Scrf_CP_g", "g/d"),
            RequirementDefinition::scalar_output("Scrf_NP_g", "g/d"),
            RequirementDefinition::scalar_output("Scrf_MPUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("Ur_Nend_g", "g/d"),
            RequirementDefinition::scalar_output("Ur_NPend_g", "g/d"),
            RequirementDefinition::scalar_output("Ur_MPendUse_g", "g/d"),
            RequirementDefinition::scalar_output("Fe_NPend_g", "g/d"),
            RequirementDefinition::scalar_output("Fe_MPendUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("An_MPm_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("Kg_MP_NP_Trg_initial", ""),
            RequirementDefinition::scalar_output("Kg_MP_NP_Trg", ""),
            RequirementDefinition::scalar_output("An_MPuse_g_Trg_initial", "g/d"),
            RequirementDefinition::scalar_output("An_MPuse_g_Trg_min", "g/d"),
            RequirementDefinition::scalar_output("Diff_MPuse_g", "g/d"),
            RequirementDefinition::scalar_output("Frm_NPgain_g", "g/d"),
            RequirementDefinition::scalar_output("Frm_MPUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("Rsrv_MPUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("Gest_MPUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("Mlk_MPUse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("An_MPuse_g_Trg", "g/d"),
            RequirementDefinition::scalar_output("An_MPBal_g_Trg", "g/d"),
        ]);
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        let mut names = coefficient_names(&[
            "Body_NP_CP",
            "Km_MP_NP_Trg",
            "Kl_MP_NP_Trg",
            "Ky_MP_NP_Trg",
            "Ky_NP_MP_Trg",
        ]);
        if self.uses_cow_efficiency() {
            names.push("Kg_MP_NP_Trg_Cow".to_string());
        }
        if self.is_heifer() {
            names.extend(coefficient_names(&[
                "MinMPuse_Int_Heif",
                "MinMPuse_BW_Heif",
                "En_CP",
                "En_NPNCP",
            ]));
        }
        names
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let bw = input_state.scalar("An_BW")?;
        let km = context.coefficient("Km_MP_NP_Trg")?;

        // Maintenance
        let scurf_coefficient = if self.state.is_calf() { SCURF_CP_CALF } else { SCURF_CP };
        let scurf_cp = scurf_coefficient * bw.powf(0.60);
        let scurf_np = scurf_cp * context.coefficient("Body_NP_CP")?;
        let scurf_mp = checked_div("Scrf_MPUse_g_Trg", scurf_np, km)?;
        let ur_n_end = UR_N_END * bw;
        let ur_np_end = ur_n_end * 6.25;
        let fe_np_end = input_state.scalar("Fe_CPend_g")? * FE_NP_CP_END;
        let fe_mp_end = checked_div("Fe_MPendUse_g_Trg", fe_np_end, km)?;
        let maintenance = scurf_mp + ur_np_end + fe_mp_end;

        let gest_np = input_state.scalar("Gest_NPgain_g")?;
        let gest_mp = if gest_np >= 0.0 {
            checked_div("Gest_MPUse_g_Trg", gest_np, context.coefficient("Ky_MP_NP_Trg")?)?
        } else {
            gest_np * context.coefficient("Ky_NP_MP_Trg")?
        };
        let milk_mp = if self.state.is_lactating() {
            checked_div(
                "Mlk_MPUse_g_Trg",
                input_state.scalar("Trg_Mlk_NP_g")?,
                context.coefficient("Kl_MP_NP_Trg")?,
            )?
        } else {
            0.0
        };
        let non_growth = maintenance + gest_mp + milk_mp;

        // Growth, first pass
        let cow_efficiency = if self.uses_cow_efficiency() {
            context.coefficient("Kg_MP_NP_Trg_Cow")?
        } else {
            0.0
        };
        let kg_initial = growth_efficiency(
            self.state,
            input_state.scalar("An_BW_EBWmature")?,
            cow_efficiency,
        );
        let frame_np_g = input_state.scalar("Frm_NPgain")? * 1000.0;
        let reserve_np_g = input_state.scalar("Rsrv_NPgain")? * 1000.0;
        let frame_mp_initial = frame_np_g / kg_initial;
        let reserve_mp = reserve_np_g / kg_initial;
        let use_initial = non_growth + frame_mp_initial + reserve_mp;

        // Growth, second pass for heifers below the minimum use
        let mut output = OutputState::new();
        let minimum = if self.is_heifer() {
            let me_approx =
                Self::approximate_me_intake(input_state, context, (frame_np_g + reserve_np_g) / 1000.0)?;
            output.set_scalar("An_MEIn_approx", me_approx);
            let bw_mature_fraction =
                checked_div("An_MPuse_g_Trg_min", bw, input_state.scalar("An_BW_mature")?)?;
            heifer_minimum_use(
                context.coefficient("MinMPuse_Int_Heif")?,
                context.coefficient("MinMPuse_BW_Heif")?,
                bw_mature_fraction,
                me_approx,
            )
        } else {
            use_initial
        };
        let diff = (minimum - use_initial).max(0.0);
        let frame_mp = frame_mp_initial + diff;
        let frame_np_adjusted = frame_np_g + diff * kg_initial;
        let kg = if diff > 0.0 {
            checked_div("Kg_MP_NP_Trg", frame_np_adjusted, frame_mp)?
        } else {
            kg_initial
        };
        let mp_use = use_initial + diff;

        output
            .set_scalar("Scrf_CP_g", scurf_cp)
            .set_scalar("Scrf_NP_g", scurf_np)
            .set_scalar("Scrf_MPUse_g_Trg", scurf_mp)
            .set_scalar("Ur_Nend_g", ur_n_end)
            .set_scalar("Ur_NPend_g", ur_np_end)
            .set_scalar("Ur_MPendUse_g", ur_np_end)
            .set_scalar("Fe_NPend_g", fe_np_end)
            .set_scalar("Fe_MPendUse_g_Trg", fe_mp_end)
            .set_scalar("An_MPm_g_Trg", maintenance)
            .set_scalar("Kg_MP_NP_Trg_initial", kg_initial)
            .set_scalar("Kg_MP_NP_Trg", kg)
            .set_scalar("An_MPuse_g_Trg_initial", use_initial)
            .set_scalar("An_MPuse_g_Trg_min", use_initial.max(minimum))
            .set_scalar("Diff_MPuse_g", diff)
            .set_scalar("Frm_NPgain_g", frame_np_adjusted)
            .set_scalar("Frm_MPUse_g_Trg", frame_mp)
            .set_scalar("Rsrv_MPUse_g_Trg", reserve_mp)
            .set_scalar("Gest_MPUse_g_Trg", gest_mp)
            .set_scalar("Mlk_MPUse_g_Trg", milk_mp)
            .set_scalar("An_MPuse_g_Trg", mp_use)
            .set_scalar("An_MPBal_g_Trg", input_state.scalar("An_MPIn_g")? - mp_use);
        Ok(output)
    }
}
