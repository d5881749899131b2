//! Microbial protein synthesis and its flow to the duodenum
//!
//! Three predictions of microbial nitrogen are available. The NRC (2021)
//! equation saturates in ruminally digested NDF and starch, with a maximum
//! rate that rises with degradable protein supply:
//!
//! $$MiN = \frac{V_m}{1 + K_{NDF} / RDNDF + K_{St} / RDSt}$$
//!
//! where $V_m = V_{int} + V_{slope} \cdot RDP_{max}$. The two alternates are
//! a linear regression with interaction terms and a saturating form. Which of
//! them reaches `Du_MiN_g` is decided by [`crate::dispatch::microbial`].

use nasem_core::component::{
    aa_coefficient_names, coefficient_names, Component, EvaluationContext, InputState,
    OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

use crate::parameters::MICROBIAL_PROFILE;

/// Protein to nitrogen conversion
pub const CP_N: f64 = 6.25;
/// Dietary RDP concentration above which degradable protein no longer
/// raises maximum microbial growth, % of DM
pub const RDP_SATURATION: f64 = 12.0;

/// Degradable protein used to set the maximum microbial growth rate, kg/d.
///
/// Above [`RDP_SATURATION`] the supply is replaced by 12 % of the diet's dry matter intake.
pub fn rdp_in_for_max_growth(rdp_in: f64, rdp_pct: f64, dmi: f64) -> f64 {
    if rdp_pct <= RDP_SATURATION {
        rdp_in
    } else {
        dmi * RDP_SATURATION / 100.0
    }
}

/// Coefficients of the NRC (2021) microbial nitrogen equation.
#[derive(Debug, Clone, Copy)]
pub struct NrcMicrobialParameters {
    pub vm_intercept: f64,
    pub vm_rdp_slope: f64,
    pub km_ndf: f64,
    pub km_starch: f64,
}

/// NRC (2021) microbial nitrogen, g/d, before the degradable-protein cap.
pub fn microbial_n_nrc(
    params: &NrcMicrobialParameters,
    rdp_in_max: f64,
    rum_dig_ndf_in: f64,
    rum_dig_starch_in: f64,
) -> NasemResult<f64> {
    let vm = params.vm_intercept + params.vm_rdp_slope * rdp_in_max;
    let denominator = 1.0
        + checked_div("Du_MiN_NRC2021_g", params.km_ndf, rum_dig_ndf_in)?
        + checked_div("Du_MiN_NRC2021_g", params.km_starch, rum_dig_starch_in)?;
    Ok(vm / denominator)
}

/// Microbial nitrogen cannot exceed the nitrogen in degradable protein.
pub fn cap_to_rdp_n(microbial_n_g: f64, rdp_in: f64) -> f64 {
    microbial_n_g.min(rdp_in * 1000.0 / CP_N)
}

/// Coefficients of the linear alternate, in the order they multiply the
/// terms of [`microbial_n_linear`].
#[derive(Debug, Clone, Copy)]
pub struct LinearMicrobialParameters {
    pub intercept: f64,
    pub k_rd_starch: f64,
    pub k_rd_ndf: f64,
    pub k_rdp: f64,
    pub k_rom: f64,
    pub k_forage_ndf: f64,
    pub k_rom2: f64,
    pub k_rd_starch_x_rom: f64,
    pub k_rd_ndf_x_forage_ndf: f64,
}

/// Linear alternate microbial nitrogen, g/d. Intakes in kg/d.
pub fn microbial_n_linear(
    params: &LinearMicrobialParameters,
    rd_starch: f64,
    rd_ndf: f64,
    rdp_in: f64,
    rom_in: f64,
    forage_ndf_in: f64,
) -> f64 {
    params.intercept
        + params.k_rd_starch * rd_starch
        + params.k_rd_ndf * rd_ndf
        + params.k_rdp * rdp_in
        + params.k_rom * rom_in
        + params.k_forage_ndf * forage_ndf_in
        + params.k_rom2 * rom_in.powi(2)
        + params.k_rd_starch_x_rom * rd_starch * rom_in
        + params.k_rd_ndf_x_forage_ndf * rd_ndf * forage_ndf_in
}

#[derive(Debug, Clone, Copy)]
pub struct SaturatingMicrobialParameters {
    pub intercept: f64,
    pub k_rdp: f64,
    pub k_rd_ndf: f64,
    pub k_rd_starch: f64,
}

/// Saturating alternate microbial nitrogen, g/d.
pub fn microbial_n_saturating(
    params: &SaturatingMicrobialParameters,
    rdp_in: f64,
    rd_ndf: f64,
    rd_starch: f64,
) -> NasemResult<f64> {
    let denominator = 1.0
        + checked_div("Du_MiN_VTnln_g", params.k_rd_ndf, rd_ndf)?
        + checked_div("Du_MiN_VTnln_g", params.k_rd_starch, rd_starch)?;
    Ok(params.intercept + params.k_rdp * rdp_in * 1000.0 / denominator)
}

/// Microbial protein and amino-acid flows from the selected microbial nitrogen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MicrobialFlows {}

impl MicrobialFlows {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for MicrobialFlows {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Du_MiN_g", "g/d"),
            RequirementDefinition::scalar_input("An_RDPIn", "kg/d"),
            RequirementDefinition::scalar_output("Du_MiCP_g", "g/d"),
            RequirementDefinition::scalar_output("Du_MiCP", "kg/d"),
            RequirementDefinition::scalar_output("Du_MiTP_g", "g/d"),
            RequirementDefinition::scalar_output("Du_idMiCP_g", "g/d"),
            RequirementDefinition::scalar_output("Du_idMiTP_g", "g/d"),
            RequirementDefinition::scalar_output("Du_idMiTP", "kg/d"),
            RequirementDefinition::scalar_output("An_RDPbal_g", "g/d"),
            RequirementDefinition::series_output("Du_AAMic", "g/d"),
            RequirementDefinition::series_output("Du_IdAAMic", "g/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        let mut names = coefficient_names(&["fMiTP_MiCP", "SI_dcMiCP"]);
        names.extend(aa_coefficient_names(MICROBIAL_PROFILE));
        names
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let micp_g = input_state.scalar("Du_MiN_g")? * CP_N;
        let mitp_g = micp_g * context.coefficient("fMiTP_MiCP")?;
        let si_dc = context.coefficient("SI_dcMiCP")? / 100.0;
        let id_mitp_g = mitp_g * si_dc;

        let aa_mic = context.per_aa(MICROBIAL_PROFILE)?.map(|_, prof| mitp_g * prof / 100.0);
        let id_aa_mic = aa_mic.scale(si_dc);

        let mut output = OutputState::new();
        output
            .set_scalar("Du_MiCP_g", micp_g)
            .set_scalar("Du_MiCP", micp_g / 1000.0)
            .set_scalar("Du_MiTP_g", mitp_g)
            .set_scalar("Du_idMiCP_g", micp_g * si_dc)
            .set_scalar("Du_idMiTP_g", id_mitp_g)
            .set_scalar("Du_idMiTP", id_mitp_g / 1000.0)
            .set_scalar("An_RDPbal_g", input_state.scalar("An_RDPIn")? * 1000.0 - micp_g)
            .set_series("Du_AAMic", aa_mic)
            .set_series("Du_IdAAMic", id_aa_mic);
        Ok(output)
    }
}
