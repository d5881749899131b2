//! Total-tract digestion of fibre, starch, fat and protein
//!
//! Digestibilities of NDF and starch are first set from feed composition and
//! then depressed for starch level and intake above 3.5 % of body weight.
//! Fecal protein is built up from undigested RUP, undigested microbial
//! protein and endogenous losses.

use crate::dispatch::{NdfDigestibility, Toggle};
use crate::inputs::PhysiologicalState;
use crate::rumen::microbial::CP_N;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::{checked_div, checked_powf, ratio_or_zero, ClampPolicy};
use serde::{Deserialize, Serialize};

/// Total-tract NDF digestibility after adjustments, %
pub const TT_DC_NDF_CLAMP: ClampPolicy = ClampPolicy::Floor(0.0);
/// Digested starch after the intake adjustment, kg/d
pub const DIG_STARCH_CLAMP: ClampPolicy = ClampPolicy::Floor(0.0);
/// Share of NDF from forage
const FORAGE_SHARE_CLAMP: ClampPolicy = ClampPolicy::Range { min: 0.0, max: 1.0 };

/// Intake level, % of BW, at which feed digestibilities are measured
pub const REFERENCE_INTAKE_BW: f64 = 3.5;
/// Dietary starch, % of DM, at which NDF digestibility is measured
pub const REFERENCE_STARCH: f64 = 26.0;

/// NDF digestibility predicted from lignin, %.
pub fn lignin_ndf_digestibility(ndf: f64, lignin: f64) -> NasemResult<f64> {
    let lignin_share = checked_div("TT_dcNDF_Base", lignin, ndf)?;
    let indigestible = checked_powf("TT_dcNDF_Base", lignin_share, 0.667)?;
    Ok(0.75 * (ndf - lignin) * (1.0 - indigestible) / ndf * 100.0)
}

/// NDF digestibility predicted from 48 h in vitro digestibility, %.
pub fn in_vitro_ndf_digestibility(dndf48: f64) -> f64 {
    12.0 + 0.61 * dndf48
}

/// Depress a base NDF digestibility for starch and intake level.
pub fn adjusted_ndf_digestibility(base: f64, starch: f64, dmi_bw: f64) -> f64 {
    TT_DC_NDF_CLAMP.apply(
        base - 0.59 * (starch - REFERENCE_STARCH) - 1.1 * (dmi_bw * 100.0 - REFERENCE_INTAKE_BW),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiberDigestion {
    method: NdfDigestibility,
}

impl FiberDigestion {
    pub fn new(method: NdfDigestibility) -> Self {
        Self { method }
    }

    fn base_digestibility(&self, input_state: &InputState) -> NasemResult<f64> {
        let ndf = input_state.scalar("Dt_NDF")?;
        match self.method {
            NdfDigestibility::Lignin => lignin_ndf_digestibility(ndf, input_state.scalar("Dt_Lg")?),
            NdfDigestibility::InVitroAll => Ok(in_vitro_ndf_digestibility(
                input_state.scalar("Dt_DNDF48_NDF")?,
            )),
            NdfDigestibility::InVitroForage => {
                let forage_share =
                    FORAGE_SHARE_CLAMP.apply(checked_div("TT_dcNDF_Base", input_state.scalar("Dt_ForNDF")?, ndf)?);
                let forage = in_vitro_ndf_digestibility(input_state.scalar("Dt_ForDNDF48_ForNDF")?);
                let rest = lignin_ndf_digestibility(ndf, input_state.scalar("Dt_Lg")?)?;
                Ok(forage_share * forage + (1.0 - forage_share) * rest)
            }
        }
    }
}

#[typetag::serde]
impl Component for FiberDigestion {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("Dt_NDF", "% DM"),
            RequirementDefinition::scalar_input("Dt_St", "% DM"),
            RequirementDefinition::scalar_input("Dt_NDFIn", "kg/d"),
            RequirementDefinition::scalar_input("Inf_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DMIn_BW", "kg/kg"),
        ];
        let method_inputs: &[&str] = match self.method {
            NdfDigestibility::Lignin => &["Dt_Lg"],
            NdfDigestibility::InVitroAll => &["Dt_DNDF48_NDF"],
            NdfDigestibility::InVitroForage => &["Dt_Lg", "Dt_ForNDF", "Dt_ForDNDF48_ForNDF"],
        };
        definitions.extend(
            method_inputs
                .iter()
                .map(|n| RequirementDefinition::scalar_input(n, "% DM")),
        );
        definitions.extend([
            RequirementDefinition::scalar_output("TT_dcNDF_Base", "%"),
            RequirementDefinition::scalar_output("TT_dcNDF", "%"),
            RequirementDefinition::scalar_output("Dt_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DigNDF", "% DM"),
        ]);
        definitions
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let base = self.base_digestibility(input_state)?;
        let dc_ndf = adjusted_ndf_digestibility(
            base,
            input_state.scalar("Dt_St")?,
            input_state.scalar("An_DMIn_BW")?,
        );
        let dt_dig = dc_ndf / 100.0 * input_state.scalar("Dt_NDFIn")?;
        let an_dig = dt_dig + input_state.scalar("Inf_DigNDFIn")?;

        let mut output = OutputState::new();
        output
            .set_scalar("TT_dcNDF_Base", base)
            .set_scalar("TT_dcNDF", dc_ndf)
            .set_scalar("Dt_DigNDFIn", dt_dig)
            .set_scalar("An_DigNDFIn", an_dig)
            .set_scalar(
                "An_DigNDF",
                checked_div("An_DigNDF", an_dig, input_state.scalar("An_DMIn")?)? * 100.0,
            );
        Ok(output)
    }
}

/// Digested starch and fatty acids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StarchFatDigestion {}

impl StarchFatDigestion {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for StarchFatDigestion {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Dt_StIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_DigStIn_Base", "kg/d"),
            RequirementDefinition::scalar_input("Inf_DigStIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_FAIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_DigFAIn", "kg/d"),
            RequirementDefinition::scalar_input("Inf_DigFAIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_C160In", "kg/d"),
            RequirementDefinition::scalar_input("Dt_C183In", "kg/d"),
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DMIn_BW", "kg/kg"),
            RequirementDefinition::scalar_output("Dt_DigStIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DigStIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DigFAIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_DigC160In", "kg/d"),
            RequirementDefinition::scalar_output("Dt_DigC183In", "kg/d"),
            RequirementDefinition::scalar_output("An_DigSt", "% DM"),
            RequirementDefinition::scalar_output("An_DigFA", "% DM"),
        ]
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let dmi = input_state.scalar("An_DMIn")?;
        let starch_in = input_state.scalar("Dt_StIn")?;
        // One unit of digestibility is lost per unit of intake above the reference level
        let intake_loss = 0.01 * (input_state.scalar("An_DMIn_BW")? * 100.0 - REFERENCE_INTAKE_BW);
        let dt_dig_starch =
            DIG_STARCH_CLAMP.apply(input_state.scalar("Dt_DigStIn_Base")? - intake_loss * starch_in);
        let an_dig_starch = dt_dig_starch + input_state.scalar("Inf_DigStIn")?;

        let dt_dig_fa = input_state.scalar("Dt_DigFAIn")?;
        let dc_fa = ratio_or_zero(dt_dig_fa, input_state.scalar("Dt_FAIn")?);
        let an_dig_fa = dt_dig_fa + input_state.scalar("Inf_DigFAIn")?;

        let mut output = OutputState::new();
        output
            .set_scalar("Dt_DigStIn", dt_dig_starch)
            .set_scalar("An_DigStIn", an_dig_starch)
            .set_scalar("An_DigFAIn", an_dig_fa)
            .set_scalar("Dt_DigC160In", input_state.scalar("Dt_C160In")? * dc_fa)
            .set_scalar("Dt_DigC183In", input_state.scalar("Dt_C183In")? * dc_fa)
            .set_scalar("An_DigSt", checked_div("An_DigSt", an_dig_starch, dmi)? * 100.0)
            .set_scalar("An_DigFA", checked_div("An_DigFA", an_dig_fa, dmi)? * 100.0);
        Ok(output)
    }
}

/// Endogenous fecal crude protein, g/d.
pub fn endogenous_fecal_cp_g(state: PhysiologicalState, dmi: f64, ndf: f64) -> f64 {
    if state.is_calf() {
        11.9 * dmi
    } else {
        (12.0 + 0.12 * ndf) * dmi
    }
}

/// Fecal crude protein from the Lucas relationship between dietary CP and
/// apparently digested CP, kg/d.
///
/// An alternate to the mechanistic fecal protein of [`ProteinDigestion`];
/// it is not used by the default model.
pub fn lucas_fecal_cp(cp_in: f64, dmi: f64) -> NasemResult<f64> {
    let cp = checked_div("Fe_CP_Lucas", cp_in, dmi)? * 100.0;
    let digestible = (0.9 * cp - 3.0) / 100.0 * dmi;
    Ok(cp_in - digestible)
}

/// Fecal protein and digestible protein.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinDigestion {
    state: PhysiologicalState,
    non_milk_cp_discount: Toggle,
}

impl ProteinDigestion {
    pub fn new(state: PhysiologicalState, non_milk_cp_discount: Toggle) -> Self {
        Self {
            state,
            non_milk_cp_discount,
        }
    }

    fn discounts_calf_liquid(&self) -> bool {
        self.state.is_calf() && self.non_milk_cp_discount.is_on()
    }
}

#[typetag::serde]
impl Component for ProteinDigestion {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("An_CPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_RUPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_idRUPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("An_NDF", "% DM"),
            RequirementDefinition::scalar_input("Du_MiCP_g", "g/d"),
            RequirementDefinition::scalar_input("Du_idMiCP_g", "g/d"),
        ];
        if self.discounts_calf_liquid() {
            definitions.push(RequirementDefinition::scalar_input("Dt_NonMilkCPIn_ClfLiq", "kg/d"));
        }
        definitions.extend([
            RequirementDefinition::scalar_output("Fe_RUP", "kg/d"),
            RequirementDefinition::scalar_output("Fe_RumMiCP", "kg/d"),
            RequirementDefinition::scalar_output("Fe_CPend_g", "g/d"),
            RequirementDefinition::scalar_output("Fe_CP", "kg/d"),
            RequirementDefinition::scalar_output("Fe_N_g", "g/d"),
            RequirementDefinition::scalar_output("An_DigCPaIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DigCPtIn", "kg/d"),
            RequirementDefinition::scalar_output("An_DigCPa", "% DM"),
        ]);
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        if self.discounts_calf_liquid() {
            coefficient_names(&["dcNonMilkCP_ClfLiq"])
        } else {
            vec![]
        }
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let cp_in = input_state.scalar("An_CPIn")?;
        let dmi = input_state.scalar("An_DMIn")?;
        let fe_rup = input_state.scalar("An_RUPIn")? - input_state.scalar("An_idRUPIn")?;
        let fe_mi_cp =
            (input_state.scalar("Du_MiCP_g")? - input_state.scalar("Du_idMiCP_g")?) / 1000.0;
        let fe_cp_end_g = endogenous_fecal_cp_g(self.state, dmi, input_state.scalar("An_NDF")?);

        let mut fe_cp = fe_rup + fe_mi_cp + fe_cp_end_g / 1000.0;
        if self.discounts_calf_liquid() {
            // Non-milk protein in milk replacer is less digestible than milk protein
            fe_cp += input_state.scalar("Dt_NonMilkCPIn_ClfLiq")?
                * (1.0 - context.coefficient("dcNonMilkCP_ClfLiq")?);
        }
        let dig_cp_a = cp_in - fe_cp;

        let mut output = OutputState::new();
        output
            .set_scalar("Fe_RUP", fe_rup)
            .set_scalar("Fe_RumMiCP", fe_mi_cp)
            .set_scalar("Fe_CPend_g", fe_cp_end_g)
            .set_scalar("Fe_CP", fe_cp)
            .set_scalar("Fe_N_g", fe_cp * 1000.0 / CP_N)
            .set_scalar("An_DigCPaIn", dig_cp_a)
            .set_scalar("An_DigCPtIn", dig_cp_a + fe_cp_end_g / 1000.0)
            .set_scalar("An_DigCPa", checked_div("An_DigCPa", dig_cp_a, dmi)? * 100.0);
        Ok(output)
    }
}
