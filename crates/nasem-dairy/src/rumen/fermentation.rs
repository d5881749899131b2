//! Ruminal digestion of NDF and starch
//!
//! Both digestibilities are empirical regressions on diet composition and
//! intake. The regressions can extrapolate outside a physical range, so each
//! result is bounded by a [`ClampPolicy`].
//!
//! # Reference
//!
//! $$dc_{NDF} = -31.9 + 0.721 NDF - 0.247 St + 6.63 CP - 0.211 CP^2
//!             - 0.387 \frac{ADF}{NDF} 100 - 0.121 ForWet + 1.51 DMI$$
//!
//! $$dc_{St} = 70.6 - 1.45 DMI + 0.424 ForNDF + 1.39 St - 0.0219 St^2 - 0.154 ForWet$$

use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::ClampPolicy;
use serde::{Deserialize, Serialize};

/// Ruminal NDF digestibility, %. An undefined value also becomes the floor.
pub const RUM_DC_NDF_CLAMP: ClampPolicy = ClampPolicy::Floor(0.1);
/// Ruminal starch digestibility, %
pub const RUM_DC_ST_CLAMP: ClampPolicy = ClampPolicy::Range { min: 0.1, max: 100.0 };

/// Unbounded ruminal NDF digestibility regression.
///
/// A zero NDF concentration makes the ADF:NDF ratio undefined; the result is
/// then `NaN` or infinite and left for [`RUM_DC_NDF_CLAMP`] to bound.
pub fn rumen_ndf_digestibility_raw(
    ndf: f64,
    starch: f64,
    cp: f64,
    adf: f64,
    forage_wet: f64,
    dmi: f64,
) -> f64 {
    -31.9 + 0.721 * ndf - 0.247 * starch + 6.63 * cp - 0.211 * cp.powi(2)
        - 0.387 * adf / ndf * 100.0
        - 0.121 * forage_wet
        + 1.51 * dmi
}

pub fn rumen_ndf_digestibility(
    ndf: f64,
    starch: f64,
    cp: f64,
    adf: f64,
    forage_wet: f64,
    dmi: f64,
) -> f64 {
    RUM_DC_NDF_CLAMP.apply(rumen_ndf_digestibility_raw(ndf, starch, cp, adf, forage_wet, dmi))
}

/// Unbounded ruminal starch digestibility regression.
pub fn rumen_starch_digestibility_raw(dmi: f64, forage_ndf: f64, starch: f64, forage_wet: f64) -> f64 {
    70.6 - 1.45 * dmi + 0.424 * forage_ndf + 1.39 * starch - 0.0219 * starch.powi(2)
        - 0.154 * forage_wet
}

pub fn rumen_starch_digestibility(dmi: f64, forage_ndf: f64, starch: f64, forage_wet: f64) -> f64 {
    RUM_DC_ST_CLAMP.apply(rumen_starch_digestibility_raw(dmi, forage_ndf, starch, forage_wet))
}

/// NDF and starch digested in the rumen.
///
/// Only diet nutrients and infusions delivered to the rumen are fermented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RumenDigestion {}

impl RumenDigestion {
    pub fn new() -> Self {
        Self {}
    }
}

#[typetag::serde]
impl Component for RumenDigestion {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("An_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("An_NDF", "% DM"),
            RequirementDefinition::scalar_input("An_ADF", "% DM"),
            RequirementDefinition::scalar_input("An_St", "% DM"),
            RequirementDefinition::scalar_input("An_CP", "% DM"),
            RequirementDefinition::scalar_input("Dt_ForWet", "% DM"),
            RequirementDefinition::scalar_input("Dt_ForNDF", "% DM"),
            RequirementDefinition::scalar_input("Dt_NDFIn", "kg/d"),
            RequirementDefinition::scalar_input("Dt_StIn", "kg/d"),
            RequirementDefinition::scalar_input("Inf_NDFRumIn", "kg/d"),
            RequirementDefinition::scalar_input("Inf_StRumIn", "kg/d"),
            RequirementDefinition::scalar_output("Rum_dcNDF", "%"),
            RequirementDefinition::scalar_output("Rum_dcSt", "%"),
            RequirementDefinition::scalar_output("Rum_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_output("Rum_DigStIn", "kg/d"),
        ]
    }

    fn solve(
        &self,
        input_state: &InputState,
        _context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let dmi = input_state.scalar("An_DMIn")?;
        let forage_wet = input_state.scalar("Dt_ForWet")?;
        let starch = input_state.scalar("An_St")?;

        let dc_ndf = rumen_ndf_digestibility(
            input_state.scalar("An_NDF")?,
            starch,
            input_state.scalar("An_CP")?,
            input_state.scalar("An_ADF")?,
            forage_wet,
            dmi,
        );
        let dc_starch =
            rumen_starch_digestibility(dmi, input_state.scalar("Dt_ForNDF")?, starch, forage_wet);

        let ndf_in = input_state.scalar("Dt_NDFIn")? + input_state.scalar("Inf_NDFRumIn")?;
        let starch_in = input_state.scalar("Dt_StIn")? + input_state.scalar("Inf_StRumIn")?;

        let mut output = OutputState::new();
        output
            .set_scalar("Rum_dcNDF", dc_ndf)
            .set_scalar("Rum_dcSt", dc_starch)
            .set_scalar("Rum_DigNDFIn", dc_ndf / 100.0 * ndf_in)
            .set_scalar("Rum_DigStIn", dc_starch / 100.0 * starch_in);
        Ok(output)
    }
}
