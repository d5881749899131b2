//! Infused nutrients
//!
//! Converts infusion rates (g/d) into intakes (kg/d) and derives the three site
//! flags that gate where infused nutrients enter downstream equations:
//!
//! - `Inf_Rum`: fermented in the rumen like dietary nutrients
//! - `Inf_SI`: bypass the rumen and are digested in the small intestine
//! - `Inf_Art`: enter the blood directly and count as absorbed

use crate::inputs::InfusionLocation;
use nasem_core::amino_acids::AminoAcid;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

const RATES: [&str; 9] = [
    "Inf_CP_g",
    "Inf_St_g",
    "Inf_NDF_g",
    "Inf_ADF_g",
    "Inf_Glc_g",
    "Inf_FA_g",
    "Inf_Acet_g",
    "Inf_Prop_g",
    "Inf_Butr_g",
];

const DIGESTIBILITIES: [&str; 4] = ["Inf_dcRUP", "Inf_dcFA", "Inf_ttdcSt", "Inf_ttdcNDF"];

/// Site flags `(Inf_Rum, Inf_SI, Inf_Art)` for an infusion location.
pub fn site_flags(location: InfusionLocation) -> (f64, f64, f64) {
    match location {
        InfusionLocation::Rumen => (1.0, 0.0, 0.0),
        InfusionLocation::AbomasumOrDuodenum => (0.0, 1.0, 0.0),
        InfusionLocation::JugularOrArterial => (0.0, 0.0, 1.0),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Infusions {
    location: InfusionLocation,
}

impl Infusions {
    pub fn new(location: InfusionLocation) -> Self {
        Self { location }
    }
}

#[typetag::serde]
impl Component for Infusions {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions: Vec<RequirementDefinition> = RATES
            .iter()
            .map(|n| RequirementDefinition::scalar_input(n, "g/d"))
            .collect();
        definitions.extend(
            DIGESTIBILITIES
                .iter()
                .map(|n| RequirementDefinition::scalar_input(n, "%")),
        );
        definitions.extend(
            AminoAcid::ALL
                .iter()
                .map(|aa| RequirementDefinition::scalar_input(&aa.expand("Inf_{AA}_g"), "g/d")),
        );
        definitions.extend([
            RequirementDefinition::scalar_output("Inf_Rum", ""),
            RequirementDefinition::scalar_output("Inf_SI", ""),
            RequirementDefinition::scalar_output("Inf_Art", ""),
            RequirementDefinition::scalar_output("Inf_DMIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_CPIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_StIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_NDFIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_ADFIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_FAIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_RDPIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_RUPIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_idRUPIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_ArtCPIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_NDFRumIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_StRumIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_DigStIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_DigFAIn", "kg/d"),
            RequirementDefinition::scalar_output("Inf_DEIn_GlcVFA", "Mcal/d"),
            RequirementDefinition::series_output("Inf_AA_g", "g/d"),
        ]);
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&["En_Glc", "En_Acet", "En_Prop", "En_Butr"])
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let (rum, si, art) = site_flags(self.location);

        let cp = input_state.scalar("Inf_CP_g")? / 1000.0;
        let starch = input_state.scalar("Inf_St_g")? / 1000.0;
        let ndf = input_state.scalar("Inf_NDF_g")? / 1000.0;
        let adf = input_state.scalar("Inf_ADF_g")? / 1000.0;
        let glucose = input_state.scalar("Inf_Glc_g")? / 1000.0;
        let fa = input_state.scalar("Inf_FA_g")? / 1000.0;
        let acetate = input_state.scalar("Inf_Acet_g")? / 1000.0;
        let propionate = input_state.scalar("Inf_Prop_g")? / 1000.0;
        let butyrate = input_state.scalar("Inf_Butr_g")? / 1000.0;

        // ADF is a fraction of NDF and is not added again
        let dm = cp + starch + ndf + glucose + fa + acetate + propionate + butyrate;
        let rup = cp * si;
        let de_glc_vfa = glucose * context.coefficient("En_Glc")?
            + acetate * context.coefficient("En_Acet")?
            + propionate * context.coefficient("En_Prop")?
            + butyrate * context.coefficient("En_Butr")?;

        let amino_acids =
            context.try_series_from_fn(|aa| input_state.scalar(&aa.expand("Inf_{AA}_g")))?;

        let mut output = OutputState::new();
        output
            .set_scalar("Inf_Rum", rum)
            .set_scalar("Inf_SI", si)
            .set_scalar("Inf_Art", art)
            .set_scalar("Inf_DMIn", dm)
            .set_scalar("Inf_CPIn", cp)
            .set_scalar("Inf_StIn", starch)
            .set_scalar("Inf_NDFIn", ndf)
            .set_scalar("Inf_ADFIn", adf)
            .set_scalar("Inf_FAIn", fa)
            .set_scalar("Inf_RDPIn", cp * rum)
            .set_scalar("Inf_RUPIn", rup)
            .set_scalar("Inf_idRUPIn", rup * input_state.scalar("Inf_dcRUP")? / 100.0)
            .set_scalar("Inf_ArtCPIn", cp * art)
            .set_scalar("Inf_NDFRumIn", ndf * rum)
            .set_scalar("Inf_StRumIn", starch * rum)
            .set_scalar("Inf_DigStIn", starch * input_state.scalar("Inf_ttdcSt")? / 100.0)
            .set_scalar("Inf_DigNDFIn", ndf * input_state.scalar("Inf_ttdcNDF")? / 100.0)
            .set_scalar("Inf_DigFAIn", fa * input_state.scalar("Inf_dcFA")? / 100.0)
            .set_scalar("Inf_DEIn_GlcVFA", de_glc_vfa)
            .set_series("Inf_AA_g", amino_acids);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::InfusionInput;
    use approx::assert_relative_eq;
    use nasem_core::coefficients::CoefficientSet;
    use nasem_core::namespace::StateValue;

    fn solve(infusion: &InfusionInput) -> OutputState {
        let values: Vec<(String, StateValue)> = infusion.exogenous_values();
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (n.as_str(), v)).collect();
        let input_state = InputState::build("Infusions", refs);
        let coefficients = CoefficientSet::from_table(&[
            ("En_Glc", 3.75),
            ("En_Acet", 3.48),
            ("En_Prop", 4.96),
            ("En_Butr", 5.95),
        ]);
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);
        Infusions::new(infusion.location)
            .solve(&input_state, &context)
            .unwrap()
    }

    #[test]
    fn test_no_infusion_is_zero() {
        let output = solve(&InfusionInput::default());
        assert_eq!(output.scalar("Inf_Rum"), Some(1.0));
        assert_eq!(output.scalar("Inf_DMIn"), Some(0.0));
        assert_eq!(output.series("Inf_AA_g").unwrap().sum(), 0.0);
    }

    #[test]
    fn test_abomasal_protein_is_undegradable() {
        let infusion = InfusionInput {
            location: InfusionLocation::AbomasumOrDuodenum,
            cp_g: 500.0,
            dc_rup: 90.0,
            lys_g: 20.0,
            ..InfusionInput::default()
        };
        let output = solve(&infusion);
        assert_eq!(output.scalar("Inf_SI"), Some(1.0));
        assert_eq!(output.scalar("Inf_RDPIn"), Some(0.0));
        assert_eq!(output.scalar("Inf_RUPIn"), Some(0.5));
        assert_relative_eq!(output.scalar("Inf_idRUPIn").unwrap(), 0.45);
        assert_eq!(
            output.series("Inf_AA_g").unwrap().get(AminoAcid::Lys),
            Some(20.0)
        );
    }

    #[test]
    fn test_rumen_starch_is_fermentable() {
        let infusion = InfusionInput {
            starch_g: 1000.0,
            propionate_g: 200.0,
            ..InfusionInput::default()
        };
        let output = solve(&infusion);
        assert_eq!(output.scalar("Inf_StRumIn"), Some(1.0));
        assert_relative_eq!(output.scalar("Inf_DMIn").unwrap(), 1.2);
        assert_relative_eq!(output.scalar("Inf_DEIn_GlcVFA").unwrap(), 0.2 * 4.96);
    }
}
