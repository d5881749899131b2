use crate::dispatch::MicrobialNitrogenEquation;
use crate::rumen::microbial::{
    cap_to_rdp_n, microbial_n_linear, microbial_n_nrc, microbial_n_saturating,
    rdp_in_for_max_growth, LinearMicrobialParameters, NrcMicrobialParameters,
    SaturatingMicrobialParameters,
};
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

const NRC_COEFFICIENTS: [&str; 4] = ["VmMiNInt", "VmMiNRDPSlp", "KmMiNRDNDF", "KmMiNRDSt"];
const LINEAR_COEFFICIENTS: [&str; 9] = [
    "Int_MiN_VT",
    "KrdSt_MiN_VT",
    "KrdNDF_MiN_VT",
    "KRDP_MiN_VT",
    "KrOM_MiN_VT",
    "KForNDF_MiN_VT",
    "KrOM2_MiN_VT",
    "KrdStxrOM_MiN_VT",
    "KrdNDFxForNDF_MiN_VT",
];
const SATURATING_COEFFICIENTS: [&str; 4] = [
    "Int_MiN_VTnln",
    "KRDP_MiN_VTnln",
    "KrdNDF_MiN_VTnln",
    "KrdSt_MiN_VTnln",
];

/// Microbial nitrogen supply, `Du_MiN_g`.
///
/// The NRC (2021) prediction is always computed. When an alternate is
/// selected it is computed as well, under its own name, and is the one
/// copied to `Du_MiN_g`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrobialSelection {
    equation: MicrobialNitrogenEquation,
}

impl MicrobialSelection {
    pub fn new(equation: MicrobialNitrogenEquation) -> Self {
        Self { equation }
    }
}

fn nrc_parameters(context: &EvaluationContext) -> NasemResult<NrcMicrobialParameters> {
    Ok(NrcMicrobialParameters {
        vm_intercept: context.coefficient("VmMiNInt")?,
        vm_rdp_slope: context.coefficient("VmMiNRDPSlp")?,
        km_ndf: context.coefficient("KmMiNRDNDF")?,
        km_starch: context.coefficient("KmMiNRDSt")?,
    })
}

fn linear_parameters(context: &EvaluationContext) -> NasemResult<LinearMicrobialParameters> {
    Ok(LinearMicrobialParameters {
        intercept: context.coefficient("Int_MiN_VT")?,
        k_rd_starch: context.coefficient("KrdSt_MiN_VT")?,
        k_rd_ndf: context.coefficient("KrdNDF_MiN_VT")?,
        k_rdp: context.coefficient("KRDP_MiN_VT")?,
        k_rom: context.coefficient("KrOM_MiN_VT")?,
        k_forage_ndf: context.coefficient("KForNDF_MiN_VT")?,
        k_rom2: context.coefficient("KrOM2_MiN_VT")?,
        k_rd_starch_x_rom: context.coefficient("KrdStxrOM_MiN_VT")?,
        k_rd_ndf_x_forage_ndf: context.coefficient("KrdNDFxForNDF_MiN_VT")?,
    })
}

fn saturating_parameters(context: &EvaluationContext) -> NasemResult<SaturatingMicrobialParameters> {
    Ok(SaturatingMicrobialParameters {
        intercept: context.coefficient("Int_MiN_VTnln")?,
        k_rdp: context.coefficient("KRDP_MiN_VTnln")?,
        k_rd_ndf: context.coefficient("KrdNDF_MiN_VTnln")?,
        k_rd_starch: context.coefficient("KrdSt_MiN_VTnln")?,
    })
}

#[typetag::serde]
impl Component for MicrobialSelection {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("An_RDPIn", "kg/d"),
            RequirementDefinition::scalar_input("An_RDP", "% DM"),
            RequirementDefinition::scalar_input("Dt_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("Rum_DigNDFIn", "kg/d"),
            RequirementDefinition::scalar_input("Rum_DigStIn", "kg/d"),
            RequirementDefinition::scalar_output("RDPIn_MiNmax", "kg/d"),
            RequirementDefinition::scalar_output("MiN_Vm", "g/d"),
            RequirementDefinition::scalar_output("Du_MiN_NRC2021_g", "g/d"),
        ];
        match self.equation {
            MicrobialNitrogenEquation::Nrc2021 => {}
            MicrobialNitrogenEquation::VtLinear => definitions.extend([
                RequirementDefinition::scalar_input("Dt_rOMIn", "kg/d"),
                RequirementDefinition::scalar_input("Dt_ForNDFIn", "kg/d"),
                RequirementDefinition::scalar_output("Du_MiN_VTln_g", "g/d"),
            ]),
            MicrobialNitrogenEquation::VtNonLinear => definitions.push(
                RequirementDefinition::scalar_output("Du_MiN_VTnln_g", "g/d"),
            ),
        }
        definitions.push(RequirementDefinition::scalar_output("Du_MiN_g", "g/d"));
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        let mut names = coefficient_names(&NRC_COEFFICIENTS);
        match self.equation {
            MicrobialNitrogenEquation::Nrc2021 => {}
            MicrobialNitrogenEquation::VtLinear => {
                names.extend(coefficient_names(&LINEAR_COEFFICIENTS))
            }
            MicrobialNitrogenEquation::VtNonLinear => {
                names.extend(coefficient_names(&SATURATING_COEFFICIENTS))
            }
        }
        names
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let rdp_in = input_state.scalar("An_RDPIn")?;
        let rd_ndf = input_state.scalar("Rum_DigNDFIn")?;
        let rd_starch = input_state.scalar("Rum_DigStIn")?;

        let nrc = nrc_parameters(context)?;
        let rdp_in_max =
            rdp_in_for_max_growth(rdp_in, input_state.scalar("An_RDP")?, input_state.scalar("Dt_DMIn")?);
        let nrc_min = cap_to_rdp_n(microbial_n_nrc(&nrc, rdp_in_max, rd_ndf, rd_starch)?, rdp_in);

        let mut output = OutputState::new();
        output
            .set_scalar("RDPIn_MiNmax", rdp_in_max)
            .set_scalar("MiN_Vm", nrc.vm_intercept + nrc.vm_rdp_slope * rdp_in_max)
            .set_scalar("Du_MiN_NRC2021_g", nrc_min);

        let selected = match self.equation {
            MicrobialNitrogenEquation::Nrc2021 => nrc_min,
            MicrobialNitrogenEquation::VtLinear => {
                let value = microbial_n_linear(
                    &linear_parameters(context)?,
                    rd_starch,
                    rd_ndf,
                    rdp_in,
                    input_state.scalar("Dt_rOMIn")?,
                    input_state.scalar("Dt_ForNDFIn")?,
                );
                output.set_scalar(self.equation.variant_name(), value);
                value
            }
            MicrobialNitrogenEquation::VtNonLinear => {
                let value =
                    microbial_n_saturating(&saturating_parameters(context)?, rdp_in, rd_ndf, rd_starch)?;
                output.set_scalar(self.equation.variant_name(), value);
                value
            }
        };
        output.set_scalar("Du_MiN_g", selected);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::default_coefficients;
    use approx::assert_relative_eq;
    use nasem_core::amino_acids::AminoAcid;
    use nasem_core::namespace::StateValue;

    fn solve(equation: MicrobialNitrogenEquation, rdp_in: f64, rdp_pct: f64) -> OutputState {
        let values: Vec<(&str, StateValue)> = vec![
            ("An_RDPIn", rdp_in.into()),
            ("An_RDP", rdp_pct.into()),
            ("Dt_DMIn", 20.0.into()),
            ("Rum_DigNDFIn", 3.5.into()),
            ("Rum_DigStIn", 3.0.into()),
            ("Dt_rOMIn", 4.0.into()),
            ("Dt_ForNDFIn", 4.4.into()),
        ];
        let refs: Vec<(&str, &StateValue)> = values.iter().map(|(n, v)| (*n, v)).collect();
        let input_state = InputState::build("MicrobialSelection", refs);
        let coefficients = default_coefficients();
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);
        MicrobialSelection::new(equation)
            .solve(&input_state, &context)
            .unwrap()
    }

    #[test]
    fn test_rdp_boundary_discontinuity() {
        let at = solve(MicrobialNitrogenEquation::Nrc2021, 2.4, 12.0);
        let above = solve(MicrobialNitrogenEquation::Nrc2021, 2.4, 12.0001);
        assert_eq!(at.scalar("RDPIn_MiNmax"), Some(2.4));
        assert_relative_eq!(above.scalar("RDPIn_MiNmax").unwrap(), 2.4, max_relative = 1e-12);

        // Above the boundary, supply no longer matters
        let high = solve(MicrobialNitrogenEquation::Nrc2021, 3.0, 15.0);
        assert_relative_eq!(high.scalar("RDPIn_MiNmax").unwrap(), 2.4, max_relative = 1e-12);
        let below = solve(MicrobialNitrogenEquation::Nrc2021, 2.2, 11.0);
        assert_eq!(below.scalar("RDPIn_MiNmax"), Some(2.2));
        assert!(below.scalar("Du_MiN_g").unwrap() < high.scalar("Du_MiN_g").unwrap());
    }

    #[test]
    fn test_nrc_is_capped_by_rdp_nitrogen() {
        let output = solve(MicrobialNitrogenEquation::Nrc2021, 1.0, 5.0);
        assert_relative_eq!(output.scalar("Du_MiN_g").unwrap(), 160.0, max_relative = 1e-12);
    }

    #[test]
    fn test_alternates_reach_shared_name() {
        let linear = solve(MicrobialNitrogenEquation::VtLinear, 2.4, 12.0);
        assert_eq!(linear.scalar("Du_MiN_g"), linear.scalar("Du_MiN_VTln_g"));
        assert!(linear.scalar("Du_MiN_NRC2021_g").is_some());
        assert!(linear.scalar("Du_MiN_VTnln_g").is_none());

        let saturating = solve(MicrobialNitrogenEquation::VtNonLinear, 2.4, 12.0);
        assert_eq!(saturating.scalar("Du_MiN_g"), saturating.scalar("Du_MiN_VTnln_g"));
        let expected = 7.47 + 0.574 * 2400.0 / (1.0 + 3.60 / 3.5 + 12.3 / 3.0);
        assert_relative_eq!(saturating.scalar("Du_MiN_g").unwrap(), expected, max_relative = 1e-12);

        let nrc = solve(MicrobialNitrogenEquation::Nrc2021, 2.4, 12.0);
        assert_eq!(nrc.scalar("Du_MiN_g"), nrc.scalar("Du_MiN_NRC2021_g"));
        assert_eq!(nrc.len(), 4);
    }
}
