use crate::dispatch::{DmiEquation, Toggle};
use crate::intake::dmi;
use nasem_core::component::{
    coefficient_names, Component, EvaluationContext, InputState, OutputState,
    RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use serde::{Deserialize, Serialize};

/// Selects the dry matter intake equation and publishes its result as `Dt_DMIn`.
///
/// Only the inputs of the selected variant are declared, so an animal
/// description does not need values the chosen equation never reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSelection {
    equation: DmiEquation,
    monensin: Toggle,
}

impl IntakeSelection {
    pub fn new(equation: DmiEquation, monensin: Toggle) -> Self {
        Self { equation, monensin }
    }

    fn variant_inputs(&self) -> Vec<&'static str> {
        let prepartum = ["An_GestDay", "An_GestLength", "Dt_NDF"];
        match self.equation {
            DmiEquation::Target => vec!["Trg_Dt_DMIn"],
            DmiEquation::Calf => vec![
                "An_BW",
                "An_AgeDay",
                "An_AgeDryFdStart",
                "Dt_DMIn_ClfLiq",
                "Dt_ME_ClfLiq",
                "Dt_DMIn_ClfFor",
            ],
            DmiEquation::Lact1 => vec![
                "An_Parity_rl",
                "Trg_NEmilkOut",
                "An_BW",
                "An_BCS",
                "An_LactDay",
            ],
            DmiEquation::Lact2 => vec![
                "Dt_ForNDF",
                "Dt_ADF",
                "Dt_NDF",
                "Dt_ForDNDF48_ForNDF",
                "Trg_MilkProd",
            ],
            DmiEquation::DryCow1 => vec!["An_BW", "An_GestDay", "An_GestLength", "Dt_NDF"],
            DmiEquation::DryCow2 => vec!["An_BW", "An_GestDay", "An_GestLength"],
            DmiEquation::HeiferNrc => vec!["An_BW", "An_BW_mature"],
            DmiEquation::HeiferNrcAdj => vec!["An_BW", "An_BW_mature", "Dt_NDF"],
            DmiEquation::HeiferH1 | DmiEquation::HeiferHj1 => vec!["An_BW"],
            DmiEquation::HeiferH2 | DmiEquation::HeiferHj2 => vec!["An_BW", "Dt_NDF"],
            DmiEquation::HeiferNrcPrepart | DmiEquation::HeiferNrcAdjPrepart => {
                let mut names = vec!["An_BW", "An_BW_mature"];
                names.extend(prepartum);
                names
            }
            DmiEquation::HeiferH1Prepart
            | DmiEquation::HeiferH2Prepart
            | DmiEquation::HeiferHj1Prepart
            | DmiEquation::HeiferHj2Prepart => {
                let mut names = vec!["An_BW"];
                names.extend(prepartum);
                names
            }
        }
    }

    /// The non-prepartum heifer equation a prepartum variant scales.
    fn prepartum_base(&self) -> Option<DmiEquation> {
        match self.equation {
            DmiEquation::HeiferNrcPrepart => Some(DmiEquation::HeiferNrc),
            DmiEquation::HeiferNrcAdjPrepart => Some(DmiEquation::HeiferNrcAdj),
            DmiEquation::HeiferH1Prepart => Some(DmiEquation::HeiferH1),
            DmiEquation::HeiferH2Prepart => Some(DmiEquation::HeiferH2),
            DmiEquation::HeiferHj1Prepart => Some(DmiEquation::HeiferHj1),
            DmiEquation::HeiferHj2Prepart => Some(DmiEquation::HeiferHj2),
            _ => None,
        }
    }

    fn monensin_applies(&self) -> bool {
        self.monensin.is_on() && self.equation.is_lactation()
    }
}

/// Heifer intake before any pre-partum adjustment.
fn heifer_intake(equation: DmiEquation, input_state: &InputState) -> NasemResult<f64> {
    let bw = input_state.scalar("An_BW")?;
    match equation {
        DmiEquation::HeiferNrc => dmi::heifer_nrca(bw, input_state.scalar("An_BW_mature")?),
        DmiEquation::HeiferNrcAdj => dmi::heifer_nrcad(
            bw,
            input_state.scalar("An_BW_mature")?,
            input_state.scalar("Dt_NDF")?,
        ),
        DmiEquation::HeiferH1 => Ok(dmi::heifer_h1(bw)),
        DmiEquation::HeiferH2 => Ok(dmi::heifer_h2(bw, input_state.scalar("Dt_NDF")?)),
        DmiEquation::HeiferHj1 => Ok(dmi::heifer_hj1(bw)),
        _ => Ok(dmi::heifer_hj2(bw, input_state.scalar("Dt_NDF")?)),
    }
}

#[typetag::serde]
impl Component for IntakeSelection {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions: Vec<RequirementDefinition> = self
            .variant_inputs()
            .iter()
            .map(|n| RequirementDefinition::scalar_input(n, ""))
            .collect();
        if let Some(base) = self.prepartum_base().and_then(|b| b.variant_name()) {
            definitions.push(RequirementDefinition::scalar_output(base, "kg/d"));
            definitions.push(RequirementDefinition::scalar_output("An_PrePartWk", "wk"));
            definitions.push(RequirementDefinition::scalar_output("An_PrePartWkDurat", "wk"));
        }
        if let Some(name) = self.equation.variant_name() {
            definitions.push(RequirementDefinition::scalar_output(name, "kg/d"));
        }
        definitions.push(RequirementDefinition::scalar_output("Dt_DMIn", "kg/d"));
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        if self.monensin_applies() {
            coefficient_names(&["Monensin_DMIn_Adj"])
        } else {
            vec![]
        }
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let mut output = OutputState::new();
        let raw = match self.equation {
            DmiEquation::Target => input_state.scalar("Trg_Dt_DMIn")?,
            DmiEquation::Calf => dmi::calf1(
                input_state.scalar("An_BW")?,
                input_state.scalar("An_AgeDay")?,
                input_state.scalar("An_AgeDryFdStart")?,
                input_state.scalar("Dt_DMIn_ClfLiq")?,
                input_state.scalar("Dt_ME_ClfLiq")?,
                input_state.scalar("Dt_DMIn_ClfFor")?,
            ),
            DmiEquation::Lact1 => dmi::lact1(
                input_state.scalar("An_Parity_rl")?,
                input_state.scalar("Trg_NEmilkOut")?,
                input_state.scalar("An_BW")?,
                input_state.scalar("An_BCS")?,
                input_state.scalar("An_LactDay")?,
            ),
            DmiEquation::Lact2 => dmi::lact2(
                input_state.scalar("Dt_ForNDF")?,
                input_state.scalar("Dt_ADF")?,
                input_state.scalar("Dt_NDF")?,
                input_state.scalar("Dt_ForDNDF48_ForNDF")?,
                input_state.scalar("Trg_MilkProd")?,
            )?,
            DmiEquation::DryCow1 => dmi::dry_cow1(
                input_state.scalar("An_BW")?,
                input_state.scalar("An_GestDay")?,
                input_state.scalar("An_GestLength")?,
                input_state.scalar("Dt_NDF")?,
            ),
            DmiEquation::DryCow2 => dmi::dry_cow2(
                input_state.scalar("An_BW")?,
                input_state.scalar("An_GestDay")?,
                input_state.scalar("An_GestLength")?,
            ),
            heifer => match self.prepartum_base() {
                Some(base) => {
                    let base_intake = heifer_intake(base, input_state)?;
                    if let Some(name) = base.variant_name() {
                        output.set_scalar(name, base_intake);
                    }
                    let week = dmi::prepartum_week(
                        input_state.scalar("An_GestDay")?,
                        input_state.scalar("An_GestLength")?,
                    );
                    let duration = dmi::prepartum_duration(week);
                    output
                        .set_scalar("An_PrePartWk", week)
                        .set_scalar("An_PrePartWkDurat", duration);
                    base_intake
                        * dmi::prepartum_adjustment(week, duration, input_state.scalar("Dt_NDF")?)?
                }
                None => heifer_intake(heifer, input_state)?,
            },
        };

        if let Some(name) = self.equation.variant_name() {
            output.set_scalar(name, raw);
        }
        let selected = if self.monensin_applies() {
            raw * context.coefficient("Monensin_DMIn_Adj")?
        } else {
            raw
        };
        output.set_scalar("Dt_DMIn", selected);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Selector;
    use approx::assert_relative_eq;
    use nasem_core::amino_acids::AminoAcid;
    use nasem_core::coefficients::CoefficientSet;
    use nasem_core::namespace::StateValue;

    const ANIMAL: [(&str, f64); 19] = [
        ("Trg_Dt_DMIn", 21.0),
        ("An_BW", 450.0),
        ("An_BW_mature", 700.0),
        ("An_BCS", 3.0),
        ("An_Parity_rl", 2.0),
        ("An_LactDay", 100.0),
        ("An_GestDay", 270.0),
        ("An_GestLength", 280.0),
        ("An_AgeDay", 40.0),
        ("An_AgeDryFdStart", 14.0),
        ("Trg_NEmilkOut", 24.0),
        ("Trg_MilkProd", 35.0),
        ("Dt_NDF", 35.0),
        ("Dt_ADF", 22.0),
        ("Dt_ForNDF", 22.0),
        ("Dt_ForDNDF48_ForNDF", 50.0),
        ("Dt_DMIn_ClfLiq", 0.8),
        ("Dt_ME_ClfLiq", 4.6),
        ("Dt_DMIn_ClfFor", 0.1),
    ];

    fn solve(selection: &IntakeSelection) -> NasemResult<OutputState> {
        let values: Vec<(&str, StateValue)> =
            ANIMAL.iter().map(|(n, v)| (*n, StateValue::Scalar(*v))).collect();
        let declared = selection.variant_inputs();
        let refs: Vec<(&str, &StateValue)> = values
            .iter()
            .filter(|(n, _)| declared.iter().any(|d| d == n))
            .map(|(n, v)| (*n, v))
            .collect();
        let input_state = InputState::build("IntakeSelection", refs);
        let coefficients = CoefficientSet::from_table(&[("Monensin_DMIn_Adj", 0.973)]);
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);
        selection.solve(&input_state, &context)
    }

    #[test]
    fn test_every_variant_solves_from_its_declared_inputs() {
        let mut seen = Vec::new();
        for &equation in DmiEquation::VARIANTS {
            let selection = IntakeSelection::new(equation, Toggle::Off);
            let output = solve(&selection).unwrap();
            let dmi = output.scalar("Dt_DMIn").unwrap();
            assert!(dmi.is_finite() && dmi > 0.0, "{equation:?} gave {dmi}");
            for (name, _) in output.iter() {
                assert!(selection.output_names().contains(&name.to_string()));
            }
            seen.push(dmi);
        }
        assert_eq!(seen.len(), 18);
    }

    #[test]
    fn test_target_is_copied() {
        let output = solve(&IntakeSelection::new(DmiEquation::Target, Toggle::On)).unwrap();
        assert_eq!(output.scalar("Dt_DMIn"), Some(21.0));
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_monensin_only_adjusts_lactation() {
        let off = solve(&IntakeSelection::new(DmiEquation::Lact1, Toggle::Off)).unwrap();
        let on = solve(&IntakeSelection::new(DmiEquation::Lact1, Toggle::On)).unwrap();
        assert_eq!(off.scalar("Dt_DMIn_Lact1"), on.scalar("Dt_DMIn_Lact1"));
        assert_relative_eq!(
            on.scalar("Dt_DMIn").unwrap(),
            off.scalar("Dt_DMIn").unwrap() * 0.973,
            max_relative = 1e-12
        );

        let heifer = IntakeSelection::new(DmiEquation::HeiferH1, Toggle::On);
        assert!(heifer.coefficients().is_empty());
        let output = solve(&heifer).unwrap();
        assert_eq!(output.scalar("Dt_DMIn"), output.scalar("Dt_DMIn_Heif_H1"));
    }

    #[test]
    fn test_prepartum_variant_writes_base() {
        let output =
            solve(&IntakeSelection::new(DmiEquation::HeiferH1Prepart, Toggle::Off)).unwrap();
        let base = output.scalar("Dt_DMIn_Heif_H1").unwrap();
        let adjusted = output.scalar("Dt_DMIn_Heif_H1p").unwrap();
        // Ten days before calving the decline is active
        assert!(adjusted < base);
        assert_eq!(output.scalar("Dt_DMIn"), Some(adjusted));

        let week = output.scalar("An_PrePartWk").unwrap();
        let duration = output.scalar("An_PrePartWkDurat").unwrap();
        assert_relative_eq!(week, -10.0 / 7.0, max_relative = 1e-12);
        assert_relative_eq!(duration, 2.0 * week, max_relative = 1e-12);
        let expected = dmi::prepartum_adjustment(week, duration, 35.0).unwrap();
        assert_relative_eq!(adjusted, base * expected, max_relative = 1e-12);
    }
}
