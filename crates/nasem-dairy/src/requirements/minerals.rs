//! Macromineral requirements and balances
//!
//! Each mineral is handled factorially: maintenance (fecal and urinary
//! losses), growth, pregnancy and lactation are summed to an absorbed
//! requirement, which is compared with absorbed supply and converted to a
//! dietary concentration using the diet's absorption coefficient.

use crate::inputs::{Breed, PhysiologicalState};
use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::NasemResult;
use nasem_core::math::checked_div;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mineral {
    Ca,
    P,
    Mg,
    Na,
    K,
    Cl,
}

impl Mineral {
    pub const ALL: [Mineral; 6] = [
        Mineral::Ca,
        Mineral::P,
        Mineral::Mg,
        Mineral::Na,
        Mineral::K,
        Mineral::Cl,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Mineral::Ca => "Ca",
            Mineral::P => "P",
            Mineral::Mg => "Mg",
            Mineral::Na => "Na",
            Mineral::K => "K",
            Mineral::Cl => "Cl",
        }
    }

    /// Replace `{M}` in a name template with the mineral's symbol.
    pub fn expand(&self, template: &str) -> String {
        template.replace("{M}", self.symbol())
    }

    fn has_breed_milk_content(&self) -> bool {
        matches!(self, Mineral::Ca | Mineral::P)
    }
}

/// Factorial coefficients of one mineral.
struct MineralDefaults {
    mineral: Mineral,
    /// Fecal maintenance loss, g/kg DMI
    fecal: f64,
    /// Urinary maintenance loss, g/kg BW
    urinary: f64,
    /// g/kg empty frame gain
    growth: f64,
    /// g/kg gravid uterine gain
    gestation: f64,
    /// g/kg milk
    milk: f64,
    milk_jersey: Option<f64>,
}

const MINERAL_DEFAULTS: [MineralDefaults; 6] = [
    MineralDefaults {
        mineral: Mineral::Ca,
        fecal: 0.9,
        urinary: 0.0,
        growth: 9.83,
        gestation: 11.0,
        milk: 1.03,
        milk_jersey: Some(1.17),
    },
    MineralDefaults {
        mineral: Mineral::P,
        fecal: 1.0,
        urinary: 0.002,
        growth: 5.43,
        gestation: 6.0,
        milk: 0.90,
        milk_jersey: Some(1.03),
    },
    MineralDefaults {
        mineral: Mineral::Mg,
        fecal: 0.3,
        urinary: 0.0,
        growth: 0.45,
        gestation: 0.33,
        milk: 0.11,
        milk_jersey: None,
    },
    MineralDefaults {
        mineral: Mineral::Na,
        fecal: 1.45,
        urinary: 0.0,
        growth: 1.4,
        gestation: 1.4,
        milk: 0.4,
        milk_jersey: None,
    },
    MineralDefaults {
        mineral: Mineral::K,
        fecal: 2.5,
        urinary: 0.2,
        growth: 2.5,
        gestation: 1.03,
        milk: 1.5,
        milk_jersey: None,
    },
    MineralDefaults {
        mineral: Mineral::Cl,
        fecal: 1.11,
        urinary: 0.0,
        growth: 1.0,
        gestation: 1.0,
        milk: 1.0,
        milk_jersey: None,
    },
];

/// Default mineral coefficients, named `{M}_Fe_m`, `{M}_Ur_m`, `{M}_Gr`,
/// `{M}_Gest`, `{M}_Mlk` and `{M}_Mlk_Jersey`.
pub fn default_mineral_coefficients() -> Vec<(String, f64)> {
    let mut values = vec![];
    for defaults in &MINERAL_DEFAULTS {
        let m = defaults.mineral;
        values.push((m.expand("{M}_Fe_m"), defaults.fecal));
        values.push((m.expand("{M}_Ur_m"), defaults.urinary));
        values.push((m.expand("{M}_Gr"), defaults.growth));
        values.push((m.expand("{M}_Gest"), defaults.gestation));
        values.push((m.expand("{M}_Mlk"), defaults.milk));
        if let Some(jersey) = defaults.milk_jersey {
            values.push((m.expand("{M}_Mlk_Jersey"), jersey));
        }
    }
    values
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minerals {
    state: PhysiologicalState,
    breed: Breed,
}

impl Minerals {
    pub fn new(state: PhysiologicalState, breed: Breed) -> Self {
        Self { state, breed }
    }

    fn milk_coefficient(&self, mineral: Mineral) -> String {
        if mineral.has_breed_milk_content() && self.breed == Breed::Jersey {
            mineral.expand("{M}_Mlk_Jersey")
        } else {
            mineral.expand("{M}_Mlk")
        }
    }
}

#[typetag::serde]
impl Component for Minerals {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![
            RequirementDefinition::scalar_input("Dt_DMIn", "kg/d"),
            RequirementDefinition::scalar_input("An_BW", "kg"),
            RequirementDefinition::scalar_input("Frm_Gain_empty", "kg/d"),
            RequirementDefinition::scalar_input("GrUter_BWgain", "kg/d"),
            RequirementDefinition::scalar_input("Trg_MilkProd", "kg/d"),
        ];
        for m in Mineral::ALL {
            definitions.push(RequirementDefinition::scalar_input(&m.expand("Dt_{M}"), "% DM"));
            definitions.push(RequirementDefinition::scalar_input(&m.expand("Dt_ac{M}"), ""));
            for (template, unit) in [
                ("Dt_{M}In", "g/d"),
                ("Abs_{M}In", "g/d"),
                ("An_{M}_m", "g/d"),
                ("An_{M}_g", "g/d"),
                ("An_{M}_y", "g/d"),
                ("An_{M}_l", "g/d"),
                ("An_{M}_req", "g/d"),
                ("An_{M}_bal", "g/d"),
                ("Dt_{M}_req", "% DM"),
            ] {
                definitions.push(RequirementDefinition::scalar_output(&m.expand(template), unit));
            }
        }
        definitions
    }

    fn coefficients(&self) -> Vec<String> {
        Mineral::ALL
            .iter()
            .flat_map(|m| {
                [
                    m.expand("{M}_Fe_m"),
                    m.expand("{M}_Ur_m"),
                    m.expand("{M}_Gr"),
                    m.expand("{M}_Gest"),
                    self.milk_coefficient(*m),
                ]
            })
            .collect()
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let dmi = input_state.scalar("Dt_DMIn")?;
        let bw = input_state.scalar("An_BW")?;
        let frame_gain = input_state.scalar("Frm_Gain_empty")?;
        let uterine_gain = input_state.scalar("GrUter_BWgain")?.max(0.0);
        let milk = if self.state.is_lactating() {
            input_state.scalar("Trg_MilkProd")?
        } else {
            0.0
        };

        let mut output = OutputState::new();
        for m in Mineral::ALL {
            let absorption = input_state.scalar(&m.expand("Dt_ac{M}"))?;
            let intake = input_state.scalar(&m.expand("Dt_{M}"))? / 100.0 * dmi * 1000.0;
            let absorbed = intake * absorption;

            let maintenance = context.coefficient(&m.expand("{M}_Fe_m"))? * dmi
                + context.coefficient(&m.expand("{M}_Ur_m"))? * bw;
            let growth = context.coefficient(&m.expand("{M}_Gr"))? * frame_gain;
            let gestation = context.coefficient(&m.expand("{M}_Gest"))? * uterine_gain;
            let lactation = context.coefficient(&self.milk_coefficient(m))? * milk;
            let requirement = maintenance + growth + gestation + lactation;
            let diet_requirement =
                checked_div(&m.expand("Dt_{M}_req"), requirement, absorption * dmi * 1000.0)? * 100.0;

            output
                .set_scalar(&m.expand("Dt_{M}In"), intake)
                .set_scalar(&m.expand("Abs_{M}In"), absorbed)
                .set_scalar(&m.expand("An_{M}_m"), maintenance)
                .set_scalar(&m.expand("An_{M}_g"), growth)
                .set_scalar(&m.expand("An_{M}_y"), gestation)
                .set_scalar(&m.expand("An_{M}_l"), lactation)
                .set_scalar(&m.expand("An_{M}_req"), requirement)
                .set_scalar(&m.expand("An_{M}_bal"), absorbed - requirement)
                .set_scalar(&m.expand("Dt_{M}_req"), diet_requirement);
        }
        Ok(output)
    }
}
