use super::*;
use crate::amino_acids::{AaSeries, AminoAcid};
use crate::coefficients::{AaCoefficient, CoefficientSet};
use crate::component::{
    aa_coefficient_names, coefficient_names, Component, EvaluationContext, InputState,
    OutputState, RequirementDefinition,
};
use crate::errors::{NasemError, NasemResult};
use is_close::is_close;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reads `from`, writes `to = from * Scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scale {
    from: String,
    to: String,
}

#[typetag::serde]
impl Component for Scale {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input(&self.from, "kg/d"),
            RequirementDefinition::scalar_output(&self.to, "kg/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        coefficient_names(&["Scale"])
    }

    fn solve(&self, input_state: &InputState, context: &EvaluationContext) -> NasemResult<OutputState> {
        let value = input_state.scalar(&self.from)?;
        let mut output = OutputState::new();
        output.set_scalar(&self.to, value * context.coefficient("Scale")?);
        Ok(output)
    }
}

/// Builds a per-AA series from a coefficient family and sums it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Profile {}

#[typetag::serde]
impl Component for Profile {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![
            RequirementDefinition::scalar_input("Du_MiTP_g", "g/d"),
            RequirementDefinition::series_output("Du_AAMic", "g/d"),
            RequirementDefinition::scalar_output("Du_EAAMic", "g/d"),
        ]
    }

    fn coefficients(&self) -> Vec<String> {
        aa_coefficient_names(AaCoefficient("MiTP{AA}Prof"))
    }

    fn solve(&self, input_state: &InputState, context: &EvaluationContext) -> NasemResult<OutputState> {
        let mitp = input_state.scalar("Du_MiTP_g")?;
        let profile = context.per_aa(AaCoefficient("MiTP{AA}Prof"))?;
        let flow = profile.scale(mitp / 100.0);
        let total = flow.sum();
        let mut output = OutputState::new();
        output.set_series("Du_AAMic", flow);
        output.set_scalar("Du_EAAMic", total);
        Ok(output)
    }
}

/// Writes a name it never declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sneaky {}

#[typetag::serde]
impl Component for Sneaky {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        vec![RequirementDefinition::scalar_output("Declared", "")]
    }

    fn solve(&self, _input_state: &InputState, _context: &EvaluationContext) -> NasemResult<OutputState> {
        let mut output = OutputState::new();
        output.set_scalar("Declared", 1.0);
        output.set_scalar("Undeclared", 2.0);
        Ok(output)
    }
}

fn scale(from: &str, to: &str) -> Arc<dyn Component> {
    Arc::new(Scale {
        from: from.to_string(),
        to: to.to_string(),
    })
}

fn profile_coefficients() -> CoefficientSet {
    let mut table: Vec<(String, f64)> = AminoAcid::ALL
        .iter()
        .enumerate()
        .map(|(i, aa)| (aa.expand("MiTP{AA}Prof"), i as f64 + 1.0))
        .collect();
    table.push(("Scale".to_string(), 2.0));
    CoefficientSet::new(table.into_iter().collect())
}

#[test]
fn test_chain_solves_in_dependency_order() {
    // Registered consumer-first to check the order comes from the graph
    let model = ModelBuilder::new()
        .with_component(scale("B", "C"))
        .with_component(scale("A", "B"))
        .with_exogenous_value("A", 1.5)
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap();

    assert_eq!(model.solve_order(), vec!["Scale", "Scale"]);
    let result = model.evaluate().unwrap();
    assert_eq!(result.scalar("A").unwrap(), 1.5);
    assert_eq!(result.scalar("B").unwrap(), 3.0);
    assert_eq!(result.scalar("C").unwrap(), 6.0);
}

#[test]
fn test_unresolved_input() {
    let err = ModelBuilder::new()
        .with_component(scale("A", "B"))
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        NasemError::UndefinedVariable {
            name: "A".to_string(),
            reader: "Scale".to_string()
        }
    );
}

#[test]
fn test_two_producers() {
    let err = ModelBuilder::new()
        .with_component(scale("A", "Declared"))
        .with_component(Arc::new(Sneaky {}))
        .with_exogenous_value("A", 1.0)
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        NasemError::DuplicateProducer {
            name: "Declared".to_string(),
            first: "Scale".to_string(),
            second: "Sneaky".to_string()
        }
    );
}

#[test]
fn test_exogenous_shadowing_output() {
    let err = ModelBuilder::new()
        .with_component(scale("A", "B"))
        .with_exogenous_value("A", 1.0)
        .with_exogenous_value("B", 1.0)
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        NasemError::DuplicateProducer {
            name: "B".to_string(),
            first: "exogenous".to_string(),
            second: "Scale".to_string()
        }
    );
}

#[test]
fn test_duplicate_exogenous() {
    let err = ModelBuilder::new()
        .with_exogenous_value("A", 1.0)
        .with_exogenous_value("A", 2.0)
        .build()
        .unwrap_err();
    assert!(matches!(err, NasemError::DuplicateWrite { name, .. } if name == "A"));
}

#[test]
fn test_cycle() {
    let err = ModelBuilder::new()
        .with_component(scale("A", "B"))
        .with_component(scale("B", "A"))
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap_err();
    assert!(matches!(err, NasemError::CyclicDependency { .. }));
}

#[test]
fn test_missing_coefficients_listed_together() {
    let err = ModelBuilder::new()
        .with_component(Arc::new(Profile {}))
        .with_component(scale("Du_EAAMic", "Doubled"))
        .with_exogenous_value("Du_MiTP_g", 1000.0)
        .with_coefficients(CoefficientSet::from_table(&[("MiTPArgProf", 5.47)]))
        .build()
        .unwrap_err();
    match err {
        NasemError::MissingCoefficient { names } => {
            assert_eq!(names.len(), 10);
            assert!(names.contains(&"Scale".to_string()));
            assert!(names.contains(&"MiTPValProf".to_string()));
            assert!(!names.contains(&"MiTPArgProf".to_string()));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_kind_mismatch_with_exogenous() {
    let err = ModelBuilder::new()
        .with_component(Arc::new(Profile {}))
        .with_exogenous_value("Du_MiTP_g", AaSeries::constant(&AminoAcid::ALL, 1.0))
        .with_coefficients(profile_coefficients())
        .build()
        .unwrap_err();
    assert!(matches!(err, NasemError::ValueKindMismatch { .. }));
}

#[test]
fn test_undeclared_output() {
    let model = ModelBuilder::new()
        .with_component(Arc::new(Sneaky {}))
        .build()
        .unwrap();
    assert_eq!(
        model.evaluate().unwrap_err(),
        NasemError::UndeclaredOutput {
            component: "Sneaky".to_string(),
            name: "Undeclared".to_string()
        }
    );
}

#[test]
fn test_aa_order_does_not_change_results() {
    use AminoAcid::*;
    let build = |order: Vec<AminoAcid>| {
        ModelBuilder::new()
            .with_component(Arc::new(Profile {}))
            .with_exogenous_value("Du_MiTP_g", 1000.0)
            .with_coefficients(profile_coefficients())
            .with_aa_order(order)
            .build()
            .unwrap()
            .evaluate()
            .unwrap()
    };
    let canonical = build(AminoAcid::ALL.to_vec());
    let shuffled = build(vec![Val, Trp, Met, Arg, Thr, Ile, His, Phe, Lys, Leu]);

    assert_eq!(
        canonical.series("Du_AAMic").unwrap(),
        shuffled.series("Du_AAMic").unwrap()
    );
    assert!(is_close!(
        canonical.scalar("Du_EAAMic").unwrap(),
        shuffled.scalar("Du_EAAMic").unwrap()
    ));
    assert_eq!(canonical.series("Du_AAMic").unwrap().get(Lys), Some(50.0));
}

#[test]
fn test_invalid_aa_order() {
    let err = ModelBuilder::new()
        .with_aa_order(vec![AminoAcid::Arg, AminoAcid::Arg])
        .build()
        .unwrap_err();
    assert!(matches!(err, NasemError::Config(_)));
}

#[test]
fn test_evaluate_with_other_coefficients() {
    let model = ModelBuilder::new()
        .with_component(scale("A", "B"))
        .with_exogenous_value("A", 1.0)
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap();

    let swept = model
        .evaluate_with(&model.coefficients().with_override("Scale", 5.0))
        .unwrap();
    assert_eq!(swept.scalar("B").unwrap(), 5.0);
    assert_eq!(model.evaluate().unwrap().scalar("B").unwrap(), 2.0);

    let err = model
        .evaluate_with(&model.coefficients().without("Scale"))
        .unwrap_err();
    assert!(matches!(err, NasemError::MissingCoefficient { .. }));
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let model = ModelBuilder::new()
        .with_component(Arc::new(Profile {}))
        .with_exogenous_value("Du_MiTP_g", 812.3)
        .with_coefficients(profile_coefficients())
        .build()
        .unwrap();
    let first = serde_json::to_string(&model.evaluate().unwrap()).unwrap();
    let second = serde_json::to_string(&model.evaluate().unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_model_serialisation_roundtrip() {
    let model = ModelBuilder::new()
        .with_component(scale("B", "C"))
        .with_component(scale("A", "B"))
        .with_exogenous_value("A", 1.5)
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap();

    let serialised = serde_json::to_string(&model).unwrap();
    let restored: Model = serde_json::from_str(&serialised).unwrap();
    assert_eq!(
        restored.evaluate().unwrap(),
        model.evaluate().unwrap()
    );
}

#[test]
fn test_dot_output_labels_components() {
    let model = ModelBuilder::new()
        .with_component(scale("A", "B"))
        .with_exogenous_value("A", 1.0)
        .with_coefficients(CoefficientSet::from_table(&[("Scale", 2.0)]))
        .build()
        .unwrap();
    let dot = format!("{:?}", model.as_dot());
    assert!(dot.contains("Scale"));
}
