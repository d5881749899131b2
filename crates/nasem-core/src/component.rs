use crate::amino_acids::{AaSeries, AminoAcid};
use crate::coefficients::{AaCoefficient, CoefficientSet};
use crate::errors::{NasemError, NasemResult};
use crate::namespace::{kind_mismatch, StateValue, ValueKind, VariableNamespace};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum RequirementType {
    /// The variable is read by the component
    Input,
    /// The variable is produced by the component
    Output,
}

/// A variable read or written by a component.
#[derive(Debug, Eq, PartialEq, Clone, Hash, Serialize, Deserialize)]
pub struct RequirementDefinition {
    pub name: String,
    pub unit: String,
    pub kind: ValueKind,
    pub requirement_type: RequirementType,
}

impl RequirementDefinition {
    pub fn new(name: &str, unit: &str, kind: ValueKind, requirement_type: RequirementType) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            kind,
            requirement_type,
        }
    }

    pub fn scalar_input(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ValueKind::Scalar, RequirementType::Input)
    }

    pub fn scalar_output(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ValueKind::Scalar, RequirementType::Output)
    }

    pub fn series_input(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ValueKind::AminoAcids, RequirementType::Input)
    }

    pub fn series_output(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ValueKind::AminoAcids, RequirementType::Output)
    }

    pub fn per_feed_input(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ValueKind::PerFeed, RequirementType::Input)
    }

    pub fn per_feed_output(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ValueKind::PerFeed, RequirementType::Output)
    }
}

/// Read-only information shared by every component in one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub coefficients: &'a CoefficientSet,
    /// Amino acids in the order series are built in
    pub aa_order: &'a [AminoAcid],
}

impl<'a> EvaluationContext<'a> {
    pub fn new(coefficients: &'a CoefficientSet, aa_order: &'a [AminoAcid]) -> Self {
        Self {
            coefficients,
            aa_order,
        }
    }

    pub fn coefficient(&self, name: &str) -> NasemResult<f64> {
        self.coefficients.get(name)
    }

    pub fn per_aa(&self, coefficient: AaCoefficient) -> NasemResult<AaSeries> {
        self.coefficients.per_aa(coefficient, self.aa_order)
    }

    /// Build a series over the evaluation's amino-acid order.
    pub fn series_from_fn<F>(&self, f: F) -> AaSeries
    where
        F: FnMut(AminoAcid) -> f64,
    {
        AaSeries::from_fn(self.aa_order, f)
    }

    pub fn try_series_from_fn<F>(&self, f: F) -> NasemResult<AaSeries>
    where
        F: FnMut(AminoAcid) -> NasemResult<f64>,
    {
        AaSeries::try_from_fn(self.aa_order, f)
    }
}

/// The values a component is allowed to read.
///
/// Only the component's declared inputs are visible. Reading any other name
/// fails with [`NasemError::UndefinedVariable`], even if it exists in the namespace.
#[derive(Debug)]
pub struct InputState<'a> {
    component: String,
    values: BTreeMap<&'a str, &'a StateValue>,
}

impl<'a> InputState<'a> {
    /// Collect the declared inputs of `component` from `namespace`.
    pub fn from_namespace(
        component: &str,
        inputs: &'a [RequirementDefinition],
        namespace: &'a VariableNamespace,
    ) -> NasemResult<Self> {
        let mut values = BTreeMap::new();
        for definition in inputs {
            let value = namespace.get(&definition.name, component)?;
            if value.kind() != definition.kind {
                return Err(kind_mismatch(&definition.name, definition.kind, value.kind()));
            }
            values.insert(definition.name.as_str(), value);
        }
        Ok(Self {
            component: component.to_string(),
            values,
        })
    }

    /// Build an input state directly, mostly useful in tests.
    pub fn build(component: &str, values: Vec<(&'a str, &'a StateValue)>) -> Self {
        Self {
            component: component.to_string(),
            values: values.into_iter().collect(),
        }
    }

    fn value(&self, name: &str) -> NasemResult<&'a StateValue> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| NasemError::UndefinedVariable {
                name: name.to_string(),
                reader: self.component.clone(),
            })
    }

    pub fn scalar(&self, name: &str) -> NasemResult<f64> {
        let value = self.value(name)?;
        value
            .as_scalar()
            .ok_or_else(|| kind_mismatch(name, ValueKind::Scalar, value.kind()))
    }

    pub fn series(&self, name: &str) -> NasemResult<&'a AaSeries> {
        let value = self.value(name)?;
        value
            .as_series()
            .ok_or_else(|| kind_mismatch(name, ValueKind::AminoAcids, value.kind()))
    }

    pub fn per_feed(&self, name: &str) -> NasemResult<&'a Array1<f64>> {
        let value = self.value(name)?;
        value
            .as_per_feed()
            .ok_or_else(|| kind_mismatch(name, ValueKind::PerFeed, value.kind()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Values produced by a single component solve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputState {
    values: Vec<(String, StateValue)>,
}

impl OutputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: StateValue) -> &mut Self {
        self.values.push((name.to_string(), value));
        self
    }

    pub fn set_scalar(&mut self, name: &str, value: f64) -> &mut Self {
        self.insert(name, StateValue::Scalar(value))
    }

    pub fn set_series(&mut self, name: &str, value: AaSeries) -> &mut Self {
        self.insert(name, StateValue::AminoAcids(value))
    }

    pub fn set_per_feed(&mut self, name: &str, value: Array1<f64>) -> &mut Self {
        self.insert(name, StateValue::PerFeed(value))
    }

    pub fn get(&self, name: &str) -> Option<&StateValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Scalar lookup for tests and callers inspecting a single solve.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(StateValue::as_scalar)
    }

    pub fn series(&self, name: &str) -> Option<&AaSeries> {
        self.get(name).and_then(StateValue::as_series)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for OutputState {
    type Item = (String, StateValue);
    type IntoIter = std::vec::IntoIter<(String, StateValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Expand plain coefficient names into owned strings.
pub fn coefficient_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// All concrete names of a per-amino-acid coefficient family.
pub fn aa_coefficient_names(coefficient: AaCoefficient) -> Vec<String> {
    coefficient.names(&AminoAcid::ALL)
}

/// A group of equations evaluated together.
///
/// A component declares the variables it reads and writes, and the coefficients
/// it needs. The model uses these declarations to order components and to reject
/// inconsistent wiring before anything is evaluated.
#[typetag::serde(tag = "type")]
pub trait Component: Debug + Send + Sync {
    fn definitions(&self) -> Vec<RequirementDefinition>;

    /// Names of the coefficients read during [`Component::solve`].
    fn coefficients(&self) -> Vec<String> {
        vec![]
    }

    /// Solve the component's equations.
    ///
    /// Every value in the returned state must be a declared output.
    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState>;

    /// Short name used in error messages and graph labels.
    fn name(&self) -> String {
        let debug = format!("{:?}", self);
        debug
            .split(['{', ' ', '('])
            .next()
            .unwrap_or("UnknownComponent")
            .to_string()
    }

    fn inputs(&self) -> Vec<RequirementDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::Input)
            .collect()
    }

    fn input_names(&self) -> Vec<String> {
        self.inputs().into_iter().map(|d| d.name).collect()
    }

    fn outputs(&self) -> Vec<RequirementDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.requirement_type == RequirementType::Output)
            .collect()
    }

    fn output_names(&self) -> Vec<String> {
        self.outputs().into_iter().map(|d| d.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct TestDoubler {}

    #[typetag::serde]
    impl Component for TestDoubler {
        fn definitions(&self) -> Vec<RequirementDefinition> {
            vec![
                RequirementDefinition::scalar_input("An_BW", "kg"),
                RequirementDefinition::scalar_output("An_BW_x2", "kg"),
            ]
        }

        fn coefficients(&self) -> Vec<String> {
            coefficient_names(&["Factor"])
        }

        fn solve(
            &self,
            input_state: &InputState,
            context: &EvaluationContext,
        ) -> NasemResult<OutputState> {
            let bw = input_state.scalar("An_BW")?;
            let factor = context.coefficient("Factor")?;
            let mut output = OutputState::new();
            output.set_scalar("An_BW_x2", bw * factor);
            Ok(output)
        }
    }

    #[test]
    fn test_solve() {
        let component = TestDoubler {};
        let bw = StateValue::Scalar(600.0);
        let input_state = InputState::build("TestDoubler", vec![("An_BW", &bw)]);
        let coefficients = CoefficientSet::from_table(&[("Factor", 2.0)]);
        let context = EvaluationContext::new(&coefficients, &AminoAcid::ALL);

        let output = component.solve(&input_state, &context).unwrap();
        assert_eq!(output.scalar("An_BW_x2"), Some(1200.0));
        assert_eq!(component.name(), "TestDoubler");
        assert_eq!(component.input_names(), vec!["An_BW".to_string()]);
        assert_eq!(component.output_names(), vec!["An_BW_x2".to_string()]);
    }

    #[test]
    fn test_restricted_reads() {
        let mut namespace = VariableNamespace::new();
        namespace.set("An_BW", 600.0.into(), "input").unwrap();
        namespace.set("Dt_DMIn", 20.0.into(), "input").unwrap();

        let inputs = vec![RequirementDefinition::scalar_input("An_BW", "kg")];
        let state = InputState::from_namespace("TestDoubler", &inputs, &namespace).unwrap();
        assert_eq!(state.scalar("An_BW").unwrap(), 600.0);
        assert_eq!(
            state.scalar("Dt_DMIn").unwrap_err(),
            NasemError::UndefinedVariable {
                name: "Dt_DMIn".to_string(),
                reader: "TestDoubler".to_string()
            }
        );
    }

    #[test]
    fn test_kind_checked_on_read() {
        let mut namespace = VariableNamespace::new();
        namespace.set("An_BW", 600.0.into(), "input").unwrap();
        let inputs = vec![RequirementDefinition::series_input("An_BW", "g/d")];
        assert!(matches!(
            InputState::from_namespace("TestDoubler", &inputs, &namespace),
            Err(NasemError::ValueKindMismatch { .. })
        ));
    }

    #[test]
    fn test_component_serialisation() {
        let component: Box<dyn Component> = Box::new(TestDoubler {});
        let json = serde_json::to_string(&component).unwrap();
        assert_eq!(json, r#"{"type":"TestDoubler"}"#);
        let parsed: Box<dyn Component> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name(), "TestDoubler");
    }
}
