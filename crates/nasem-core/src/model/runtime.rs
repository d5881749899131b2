//! Model struct and runtime execution.

use crate::amino_acids::AminoAcid;
use crate::coefficients::CoefficientSet;
use crate::component::{EvaluationContext, InputState};
use crate::errors::{NasemError, NasemResult};
use crate::namespace::{NamespaceSnapshot, VariableNamespace};
use log::trace;
use petgraph::dot::{Config, Dot};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{CGraph, C};
use super::validation::verify_coefficients;

/// A set of components that are evaluated together over one variable namespace.
///
/// Each component may require values produced by other components (endogenous)
/// or values supplied when the model was built (exogenous).
/// For example, the microbial protein component reads the rumen-degradable
/// protein intake. If no component produces it, it must be supplied from
/// outside; otherwise the producing component is always solved first.
///
/// A model holds no state between evaluations. Every call to
/// [`Model::evaluate`] starts from the exogenous values and a fresh namespace.
#[derive(Debug, Serialize, Deserialize)]
pub struct Model {
    /// A directed graph with components as nodes and the edges defining the
    /// variable dependencies between nodes.
    components: CGraph,
    /// Topological order of `components`, computed once at build time
    order: Vec<NodeIndex>,
    exogenous: VariableNamespace,
    coefficients: CoefficientSet,
    aa_order: Vec<AminoAcid>,
}

impl Model {
    pub fn new(
        components: CGraph,
        order: Vec<NodeIndex>,
        exogenous: VariableNamespace,
        coefficients: CoefficientSet,
        aa_order: Vec<AminoAcid>,
    ) -> Self {
        Self {
            components,
            order,
            exogenous,
            coefficients,
            aa_order,
        }
    }

    /// Evaluate every component once, in dependency order.
    ///
    /// The first error raised by any component aborts the evaluation and is returned unchanged.
    pub fn evaluate(&self) -> NasemResult<NamespaceSnapshot> {
        self.evaluate_inner(&self.coefficients)
    }

    /// Evaluate with a different coefficient set, such as a sensitivity-sweep sample.
    ///
    /// The coefficient set is checked against every component's requirements first.
    pub fn evaluate_with(&self, coefficients: &CoefficientSet) -> NasemResult<NamespaceSnapshot> {
        let components: Vec<C> = self.components.node_weights().cloned().collect();
        verify_coefficients(&components, coefficients)?;
        self.evaluate_inner(coefficients)
    }

    fn evaluate_inner(&self, coefficients: &CoefficientSet) -> NasemResult<NamespaceSnapshot> {
        let mut namespace = self.exogenous.clone();
        let context = EvaluationContext::new(coefficients, &self.aa_order);

        for &nx in &self.order {
            let component = &self.components[nx];
            solve_component(component, &mut namespace, &context)?;
        }
        Ok(namespace.snapshot())
    }

    /// Component names in the order they are solved.
    pub fn solve_order(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|&nx| self.components[nx].name())
            .collect()
    }

    /// Names of the values supplied from outside the model.
    pub fn exogenous_names(&self) -> Vec<String> {
        self.exogenous.names().map(|n| n.to_string()).collect()
    }

    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    /// Every coefficient name read by at least one component, sorted.
    pub fn required_coefficients(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .components
            .node_weights()
            .flat_map(|component| component.coefficients())
            .collect();
        names.into_iter().collect()
    }

    pub fn aa_order(&self) -> &[AminoAcid] {
        &self.aa_order
    }

    /// Create a diagram that represents the component graph.
    ///
    /// Useful for debugging.
    pub fn as_dot(&self) -> Dot<'_, &CGraph> {
        Dot::with_attr_getters(
            &self.components,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &|_, er| format!("label = {:?}", er.weight().name),
            &|_, (_, component)| format!("label = {:?}", component.name()),
        )
    }
}

/// Solve a single component and write its outputs into the namespace.
fn solve_component(
    component: &C,
    namespace: &mut VariableNamespace,
    context: &EvaluationContext,
) -> NasemResult<()> {
    let name = component.name();
    let inputs = component.inputs();
    let output_state = {
        let input_state = InputState::from_namespace(&name, &inputs, namespace)?;
        trace!("Solving {name}");
        component.solve(&input_state, context)?
    };

    let declared = component.output_names();
    for (key, value) in output_state {
        if !declared.contains(&key) {
            return Err(NasemError::UndeclaredOutput {
                component: name,
                name: key,
            });
        }
        namespace.set(&key, value, &name)?;
    }
    Ok(())
}
