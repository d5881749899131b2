//! Model builder for constructing models from components.

use crate::amino_acids::AminoAcid;
use crate::coefficients::CoefficientSet;
use crate::component::Component;
use crate::errors::{NasemError, NasemResult};
use crate::namespace::{StateValue, VariableNamespace};
use log::debug;
use petgraph::graph::NodeIndex;
use petgraph::Graph;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use super::runtime::Model;
use super::types::{CGraph, VariableDefinition, C};
use super::validation::{solve_order, verify_coefficients, verify_definition};

const EXOGENOUS: &str = "exogenous";

/// Build a new model from a set of components.
///
/// The builder generates a graph that defines the inter-component dependencies
/// and determines what variables are endogenous and exogenous to the model.
/// This graph is used by the model to define the order in which components are solved.
pub struct ModelBuilder {
    components: Vec<C>,
    exogenous_values: Vec<(String, StateValue)>,
    coefficients: CoefficientSet,
    aa_order: Vec<AminoAcid>,
}

impl ModelBuilder {
    /// Create a new model builder with no coefficients and the canonical amino-acid order.
    pub fn new() -> Self {
        Self {
            components: vec![],
            exogenous_values: vec![],
            coefficients: CoefficientSet::default(),
            aa_order: AminoAcid::ALL.to_vec(),
        }
    }

    /// Register a component with the builder.
    pub fn with_component(&mut self, component: Arc<dyn Component>) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Supply a value from outside the model.
    ///
    /// Supplying the same name twice is reported when the model is built.
    pub fn with_exogenous_value(&mut self, name: &str, value: impl Into<StateValue>) -> &mut Self {
        self.exogenous_values.push((name.to_string(), value.into()));
        self
    }

    /// Supply several exogenous values.
    pub fn with_exogenous_values<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, StateValue)>,
    {
        self.exogenous_values.extend(values);
        self
    }

    /// Set the coefficients the model is evaluated with.
    pub fn with_coefficients(&mut self, coefficients: CoefficientSet) -> &mut Self {
        self.coefficients = coefficients;
        self
    }

    /// Order in which amino-acid series are built.
    ///
    /// Must contain each of the ten amino acids exactly once. Results do not
    /// depend on the order; it only changes the internal layout of series.
    pub fn with_aa_order(&mut self, order: Vec<AminoAcid>) -> &mut Self {
        self.aa_order = order;
        self
    }

    fn verify_aa_order(&self) -> NasemResult<()> {
        let unique: BTreeSet<AminoAcid> = self.aa_order.iter().copied().collect();
        if self.aa_order.len() != AminoAcid::ALL.len() || unique.len() != AminoAcid::ALL.len() {
            return Err(NasemError::Config(format!(
                "Amino-acid order must list each of the {} amino acids once, got {:?}",
                AminoAcid::ALL.len(),
                self.aa_order
            )));
        }
        Ok(())
    }

    /// Builds the component graph for the registered components and creates a concrete model.
    ///
    /// Returns an error if the component definitions are inconsistent.
    pub fn build(&self) -> NasemResult<Model> {
        self.verify_aa_order()?;

        let mut graph: CGraph = Graph::new();
        let mut exogenous = VariableNamespace::new();
        let mut definitions: HashMap<String, VariableDefinition> = HashMap::new();
        let mut endogenous: HashMap<String, NodeIndex> = HashMap::new();

        for (name, value) in &self.exogenous_values {
            exogenous.set(name, value.clone(), EXOGENOUS)?;
            definitions.insert(
                name.clone(),
                VariableDefinition {
                    kind: value.kind(),
                    owner: EXOGENOUS.to_string(),
                },
            );
        }

        // Register every producer first so registration order does not matter
        let mut nodes = Vec::with_capacity(self.components.len());
        for component in &self.components {
            let node = graph.add_node(component.clone());
            nodes.push(node);
            let component_name = component.name();

            for requirement in component.outputs() {
                if endogenous.contains_key(&requirement.name) || exogenous.contains(&requirement.name)
                {
                    let first = definitions
                        .get(&requirement.name)
                        .map(|definition| definition.owner.clone())
                        .unwrap_or_else(|| EXOGENOUS.to_string());
                    return Err(NasemError::DuplicateProducer {
                        name: requirement.name.clone(),
                        first,
                        second: component_name,
                    });
                }
                verify_definition(&mut definitions, &requirement, &component_name)?;
                endogenous.insert(requirement.name.clone(), node);
            }
        }

        for (component, &node) in self.components.iter().zip(nodes.iter()) {
            let component_name = component.name();

            for requirement in component.inputs() {
                verify_definition(&mut definitions, &requirement, &component_name)?;

                match endogenous.get(&requirement.name) {
                    Some(&producer) if producer == node => {
                        return Err(NasemError::CyclicDependency {
                            component: component_name,
                        });
                    }
                    Some(&producer) => {
                        graph.add_edge(producer, node, requirement.clone());
                    }
                    None if exogenous.contains(&requirement.name) => {}
                    None => {
                        return Err(NasemError::UndefinedVariable {
                            name: requirement.name.clone(),
                            reader: component_name,
                        });
                    }
                }
            }
        }

        verify_coefficients(&self.components, &self.coefficients)?;
        let order = solve_order(&graph)?;

        debug!(
            "Built model with {} components, {} exogenous and {} endogenous variables",
            self.components.len(),
            exogenous.len(),
            endogenous.len()
        );

        Ok(Model::new(
            graph,
            order,
            exogenous,
            self.coefficients.clone(),
            self.aa_order.clone(),
        ))
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
