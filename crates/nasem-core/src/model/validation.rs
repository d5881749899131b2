//! Validation functions for model building.

use crate::coefficients::CoefficientSet;
use crate::component::RequirementDefinition;
use crate::errors::{NasemError, NasemResult};
use crate::namespace::kind_mismatch;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashMap};

use super::types::{CGraph, VariableDefinition, C};

/// Checks if the new definition is consistent with earlier definitions of the same name.
///
/// Every reader and writer of a variable must agree on its value kind.
pub(crate) fn verify_definition(
    definitions: &mut HashMap<String, VariableDefinition>,
    definition: &RequirementDefinition,
    component_name: &str,
) -> NasemResult<()> {
    match definitions.get(&definition.name) {
        Some(existing) => {
            if existing.kind != definition.kind {
                return Err(kind_mismatch(&definition.name, existing.kind, definition.kind));
            }
        }
        None => {
            definitions.insert(
                definition.name.clone(),
                VariableDefinition::from_requirement_definition(definition, component_name),
            );
        }
    }
    Ok(())
}

/// Check that every coefficient required by any component is present.
///
/// All missing names across all components are reported together.
pub(crate) fn verify_coefficients(components: &[C], coefficients: &CoefficientSet) -> NasemResult<()> {
    let required: BTreeSet<String> = components
        .iter()
        .flat_map(|c| c.coefficients())
        .collect();
    let required: Vec<String> = required.into_iter().collect();
    coefficients.require(&required)
}

/// Order the component graph so every producer precedes its readers.
///
/// The order only depends on the order in which components were registered,
/// so repeated builds of the same model solve components identically.
pub(crate) fn solve_order(graph: &CGraph) -> NasemResult<Vec<NodeIndex>> {
    toposort(graph, None).map_err(|cycle| NasemError::CyclicDependency {
        component: graph[cycle.node_id()].name(),
    })
}
