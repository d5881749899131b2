//! Type definitions for the model module.

use crate::component::{Component, RequirementDefinition};
use crate::namespace::ValueKind;
use petgraph::Graph;
use std::sync::Arc;

/// Type alias for a component wrapped in an Arc for shared ownership.
pub type C = Arc<dyn Component>;

/// Type alias for the component dependency graph.
pub type CGraph = Graph<C, RequirementDefinition>;

/// Internal definition tracking for a variable during model building.
#[derive(Debug)]
pub(crate) struct VariableDefinition {
    pub kind: ValueKind,
    /// Component (or `exogenous`) that first declared the variable
    pub owner: String,
}

impl VariableDefinition {
    pub fn from_requirement_definition(definition: &RequirementDefinition, owner: &str) -> Self {
        Self {
            kind: definition.kind,
            owner: owner.to_string(),
        }
    }
}
