//! Core machinery for evaluating large graphs of named nutrition equations.
//!
//! Equations are grouped into [`component::Component`]s that declare the
//! variables they read and write and the coefficients they need. A
//! [`model::ModelBuilder`] links the components into a dependency graph,
//! rejecting inconsistent wiring, and the resulting [`model::Model`] evaluates
//! them in dependency order over a write-once [`namespace::VariableNamespace`].

pub mod amino_acids;
pub mod coefficients;
pub mod component;
pub mod errors;
pub mod math;
pub mod model;
pub mod namespace;
