//! NASEM (2021) dairy cattle nutrient requirement equations
//!
//! Equations are grouped by subsystem into [`nasem_core::component::Component`]s.
//! [`model::NasemModel`] registers them for one animal, diet and equation
//! selection and evaluates the resulting dependency graph.

pub mod digestion;
pub mod dispatch;
pub mod excretion;
pub mod inputs;
pub mod intake;
pub mod milk;
pub mod model;
pub mod parameters;
pub mod requirements;
pub mod rumen;

pub use model::{evaluate, NasemModel};
