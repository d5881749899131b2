//! NASEM (2021) dairy cattle nutrition model
//!
//! [`core`] holds the equation-graph machinery and [`dairy`] the NASEM
//! equations, inputs and default coefficients.

pub use nasem_core as core;
pub use nasem_dairy as dairy;

pub use nasem_core::coefficients::CoefficientSet;
pub use nasem_core::errors::{NasemError, NasemResult};
pub use nasem_core::namespace::NamespaceSnapshot;
pub use nasem_dairy::inputs::{
    AnimalInput, Breed, DietSummary, EquationSelection, FeedRow, FeedTable, InfusionInput,
    InfusionLocation, PhysiologicalState,
};
pub use nasem_dairy::parameters::default_coefficients;
pub use nasem_dairy::{evaluate, NasemModel};
