//! Nutrient requirements of the animal
//!
//! Requirements are computed factorially from targets: maintenance, frame
//! and reserve gain, pregnancy and target milk. Supply-side predictions live
//! in [`crate::digestion`] and [`crate::milk`].

pub mod amino_acids;
pub mod body;
pub mod energy;
pub mod gestation;
pub mod minerals;
pub mod protein;

pub use amino_acids::TargetAminoAcids;
pub use body::{BodyComposition, BodyWeight};
pub use energy::EnergyRequirement;
pub use gestation::Gestation;
pub use minerals::Minerals;
pub use protein::ProteinRequirement;
