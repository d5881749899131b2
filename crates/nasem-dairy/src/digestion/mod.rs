//! Post-ruminal and total-tract digestion, and the energy and protein supply
//! that follows from it.

pub mod amino_acids;
pub mod energy;
pub mod total_tract;

pub use amino_acids::AminoAcidAbsorption;
pub use energy::{DigestibleEnergy, MetabolizableEnergy};
pub use total_tract::{FiberDigestion, ProteinDigestion, StarchFatDigestion};
