//! Losses from the animal: gaseous energy, urinary and manure nitrogen,
//! and drinking water.

pub mod methane;
pub mod urine;
pub mod water;

pub use urine::Urine;
pub use water::Water;
