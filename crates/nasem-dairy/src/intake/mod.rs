//! Intake of dry matter and nutrients from diet and infusions.

pub mod diet;
pub mod dmi;
pub mod feed;
pub mod infusion;

pub use diet::{AnimalIntakes, DietIntakes};
pub use feed::FeedIntakes;
pub use infusion::Infusions;
