//! Milk yield and composition
//!
//! Milk protein and fat predictors are selected in [`crate::dispatch::milk`];
//! this module holds their regressions and the components that do not
//! depend on a selector.

pub mod fat;
pub mod production;
pub mod protein;
pub mod target;

pub use production::{MilkAllowances, MilkComposition, MilkSummary};
pub use protein::MaxMilkProtein;
pub use target::TargetMilk;
