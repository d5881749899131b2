//! A model is a set of components evaluated together over one variable namespace.
//!
//! Each component declares the variables it reads and writes. The builder links
//! every reader to the single component that produces the variable, or to a
//! value supplied from outside the model (exogenous). The resulting dependency
//! graph is sorted once, when the model is built, and every evaluation runs the
//! components in that order.
//!
//! Wiring defects are reported by the build step: a variable with two producers,
//! an input nobody provides, a missing coefficient or a dependency cycle.

mod builder;
mod runtime;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use builder::ModelBuilder;
pub use runtime::Model;
pub use types::{CGraph, C};
