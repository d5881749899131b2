use thiserror::Error;

/// Error type for model construction and evaluation.
///
/// Every variant is fatal for the evaluation that raised it.
/// Errors are returned to the caller of [`Model::evaluate`](crate::model::Model::evaluate)
/// unchanged; nothing inside the engine recovers from them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NasemError {
    /// One or more required coefficients are absent from the coefficient set.
    #[error("Missing coefficients: {}", names.join(", "))]
    MissingCoefficient { names: Vec<String> },

    /// A variable was read before any equation (or input) had written it.
    #[error("Variable '{name}' is not defined (read by {reader})")]
    UndefinedVariable { name: String, reader: String },

    /// A variable was written twice within a single evaluation.
    #[error("Variable '{name}' was already written before {writer} attempted to write it")]
    DuplicateWrite { name: String, writer: String },

    /// Two sources declare the same output when a model is built.
    #[error("Variable '{name}' is produced by both {first} and {second}")]
    DuplicateProducer {
        name: String,
        first: String,
        second: String,
    },

    /// An equation-selection value has no matching formula variant.
    #[error("Invalid equation selection {key}={value}")]
    InvalidSelector { key: String, value: i64 },

    /// A formula received input for which it is mathematically undefined.
    #[error("Domain error in {equation}: {details}")]
    Domain { equation: String, details: String },

    /// A component produced a variable it did not declare as an output.
    #[error("Component {component} produced undeclared output '{name}'")]
    UndeclaredOutput { component: String, name: String },

    /// A producer and a consumer disagree on the shape of a variable.
    #[error("Variable '{name}' is declared as {expected} but used as {found}")]
    ValueKindMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// The component graph contains a dependency cycle.
    #[error("Component dependency cycle detected at {component}")]
    CyclicDependency { component: String },

    /// A configuration source (coefficients, inputs) could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NasemError {
    /// Convenience constructor for [`NasemError::Domain`].
    pub fn domain(equation: &str, details: impl Into<String>) -> Self {
        NasemError::Domain {
            equation: equation.to_string(),
            details: details.into(),
        }
    }
}

/// Convenience type for `Result<T, NasemError>`.
pub type NasemResult<T> = Result<T, NasemError>;
