//! Model Error Module
//!
//! Errors raised while defining model classes, binding parameter values and
//! freezing parameters. All of them are precondition violations reported
//! synchronously to the caller; nothing is retried or corrected silently.

use std::fmt::{self, Display};

use thiserror::Error;

use crate::expr::error::ExpressionError;

use super::class::ModelDefinitionBuilderError;
use super::modulus::Modulus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Parameter mismatch for model '{model}': {mismatch}")]
    ParameterMismatch {
        model: String,
        mismatch: ParameterMismatch,
    },
    #[error("Unknown parameter '{parameter}' for model '{model}'")]
    UnknownParameter { model: String, parameter: String },
    #[error("Cannot freeze model '{0}' without any parameter values")]
    EmptyFreeze(String),
    #[error("Model '{model}' expects {expected} parameter values, found {found}")]
    ParameterCount {
        model: String,
        expected: usize,
        found: usize,
    },
    #[error("Model name must not be empty")]
    EmptyName,
    #[error("Model '{0}' must declare at least one parameter")]
    NoParameters(String),
    #[error("Parameter '{0}' is declared more than once")]
    DuplicateParameter(String),
    #[error("'{0}' is not a valid parameter name")]
    InvalidParameterName(String),
    #[error("Parameter name '{0}' is reserved for a variable, constant or function")]
    ReservedParameterName(String),
    #[error("Invalid expression for modulus {modulus}: {source}")]
    Expression {
        modulus: Modulus,
        #[source]
        source: ExpressionError,
    },
    #[error("Invalid constraint clause '{clause}': {reason}")]
    Constraint { clause: String, reason: String },
    #[error("Parameters {0:?} are still unresolved")]
    UnresolvedParameters(Vec<String>),
    #[error("No model named '{0}' in the catalog")]
    UnknownModel(String),
    #[error("Failed to build model definition: {0}")]
    Definition(String),
}

impl From<ModelDefinitionBuilderError> for ModelError {
    fn from(error: ModelDefinitionBuilderError) -> Self {
        ModelError::Definition(error.to_string())
    }
}

/// How a set of supplied parameter names differs from the declared ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterMismatch {
    /// Declared parameters without a value
    Missing(Vec<String>),
    /// Supplied names the model does not declare
    Extra(Vec<String>),
}

impl Display for ParameterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterMismatch::Missing(names) => {
                write!(f, "missing values for {}", names.join(", "))
            }
            ParameterMismatch::Extra(names) => {
                write!(f, "unexpected parameters {}", names.join(", "))
            }
        }
    }
}
