//! Model Classes
//!
//! A [`ModelClass`] is a named viscoelastic model whose moduli are symbolic
//! expressions over an ordered list of parameters. Classes are immutable once
//! defined. They cannot be evaluated directly; binding every parameter through
//! the compiler yields a [`ModelInstance`], freezing a subset yields a new,
//! smaller class.
//!
//! # Defining a class
//!
//! ```
//! use rheos::prelude::*;
//!
//! let definition = ModelDefinitionBuilder::default()
//!     .name("maxwell")
//!     .parameter("eta")
//!     .parameter("k")
//!     .relaxation("k * exp(-k * t / eta)")
//!     .creep("1 / k + t / eta")
//!     .build()
//!     .unwrap();
//!
//! let class = ModelClass::define(definition).unwrap();
//! assert_eq!(class.parameters(), ["eta", "k"]);
//! ```

use std::collections::HashSet;

use derive_builder::Builder;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::expr::ast::Expr;
use crate::expr::parse::{check_variables, is_reserved, parse_expression};
use crate::kernel::numeric::DEFAULT_KERNEL;

use super::compiler;
use super::constraint::Constraint;
use super::error::ModelError;
use super::instance::ModelInstance;
use super::modulus::{Moduli, Modulus};
use super::values::ParameterValues;

lazy_static! {
    static ref PARAMETER_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Textual description of a model class, as written by a user or stored on disk.
///
/// Moduli that are left out are not provided by the model and evaluate to
/// `None`. A missing constraint always holds. A definition written from a
/// frozen class carries its lineage and may have no parameters left.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct ModelDefinition {
    pub name: String,
    #[builder(default, setter(each(name = "parameter", into)))]
    pub parameters: Vec<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relaxation: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creep: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub description: String,
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage: Vec<FreezeRecord>,
}

impl ModelDefinition {
    fn expression(&self, modulus: Modulus) -> Option<&str> {
        match modulus {
            Modulus::Relaxation => self.relaxation.as_deref(),
            Modulus::Creep => self.creep.as_deref(),
            Modulus::Storage => self.storage.as_deref(),
            Modulus::Loss => self.loss.as_deref(),
        }
    }
}

/// Record of a freeze that produced a class from its parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeRecord {
    pub parent: String,
    pub frozen: ParameterValues,
}

/// A named model with symbolic moduli over ordered parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ModelClass {
    name: String,
    parameters: Vec<String>,
    expressions: Moduli<Option<Expr>>,
    constraint: Constraint,
    description: String,
    lineage: Vec<FreezeRecord>,
}

impl ModelClass {
    /// Validates a definition and parses its expressions.
    ///
    /// # Errors
    ///
    /// - [`ModelError::EmptyName`], or [`ModelError::NoParameters`] unless the
    ///   definition records a freeze
    /// - [`ModelError::InvalidParameterName`], [`ModelError::ReservedParameterName`]
    ///   or [`ModelError::DuplicateParameter`] for a bad parameter list
    /// - [`ModelError::Expression`] if a modulus does not parse or uses the wrong variable
    /// - [`ModelError::Constraint`] if the constraint does not parse
    pub fn define(definition: ModelDefinition) -> Result<Self, ModelError> {
        if definition.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if definition.parameters.is_empty() && definition.lineage.is_empty() {
            return Err(ModelError::NoParameters(definition.name));
        }

        validate_parameter_names(&definition.parameters)?;

        let parameters = definition.parameters.clone();
        let parse = |modulus| {
            definition
                .expression(modulus)
                .map(|source| parse_modulus(modulus, source, &parameters))
                .transpose()
        };
        let expressions = Moduli {
            relaxation: parse(Modulus::Relaxation)?,
            creep: parse(Modulus::Creep)?,
            storage: parse(Modulus::Storage)?,
            loss: parse(Modulus::Loss)?,
        };

        let constraint = match &definition.constraint {
            Some(source) => Constraint::parse(source, &parameters)?,
            None => Constraint::always(),
        };

        log::debug!(
            "Defined model class '{}' with parameters [{}]",
            definition.name,
            parameters.join(", ")
        );

        Ok(Self {
            name: definition.name,
            parameters,
            expressions,
            constraint,
            description: definition.description,
            lineage: definition.lineage,
        })
    }

    /// Assembles a class from already validated parts
    pub(crate) fn from_parts(
        name: String,
        parameters: Vec<String>,
        expressions: Moduli<Option<Expr>>,
        constraint: Constraint,
        description: String,
        lineage: Vec<FreezeRecord>,
    ) -> Self {
        Self {
            name,
            parameters,
            expressions,
            constraint,
            description,
            lineage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names in positional binding order
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn expression(&self, modulus: Modulus) -> Option<&Expr> {
        self.expressions.get(modulus).as_ref()
    }

    pub fn expressions(&self) -> &Moduli<Option<Expr>> {
        &self.expressions
    }

    /// Whether the class defines the given modulus
    pub fn provides(&self, modulus: Modulus) -> bool {
        self.expression(modulus).is_some()
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Freezes applied to reach this class, oldest first
    pub fn lineage(&self) -> &[FreezeRecord] {
        &self.lineage
    }

    pub fn is_frozen(&self) -> bool {
        !self.lineage.is_empty()
    }

    /// Evaluates the constraint for the given values
    pub fn constraint_holds(&self, values: &ParameterValues) -> bool {
        self.constraint.holds(values, DEFAULT_KERNEL.as_ref())
    }

    /// Binds every parameter, see [`compiler::bind`]
    pub fn bind(&self, values: &ParameterValues) -> Result<ModelInstance, ModelError> {
        compiler::bind(self, values)
    }

    /// Fixes a subset of parameters, see [`compiler::freeze`]
    pub fn freeze(&self, values: &ParameterValues) -> Result<ModelClass, ModelError> {
        compiler::freeze(self, values)
    }

    /// Writes the class back into its textual form
    pub fn to_definition(&self) -> ModelDefinition {
        let source = |modulus| self.expression(modulus).map(|e| e.to_string());

        ModelDefinition {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            relaxation: source(Modulus::Relaxation),
            creep: source(Modulus::Creep),
            storage: source(Modulus::Storage),
            loss: source(Modulus::Loss),
            constraint: (!self.constraint.is_trivial()).then(|| self.constraint.to_string()),
            description: self.description.clone(),
            lineage: self.lineage.clone(),
        }
    }
}

impl TryFrom<ModelDefinition> for ModelClass {
    type Error = ModelError;

    fn try_from(definition: ModelDefinition) -> Result<Self, Self::Error> {
        ModelClass::define(definition)
    }
}

fn validate_parameter_names(names: &[String]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();

    for name in names {
        if !PARAMETER_NAME.is_match(name) {
            return Err(ModelError::InvalidParameterName(name.clone()));
        }
        if is_reserved(name) {
            return Err(ModelError::ReservedParameterName(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(ModelError::DuplicateParameter(name.clone()));
        }
    }

    Ok(())
}

fn parse_modulus(modulus: Modulus, source: &str, parameters: &[String]) -> Result<Expr, ModelError> {
    let to_error = |source| ModelError::Expression { modulus, source };

    let expr = parse_expression(source, parameters).map_err(to_error)?;
    check_variables(&expr, modulus.variable()).map_err(to_error)?;

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::expr::error::ExpressionError;

    fn maxwell() -> ModelDefinitionBuilder {
        let mut builder = ModelDefinitionBuilder::default();
        builder
            .name("maxwell")
            .parameter("eta")
            .parameter("k")
            .relaxation("k * exp(-k * t / eta)")
            .creep("1 / k + t / eta");
        builder
    }

    #[test]
    fn test_define_model_class() {
        let class = ModelClass::define(maxwell().build().unwrap()).expect("Failed to define");

        assert_eq!(class.name(), "maxwell");
        assert_eq!(class.parameters(), ["eta", "k"]);
        assert!(class.provides(Modulus::Relaxation));
        assert!(!class.provides(Modulus::Storage));
        assert!(class.constraint().is_trivial());
        assert!(!class.is_frozen());
    }

    #[test]
    fn test_rejects_bad_parameter_lists() {
        let duplicate = maxwell().parameter("k").build().unwrap();
        assert_eq!(
            ModelClass::define(duplicate),
            Err(ModelError::DuplicateParameter("k".to_string()))
        );

        let reserved = maxwell().parameter("t").build().unwrap();
        assert_eq!(
            ModelClass::define(reserved),
            Err(ModelError::ReservedParameterName("t".to_string()))
        );

        let invalid = maxwell().parameter("2k").build().unwrap();
        assert_eq!(
            ModelClass::define(invalid),
            Err(ModelError::InvalidParameterName("2k".to_string()))
        );

        let empty = ModelDefinitionBuilder::default()
            .name("empty")
            .relaxation("1")
            .build()
            .unwrap();
        assert_eq!(
            ModelClass::define(empty),
            Err(ModelError::NoParameters("empty".to_string()))
        );
    }

    #[test]
    fn test_rejects_wrong_variable() {
        let definition = maxwell().storage("k * t").build().unwrap();

        let result = ModelClass::define(definition);

        assert!(matches!(
            result,
            Err(ModelError::Expression {
                modulus: Modulus::Storage,
                source: ExpressionError::UnexpectedVariable { .. }
            })
        ));
    }

    #[test]
    fn test_definition_round_trip() {
        let definition = maxwell().constraint("eta > 0; k > 0").build().unwrap();
        let class = ModelClass::define(definition).unwrap();

        let written = class.to_definition();
        let reread = ModelClass::define(written.clone()).unwrap();

        assert_eq!(written.relaxation.as_deref(), Some("k * exp(-k * t / eta)"));
        assert_eq!(written.constraint.as_deref(), Some("eta > 0; k > 0"));
        assert_eq!(reread, class);
    }
}
