//! Model Instances
//!
//! A [`ModelInstance`] is a model class with every parameter bound. It holds the
//! substituted, constant-folded expression of each modulus and interprets it on
//! demand, pointwise or over whole grids. Instances are immutable and can be
//! shared across threads.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::sync::Arc;

use derive_builder::Builder;
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::log::{LogEntry, ProvenanceLog};
use crate::expr::ast::Expr;
use crate::kernel::numeric::NumericKernel;
use crate::precision::{Real, ToReal};

use super::class::{FreezeRecord, ModelClass};
use super::modulus::{Moduli, Modulus};
use super::values::ParameterValues;

/// Configuration of vectorized evaluation
///
/// # Fields
///
/// * `parallel_threshold` - Grids with at least this many points are evaluated
///   on the rayon thread pool (default: 4096)
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct EvalSetup {
    #[builder(default = "4096")]
    pub parallel_threshold: usize,
}

impl Default for EvalSetup {
    fn default() -> Self {
        Self {
            parallel_threshold: 4096,
        }
    }
}

/// A fully parametrized model
#[derive(Debug, Clone)]
pub struct ModelInstance {
    class: ModelClass,
    values: ParameterValues,
    expressions: Moduli<Option<Expr>>,
    kernel: Arc<dyn NumericKernel>,
    setup: EvalSetup,
    log: ProvenanceLog,
}

impl ModelInstance {
    pub(crate) fn new(
        class: ModelClass,
        values: ParameterValues,
        expressions: Moduli<Option<Expr>>,
        kernel: Arc<dyn NumericKernel>,
        setup: EvalSetup,
    ) -> Self {
        let log = ProvenanceLog::started(
            LogEntry::new("bind")
                .detail("model", class.name())
                .detail("parameters", &values),
        );

        Self {
            class,
            values,
            expressions,
            kernel,
            setup,
            log,
        }
    }

    /// Evaluates a modulus at a single point.
    ///
    /// `x` is a time for G and J and an angular frequency for G' and G''.
    /// Returns `None` if the model does not provide the modulus.
    pub fn evaluate(&self, modulus: Modulus, x: impl ToReal) -> Option<Real> {
        let expr = self.expressions.get(modulus).as_ref()?;
        Some(expr.eval(modulus.variable(), x.to_real(), self.kernel.as_ref()))
    }

    /// Evaluates a modulus over a grid, preserving order.
    ///
    /// Large grids are split across threads; the result is identical to
    /// calling [`ModelInstance::evaluate`] for every point.
    pub fn evaluate_many(&self, modulus: Modulus, xs: &[Real]) -> Option<Vec<Real>> {
        let expr = self.expressions.get(modulus).as_ref()?;
        let variable = modulus.variable();
        let kernel = self.kernel.as_ref();

        let values = if xs.len() >= self.setup.parallel_threshold {
            xs.par_iter()
                .map(|&x| expr.eval(variable, x, kernel))
                .collect()
        } else {
            xs.iter().map(|&x| expr.eval(variable, x, kernel)).collect()
        };

        Some(values)
    }

    /// [`ModelInstance::evaluate_many`] over an ndarray
    pub fn evaluate_array(&self, modulus: Modulus, xs: &Array1<Real>) -> Option<Array1<Real>> {
        let values = match xs.as_slice() {
            Some(slice) => self.evaluate_many(modulus, slice)?,
            None => self.evaluate_many(modulus, &xs.to_vec())?,
        };
        Some(Array1::from_vec(values))
    }

    /// Relaxation modulus G(t)
    pub fn g(&self, t: impl ToReal) -> Option<Real> {
        self.evaluate(Modulus::Relaxation, t)
    }

    /// Creep compliance J(t)
    pub fn j(&self, t: impl ToReal) -> Option<Real> {
        self.evaluate(Modulus::Creep, t)
    }

    /// Storage modulus G'(ω)
    pub fn gp(&self, w: impl ToReal) -> Option<Real> {
        self.evaluate(Modulus::Storage, w)
    }

    /// Loss modulus G''(ω)
    pub fn gpp(&self, w: impl ToReal) -> Option<Real> {
        self.evaluate(Modulus::Loss, w)
    }

    pub fn is_available(&self, modulus: Modulus) -> bool {
        self.expressions.get(modulus).is_some()
    }

    pub fn name(&self) -> &str {
        self.class.name()
    }

    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    /// Resolved values in the class's parameter order
    pub fn values(&self) -> &ParameterValues {
        &self.values
    }

    /// The substituted expression of a modulus
    pub fn expression(&self, modulus: Modulus) -> Option<&Expr> {
        self.expressions.get(modulus).as_ref()
    }

    pub fn description(&self) -> &str {
        self.class.description()
    }

    pub fn kernel(&self) -> &dyn NumericKernel {
        self.kernel.as_ref()
    }

    pub fn log(&self) -> &ProvenanceLog {
        &self.log
    }

    /// Whether the bound values satisfy the class constraint
    pub fn constraint_holds(&self) -> bool {
        self.class
            .constraint()
            .holds(&self.values, self.kernel.as_ref())
    }

    /// Human readable summary, identical to the `Display` output
    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn summary(&self) -> ModelSummary {
        let moduli = self
            .expressions
            .iter()
            .filter_map(|(modulus, expr)| {
                expr.as_ref()
                    .map(|e| (modulus.symbol().to_string(), e.to_string()))
            })
            .collect();

        ModelSummary {
            name: self.name().to_string(),
            parameters: self.values.clone(),
            moduli,
            constraint: (!self.class.constraint().is_trivial())
                .then(|| self.class.constraint().to_string()),
            description: self.description().to_string(),
            lineage: self.class.lineage().to_vec(),
        }
    }
}

impl Display for ModelInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.name())?;
        if self.values.is_empty() {
            writeln!(f, "Parameters: none")?;
        } else {
            writeln!(f, "Parameters: {}", self.values)?;
        }
        if !self.description().is_empty() {
            writeln!(f, "{}", self.description())?;
        }
        Ok(())
    }
}

/// Serializable description of a bound model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub parameters: ParameterValues,
    pub moduli: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage: Vec<FreezeRecord>,
}
