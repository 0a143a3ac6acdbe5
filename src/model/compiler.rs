//! Model Compiler
//!
//! Turns a [`ModelClass`] plus parameter values into something evaluable:
//!
//! - [`bind`] requires a value for every parameter and produces a [`ModelInstance`]
//!   whose moduli are one-variable expressions with all constants folded
//! - [`freeze`] fixes a non-empty subset of parameters and produces a new, smaller
//!   [`ModelClass`] that is independent of its parent
//!
//! Neither operation evaluates the class constraint.

use std::sync::Arc;

use itertools::Itertools;

use crate::kernel::numeric::{NumericKernel, DEFAULT_KERNEL};
use crate::precision::Real;

use super::class::{FreezeRecord, ModelClass};
use super::error::{ModelError, ParameterMismatch};
use super::instance::{EvalSetup, ModelInstance};
use super::modulus::Modulus;
use super::values::ParameterValues;

/// Binds every parameter of `class` using the shared default kernel.
///
/// # Arguments
///
/// * `class` - The model class to bind
/// * `values` - One value per declared parameter, no more and no less
///
/// # Errors
///
/// Returns [`ModelError::ParameterMismatch`] when a declared parameter has no
/// value ([`ParameterMismatch::Missing`]) or a supplied name is not declared
/// ([`ParameterMismatch::Extra`]). Missing names are reported first.
pub fn bind(class: &ModelClass, values: &ParameterValues) -> Result<ModelInstance, ModelError> {
    bind_with(class, values, DEFAULT_KERNEL.clone(), EvalSetup::default())
}

/// Binds every parameter of `class` with an explicit kernel and evaluation setup
pub fn bind_with(
    class: &ModelClass,
    values: &ParameterValues,
    kernel: Arc<dyn NumericKernel>,
    setup: EvalSetup,
) -> Result<ModelInstance, ModelError> {
    let resolved = resolve(class, values)?;
    let lookup = resolved.to_lookup();

    let expressions = class.expressions().map(|_, expr| {
        expr.as_ref()
            .map(|e| e.substitute(&lookup).fold_constants(kernel.as_ref()))
    });

    let unresolved: Vec<String> = expressions
        .iter()
        .filter_map(|(_, expr)| expr.as_ref())
        .flat_map(|e| e.parameters())
        .unique()
        .collect();
    if !unresolved.is_empty() {
        return Err(ModelError::UnresolvedParameters(unresolved));
    }

    log::debug!("Bound model '{}' with {}", class.name(), resolved);

    Ok(ModelInstance::new(
        class.clone(),
        resolved,
        expressions,
        kernel,
        setup,
    ))
}

/// Fixes a subset of parameters to constants.
///
/// The returned class keeps the remaining parameters in their original order.
/// Its name and description record the frozen values, and its lineage links it
/// to `class`. Freezing every parameter is allowed and yields a class that binds
/// with an empty mapping.
///
/// # Errors
///
/// - [`ModelError::EmptyFreeze`] if `values` is empty
/// - [`ModelError::UnknownParameter`] if `values` names a parameter the class lacks
pub fn freeze(class: &ModelClass, values: &ParameterValues) -> Result<ModelClass, ModelError> {
    if values.is_empty() {
        return Err(ModelError::EmptyFreeze(class.name().to_string()));
    }

    if let Some(unknown) = values
        .names()
        .find(|name| !class.parameters().iter().any(|p| p == name))
    {
        return Err(ModelError::UnknownParameter {
            model: class.name().to_string(),
            parameter: unknown.to_string(),
        });
    }

    // Frozen values in declaration order, independent of how they were supplied
    let frozen: ParameterValues = class
        .parameters()
        .iter()
        .filter_map(|name| values.get(name).map(|v| (name.clone(), v)))
        .collect();
    let remaining: Vec<String> = class
        .parameters()
        .iter()
        .filter(|name| !frozen.contains(name))
        .cloned()
        .collect();

    let lookup = frozen.to_lookup();
    let expressions = class
        .expressions()
        .map(|_, expr| expr.as_ref().map(|e| e.substitute(&lookup)));

    let name = format!("{} [{}]", class.name(), frozen);
    let description = match class.description().trim() {
        "" => format!("Frozen parameters: {frozen}"),
        text => format!("{text}\nFrozen parameters: {frozen}"),
    };

    let mut lineage = class.lineage().to_vec();
    lineage.push(FreezeRecord {
        parent: class.name().to_string(),
        frozen: frozen.clone(),
    });

    log::debug!(
        "Froze {} on model '{}', remaining parameters [{}]",
        frozen,
        class.name(),
        remaining.join(", ")
    );

    Ok(ModelClass::from_parts(
        name,
        remaining,
        expressions,
        class.constraint().substitute(&frozen),
        description,
        lineage,
    ))
}

/// Pairs a positional parameter vector with the class's parameter names
///
/// # Errors
///
/// Returns [`ModelError::ParameterCount`] if the vector length differs from the
/// number of declared parameters.
pub fn positional_values(
    class: &ModelClass,
    parameters: &[Real],
) -> Result<ParameterValues, ModelError> {
    if parameters.len() != class.parameters().len() {
        return Err(ModelError::ParameterCount {
            model: class.name().to_string(),
            expected: class.parameters().len(),
            found: parameters.len(),
        });
    }

    Ok(class
        .parameters()
        .iter()
        .cloned()
        .zip(parameters.iter().copied())
        .collect())
}

/// Binds a positional parameter vector and evaluates one modulus over a grid.
///
/// This is the contract a fitting routine relies on: the same vector and grid
/// always give the same output, and no state is kept between calls.
///
/// # Returns
///
/// `Ok(None)` if the class does not provide `modulus`.
pub fn evaluate_trial(
    class: &ModelClass,
    modulus: Modulus,
    parameters: &[Real],
    grid: &[Real],
) -> Result<Option<Vec<Real>>, ModelError> {
    let values = positional_values(class, parameters)?;
    let instance = bind(class, &values)?;
    Ok(instance.evaluate_many(modulus, grid))
}

/// Orders `values` by the class's parameters after checking exact coverage
fn resolve(class: &ModelClass, values: &ParameterValues) -> Result<ParameterValues, ModelError> {
    let mismatch = |mismatch| ModelError::ParameterMismatch {
        model: class.name().to_string(),
        mismatch,
    };

    let missing: Vec<String> = class
        .parameters()
        .iter()
        .filter(|name| !values.contains(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(mismatch(ParameterMismatch::Missing(missing)));
    }

    let extra: Vec<String> = values
        .names()
        .filter(|name| !class.parameters().iter().any(|p| p == name))
        .map(String::from)
        .collect();
    if !extra.is_empty() {
        return Err(mismatch(ParameterMismatch::Extra(extra)));
    }

    Ok(class
        .parameters()
        .iter()
        .filter_map(|name| values.get(name).map(|v| (name.clone(), v)))
        .collect())
}
