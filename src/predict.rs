//! Prediction
//!
//! Applies a bound model to loading histories using Boltzmann superposition:
//!
//! ```text
//! σ(t_i) = Σ_{j≤i} G(t_i - t_j) Δε_j        ε(t_i) = Σ_{j≤i} J(t_i - t_j) Δσ_j
//! ```
//!
//! where `Δx_j = x_j - x_{j-1}` and `x_{-1} = 0`, i.e. the input is treated as a
//! sum of steps applied at the sample times. On uniform grids the modulus is
//! evaluated once per lag instead of once per pair of samples.
//!
//! Many models have a singular relaxation modulus at `t = 0`. A non-finite value
//! at lag zero is replaced by the modulus at half the first sampling interval
//! and a warning is logged.

use rayon::prelude::*;
use thiserror::Error;

use crate::data::error::DataError;
use crate::data::freq::FrequencySeriesRecord;
use crate::data::kind::TimeDataKind;
use crate::data::log::LogEntry;
use crate::data::time::TimeSeriesRecord;
use crate::model::error::ModelError;
use crate::model::instance::ModelInstance;
use crate::model::modulus::Modulus;
use crate::precision::Real;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("Model '{model}' does not provide the {modulus} modulus")]
    ModulusUnavailable { model: String, modulus: Modulus },
    #[error("Cannot predict from a record holding {0}")]
    UnsupportedKind(TimeDataKind),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Relative spacing deviation below which a grid is treated as uniform
const UNIFORM_TOLERANCE: Real = 1e-6;

/// Predicts the missing half of a loading history.
///
/// A strain-only record yields stress through G(t); a stress-only record yields
/// strain through J(t). The result holds both arrays on the input's time grid.
///
/// # Errors
///
/// - [`PredictError::UnsupportedKind`] for records holding only time or both arrays
/// - [`PredictError::ModulusUnavailable`] if the model lacks the modulus required
pub fn predict(
    instance: &ModelInstance,
    record: &TimeSeriesRecord,
) -> Result<TimeSeriesRecord, PredictError> {
    let (modulus, input) = match (record.kind(), record.strain(), record.stress()) {
        (TimeDataKind::StrainOnly, Some(strain), _) => (Modulus::Relaxation, strain),
        (TimeDataKind::StressOnly, _, Some(stress)) => (Modulus::Creep, stress),
        (kind, _, _) => return Err(PredictError::UnsupportedKind(kind)),
    };

    if !instance.is_available(modulus) {
        return Err(PredictError::ModulusUnavailable {
            model: instance.name().to_string(),
            modulus,
        });
    }

    let time = record.time();
    let output = superpose(instance, modulus, time, input);

    let (stress, strain) = match modulus {
        Modulus::Relaxation => (output, input.to_vec()),
        _ => (input.to_vec(), output),
    };

    let entry = LogEntry::new("predict")
        .detail("model", instance.name())
        .detail("parameters", instance.values())
        .detail("modulus", modulus);

    Ok(TimeSeriesRecord::from_parts(
        time.to_vec(),
        stress,
        strain,
        record.log().appended(entry),
    )?)
}

/// Evaluates G'(ω) and G''(ω) on the frequencies of `record`.
///
/// # Errors
///
/// Returns [`PredictError::ModulusUnavailable`] if the model lacks either modulus.
pub fn predict_frequency(
    instance: &ModelInstance,
    record: &FrequencySeriesRecord,
) -> Result<FrequencySeriesRecord, PredictError> {
    let evaluate = |modulus| {
        instance
            .evaluate_many(modulus, record.frequency())
            .ok_or_else(|| PredictError::ModulusUnavailable {
                model: instance.name().to_string(),
                modulus,
            })
    };

    let storage = evaluate(Modulus::Storage)?;
    let loss = evaluate(Modulus::Loss)?;

    let entry = LogEntry::new("predict")
        .detail("model", instance.name())
        .detail("parameters", instance.values());

    Ok(FrequencySeriesRecord::from_parts(
        record.frequency().to_vec(),
        storage,
        loss,
        record.log().appended(entry),
    )?)
}

fn superpose(instance: &ModelInstance, modulus: Modulus, time: &[Real], input: &[Real]) -> Vec<Real> {
    let n = time.len();
    if n == 0 {
        return Vec::new();
    }

    let increments: Vec<Real> = std::iter::once(input[0])
        .chain(input.windows(2).map(|w| w[1] - w[0]))
        .collect();
    let h = if n > 1 { time[1] - time[0] } else { 1.0 };
    let lag_zero = lag_zero_value(instance, modulus, h);

    if is_uniform(time) {
        let lags: Vec<Real> = (0..n).map(|k| time[k] - time[0]).collect();
        let mut kernel = instance
            .evaluate_many(modulus, &lags)
            .unwrap_or_else(|| vec![Real::NAN; n]);
        kernel[0] = lag_zero;

        (0..n)
            .into_par_iter()
            .map(|i| (0..=i).map(|j| kernel[i - j] * increments[j]).sum())
            .collect()
    } else {
        (0..n)
            .into_par_iter()
            .map(|i| {
                (0..=i)
                    .map(|j| {
                        let value = if i == j {
                            lag_zero
                        } else {
                            instance.evaluate(modulus, time[i] - time[j]).unwrap_or(Real::NAN)
                        };
                        value * increments[j]
                    })
                    .sum()
            })
            .collect()
    }
}

fn lag_zero_value(instance: &ModelInstance, modulus: Modulus, h: Real) -> Real {
    let value = instance.evaluate(modulus, 0.0).unwrap_or(Real::NAN);
    if value.is_finite() {
        return value;
    }

    let replacement = instance.evaluate(modulus, h / 2.0).unwrap_or(Real::NAN);
    log::warn!(
        "{} of model '{}' is singular at t = 0, using its value at t = {} instead",
        modulus,
        instance.name(),
        h / 2.0
    );
    replacement
}

fn is_uniform(time: &[Real]) -> bool {
    if time.len() < 3 {
        return true;
    }
    let h = time[1] - time[0];
    time.windows(2)
        .all(|w| ((w[1] - w[0]) - h).abs() <= UNIFORM_TOLERANCE * h.abs())
}
