//! Load Pattern Generators
//!
//! Synthetic loading histories for simulations and prediction. Every generator
//! produces a [`TimeSeriesRecord`] on a uniform grid from `0` to `t_total`
//! whose stress and strain arrays both hold the pattern, so the record can be
//! used either as a strain or as a stress input after [`TimeSeriesRecord::extract`].
//!
//! | Generator        | Value at time `t`                                   |
//! |------------------|-----------------------------------------------------|
//! | [`StepLoad`]     | `amplitude` for `t >= t_on`, logistic if `t_trans > 0` |
//! | [`RampLoad`]     | `offset + gradient * max(t - t_on, 0)`              |
//! | [`SinusoidLoad`] | `amplitude * sin(omega * (t - t_on) + phase)` after `t_on` |
//! | [`NoiseLoad`]    | uniform in `[-amplitude, amplitude]`                |

use derive_builder::Builder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::data::log::{LogEntry, ProvenanceLog};
use crate::data::time::TimeSeriesRecord;
use crate::precision::Real;

use super::grid::TimeGrid;

/// A closed-form loading history
pub trait LoadPattern {
    /// Time span and spacing of the generated record
    fn grid(&self) -> TimeGrid;

    /// Pattern values at the given times
    fn values(&self, time: &[Real]) -> Vec<Real>;

    /// Log entry describing the pattern and its settings
    fn details(&self) -> LogEntry;

    /// Rejects settings the pattern cannot be sampled with
    fn check(&self) -> Result<(), DataError> {
        Ok(())
    }

    /// Builds a record holding the pattern as both stress and strain
    fn generate(&self) -> Result<TimeSeriesRecord, DataError> {
        self.check()?;
        let time = self.grid().points()?;
        let values = self.values(&time);
        let log = ProvenanceLog::started(self.details());

        TimeSeriesRecord::from_parts(time, values.clone(), values, log)
    }
}

/// Step from zero to `amplitude` at `t_on`
///
/// With `t_trans > 0` the step is a logistic function `1 / (1 + exp(-K (t - t_on)))`
/// with `K = 10 / t_trans`, which rises from 0.7% to 99.3% of the amplitude
/// within `t_trans`.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct StepLoad {
    pub t_total: Real,
    #[builder(default = "0.0")]
    pub t_on: Real,
    #[builder(default = "1.0")]
    pub amplitude: Real,
    #[builder(default = "0.0")]
    pub t_trans: Real,
    #[builder(default = "1.0")]
    pub stepsize: Real,
}

impl LoadPattern for StepLoad {
    fn grid(&self) -> TimeGrid {
        TimeGrid::new(0.0, self.t_total, self.stepsize)
    }

    fn values(&self, time: &[Real]) -> Vec<Real> {
        time.iter()
            .map(|&t| self.amplitude * step(t - self.t_on, self.t_trans))
            .collect()
    }

    fn details(&self) -> LogEntry {
        LogEntry::new("step_load")
            .detail("t_total", self.t_total)
            .detail("t_on", self.t_on)
            .detail("amplitude", self.amplitude)
            .detail("t_trans", self.t_trans)
            .detail("stepsize", self.stepsize)
    }
}

/// Linear ramp starting at `t_on`
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct RampLoad {
    pub t_total: Real,
    #[builder(default = "0.0")]
    pub t_on: Real,
    #[builder(default = "1.0")]
    pub gradient: Real,
    #[builder(default = "0.0")]
    pub offset: Real,
    #[builder(default = "1.0")]
    pub stepsize: Real,
}

impl LoadPattern for RampLoad {
    fn grid(&self) -> TimeGrid {
        TimeGrid::new(0.0, self.t_total, self.stepsize)
    }

    fn values(&self, time: &[Real]) -> Vec<Real> {
        time.iter()
            .map(|&t| self.offset + self.gradient * (t - self.t_on).max(0.0))
            .collect()
    }

    fn details(&self) -> LogEntry {
        LogEntry::new("ramp_load")
            .detail("t_total", self.t_total)
            .detail("t_on", self.t_on)
            .detail("gradient", self.gradient)
            .detail("offset", self.offset)
            .detail("stepsize", self.stepsize)
    }
}

/// Sine oscillation with angular frequency `omega`, zero before `t_on`
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct SinusoidLoad {
    pub t_total: Real,
    pub omega: Real,
    #[builder(default = "1.0")]
    pub amplitude: Real,
    #[builder(default = "0.0")]
    pub phase: Real,
    #[builder(default = "0.0")]
    pub t_on: Real,
    #[builder(default = "1.0")]
    pub stepsize: Real,
}

impl LoadPattern for SinusoidLoad {
    fn grid(&self) -> TimeGrid {
        TimeGrid::new(0.0, self.t_total, self.stepsize)
    }

    fn values(&self, time: &[Real]) -> Vec<Real> {
        time.iter()
            .map(|&t| {
                if t < self.t_on {
                    0.0
                } else {
                    self.amplitude * (self.omega * (t - self.t_on) + self.phase).sin()
                }
            })
            .collect()
    }

    fn details(&self) -> LogEntry {
        LogEntry::new("sinusoid_load")
            .detail("t_total", self.t_total)
            .detail("omega", self.omega)
            .detail("amplitude", self.amplitude)
            .detail("phase", self.phase)
            .detail("t_on", self.t_on)
            .detail("stepsize", self.stepsize)
    }
}

/// Uniform white noise
///
/// A fixed `seed` makes the output reproducible; without one the generator is
/// seeded from the operating system.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct NoiseLoad {
    pub t_total: Real,
    #[builder(default = "1.0")]
    pub amplitude: Real,
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
    #[builder(default = "1.0")]
    pub stepsize: Real,
}

impl NoiseLoadBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.amplitude {
            Some(amplitude) => check_noise_amplitude(amplitude),
            None => Ok(()),
        }
    }
}

fn check_noise_amplitude(amplitude: Real) -> Result<(), String> {
    if amplitude.is_finite() {
        Ok(())
    } else {
        Err(format!("noise amplitude must be finite, got {amplitude}"))
    }
}

impl LoadPattern for NoiseLoad {
    fn grid(&self) -> TimeGrid {
        TimeGrid::new(0.0, self.t_total, self.stepsize)
    }

    fn check(&self) -> Result<(), DataError> {
        check_noise_amplitude(self.amplitude).map_err(DataError::InvalidLoad)
    }

    fn values(&self, time: &[Real]) -> Vec<Real> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let amplitude = self.amplitude.abs();

        time.iter()
            .map(|_| rng.gen_range(-amplitude..=amplitude))
            .collect()
    }

    fn details(&self) -> LogEntry {
        LogEntry::new("noise_load")
            .detail("t_total", self.t_total)
            .detail("amplitude", self.amplitude)
            .detail("seed", self.seed)
            .detail("stepsize", self.stepsize)
    }
}

/// Unit step centred on zero, logistic when `t_trans > 0`
pub(crate) fn step(t: Real, t_trans: Real) -> Real {
    if t_trans > 0.0 {
        1.0 / (1.0 + (-10.0 / t_trans * t).exp())
    } else if t >= 0.0 {
        1.0
    } else {
        0.0
    }
}

macro_rules! impl_invalid_load {
    ($($error:ty),*) => {
        $(
            impl From<$error> for DataError {
                fn from(error: $error) -> Self {
                    DataError::InvalidLoad(error.to_string())
                }
            }
        )*
    };
}

impl_invalid_load!(
    StepLoadBuilderError,
    RampLoadBuilderError,
    SinusoidLoadBuilderError,
    NoiseLoadBuilderError
);

/// Step of unit amplitude switched on at `t_on`, on a unit grid over `0..=t_total`
pub fn step_load(t_total: Real, t_on: Real, t_trans: Real) -> Result<TimeSeriesRecord, DataError> {
    StepLoadBuilder::default()
        .t_total(t_total)
        .t_on(t_on)
        .t_trans(t_trans)
        .build()?
        .generate()
}

/// Ramp with the given gradient starting at `t_on`, on a unit grid
pub fn ramp_load(t_total: Real, t_on: Real, gradient: Real) -> Result<TimeSeriesRecord, DataError> {
    RampLoadBuilder::default()
        .t_total(t_total)
        .t_on(t_on)
        .gradient(gradient)
        .build()?
        .generate()
}

/// Sine oscillation starting at `t = 0`
pub fn sinusoid_load(
    t_total: Real,
    omega: Real,
    amplitude: Real,
    stepsize: Real,
) -> Result<TimeSeriesRecord, DataError> {
    SinusoidLoadBuilder::default()
        .t_total(t_total)
        .omega(omega)
        .amplitude(amplitude)
        .stepsize(stepsize)
        .build()?
        .generate()
}

/// Seeded uniform noise on a unit grid
pub fn noise_load(t_total: Real, amplitude: Real, seed: u64) -> Result<TimeSeriesRecord, DataError> {
    NoiseLoadBuilder::default()
        .t_total(t_total)
        .amplitude(amplitude)
        .seed(seed)
        .build()?
        .generate()
}
