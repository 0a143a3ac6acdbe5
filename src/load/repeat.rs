//! Repetition of a loading history
//!
//! [`RepeatLoad`] concatenates copies of a record. Copy `r` is shifted in time
//! by `r * period`, where `period = t_last - t_first + dt` and `dt` is the first
//! sampling interval, so the repeated record keeps its spacing across joins.
//!
//! # Smoothing
//!
//! Joining copies generally introduces a jump `Δ = v_first - v_last` at every
//! boundary. With `t_trans > 0` each jump is replaced by a logistic transition:
//! the pulse `Δ (σ(K (t - c)) - H(t - c))` is added on top of the raw
//! concatenation, where `c` lies halfway between the last sample of one copy and
//! the first sample of the next, `σ` is the logistic function, `H` the unit step
//! and `K = 10 / t_trans`.
//!
//! This is an approximation, not an exact splice. Samples within `t_trans / 2`
//! of a boundary move by up to `|Δ| / 2`. Beyond that window the perturbation is
//! below `0.0067 |Δ|` and decays exponentially.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::data::kind::TimeDataKind;
use crate::data::log::LogEntry;
use crate::data::time::TimeSeriesRecord;
use crate::precision::Real;

use super::patterns::step;

/// Settings for repeating a record
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct RepeatLoad {
    /// Total number of copies in the result, at least one
    pub repeats: usize,
    /// Width of the smoothing transition, `None` for a plain concatenation
    #[builder(default, setter(strip_option))]
    pub t_trans: Option<Real>,
}

impl From<RepeatLoadBuilderError> for DataError {
    fn from(error: RepeatLoadBuilderError) -> Self {
        DataError::InvalidLoad(error.to_string())
    }
}

impl RepeatLoad {
    /// Repeats `record` according to these settings.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidLoad`] if `repeats` is zero, if the record
    /// holds a single sample or only time, or if `t_trans` is negative.
    pub fn apply(&self, record: &TimeSeriesRecord) -> Result<TimeSeriesRecord, DataError> {
        if self.repeats == 0 {
            return Err(DataError::InvalidLoad(
                "repeats must be at least one".to_string(),
            ));
        }
        if record.kind() == TimeDataKind::TimeOnly {
            return Err(DataError::InvalidLoad(
                "a record holding only time has nothing to repeat".to_string(),
            ));
        }
        if record.len() < 2 {
            return Err(DataError::InvalidLoad(
                "at least two samples are needed to determine the period".to_string(),
            ));
        }
        if matches!(self.t_trans, Some(t) if t.is_nan() || t < 0.0) {
            return Err(DataError::InvalidLoad(
                "transition time must not be negative".to_string(),
            ));
        }

        let time = record.time();
        let dt = time[1] - time[0];
        let period = time[time.len() - 1] - time[0] + dt;

        let repeated_time: Vec<Real> = (0..self.repeats)
            .flat_map(|r| time.iter().map(move |t| t + r as Real * period))
            .collect();

        let boundaries: Vec<Real> = (1..self.repeats)
            .map(|r| time[0] + r as Real * period - dt / 2.0)
            .collect();

        let repeat_values = |values: Option<&[Real]>| -> Vec<Real> {
            let Some(values) = values else {
                return Vec::new();
            };

            let mut repeated: Vec<Real> = (0..self.repeats)
                .flat_map(|_| values.iter().copied())
                .collect();

            if let Some(t_trans) = self.t_trans.filter(|t| *t > 0.0) {
                let jump = values[0] - values[values.len() - 1];
                smooth(&mut repeated, &repeated_time, &boundaries, jump, t_trans);
            }

            repeated
        };

        let stress = repeat_values(record.stress());
        let strain = repeat_values(record.strain());

        let mut entry = LogEntry::new("repeat").detail("repeats", self.repeats);
        if let Some(t_trans) = self.t_trans {
            entry = entry.detail("t_trans", t_trans);
        }

        TimeSeriesRecord::from_parts(repeated_time, stress, strain, record.log().appended(entry))
    }
}

/// Overlays the smoothing pulse for every boundary
fn smooth(values: &mut [Real], time: &[Real], boundaries: &[Real], jump: Real, t_trans: Real) {
    if jump == 0.0 {
        return;
    }
    for &c in boundaries {
        for (value, &t) in values.iter_mut().zip(time.iter()) {
            *value += jump * (step(t - c, t_trans) - step(t - c, 0.0));
        }
    }
}

/// Repeats a record `repeats` times, optionally smoothing the joins
pub fn repeat_load(
    record: &TimeSeriesRecord,
    repeats: usize,
    t_trans: Option<Real>,
) -> Result<TimeSeriesRecord, DataError> {
    RepeatLoad { repeats, t_trans }.apply(record)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::load::patterns::ramp_load;

    #[test]
    fn test_plain_repeat() {
        let ramp = ramp_load(2.0, 0.0, 1.0).unwrap();

        let repeated = repeat_load(&ramp, 3, None).unwrap();

        assert_eq!(repeated.time(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(
            repeated.strain().unwrap(),
            &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0]
        );
        assert_eq!(repeated.log().flatten(), vec!["ramp_load", "repeat"]);
    }

    #[test]
    fn test_smoothing_is_bounded() {
        let ramp = ramp_load(9.0, 0.0, 1.0).unwrap();
        let t_trans = 2.0;

        let plain = repeat_load(&ramp, 2, None).unwrap();
        let smoothed = repeat_load(&ramp, 2, Some(t_trans)).unwrap();

        // Boundary between t = 9 and t = 10, jump of -9
        let jump: Real = 9.0;
        for ((t, a), b) in plain
            .time()
            .iter()
            .zip(plain.stress().unwrap())
            .zip(smoothed.stress().unwrap())
        {
            let distance = (t - 9.5).abs();
            let deviation = (a - b).abs();
            assert!(deviation <= jump / 2.0 + 1e-12);
            if distance > t_trans / 2.0 {
                assert!(deviation < 0.0067 * jump);
            }
        }

        // Midpoint symmetry: the two samples next to the join meet halfway
        let stress = smoothed.stress().unwrap();
        assert_relative_eq!(stress[9] + stress[10], 9.0, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_repeat() {
        let ramp = ramp_load(2.0, 0.0, 1.0).unwrap();
        assert!(repeat_load(&ramp, 0, None).is_err());

        let single = TimeSeriesRecord::from_strain(&[0.0], &[1.0]).unwrap();
        assert!(repeat_load(&single, 2, None).is_err());
    }
}
