//! Evaluation grids for time and frequency.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::data::error::DataError;
use crate::data::freq::FrequencySeriesRecord;
use crate::data::log::{LogEntry, ProvenanceLog};
use crate::data::time::TimeSeriesRecord;
use crate::precision::Real;

/// Upper bound on the number of points a time grid may hold
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Uniformly spaced time points from `t_start` to `t_end` inclusive
///
/// # Examples
///
/// ```
/// use rheos::prelude::TimeGridBuilder;
///
/// let grid = TimeGridBuilder::default().t_end(2.0).stepsize(0.5).build().unwrap();
/// assert_eq!(grid.points().unwrap(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct TimeGrid {
    #[builder(default = "0.0")]
    pub t_start: Real,
    pub t_end: Real,
    #[builder(default = "1.0")]
    pub stepsize: Real,
}

impl TimeGrid {
    pub fn new(t_start: Real, t_end: Real, stepsize: Real) -> Self {
        Self {
            t_start,
            t_end,
            stepsize,
        }
    }

    /// Generates the grid points.
    ///
    /// The end point is included when it lies on the grid up to rounding.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidLoad`] for a non-positive step, a non-finite
    /// bound, an end before the start or more than [`MAX_GRID_POINTS`] points.
    pub fn points(&self) -> Result<Vec<Real>, DataError> {
        if !(self.t_start.is_finite() && self.t_end.is_finite()) {
            return Err(DataError::InvalidLoad(format!(
                "time bounds must be finite, got {}..{}",
                self.t_start, self.t_end
            )));
        }
        if !(self.stepsize > 0.0 && self.stepsize.is_finite()) {
            return Err(DataError::InvalidLoad(format!(
                "stepsize must be positive, got {}",
                self.stepsize
            )));
        }
        if !(self.t_end >= self.t_start) {
            return Err(DataError::InvalidLoad(format!(
                "end time {} lies before start time {}",
                self.t_end, self.t_start
            )));
        }

        let span = ((self.t_end - self.t_start) / self.stepsize + 1e-6).floor();
        if !(span < MAX_GRID_POINTS as Real) {
            return Err(DataError::InvalidLoad(format!(
                "grid from {} to {} with step {} exceeds {} points",
                self.t_start, self.t_end, self.stepsize, MAX_GRID_POINTS
            )));
        }
        let steps = span as usize;

        Ok((0..=steps)
            .map(|i| self.t_start + i as Real * self.stepsize)
            .collect())
    }

    /// A time-only record over the grid
    pub fn to_record(&self) -> Result<TimeSeriesRecord, DataError> {
        let log = ProvenanceLog::started(
            LogEntry::new("time_grid")
                .detail("t_start", self.t_start)
                .detail("t_end", self.t_end)
                .detail("stepsize", self.stepsize),
        );
        TimeSeriesRecord::from_parts(self.points()?, Vec::new(), Vec::new(), log)
    }
}

/// Angular frequencies from `start` to `end`, linearly or logarithmically spaced
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct FrequencyGrid {
    pub start: Real,
    pub end: Real,
    #[builder(default = "50")]
    pub points: usize,
    #[builder(default = "false")]
    pub logarithmic: bool,
}

impl FrequencyGrid {
    /// Generates the grid points, both ends included.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidLoad`] if `end <= start`, if fewer than two
    /// points are requested or if a logarithmic grid does not start above zero.
    pub fn frequencies(&self) -> Result<Vec<Real>, DataError> {
        if self.points < 2 {
            return Err(DataError::InvalidLoad(
                "a frequency grid needs at least two points".to_string(),
            ));
        }
        if !(self.end > self.start) {
            return Err(DataError::InvalidLoad(format!(
                "frequency range {}..{} is empty",
                self.start, self.end
            )));
        }
        if self.logarithmic && self.start <= 0.0 {
            return Err(DataError::InvalidLoad(
                "a logarithmic frequency grid must start above zero".to_string(),
            ));
        }

        let last = (self.points - 1) as Real;
        let frequencies = if self.logarithmic {
            let (lo, hi) = (self.start.log10(), self.end.log10());
            (0..self.points)
                .map(|i| (10.0 as Real).powf(lo + (hi - lo) * i as Real / last))
                .collect()
        } else {
            (0..self.points)
                .map(|i| self.start + (self.end - self.start) * i as Real / last)
                .collect()
        };

        Ok(frequencies)
    }

    /// A frequency-only record over the grid
    pub fn to_record(&self) -> Result<FrequencySeriesRecord, DataError> {
        let log = ProvenanceLog::started(
            LogEntry::new("frequency_grid")
                .detail("start", self.start)
                .detail("end", self.end)
                .detail("points", self.points)
                .detail("logarithmic", self.logarithmic),
        );
        FrequencySeriesRecord::from_parts(self.frequencies()?, Vec::new(), Vec::new(), log)
    }
}
