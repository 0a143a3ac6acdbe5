//! Time Series Records
//!
//! A [`TimeSeriesRecord`] holds a strictly increasing time array and, optionally,
//! stress and strain arrays of the same length. Records are immutable values:
//! arithmetic and extraction return new records whose provenance log records the
//! operation and copies the operands' logs.
//!
//! # Arithmetic
//!
//! `+`, `-`, unary `-` and scalar `*` are available through the standard
//! operator traits and return `Result`, since operands must share the same data
//! kind (other than time only) and identical time arrays:
//!
//! ```
//! use rheos::prelude::*;
//!
//! let a = TimeSeriesRecord::from_strain(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
//! let b = TimeSeriesRecord::from_strain(&[0.0, 1.0], &[1.0, 1.0]).unwrap();
//!
//! let sum = (&a + &b).unwrap();
//! assert_eq!(sum.strain(), Some(&[1.0, 2.0][..]));
//! ```

use std::ops::{Add, Mul, Neg, Sub};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::precision::{coerce, Real, ToReal};

use super::error::{DataError, TimelineMismatch};
use super::kind::TimeDataKind;
use super::log::{LogEntry, ProvenanceLog};

/// Stress and strain measurements over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSeries")]
pub struct TimeSeriesRecord {
    time: Vec<Real>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stress: Vec<Real>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    strain: Vec<Real>,
    log: ProvenanceLog,
}

/// Unvalidated form used when deserializing
#[derive(Deserialize)]
struct RawTimeSeries {
    time: Vec<Real>,
    #[serde(default)]
    stress: Vec<Real>,
    #[serde(default)]
    strain: Vec<Real>,
    #[serde(default)]
    log: ProvenanceLog,
}

impl TryFrom<RawTimeSeries> for TimeSeriesRecord {
    type Error = DataError;

    fn try_from(raw: RawTimeSeries) -> Result<Self, Self::Error> {
        TimeSeriesRecord::from_parts(raw.time, raw.stress, raw.strain, raw.log)
    }
}

impl TimeSeriesRecord {
    /// Creates a record from time, stress and strain arrays.
    ///
    /// Pass an empty slice for an absent stress or strain array.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DataConsistency`] if `time` is empty or not strictly
    /// increasing, or if a present array differs in length from `time`.
    pub fn new<T: ToReal>(time: &[T], stress: &[T], strain: &[T]) -> Result<Self, DataError> {
        let stress = coerce(stress.iter().copied());
        let strain = coerce(strain.iter().copied());
        let kind = TimeDataKind::from_presence(!stress.is_empty(), !strain.is_empty());
        let log = ProvenanceLog::started(LogEntry::new("create").detail("kind", kind));

        Self::from_parts(coerce(time.iter().copied()), stress, strain, log)
    }

    pub fn time_only<T: ToReal>(time: &[T]) -> Result<Self, DataError> {
        Self::new(time, &[], &[])
    }

    pub fn from_strain<T: ToReal>(time: &[T], strain: &[T]) -> Result<Self, DataError> {
        Self::new(time, &[], strain)
    }

    pub fn from_stress<T: ToReal>(time: &[T], stress: &[T]) -> Result<Self, DataError> {
        Self::new(time, stress, &[])
    }

    /// Validates arrays that are already in the build precision
    pub(crate) fn from_parts(
        time: Vec<Real>,
        stress: Vec<Real>,
        strain: Vec<Real>,
        log: ProvenanceLog,
    ) -> Result<Self, DataError> {
        if time.is_empty() {
            return Err(DataError::DataConsistency(
                "time array must not be empty".to_string(),
            ));
        }

        if let Some((i, _)) = time
            .iter()
            .tuple_windows()
            .find_position(|(a, b)| !(b > a))
        {
            return Err(DataError::DataConsistency(format!(
                "time must be strictly increasing, violated at index {}",
                i + 1
            )));
        }

        for (name, values) in [("stress", &stress), ("strain", &strain)] {
            if !values.is_empty() && values.len() != time.len() {
                return Err(DataError::DataConsistency(format!(
                    "{name} has {} values but time has {}",
                    values.len(),
                    time.len()
                )));
            }
        }

        Ok(Self {
            time,
            stress,
            strain,
            log,
        })
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn stress(&self) -> Option<&[Real]> {
        (!self.stress.is_empty()).then_some(self.stress.as_slice())
    }

    pub fn strain(&self) -> Option<&[Real]> {
        (!self.strain.is_empty()).then_some(self.strain.as_slice())
    }

    /// Data kind derived from which arrays are present
    pub fn kind(&self) -> TimeDataKind {
        TimeDataKind::from_presence(!self.stress.is_empty(), !self.strain.is_empty())
    }

    pub fn log(&self) -> &ProvenanceLog {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false, records hold at least one sample
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns a copy with an additional log entry
    pub fn with_log_entry(&self, entry: LogEntry) -> Self {
        Self {
            log: self.log.appended(entry),
            ..self.clone()
        }
    }

    /// Checks that two records can be combined element by element
    pub fn check_compatible(&self, other: &Self) -> Result<TimeDataKind, TimelineMismatch> {
        let (left, right) = (self.kind(), other.kind());
        if left != right {
            return Err(TimelineMismatch::Kind { left, right });
        }
        if left == TimeDataKind::TimeOnly {
            return Err(TimelineMismatch::TimeOnly);
        }
        if self.time.len() != other.time.len() {
            return Err(TimelineMismatch::Length {
                left: self.time.len(),
                right: other.time.len(),
            });
        }
        if let Some(index) = self
            .time
            .iter()
            .zip(other.time.iter())
            .position(|(a, b)| a != b)
        {
            return Err(TimelineMismatch::Values { index });
        }
        Ok(left)
    }

    /// Element-wise sum of two records with identical timelines
    pub fn try_add(&self, other: &Self) -> Result<Self, DataError> {
        self.combine(other, "add", |a, b| a + b)
    }

    /// Element-wise difference of two records with identical timelines
    pub fn try_sub(&self, other: &Self) -> Result<Self, DataError> {
        self.combine(other, "subtract", |a, b| a - b)
    }

    /// Negates stress and strain
    pub fn try_neg(&self) -> Result<Self, DataError> {
        self.map_values(LogEntry::new("negate"), |x| -x)
    }

    /// Multiplies stress and strain by a scalar
    pub fn scale(&self, factor: impl ToReal) -> Result<Self, DataError> {
        let factor = factor.to_real();
        self.map_values(LogEntry::new("scale").detail("factor", factor), |x| {
            x * factor
        })
    }

    /// Keeps only the arrays needed for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnavailableKind`] if the record lacks an array the
    /// requested kind needs.
    pub fn extract(&self, kind: TimeDataKind) -> Result<Self, DataError> {
        let available = self.kind();
        if !available.covers(kind) {
            return Err(DataError::UnavailableKind {
                requested: kind,
                available,
            });
        }

        Ok(Self {
            time: self.time.clone(),
            stress: if kind.has_stress() { self.stress.clone() } else { Vec::new() },
            strain: if kind.has_strain() { self.strain.clone() } else { Vec::new() },
            log: self
                .log
                .appended(LogEntry::new("extract").detail("kind", kind)),
        })
    }

    fn combine(
        &self,
        other: &Self,
        action: &str,
        op: impl Fn(Real, Real) -> Real,
    ) -> Result<Self, DataError> {
        self.check_compatible(other)?;

        let zip = |a: &[Real], b: &[Real]| -> Vec<Real> {
            a.iter().zip(b.iter()).map(|(x, y)| op(*x, *y)).collect()
        };

        Ok(Self {
            time: self.time.clone(),
            stress: zip(&self.stress, &other.stress),
            strain: zip(&self.strain, &other.strain),
            log: ProvenanceLog::combined(LogEntry::new(action), &[&self.log, &other.log]),
        })
    }

    fn map_values(&self, entry: LogEntry, op: impl Fn(Real) -> Real) -> Result<Self, DataError> {
        if self.kind() == TimeDataKind::TimeOnly {
            return Err(TimelineMismatch::TimeOnly.into());
        }

        Ok(Self {
            time: self.time.clone(),
            stress: self.stress.iter().map(|x| op(*x)).collect(),
            strain: self.strain.iter().map(|x| op(*x)).collect(),
            log: self.log.appended(entry),
        })
    }
}

impl Add for &TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn add(self, other: &TimeSeriesRecord) -> Self::Output {
        self.try_add(other)
    }
}

impl Add for TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn add(self, other: TimeSeriesRecord) -> Self::Output {
        self.try_add(&other)
    }
}

impl Sub for &TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn sub(self, other: &TimeSeriesRecord) -> Self::Output {
        self.try_sub(other)
    }
}

impl Sub for TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn sub(self, other: TimeSeriesRecord) -> Self::Output {
        self.try_sub(&other)
    }
}

impl Neg for &TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn neg(self) -> Self::Output {
        self.try_neg()
    }
}

impl Neg for TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn neg(self) -> Self::Output {
        self.try_neg()
    }
}

impl Mul<Real> for &TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn mul(self, factor: Real) -> Self::Output {
        self.scale(factor)
    }
}

impl Mul<Real> for TimeSeriesRecord {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn mul(self, factor: Real) -> Self::Output {
        self.scale(factor)
    }
}

impl Mul<&TimeSeriesRecord> for Real {
    type Output = Result<TimeSeriesRecord, DataError>;

    fn mul(self, record: &TimeSeriesRecord) -> Self::Output {
        record.scale(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_validation() {
        assert!(TimeSeriesRecord::time_only::<Real>(&[]).is_err());
        assert!(TimeSeriesRecord::time_only(&[0.0, 1.0, 1.0]).is_err());
        assert!(TimeSeriesRecord::from_strain(&[0.0, 1.0], &[1.0]).is_err());
        assert!(TimeSeriesRecord::time_only(&[0.0, Real::NAN]).is_err());

        let record = TimeSeriesRecord::new(&[0, 1, 2], &[3, 4, 5], &[]).unwrap();
        assert_eq!(record.kind(), TimeDataKind::StressOnly);
        assert_eq!(record.time(), &[0.0, 1.0, 2.0]);
        assert_eq!(record.strain(), None);
    }

    #[test]
    fn test_mismatched_timelines() {
        let a = TimeSeriesRecord::from_strain(&[0.0, 1.0], &[1.0, 2.0]).unwrap();
        let b = TimeSeriesRecord::from_strain(&[0.0, 1.5], &[1.0, 2.0]).unwrap();
        let c = TimeSeriesRecord::from_stress(&[0.0, 1.0], &[1.0, 2.0]).unwrap();
        let t = TimeSeriesRecord::time_only(&[0.0, 1.0]).unwrap();

        assert_eq!(
            (&a + &b).unwrap_err(),
            DataError::TimelineMismatch(TimelineMismatch::Values { index: 1 })
        );
        assert!(matches!(
            &a - &c,
            Err(DataError::TimelineMismatch(TimelineMismatch::Kind { .. }))
        ));
        assert_eq!(
            (&t + &t).unwrap_err(),
            DataError::TimelineMismatch(TimelineMismatch::TimeOnly)
        );
        assert!((-&t).is_err());
    }

    #[test]
    fn test_scale_and_negate() {
        let a = TimeSeriesRecord::new(&[0.0, 1.0], &[1.0, 2.0], &[0.5, 0.25]).unwrap();

        let scaled = (2.0 * &a).unwrap();
        let negated = (-&a).unwrap();

        assert_eq!(scaled.stress(), Some(&[2.0, 4.0][..]));
        assert_relative_eq!(negated.strain().unwrap()[1], -0.25);
        assert_eq!(scaled.log().last().unwrap().action, "scale");
        assert_eq!(a.log().len(), 1);
    }

    #[test]
    fn test_extract() {
        let a = TimeSeriesRecord::new(&[0.0, 1.0], &[1.0, 2.0], &[0.5, 0.25]).unwrap();

        let strain = a.extract(TimeDataKind::StrainOnly).unwrap();
        assert_eq!(strain.kind(), TimeDataKind::StrainOnly);

        assert_eq!(
            strain.extract(TimeDataKind::StressOnly).unwrap_err(),
            DataError::UnavailableKind {
                requested: TimeDataKind::StressOnly,
                available: TimeDataKind::StrainOnly,
            }
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let valid: TimeSeriesRecord =
            serde_json::from_str(r#"{"time": [0.0, 1.0], "strain": [0.0, 0.5]}"#).unwrap();
        assert_eq!(valid.kind(), TimeDataKind::StrainOnly);

        let invalid = serde_json::from_str::<TimeSeriesRecord>(r#"{"time": [1.0, 0.0]}"#);
        assert!(invalid.is_err());
    }
}
