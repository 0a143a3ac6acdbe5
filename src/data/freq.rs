use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::precision::{coerce, Real, ToReal};

use super::error::DataError;
use super::kind::FreqDataKind;
use super::log::{LogEntry, ProvenanceLog};

/// Storage and loss moduli over angular frequency.
///
/// Both moduli are present or both are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrequencySeries")]
pub struct FrequencySeriesRecord {
    frequency: Vec<Real>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    storage_modulus: Vec<Real>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    loss_modulus: Vec<Real>,
    log: ProvenanceLog,
}

#[derive(Deserialize)]
struct RawFrequencySeries {
    frequency: Vec<Real>,
    #[serde(default)]
    storage_modulus: Vec<Real>,
    #[serde(default)]
    loss_modulus: Vec<Real>,
    #[serde(default)]
    log: ProvenanceLog,
}

impl TryFrom<RawFrequencySeries> for FrequencySeriesRecord {
    type Error = DataError;

    fn try_from(raw: RawFrequencySeries) -> Result<Self, Self::Error> {
        FrequencySeriesRecord::from_parts(
            raw.frequency,
            raw.storage_modulus,
            raw.loss_modulus,
            raw.log,
        )
    }
}

impl FrequencySeriesRecord {
    /// Creates a record from frequency, storage and loss arrays.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DataConsistency`] if the frequency array is empty or
    /// not strictly increasing, if only one of the moduli is given, or if the
    /// moduli differ in length from the frequencies.
    pub fn new<T: ToReal>(
        frequency: &[T],
        storage_modulus: &[T],
        loss_modulus: &[T],
    ) -> Result<Self, DataError> {
        let storage = coerce(storage_modulus.iter().copied());
        let loss = coerce(loss_modulus.iter().copied());
        let kind = if storage.is_empty() && loss.is_empty() {
            FreqDataKind::FreqOnly
        } else {
            FreqDataKind::WithModulus
        };
        let log = ProvenanceLog::started(LogEntry::new("create").detail("kind", kind));

        Self::from_parts(coerce(frequency.iter().copied()), storage, loss, log)
    }

    pub fn freq_only<T: ToReal>(frequency: &[T]) -> Result<Self, DataError> {
        Self::new(frequency, &[], &[])
    }

    pub(crate) fn from_parts(
        frequency: Vec<Real>,
        storage_modulus: Vec<Real>,
        loss_modulus: Vec<Real>,
        log: ProvenanceLog,
    ) -> Result<Self, DataError> {
        if frequency.is_empty() {
            return Err(DataError::DataConsistency(
                "frequency array must not be empty".to_string(),
            ));
        }

        if let Some((i, _)) = frequency
            .iter()
            .tuple_windows()
            .find_position(|(a, b)| !(b > a))
        {
            return Err(DataError::DataConsistency(format!(
                "frequency must be strictly increasing, violated at index {}",
                i + 1
            )));
        }

        if storage_modulus.is_empty() != loss_modulus.is_empty() {
            return Err(DataError::DataConsistency(
                "storage and loss modulus must be given together".to_string(),
            ));
        }

        if !storage_modulus.is_empty()
            && (storage_modulus.len() != frequency.len() || loss_modulus.len() != frequency.len())
        {
            return Err(DataError::DataConsistency(format!(
                "moduli have {} and {} values but frequency has {}",
                storage_modulus.len(),
                loss_modulus.len(),
                frequency.len()
            )));
        }

        Ok(Self {
            frequency,
            storage_modulus,
            loss_modulus,
            log,
        })
    }

    pub fn frequency(&self) -> &[Real] {
        &self.frequency
    }

    pub fn storage_modulus(&self) -> Option<&[Real]> {
        (!self.storage_modulus.is_empty()).then_some(self.storage_modulus.as_slice())
    }

    pub fn loss_modulus(&self) -> Option<&[Real]> {
        (!self.loss_modulus.is_empty()).then_some(self.loss_modulus.as_slice())
    }

    pub fn kind(&self) -> FreqDataKind {
        if self.storage_modulus.is_empty() {
            FreqDataKind::FreqOnly
        } else {
            FreqDataKind::WithModulus
        }
    }

    pub fn log(&self) -> &ProvenanceLog {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Returns a copy holding only the frequency array
    pub fn frequencies_only(&self) -> Self {
        Self {
            frequency: self.frequency.clone(),
            storage_modulus: Vec::new(),
            loss_modulus: Vec::new(),
            log: self.log.appended(
                LogEntry::new("extract").detail("kind", FreqDataKind::FreqOnly),
            ),
        }
    }
}
