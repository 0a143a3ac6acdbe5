//! Data kinds derived from which arrays a record holds.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// What a time series record contains besides its time array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDataKind {
    TimeOnly,
    StrainOnly,
    StressOnly,
    StrainAndStress,
}

impl TimeDataKind {
    pub(crate) fn from_presence(stress: bool, strain: bool) -> Self {
        match (stress, strain) {
            (false, false) => TimeDataKind::TimeOnly,
            (false, true) => TimeDataKind::StrainOnly,
            (true, false) => TimeDataKind::StressOnly,
            (true, true) => TimeDataKind::StrainAndStress,
        }
    }

    pub fn has_stress(&self) -> bool {
        matches!(self, TimeDataKind::StressOnly | TimeDataKind::StrainAndStress)
    }

    pub fn has_strain(&self) -> bool {
        matches!(self, TimeDataKind::StrainOnly | TimeDataKind::StrainAndStress)
    }

    /// Whether every array required by `other` is present in `self`
    pub fn covers(&self, other: TimeDataKind) -> bool {
        (!other.has_stress() || self.has_stress()) && (!other.has_strain() || self.has_strain())
    }
}

impl Display for TimeDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeDataKind::TimeOnly => "time_only",
            TimeDataKind::StrainOnly => "strain_only",
            TimeDataKind::StressOnly => "stress_only",
            TimeDataKind::StrainAndStress => "strain_and_stress",
        };
        write!(f, "{name}")
    }
}

/// What a frequency series record contains besides its frequency array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreqDataKind {
    FreqOnly,
    WithModulus,
}

impl Display for FreqDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreqDataKind::FreqOnly => write!(f, "freq_only"),
            FreqDataKind::WithModulus => write!(f, "with_modulus"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        assert!(TimeDataKind::StrainAndStress.covers(TimeDataKind::StressOnly));
        assert!(TimeDataKind::StrainOnly.covers(TimeDataKind::TimeOnly));
        assert!(!TimeDataKind::StrainOnly.covers(TimeDataKind::StressOnly));
    }
}
