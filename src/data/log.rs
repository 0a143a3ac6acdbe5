//! Provenance Log
//!
//! Every record carries an append-only log of how it was produced. Entries
//! name the action, hold structured details and, for operations that combine
//! records, a copy of each operand's log. Logs are values: combining two
//! records copies both logs, so no record ever observes changes to another.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single step in the history of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<ProvenanceLog>,
}

impl LogEntry {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            details: BTreeMap::new(),
            operands: Vec::new(),
        }
    }

    /// Adds a detail, serializing the value to JSON
    pub fn detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.details.insert(key.into(), value);
        self
    }

    pub fn operand(mut self, log: &ProvenanceLog) -> Self {
        self.operands.push(log.clone());
        self
    }
}

/// Ordered history of a record, oldest entry first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvenanceLog {
    entries: Vec<LogEntry>,
}

impl ProvenanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a log with a single entry
    pub fn started(entry: LogEntry) -> Self {
        Self {
            entries: vec![entry],
        }
    }

    /// Returns a copy of this log with `entry` appended
    pub fn appended(&self, entry: LogEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// Starts a new log for a record derived from several operands.
    ///
    /// The operands' logs are copied into the single entry, so the result is
    /// independent of the operands.
    pub fn combined(entry: LogEntry, operands: &[&ProvenanceLog]) -> Self {
        let entry = operands
            .iter()
            .fold(entry, |entry, log| entry.operand(log));
        Self::started(entry)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Action names of every entry, with operand histories expanded depth first
    pub fn flatten(&self) -> Vec<String> {
        let mut actions = Vec::new();
        for entry in &self.entries {
            for operand in &entry.operands {
                actions.extend(operand.flatten());
            }
            actions.push(entry.action.clone());
        }
        actions
    }
}

impl Display for ProvenanceLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flatten().join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appended_leaves_original_untouched() {
        let log = ProvenanceLog::started(LogEntry::new("step_load").detail("t_on", 5.0));

        let extended = log.appended(LogEntry::new("scale").detail("factor", 2.0));

        assert_eq!(log.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.entries()[1].details["factor"], serde_json::json!(2.0));
    }

    #[test]
    fn test_combined_copies_operands() {
        let a = ProvenanceLog::started(LogEntry::new("ramp_load"));
        let b = ProvenanceLog::started(LogEntry::new("step_load"));

        let sum = ProvenanceLog::combined(LogEntry::new("add"), &[&a, &b]);

        assert_eq!(sum.len(), 1);
        assert_eq!(sum.entries()[0].operands, vec![a, b]);
        assert_eq!(sum.to_string(), "ramp_load -> step_load -> add");
    }
}
