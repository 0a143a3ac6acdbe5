use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::precision::{Real, ToReal};

lazy_static! {
    static ref ASSIGNMENT_PATTERN: Regex =
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(\S+)\s*$").unwrap();
}

/// Ordered mapping from parameter names to values.
///
/// Insertion order is kept so that values print and serialize in the order they
/// were given. Inserting a name twice replaces the earlier value in place,
/// which also holds when deserializing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(String, Real)>")]
pub struct ParameterValues(Vec<(String, Real)>);

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing an existing entry
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToReal) {
        let name = name.into();
        let value = value.to_real();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Builder-style variant of [`ParameterValues::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl ToReal) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Real> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Real)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hash map view used by expression substitution
    pub fn to_lookup(&self) -> HashMap<String, Real> {
        self.0.iter().cloned().collect()
    }
}

impl<K: Into<String>, V: ToReal> FromIterator<(K, V)> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = ParameterValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

impl<K: Into<String>, V: ToReal, const N: usize> From<[(K, V); N]> for ParameterValues {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<Vec<(String, Real)>> for ParameterValues {
    fn from(pairs: Vec<(String, Real)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl Display for ParameterValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.0.iter().map(|(n, v)| format!("{n} = {v}")).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

/// A single `name=value` assignment as given on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAssignment {
    pub name: String,
    pub value: Real,
}

impl FromStr for ParameterAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = ASSIGNMENT_PATTERN
            .captures(s)
            .ok_or_else(|| format!("Invalid assignment '{s}'. Expected name=value"))?;

        let name = captures
            .get(1)
            .ok_or("Missing parameter name")?
            .as_str()
            .to_string();
        let value = captures
            .get(2)
            .ok_or("Missing parameter value")?
            .as_str()
            .parse::<Real>()
            .map_err(|_| format!("Invalid value for parameter '{name}'"))?;

        Ok(ParameterAssignment { name, value })
    }
}

impl FromIterator<ParameterAssignment> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = ParameterAssignment>>(iter: I) -> Self {
        iter.into_iter().map(|a| (a.name, a.value)).collect()
    }
}
