//! Parameter constraints
//!
//! A constraint is a conjunction of comparisons between parameter expressions,
//! written as `a > b; a <= 1` or `a > b && a <= 1`. Constraints are never
//! evaluated automatically when binding; callers such as a fitting objective
//! ask [`Constraint::holds`] explicitly.

use std::fmt::{self, Display};

use lazy_static::lazy_static;
use regex::Regex;

use crate::expr::ast::Expr;
use crate::expr::parse::parse_expression;
use crate::kernel::numeric::NumericKernel;
use crate::precision::Real;

use super::error::ModelError;
use super::values::ParameterValues;

lazy_static! {
    static ref CLAUSE_PATTERN: Regex = Regex::new(r"^(.+?)(<=|>=|==|!=|<|>)(.+)$").unwrap();
    static ref SEPARATOR_PATTERN: Regex = Regex::new(r";|&&").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl Comparison {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Comparison::Less),
            "<=" => Some(Comparison::LessEqual),
            ">" => Some(Comparison::Greater),
            ">=" => Some(Comparison::GreaterEqual),
            "==" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
        }
    }

    /// NaN operands compare false, including for `!=`
    pub fn compare(&self, lhs: Real, rhs: Real) -> bool {
        if lhs.is_nan() || rhs.is_nan() {
            return false;
        }
        match self {
            Comparison::Less => lhs < rhs,
            Comparison::LessEqual => lhs <= rhs,
            Comparison::Greater => lhs > rhs,
            Comparison::GreaterEqual => lhs >= rhs,
            Comparison::Equal => lhs == rhs,
            Comparison::NotEqual => lhs != rhs,
        }
    }
}

/// A single comparison between two parameter expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub lhs: Expr,
    pub op: Comparison,
    pub rhs: Expr,
}

impl Clause {
    fn holds(&self, values: &ParameterValues, kernel: &dyn NumericKernel) -> bool {
        let lookup = values.to_lookup();
        let lhs = self.lhs.substitute(&lookup);
        let rhs = self.rhs.substitute(&lookup);
        self.op
            .compare(lhs.eval_closed(kernel), rhs.eval_closed(kernel))
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

/// Conjunction of clauses; the empty conjunction always holds
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Constraint {
    clauses: Vec<Clause>,
}

impl Constraint {
    pub fn always() -> Self {
        Self::default()
    }

    /// Parses a constraint over the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Constraint`] if a clause has no comparison, refers
    /// to a variable or uses an unknown symbol.
    pub fn parse(source: &str, parameters: &[String]) -> Result<Self, ModelError> {
        let mut clauses = Vec::new();

        for part in SEPARATOR_PATTERN.split(source) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let invalid = |reason: String| ModelError::Constraint {
                clause: part.to_string(),
                reason,
            };

            let captures = CLAUSE_PATTERN
                .captures(part)
                .ok_or_else(|| invalid("expected a comparison".to_string()))?;

            let lhs = parse_expression(captures[1].trim(), parameters)
                .map_err(|e| invalid(e.to_string()))?;
            let op = Comparison::from_symbol(&captures[2])
                .ok_or_else(|| invalid(format!("unknown comparison '{}'", &captures[2])))?;
            let rhs = parse_expression(captures[3].trim(), parameters)
                .map_err(|e| invalid(e.to_string()))?;

            if !(lhs.variables().is_empty() && rhs.variables().is_empty()) {
                return Err(invalid("constraints may only refer to parameters".to_string()));
            }

            clauses.push(Clause { lhs, op, rhs });
        }

        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_trivial(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether every clause holds for the given values.
    ///
    /// A clause referring to a parameter without a value does not hold.
    pub fn holds(&self, values: &ParameterValues, kernel: &dyn NumericKernel) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.holds(values, kernel))
    }

    /// Fixes some parameters to constants, as done when freezing a model
    pub fn substitute(&self, values: &ParameterValues) -> Self {
        let lookup = values.to_lookup();
        let clauses = self
            .clauses
            .iter()
            .map(|clause| Clause {
                lhs: clause.lhs.substitute(&lookup),
                op: clause.op,
                rhs: clause.rhs.substitute(&lookup),
            })
            .collect();

        Self { clauses }
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "always");
        }
        let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", clauses.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::numeric::StandardKernel;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_and_check() {
        let kernel = StandardKernel::default();
        let constraint = Constraint::parse("a > b; a <= 1 && b >= 0", &params(&["a", "b"]))
            .expect("Failed to parse constraint");

        assert_eq!(constraint.clauses().len(), 3);
        assert_eq!(constraint.to_string(), "a > b; a <= 1; b >= 0");
        assert!(constraint.holds(&ParameterValues::from([("a", 0.5), ("b", 0.2)]), &kernel));
        assert!(!constraint.holds(&ParameterValues::from([("a", 0.1), ("b", 0.2)]), &kernel));
        assert!(!constraint.holds(&ParameterValues::from([("a", 0.5)]), &kernel));
    }

    #[test]
    fn test_rejects_variables_and_missing_comparison() {
        let parameters = params(&["k"]);

        assert!(matches!(
            Constraint::parse("k * t > 0", &parameters),
            Err(ModelError::Constraint { .. })
        ));
        assert!(matches!(
            Constraint::parse("k + 1", &parameters),
            Err(ModelError::Constraint { .. })
        ));
    }

    #[test]
    fn test_always_holds() {
        let kernel = StandardKernel::default();
        let constraint = Constraint::parse("  ", &[]).unwrap();

        assert!(constraint.is_trivial());
        assert!(constraint.holds(&ParameterValues::new(), &kernel));
        assert_eq!(constraint.to_string(), "always");
    }

    #[test]
    fn test_substitute_keeps_remaining_parameters() {
        let kernel = StandardKernel::default();
        let constraint = Constraint::parse("a > b", &params(&["a", "b"])).unwrap();

        let frozen = constraint.substitute(&ParameterValues::from([("b", 0.3)]));

        assert_eq!(frozen.to_string(), "a > 0.3");
        assert!(frozen.holds(&ParameterValues::from([("a", 0.4)]), &kernel));
    }
}
