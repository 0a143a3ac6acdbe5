//! Rheos
//!
//! Viscoelastic model definition, evaluation and rheology data handling:
//! - Defining model classes from symbolic moduli G(t), J(t), G'(ω) and G''(ω)
//! - Binding parameter values and freezing parameters into reduced classes
//! - Evaluating moduli, including Mittag-Leffler functions and numerical
//!   inverse Laplace transforms
//! - Time and frequency data records with arithmetic and a provenance log
//! - Load pattern generators and Boltzmann superposition for prediction

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::data::error::*;
    pub use crate::data::freq::*;
    pub use crate::data::kind::*;
    pub use crate::data::log::*;
    pub use crate::data::time::*;
    pub use crate::expr::ast::{Expr, Function, Variable};
    pub use crate::expr::error::ExpressionError;
    pub use crate::expr::parse::parse_expression;
    pub use crate::io::*;
    pub use crate::kernel::numeric::*;
    pub use crate::load::grid::*;
    pub use crate::load::patterns::*;
    pub use crate::load::repeat::*;
    pub use crate::model::catalog::*;
    pub use crate::model::class::*;
    pub use crate::model::compiler::{evaluate_trial, positional_values};
    pub use crate::model::constraint::Constraint;
    pub use crate::model::error::*;
    pub use crate::model::instance::*;
    pub use crate::model::modulus::*;
    pub use crate::model::values::*;
    pub use crate::objective::fit::*;
    pub use crate::objective::loss::*;
    pub use crate::precision::{Real, ToReal};
    pub use crate::predict::*;
}

/// Floating point type used throughout the crate
pub mod precision;

/// Expression trees for moduli and constraints
pub mod expr {
    pub use crate::expr::ast::*;

    /// Tree types and display
    pub mod ast;
    /// Error types for parsing and checking expressions
    pub mod error;
    /// Evaluation of trees
    pub mod eval;
    /// Parsing from infix strings
    pub mod parse;
    /// Parameter substitution and constant folding
    pub mod substitute;
}

/// Special functions and numerical transforms
pub mod kernel {
    pub use crate::kernel::numeric::*;

    pub mod laplace;
    pub(crate) mod mittag_leffler;
    pub mod numeric;
}

/// Model classes, binding and the standard catalog
pub mod model {
    pub use crate::model::catalog::{catalog, lookup};
    pub use crate::model::class::*;
    pub use crate::model::instance::*;
    pub use crate::model::modulus::*;

    pub mod catalog;
    pub mod class;
    pub mod compiler;
    pub mod constraint;
    pub mod error;
    pub mod instance;
    pub mod modulus;
    pub mod values;
}

/// Time and frequency records with provenance
pub mod data {
    pub mod error;
    pub mod freq;
    pub mod kind;
    pub mod log;
    pub mod time;
}

/// Loading histories and evaluation grids
pub mod load {
    pub mod grid;
    pub mod patterns;
    pub mod repeat;
}

/// Model predictions for measured loading histories
pub mod predict;

/// Costs for parameter estimation
pub mod objective {
    pub use crate::objective::fit::*;
    pub use crate::objective::loss::*;

    pub mod fit;
    pub mod loss;
}

/// Reading and writing JSON files
pub mod io;

/// Tables for the command line
pub mod info;
