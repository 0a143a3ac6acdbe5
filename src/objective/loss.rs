//! Loss functions
//!
//! Reduce a residual vector `predicted - observed` to a single cost. The empty
//! residual vector has zero cost under every loss.

use std::fmt::{self, Display};
use std::str::FromStr;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::precision::Real;

/// Aggregation applied to the residuals of a fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossFunction {
    /// Sum of squared residuals
    SSE,
    /// Mean of squared residuals
    #[default]
    MSE,
    /// Square root of the mean squared residual, in the unit of the data
    RMSE,
    /// Mean absolute residual, less sensitive to outliers than the squared losses
    MAE,
}

impl LossFunction {
    pub const ALL: [LossFunction; 4] = [
        LossFunction::SSE,
        LossFunction::MSE,
        LossFunction::RMSE,
        LossFunction::MAE,
    ];

    pub fn cost(&self, residuals: &Array1<Real>) -> Real {
        if residuals.is_empty() {
            return 0.0;
        }
        let n = residuals.len() as Real;

        match self {
            LossFunction::SSE => residuals.mapv(|r| r * r).sum(),
            LossFunction::MSE => residuals.mapv(|r| r * r).sum() / n,
            LossFunction::RMSE => (residuals.mapv(|r| r * r).sum() / n).sqrt(),
            LossFunction::MAE => residuals.mapv(Real::abs).sum() / n,
        }
    }
}

impl Display for LossFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LossFunction::SSE => "SSE",
            LossFunction::MSE => "MSE",
            LossFunction::RMSE => "RMSE",
            LossFunction::MAE => "MAE",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LossFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LossFunction::ALL
            .into_iter()
            .find(|loss| loss.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown loss function '{}'", s))
    }
}
