//! Numeric Kernel
//!
//! Special functions needed by fractional and Laplace-domain models sit behind
//! the [`NumericKernel`] trait. The expression interpreter only ever calls the
//! kernel through this trait, so a more precise implementation can be swapped
//! in without touching model definitions.
//!
//! [`StandardKernel`] is the built-in implementation:
//!
//! - Gamma via `statrs` (exact factorials for positive integers)
//! - Mittag-Leffler via power series near the origin and the asymptotic
//!   expansion beyond it
//! - Inverse Laplace via the Gaver-Stehfest algorithm on the real axis

use std::fmt::Debug;
use std::sync::Arc;

use derive_builder::Builder;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use statrs::function::factorial::factorial;
use statrs::function::gamma::gamma;

use crate::precision::{narrow, widen, Real};

use super::laplace::{stehfest_coefficients, stehfest_inverse};
use super::mittag_leffler::mittag_leffler;

lazy_static! {
    /// Kernel shared by every model instance that is bound without an explicit kernel
    pub static ref DEFAULT_KERNEL: Arc<dyn NumericKernel> = Arc::new(StandardKernel::default());
}

/// Special functions required to evaluate model expressions.
///
/// Implementations must be pure: the same inputs always give the same output
/// and no call may observe another.
pub trait NumericKernel: Send + Sync + Debug {
    /// Gamma function Γ(x)
    fn gamma(&self, x: Real) -> Real;

    /// Two-parameter Mittag-Leffler function E_{α,β}(z)
    fn mittag_leffler(&self, alpha: Real, beta: Real, z: Real) -> Real;

    /// Inverts the Laplace-domain function `image` at time `t`
    fn inverse_laplace(&self, image: &dyn Fn(Real) -> Real, t: Real) -> Real;

    /// Inverts the Laplace-domain function `image` at every time in `times`
    fn inverse_laplace_many(&self, image: &dyn Fn(Real) -> Real, times: &[Real]) -> Vec<Real> {
        times
            .iter()
            .map(|&t| self.inverse_laplace(image, t))
            .collect()
    }
}

/// Tuning of the built-in numeric kernel.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct KernelSetup {
    /// Number of Gaver-Stehfest terms, must be even
    #[builder(default = "14")]
    pub stehfest_terms: usize,
    /// Switch point between series and asymptotic Mittag-Leffler evaluation,
    /// measured on the `|z|^(1/α)` scale
    #[builder(default = "16.0")]
    pub series_radius: f64,
    /// Relative size at which series terms are considered negligible
    #[builder(default = "1e-15")]
    pub tolerance: f64,
    /// Upper bound on series terms
    #[builder(default = "2000")]
    pub max_terms: usize,
}

impl KernelSetupBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(n) = self.stehfest_terms {
            if n == 0 || n % 2 != 0 {
                return Err(format!(
                    "Stehfest terms must be a positive even number, got {n}"
                ));
            }
            // Coefficients lose all precision in double arithmetic beyond this
            if n > 32 {
                return Err(format!("Stehfest terms must not exceed 32, got {n}"));
            }
        }
        if let Some(radius) = self.series_radius {
            if radius.is_nan() || radius <= 0.0 {
                return Err("Series radius must be positive".to_string());
            }
        }
        if let Some(max_terms) = self.max_terms {
            if max_terms == 0 {
                return Err("Term cap must be positive".to_string());
            }
        }
        Ok(())
    }
}

impl Default for KernelSetup {
    fn default() -> Self {
        Self {
            stehfest_terms: 14,
            series_radius: 16.0,
            tolerance: 1e-15,
            max_terms: 2000,
        }
    }
}

/// Built-in [`NumericKernel`] computing in double precision.
#[derive(Debug, Clone)]
pub struct StandardKernel {
    setup: KernelSetup,
    coefficients: Vec<f64>,
}

impl StandardKernel {
    pub fn new(setup: KernelSetup) -> Self {
        let coefficients = stehfest_coefficients(setup.stehfest_terms);
        Self {
            setup,
            coefficients,
        }
    }

    pub fn setup(&self) -> &KernelSetup {
        &self.setup
    }
}

impl Default for StandardKernel {
    fn default() -> Self {
        Self::new(KernelSetup::default())
    }
}

impl NumericKernel for StandardKernel {
    fn gamma(&self, x: Real) -> Real {
        narrow(gamma_f64(widen(x)))
    }

    fn mittag_leffler(&self, alpha: Real, beta: Real, z: Real) -> Real {
        narrow(mittag_leffler(
            widen(alpha),
            widen(beta),
            widen(z),
            &self.setup,
        ))
    }

    fn inverse_laplace(&self, image: &dyn Fn(Real) -> Real, t: Real) -> Real {
        let image = |s: f64| widen(image(narrow(s)));
        narrow(stehfest_inverse(&image, widen(t), &self.coefficients))
    }
}

/// Gamma function with exact results at positive integers.
///
/// Non-positive integers are poles and yield NaN.
pub(crate) fn gamma_f64(x: f64) -> f64 {
    if x.fract() == 0.0 {
        if x <= 0.0 {
            return f64::NAN;
        }
        if x <= 171.0 {
            return factorial(x as u64 - 1);
        }
    }
    gamma(x)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_gamma_values() {
        let kernel = StandardKernel::default();

        assert_eq!(kernel.gamma(1.0), 1.0);
        assert_eq!(kernel.gamma(5.0), 24.0);
        assert_relative_eq!(
            kernel.gamma(0.5),
            crate::precision::PI.sqrt(),
            max_relative = 1e-6
        );
        assert!(kernel.gamma(0.0).is_nan());
        assert!(kernel.gamma(-2.0).is_nan());
    }

    #[test]
    fn test_setup_rejects_odd_stehfest_terms() {
        let result = KernelSetupBuilder::default().stehfest_terms(13).build();
        assert!(result.is_err());

        let setup = KernelSetupBuilder::default()
            .stehfest_terms(16)
            .build()
            .expect("Failed to build kernel setup");
        assert_eq!(setup.stehfest_terms, 16);
        assert_eq!(setup.max_terms, 2000);
    }

    #[test]
    fn test_inverse_laplace_many_matches_pointwise() {
        let kernel = StandardKernel::default();
        let image = |s: Real| 1.0 / (s * s);
        let times = [0.5, 1.0, 2.0];

        let many = kernel.inverse_laplace_many(&image, &times);

        for (value, t) in many.iter().zip(times.iter()) {
            assert_eq!(*value, kernel.inverse_laplace(&image, *t));
            assert_relative_eq!(*value, *t, max_relative = 1e-4);
        }
    }
}
