//! Real-argument Mittag-Leffler function
//!
//! ```text
//! E_{α,β}(z) = Σ_{k≥0} z^k / Γ(αk + β)
//! ```
//!
//! The power series is summed in log space while `|z|^(1/α)` is within the
//! configured radius. Beyond it the series cancels catastrophically and the
//! asymptotic expansion
//!
//! ```text
//! E_{α,β}(z) ≈ [z > 0] (1/α) z^((1-β)/α) exp(z^(1/α)) - Σ_{k=1}^{K} z^(-k) / Γ(β - αk)
//! ```
//!
//! is used instead, truncated at its smallest term. The two regimes meet with
//! an absolute error near `exp(-radius)`.

use statrs::function::gamma::ln_gamma;

use super::numeric::{gamma_f64, KernelSetup};

pub(crate) fn mittag_leffler(alpha: f64, beta: f64, z: f64, setup: &KernelSetup) -> f64 {
    if !(alpha.is_finite() && beta.is_finite()) || alpha <= 0.0 || z.is_nan() {
        return f64::NAN;
    }

    if alpha == 1.0 && beta == 1.0 {
        return z.exp();
    }

    let scale = z.abs().powf(1.0 / alpha);
    if scale <= setup.series_radius || alpha >= 2.0 {
        power_series(alpha, beta, z, scale, setup)
    } else {
        asymptotic(alpha, beta, z, scale, setup)
    }
}

/// Distance from a non-positive integer below which Γ is treated as infinite
const POLE_TOLERANCE: f64 = 1e-12;

/// Whether `x` is a pole of Γ up to rounding in `β - αk`
fn is_gamma_pole(x: f64) -> bool {
    x <= 0.5 && (x - x.round()).abs() < POLE_TOLERANCE
}

/// `1 / Γ(x)` as a sign and a natural logarithm, `None` at the poles of Γ
fn reciprocal_gamma(x: f64) -> Option<(f64, f64)> {
    if is_gamma_pole(x) {
        return None;
    }
    if x > 0.0 {
        return Some((1.0, -ln_gamma(x)));
    }
    let g = gamma_f64(x);
    Some((g.signum(), -g.abs().ln()))
}

fn power_series(alpha: f64, beta: f64, z: f64, scale: f64, setup: &KernelSetup) -> f64 {
    if z == 0.0 {
        return if is_gamma_pole(beta) {
            0.0
        } else {
            gamma_f64(beta).recip()
        };
    }

    let ln_z = z.abs().ln();
    let negative = z < 0.0;
    let mut sum = 0.0;

    for k in 0..setup.max_terms {
        let Some((sign, ln_rgamma)) = reciprocal_gamma(alpha * k as f64 + beta) else {
            continue;
        };

        let parity = if negative && k % 2 == 1 { -1.0 } else { 1.0 };
        let term = parity * sign * (k as f64 * ln_z + ln_rgamma).exp();
        sum += term;

        // Terms only shrink monotonically once αk has passed |z|^(1/α)
        if alpha * k as f64 > scale && term.abs() <= setup.tolerance * sum.abs() {
            break;
        }
    }

    sum
}

fn asymptotic(alpha: f64, beta: f64, z: f64, scale: f64, setup: &KernelSetup) -> f64 {
    let mut sum = 0.0;

    for k in 1..setup.max_terms {
        // The envelope of the terms is smallest where αk reaches |z|^(1/α)
        if alpha * k as f64 > scale {
            break;
        }

        let Some((sign, ln_rgamma)) = reciprocal_gamma(beta - alpha * k as f64) else {
            continue;
        };

        let magnitude = (ln_rgamma - k as f64 * z.abs().ln()).exp();

        let parity = if z < 0.0 && k % 2 == 1 { -1.0 } else { 1.0 };
        sum -= parity * sign * magnitude;

        // An underflowed term says nothing about convergence
        if magnitude > 0.0 && magnitude <= setup.tolerance * sum.abs() {
            break;
        }
    }

    if z > 0.0 {
        let root = z.powf(1.0 / alpha);
        sum += z.powf((1.0 - beta) / alpha) * root.exp() / alpha;
    }

    sum
}
