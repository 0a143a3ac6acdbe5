//! Floating point precision used throughout the crate.
//!
//! Every numeric value handled by models, kernels and data containers is of type
//! [`Real`]. The precision is fixed per build: `f64` by default, `f32` when the
//! `f32` cargo feature is enabled. Values supplied in another precision are
//! converted on input through [`ToReal`], so arrays never end up mixed.

/// The floating point type used for every numeric conversion in this build.
#[cfg(not(feature = "f32"))]
pub type Real = f64;

/// The floating point type used for every numeric conversion in this build.
#[cfg(feature = "f32")]
pub type Real = f32;

/// Archimedes' constant in the build precision.
pub const PI: Real = std::f64::consts::PI as Real;

/// Euler's number in the build precision.
pub const E: Real = std::f64::consts::E as Real;

/// Conversion of a numeric input into the build precision.
pub trait ToReal: Copy {
    fn to_real(self) -> Real;
}

macro_rules! impl_to_real {
    ($($t:ty),*) => {
        $(
            impl ToReal for $t {
                #[inline]
                fn to_real(self) -> Real {
                    self as Real
                }
            }
        )*
    };
}

impl_to_real!(f32, f64, i32, i64, u32, u64, usize);

/// Coerces any sequence of numeric values into a vector of [`Real`].
///
/// # Arguments
///
/// * `values` - The values to convert
///
/// # Returns
///
/// A new vector holding the converted values in the original order.
pub fn coerce<T: ToReal>(values: impl IntoIterator<Item = T>) -> Vec<Real> {
    values.into_iter().map(ToReal::to_real).collect()
}

/// Widens a [`Real`] to `f64` for kernels that compute in double precision.
#[inline]
pub(crate) fn widen(x: Real) -> f64 {
    x as f64
}

/// Narrows an `f64` back to the build precision.
#[inline]
pub(crate) fn narrow(x: f64) -> Real {
    x as Real
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_mixed_inputs() {
        let from_f32 = coerce(vec![1.5_f32, 2.5_f32]);
        let from_int = coerce(0..3);

        assert_eq!(from_f32, vec![1.5, 2.5]);
        assert_eq!(from_int, vec![0.0, 1.0, 2.0]);
    }
}
