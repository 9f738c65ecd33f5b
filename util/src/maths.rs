//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The unnormalised sinc function, `sin(x)/x`.
///
/// The singularity at zero is removable, `sin(x)/x -> 1` as `x -> 0`, so
/// inputs inside a small band around zero evaluate to exactly one rather
/// than dividing by zero. At the band edge the true value differs from one
/// by less than 1e-18, well below f64 resolution.
pub fn sinc<T>(x: T) -> T
where
    T: Float
{
    if x.abs() < T::from(1e-9).unwrap() {
        T::one()
    }
    else {
        x.sin() / x
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sinc_limit() {
        // The removable singularity must evaluate to one, not NaN
        assert_eq!(sinc(0f64), 1f64);
        assert!(!sinc(0f64).is_nan());

        // Inside the band
        assert_eq!(sinc(1e-12f64), 1f64);
        assert_eq!(sinc(-1e-12f64), 1f64);
    }

    #[test]
    fn test_sinc_values() {
        const PI: f64 = std::f64::consts::PI;

        assert!((sinc(PI / 2f64) - 2f64 / PI).abs() < 1e-12);
        assert!(sinc(PI).abs() < 1e-12);

        // Even function
        assert_eq!(sinc(0.5f64), sinc(-0.5f64));

        // Continuous across the band edge
        assert!((sinc(1e-9f64) - 1f64).abs() < 1e-15);
        assert!((sinc(1.1e-9f64) - 1f64).abs() < 1e-15);
    }
}
