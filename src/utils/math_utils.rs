//! Small numerical helpers shared by the matrix engine.

/// Absolute tolerance used for all "is zero" decisions on matrix coefficients.
pub const EPSILON: f64 = 1e-9;

#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

#[must_use]
pub const fn f64_to_usize(value: f64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let newval = value as usize;
    newval
}

/// Returns `true` if `value` is zero within [`EPSILON`].
#[must_use]
pub fn is_zero(value: f64) -> bool {
    value.abs() <= EPSILON
}

/// Compare two values with a relative tolerance of `1e-9` (and an absolute floor of [`EPSILON`]).
///
/// Two infinite values of the same sign are considered close.
#[must_use]
pub fn is_close(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= f64::max(1e-9 * f64::max(a.abs(), b.abs()), EPSILON)
}

/// Returns `count` evenly spaced values from `min` to `max` (both included).
///
/// A single value is placed at `min`; `count == 0` returns an empty vector.
#[must_use]
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / usize_to_f64(count - 1);
            (0..count).map(|i| min + usize_to_f64(i) * step).collect()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn conversions() {
        assert_eq!(usize_to_f64(3), 3.0);
        assert_eq!(f64_to_usize(3.7), 3);
        assert_eq!(f64_to_usize(-1.0), 0);
    }
    #[test]
    fn zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(-1e-10));
        assert!(!is_zero(1e-8));
    }
    #[test]
    fn close() {
        assert!(is_close(1.0, 1.0 + 1e-12));
        assert!(is_close(1e6, 1e6 + 1e-4));
        assert!(!is_close(1.0, 1.001));
        assert!(is_close(f64::INFINITY, f64::INFINITY));
        assert!(!is_close(f64::INFINITY, f64::NEG_INFINITY));
        assert!(!is_close(f64::INFINITY, 1e300));
    }
    #[test]
    fn linspace_values() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(-1.0, 1.0, 1), vec![-1.0]);
        assert_eq!(linspace(-1.0, 1.0, 3), vec![-1.0, 0.0, 1.0]);
        assert_eq!(linspace(0.0, 1.0, 5).len(), 5);
    }
}
