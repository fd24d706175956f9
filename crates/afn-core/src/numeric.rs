use crate::AfnError;

/// Absolute and relative comparison tolerances.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Pass `v` through, or report it as `what` when it is NaN or infinite.
pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, AfnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AfnError::NonFinite { what, value: v })
    }
}

/// Sign of a pressure drop as used by the flow laws: zero counts as positive.
#[inline]
pub fn flow_sign(v: f64) -> f64 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        assert!(format!("{err}").contains("Non-finite"));
    }

    #[test]
    fn zero_drop_counts_as_forward() {
        assert_eq!(flow_sign(0.0), 1.0);
        assert_eq!(flow_sign(-1e-30), -1.0);
    }
}
