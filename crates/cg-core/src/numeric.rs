use crate::{CgError, CgResult};

/// Floating point type used throughout the pipeline
pub type Real = f64;

/// Relative deviation `|a - b| / max(|a|, |b|)`, zero when both are zero.
pub fn relative_deviation(a: Real, b: Real) -> Real {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> CgResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CgError::NonFinite { what, value: v })
    }
}
