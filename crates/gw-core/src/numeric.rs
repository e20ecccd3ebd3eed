use crate::GwError;

/// Scalar type for heads, conductivities and coefficients.
pub type Real = f64;

/// Days per year used to turn annual pumping volumes into daily fluxes.
pub const DAYS_PER_YEAR: Real = 365.0;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GwError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GwError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("not finite"));
    }

    #[test]
    fn ensure_finite_passes_through() {
        assert_eq!(ensure_finite(-4.0e5, "pumping").unwrap(), -4.0e5);
    }
}
