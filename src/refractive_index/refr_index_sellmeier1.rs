#![warn(missing_docs)]
//! Sellmeier dispersion formula with three terms
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

use super::{RefractiveIndex, RefractiveIndexType};
use crate::error::{MatrixOpticsError, OpmResult};

/// Upper limit (in µm) of the wavelength range accepted by the Sellmeier model.
pub const MAX_WAVELENGTH_UM: f64 = 10.0;

/// Refractive index model following the Sellmeier equation
///
/// `n² = 1 + k1·λ²/(λ² - l1) + k2·λ²/(λ² - l2) + k3·λ²/(λ² - l3)` with λ in µm.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RefrIndexSellmeier1 {
    k1: f64,
    k2: f64,
    k3: f64,
    l1: f64,
    l2: f64,
    l3: f64,
}
impl RefrIndexSellmeier1 {
    /// Create a new Sellmeier model from its coefficients (`l1`..`l3` in µm²).
    #[must_use]
    pub const fn new(k1: f64, k2: f64, k3: f64, l1: f64, l2: f64, l3: f64) -> Self {
        Self {
            k1,
            k2,
            k3,
            l1,
            l2,
            l3,
        }
    }
}
impl Default for RefrIndexSellmeier1 {
    /// Coefficients of N-BK7
    fn default() -> Self {
        Self::new(
            1.039_612_12,
            0.231_792_344,
            1.010_469_45,
            0.006_000_698_67,
            0.020_017_914_4,
            103.560_653,
        )
    }
}
impl RefractiveIndex for RefrIndexSellmeier1 {
    fn get_refractive_index(&self, wavelength: Length) -> OpmResult<f64> {
        let lambda = wavelength.get::<micrometer>();
        if lambda <= 0.0 || lambda > MAX_WAVELENGTH_UM || !lambda.is_finite() {
            return Err(MatrixOpticsError::Material(format!(
                "wavelength must be within 0 µm < λ <= {MAX_WAVELENGTH_UM} µm but was {lambda} µm"
            )));
        }
        let l_sq = lambda * lambda;
        Ok(f64::sqrt(
            1.0 + self.k1 * l_sq / (l_sq - self.l1)
                + self.k2 * l_sq / (l_sq - self.l2)
                + self.k3 * l_sq / (l_sq - self.l3),
        ))
    }
    fn to_enum(&self) -> RefractiveIndexType {
        RefractiveIndexType::Sellmeier1(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{micrometer, nanometer};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    #[test]
    fn n_bk7() {
        let i = RefrIndexSellmeier1::default();
        assert_relative_eq!(
            i.get_refractive_index(nanometer!(587.6)).unwrap(),
            1.5167984379050088,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            i.get_refractive_index(micrometer!(5.0)).unwrap(),
            1.3965252243506636,
            max_relative = 1e-12
        );
    }
    #[test]
    fn out_of_range() {
        let i = RefrIndexSellmeier1::default();
        assert_matches!(
            i.get_refractive_index(micrometer!(0.0)),
            Err(MatrixOpticsError::Material(_))
        );
        assert!(i.get_refractive_index(micrometer!(-100.0)).is_err());
        assert!(i.get_refractive_index(micrometer!(100.0)).is_err());
        assert!(i.get_refractive_index(micrometer!(f64::NAN)).is_err());
        assert!(i.get_refractive_index(micrometer!(10.0)).is_ok());
    }
    #[test]
    fn to_enum() {
        let i = RefrIndexSellmeier1::default();
        assert_eq!(i.to_enum(), RefractiveIndexType::Sellmeier1(i));
    }
}
