#![warn(missing_docs)]
//! Wavelength-independent refractive index
use serde::Serialize;
use uom::si::f64::Length;

use super::{RefractiveIndex, RefractiveIndexType};
use crate::error::{MatrixOpticsError, OpmResult};

/// Refractive index model returning the same value for all wavelengths.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct RefrIndexConst {
    refractive_index: f64,
}
impl RefrIndexConst {
    /// Create a new constant refractive index model.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index is < 1.0 or not finite.
    pub fn new(refractive_index: f64) -> OpmResult<Self> {
        if refractive_index < 1.0 || !refractive_index.is_finite() {
            return Err(MatrixOpticsError::Material(
                "refractive index must be >=1.0 and finite".into(),
            ));
        }
        Ok(Self { refractive_index })
    }
}
impl Default for RefrIndexConst {
    fn default() -> Self {
        refr_index_vacuum()
    }
}
/// Returns the refractive index of vacuum (1.0).
#[must_use]
pub const fn refr_index_vacuum() -> RefrIndexConst {
    RefrIndexConst {
        refractive_index: 1.0,
    }
}
impl RefractiveIndex for RefrIndexConst {
    fn get_refractive_index(&self, _wavelength: Length) -> OpmResult<f64> {
        Ok(self.refractive_index)
    }
    fn to_enum(&self) -> RefractiveIndexType {
        RefractiveIndexType::Const(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    #[test]
    fn new() {
        assert!(RefrIndexConst::new(0.99).is_err());
        assert!(RefrIndexConst::new(f64::INFINITY).is_err());
        assert!(RefrIndexConst::new(f64::NAN).is_err());
        let i = RefrIndexConst::new(2.0).unwrap();
        assert_eq!(i.get_refractive_index(nanometer!(500.0)).unwrap(), 2.0);
        assert_eq!(i.get_refractive_index(nanometer!(1500.0)).unwrap(), 2.0);
    }
    #[test]
    fn vacuum() {
        assert_eq!(
            refr_index_vacuum()
                .get_refractive_index(nanometer!(500.0))
                .unwrap(),
            1.0
        );
        assert_eq!(RefrIndexConst::default(), refr_index_vacuum());
    }
    #[test]
    fn to_enum() {
        let i = RefrIndexConst::new(1.5).unwrap();
        assert_eq!(i.to_enum(), RefractiveIndexType::Const(i));
    }
}
