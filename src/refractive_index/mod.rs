//! Module for handling the refractive index of an optical material.
#![warn(missing_docs)]
use std::fmt::Display;

use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator};
use uom::si::f64::Length;

pub mod glasses;
pub mod refr_index_const;
pub mod refr_index_sellmeier1;

pub use glasses::Glass;
pub use refr_index_const::{refr_index_vacuum, RefrIndexConst};
pub use refr_index_sellmeier1::RefrIndexSellmeier1;

use crate::error::{MatrixOpticsError, OpmResult};

/// Available models for the calculation of refractive index
#[derive(Clone, Serialize, Debug, PartialEq, EnumIter)]
pub enum RefractiveIndexType {
    /// Trivial model returning a wavelength-independent constant
    Const(RefrIndexConst),
    /// Sellmeier 1 model
    Sellmeier1(RefrIndexSellmeier1),
}

impl Default for RefractiveIndexType {
    fn default() -> Self {
        Self::Sellmeier1(RefrIndexSellmeier1::default())
    }
}

impl RefractiveIndexType {
    /// Get the refractive index value of the [`RefractiveIndexType`] for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is outside defined limits.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    pub fn get_refractive_index(&self, wavelength: Length) -> OpmResult<f64> {
        let refr_index = match self {
            Self::Const(refr_index_const) => refr_index_const.get_refractive_index(wavelength)?,
            Self::Sellmeier1(refr_index_sellmeier1) => {
                refr_index_sellmeier1.get_refractive_index(wavelength)?
            }
        };
        if refr_index < 1.0 || !refr_index.is_finite() {
            return Err(MatrixOpticsError::Material(
                "refractive index calculated by model is <1.0 or not finite".into(),
            ));
        }
        Ok(refr_index)
    }
    /// Creates a default instance of a refractive index model by its name (e.g. `"Constant"`).
    #[must_use]
    pub fn default_from_name(name: &str) -> Option<Self> {
        Self::iter().find(|ref_ind_type| format!("{ref_ind_type}") == name)
    }
}

impl From<Glass> for RefractiveIndexType {
    fn from(glass: Glass) -> Self {
        Self::Sellmeier1(glass.sellmeier())
    }
}

impl Display for RefractiveIndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Const(_) => write!(f, "Constant"),
            Self::Sellmeier1(_) => write!(f, "Sellmeier equation"),
        }
    }
}
/// All refractive index models must implement this trait.
pub trait RefractiveIndex {
    /// Get the refractive index value of the current model for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is outside defined limits.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    fn get_refractive_index(&self, wavelength: Length) -> OpmResult<f64>;
    /// Create a corresponding [`RefractiveIndexType`] value.
    fn to_enum(&self) -> RefractiveIndexType;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::micrometer;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    #[test]
    fn default() {
        assert_matches!(
            RefractiveIndexType::default(),
            RefractiveIndexType::Sellmeier1(_)
        );
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", RefractiveIndexType::Const(RefrIndexConst::default())),
            "Constant"
        );
        assert_eq!(
            format!("{}", RefractiveIndexType::default()),
            "Sellmeier equation"
        );
    }
    #[test]
    fn default_from_name() {
        assert_matches!(
            RefractiveIndexType::default_from_name("Constant"),
            Some(RefractiveIndexType::Const(_))
        );
        assert!(RefractiveIndexType::default_from_name("Schott").is_none());
    }
    #[test]
    fn get_refractive_index() {
        let i = RefractiveIndexType::Const(RefrIndexConst::new(1.5).unwrap());
        assert_eq!(i.get_refractive_index(micrometer!(1.0)).unwrap(), 1.5);
        let i = RefractiveIndexType::from(Glass::NBk7);
        assert_relative_eq!(
            i.get_refractive_index(micrometer!(5.0)).unwrap(),
            1.3965252243506636,
            max_relative = 1e-12
        );
        assert_matches!(
            i.get_refractive_index(micrometer!(11.0)),
            Err(MatrixOpticsError::Material(_))
        );
    }
    #[test]
    fn model_below_one() {
        let i = RefractiveIndexType::Sellmeier1(RefrIndexSellmeier1::new(
            -0.9, 0.0, 0.0, 0.0, 0.0, 0.0,
        ));
        assert!(i.get_refractive_index(micrometer!(1.0)).is_err());
    }
}
