#![warn(missing_docs)]
//! Compound lenses built from several elements
//!
//! Each compound lens wraps a [`MatrixGroup`](crate::group::MatrixGroup) built from nominal (catalog-like)
//! parameters. After construction, the obtained focal lengths and edge thickness are compared with the
//! nominal values and a warning is logged for every deviation beyond the tolerances of a [`NominalCheck`].
use log::warn;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

pub mod achromat;
pub mod objective;
pub mod singlet;

pub use achromat::{AchromatDoubletLens, AchromatParams};
pub use objective::{Objective, ObjectiveParams};
pub use singlet::{SingletLens, SingletParams};

use crate::{
    error::{MatrixOpticsError, OpmResult},
    matrix::RayTransferMatrix,
    refractive_index::Glass,
    utils::is_close,
};

/// Reference wavelength (helium d-line) at which nominal lens data are usually specified.
#[must_use]
pub fn default_wavelength_ref() -> Length {
    Length::new::<micrometer>(0.5876)
}

/// Tolerances used to compare a built compound lens with its nominal data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalCheck {
    /// relative tolerance of effective and back focal length
    pub focal_length_tolerance: f64,
    /// relative tolerance of the edge thickness
    pub edge_thickness_tolerance: f64,
    /// log a notice when building a model which does not fully reproduce the real component
    pub warn_untested_model: bool,
}
impl Default for NominalCheck {
    fn default() -> Self {
        Self {
            focal_length_tolerance: 0.01,
            edge_thickness_tolerance: 0.05,
            warn_untested_model: true,
        }
    }
}
impl NominalCheck {
    /// Returns a [`NominalCheck`] which never logs anything.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            focal_length_tolerance: f64::INFINITY,
            edge_thickness_tolerance: f64::INFINITY,
            warn_untested_model: false,
        }
    }
    fn check_value(label: &str, quantity: &str, obtained: f64, expected: f64, tolerance: f64) {
        if ((obtained - expected) / expected).abs() > tolerance {
            warn!(
                "{label}: obtained {quantity} {obtained:.4} is not within {:.0}% of expected {expected:.4}",
                tolerance * 100.0
            );
        }
    }
    /// Compare effective and back focal length of `matrix` with the expected values.
    pub(crate) fn check_focal_lengths(
        &self,
        label: &str,
        matrix: &RayTransferMatrix,
        expected_efl: f64,
        expected_bfl: f64,
    ) {
        let (_, efl) = matrix.effective_focal_lengths();
        Self::check_value(
            label,
            "effective focal length",
            efl,
            expected_efl,
            self.focal_length_tolerance,
        );
        if let Some(bfl) = matrix.back_focal_length() {
            Self::check_value(
                label,
                "back focal length",
                bfl,
                expected_bfl,
                self.focal_length_tolerance,
            );
        }
    }
    /// Compare the edge thickness of a lens with spherical outer surfaces with the expected value.
    ///
    /// The check is skipped if a surface is smaller than the lens diameter.
    pub(crate) fn check_edge_thickness(
        &self,
        label: &str,
        (front_radius, rear_radius): (f64, f64),
        center_thickness: f64,
        diameter: f64,
        expected: f64,
    ) {
        let height = diameter / 2.0;
        if let (Some(front), Some(rear)) = (sag(front_radius, height), sag(rear_radius, height)) {
            Self::check_value(
                label,
                "edge thickness",
                center_thickness + rear - front,
                expected,
                self.edge_thickness_tolerance,
            );
        }
    }
}
/// Returns the sag of a spherical surface with radius `radius` at the given height.
///
/// The sag has the sign of the radius. Returns `None` if the height exceeds the radius.
#[must_use]
pub fn sag(radius: f64, height: f64) -> Option<f64> {
    if radius.is_infinite() {
        return Some(0.0);
    }
    if height.abs() > radius.abs() {
        return None;
    }
    Some(radius * (1.0 - (height / radius.abs()).asin().cos()))
}
/// Returns the index of refraction of a lens material.
///
/// If a glass is given, its index at the evaluation wavelength is used instead of the nominal index.
pub(crate) fn material_index(
    nominal: f64,
    material: Option<Glass>,
    wavelength: Length,
) -> OpmResult<f64> {
    material.map_or(Ok(nominal), |glass| glass.n(wavelength))
}
/// Validate the reference wavelength and the evaluation wavelength of a lens.
///
/// Returns the evaluation wavelength and whether it equals the reference wavelength.
pub(crate) fn evaluation_wavelength(
    wavelength_ref: Length,
    wavelength: Option<Length>,
) -> OpmResult<(Length, bool)> {
    let reference = wavelength_ref.get::<micrometer>();
    let evaluation = wavelength.map_or(reference, |w| w.get::<micrometer>());
    if reference <= 0.0 || evaluation <= 0.0 || reference.is_nan() || evaluation.is_nan() {
        return Err(MatrixOpticsError::Construction(
            "Cannot create a lens with a negative defined wavelength.".into(),
        ));
    }
    Ok((
        wavelength.unwrap_or(wavelength_ref),
        is_close(reference, evaluation),
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elements::Lens;
    use crate::micrometer;
    use crate::elements::OpticalElement;
    use crate::utils::test_helper::test_helper::{check_warning_count, check_warnings};
    use approx::assert_relative_eq;
    #[test]
    fn sag_values() {
        assert_eq!(sag(f64::INFINITY, 5.0), Some(0.0));
        assert_eq!(sag(f64::NEG_INFINITY, 5.0), Some(0.0));
        assert!(sag(4.0, 5.0).is_none());
        assert_relative_eq!(sag(5.0, 5.0).unwrap(), 5.0, max_relative = 1e-12);
        assert_relative_eq!(sag(-5.0, 5.0).unwrap(), -5.0, max_relative = 1e-12);
        assert_relative_eq!(sag(10.0, 6.0).unwrap(), 2.0, max_relative = 1e-12);
    }
    #[test]
    fn check_focal_lengths() {
        testing_logger::setup();
        let lens = Lens::new(100.0, 25.4).unwrap();
        let check = NominalCheck::default();
        check.check_focal_lengths("lens", lens.matrix(), 100.5, 100.5);
        check_warning_count(0);
        check.check_focal_lengths("lens", lens.matrix(), 90.0, 100.0);
        check_warnings(vec![
            "lens: obtained effective focal length 100.0000 is not within 1% of expected 90.0000",
        ]);
    }
    #[test]
    fn silent() {
        testing_logger::setup();
        let lens = Lens::new(100.0, 25.4).unwrap();
        NominalCheck::silent().check_focal_lengths("lens", lens.matrix(), 1.0, 1.0);
        NominalCheck::silent().check_edge_thickness("lens", (10.0, -10.0), 1.0, 5.0, 100.0);
        check_warning_count(0);
    }
    #[test]
    fn check_edge_thickness() {
        testing_logger::setup();
        let check = NominalCheck::default();
        check.check_edge_thickness("lens", (10.0, f64::INFINITY), 5.0, 12.0, 3.0);
        check_warning_count(0);
        check.check_edge_thickness("lens", (10.0, -10.0), 5.0, 12.0, 3.0);
        check_warnings(vec![
            "lens: obtained edge thickness 1.0000 is not within 5% of expected 3.0000",
        ]);
    }
    #[test]
    fn wavelengths() {
        assert!(evaluation_wavelength(micrometer!(-0.1), None).is_err());
        assert!(evaluation_wavelength(micrometer!(0.5), Some(micrometer!(0.0))).is_err());
        let (w, is_ref) = evaluation_wavelength(default_wavelength_ref(), None).unwrap();
        assert!(is_ref);
        assert_relative_eq!(w.get::<micrometer>(), 0.5876, max_relative = 1e-12);
        let (w, is_ref) =
            evaluation_wavelength(default_wavelength_ref(), Some(micrometer!(1.0))).unwrap();
        assert!(!is_ref);
        assert_relative_eq!(w.get::<micrometer>(), 1.0, max_relative = 1e-12);
    }
}
