//! Singlet lens from nominal data
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::{default_wavelength_ref, evaluation_wavelength, material_index, NominalCheck};
use crate::{
    elements::{Element, OpticalElement, ThickLens},
    error::{MatrixOpticsError, OpmResult},
    group::MatrixGroup,
    matrix::RayTransferMatrix,
    refractive_index::Glass,
    utils::unlimited,
};

/// Nominal data of a [`SingletLens`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingletParams {
    /// effective focal length
    pub f: f64,
    /// back focal length
    pub fb: f64,
    /// radius of the front surface (`null` if flat)
    #[serde(with = "unlimited")]
    pub r1: f64,
    /// radius of the rear surface (`null` if flat)
    #[serde(with = "unlimited")]
    pub r2: f64,
    /// center thickness
    pub tc: f64,
    /// edge thickness
    pub te: f64,
    /// index of refraction
    pub n: f64,
    /// clear aperture
    pub diameter: f64,
    /// glass of the lens, overriding `n`
    #[serde(default)]
    pub material: Option<Glass>,
    /// wavelength at which the glass is evaluated (default: reference wavelength)
    #[serde(default)]
    pub wavelength: Option<Length>,
    /// wavelength of the nominal data
    #[serde(default = "default_wavelength_ref")]
    pub wavelength_ref: Length,
    /// label of the lens
    #[serde(default)]
    pub label: String,
}

/// A single thick lens built from nominal data.
#[derive(Debug, Clone)]
pub struct SingletLens {
    params: SingletParams,
    group: MatrixGroup,
}
impl SingletLens {
    /// Creates a new [`SingletLens`] from its nominal data.
    ///
    /// If built at its reference wavelength, the obtained effective focal length, back focal length and edge
    /// thickness are compared with the nominal values using `check`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the center or edge thickness is not positive.
    ///   - the index of refraction is < 1.0.
    ///   - a wavelength is not positive or the glass cannot be evaluated at the wavelength.
    ///   - a radius is zero or the diameter is negative.
    pub fn new(params: SingletParams, check: &NominalCheck) -> OpmResult<Self> {
        if params.tc.is_nan() || params.tc <= 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The center thickness must be positive.".into(),
            ));
        }
        if params.te.is_nan() || params.te <= 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The edge thickness must be positive.".into(),
            ));
        }
        let (wavelength, is_reference) =
            evaluation_wavelength(params.wavelength_ref, params.wavelength)?;
        let n = material_index(params.n, params.material, wavelength)?;
        if n.is_nan() || n < 1.0 {
            return Err(MatrixOpticsError::Construction(
                "The index of refraction must be at least 1.".into(),
            ));
        }
        let label = if params.label.is_empty() {
            "singlet"
        } else {
            params.label.as_str()
        };
        let lens = ThickLens::new(n, params.r1, params.r2, params.tc, params.diameter)?;
        let group = MatrixGroup::from_elements(label, vec![lens.into()]);
        if is_reference {
            check.check_focal_lengths(label, group.matrix(), params.f, params.fb);
            check.check_edge_thickness(
                label,
                (params.r1, params.r2),
                params.tc,
                params.diameter,
                params.te,
            );
        }
        Ok(Self { params, group })
    }
    /// Returns the nominal data of this [`SingletLens`].
    #[must_use]
    pub const fn params(&self) -> &SingletParams {
        &self.params
    }
    /// Returns the elements of this [`SingletLens`] as a [`MatrixGroup`].
    #[must_use]
    pub const fn group(&self) -> &MatrixGroup {
        &self.group
    }
}
impl OpticalElement for SingletLens {
    fn matrix(&self) -> &RayTransferMatrix {
        self.group.matrix()
    }
    fn flip_orientation(&mut self) {
        self.group.flip_orientation();
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        self.group.transfer_matrix(up_to)
    }
}
impl From<SingletLens> for Element {
    fn from(lens: SingletLens) -> Self {
        Self::Group(lens.group)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::micrometer;
    use crate::utils::test_helper::test_helper::{check_warning_count, check_warnings};
    use approx::assert_abs_diff_eq;

    fn params(
        (f, fb): (f64, f64),
        (r1, r2): (f64, f64),
        (tc, te): (f64, f64),
        n: f64,
        diameter: f64,
        label: &str,
    ) -> SingletParams {
        SingletParams {
            f,
            fb,
            r1,
            r2,
            tc,
            te,
            n,
            diameter,
            material: None,
            wavelength: None,
            wavelength_ref: default_wavelength_ref(),
            label: label.into(),
        }
    }
    fn ones() -> SingletParams {
        params((1.0, 1.0), (1.0, 1.0), (1.0, 1.0), 1.0, 1.0, "")
    }
    fn error_message(params: SingletParams) -> String {
        match SingletLens::new(params, &NominalCheck::silent()) {
            Err(MatrixOpticsError::Construction(msg)) => msg,
            _ => String::new(),
        }
    }
    #[test]
    fn invalid_parameters() {
        let mut p = ones();
        p.tc = -1.0;
        assert_eq!(error_message(p), "The center thickness must be positive.");
        let mut p = ones();
        p.te = -1.0;
        assert_eq!(error_message(p), "The edge thickness must be positive.");
        let mut p = ones();
        p.n = 0.5;
        assert_eq!(
            error_message(p),
            "The index of refraction must be at least 1."
        );
        let mut p = ones();
        p.wavelength_ref = micrometer!(-0.1);
        assert_eq!(
            error_message(p),
            "Cannot create a lens with a negative defined wavelength."
        );
    }
    #[test]
    fn new() {
        testing_logger::setup();
        let mut p = params(
            (75.0, 72.0),
            (38.6, 100_000.0),
            (4.1, 2.0),
            1.0,
            25.4,
            "init singlet",
        );
        p.material = Some(Glass::NBk7);
        let lens = SingletLens::new(p, &NominalCheck::default()).unwrap();
        check_warning_count(0);
        assert_eq!(lens.label(), "init singlet");
        assert_eq!(lens.group().len(), 1);
        assert_eq!(lens.front_vertex(), Some(0.0));
        assert_eq!(lens.back_vertex(), Some(4.1));
        assert_abs_diff_eq!(lens.effective_focal_lengths().1, 74.718426, epsilon = 1e-5);
    }
    #[test]
    fn warn_edge_thickness() {
        testing_logger::setup();
        let mut p = params(
            (63.52, 62.41),
            (77.6, -55.9),
            (4.0, 5.0),
            1.0,
            25.4,
            "thickness singlet",
        );
        p.material = Some(Glass::NBk7);
        SingletLens::new(p, &NominalCheck::default()).unwrap();
        check_warnings(vec![
            "thickness singlet: obtained edge thickness 1.4919 is not within 5% of expected 5.0000",
        ]);
    }
    #[test]
    fn warn_back_focal_length() {
        testing_logger::setup();
        let mut p = params(
            (15.9, 22.9),
            (20.89, -16.73),
            (12.0, 1.9),
            1.0,
            25.4,
            "bfl singlet",
        );
        p.material = Some(Glass::NBaf10);
        SingletLens::new(p, &NominalCheck::default()).unwrap();
        check_warnings(vec![
            "bfl singlet: obtained back focal length 12.2355 is not within 1% of expected 22.9000",
        ]);
    }
    #[test]
    fn warn_effective_focal_length() {
        testing_logger::setup();
        let p = params(
            (150.0, 57.82),
            (92.05, -72.85),
            (23.2, 4.8),
            1.67,
            75.0,
            "efl singlet",
        );
        SingletLens::new(p, &NominalCheck::default()).unwrap();
        check_warnings(vec![
            "efl singlet: obtained effective focal length 64.3266 is not within 1% of expected 150.0000",
        ]);
    }
    #[test]
    fn flip() {
        let p = params(
            (75.0, 72.0),
            (38.6, f64::INFINITY),
            (4.1, 2.0),
            1.5,
            25.4,
            "plano-convex",
        );
        let original = SingletLens::new(p, &NominalCheck::silent()).unwrap();
        let mut lens = original.clone();
        lens.flip_orientation();
        assert!(lens.is_flipped());
        assert_eq!(lens.group().elements().len(), 1);
        assert_abs_diff_eq!(
            lens.effective_focal_lengths().1,
            original.effective_focal_lengths().1,
            epsilon = 1e-9
        );
        assert!(lens.back_focal_length().unwrap() > original.back_focal_length().unwrap());
        lens.flip_orientation();
        assert_eq!(lens.matrix(), original.matrix());
    }
}
