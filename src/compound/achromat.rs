//! Achromatic doublet lens
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::{default_wavelength_ref, evaluation_wavelength, material_index, NominalCheck};
use crate::{
    elements::{check_diameter, DielectricInterface, Element, OpticalElement, Space},
    error::{MatrixOpticsError, OpmResult},
    group::MatrixGroup,
    matrix::RayTransferMatrix,
    refractive_index::Glass,
    utils::unlimited,
};

/// Nominal data of an [`AchromatDoubletLens`].
///
/// Radii follow the usual sign convention (positive: center of curvature behind the surface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchromatParams {
    /// effective focal length
    pub fa: f64,
    /// back focal length
    pub fb: f64,
    /// radius of the front surface (`null` if flat)
    #[serde(with = "unlimited")]
    pub r1: f64,
    /// radius of the cemented surface (`null` if flat)
    #[serde(with = "unlimited")]
    pub r2: f64,
    /// radius of the rear surface (`null` if flat)
    #[serde(with = "unlimited")]
    pub r3: f64,
    /// center thickness of the first lens
    pub tc1: f64,
    /// center thickness of the second lens
    pub tc2: f64,
    /// edge thickness of the doublet
    pub te: f64,
    /// index of refraction of the first lens
    pub n1: f64,
    /// index of refraction of the second lens
    pub n2: f64,
    /// clear aperture
    pub diameter: f64,
    /// glasses of both lenses, overriding `n1` and `n2`
    #[serde(default)]
    pub materials: Option<(Glass, Glass)>,
    /// wavelength at which the glasses are evaluated (default: reference wavelength)
    #[serde(default)]
    pub wavelength: Option<Length>,
    /// wavelength of the nominal data
    #[serde(default = "default_wavelength_ref")]
    pub wavelength_ref: Length,
    /// label of the lens
    #[serde(default)]
    pub label: String,
}

/// A cemented doublet made of two glasses: three dielectric interfaces separated by two spaces.
#[derive(Debug, Clone)]
pub struct AchromatDoubletLens {
    params: AchromatParams,
    group: MatrixGroup,
}
impl AchromatDoubletLens {
    /// Creates a new [`AchromatDoubletLens`] from its nominal data.
    ///
    /// If built at its reference wavelength, the obtained effective focal length, back focal length and edge
    /// thickness are compared with the nominal values using `check`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - one of the thicknesses is not positive.
    ///   - one of the indices of refraction is < 1.0.
    ///   - a wavelength is not positive.
    ///   - a glass cannot be evaluated at the given wavelength.
    ///   - a radius is zero or the diameter is negative.
    pub fn new(params: AchromatParams, check: &NominalCheck) -> OpmResult<Self> {
        if params.tc1.is_nan() || params.tc1 <= 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The first center thickness must be positive.".into(),
            ));
        }
        if params.tc2.is_nan() || params.tc2 <= 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The second center thickness must be positive.".into(),
            ));
        }
        if params.te.is_nan() || params.te <= 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The edge thickness must be positive.".into(),
            ));
        }
        let (wavelength, is_reference) =
            evaluation_wavelength(params.wavelength_ref, params.wavelength)?;
        let (glass1, glass2) = params.materials.unzip();
        let n1 = material_index(params.n1, glass1, wavelength)?;
        let n2 = material_index(params.n2, glass2, wavelength)?;
        if n1.is_nan() || n1 < 1.0 {
            return Err(MatrixOpticsError::Construction(
                "The index of refraction of the first material must be at least 1.".into(),
            ));
        }
        if n2.is_nan() || n2 < 1.0 {
            return Err(MatrixOpticsError::Construction(
                "The index of refraction of the second material must be at least 1.".into(),
            ));
        }
        check_diameter(params.diameter)?;
        let label = if params.label.is_empty() {
            "achromat doublet"
        } else {
            params.label.as_str()
        };
        let elements: Vec<Element> = vec![
            DielectricInterface::new(1.0, n1, params.r1, params.diameter)?.into(),
            Space::new(params.tc1, n1)?.into(),
            DielectricInterface::new(n1, n2, params.r2, params.diameter)?.into(),
            Space::new(params.tc2, n2)?.into(),
            DielectricInterface::new(n2, 1.0, params.r3, params.diameter)?.into(),
        ];
        let group = MatrixGroup::from_elements(label, elements);
        if is_reference {
            check.check_focal_lengths(label, group.matrix(), params.fa, params.fb);
            check.check_edge_thickness(
                label,
                (params.r1, params.r3),
                params.tc1 + params.tc2,
                params.diameter,
                params.te,
            );
        }
        Ok(Self { params, group })
    }
    /// Returns the nominal data of this [`AchromatDoubletLens`].
    #[must_use]
    pub const fn params(&self) -> &AchromatParams {
        &self.params
    }
    /// Returns the elements of this [`AchromatDoubletLens`] as a [`MatrixGroup`].
    #[must_use]
    pub const fn group(&self) -> &MatrixGroup {
        &self.group
    }
}
impl OpticalElement for AchromatDoubletLens {
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
impl From<AchromatDoubletLens> for Element {
    fn from(lens: AchromatDoubletLens) -> Self {
        Self::Group(lens.group)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::{check_warning_count, check_warnings};
    use crate::{micrometer, ray::Ray};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn params(
        (fa, fb): (f64, f64),
        (r1, r2, r3): (f64, f64, f64),
        (tc1, tc2, te): (f64, f64, f64),
        (n1, n2): (f64, f64),
        diameter: f64,
        label: &str,
    ) -> AchromatParams {
        AchromatParams {
            fa,
            fb,
            r1,
            r2,
            r3,
            tc1,
            tc2,
            te,
            n1,
            n2,
            diameter,
            materials: None,
            wavelength: None,
            wavelength_ref: default_wavelength_ref(),
            label: label.into(),
        }
    }
    fn ones() -> AchromatParams {
        params(
            (1.0, 1.0),
            (1.0, 1.0, 1.0),
            (1.0, 1.0, 1.0),
            (1.0, 1.0),
            1.0,
            "",
        )
    }
    fn init_params() -> AchromatParams {
        let mut p = params(
            (-100.0, -103.6),
            (-52.0, 49.9, 600.0),
            (2.0, 4.0, 7.7),
            (1.0, 1.0),
            25.4,
            "init doublet",
        );
        p.materials = Some((Glass::NBak4, Glass::Sf5));
        p
    }
    fn error_message(params: AchromatParams) -> String {
        match AchromatDoubletLens::new(params, &NominalCheck::silent()) {
            Err(MatrixOpticsError::Construction(msg)) => msg,
            _ => String::new(),
        }
    }
    #[test]
    fn invalid_parameters() {
        let mut p = ones();
        p.tc1 = -1.0;
        assert_eq!(
            error_message(p),
            "The first center thickness must be positive."
        );
        let mut p = ones();
        p.tc2 = -1.0;
        assert_eq!(
            error_message(p),
            "The second center thickness must be positive."
        );
        let mut p = ones();
        p.te = -1.0;
        assert_eq!(error_message(p), "The edge thickness must be positive.");
        let mut p = ones();
        p.n1 = 0.99999;
        assert_eq!(
            error_message(p),
            "The index of refraction of the first material must be at least 1."
        );
        let mut p = ones();
        p.n2 = 0.99999;
        assert_eq!(
            error_message(p),
            "The index of refraction of the second material must be at least 1."
        );
        let mut p = ones();
        p.wavelength_ref = micrometer!(-0.00001);
        assert_eq!(
            error_message(p),
            "Cannot create a lens with a negative defined wavelength."
        );
    }
    #[test]
    fn invalid_material_wavelength() {
        let mut p = init_params();
        p.wavelength = Some(micrometer!(20.0));
        assert_matches!(
            AchromatDoubletLens::new(p, &NominalCheck::silent()),
            Err(MatrixOpticsError::Material(_))
        );
    }
    #[test]
    fn new() {
        testing_logger::setup();
        let lens = AchromatDoubletLens::new(init_params(), &NominalCheck::default()).unwrap();
        check_warning_count(0);
        assert_eq!(lens.label(), "init doublet");
        assert_eq!(lens.group().len(), 5);
        assert_abs_diff_eq!(lens.physical_length(), 6.0);
        assert_eq!(lens.front_vertex(), Some(0.0));
        assert_eq!(lens.back_vertex(), Some(6.0));
        assert_eq!(lens.aperture_diameter(), 25.4);
        let (_, efl) = lens.effective_focal_lengths();
        assert!((efl + 100.0).abs() < 1.0);
        assert_abs_diff_eq!(lens.matrix().determinant(), 1.0, epsilon = 1e-9);
    }
    #[test]
    fn other_wavelength_skips_checks() {
        testing_logger::setup();
        let mut p = init_params();
        p.fa = 200.0;
        p.wavelength = Some(micrometer!(1.0));
        let lens = AchromatDoubletLens::new(p, &NominalCheck::default()).unwrap();
        check_warning_count(0);
        let reference = AchromatDoubletLens::new(init_params(), &NominalCheck::silent()).unwrap();
        assert!(lens.matrix().c() != reference.matrix().c());
    }
    #[test]
    fn warn_edge_thickness() {
        testing_logger::setup();
        let mut p = params(
            (125.0, 122.0),
            (77.6, -55.9, -160.8),
            (4.0, 2.8, 5.0),
            (1.0, 1.0),
            25.4,
            "thickness doublet",
        );
        p.materials = Some((Glass::NBk7, Glass::NSf5));
        AchromatDoubletLens::new(p, &NominalCheck::default()).unwrap();
        check_warnings(vec![
            "thickness doublet: obtained edge thickness 5.2514 is not within 5% of expected 5.0000",
        ]);
    }
    #[test]
    fn warn_back_focal_length() {
        testing_logger::setup();
        let mut p = params(
            (30.0, 22.9),
            (20.89, -16.73, -79.8),
            (12.0, 2.0, 8.8),
            (1.0, 1.0),
            25.4,
            "bfl doublet",
        );
        p.materials = Some((Glass::NBaf10, Glass::NSf6Ht));
        AchromatDoubletLens::new(p, &NominalCheck::default()).unwrap();
        check_warnings(vec![
            "bfl doublet: obtained back focal length 22.2266 is not within 1% of expected 22.9000",
        ]);
    }
    #[test]
    fn warn_effective_focal_length() {
        testing_logger::setup();
        let p = params(
            (150.0, 126.46),
            (92.05, -72.85, -305.87),
            (23.2, 23.1, 36.01),
            (1.67, 1.8467),
            75.0,
            "efl doublet",
        );
        AchromatDoubletLens::new(p, &NominalCheck::default()).unwrap();
        check_warnings(vec![
            "efl doublet: obtained effective focal length 134.9509 is not within 1% of expected 150.0000",
            "efl doublet: obtained back focal length 112.6986 is not within 1% of expected 126.4600",
        ]);
    }
    #[test]
    fn flip() {
        let original = AchromatDoubletLens::new(init_params(), &NominalCheck::silent()).unwrap();
        let mut lens = original.clone();
        lens.flip_orientation();
        assert!(lens.is_flipped());
        assert!(lens.matrix() != original.matrix());
        let ray = Ray::new(1.0, 0.0);
        let forward = original.matrix().trace_ray(&ray);
        let backward = lens.matrix().trace_ray(&ray);
        assert!((forward.y() - backward.y()).abs() > 1e-3);
        lens.flip_orientation();
        assert!(!lens.is_flipped());
        assert_eq!(lens.matrix(), original.matrix());
        assert_eq!(lens.front_vertex(), original.front_vertex());
        assert_eq!(lens.back_vertex(), original.back_vertex());
    }
    #[test]
    fn points_of_interest() {
        let lens = AchromatDoubletLens::new(init_params(), &NominalCheck::silent()).unwrap();
        let z = 10.0;
        let points = lens.points_of_interest(z);
        let m = lens.matrix();
        let f = -1.0 / m.c();
        let front_focus = z - (1.0 - m.d()) / m.c() - f;
        let back_focus = z + m.physical_length() + (1.0 - m.a()) / m.c() + f;
        assert_eq!(points.len(), 2);
        assert_abs_diff_eq!(points[0].z, front_focus, epsilon = 1e-9);
        assert_abs_diff_eq!(points[1].z, back_focus, epsilon = 1e-9);
    }
    #[test]
    fn into_element() {
        let lens = AchromatDoubletLens::new(init_params(), &NominalCheck::silent()).unwrap();
        let element: Element = lens.into();
        assert!(element.is_group());
        assert_eq!(element.label(), "init doublet");
    }
}
