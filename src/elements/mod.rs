#![warn(missing_docs)]
//! This module contains the concrete optical elements (spaces, lenses, apertures, etc...)
//!
//! All elements share the [`OpticalElement`] capabilities. The closed set of elements which can be put into
//! a [`MatrixGroup`] is represented by the [`Element`] enum.
mod aperture;
mod dielectric_interface;
mod lens;
mod mirror;
mod space;
mod thick_lens;

pub use aperture::Aperture;
pub use dielectric_interface::DielectricInterface;
pub use lens::Lens;
pub use mirror::{CurvedMirror, Mirror};
pub use space::Space;
pub use thick_lens::ThickLens;

use serde::Serialize;

use crate::{
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    group::MatrixGroup,
    matrix::{PointOfInterest, RayTransferMatrix},
    ray::Ray,
};

/// This is the basic trait that must be implemented by all optical elements.
///
/// Most capabilities are derived from the element's (effective) [`RayTransferMatrix`].
pub trait OpticalElement {
    /// Return the (effective) [`RayTransferMatrix`] of this element.
    fn matrix(&self) -> &RayTransferMatrix;
    /// Reverse this element in place so that it is traversed from back to front.
    ///
    /// Flipping twice restores the original element.
    fn flip_orientation(&mut self);
    /// Return the transfer matrix from the front of this element up to the axial distance `up_to`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element cannot be split at the given position.
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        self.matrix().transfer_matrix(up_to)
    }
    /// Propagate a [`Ray`] through this element.
    ///
    /// Returns the states behind every sub-element (a single state for simple elements).
    fn trace_ray(&self, ray: &Ray) -> Vec<Ray> {
        vec![self.matrix().trace_ray(ray)]
    }
    /// Propagate a [`GaussianBeam`] through this element.
    ///
    /// Returns the states behind every sub-element (a single state for simple elements).
    fn trace_beam(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        vec![self.matrix().trace_beam(beam)]
    }
    /// Return the label of this element.
    fn label(&self) -> &str {
        self.matrix().label()
    }
    /// Return the physical length of this element.
    fn physical_length(&self) -> f64 {
        self.matrix().physical_length()
    }
    /// Return the clear aperture of this element.
    fn aperture_diameter(&self) -> f64 {
        self.matrix().aperture_diameter()
    }
    /// Return `true` if this element is used backwards.
    fn is_flipped(&self) -> bool {
        self.matrix().is_flipped()
    }
    /// Return the position of the first physical surface relative to the front of this element.
    fn front_vertex(&self) -> Option<f64> {
        self.matrix().front_vertex()
    }
    /// Return the position of the last physical surface relative to the front of this element.
    fn back_vertex(&self) -> Option<f64> {
        self.matrix().back_vertex()
    }
    /// Return the effective focal lengths `(front, back)`, see [`RayTransferMatrix::effective_focal_lengths`].
    fn effective_focal_lengths(&self) -> (f64, f64) {
        self.matrix().effective_focal_lengths()
    }
    /// Return the back focal length, see [`RayTransferMatrix::back_focal_length`].
    fn back_focal_length(&self) -> Option<f64> {
        self.matrix().back_focal_length()
    }
    /// Return the front focal length, see [`RayTransferMatrix::front_focal_length`].
    fn front_focal_length(&self) -> Option<f64> {
        self.matrix().front_focal_length()
    }
    /// Return the principal planes if the element is inserted at `z`.
    fn principal_plane_positions(&self, z: f64) -> Option<(f64, f64)> {
        self.matrix().principal_plane_positions(z)
    }
    /// Return the focal points if the element is inserted at `z`.
    fn focus_positions(&self, z: f64) -> Option<(f64, f64)> {
        self.matrix().focus_positions(z)
    }
    /// Return the points of interest (focal points) if the element is inserted at `z`.
    fn points_of_interest(&self, z: f64) -> Vec<PointOfInterest> {
        self.matrix().points_of_interest(z)
    }
}

/// The closed set of elements an optical path is built of.
#[derive(Debug, Clone, Serialize)]
pub enum Element {
    /// free propagation
    Space(Space),
    /// thin lens
    Lens(Lens),
    /// thick lens with spherical surfaces
    ThickLens(ThickLens),
    /// aperture stop (iris)
    Aperture(Aperture),
    /// flat mirror
    Mirror(Mirror),
    /// spherical mirror
    CurvedMirror(CurvedMirror),
    /// spherical interface between two media
    DielectricInterface(DielectricInterface),
    /// hand-built matrix
    Matrix(RayTransferMatrix),
    /// nested group of elements
    Group(MatrixGroup),
}
impl Element {
    fn as_element(&self) -> &dyn OpticalElement {
        match self {
            Self::Space(e) => e,
            Self::Lens(e) => e,
            Self::ThickLens(e) => e,
            Self::Aperture(e) => e,
            Self::Mirror(e) => e,
            Self::CurvedMirror(e) => e,
            Self::DielectricInterface(e) => e,
            Self::Matrix(e) => e,
            Self::Group(e) => e,
        }
    }
    fn as_element_mut(&mut self) -> &mut dyn OpticalElement {
        match self {
            Self::Space(e) => e,
            Self::Lens(e) => e,
            Self::ThickLens(e) => e,
            Self::Aperture(e) => e,
            Self::Mirror(e) => e,
            Self::CurvedMirror(e) => e,
            Self::DielectricInterface(e) => e,
            Self::Matrix(e) => e,
            Self::Group(e) => e,
        }
    }
    /// Returns this [`Element`] with the given label.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        match &mut self {
            Self::Space(e) => e.matrix.label = label.into(),
            Self::Lens(e) => e.matrix.label = label.into(),
            Self::ThickLens(e) => e.matrix.label = label.into(),
            Self::Aperture(e) => e.matrix.label = label.into(),
            Self::Mirror(e) => e.matrix.label = label.into(),
            Self::CurvedMirror(e) => e.matrix.label = label.into(),
            Self::DielectricInterface(e) => e.matrix.label = label.into(),
            Self::Matrix(e) => e.label = label.into(),
            Self::Group(e) => e.set_label(label),
        }
        self
    }
    /// Returns `true` for elements without any physical surface (free propagation).
    #[must_use]
    pub const fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }
    /// Returns `true` if this element is a (nested) [`MatrixGroup`].
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}
impl OpticalElement for Element {
    fn matrix(&self) -> &RayTransferMatrix {
        self.as_element().matrix()
    }
    fn flip_orientation(&mut self) {
        self.as_element_mut().flip_orientation();
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        self.as_element().transfer_matrix(up_to)
    }
    fn trace_ray(&self, ray: &Ray) -> Vec<Ray> {
        self.as_element().trace_ray(ray)
    }
    fn trace_beam(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        self.as_element().trace_beam(beam)
    }
    fn points_of_interest(&self, z: f64) -> Vec<PointOfInterest> {
        self.as_element().points_of_interest(z)
    }
}
impl OpticalElement for RayTransferMatrix {
    fn matrix(&self) -> &RayTransferMatrix {
        self
    }
    fn flip_orientation(&mut self) {
        *self = self.flipped();
    }
}

macro_rules! element_from {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Element {
            fn from(element: $variant) -> Self {
                Self::$variant(element)
            }
        })*
    };
}
element_from!(
    Space,
    Lens,
    ThickLens,
    Aperture,
    Mirror,
    CurvedMirror,
    DielectricInterface
);
impl From<RayTransferMatrix> for Element {
    fn from(matrix: RayTransferMatrix) -> Self {
        Self::Matrix(matrix)
    }
}
impl From<MatrixGroup> for Element {
    fn from(group: MatrixGroup) -> Self {
        Self::Group(group)
    }
}

/// Check a clear aperture given by the user.
pub(crate) fn check_diameter(diameter: f64) -> OpmResult<()> {
    if diameter.is_sign_negative() || diameter.is_nan() {
        return Err(MatrixOpticsError::Construction(
            "diameter must be >= 0.0 and not NaN".into(),
        ));
    }
    Ok(())
}
/// Check a radius of curvature (infinity corresponds to a flat surface).
pub(crate) fn check_radius(radius: f64, name: &str) -> OpmResult<()> {
    if radius == 0.0 || radius.is_nan() {
        return Err(MatrixOpticsError::Construction(format!(
            "{name} must not be 0.0 or NaN"
        )));
    }
    Ok(())
}
/// Check a refractive index.
pub(crate) fn check_index(index: f64) -> OpmResult<()> {
    if index < 1.0 || !index.is_finite() {
        return Err(MatrixOpticsError::Construction(
            "refractive index must be >= 1.0 and finite".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        assert!(matches!(
            Element::from(Space::new(1.0, 1.0).unwrap()),
            Element::Space(_)
        ));
        assert!(matches!(
            Element::from(Lens::new(1.0, 10.0).unwrap()),
            Element::Lens(_)
        ));
        assert!(matches!(
            Element::from(RayTransferMatrix::identity()),
            Element::Matrix(_)
        ));
        assert!(matches!(
            Element::from(MatrixGroup::default()),
            Element::Group(_)
        ));
    }
    #[test]
    fn with_label() {
        let e = Element::from(Lens::new(5.0, 10.0).unwrap()).with_label("L1");
        assert_eq!(e.label(), "L1");
        let e = Element::from(RayTransferMatrix::identity()).with_label("M");
        assert_eq!(e.label(), "M");
        let e = Element::from(MatrixGroup::default()).with_label("G");
        assert_eq!(e.label(), "G");
    }
    #[test]
    fn predicates() {
        assert!(Element::from(Space::new(1.0, 1.0).unwrap()).is_space());
        assert!(!Element::from(Aperture::new(1.0).unwrap()).is_space());
        assert!(Element::from(MatrixGroup::default()).is_group());
    }
    #[test]
    fn dispatch() {
        let mut e = Element::from(DielectricInterface::new(1.0, 1.5, 10.0, 20.0).unwrap());
        assert_eq!(e.physical_length(), 0.0);
        assert_eq!(e.aperture_diameter(), 20.0);
        assert_eq!(e.front_vertex(), Some(0.0));
        assert!(!e.is_flipped());
        e.flip_orientation();
        assert!(e.is_flipped());
        assert_eq!(e.matrix().front_index(), 1.5);
        assert_eq!(e.trace_ray(&Ray::new(1.0, 0.0)).len(), 1);
    }
    #[test]
    fn matrix_element_flip() {
        let m = RayTransferMatrix::new(1.0, 0.0, -0.02, 1.0 / 1.5, 1.0, 1.5).unwrap();
        let mut e = Element::from(m.clone());
        e.flip_orientation();
        assert!(e.is_flipped());
        assert_eq!(e.matrix(), &m.flipped());
        e.flip_orientation();
        assert_eq!(e.matrix(), &m);
    }
    #[test]
    fn checks() {
        assert!(check_diameter(0.0).is_ok());
        assert!(check_diameter(f64::INFINITY).is_ok());
        assert!(check_diameter(-1.0).is_err());
        assert!(check_diameter(f64::NAN).is_err());
        assert!(check_radius(f64::INFINITY, "radius").is_ok());
        assert!(check_radius(-5.0, "radius").is_ok());
        assert!(check_radius(0.0, "radius").is_err());
        assert!(check_radius(f64::NAN, "radius").is_err());
        assert!(check_index(1.0).is_ok());
        assert!(check_index(0.99).is_err());
        assert!(check_index(f64::INFINITY).is_err());
    }
}
