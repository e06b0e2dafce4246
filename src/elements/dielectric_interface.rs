//! Spherical interface between two dielectric media
use nalgebra::Matrix2;
use serde::Serialize;

use super::{check_diameter, check_index, check_radius, OpticalElement};
use crate::{error::OpmResult, matrix::RayTransferMatrix, utils::unlimited};

/// A spherical interface from a medium with index `n1` into a medium with index `n2`.
///
/// A positive radius of curvature means that the center of curvature lies behind the surface (convex
/// surface as seen from the incoming light). `f64::INFINITY` describes a flat interface.
#[derive(Debug, Clone, Serialize)]
pub struct DielectricInterface {
    n1: f64,
    n2: f64,
    #[serde(serialize_with = "unlimited::serialize")]
    radius: f64,
    pub(super) matrix: RayTransferMatrix,
}
impl DielectricInterface {
    /// Creates a new [`DielectricInterface`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - one of the refractive indices is < 1.0 or not finite.
    ///   - the radius of curvature is zero or NaN.
    ///   - the diameter is negative or NaN.
    pub fn new(n1: f64, n2: f64, radius: f64, diameter: f64) -> OpmResult<Self> {
        check_index(n1)?;
        check_index(n2)?;
        check_radius(radius, "radius of curvature")?;
        check_diameter(diameter)?;
        Ok(Self {
            n1,
            n2,
            radius,
            matrix: Self::build(n1, n2, radius, diameter),
        })
    }
    fn build(n1: f64, n2: f64, radius: f64, diameter: f64) -> RayTransferMatrix {
        RayTransferMatrix::from_abcd(
            Matrix2::new(1.0, 0.0, -(n2 - n1) / (n2 * radius), n1 / n2),
            0.0,
            n1,
            n2,
            diameter,
        )
        .with_vertices(Some(0.0), Some(0.0))
    }
    /// Returns the refractive index in front of this [`DielectricInterface`].
    #[must_use]
    pub const fn n1(&self) -> f64 {
        self.n1
    }
    /// Returns the refractive index behind this [`DielectricInterface`].
    #[must_use]
    pub const fn n2(&self) -> f64 {
        self.n2
    }
    /// Returns the radius of curvature of this [`DielectricInterface`].
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }
}
impl OpticalElement for DielectricInterface {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.matrix
    }
    fn flip_orientation(&mut self) {
        let is_flipped = self.matrix.is_flipped();
        let mut matrix = Self::build(
            self.n2,
            self.n1,
            -self.radius,
            self.matrix.aperture_diameter(),
        );
        matrix.label = std::mem::take(&mut self.matrix.label);
        matrix.set_flipped(!is_flipped);
        std::mem::swap(&mut self.n1, &mut self.n2);
        self.radius = -self.radius;
        self.matrix = matrix;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    #[test]
    fn new() {
        let interface = DielectricInterface::new(1.0, 1.5, 10.0, 25.4).unwrap();
        assert_eq!(interface.n1(), 1.0);
        assert_eq!(interface.n2(), 1.5);
        assert_eq!(interface.radius(), 10.0);
        let m = interface.matrix();
        assert_relative_eq!(m.c(), -0.5 / 15.0);
        assert_relative_eq!(m.d(), 1.0 / 1.5);
        assert_relative_eq!(m.determinant(), 1.0 / 1.5);
        assert_eq!(m.front_index(), 1.0);
        assert_eq!(m.back_index(), 1.5);
        assert_eq!(m.aperture_diameter(), 25.4);
    }
    #[test]
    fn new_wrong() {
        assert!(DielectricInterface::new(0.5, 1.5, 10.0, 25.4).is_err());
        assert!(DielectricInterface::new(1.0, f64::NAN, 10.0, 25.4).is_err());
        assert!(DielectricInterface::new(1.0, 1.5, 0.0, 25.4).is_err());
        assert!(DielectricInterface::new(1.0, 1.5, 10.0, -25.4).is_err());
    }
    #[test]
    fn flat() {
        let interface = DielectricInterface::new(1.0, 1.5, f64::INFINITY, 25.4).unwrap();
        assert!(interface.matrix().is_afocal());
    }
    #[test]
    fn flip() {
        let mut interface = DielectricInterface::new(1.0, 1.5, 10.0, 25.4).unwrap();
        let original = interface.matrix().clone();
        interface.flip_orientation();
        assert!(interface.is_flipped());
        assert_eq!(interface.n1(), 1.5);
        assert_eq!(interface.n2(), 1.0);
        assert_eq!(interface.radius(), -10.0);
        assert_eq!(interface.matrix(), &original.flipped());
        interface.flip_orientation();
        assert!(!interface.is_flipped());
        assert_eq!(interface.matrix(), &original);
    }
}
