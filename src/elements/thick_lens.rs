//! Thick lens with spherical surfaces
use nalgebra::Matrix2;
use serde::Serialize;

use super::{check_diameter, check_index, check_radius, DielectricInterface, OpticalElement, Space};
use crate::{
    error::{MatrixOpticsError, OpmResult},
    matrix::RayTransferMatrix,
    utils::{unlimited, EPSILON},
};

/// A thick lens in air with spherical surfaces.
///
/// # Curvature convention:
/// - positive curvature on the input will be a convex (focusing) surface
/// - negative curvature on the output will be a convex (focusing) surface
///
/// A radius of `f64::INFINITY` corresponds to a flat surface.
#[derive(Debug, Clone, Serialize)]
pub struct ThickLens {
    n: f64,
    #[serde(serialize_with = "unlimited::serialize")]
    r1: f64,
    #[serde(serialize_with = "unlimited::serialize")]
    r2: f64,
    thickness: f64,
    pub(super) matrix: RayTransferMatrix,
}
impl ThickLens {
    /// Creates a new [`ThickLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the refractive index is < 1.0 or not finite.
    ///   - one of the radii of curvature is zero or NaN.
    ///   - the thickness is negative or not finite.
    ///   - the diameter is negative or NaN.
    pub fn new(n: f64, r1: f64, r2: f64, thickness: f64, diameter: f64) -> OpmResult<Self> {
        check_index(n)?;
        check_radius(r1, "front radius of curvature")?;
        check_radius(r2, "rear radius of curvature")?;
        if thickness.is_sign_negative() || !thickness.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "center thickness must be >= 0.0 and finite".into(),
            ));
        }
        check_diameter(diameter)?;
        Ok(Self {
            n,
            r1,
            r2,
            thickness,
            matrix: Self::build(n, r1, r2, thickness, diameter),
        })
    }
    /// Creates a plane-parallel slab (a [`ThickLens`] with flat surfaces).
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid (see [`ThickLens::new`]).
    pub fn slab(n: f64, thickness: f64, diameter: f64) -> OpmResult<Self> {
        Self::new(n, f64::INFINITY, f64::INFINITY, thickness, diameter)
    }
    fn build(n: f64, r1: f64, r2: f64, t: f64, diameter: f64) -> RayTransferMatrix {
        let a = t * (1.0 - n) / (n * r1) + 1.0;
        let b = t / n;
        let c = -(n - 1.0) * (1.0 / r1 - 1.0 / r2 + t * (n - 1.0) / (n * r1 * r2));
        let d = t * (n - 1.0) / (n * r2) + 1.0;
        RayTransferMatrix::from_abcd(Matrix2::new(a, b, c, d), t, 1.0, 1.0, diameter)
            .with_vertices(Some(0.0), Some(t))
    }
    /// Returns the refractive index of the lens material.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }
    /// Returns the radii of curvature `(front, rear)`.
    #[must_use]
    pub const fn radii(&self) -> (f64, f64) {
        (self.r1, self.r2)
    }
    /// Returns the center thickness.
    #[must_use]
    pub const fn thickness(&self) -> f64 {
        self.thickness
    }
    /// Returns the equivalent sequence front surface, propagation inside the glass and rear surface.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid which cannot happen for a
    /// [`ThickLens`] created by [`ThickLens::new`].
    pub fn decomposed(&self) -> OpmResult<(DielectricInterface, Space, DielectricInterface)> {
        let diameter = self.matrix.aperture_diameter();
        Ok((
            DielectricInterface::new(1.0, self.n, self.r1, diameter)?,
            Space::new(self.thickness, self.n)?.with_diameter(diameter)?,
            DielectricInterface::new(self.n, 1.0, self.r2, diameter)?,
        ))
    }
}
impl OpticalElement for ThickLens {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.matrix
    }
    fn flip_orientation(&mut self) {
        let is_flipped = self.matrix.is_flipped();
        let (r1, r2) = (-self.r2, -self.r1);
        let mut matrix = Self::build(
            self.n,
            r1,
            r2,
            self.thickness,
            self.matrix.aperture_diameter(),
        );
        matrix.label = std::mem::take(&mut self.matrix.label);
        matrix.set_flipped(!is_flipped);
        self.r1 = r1;
        self.r2 = r2;
        self.matrix = matrix;
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        if self.thickness <= up_to + EPSILON {
            return Ok(self.matrix.clone());
        }
        let (front, inside, _) = self.decomposed()?;
        Ok(inside.transfer_matrix(up_to)?.multiply(front.matrix()))
    }
}
