#![warn(missing_docs)]
//! The ray-transfer (ABCD) matrix
//!
//! A [`RayTransferMatrix`] is the 2×2 matrix `[[A, B], [C, D]]` acting on the ray state `(y, θ)` together
//! with the physical metadata needed for a real optical system: physical length, refractive indices on
//! both sides, a clear aperture and the positions of the first and last physical surfaces (vertices).
//!
//! Angles are geometric angles. A matrix from a medium with index `n1` into a medium with index `n2`
//! therefore has a determinant of `n1/n2`.
use std::fmt::Display;
use std::ops::Mul;

use log::warn;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    ray::Ray,
    utils::{is_close, is_zero, unlimited, EPSILON},
};

/// A labeled axial position of interest (e.g. a focal point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// axial position
    pub z: f64,
    /// description of the point
    pub label: String,
}

/// A 2×2 ray-transfer matrix with physical metadata.
///
/// Matrices are values: operations like [`RayTransferMatrix::multiply`] or [`RayTransferMatrix::flipped`]
/// return new matrices.
#[derive(Debug, Clone, Serialize)]
pub struct RayTransferMatrix {
    abcd: Matrix2<f64>,
    physical_length: f64,
    front_index: f64,
    back_index: f64,
    #[serde(serialize_with = "unlimited::serialize")]
    aperture_diameter: f64,
    front_vertex: Option<f64>,
    back_vertex: Option<f64>,
    is_flipped: bool,
    pub(crate) label: String,
}
impl Default for RayTransferMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
impl RayTransferMatrix {
    /// Creates a new, hand-built [`RayTransferMatrix`] without physical length.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - one of the coefficients is not finite.
    ///   - one of the refractive indices is < 1.0 or not finite.
    ///   - the determinant `AD - BC` differs from `front_index / back_index` by more than 1e-9.
    pub fn new(
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        front_index: f64,
        back_index: f64,
    ) -> OpmResult<Self> {
        if [a, b, c, d].iter().any(|v| !v.is_finite()) {
            return Err(MatrixOpticsError::Matrix(
                "matrix coefficients must be finite".into(),
            ));
        }
        for index in [front_index, back_index] {
            if index < 1.0 || !index.is_finite() {
                return Err(MatrixOpticsError::Matrix(
                    "refractive index must be >= 1.0 and finite".into(),
                ));
            }
        }
        let matrix = Self::from_abcd(
            Matrix2::new(a, b, c, d),
            0.0,
            front_index,
            back_index,
            f64::INFINITY,
        );
        let expected = front_index / back_index;
        if (matrix.determinant() - expected).abs() > EPSILON {
            return Err(MatrixOpticsError::Matrix(format!(
                "determinant {} of matrix differs from n1/n2 = {expected}",
                matrix.determinant()
            )));
        }
        Ok(matrix)
    }
    /// Returns the identity matrix in air.
    #[must_use]
    pub fn identity() -> Self {
        Self::identity_in(1.0)
    }
    /// Returns the identity matrix in a medium with the given refractive index.
    #[must_use]
    pub fn identity_in(index: f64) -> Self {
        Self::from_abcd(Matrix2::identity(), 0.0, index, index, f64::INFINITY)
    }
    /// Unchecked constructor for matrices built from validated physical parameters.
    pub(crate) fn from_abcd(
        abcd: Matrix2<f64>,
        physical_length: f64,
        front_index: f64,
        back_index: f64,
        aperture_diameter: f64,
    ) -> Self {
        Self {
            abcd,
            physical_length,
            front_index,
            back_index,
            aperture_diameter,
            front_vertex: None,
            back_vertex: None,
            is_flipped: false,
            label: String::new(),
        }
    }
    /// Propagation over `d` in a homogeneous medium.
    pub(crate) fn propagation(d: f64, index: f64) -> Self {
        Self::from_abcd(Matrix2::new(1.0, d, 0.0, 1.0), d, index, index, f64::INFINITY)
    }
    /// Returns this matrix with the given physical length.
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is negative or not finite.
    pub fn with_physical_length(mut self, physical_length: f64) -> OpmResult<Self> {
        if physical_length.is_sign_negative() || !physical_length.is_finite() {
            return Err(MatrixOpticsError::Matrix(
                "physical length must be >= 0.0 and finite".into(),
            ));
        }
        self.physical_length = physical_length;
        Ok(self)
    }
    /// Returns this matrix with the given clear aperture.
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is negative or NaN.
    pub fn with_aperture_diameter(mut self, aperture_diameter: f64) -> OpmResult<Self> {
        if aperture_diameter.is_sign_negative() || aperture_diameter.is_nan() {
            return Err(MatrixOpticsError::Matrix(
                "aperture diameter must be >= 0.0".into(),
            ));
        }
        self.aperture_diameter = aperture_diameter;
        Ok(self)
    }
    /// Returns this matrix with the given vertex positions (relative to its front).
    #[must_use]
    pub fn with_vertices(mut self, front_vertex: Option<f64>, back_vertex: Option<f64>) -> Self {
        self.front_vertex = front_vertex;
        self.back_vertex = back_vertex;
        self
    }
    /// Returns this matrix with the given label.
    #[must_use]
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
    pub(crate) fn set_flipped(&mut self, is_flipped: bool) {
        self.is_flipped = is_flipped;
    }
    /// Returns the underlying 2×2 matrix.
    #[must_use]
    pub const fn abcd(&self) -> &Matrix2<f64> {
        &self.abcd
    }
    /// Returns the A coefficient.
    #[must_use]
    pub fn a(&self) -> f64 {
        self.abcd[(0, 0)]
    }
    /// Returns the B coefficient.
    #[must_use]
    pub fn b(&self) -> f64 {
        self.abcd[(0, 1)]
    }
    /// Returns the C coefficient.
    #[must_use]
    pub fn c(&self) -> f64 {
        self.abcd[(1, 0)]
    }
    /// Returns the D coefficient.
    #[must_use]
    pub fn d(&self) -> f64 {
        self.abcd[(1, 1)]
    }
    /// Returns the determinant `AD - BC`.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a() * self.d() - self.b() * self.c()
    }
    /// Returns the physical length along the optical axis.
    #[must_use]
    pub const fn physical_length(&self) -> f64 {
        self.physical_length
    }
    /// Returns the refractive index on the input side.
    #[must_use]
    pub const fn front_index(&self) -> f64 {
        self.front_index
    }
    /// Returns the refractive index on the output side.
    #[must_use]
    pub const fn back_index(&self) -> f64 {
        self.back_index
    }
    /// Returns the clear aperture (`f64::INFINITY` if unlimited).
    #[must_use]
    pub const fn aperture_diameter(&self) -> f64 {
        self.aperture_diameter
    }
    /// Returns the position of the first physical surface relative to the front of this matrix.
    #[must_use]
    pub const fn front_vertex(&self) -> Option<f64> {
        self.front_vertex
    }
    /// Returns the position of the last physical surface relative to the front of this matrix.
    #[must_use]
    pub const fn back_vertex(&self) -> Option<f64> {
        self.back_vertex
    }
    /// Returns `true` if this matrix describes an element used backwards.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.is_flipped
    }
    /// Returns the label of this matrix.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Returns the product `self · right`, i.e. the system where `right` is traversed first.
    ///
    /// Physical lengths add up, the front index is taken from `right`, the back index from `self` and
    /// the clear aperture is the smaller of both.
    #[must_use]
    pub fn multiply(&self, right: &Self) -> Self {
        let front_vertex = right
            .front_vertex
            .or_else(|| self.front_vertex.map(|fv| right.physical_length + fv));
        let back_vertex = self
            .back_vertex
            .map_or(right.back_vertex, |bv| Some(right.physical_length + bv));
        Self {
            abcd: self.abcd * right.abcd,
            physical_length: self.physical_length + right.physical_length,
            front_index: right.front_index,
            back_index: self.back_index,
            aperture_diameter: self.aperture_diameter.min(right.aperture_diameter),
            front_vertex,
            back_vertex,
            is_flipped: false,
            label: String::new(),
        }
    }
    /// Propagate a [`Ray`] through this matrix.
    ///
    /// The ray is marked as blocked if its height at the input or at the output exceeds half of the
    /// clear aperture. A blocked ray is still propagated geometrically.
    #[must_use]
    pub fn trace_ray(&self, ray: &Ray) -> Ray {
        let output = self.abcd * Vector2::new(ray.y(), ray.theta());
        let half_aperture = self.aperture_diameter / 2.0;
        let is_blocked =
            ray.is_blocked() || ray.y().abs() > half_aperture || output[0].abs() > half_aperture;
        Ray::with_state(
            output[0],
            output[1],
            ray.z() + self.physical_length,
            is_blocked,
        )
    }
    /// Propagate a [`Ray`] through this matrix ignoring any aperture.
    #[must_use]
    pub fn trace_ray_unbounded(&self, ray: &Ray) -> Ray {
        let output = self.abcd * Vector2::new(ray.y(), ray.theta());
        Ray::with_state(
            output[0],
            output[1],
            ray.z() + self.physical_length,
            ray.is_blocked(),
        )
    }
    /// Propagate a [`GaussianBeam`] through this matrix using the ABCD law `q' = (Aq + B)/(Cq + D)`.
    ///
    /// A warning is emitted if the beam is not in a medium with the front index of this matrix. The
    /// resulting beam is marked as clipped if its radius exceeds half of the clear aperture.
    #[must_use]
    pub fn trace_beam(&self, beam: &GaussianBeam) -> GaussianBeam {
        if !is_close(beam.n(), self.front_index) {
            warn!(
                "incompatible refractive index: beam is in a medium with n = {} but element expects n = {}",
                beam.n(),
                self.front_index
            );
        }
        let q = beam.q();
        let q_out = (q * self.a() + self.b()) / (q * self.c() + self.d());
        let z = beam.z() + self.physical_length;
        let output = beam.propagated(q_out, z, self.back_index, false);
        let is_clipped = output.w() > self.aperture_diameter / 2.0;
        beam.propagated(q_out, z, self.back_index, is_clipped)
    }
    /// Returns `true` if object and image plane are conjugate (`B ≈ 0`).
    #[must_use]
    pub fn is_imaging(&self) -> bool {
        is_zero(self.b())
    }
    /// Returns `true` if the system has no optical power (`C ≈ 0`).
    #[must_use]
    pub fn is_afocal(&self) -> bool {
        is_zero(self.c())
    }
    /// Returns `true` if the system has optical power (`C ≠ 0`).
    #[must_use]
    pub fn has_power(&self) -> bool {
        !self.is_afocal()
    }
    /// Returns the transverse and angular magnification `(A, D)` if this matrix is imaging.
    #[must_use]
    pub fn magnification(&self) -> Option<(f64, f64)> {
        if self.is_imaging() {
            Some((self.a(), self.d()))
        } else {
            None
        }
    }
    /// Returns the effective focal lengths `(front, back)`.
    ///
    /// The back focal length is `-1/C`, the front focal length `-(n1/n2)/C`. Both are `f64::INFINITY`
    /// for an afocal system.
    #[must_use]
    pub fn effective_focal_lengths(&self) -> (f64, f64) {
        if self.is_afocal() {
            return (f64::INFINITY, f64::INFINITY);
        }
        let back = -1.0 / self.c();
        (back * self.front_index / self.back_index, back)
    }
    /// Returns the positions of the front and back principal planes if the front of this matrix is
    /// located at `z`. Returns `None` for afocal systems.
    #[must_use]
    pub fn principal_plane_positions(&self, z: f64) -> Option<(f64, f64)> {
        if self.is_afocal() {
            return None;
        }
        let ratio = self.front_index / self.back_index;
        let p1 = z - (ratio - self.d()) / self.c();
        let p2 = z + self.physical_length + (1.0 - self.a()) / self.c();
        Some((p1, p2))
    }
    /// Returns the positions of the front and back focal points if the front of this matrix is
    /// located at `z`. Returns `None` for afocal systems.
    #[must_use]
    pub fn focus_positions(&self, z: f64) -> Option<(f64, f64)> {
        let (p1, p2) = self.principal_plane_positions(z)?;
        let (f1, f2) = self.effective_focal_lengths();
        Some((p1 - f1, p2 + f2))
    }
    /// Returns the distance from the back vertex to the back focal point.
    ///
    /// Returns `None` if the system has no power or no physical surface.
    #[must_use]
    pub fn back_focal_length(&self) -> Option<f64> {
        let back_vertex = self.back_vertex?;
        let (_, back_focus) = self.focus_positions(0.0)?;
        Some(back_focus - back_vertex)
    }
    /// Returns the distance from the front focal point to the front vertex.
    ///
    /// Returns `None` if the system has no power or no physical surface.
    #[must_use]
    pub fn front_focal_length(&self) -> Option<f64> {
        let front_vertex = self.front_vertex?;
        let (front_focus, _) = self.focus_positions(0.0)?;
        Some(front_vertex - front_focus)
    }
    /// Returns the focal points of this matrix if its front is located at `z`.
    ///
    /// An afocal system has no points of interest.
    #[must_use]
    pub fn points_of_interest(&self, z: f64) -> Vec<PointOfInterest> {
        self.focus_positions(z)
            .map(|(front, back)| {
                vec![
                    PointOfInterest {
                        z: front,
                        label: "F".into(),
                    },
                    PointOfInterest {
                        z: back,
                        label: "F'".into(),
                    },
                ]
            })
            .unwrap_or_default()
    }
    /// Returns the distance `d = -B/D` behind this matrix where the input plane is imaged together with
    /// the resulting imaging matrix `Space(d) · self`.
    ///
    /// Returns `None` if the conjugate plane is at infinity (`D ≈ 0`). The distance may be negative
    /// (virtual image).
    #[must_use]
    pub fn forward_conjugate(&self) -> Option<(f64, Self)> {
        if is_zero(self.d()) {
            return None;
        }
        let distance = -self.b() / self.d();
        let conjugate = Self::propagation(distance, self.back_index).multiply(self);
        Some((distance, conjugate))
    }
    /// Returns the distance `d = -B/A` in front of this matrix whose plane is imaged onto the output
    /// plane together with the resulting imaging matrix `self · Space(d)`.
    ///
    /// Returns `None` if the conjugate plane is at infinity (`A ≈ 0`).
    #[must_use]
    pub fn backward_conjugate(&self) -> Option<(f64, Self)> {
        if is_zero(self.a()) {
            return None;
        }
        let distance = -self.b() / self.a();
        let conjugate = self.multiply(&Self::propagation(distance, self.front_index));
        Some((distance, conjugate))
    }
    /// Returns the matrix of the same system traversed from back to front.
    ///
    /// Coefficients transform as `A' = k·D`, `B' = k·B`, `C' = k·C`, `D' = k·A` with `k = n2/n1`,
    /// the refractive indices and the vertices are swapped and the flipped flag is toggled.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let k = self.back_index / self.front_index;
        let length = self.physical_length;
        Self {
            abcd: Matrix2::new(
                k * self.d(),
                k * self.b(),
                k * self.c(),
                k * self.a(),
            ),
            physical_length: length,
            front_index: self.back_index,
            back_index: self.front_index,
            aperture_diameter: self.aperture_diameter,
            front_vertex: self.back_vertex.map(|bv| length - bv),
            back_vertex: self.front_vertex.map(|fv| length - fv),
            is_flipped: !self.is_flipped,
            label: self.label.clone(),
        }
    }
    /// Returns the transfer matrix from the front of this matrix up to the position `up_to`.
    ///
    /// A plain matrix cannot be split. It is returned as a whole if `up_to` covers its full length.
    ///
    /// # Errors
    ///
    /// This function will return an error if `up_to` ends inside this matrix.
    pub fn transfer_matrix(&self, up_to: f64) -> OpmResult<Self> {
        if self.physical_length <= up_to + EPSILON {
            Ok(self.clone())
        } else {
            Err(MatrixOpticsError::Matrix(format!(
                "matrix '{}' with physical length {} cannot be split at {up_to}",
                self.label, self.physical_length
            )))
        }
    }
}
impl Mul<&RayTransferMatrix> for &RayTransferMatrix {
    type Output = RayTransferMatrix;
    fn mul(self, rhs: &RayTransferMatrix) -> Self::Output {
        self.multiply(rhs)
    }
}
impl PartialEq for RayTransferMatrix {
    /// Compares coefficients and physical metadata within tolerance. Labels and the flipped flag are ignored.
    fn eq(&self, other: &Self) -> bool {
        let vertex_eq = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => is_close(a, b),
            _ => false,
        };
        self.abcd
            .iter()
            .zip(other.abcd.iter())
            .all(|(a, b)| is_close(*a, *b))
            && is_close(self.physical_length, other.physical_length)
            && is_close(self.front_index, other.front_index)
            && is_close(self.back_index, other.back_index)
            && is_close(self.aperture_diameter, other.aperture_diameter)
            && vertex_eq(self.front_vertex, other.front_vertex)
            && vertex_eq(self.back_vertex, other.back_vertex)
    }
}
impl Display for RayTransferMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}; {:.4}, {:.4}] (L = {:.4}, n = {:.4} -> {:.4})",
            self.a(),
            self.b(),
            self.c(),
            self.d(),
            self.physical_length,
            self.front_index,
            self.back_index
        )
    }
}
