#![warn(missing_docs)]
//! Module for handling paraxial Gaussian beams
//!
//! A [`GaussianBeam`] is described by its complex beam parameter `q` with `1/q = 1/R - i·λ/(n·π·w²)`.
use std::f64::consts::PI;
use std::fmt::Display;

use num::complex::Complex64;
use serde::Serialize;

use crate::error::{MatrixOpticsError, OpmResult};

/// Default wavelength (HeNe line, 632.8 nm) expressed in millimeters.
pub const DEFAULT_WAVELENGTH: f64 = 0.6328e-3;

/// A Gaussian beam at a given axial position.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GaussianBeam {
    q: Complex64,
    wavelength: f64,
    n: f64,
    z: f64,
    is_clipped: bool,
}
impl GaussianBeam {
    /// Creates a new [`GaussianBeam`] from its complex beam parameter `q`.
    ///
    /// The wavelength is the vacuum wavelength in the same length unit as `q`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the wavelength is not positive and finite.
    ///   - the refractive index is < 1.0 or not finite.
    ///   - `q` is not finite.
    pub fn new(q: Complex64, wavelength: f64, n: f64) -> OpmResult<Self> {
        Self::check_medium(wavelength, n)?;
        if !q.re.is_finite() || !q.im.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "beam parameter q must be finite".into(),
            ));
        }
        Ok(Self {
            q,
            wavelength,
            n,
            z: 0.0,
            is_clipped: false,
        })
    }
    /// Creates a new [`GaussianBeam`] from its radius `w` and its radius of curvature `r`.
    ///
    /// Use `f64::INFINITY` as `r` for a beam at its waist.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the radius `w` is not positive and finite.
    ///   - the radius of curvature is zero or NaN.
    ///   - the wavelength or the refractive index are invalid (see [`GaussianBeam::new`]).
    pub fn from_radius(w: f64, r: f64, wavelength: f64, n: f64) -> OpmResult<Self> {
        Self::check_medium(wavelength, n)?;
        if w <= 0.0 || !w.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "beam radius must be positive and finite".into(),
            ));
        }
        if r == 0.0 || r.is_nan() {
            return Err(MatrixOpticsError::Construction(
                "radius of curvature must be != 0.0 and not NaN".into(),
            ));
        }
        let inv_q = Complex64::new(1.0 / r, -wavelength / (n * PI * w * w));
        Self::new(inv_q.inv(), wavelength, n)
    }
    /// Creates a new [`GaussianBeam`] at its waist with radius `w0`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid (see [`GaussianBeam::from_radius`]).
    pub fn from_waist(w0: f64, wavelength: f64, n: f64) -> OpmResult<Self> {
        Self::from_radius(w0, f64::INFINITY, wavelength, n)
    }
    pub(crate) fn check_medium(wavelength: f64, n: f64) -> OpmResult<()> {
        if wavelength <= 0.0 || !wavelength.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "wavelength must be positive and finite".into(),
            ));
        }
        if n < 1.0 || !n.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "refractive index must be >= 1.0 and finite".into(),
            ));
        }
        Ok(())
    }
    /// Returns this [`GaussianBeam`] moved to the given axial position.
    #[must_use]
    pub const fn at(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
    pub(crate) const fn propagated(&self, q: Complex64, z: f64, n: f64, is_clipped: bool) -> Self {
        Self {
            q,
            wavelength: self.wavelength,
            n,
            z,
            is_clipped,
        }
    }
    /// Returns the complex beam parameter of this [`GaussianBeam`].
    #[must_use]
    pub const fn q(&self) -> Complex64 {
        self.q
    }
    /// Returns the vacuum wavelength of this [`GaussianBeam`].
    #[must_use]
    pub const fn wavelength(&self) -> f64 {
        self.wavelength
    }
    /// Returns the refractive index of the medium the beam is propagating in.
    #[must_use]
    pub const fn n(&self) -> f64 {
        self.n
    }
    /// Returns the axial position of this [`GaussianBeam`].
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
    /// Returns `true` if the beam radius exceeded the radius of the last aperture.
    ///
    /// This flag is informational only. The beam itself is not modified.
    #[must_use]
    pub const fn is_clipped(&self) -> bool {
        self.is_clipped
    }
    /// Returns `true` if this [`GaussianBeam`] describes a physical (finite) beam.
    ///
    /// This is not the case e.g. for the eigenmode of an unstable resonator.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        (-self.q.inv()).im > 0.0
    }
    /// Returns the radius of curvature of the wavefront (`f64::INFINITY` for a flat wavefront).
    #[must_use]
    pub fn r(&self) -> f64 {
        let inv_q_real = self.q.inv().re;
        if inv_q_real == 0.0 {
            f64::INFINITY
        } else {
            1.0 / inv_q_real
        }
    }
    /// Returns the 1/e² radius of this [`GaussianBeam`] (`f64::INFINITY` if the beam is not finite).
    #[must_use]
    pub fn w(&self) -> f64 {
        let im = (-self.q.inv()).im;
        if im > 0.0 {
            (self.wavelength / self.n / (PI * im)).sqrt()
        } else {
            f64::INFINITY
        }
    }
    /// Returns the Rayleigh range `Im(q)`.
    #[must_use]
    pub const fn rayleigh_range(&self) -> f64 {
        self.q.im
    }
    /// Returns the waist radius of this [`GaussianBeam`] or `None` if the beam is not finite.
    #[must_use]
    pub fn waist(&self) -> Option<f64> {
        if self.is_finite() {
            Some((self.rayleigh_range() * self.wavelength / self.n / PI).sqrt())
        } else {
            None
        }
    }
    /// Returns the waist position relative to the current position `z` of the beam.
    ///
    /// A positive value means that the waist is located downstream.
    #[must_use]
    pub fn waist_position(&self) -> f64 {
        -self.q.re
    }
}
impl Display for GaussianBeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "w = {:.4}, R = {:.4}, n = {:.4}, z = {:.4}",
            self.w(),
            self.r(),
            self.n,
            self.z
        )
    }
}
