#![warn(missing_docs)]
//! Propagation of Gaussian beams
//!
//! A [`LaserPath`] is a [`MatrixGroup`] used with [`GaussianBeam`]s. It may carry an input beam and it
//! computes the eigenmodes of a resonator if its elements describe one round trip.
use log::warn;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::{
    elements::{Element, OpticalElement},
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    group::MatrixGroup,
    matrix::RayTransferMatrix,
    ray::Ray,
    utils::is_close,
};

/// Number of sub-spaces used per [`Space`](crate::elements::Space) for display traces.
pub const DISPLAY_SUBDIVISIONS: usize = 20;

/// Display range used if no beam and no aperture limit the path.
pub const DEFAULT_DISPLAY_RANGE: f64 = 10.0;

/// Position and radius of a beam waist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waist {
    /// absolute axial position of the waist
    pub position: f64,
    /// waist radius
    pub radius: f64,
}

/// An optical path for Gaussian beams.
#[derive(Debug, Clone, Default)]
pub struct LaserPath {
    group: MatrixGroup,
    input_beam: Option<GaussianBeam>,
}
impl LaserPath {
    /// Creates a new, empty [`LaserPath`] without input beam.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self::from_group(MatrixGroup::new(label))
    }
    /// Creates a new [`LaserPath`] from an existing [`MatrixGroup`].
    #[must_use]
    pub const fn from_group(group: MatrixGroup) -> Self {
        Self {
            group,
            input_beam: None,
        }
    }
    /// Returns the underlying [`MatrixGroup`].
    #[must_use]
    pub const fn group(&self) -> &MatrixGroup {
        &self.group
    }
    /// Append an element at the end of the path.
    pub fn append<E: Into<Element>>(&mut self, element: E) {
        self.group.append(element);
    }
    /// Insert an element at the given position.
    ///
    /// # Errors
    ///
    /// This function will return an error if `index` is larger than the number of elements.
    pub fn insert<E: Into<Element>>(&mut self, index: usize, element: E) -> OpmResult<()> {
        self.group.insert(index, element)
    }
    /// Remove the element at the given position and return it.
    ///
    /// # Errors
    ///
    /// This function will return an error if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> OpmResult<Element> {
        self.group.remove(index)
    }
    /// Returns the input beam of this [`LaserPath`] (if any).
    #[must_use]
    pub const fn input_beam(&self) -> Option<&GaussianBeam> {
        self.input_beam.as_ref()
    }
    /// Set (or remove) the input beam of this [`LaserPath`].
    pub fn set_input_beam(&mut self, beam: Option<GaussianBeam>) {
        if let Some(beam) = &beam {
            if !is_close(beam.n(), self.group.matrix().front_index()) {
                warn!(
                    "input beam is in a medium with n = {} but the path starts in n = {}",
                    beam.n(),
                    self.group.matrix().front_index()
                );
            }
        }
        self.input_beam = beam;
    }
    /// Propagate a [`GaussianBeam`] through the path.
    ///
    /// Returns the input beam followed by its state behind every element. Beams are never blocked but flagged
    /// as clipped behind apertures smaller than the beam.
    #[must_use]
    pub fn trace(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        self.group.trace_gaussian(beam)
    }
    /// Propagate the input beam through the path or return `None` if there is no input beam.
    #[must_use]
    pub fn trace_input_beam(&self) -> Option<Vec<GaussianBeam>> {
        self.input_beam.as_ref().map(|beam| self.trace(beam))
    }
    /// Propagate a [`GaussianBeam`] through the path while splitting every space into `count` equal parts.
    ///
    /// # Errors
    ///
    /// This function will return an error if `count` is zero.
    pub fn trace_subdivided(&self, beam: &GaussianBeam, count: usize) -> OpmResult<Vec<GaussianBeam>> {
        if count == 0 {
            return Err(MatrixOpticsError::Other(
                "number of subdivisions must be >= 1".into(),
            ));
        }
        let mut trace = vec![*beam];
        let mut current = *beam;
        for (_, element) in self.group.element_positions(0.0) {
            let matrices: Vec<RayTransferMatrix> = if let Element::Space(space) = element {
                space
                    .subdivided(count)
                    .iter()
                    .map(|s| s.matrix().clone())
                    .collect()
            } else {
                vec![element.matrix().clone()]
            };
            for matrix in &matrices {
                current = matrix.trace_beam(&current);
                trace.push(current);
            }
        }
        Ok(trace)
    }
    /// Returns the waist of the beam behind every element.
    ///
    /// Positions are absolute. States which are not finite beams are skipped.
    #[must_use]
    pub fn waists(&self, beam: &GaussianBeam) -> Vec<Waist> {
        self.trace(beam)
            .iter()
            .skip(1)
            .filter_map(|state| {
                state.waist().map(|radius| Waist {
                    position: state.z() + state.waist_position(),
                    radius,
                })
            })
            .collect()
    }
    /// Returns the two eigenmodes `q = (A·q + B)/(C·q + D)` of the path interpreted as the round trip of a
    /// resonator.
    ///
    /// Returns `Ok(None)` if the path has no optical power.
    ///
    /// # Errors
    ///
    /// This function will return an error if the wavelength is not positive or the front index of the path is
    /// invalid for a beam.
    pub fn eigen_modes(&self, wavelength: f64) -> OpmResult<Option<(GaussianBeam, GaussianBeam)>> {
        let matrix = self.group.matrix();
        GaussianBeam::check_medium(wavelength, matrix.front_index())?;
        if matrix.is_afocal() {
            return Ok(None);
        }
        let b = matrix.d() - matrix.a();
        let sqrt_delta = Complex64::new(b * b + 4.0 * matrix.b() * matrix.c(), 0.0).sqrt();
        let q1 = (-b + sqrt_delta) / (2.0 * matrix.c());
        let q2 = (-b - sqrt_delta) / (2.0 * matrix.c());
        let n = matrix.front_index();
        Ok(Some((
            GaussianBeam::new(q1, wavelength, n)?,
            GaussianBeam::new(q2, wavelength, n)?,
        )))
    }
    /// Returns the physical (finite) eigenmodes of the resonator.
    ///
    /// A stable resonator has exactly one such mode. The result is empty for an unstable resonator.
    ///
    /// # Errors
    ///
    /// This function will return an error under the same conditions as [`LaserPath::eigen_modes`].
    pub fn laser_modes(&self, wavelength: f64) -> OpmResult<Vec<GaussianBeam>> {
        Ok(self
            .eigen_modes(wavelength)?
            .map(|(q1, q2)| vec![q1, q2])
            .unwrap_or_default()
            .into_iter()
            .filter(GaussianBeam::is_finite)
            .collect())
    }
    /// Returns the transverse range (full height) needed to display the given beams.
    ///
    /// If `beams` is empty, the input beam is used. Falls back to the largest clear aperture (or
    /// [`DEFAULT_DISPLAY_RANGE`]) if no beam is finite.
    #[must_use]
    pub fn display_range(&self, beams: &[GaussianBeam]) -> f64 {
        let beams: Vec<GaussianBeam> = if beams.is_empty() {
            self.input_beam.iter().copied().collect()
        } else {
            beams.to_vec()
        };
        let range = beams
            .iter()
            .filter_map(|beam| self.trace_subdivided(beam, DISPLAY_SUBDIVISIONS).ok())
            .flatten()
            .map(|state| 2.0 * state.w())
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);
        if range > 0.0 {
            range
        } else {
            self.group
                .largest_diameter()
                .unwrap_or(DEFAULT_DISPLAY_RANGE)
        }
    }
}
impl OpticalElement for LaserPath {
    fn matrix(&self) -> &RayTransferMatrix {
        self.group.matrix()
    }
    fn flip_orientation(&mut self) {
        self.group.flip_orientation();
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        self.group.transfer_matrix(up_to)
    }
    fn trace_ray(&self, ray: &Ray) -> Vec<Ray> {
        self.group.trace_ray(ray)
    }
    fn trace_beam(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        self.group.trace_beam(beam)
    }
}
