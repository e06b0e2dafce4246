#![warn(missing_docs)]
//! Ordered composition of optical elements
//!
//! A [`MatrixGroup`] is a sequence of [`Element`]s traversed from the first to the last one. Its effective
//! [`RayTransferMatrix`] is the product of all element matrices and is kept up to date on every
//! modification.
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::{
    elements::{Element, OpticalElement},
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    matrix::RayTransferMatrix,
    ray::Ray,
    utils::EPSILON,
};

/// An ordered group of optical elements.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixGroup {
    elements: Vec<Element>,
    effective_matrix: RayTransferMatrix,
    is_flipped: bool,
}
impl Default for MatrixGroup {
    fn default() -> Self {
        Self::new("group")
    }
}
impl MatrixGroup {
    /// Creates a new, empty [`MatrixGroup`] with the given label.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            elements: Vec::new(),
            effective_matrix: RayTransferMatrix::identity().with_label(label),
            is_flipped: false,
        }
    }
    /// Creates a new [`MatrixGroup`] from a list of elements.
    #[must_use]
    pub fn from_elements(label: &str, elements: Vec<Element>) -> Self {
        let mut group = Self::new(label);
        group.elements = elements;
        group.update();
        group
    }
    /// Set the label of this [`MatrixGroup`].
    pub fn set_label(&mut self, label: &str) {
        self.effective_matrix.label = label.to_string();
    }
    /// Returns the elements of this [`MatrixGroup`].
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    /// Returns the number of (top-level) elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    /// Returns `true` if this [`MatrixGroup`] contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    /// Append an element at the end of this [`MatrixGroup`].
    pub fn append<E: Into<Element>>(&mut self, element: E) {
        self.elements.push(element.into());
        self.update();
    }
    /// Insert an element at the given position.
    ///
    /// # Errors
    ///
    /// This function will return an error if `index > len`.
    pub fn insert<E: Into<Element>>(&mut self, index: usize, element: E) -> OpmResult<()> {
        if index > self.elements.len() {
            return Err(MatrixOpticsError::Other(format!(
                "cannot insert element at index {index} into group of {} elements",
                self.elements.len()
            )));
        }
        self.elements.insert(index, element.into());
        self.update();
        Ok(())
    }
    /// Remove the element at the given position and return it.
    ///
    /// # Errors
    ///
    /// This function will return an error if `index >= len`.
    pub fn remove(&mut self, index: usize) -> OpmResult<Element> {
        if index >= self.elements.len() {
            return Err(MatrixOpticsError::Other(format!(
                "cannot remove element at index {index} from group of {} elements",
                self.elements.len()
            )));
        }
        let element = self.elements.remove(index);
        self.update();
        Ok(element)
    }
    fn update(&mut self) {
        let front_index = self
            .elements
            .first()
            .map_or(1.0, |e| e.matrix().front_index());
        let mut matrix = self
            .elements
            .iter()
            .fold(RayTransferMatrix::identity_in(front_index), |m, e| {
                e.matrix().multiply(&m)
            });
        matrix.label = std::mem::take(&mut self.effective_matrix.label);
        matrix.set_flipped(self.is_flipped);
        debug!(
            "group '{}' updated: {} elements, {matrix}",
            matrix.label,
            self.elements.len()
        );
        self.effective_matrix = matrix;
    }
    /// Returns the effective [`RayTransferMatrix`] of this [`MatrixGroup`].
    ///
    /// This is the identity for an empty group.
    #[must_use]
    pub const fn effective_matrix(&self) -> &RayTransferMatrix {
        &self.effective_matrix
    }
    /// Propagate a [`Ray`] through this [`MatrixGroup`].
    ///
    /// Returns the input ray followed by its state behind every (nested) element. A ray hitting an aperture
    /// is flagged as blocked and stays blocked until the end.
    #[must_use]
    pub fn trace(&self, ray: &Ray) -> Vec<Ray> {
        let mut trace = vec![*ray];
        trace.extend(self.trace_ray(ray));
        trace
    }
    /// Propagate a [`Ray`] through this [`MatrixGroup`] and return only its final state.
    #[must_use]
    pub fn trace_through(&self, ray: &Ray) -> Ray {
        self.trace(ray).last().copied().unwrap_or(*ray)
    }
    /// Propagate many rays independently (in parallel).
    #[must_use]
    pub fn trace_many(&self, rays: &[Ray]) -> Vec<Vec<Ray>> {
        rays.par_iter().map(|ray| self.trace(ray)).collect()
    }
    /// Propagate many rays independently (in parallel) and return only their final states.
    #[must_use]
    pub fn trace_many_through(&self, rays: &[Ray]) -> Vec<Ray> {
        rays.par_iter().map(|ray| self.trace_through(ray)).collect()
    }
    /// Propagate a [`GaussianBeam`] through this [`MatrixGroup`].
    ///
    /// Returns the input beam followed by its state behind every (nested) element. Beams are never blocked.
    #[must_use]
    pub fn trace_gaussian(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        let mut trace = vec![*beam];
        trace.extend(self.trace_beam(beam));
        trace
    }
    /// Returns all elements with nested groups expanded (depth-first).
    #[must_use]
    pub fn flatten(&self) -> Vec<Element> {
        self.element_positions(0.0)
            .into_iter()
            .map(|(_, e)| e.clone())
            .collect()
    }
    /// Returns all (nested) elements together with the axial position of their front if this
    /// [`MatrixGroup`] starts at `z`.
    #[must_use]
    pub fn element_positions(&self, z: f64) -> Vec<(f64, &Element)> {
        let mut positions = Vec::new();
        let mut current_z = z;
        for element in &self.elements {
            if let Element::Group(group) = element {
                positions.extend(group.element_positions(current_z));
            } else {
                positions.push((current_z, element));
            }
            current_z += element.physical_length();
        }
        positions
    }
    /// Returns `true` if at least one element has a finite clear aperture.
    #[must_use]
    pub fn has_finite_aperture_diameter(&self) -> bool {
        self.effective_matrix.aperture_diameter().is_finite()
    }
    /// Returns the largest finite clear aperture of all elements or `None` if all elements are unlimited.
    #[must_use]
    pub fn largest_diameter(&self) -> Option<f64> {
        self.element_positions(0.0)
            .iter()
            .map(|(_, e)| e.aperture_diameter())
            .filter(|d| d.is_finite())
            .reduce(f64::max)
    }
    /// Returns the transfer matrix from the axial distance `from` (relative to the front of this group) up
    /// to its end.
    ///
    /// Thin elements located exactly at `from` are not included.
    ///
    /// # Errors
    ///
    /// This function will return an error if `from` lies inside an element that cannot be split.
    pub fn transfer_matrix_from(&self, from: f64) -> OpmResult<RayTransferMatrix> {
        let mut matrix: Option<RayTransferMatrix> = None;
        for (z, element) in self.element_positions(0.0) {
            let end = z + element.physical_length();
            let part = if end <= from + EPSILON {
                continue;
            } else if z >= from - EPSILON {
                element.matrix().clone()
            } else if let Element::Space(space) = element {
                RayTransferMatrix::propagation(end - from, space.index())
            } else {
                return Err(MatrixOpticsError::Matrix(format!(
                    "element '{}' cannot be split at {from}",
                    element.label()
                )));
            };
            matrix = Some(match matrix {
                Some(m) => part.multiply(&m),
                None => part,
            });
        }
        Ok(matrix.unwrap_or_else(|| {
            RayTransferMatrix::identity_in(self.effective_matrix.back_index())
        }))
    }
}
impl OpticalElement for MatrixGroup {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.effective_matrix
    }
    /// Reverse the order of all elements, flip each of them and toggle the flipped flag of the group.
    fn flip_orientation(&mut self) {
        self.elements.reverse();
        for element in &mut self.elements {
            element.flip_orientation();
        }
        self.is_flipped = !self.is_flipped;
        self.update();
    }
    /// Returns the product of all elements up to (and including) the axial distance `up_to`.
    ///
    /// Spaces and thick lenses are split if `up_to` ends inside of them.
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        let front_index = self
            .elements
            .first()
            .map_or(1.0, |e| e.matrix().front_index());
        let mut matrix = RayTransferMatrix::identity_in(front_index);
        let mut remaining = up_to;
        for element in &self.elements {
            let length = element.physical_length();
            if length <= remaining + EPSILON {
                matrix = element.matrix().multiply(&matrix);
                remaining -= length;
            } else if remaining <= EPSILON {
                break;
            } else {
                matrix = element.transfer_matrix(remaining)?.multiply(&matrix);
                break;
            }
        }
        Ok(matrix)
    }
    fn trace_ray(&self, ray: &Ray) -> Vec<Ray> {
        let mut states = Vec::with_capacity(self.elements.len());
        let mut current = *ray;
        for element in &self.elements {
            let element_states = element.trace_ray(&current);
            if let Some(last) = element_states.last() {
                current = *last;
            }
            states.extend(element_states);
        }
        states
    }
    fn trace_beam(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        let mut states = Vec::with_capacity(self.elements.len());
        let mut current = *beam;
        for element in &self.elements {
            let element_states = element.trace_beam(&current);
            if let Some(last) = element_states.last() {
                current = *last;
            }
            states.extend(element_states);
        }
        states
    }
}
