//! Free propagation in a homogeneous medium
use nalgebra::Matrix2;
use serde::Serialize;

use super::{check_diameter, check_index, OpticalElement};
use crate::{
    error::{MatrixOpticsError, OpmResult},
    matrix::RayTransferMatrix,
    utils::{usize_to_f64, EPSILON},
};

/// Free propagation over a distance `d` in a medium with refractive index `n`.
///
/// A [`Space`] has no physical surface and therefore no vertices. It is symmetric: flipping only
/// toggles the flipped flag.
#[derive(Debug, Clone, Serialize)]
pub struct Space {
    distance: f64,
    index: f64,
    pub(super) matrix: RayTransferMatrix,
}
impl Space {
    /// Creates a new [`Space`] of the given length in a medium with refractive index `index`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the distance is negative or not finite.
    ///   - the refractive index is < 1.0 or not finite.
    pub fn new(distance: f64, index: f64) -> OpmResult<Self> {
        if distance.is_sign_negative() || !distance.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "distance must be >= 0.0 and finite".into(),
            ));
        }
        check_index(index)?;
        Ok(Self {
            distance,
            index,
            matrix: Self::build(distance, index, f64::INFINITY),
        })
    }
    /// Returns this [`Space`] limited by a clear aperture (e.g. a tube).
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is negative or NaN.
    pub fn with_diameter(self, diameter: f64) -> OpmResult<Self> {
        check_diameter(diameter)?;
        let mut matrix = Self::build(self.distance, self.index, diameter);
        matrix.set_flipped(self.matrix.is_flipped());
        matrix.label.clone_from(&self.matrix.label);
        Ok(Self { matrix, ..self })
    }
    fn build(distance: f64, index: f64, diameter: f64) -> RayTransferMatrix {
        RayTransferMatrix::from_abcd(
            Matrix2::new(1.0, distance, 0.0, 1.0),
            distance,
            index,
            index,
            diameter,
        )
    }
    /// Returns the propagation distance of this [`Space`].
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }
    /// Returns the refractive index of the medium.
    #[must_use]
    pub const fn index(&self) -> f64 {
        self.index
    }
    /// Returns `count` equal sub-spaces covering this [`Space`].
    #[must_use]
    pub fn subdivided(&self, count: usize) -> Vec<Self> {
        if count <= 1 {
            return vec![self.clone()];
        }
        let step = self.distance / usize_to_f64(count);
        let mut sub_space = self.clone();
        sub_space.distance = step;
        sub_space.matrix = Self::build(step, self.index, self.matrix.aperture_diameter());
        sub_space.matrix.label.clone_from(&self.matrix.label);
        vec![sub_space; count]
    }
}
impl OpticalElement for Space {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.matrix
    }
    fn flip_orientation(&mut self) {
        self.matrix.set_flipped(!self.matrix.is_flipped());
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        if self.distance <= up_to + EPSILON {
            return Ok(self.matrix.clone());
        }
        let partial = up_to.max(0.0);
        let mut matrix = Self::build(partial, self.index, self.matrix.aperture_diameter());
        matrix.label.clone_from(&self.matrix.label);
        Ok(matrix)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ray::Ray;
    use approx::assert_relative_eq;
    #[test]
    fn new() {
        let s = Space::new(10.0, 1.5).unwrap();
        assert_eq!(s.distance(), 10.0);
        assert_eq!(s.index(), 1.5);
        let m = s.matrix();
        assert_eq!(m.b(), 10.0);
        assert_eq!(m.physical_length(), 10.0);
        assert_eq!(m.front_index(), 1.5);
        assert_eq!(m.back_index(), 1.5);
        assert!(m.front_vertex().is_none());
        assert!(m.back_vertex().is_none());
        assert_eq!(m.aperture_diameter(), f64::INFINITY);
    }
    #[test]
    fn new_wrong() {
        assert!(Space::new(-1.0, 1.0).is_err());
        assert!(Space::new(f64::NAN, 1.0).is_err());
        assert!(Space::new(f64::INFINITY, 1.0).is_err());
        assert!(Space::new(1.0, 0.5).is_err());
        assert!(Space::new(1.0, 1.0).unwrap().with_diameter(-1.0).is_err());
    }
    #[test]
    fn with_diameter() {
        let s = Space::new(10.0, 1.0).unwrap().with_diameter(4.0).unwrap();
        assert_eq!(s.aperture_diameter(), 4.0);
        assert!(s.trace_ray(&Ray::new(0.0, 0.3))[0].is_blocked());
        let mut tube = Space::new(10.0, 1.0).unwrap();
        tube.matrix.label = "tube".into();
        tube.flip_orientation();
        let tube = tube.with_diameter(4.0).unwrap();
        assert_eq!(tube.label(), "tube");
        assert!(tube.is_flipped());
        assert_eq!(tube.distance(), 10.0);
    }
    #[test]
    fn flip() {
        let mut s = Space::new(10.0, 1.0).unwrap();
        let original = s.matrix().clone();
        s.flip_orientation();
        assert!(s.is_flipped());
        assert_eq!(s.matrix(), &original);
        s.flip_orientation();
        assert!(!s.is_flipped());
    }
    #[test]
    fn transfer_matrix() {
        let s = Space::new(10.0, 1.0).unwrap();
        assert_eq!(s.transfer_matrix(4.0).unwrap().b(), 4.0);
        assert_eq!(s.transfer_matrix(4.0).unwrap().physical_length(), 4.0);
        assert_eq!(s.transfer_matrix(20.0).unwrap().b(), 10.0);
        assert_eq!(s.transfer_matrix(-1.0).unwrap().b(), 0.0);
    }
    #[test]
    fn subdivided() {
        let s = Space::new(10.0, 1.5).unwrap();
        let parts = s.subdivided(4);
        assert_eq!(parts.len(), 4);
        assert_relative_eq!(parts.iter().map(Space::distance).sum::<f64>(), 10.0);
        assert!(parts.iter().all(|p| p.index() == 1.5));
        assert_eq!(s.subdivided(0).len(), 1);
    }
}
