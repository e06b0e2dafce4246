//! Aperture (iris)
use nalgebra::Matrix2;
use serde::Serialize;

use super::{check_diameter, OpticalElement};
use crate::{error::OpmResult, matrix::RayTransferMatrix};

/// A thin aperture of a given diameter.
///
/// Its matrix is the identity. Rays with a height above `diameter / 2` are blocked.
#[derive(Debug, Clone, Serialize)]
pub struct Aperture {
    pub(super) matrix: RayTransferMatrix,
}
impl Aperture {
    /// Creates a new [`Aperture`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is negative or NaN.
    pub fn new(diameter: f64) -> OpmResult<Self> {
        check_diameter(diameter)?;
        let matrix =
            RayTransferMatrix::from_abcd(Matrix2::identity(), 0.0, 1.0, 1.0, diameter)
                .with_vertices(Some(0.0), Some(0.0));
        Ok(Self { matrix })
    }
    /// Returns the diameter of this [`Aperture`].
    #[must_use]
    pub const fn diameter(&self) -> f64 {
        self.matrix.aperture_diameter()
    }
}
impl OpticalElement for Aperture {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.matrix
    }
    fn flip_orientation(&mut self) {
        self.matrix.set_flipped(!self.matrix.is_flipped());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ray::Ray;
    #[test]
    fn new() {
        let aperture = Aperture::new(2.0).unwrap();
        assert_eq!(aperture.diameter(), 2.0);
        let expected = RayTransferMatrix::identity()
            .with_aperture_diameter(2.0)
            .unwrap()
            .with_vertices(Some(0.0), Some(0.0));
        assert_eq!(aperture.matrix(), &expected);
        assert!(Aperture::new(-2.0).is_err());
    }
    #[test]
    fn trace() {
        let aperture = Aperture::new(2.0).unwrap();
        assert!(aperture.trace_ray(&Ray::new(1.0, 0.5))[0].is_not_blocked());
        assert!(aperture.trace_ray(&Ray::new(-1.1, 0.0))[0].is_blocked());
        let closed = Aperture::new(0.0).unwrap();
        assert!(closed.trace_ray(&Ray::new(0.0, 0.5))[0].is_not_blocked());
        assert!(closed.trace_ray(&Ray::new(0.01, 0.0))[0].is_blocked());
    }
}
