//! Flat and spherical mirrors
//!
//! Mirrors are treated in the unfolded representation: the optical axis continues behind the mirror.
use nalgebra::Matrix2;
use serde::Serialize;

use super::{check_diameter, check_radius, OpticalElement};
use crate::{error::OpmResult, matrix::RayTransferMatrix, utils::unlimited};

/// A flat mirror (identity matrix in the unfolded representation).
#[derive(Debug, Clone, Serialize)]
pub struct Mirror {
    pub(super) matrix: RayTransferMatrix,
}
impl Mirror {
    /// Creates a new flat [`Mirror`].
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
}
impl OpticalElement for Mirror {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.matrix
    }
    fn flip_orientation(&mut self) {
        self.matrix.set_flipped(!self.matrix.is_flipped());
    }
}

/// A spherical mirror with radius of curvature `R` (`C = -2/R`).
///
/// A positive radius describes a focusing (concave) mirror with focal length `R/2`.
#[derive(Debug, Clone, Serialize)]
pub struct CurvedMirror {
    #[serde(serialize_with = "unlimited::serialize")]
    radius: f64,
    pub(super) matrix: RayTransferMatrix,
}
impl CurvedMirror {
    /// Creates a new [`CurvedMirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the radius of curvature is zero or NaN.
    ///   - the diameter is negative or NaN.
    pub fn new(radius: f64, diameter: f64) -> OpmResult<Self> {
        check_radius(radius, "radius of curvature")?;
        check_diameter(diameter)?;
        let matrix = RayTransferMatrix::from_abcd(
            Matrix2::new(1.0, 0.0, -2.0 / radius, 1.0),
            0.0,
            1.0,
            1.0,
            diameter,
        )
        .with_vertices(Some(0.0), Some(0.0));
        Ok(Self { radius, matrix })
    }
    /// Returns the radius of curvature of this [`CurvedMirror`].
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }
}
impl OpticalElement for CurvedMirror {
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
    #[test]
    fn flat() {
        let mirror = Mirror::new(25.0).unwrap();
        assert!(mirror.matrix().is_afocal());
        assert_eq!(mirror.aperture_diameter(), 25.0);
        assert!(Mirror::new(f64::NAN).is_err());
    }
    #[test]
    fn curved() {
        let mirror = CurvedMirror::new(100.0, 25.0).unwrap();
        assert_eq!(mirror.radius(), 100.0);
        assert_eq!(mirror.matrix().c(), -0.02);
        assert_eq!(mirror.effective_focal_lengths(), (50.0, 50.0));
        assert!(CurvedMirror::new(0.0, 25.0).is_err());
        assert!(CurvedMirror::new(100.0, -25.0).is_err());
    }
    #[test]
    fn flip() {
        let mut mirror = CurvedMirror::new(100.0, 25.0).unwrap();
        let original = mirror.matrix().clone();
        mirror.flip_orientation();
        assert!(mirror.is_flipped());
        assert_eq!(mirror.matrix(), &original);
    }
}
