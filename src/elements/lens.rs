//! Thin lens
use nalgebra::Matrix2;
use serde::Serialize;

use super::{check_diameter, OpticalElement};
use crate::{
    error::{MatrixOpticsError, OpmResult},
    matrix::RayTransferMatrix,
    utils::unlimited,
};

/// An ideal thin lens with focal length `f`.
///
/// A positive focal length describes a converging lens. `f64::INFINITY` is accepted and describes a window
/// without optical power.
#[derive(Debug, Clone, Serialize)]
pub struct Lens {
    #[serde(serialize_with = "unlimited::serialize")]
    focal_length: f64,
    pub(super) matrix: RayTransferMatrix,
}
impl Lens {
    /// Creates a new [`Lens`].
    ///
    /// Use `f64::INFINITY` as `diameter` for an unlimited lens.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the focal length is zero or NaN.
    ///   - the diameter is negative or NaN.
    pub fn new(focal_length: f64, diameter: f64) -> OpmResult<Self> {
        if focal_length == 0.0 || focal_length.is_nan() {
            return Err(MatrixOpticsError::Construction(
                "focal length must not be 0.0 or NaN".into(),
            ));
        }
        check_diameter(diameter)?;
        let matrix = RayTransferMatrix::from_abcd(
            Matrix2::new(1.0, 0.0, -1.0 / focal_length, 1.0),
            0.0,
            1.0,
            1.0,
            diameter,
        )
        .with_vertices(Some(0.0), Some(0.0));
        Ok(Self {
            focal_length,
            matrix,
        })
    }
    /// Returns the focal length of this [`Lens`].
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.focal_length
    }
}
impl OpticalElement for Lens {
    fn matrix(&self) -> &RayTransferMatrix {
        &self.matrix
    }
    fn flip_orientation(&mut self) {
        self.matrix.set_flipped(!self.matrix.is_flipped());
    }
}
