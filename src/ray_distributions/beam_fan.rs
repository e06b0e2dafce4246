#![warn(missing_docs)]
//! Bundles of Gaussian beams
use serde::Serialize;

use super::check_count;
use crate::{
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    utils::linspace,
};

/// A set of Gaussian beams with radii evenly spaced between `w_min` and `w_max` and a common radius of
/// curvature.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BeamFan {
    w_min: f64,
    w_max: f64,
    count: usize,
    r: f64,
    wavelength: f64,
    n: f64,
}
impl BeamFan {
    /// Create a new [`BeamFan`] of beams at their waist.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - a radius is not positive and finite or `w_min > w_max`.
    ///   - `count` is zero.
    ///   - the wavelength or the refractive index are invalid (see [`GaussianBeam::new`]).
    pub fn new(w_min: f64, w_max: f64, count: usize, wavelength: f64, n: f64) -> OpmResult<Self> {
        if w_min.is_nan() || w_min <= 0.0 || !w_max.is_finite() || w_min > w_max {
            return Err(MatrixOpticsError::Other(
                "beam radii must be positive and finite with w_min <= w_max".into(),
            ));
        }
        check_count(count, "number of beams")?;
        GaussianBeam::from_waist(w_min, wavelength, n)?;
        Ok(Self {
            w_min,
            w_max,
            count,
            r: f64::INFINITY,
            wavelength,
            n,
        })
    }
    /// Returns this [`BeamFan`] with the given radius of curvature for all beams.
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius of curvature is zero or NaN.
    pub fn with_curvature(self, r: f64) -> OpmResult<Self> {
        if r == 0.0 || r.is_nan() {
            return Err(MatrixOpticsError::Other(
                "radius of curvature must be != 0.0 and not NaN".into(),
            ));
        }
        Ok(Self { r, ..self })
    }
    /// Generate the beams of this [`BeamFan`].
    #[must_use]
    pub fn generate(&self) -> Vec<GaussianBeam> {
        linspace(self.w_min, self.w_max, self.count)
            .into_iter()
            .filter_map(|w| GaussianBeam::from_radius(w, self.r, self.wavelength, self.n).ok())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    #[test]
    fn new_wrong() {
        assert!(BeamFan::new(0.0, 1.0, 3, 1e-3, 1.0).is_err());
        assert!(BeamFan::new(2.0, 1.0, 3, 1e-3, 1.0).is_err());
        assert!(BeamFan::new(1.0, f64::INFINITY, 3, 1e-3, 1.0).is_err());
        assert!(BeamFan::new(1.0, 2.0, 0, 1e-3, 1.0).is_err());
        assert!(BeamFan::new(1.0, 2.0, 3, 0.0, 1.0).is_err());
        assert!(BeamFan::new(1.0, 2.0, 3, 1e-3, 0.5).is_err());
        let fan = BeamFan::new(1.0, 2.0, 3, 1e-3, 1.0).unwrap();
        assert!(fan.clone().with_curvature(0.0).is_err());
        assert!(fan.with_curvature(100.0).is_ok());
    }
    #[test]
    fn generate() {
        let beams = BeamFan::new(1.0, 2.0, 3, 1e-3, 1.0).unwrap().generate();
        assert_eq!(beams.len(), 3);
        assert_relative_eq!(beams[1].w(), 1.5, max_relative = 1e-12);
        assert_eq!(beams[2].r(), f64::INFINITY);
        let beams = BeamFan::new(1.0, 1.0, 2, 1e-3, 1.0)
            .unwrap()
            .with_curvature(50.0)
            .unwrap()
            .generate();
        assert_relative_eq!(beams[0].r(), 50.0, max_relative = 1e-12);
    }
}
