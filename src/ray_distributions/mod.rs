#![warn(missing_docs)]
//! Module for generating bundles of rays and beams
//!
//! The distributions are mainly used to create the input of
//! [`MatrixGroup::trace_many`](crate::group::MatrixGroup::trace_many).
//!
//! ## Example
//!
//! ```rust
//! use matrixoptics::ray_distributions::{RayDistribution, UniformRays};
//!
//! let fan = UniformRays::new(1.0, 0.1, 5, 3).unwrap();
//! let rays = fan.generate();
//! assert_eq!(rays.len(), 15);
//! ```
//! `rays` now contains 5 fans of 3 rays each, starting at heights evenly spaced between -1.0 and 1.0.
use serde::Serialize;

mod beam_fan;
mod lambertian;
mod random;
mod uniform;

pub use beam_fan::BeamFan;
pub use lambertian::LambertianRays;
pub use random::{RandomLambertianRays, RandomUniformRays};
pub use uniform::UniformRays;

use crate::{
    error::{MatrixOpticsError, OpmResult},
    ray::Ray,
};

/// Trait for the generation of ray bundles
pub trait RayDistribution {
    /// Generate the rays of this distribution.
    ///
    /// All rays start at `z = 0.0` and are not blocked.
    fn generate(&self) -> Vec<Ray>;
}

/// Available ray distributions
#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum RayDistType {
    /// regular fans of rays
    Uniform(UniformRays),
    /// regular Lambertian fans of rays
    Lambertian(LambertianRays),
    /// randomly distributed rays
    RandomUniform(RandomUniformRays),
    /// randomly distributed rays following Lambert's law
    RandomLambertian(RandomLambertianRays),
}
impl RayDistType {
    /// Returns a reference to the underlying [`RayDistribution`].
    #[must_use]
    pub fn distribution(&self) -> &dyn RayDistribution {
        match self {
            Self::Uniform(dist) => dist,
            Self::Lambertian(dist) => dist,
            Self::RandomUniform(dist) => dist,
            Self::RandomLambertian(dist) => dist,
        }
    }
}
impl RayDistribution for RayDistType {
    fn generate(&self) -> Vec<Ray> {
        self.distribution().generate()
    }
}

/// Check a transverse range `y_min..=y_max`.
fn check_height_range(y_min: f64, y_max: f64) -> OpmResult<()> {
    if !y_min.is_finite() || !y_max.is_finite() || y_min > y_max {
        return Err(MatrixOpticsError::Other(
            "height range must be finite with y_min <= y_max".into(),
        ));
    }
    Ok(())
}
/// Check an angular range `theta_min..=theta_max` (limited to ±π/2).
fn check_angle_range(theta_min: f64, theta_max: f64) -> OpmResult<()> {
    let limit = std::f64::consts::FRAC_PI_2;
    if !(-limit..=limit).contains(&theta_min)
        || !(-limit..=limit).contains(&theta_max)
        || theta_min > theta_max
    {
        return Err(MatrixOpticsError::Other(
            "angle range must be within -π/2..π/2 with theta_min <= theta_max".into(),
        ));
    }
    Ok(())
}
/// Check that a number of rays or fans is not zero.
fn check_count(count: usize, name: &str) -> OpmResult<()> {
    if count == 0 {
        return Err(MatrixOpticsError::Other(format!("{name} must be >= 1")));
    }
    Ok(())
}
