#![warn(missing_docs)]
//! Randomly distributed rays
use rand::Rng;
use serde::Serialize;

use super::{check_angle_range, check_count, check_height_range, RayDistribution};
use crate::{error::OpmResult, ray::Ray};

/// Rays with heights and angles drawn from uniform distributions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RandomUniformRays {
    y_min: f64,
    y_max: f64,
    theta_min: f64,
    theta_max: f64,
    nr_of_rays: usize,
}
impl RandomUniformRays {
    /// Create a symmetric distribution of `nr_of_rays` rays within `±y_max` and `±theta_max`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the height range is not finite or reversed.
    ///   - the angle range exceeds ±π/2 or is reversed.
    ///   - `nr_of_rays` is zero.
    pub fn new(y_max: f64, theta_max: f64, nr_of_rays: usize) -> OpmResult<Self> {
        Self::with_ranges((-y_max, y_max), (-theta_max, theta_max), nr_of_rays)
    }
    /// Create a distribution with arbitrary height and angle ranges.
    ///
    /// # Errors
    ///
    /// This function will return an error under the same conditions as [`RandomUniformRays::new`].
    pub fn with_ranges(
        (y_min, y_max): (f64, f64),
        (theta_min, theta_max): (f64, f64),
        nr_of_rays: usize,
    ) -> OpmResult<Self> {
        check_height_range(y_min, y_max)?;
        check_angle_range(theta_min, theta_max)?;
        check_count(nr_of_rays, "nr_of_rays")?;
        Ok(Self {
            y_min,
            y_max,
            theta_min,
            theta_max,
            nr_of_rays,
        })
    }
}
impl RayDistribution for RandomUniformRays {
    fn generate(&self) -> Vec<Ray> {
        let mut rng = rand::rng();
        (0..self.nr_of_rays)
            .map(|_| {
                Ray::new(
                    rng.random_range(self.y_min..=self.y_max),
                    rng.random_range(self.theta_min..=self.theta_max),
                )
            })
            .collect()
    }
}
impl From<RandomUniformRays> for super::RayDistType {
    fn from(dist: RandomUniformRays) -> Self {
        Self::RandomUniform(dist)
    }
}

/// Rays with uniformly distributed heights and angles following Lambert's cosine law.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RandomLambertianRays {
    y_min: f64,
    y_max: f64,
    nr_of_rays: usize,
}
impl RandomLambertianRays {
    /// Create a distribution of `nr_of_rays` rays starting within `y_min..=y_max`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the height range is not finite or reversed.
    ///   - `nr_of_rays` is zero.
    pub fn new((y_min, y_max): (f64, f64), nr_of_rays: usize) -> OpmResult<Self> {
        check_height_range(y_min, y_max)?;
        check_count(nr_of_rays, "nr_of_rays")?;
        Ok(Self {
            y_min,
            y_max,
            nr_of_rays,
        })
    }
}
impl RayDistribution for RandomLambertianRays {
    fn generate(&self) -> Vec<Ray> {
        let mut rng = rand::rng();
        (0..self.nr_of_rays)
            .map(|_| {
                let u: f64 = rng.random_range(0.0..=1.0);
                Ray::new(
                    rng.random_range(self.y_min..=self.y_max),
                    2.0f64.mul_add(u, -1.0).asin(),
                )
            })
            .collect()
    }
}
impl From<RandomLambertianRays> for super::RayDistType {
    fn from(dist: RandomLambertianRays) -> Self {
        Self::RandomLambertian(dist)
    }
}
