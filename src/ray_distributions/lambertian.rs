#![warn(missing_docs)]
//! Regular fans of rays following Lambert's cosine law
use itertools::iproduct;
use serde::Serialize;

use super::{check_count, check_height_range, RayDistribution};
use crate::{
    error::OpmResult,
    ray::Ray,
    utils::{f64_to_usize, linspace, usize_to_f64},
};

/// Fans of rays at evenly spaced heights in which the number of rays per angle is proportional to `cos θ`.
///
/// For each height, `angle_count` angles are evenly spaced within ±π/2. The angle θ is repeated
/// `round(intensity · cos θ)` times.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LambertianRays {
    y_min: f64,
    y_max: f64,
    height_count: usize,
    angle_count: usize,
    intensity: usize,
}
impl LambertianRays {
    /// Create a new [`LambertianRays`] distribution.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the height range is not finite or reversed.
    ///   - one of the counts is zero.
    pub fn new(
        (y_min, y_max): (f64, f64),
        height_count: usize,
        angle_count: usize,
        intensity: usize,
    ) -> OpmResult<Self> {
        check_height_range(y_min, y_max)?;
        check_count(height_count, "number of heights")?;
        check_count(angle_count, "number of angles")?;
        check_count(intensity, "intensity")?;
        Ok(Self {
            y_min,
            y_max,
            height_count,
            angle_count,
            intensity,
        })
    }
}
impl RayDistribution for LambertianRays {
    fn generate(&self) -> Vec<Ray> {
        let half_pi = std::f64::consts::FRAC_PI_2;
        let angles = linspace(-half_pi, half_pi, self.angle_count);
        let heights = linspace(self.y_min, self.y_max, self.height_count);
        iproduct!(heights, angles)
            .flat_map(|(y, theta)| {
                let repetitions =
                    f64_to_usize((usize_to_f64(self.intensity) * theta.cos()).round());
                std::iter::repeat(Ray::new(y, theta)).take(repetitions)
            })
            .collect()
    }
}
impl From<LambertianRays> for super::RayDistType {
    fn from(dist: LambertianRays) -> Self {
        Self::Lambertian(dist)
    }
}
