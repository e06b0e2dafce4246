#![warn(missing_docs)]
//! Regular fans of rays
use serde::Serialize;

use super::{check_angle_range, check_count, check_height_range, RayDistribution};
use crate::{error::OpmResult, ray::Ray};

/// Fans of rays evenly spaced in height and angle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UniformRays {
    y_min: f64,
    y_max: f64,
    theta_min: f64,
    theta_max: f64,
    height_count: usize,
    angle_count: usize,
}
impl UniformRays {
    /// Create symmetric fans: `height_count` heights within `±y_max`, each with `angle_count` angles within
    /// `±theta_max`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ranges are invalid (see [`UniformRays::with_ranges`]).
    pub fn new(
        y_max: f64,
        theta_max: f64,
        height_count: usize,
        angle_count: usize,
    ) -> OpmResult<Self> {
        Self::with_ranges((-y_max, y_max), (-theta_max, theta_max), height_count, angle_count)
    }
    /// Create fans with arbitrary height and angle ranges.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the height range is not finite or reversed.
    ///   - the angle range exceeds ±π/2 or is reversed.
    ///   - one of the counts is zero.
    pub fn with_ranges(
        (y_min, y_max): (f64, f64),
        (theta_min, theta_max): (f64, f64),
        height_count: usize,
        angle_count: usize,
    ) -> OpmResult<Self> {
        check_height_range(y_min, y_max)?;
        check_angle_range(theta_min, theta_max)?;
        check_count(height_count, "number of heights")?;
        check_count(angle_count, "number of angles")?;
        Ok(Self {
            y_min,
            y_max,
            theta_min,
            theta_max,
            height_count,
            angle_count,
        })
    }
}
impl RayDistribution for UniformRays {
    fn generate(&self) -> Vec<Ray> {
        Ray::fan_group(
            self.y_min,
            self.y_max,
            self.height_count,
            self.theta_min,
            self.theta_max,
            self.angle_count,
        )
    }
}
impl From<UniformRays> for super::RayDistType {
    fn from(dist: UniformRays) -> Self {
        Self::Uniform(dist)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn new_wrong() {
        assert!(UniformRays::new(f64::NAN, 0.1, 3, 3).is_err());
        assert!(UniformRays::new(-1.0, 0.1, 3, 3).is_err());
        assert!(UniformRays::new(1.0, 2.0, 3, 3).is_err());
        assert!(UniformRays::new(1.0, 0.1, 0, 3).is_err());
        assert!(UniformRays::new(1.0, 0.1, 3, 0).is_err());
    }
    #[test]
    fn generate() {
        let rays = UniformRays::new(1.0, 0.2, 3, 5).unwrap().generate();
        assert_eq!(rays.len(), 15);
        assert_eq!(rays[0].y(), -1.0);
        assert_eq!(rays[0].theta(), -0.2);
        assert_eq!(rays[4].theta(), 0.2);
        assert_eq!(rays[14].y(), 1.0);
        assert!(rays.iter().all(|r| r.z() == 0.0 && r.is_not_blocked()));
    }
    #[test]
    fn single_ray() {
        let rays = UniformRays::with_ranges((0.5, 0.5), (0.0, 0.0), 1, 1)
            .unwrap()
            .generate();
        assert_eq!(rays, vec![Ray::new(0.5, 0.0)]);
    }
}
