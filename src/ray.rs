#![warn(missing_docs)]
//! Module for handling paraxial rays
//!
//! A [`Ray`] is the state vector `(y, θ)` of the paraxial ray-transfer formalism together with its axial
//! position `z` and a flag telling whether it has been stopped by an aperture somewhere upstream.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::utils::linspace;

/// A paraxial ray.
///
/// `y` is the height above the optical axis and `theta` the (geometric) angle with respect to the axis
/// in radians. A blocked ray keeps being propagated geometrically but is flagged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Ray {
    y: f64,
    theta: f64,
    z: f64,
    is_blocked: bool,
}
impl Ray {
    /// Creates a new, unblocked [`Ray`] at `z = 0`.
    #[must_use]
    pub const fn new(y: f64, theta: f64) -> Self {
        Self {
            y,
            theta,
            z: 0.0,
            is_blocked: false,
        }
    }
    /// Returns this [`Ray`] moved to the given axial position without changing height or angle.
    #[must_use]
    pub const fn at(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
    pub(crate) const fn with_state(y: f64, theta: f64, z: f64, is_blocked: bool) -> Self {
        Self {
            y,
            theta,
            z,
            is_blocked,
        }
    }
    /// Returns the height of this [`Ray`].
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
    /// Returns the angle of this [`Ray`] in radians.
    #[must_use]
    pub const fn theta(&self) -> f64 {
        self.theta
    }
    /// Returns the axial position of this [`Ray`].
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.z
    }
    /// Returns `true` if this [`Ray`] has hit an aperture.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.is_blocked
    }
    /// Returns `true` if this [`Ray`] has not been blocked.
    #[must_use]
    pub const fn is_not_blocked(&self) -> bool {
        !self.is_blocked
    }
    /// Creates a fan of rays starting at the same height `y` with `count` angles evenly spaced
    /// between `theta_min` and `theta_max`.
    #[must_use]
    pub fn fan(y: f64, theta_min: f64, theta_max: f64, count: usize) -> Vec<Self> {
        linspace(theta_min, theta_max, count)
            .into_iter()
            .map(|theta| Self::new(y, theta))
            .collect()
    }
    /// Creates `height_count` fans (see [`Ray::fan`]) at heights evenly spaced between `y_min` and `y_max`.
    #[must_use]
    pub fn fan_group(
        y_min: f64,
        y_max: f64,
        height_count: usize,
        theta_min: f64,
        theta_max: f64,
        angle_count: usize,
    ) -> Vec<Self> {
        linspace(y_min, y_max, height_count)
            .into_iter()
            .flat_map(|y| Self::fan(y, theta_min, theta_max, angle_count))
            .collect()
    }
}
impl Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "y = {:.4}, θ = {:.4} rad, z = {:.4}{}",
            self.y,
            self.theta,
            self.z,
            if self.is_blocked { " (blocked)" } else { "" }
        )
    }
}

/// How blocked rays are presented when a trace is reduced to its visible part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockedRayPolicy {
    /// A trace containing a blocked state is dropped entirely.
    #[default]
    RemoveCompletely,
    /// A trace is kept up to (and including) the first blocked state.
    StopAtBlock,
}

/// Reduce a trace (as returned by [`MatrixGroup::trace`](crate::group::MatrixGroup::trace)) to the states
/// that should be displayed.
#[must_use]
pub fn visible_states(trace: &[Ray], policy: BlockedRayPolicy) -> Vec<Ray> {
    match policy {
        BlockedRayPolicy::RemoveCompletely => {
            if trace.iter().any(Ray::is_blocked) {
                Vec::new()
            } else {
                trace.to_vec()
            }
        }
        BlockedRayPolicy::StopAtBlock => {
            let end = trace
                .iter()
                .position(Ray::is_blocked)
                .map_or(trace.len(), |i| i + 1);
            trace[..end].to_vec()
        }
    }
}
