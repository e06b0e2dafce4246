#![warn(missing_docs)]
//! Analysis of imaging systems
//!
//! An [`ImagingPath`] is a [`MatrixGroup`] with an object at its front. It determines the aperture stop, the
//! field stop, the field of view, pupils and intermediate images of the system.
//!
//! All positions are absolute axial positions. The object plane (front of the path) is located at
//! `object_position`.
use std::cell::OnceCell;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    elements::{Element, OpticalElement},
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    group::MatrixGroup,
    matrix::RayTransferMatrix,
    ray::{visible_states, BlockedRayPolicy, Ray},
    utils::{is_close, is_zero, EPSILON},
};

/// Fraction of a stop radius used for the default marginal and principal rays so that they stay inside
/// the stops when traced with apertures.
pub const EDGE_MARGIN: f64 = 0.98;

/// Position and diameter of a stop or of a pupil.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// axial position
    pub position: f64,
    /// diameter
    pub diameter: f64,
}

/// A plane conjugate to the object plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conjugate {
    /// axial position of the image plane
    pub position: f64,
    /// transverse magnification
    pub magnification: f64,
}

#[derive(Debug, Clone, Copy)]
struct Stops {
    aperture: Option<Stop>,
    field: Option<Stop>,
    chief_ratio: f64,
}

/// An optical path with an object at its front.
#[derive(Debug, Clone)]
pub struct ImagingPath {
    group: MatrixGroup,
    object_height: f64,
    object_position: f64,
    fan_angle: f64,
    fan_number: usize,
    ray_number: usize,
    limit_object_to_field_of_view: bool,
    blocked_ray_policy: BlockedRayPolicy,
    stops: OnceCell<Stops>,
}
impl Default for ImagingPath {
    fn default() -> Self {
        Self::from_group(MatrixGroup::new("imaging path"))
    }
}
impl ImagingPath {
    /// Creates a new, empty [`ImagingPath`] with default settings.
    ///
    /// Defaults: object height 10, object position 0, fan angle 0.1 rad, 9 rays per fan, 3 object points.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self::from_group(MatrixGroup::new(label))
    }
    /// Creates a new [`ImagingPath`] with default settings from an existing [`MatrixGroup`].
    #[must_use]
    pub fn from_group(group: MatrixGroup) -> Self {
        Self {
            group,
            object_height: 10.0,
            object_position: 0.0,
            fan_angle: 0.1,
            fan_number: 9,
            ray_number: 3,
            limit_object_to_field_of_view: false,
            blocked_ray_policy: BlockedRayPolicy::default(),
            stops: OnceCell::new(),
        }
    }
    fn invalidate(&mut self) {
        self.stops = OnceCell::new();
    }
    /// Returns the underlying [`MatrixGroup`].
    #[must_use]
    pub const fn group(&self) -> &MatrixGroup {
        &self.group
    }
    /// Append an element at the end of the path.
    pub fn append<E: Into<Element>>(&mut self, element: E) {
        self.group.append(element);
        self.invalidate();
    }
    /// Insert an element at the given position.
    ///
    /// # Errors
    ///
    /// This function will return an error if `index` is larger than the number of elements.
    pub fn insert<E: Into<Element>>(&mut self, index: usize, element: E) -> OpmResult<()> {
        self.group.insert(index, element)?;
        self.invalidate();
        Ok(())
    }
    /// Remove the element at the given position and return it.
    ///
    /// # Errors
    ///
    /// This function will return an error if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> OpmResult<Element> {
        let element = self.group.remove(index)?;
        self.invalidate();
        Ok(element)
    }
    /// Returns the full height of the object.
    #[must_use]
    pub const fn object_height(&self) -> f64 {
        self.object_height
    }
    /// Set the full height of the object (centered on the optical axis).
    ///
    /// # Errors
    ///
    /// This function will return an error if the height is not positive and finite.
    pub fn set_object_height(&mut self, object_height: f64) -> OpmResult<()> {
        if object_height <= 0.0 || !object_height.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "object height must be positive and finite".into(),
            ));
        }
        self.object_height = object_height;
        Ok(())
    }
    /// Returns the axial position of the object (the front of the path).
    #[must_use]
    pub const fn object_position(&self) -> f64 {
        self.object_position
    }
    /// Set the axial position of the object (the front of the path).
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    pub fn set_object_position(&mut self, object_position: f64) -> OpmResult<()> {
        if !object_position.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "object position must be finite".into(),
            ));
        }
        self.object_position = object_position;
        Ok(())
    }
    /// Set the parameters of the default ray fans (see [`ImagingPath::rays`]).
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the fan angle is negative or not finite.
    ///   - one of the numbers is zero.
    pub fn set_fan(&mut self, fan_angle: f64, fan_number: usize, ray_number: usize) -> OpmResult<()> {
        if fan_angle.is_sign_negative() || !fan_angle.is_finite() {
            return Err(MatrixOpticsError::Construction(
                "fan angle must be >= 0.0 and finite".into(),
            ));
        }
        if fan_number == 0 || ray_number == 0 {
            return Err(MatrixOpticsError::Construction(
                "number of rays per fan and number of fans must be >= 1".into(),
            ));
        }
        self.fan_angle = fan_angle;
        self.fan_number = fan_number;
        self.ray_number = ray_number;
        Ok(())
    }
    /// Returns the full angle, the number of rays per fan and the number of object points of the default fans.
    #[must_use]
    pub const fn fan(&self) -> (f64, usize, usize) {
        (self.fan_angle, self.fan_number, self.ray_number)
    }
    /// Returns `true` if the displayed object is limited to the field of view.
    #[must_use]
    pub const fn limit_object_to_field_of_view(&self) -> bool {
        self.limit_object_to_field_of_view
    }
    /// Limit the displayed object (and the default rays) to the field of view.
    pub fn set_limit_object_to_field_of_view(&mut self, limit: bool) {
        self.limit_object_to_field_of_view = limit;
    }
    /// Returns how blocked rays are treated by [`ImagingPath::visible_traces`].
    #[must_use]
    pub const fn blocked_ray_policy(&self) -> BlockedRayPolicy {
        self.blocked_ray_policy
    }
    /// Set how blocked rays are treated by [`ImagingPath::visible_traces`].
    pub fn set_blocked_ray_policy(&mut self, policy: BlockedRayPolicy) {
        self.blocked_ray_policy = policy;
    }
    fn stops(&self) -> Stops {
        *self.stops.get_or_init(|| {
            let stops = self.compute_stops();
            debug!(
                "stops of '{}' computed: aperture stop {:?}, field stop {:?}",
                self.group.label(),
                stops.aperture,
                stops.field
            );
            stops
        })
    }
    fn compute_stops(&self) -> Stops {
        let Some((aperture_index, aperture, _)) = self.most_restrictive(&Ray::new(0.0, 1.0), None)
        else {
            return Stops {
                aperture: None,
                field: None,
                chief_ratio: 0.0,
            };
        };
        let field = self
            .chief_ray_relative(1.0, &aperture)
            .and_then(|chief| self.most_restrictive(&chief, Some(aperture_index)))
            .filter(|(_, _, ratio)| *ratio > EPSILON);
        Stops {
            aperture: Some(aperture),
            field: field.map(|(_, stop, _)| stop),
            chief_ratio: field.map_or(0.0, |(_, _, ratio)| ratio),
        }
    }
    /// Trace `ray` ignoring all apertures and return the element with the largest ratio of ray height to
    /// aperture radius together with this ratio. Positions are relative to the front of the path.
    fn most_restrictive(&self, ray: &Ray, excluded: Option<usize>) -> Option<(usize, Stop, f64)> {
        let mut current = *ray;
        let mut result: Option<(usize, Stop, f64)> = None;
        for (index, (z, element)) in self.group.element_positions(0.0).into_iter().enumerate() {
            let output = element.matrix().trace_ray_unbounded(&current);
            let diameter = element.aperture_diameter();
            if diameter.is_finite() && excluded != Some(index) {
                let (height, position) = if output.y().abs() > current.y().abs() {
                    (output.y().abs(), z + element.physical_length())
                } else {
                    (current.y().abs(), z)
                };
                let ratio = if diameter > 0.0 {
                    height / (diameter / 2.0)
                } else {
                    f64::INFINITY
                };
                if result.map_or(true, |(_, _, max_ratio)| ratio > max_ratio) {
                    result = Some((index, Stop { position, diameter }, ratio));
                }
            }
            current = output;
        }
        result
    }
    fn to_absolute(&self, stop: Stop) -> Stop {
        Stop {
            position: self.object_position + stop.position,
            diameter: stop.diameter,
        }
    }
    /// Returns the aperture stop (the element limiting the cone of rays from an on-axis object point) or
    /// `None` if the path has no finite aperture.
    #[must_use]
    pub fn aperture_stop(&self) -> Option<Stop> {
        self.stops().aperture.map(|stop| self.to_absolute(stop))
    }
    /// Returns the field stop (the element limiting the chief rays) or `None` if the field of view is
    /// unlimited.
    #[must_use]
    pub fn field_stop(&self) -> Option<Stop> {
        self.stops().field.map(|stop| self.to_absolute(stop))
    }
    /// Returns the full object height for which the chief ray passes the field stop.
    ///
    /// Returns `f64::INFINITY` if there is no field stop.
    #[must_use]
    pub fn field_of_view(&self) -> f64 {
        let stops = self.stops();
        if stops.field.is_some() && stops.chief_ratio > 0.0 {
            2.0 / stops.chief_ratio
        } else {
            f64::INFINITY
        }
    }
    /// Returns the full image height of an object of the size of the field of view.
    ///
    /// Returns `f64::INFINITY` if the field of view is unlimited or the image is at infinity.
    #[must_use]
    pub fn image_size(&self) -> f64 {
        let field_of_view = self.field_of_view();
        if field_of_view.is_infinite() {
            return f64::INFINITY;
        }
        self.image_position()
            .map_or(f64::INFINITY, |image| {
                field_of_view * image.magnification.abs()
            })
    }
    /// Returns the position of the image of the object (which may be virtual) and its magnification.
    ///
    /// Returns `None` if the image is at infinity.
    #[must_use]
    pub fn image_position(&self) -> Option<Conjugate> {
        let matrix = self.group.matrix();
        let (distance, conjugate) = matrix.forward_conjugate()?;
        Some(Conjugate {
            position: self.object_position + matrix.physical_length() + distance,
            magnification: conjugate.a(),
        })
    }
    fn transfer_to(&self, relative_z: f64) -> OpmResult<RayTransferMatrix> {
        self.group.transfer_matrix(relative_z)
    }
    fn chief_ray_relative(&self, y: f64, aperture_stop: &Stop) -> Option<Ray> {
        let transfer = self.transfer_to(aperture_stop.position).ok()?;
        if transfer.is_imaging() {
            return None;
        }
        Some(Ray::new(y, -transfer.a() * y / transfer.b()))
    }
    /// Returns the ray starting at height `y` in the object plane crossing the axis in the center of the
    /// aperture stop.
    ///
    /// Returns `None` if there is no aperture stop or if the object plane is conjugate to it.
    #[must_use]
    pub fn chief_ray(&self, y: f64) -> Option<Ray> {
        let stop = self.stops().aperture?;
        self.chief_ray_relative(y, &stop)
            .map(|ray| ray.at(self.object_position))
    }
    /// Returns the two rays starting at height `y` in the object plane passing the upper and lower edge of
    /// the aperture stop (at [`EDGE_MARGIN`] of its radius).
    ///
    /// Returns `None` if there is no aperture stop or if the object plane is conjugate to it.
    #[must_use]
    pub fn marginal_rays(&self, y: f64) -> Option<(Ray, Ray)> {
        let stop = self.stops().aperture?;
        let transfer = self.transfer_to(stop.position).ok()?;
        if transfer.is_imaging() {
            return None;
        }
        let edge = stop.diameter / 2.0 * EDGE_MARGIN;
        let upper = (edge - transfer.a() * y) / transfer.b();
        let lower = (-edge - transfer.a() * y) / transfer.b();
        Some((
            Ray::new(y, upper).at(self.object_position),
            Ray::new(y, lower).at(self.object_position),
        ))
    }
    /// Returns the upper marginal ray from the on-axis object point.
    #[must_use]
    pub fn axial_ray(&self) -> Option<Ray> {
        self.marginal_rays(0.0).map(|(upper, _)| upper)
    }
    /// Returns the chief ray from the edge of the field of view (at [`EDGE_MARGIN`] of its half height).
    ///
    /// If the field of view is unlimited, the chief ray from the top of the object is returned. Returns `None`
    /// if there is no chief ray (see [`ImagingPath::chief_ray`]).
    #[must_use]
    pub fn principal_ray(&self) -> Option<Ray> {
        let field_of_view = self.field_of_view();
        let y = if field_of_view.is_finite() {
            field_of_view / 2.0 * EDGE_MARGIN
        } else {
            self.object_height / 2.0
        };
        self.chief_ray(y)
    }
    /// Returns the Lagrange invariant `n·(y1·θ2 - y2·θ1)` of two rays at the axial position `z`.
    ///
    /// If no rays are given, the axial ray and the principal ray are used. Both rays start in the object plane.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - no rays are given and the system has no aperture stop (no axial or principal ray).
    ///   - `z` lies inside an element which cannot be split.
    pub fn lagrange_invariant(&self, z: f64, rays: Option<(Ray, Ray)>) -> OpmResult<f64> {
        let (ray1, ray2) = match rays {
            Some(rays) => rays,
            None => (
                self.axial_ray().ok_or_else(|| {
                    MatrixOpticsError::ImagingPath(
                        "no axial ray: the path has no aperture stop or the object is conjugate to it"
                            .into(),
                    )
                })?,
                self.principal_ray().ok_or_else(|| {
                    MatrixOpticsError::ImagingPath(
                        "no principal ray: the path has no aperture stop or the object is conjugate to it"
                            .into(),
                    )
                })?,
            ),
        };
        let transfer = self.transfer_to(z - self.object_position)?;
        let out1 = transfer.trace_ray_unbounded(&ray1);
        let out2 = transfer.trace_ray_unbounded(&ray2);
        Ok(transfer.back_index() * (out1.y() * out2.theta() - out2.y() * out1.theta()))
    }
    /// Returns the image of the aperture stop seen from the object side or `None` if there is no aperture stop
    /// or the entrance pupil is at infinity.
    #[must_use]
    pub fn entrance_pupil(&self) -> Option<Stop> {
        let stop = self.stops().aperture?;
        let transfer = self.transfer_to(stop.position).ok()?;
        let (distance, conjugate) = transfer.backward_conjugate()?;
        Some(Stop {
            position: self.object_position - distance,
            diameter: stop.diameter / conjugate.a().abs(),
        })
    }
    /// Returns the image of the aperture stop seen from the image side or `None` if there is no aperture stop
    /// or the exit pupil is at infinity.
    #[must_use]
    pub fn exit_pupil(&self) -> Option<Stop> {
        let stop = self.stops().aperture?;
        let transfer = self.group.transfer_matrix_from(stop.position).ok()?;
        let (distance, conjugate) = transfer.forward_conjugate()?;
        Some(Stop {
            position: self.object_position
                + stop.position
                + transfer.physical_length()
                + distance,
            diameter: stop.diameter * conjugate.a().abs(),
        })
    }
    /// Returns all real images of the object formed inside the path.
    ///
    /// An image is reported behind an element if it is formed before the next element with a physical surface.
    #[must_use]
    pub fn intermediate_conjugates(&self) -> Vec<Conjugate> {
        let elements = self.group.element_positions(0.0);
        let length = self.group.physical_length();
        let mut transfer = RayTransferMatrix::identity_in(self.group.matrix().front_index());
        let mut conjugates: Vec<Conjugate> = Vec::new();
        for (index, (z, element)) in elements.iter().enumerate() {
            transfer = element.matrix().multiply(&transfer);
            let Some((distance, conjugate)) = transfer.forward_conjugate() else {
                continue;
            };
            if distance < -EPSILON {
                continue;
            }
            let plane = z + element.physical_length() + distance;
            if is_zero(plane) || plane > length + EPSILON {
                continue;
            }
            let next_surface = elements[index + 1..]
                .iter()
                .find(|(_, e)| !e.is_space())
                .map(|(z, _)| *z);
            if next_surface.is_some_and(|next| plane > next + EPSILON) {
                continue;
            }
            let position = self.object_position + plane;
            if conjugates.iter().any(|c| is_close(c.position, position)) {
                continue;
            }
            conjugates.push(Conjugate {
                position,
                magnification: conjugate.a(),
            });
        }
        conjugates
    }
    /// Returns the object height used for display and for the default rays.
    ///
    /// This is the field of view if the object is limited to it (and the field of view is finite) or the
    /// object height otherwise.
    #[must_use]
    pub fn display_object_height(&self) -> f64 {
        if self.limit_object_to_field_of_view {
            let field_of_view = self.field_of_view();
            if field_of_view.is_finite() {
                return field_of_view;
            }
            warn!("field of view is infinite: using the object height instead");
        }
        self.object_height
    }
    /// Returns the transverse range (full height) needed to display the path.
    ///
    /// This is the largest element diameter, but at least the displayed object and all its intermediate images.
    #[must_use]
    pub fn display_range(&self) -> f64 {
        let object_height = self.display_object_height();
        let mut range = self
            .group
            .largest_diameter()
            .filter(|d| *d >= object_height)
            .unwrap_or(object_height);
        for conjugate in self.intermediate_conjugates() {
            range = range.max(object_height * conjugate.magnification.abs());
        }
        range
    }
    /// Returns the default fans of rays: `ray_number` object points evenly spread over the displayed object, each
    /// emitting `fan_number` rays within the full `fan_angle`.
    #[must_use]
    pub fn rays(&self) -> Vec<Ray> {
        let half_height = self.display_object_height() / 2.0;
        let half_angle = self.fan_angle / 2.0;
        Ray::fan_group(
            -half_height,
            half_height,
            self.ray_number,
            -half_angle,
            half_angle,
            self.fan_number,
        )
        .into_iter()
        .map(|ray| ray.at(self.object_position))
        .collect()
    }
    /// Propagate a [`Ray`] through the path, see [`MatrixGroup::trace`].
    #[must_use]
    pub fn trace(&self, ray: &Ray) -> Vec<Ray> {
        self.group.trace(ray)
    }
    /// Propagate many rays independently, see [`MatrixGroup::trace_many`].
    #[must_use]
    pub fn trace_many(&self, rays: &[Ray]) -> Vec<Vec<Ray>> {
        self.group.trace_many(rays)
    }
    /// Trace the default rays (see [`ImagingPath::rays`]) and reduce every trace according to the
    /// [`BlockedRayPolicy`] of this path. Traces without any visible state are omitted.
    #[must_use]
    pub fn visible_traces(&self) -> Vec<Vec<Ray>> {
        self.trace_many(&self.rays())
            .iter()
            .map(|trace| visible_states(trace, self.blocked_ray_policy))
            .filter(|trace| !trace.is_empty())
            .collect()
    }
}
impl OpticalElement for ImagingPath {
    fn matrix(&self) -> &RayTransferMatrix {
        self.group.matrix()
    }
    fn flip_orientation(&mut self) {
        self.group.flip_orientation();
        self.invalidate();
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        self.group.transfer_matrix(up_to)
    }
    fn trace_ray(&self, ray: &Ray) -> Vec<Ray> {
        self.group.trace_ray(ray)
    }
    fn trace_beam(&self, beam: &GaussianBeam) -> Vec<GaussianBeam> {
        self.group.trace_beam(beam)
    }
}
