#![warn(missing_docs)]
//! Report of the derived quantities of an optical path
//!
//! A [`PathReport`] collects focal lengths, cardinal points, stops, pupils and (for laser paths) beam waists
//! and eigenmodes. It is serialized to YAML or JSON by the `matrixoptics` binary.
use log::debug;
use serde::Serialize;

use crate::{
    elements::OpticalElement,
    error::OpmResult,
    gaussian_beam::GaussianBeam,
    group::MatrixGroup,
    imaging_path::{Conjugate, ImagingPath, Stop},
    laser_path::{LaserPath, Waist},
    system_file::OpticalPath,
};

/// Cardinal points and matrix of a [`MatrixGroup`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MatrixReport {
    /// coefficients `[[A, B], [C, D]]`
    pub abcd: [[f64; 2]; 2],
    /// front and back index
    pub indices: (f64, f64),
    /// physical length
    pub physical_length: f64,
    /// front and back effective focal length (`None` if afocal)
    pub effective_focal_lengths: Option<(f64, f64)>,
    /// front focal length (from the front vertex)
    pub front_focal_length: Option<f64>,
    /// back focal length (from the back vertex)
    pub back_focal_length: Option<f64>,
    /// absolute positions of the principal planes
    pub principal_planes: Option<(f64, f64)>,
    /// absolute positions of the focal points
    pub focal_points: Option<(f64, f64)>,
}
impl MatrixReport {
    /// Creates a new [`MatrixReport`] of the given group placed at `z`.
    #[must_use]
    pub fn new(group: &MatrixGroup, z: f64) -> Self {
        let matrix = group.matrix();
        Self {
            abcd: [[matrix.a(), matrix.b()], [matrix.c(), matrix.d()]],
            indices: (matrix.front_index(), matrix.back_index()),
            physical_length: group.physical_length(),
            effective_focal_lengths: (!matrix.is_afocal()).then(|| group.effective_focal_lengths()),
            front_focal_length: group.front_focal_length(),
            back_focal_length: group.back_focal_length(),
            principal_planes: group.principal_plane_positions(z),
            focal_points: group.focus_positions(z),
        }
    }
}

/// Stops, pupils and conjugates of an [`ImagingPath`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImagingReport {
    /// full object height
    pub object_height: f64,
    /// aperture stop
    pub aperture_stop: Option<Stop>,
    /// field stop
    pub field_stop: Option<Stop>,
    /// full field of view (`None` if unlimited)
    pub field_of_view: Option<f64>,
    /// full image size (`None` if unlimited or the image is at infinity)
    pub image_size: Option<f64>,
    /// image of the object
    pub image: Option<Conjugate>,
    /// real images inside the path
    pub intermediate_conjugates: Vec<Conjugate>,
    /// entrance pupil
    pub entrance_pupil: Option<Stop>,
    /// exit pupil
    pub exit_pupil: Option<Stop>,
    /// Lagrange invariant of the axial and the principal ray
    pub lagrange_invariant: Option<f64>,
    /// number of default rays left after the treatment of blocked rays
    pub visible_rays: usize,
}
impl ImagingReport {
    /// Creates a new [`ImagingReport`]. The Lagrange invariant is evaluated at `z`.
    ///
    /// # Errors
    ///
    /// This function will return an error if `z` lies inside an element which cannot be split.
    pub fn new(path: &ImagingPath, z: f64) -> OpmResult<Self> {
        let lagrange_invariant = if path.axial_ray().is_some() && path.principal_ray().is_some() {
            Some(path.lagrange_invariant(z, None)?)
        } else {
            debug!("no Lagrange invariant for '{}'", path.group().label());
            None
        };
        Ok(Self {
            object_height: path.object_height(),
            aperture_stop: path.aperture_stop(),
            field_stop: path.field_stop(),
            field_of_view: Some(path.field_of_view()).filter(|v| v.is_finite()),
            image_size: Some(path.image_size()).filter(|v| v.is_finite()),
            image: path.image_position(),
            intermediate_conjugates: path.intermediate_conjugates(),
            entrance_pupil: path.entrance_pupil(),
            exit_pupil: path.exit_pupil(),
            lagrange_invariant,
            visible_rays: path.visible_traces().len(),
        })
    }
}

/// Beam waists and eigenmodes of a [`LaserPath`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LaserReport {
    /// waists of the input beam behind every element
    pub waists: Vec<Waist>,
    /// beam radius at the end of the path
    pub output_radius: Option<f64>,
    /// finite eigenmodes of the path used as a resonator round trip
    pub laser_modes: Vec<Waist>,
}
impl LaserReport {
    /// Creates a new [`LaserReport`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the eigenmodes cannot be computed.
    pub fn new(path: &LaserPath) -> OpmResult<Self> {
        let (waists, output_radius, wavelength) = match path.input_beam() {
            Some(beam) => (
                path.waists(beam),
                path.trace(beam).last().map(GaussianBeam::w),
                Some(beam.wavelength()),
            ),
            None => (Vec::new(), None, None),
        };
        let laser_modes = match wavelength {
            Some(wavelength) => path
                .laser_modes(wavelength)?
                .iter()
                .filter_map(|mode| {
                    mode.waist().map(|radius| Waist {
                        position: mode.z() + mode.waist_position(),
                        radius,
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        Ok(Self {
            waists,
            output_radius,
            laser_modes,
        })
    }
}

/// Path specific part of a [`PathReport`].
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathDetails {
    /// report of an [`ImagingPath`]
    Imaging(ImagingReport),
    /// report of a [`LaserPath`]
    Laser(LaserReport),
}

/// Report of all derived quantities of an [`OpticalPath`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PathReport {
    matrixoptics_version: String,
    label: String,
    number_of_elements: usize,
    matrix: MatrixReport,
    details: PathDetails,
}
impl PathReport {
    /// Creates a new [`PathReport`]. The Lagrange invariant of imaging paths is evaluated at `z`.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the quantities cannot be computed.
    pub fn new(path: &OpticalPath, z: f64) -> OpmResult<Self> {
        let group = path.group();
        let (origin, details) = match path {
            OpticalPath::Imaging(path) => (
                path.object_position(),
                PathDetails::Imaging(ImagingReport::new(path, z)?),
            ),
            OpticalPath::Laser(path) => (0.0, PathDetails::Laser(LaserReport::new(path)?)),
        };
        Ok(Self {
            matrixoptics_version: env!("CARGO_PKG_VERSION").to_string(),
            label: group.label().to_string(),
            number_of_elements: group.len(),
            matrix: MatrixReport::new(group, origin),
            details,
        })
    }
    /// Returns the path specific part of this [`PathReport`].
    #[must_use]
    pub const fn details(&self) -> &PathDetails {
        &self.details
    }
    /// Returns the matrix part of this [`PathReport`].
    #[must_use]
    pub const fn matrix(&self) -> &MatrixReport {
        &self.matrix
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        elements::{Lens, Space},
        system_file::SystemDescription,
    };
    use approx::assert_relative_eq;

    fn lagrange_path() -> ImagingPath {
        let mut path = ImagingPath::new("lagrange");
        path.append(Space::new(5.0, 1.0).unwrap());
        path.append(Lens::new(5.0, 10.0).unwrap());
        path.append(Space::new(15.0, 1.0).unwrap());
        path.append(Lens::new(10.0, 10.0).unwrap());
        path.append(Space::new(10.0, 1.0).unwrap());
        path
    }
    #[test]
    fn imaging_report() {
        let report = ImagingReport::new(&lagrange_path(), 0.0).unwrap();
        assert_eq!(report.aperture_stop.unwrap().position, 5.0);
        assert_relative_eq!(report.field_of_view.unwrap(), 10.0 / 3.0, max_relative = 1e-9);
        assert_eq!(report.intermediate_conjugates.len(), 1);
        assert!(report.lagrange_invariant.unwrap().is_finite());
    }
    #[test]
    fn imaging_report_without_stop() {
        let mut path = ImagingPath::new("no stop");
        path.append(Space::new(10.0, 1.0).unwrap());
        let report = ImagingReport::new(&path, 0.0).unwrap();
        assert!(report.aperture_stop.is_none());
        assert!(report.lagrange_invariant.is_none());
        assert!(report.field_of_view.is_none());
        assert!(report.image_size.is_none());
        assert_eq!(report.visible_rays, 27);
    }
    #[test]
    fn json_report_of_unlimited_path() {
        let mut path = ImagingPath::new("free space");
        path.append(Space::new(10.0, 1.0).unwrap());
        path.append(Lens::new(f64::INFINITY, f64::INFINITY).unwrap());
        let report = PathReport::new(&OpticalPath::Imaging(path), 0.0).unwrap();
        assert!(report.matrix().effective_focal_lengths.is_none());
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string_pretty(&report).unwrap()).unwrap();
        assert!(json["matrix"]["effective_focal_lengths"].is_null());
        assert!(json["details"]["field_of_view"].is_null());
        assert_eq!(json["details"]["kind"], "imaging");
        assert_eq!(json["details"]["visible_rays"], 27);
        assert_eq!(json["matrix"]["physical_length"], 10.0);
    }
    #[test]
    fn path_report() {
        let report = PathReport::new(&OpticalPath::Imaging(lagrange_path()), 0.0).unwrap();
        assert_eq!(report.number_of_elements, 5);
        assert_eq!(report.matrix().physical_length, 30.0);
        assert!(matches!(report.details(), PathDetails::Imaging(_)));
        assert!(serde_yaml::to_string(&report).is_ok());
        assert!(serde_json::to_string_pretty(&report).is_ok());
    }
    #[test]
    fn laser_report() {
        let description = SystemDescription::from_yaml(
            "
path:
  kind: laser
  input_beam: {w: 1.0, wavelength: 0.001}
elements:
  - type: space
    d: 10.0
  - type: lens
    f: 50.0
  - type: space
    d: 100.0
",
        )
        .unwrap();
        let path = description.build().unwrap();
        let report = PathReport::new(&path, 0.0).unwrap();
        let PathDetails::Laser(laser) = report.details() else {
            panic!("expected a laser report");
        };
        assert_eq!(laser.waists.len(), 3);
        assert!(laser.output_radius.unwrap() > 0.0);
        // A + D = -0.2: stable round trip with a single finite eigenmode
        assert_eq!(laser.laser_modes.len(), 1);
        assert!(laser.laser_modes[0].radius > 0.0);
    }
}
