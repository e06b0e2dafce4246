#![warn(missing_docs)]
//! Description of an optical path in a YAML or JSON file
//!
//! A [`SystemDescription`] lists the elements of a path together with the settings of the path. It is
//! deserialized with `serde_yaml` or `serde_json` and turned into an [`ImagingPath`] or a [`LaserPath`] by
//! [`SystemDescription::build`].
//!
//! ```yaml
//! label: two lenses
//! path:
//!   kind: imaging
//!   object_height: 1.0
//! elements:
//!   - type: space
//!     d: 5.0
//!   - type: lens
//!     f: 5.0
//!     diameter: 10.0
//! ```
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    compound::{
        AchromatDoubletLens, AchromatParams, NominalCheck, Objective, ObjectiveParams, SingletLens,
        SingletParams,
    },
    elements::{
        Aperture, CurvedMirror, DielectricInterface, Element, Lens, Mirror, OpticalElement, Space,
        ThickLens,
    },
    error::{MatrixOpticsError, OpmResult},
    gaussian_beam::GaussianBeam,
    group::MatrixGroup,
    imaging_path::ImagingPath,
    laser_path::LaserPath,
    matrix::RayTransferMatrix,
    ray::BlockedRayPolicy,
    utils::unlimited,
};

const fn vacuum() -> f64 {
    1.0
}

/// Description of a single element.
///
/// Diameters are optional and default to an infinite clear aperture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementDescription {
    /// free propagation over `d` in a medium of index `n`
    Space {
        /// distance
        d: f64,
        /// refractive index
        #[serde(default = "vacuum")]
        n: f64,
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// thin lens
    Lens {
        /// focal length (`null` for a window)
        #[serde(with = "unlimited")]
        f: f64,
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// thick lens in air
    ThickLens {
        /// refractive index of the lens
        n: f64,
        /// radius of the front surface (`null` if flat)
        #[serde(with = "unlimited")]
        r1: f64,
        /// radius of the rear surface (`null` if flat)
        #[serde(with = "unlimited")]
        r2: f64,
        /// center thickness
        thickness: f64,
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// plane parallel plate in air
    DielectricSlab {
        /// refractive index of the plate
        n: f64,
        /// thickness
        thickness: f64,
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// aperture stop
    Aperture {
        /// diameter
        diameter: f64,
    },
    /// flat mirror
    Mirror {
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// spherical mirror
    CurvedMirror {
        /// radius of curvature (`null` if flat)
        #[serde(with = "unlimited")]
        r: f64,
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// spherical interface between two media
    DielectricInterface {
        /// index in front of the interface
        n1: f64,
        /// index behind the interface
        n2: f64,
        /// radius of curvature (`null` if flat)
        #[serde(with = "unlimited")]
        r: f64,
        /// clear aperture
        #[serde(default)]
        diameter: Option<f64>,
    },
    /// hand-built ray-transfer matrix
    Matrix {
        /// coefficient A
        a: f64,
        /// coefficient B
        b: f64,
        /// coefficient C
        c: f64,
        /// coefficient D
        d: f64,
        /// front index
        #[serde(default = "vacuum")]
        n1: f64,
        /// back index
        #[serde(default = "vacuum")]
        n2: f64,
        /// physical length
        #[serde(default)]
        physical_length: f64,
    },
    /// achromatic doublet from nominal data
    Achromat(AchromatParams),
    /// singlet lens from nominal data
    Singlet(SingletParams),
    /// microscope objective from nominal data
    Objective(ObjectiveParams),
    /// nested group of elements
    Group {
        /// elements of the group
        elements: Vec<ElementEntry>,
    },
}

/// An element of a [`SystemDescription`] with its optional label and orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    /// label of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// use the element backwards
    #[serde(default)]
    pub flipped: bool,
    /// the element
    #[serde(flatten)]
    pub element: ElementDescription,
}
impl From<ElementDescription> for ElementEntry {
    fn from(element: ElementDescription) -> Self {
        Self {
            label: None,
            flipped: false,
            element,
        }
    }
}
impl ElementEntry {
    /// Build the [`Element`] described by this entry.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element cannot be constructed from the given parameters.
    pub fn build(&self, check: &NominalCheck) -> OpmResult<Element> {
        let label = self.label.clone().unwrap_or_default();
        let diameter = |d: &Option<f64>| d.unwrap_or(f64::INFINITY);
        let mut element: Element = match &self.element {
            ElementDescription::Space { d, n, diameter: dia } => {
                let space = Space::new(*d, *n)?;
                match dia {
                    Some(dia) => space.with_diameter(*dia)?.into(),
                    None => space.into(),
                }
            }
            ElementDescription::Lens { f, diameter: dia } => Lens::new(*f, diameter(dia))?.into(),
            ElementDescription::ThickLens {
                n,
                r1,
                r2,
                thickness,
                diameter: dia,
            } => ThickLens::new(*n, *r1, *r2, *thickness, diameter(dia))?.into(),
            ElementDescription::DielectricSlab {
                n,
                thickness,
                diameter: dia,
            } => ThickLens::slab(*n, *thickness, diameter(dia))?.into(),
            ElementDescription::Aperture { diameter } => Aperture::new(*diameter)?.into(),
            ElementDescription::Mirror { diameter: dia } => Mirror::new(diameter(dia))?.into(),
            ElementDescription::CurvedMirror { r, diameter: dia } => {
                CurvedMirror::new(*r, diameter(dia))?.into()
            }
            ElementDescription::DielectricInterface {
                n1,
                n2,
                r,
                diameter: dia,
            } => DielectricInterface::new(*n1, *n2, *r, diameter(dia))?.into(),
            ElementDescription::Matrix {
                a,
                b,
                c,
                d,
                n1,
                n2,
                physical_length,
            } => RayTransferMatrix::new(*a, *b, *c, *d, *n1, *n2)?
                .with_physical_length(*physical_length)?
                .into(),
            ElementDescription::Achromat(params) => {
                let mut params = params.clone();
                if self.label.is_some() {
                    params.label.clone_from(&label);
                }
                AchromatDoubletLens::new(params, check)?.into()
            }
            ElementDescription::Singlet(params) => {
                let mut params = params.clone();
                if self.label.is_some() {
                    params.label.clone_from(&label);
                }
                SingletLens::new(params, check)?.into()
            }
            ElementDescription::Objective(params) => {
                let mut params = params.clone();
                if self.label.is_some() {
                    params.label.clone_from(&label);
                }
                Objective::new(params, check)?.into()
            }
            ElementDescription::Group { elements } => {
                let elements = elements
                    .iter()
                    .map(|entry| entry.build(check))
                    .collect::<OpmResult<Vec<Element>>>()?;
                MatrixGroup::from_elements(&label, elements).into()
            }
        };
        if self.label.is_some() {
            element = element.with_label(&label);
        }
        if self.flipped {
            element.flip_orientation();
        }
        Ok(element)
    }
}

/// Settings of the default rays of an [`ImagingPath`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanDescription {
    /// full angle of each fan
    pub angle: f64,
    /// number of rays per fan
    pub fan_number: usize,
    /// number of object points
    pub ray_number: usize,
}

/// A Gaussian beam given by its radius and radius of curvature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamDescription {
    /// beam radius
    pub w: f64,
    /// radius of curvature (default: beam at its waist)
    #[serde(default)]
    pub r: Option<f64>,
    /// vacuum wavelength in the length unit of the path
    pub wavelength: f64,
    /// refractive index of the medium
    #[serde(default = "vacuum")]
    pub n: f64,
}
impl BeamDescription {
    /// Build the [`GaussianBeam`] of this description.
    ///
    /// # Errors
    ///
    /// This function will return an error if the beam parameters are invalid.
    pub fn build(&self) -> OpmResult<GaussianBeam> {
        GaussianBeam::from_radius(
            self.w,
            self.r.unwrap_or(f64::INFINITY),
            self.wavelength,
            self.n,
        )
    }
}

/// Kind and settings of the described path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathDescription {
    /// an [`ImagingPath`]
    Imaging {
        /// full object height
        #[serde(default)]
        object_height: Option<f64>,
        /// axial position of the object
        #[serde(default)]
        object_position: Option<f64>,
        /// default ray fans
        #[serde(default)]
        fan: Option<FanDescription>,
        /// limit the displayed object to the field of view
        #[serde(default)]
        limit_object_to_field_of_view: bool,
        /// treatment of blocked rays in the displayed traces
        #[serde(default)]
        blocked_rays: BlockedRayPolicy,
    },
    /// a [`LaserPath`]
    Laser {
        /// beam entering the path
        #[serde(default)]
        input_beam: Option<BeamDescription>,
    },
}

/// A path built from a [`SystemDescription`].
#[derive(Debug, Clone)]
pub enum OpticalPath {
    /// path for ray tracing
    Imaging(ImagingPath),
    /// path for Gaussian beams
    Laser(LaserPath),
}
impl OpticalPath {
    /// Returns the elements of this path.
    #[must_use]
    pub fn group(&self) -> &MatrixGroup {
        match self {
            Self::Imaging(path) => path.group(),
            Self::Laser(path) => path.group(),
        }
    }
}

/// Description of a complete optical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDescription {
    /// label of the path
    #[serde(default)]
    pub label: String,
    /// kind and settings of the path
    pub path: PathDescription,
    /// tolerances for compound lenses built from nominal data
    #[serde(default)]
    pub nominal_check: Option<NominalCheck>,
    /// elements of the path in propagation order
    pub elements: Vec<ElementEntry>,
}
impl SystemDescription {
    /// Parse a [`SystemDescription`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string is not a valid description.
    pub fn from_yaml(yaml: &str) -> OpmResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| MatrixOpticsError::Other(format!("parsing of system description failed: {e}")))
    }
    /// Parse a [`SystemDescription`] from a JSON string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string is not a valid description.
    pub fn from_json(json: &str) -> OpmResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MatrixOpticsError::Other(format!("parsing of system description failed: {e}")))
    }
    /// Read a [`SystemDescription`] from a file.
    ///
    /// Files with the extension `json` are parsed as JSON, all others as YAML.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing of the file failed.
    pub fn from_file(path: &Path) -> OpmResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            MatrixOpticsError::Other(format!("cannot read file {} : {}", path.display(), e))
        })?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }
    /// Serialize this [`SystemDescription`] to YAML.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn to_yaml(&self) -> OpmResult<String> {
        serde_yaml::to_string(self).map_err(|e| {
            MatrixOpticsError::Other(format!("serialization of system description failed: {e}"))
        })
    }
    /// Serialize this [`SystemDescription`] to pretty printed JSON.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn to_json(&self) -> OpmResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            MatrixOpticsError::Other(format!("serialization of system description failed: {e}"))
        })
    }
    /// Build the elements of the description into a [`MatrixGroup`].
    ///
    /// # Errors
    ///
    /// This function will return an error if an element cannot be constructed.
    pub fn build_group(&self) -> OpmResult<MatrixGroup> {
        let check = self.nominal_check.unwrap_or_default();
        let elements = self
            .elements
            .iter()
            .map(|entry| entry.build(&check))
            .collect::<OpmResult<Vec<Element>>>()?;
        Ok(MatrixGroup::from_elements(&self.label, elements))
    }
    /// Build the described path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - an element cannot be constructed.
    ///   - a setting of the path is invalid.
    pub fn build(&self) -> OpmResult<OpticalPath> {
        let group = self.build_group()?;
        match &self.path {
            PathDescription::Imaging {
                object_height,
                object_position,
                fan,
                limit_object_to_field_of_view,
                blocked_rays,
            } => {
                let mut path = ImagingPath::from_group(group);
                if let Some(height) = object_height {
                    path.set_object_height(*height)?;
                }
                if let Some(position) = object_position {
                    path.set_object_position(*position)?;
                }
                if let Some(fan) = fan {
                    path.set_fan(fan.angle, fan.fan_number, fan.ray_number)?;
                }
                path.set_limit_object_to_field_of_view(*limit_object_to_field_of_view);
                path.set_blocked_ray_policy(*blocked_rays);
                Ok(OpticalPath::Imaging(path))
            }
            PathDescription::Laser { input_beam } => {
                let mut path = LaserPath::from_group(group);
                let beam = input_beam.as_ref().map(BeamDescription::build).transpose()?;
                path.set_input_beam(beam);
                Ok(OpticalPath::Laser(path))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;

    const LAGRANGE_SYSTEM: &str = "
label: lagrange
path:
  kind: imaging
  object_height: 1.0
elements:
  - type: space
    d: 5.0
  - type: lens
    f: 5.0
    diameter: 10.0
  - type: space
    d: 15.0
  - type: lens
    f: 10.0
    diameter: 10.0
  - type: space
    d: 10.0
";
    #[test]
    fn from_yaml() {
        let description = SystemDescription::from_yaml(LAGRANGE_SYSTEM).unwrap();
        assert_eq!(description.label, "lagrange");
        assert_eq!(description.elements.len(), 5);
        assert_eq!(
            description.elements[1].element,
            ElementDescription::Lens {
                f: 5.0,
                diameter: Some(10.0)
            }
        );
        let OpticalPath::Imaging(path) = description.build().unwrap() else {
            panic!("expected an imaging path");
        };
        assert_eq!(path.object_height(), 1.0);
        assert_relative_eq!(path.group().physical_length(), 30.0);
        assert_relative_eq!(path.field_of_view(), 10.0 / 3.0, max_relative = 1e-9);
    }
    #[test]
    fn from_json() {
        let json = r#"{
            "path": {"kind": "laser", "input_beam": {"w": 1.0, "wavelength": 0.001}},
            "elements": [
                {"type": "space", "d": 10.0},
                {"type": "lens", "f": 10.0, "label": "focusing lens"}
            ]
        }"#;
        let description = SystemDescription::from_json(json).unwrap();
        let OpticalPath::Laser(path) = description.build().unwrap() else {
            panic!("expected a laser path");
        };
        assert!(path.input_beam().is_some());
        assert_eq!(path.group().elements()[1].label(), "focusing lens");
    }
    #[test]
    fn json_round_trip_of_unlimited_elements() {
        let yaml = "
label: unlimited
path:
  kind: imaging
  blocked_rays: stop_at_block
elements:
  - {type: space, d: 5.0}
  - {type: lens, f: .inf}
  - {type: thick_lens, n: 1.5, r1: 20.0, r2: .inf, thickness: 3.0, diameter: 12.0}
  - {type: dielectric_interface, n1: 1.0, n2: 1.5, r: .inf}
";
        let description = SystemDescription::from_yaml(yaml).unwrap();
        let json = description.to_json().unwrap();
        assert!(json.contains(r#""f": null"#));
        assert!(json.contains(r#""r2": null"#));
        let read_back = SystemDescription::from_json(&json).unwrap();
        assert_eq!(read_back, description);
        let OpticalPath::Imaging(path) = read_back.build().unwrap() else {
            panic!("expected an imaging path");
        };
        assert_eq!(path.blocked_ray_policy(), BlockedRayPolicy::StopAtBlock);
        assert_eq!(path.group().elements()[1].aperture_diameter(), f64::INFINITY);
        assert_eq!(path.group().elements()[1].matrix().c(), 0.0);
        let elements = serde_json::to_string(path.group().elements()).unwrap();
        assert!(elements.contains(r#""aperture_diameter":null"#));
        assert!(elements.contains(r#""focal_length":null"#));
    }
    #[test]
    fn invalid_values_rejected() {
        let matrix = |a: f64, n1: f64, length: f64| SystemDescription {
            label: String::new(),
            path: PathDescription::Laser { input_beam: None },
            nominal_check: None,
            elements: vec![ElementEntry {
                label: None,
                flipped: false,
                element: ElementDescription::Matrix {
                    a,
                    b: 0.0,
                    c: 0.0,
                    d: 1.0,
                    n1,
                    n2: 1.0,
                    physical_length: length,
                },
            }],
        };
        assert!(matrix(1.0, 1.0, 2.0).build().is_ok());
        assert!(matrix(-2.0, 1.0, 0.0).build().is_err());
        assert!(matrix(1.0, 1.0, -5.0).build().is_err());
        assert!(matrix(0.2, 0.2, 0.0).build().is_err());
        assert!(SystemDescription::from_json(
            r#"{"path": {"kind": "laser"}, "elements": [{"type": "aperture", "diameter": -3.0}]}"#
        )
        .unwrap()
        .build()
        .is_err());
    }
    #[test]
    fn rebuilt_group_follows_elements() {
        let mut description = SystemDescription::from_yaml(LAGRANGE_SYSTEM).unwrap();
        let group = description.build_group().unwrap();
        assert_eq!(group.len(), 5);
        assert_relative_eq!(group.matrix().a(), -2.0, max_relative = 1e-12);
        assert!(group.has_finite_aperture_diameter());
        description
            .elements
            .retain(|entry| !matches!(entry.element, ElementDescription::Lens { .. }));
        let group = description.build_group().unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.matrix().a(), 1.0);
        assert_relative_eq!(group.matrix().b(), 30.0);
        assert!(!group.has_finite_aperture_diameter());
    }
    #[test]
    fn wrong_input() {
        assert_matches!(
            SystemDescription::from_yaml("path: {kind: imaging}\nelements:\n  - type: prism\n"),
            Err(MatrixOpticsError::Other(_))
        );
        assert!(SystemDescription::from_json("{").is_err());
        let description = SystemDescription::from_yaml(
            "path: {kind: imaging}\nelements:\n  - type: aperture\n    diameter: -1.0\n",
        )
        .unwrap();
        assert!(description.build().is_err());
        let description =
            SystemDescription::from_yaml("path: {kind: imaging, object_height: -1.0}\nelements: []\n")
                .unwrap();
        assert!(description.build().is_err());
    }
    #[test]
    fn flipped_and_nested() {
        let yaml = "
path: {kind: imaging}
elements:
  - type: group
    label: relay
    flipped: true
    elements:
      - type: thick_lens
        n: 1.5
        r1: 10.0
        r2: -20.0
        thickness: 2.0
      - type: space
        d: 3.0
";
        let group = SystemDescription::from_yaml(yaml)
            .unwrap()
            .build_group()
            .unwrap();
        let relay = &group.elements()[0];
        assert!(relay.is_group());
        assert!(relay.is_flipped());
        assert_eq!(relay.label(), "relay");
        assert_relative_eq!(relay.physical_length(), 5.0);
    }
    #[test]
    fn compound_elements() {
        let yaml = "
path: {kind: imaging}
nominal_check:
  focal_length_tolerance: .inf
  edge_thickness_tolerance: .inf
  warn_untested_model: false
elements:
  - type: objective
    label: 10x
    f: 10.0
    na: 0.25
    focus_to_focus_length: 40.0
    back_aperture: 7.0
    working_distance: 2.0
";
        let group = SystemDescription::from_yaml(yaml)
            .unwrap()
            .build_group()
            .unwrap();
        assert_eq!(group.elements()[0].label(), "10x");
        assert_relative_eq!(group.physical_length(), 40.0, max_relative = 1e-12);
    }
    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("system.yaml");
        fs::write(&yaml_path, LAGRANGE_SYSTEM).unwrap();
        let description = SystemDescription::from_file(&yaml_path).unwrap();
        let json_path = dir.path().join("system.json");
        fs::write(&json_path, serde_json::to_string(&description).unwrap()).unwrap();
        assert_eq!(SystemDescription::from_file(&json_path).unwrap(), description);
        assert!(SystemDescription::from_file(&dir.path().join("missing.yaml")).is_err());
    }
    #[test]
    fn to_yaml() {
        let description = SystemDescription::from_yaml(LAGRANGE_SYSTEM).unwrap();
        let yaml = description.to_yaml().unwrap();
        assert_eq!(SystemDescription::from_yaml(&yaml).unwrap(), description);
    }
}
