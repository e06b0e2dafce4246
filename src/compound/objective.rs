//! Microscope objective
use log::warn;
use serde::{Deserialize, Serialize};

use super::NominalCheck;
use crate::{
    elements::{Aperture, Element, OpticalElement, Space},
    error::{MatrixOpticsError, OpmResult},
    group::MatrixGroup,
    matrix::RayTransferMatrix,
};

/// Oversize factor of the front aperture with respect to the cone accepted at the working distance.
const FRONT_APERTURE_MARGIN: f64 = 1.2;

/// Nominal data of an [`Objective`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveParams {
    /// effective focal length
    pub f: f64,
    /// numerical aperture
    pub na: f64,
    /// distance between the back focal plane and the object focal plane
    pub focus_to_focus_length: f64,
    /// diameter of the back aperture
    pub back_aperture: f64,
    /// distance between the front of the objective and the object focal plane
    pub working_distance: f64,
    /// label of the objective
    #[serde(default)]
    pub label: String,
}

/// A microscope objective modeled as a thin lens between two apertures.
///
/// The objective is oriented with its back aperture at the input. The input plane is the back focal plane
/// and the output plane is the object focal plane. The model reproduces focal length, numerical aperture and
/// working distance but not the exact field of view of the real objective.
#[derive(Debug, Clone)]
pub struct Objective {
    params: ObjectiveParams,
    group: MatrixGroup,
}
impl Objective {
    /// Creates a new [`Objective`] from its nominal data.
    ///
    /// If enabled in `check`, a notice about the limits of the model is logged.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the numerical aperture is not positive.
    ///   - the focal length is not positive.
    ///   - the working distance is negative or larger than the focal length.
    ///   - the focus-to-focus length is shorter than twice the focal length.
    ///   - the back aperture is negative.
    pub fn new(params: ObjectiveParams, check: &NominalCheck) -> OpmResult<Self> {
        if params.na.is_nan() || params.na <= 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The numerical aperture NA must be positive.".into(),
            ));
        }
        if params.f.is_nan() || params.f <= 0.0 || params.f.is_infinite() {
            return Err(MatrixOpticsError::Construction(
                "The focal length must be positive and finite.".into(),
            ));
        }
        if params.working_distance.is_nan()
            || params.working_distance < 0.0
            || params.working_distance > params.f
        {
            return Err(MatrixOpticsError::Construction(
                "The working distance must be positive and not larger than the focal length.".into(),
            ));
        }
        let lens_length = params.focus_to_focus_length - 2.0 * params.f;
        if lens_length.is_nan() || lens_length < 0.0 {
            return Err(MatrixOpticsError::Construction(
                "The focus-to-focus length must be at least twice the focal length.".into(),
            ));
        }
        let label = if params.label.is_empty() {
            "objective"
        } else {
            params.label.as_str()
        };
        let f = params.f;
        let lens = RayTransferMatrix::new(1.0, 0.0, -1.0 / f, 1.0, 1.0, 1.0)?
            .with_physical_length(lens_length)?
            .with_label("principal planes");
        let front_aperture =
            FRONT_APERTURE_MARGIN * 2.0 * params.na * params.working_distance;
        let elements: Vec<Element> = vec![
            Aperture::new(params.back_aperture)?.into(),
            Space::new(f, 1.0)?.into(),
            lens.into(),
            Space::new(f - params.working_distance, 1.0)?.into(),
            Aperture::new(front_aperture)?.into(),
            Space::new(params.working_distance, 1.0)?.into(),
        ];
        let group = MatrixGroup::from_elements(label, elements);
        if check.warn_untested_model {
            warn!(
                "{label}: objective model not fully tested, apertures and field of view may differ from the real objective"
            );
        }
        Ok(Self { params, group })
    }
    /// Returns the nominal data of this [`Objective`].
    #[must_use]
    pub const fn params(&self) -> &ObjectiveParams {
        &self.params
    }
    /// Returns the elements of this [`Objective`] as a [`MatrixGroup`].
    #[must_use]
    pub const fn group(&self) -> &MatrixGroup {
        &self.group
    }
}
impl OpticalElement for Objective {
    fn matrix(&self) -> &RayTransferMatrix {
        self.group.matrix()
    }
    fn flip_orientation(&mut self) {
        self.group.flip_orientation();
    }
    fn transfer_matrix(&self, up_to: f64) -> OpmResult<RayTransferMatrix> {
        self.group.transfer_matrix(up_to)
    }
}
impl From<Objective> for Element {
    fn from(objective: Objective) -> Self {
        Self::Group(objective.group)
    }
}
