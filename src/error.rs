#![warn(missing_docs)]
//! Matrixoptics specific error structures
use std::{error::Error, fmt::Display};

/// Matrixoptics specific Result type
pub type OpmResult<T> = std::result::Result<T, MatrixOpticsError>;

/// Errors that can be returned by various matrixoptics functions.
///
/// Degenerate optical systems (afocal systems, conjugates at infinity, blocked rays) are **not** errors.
/// They are reported as infinite values or `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixOpticsError {
    /// an optical element could not be built from the given physical parameters
    Construction(String),
    /// a ray-transfer matrix is inconsistent (e.g. wrong determinant) or cannot be split
    Matrix(String),
    /// a refractive index could not be calculated (e.g. wavelength outside the model range)
    Material(String),
    /// an analysis of an [`ImagingPath`](crate::imaging_path::ImagingPath) could not be performed
    ImagingPath(String),
    /// errors of the command line interface
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for MatrixOpticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Construction(m) => {
                write!(f, "Construction:{m}")
            }
            Self::Matrix(m) => {
                write!(f, "Matrix:{m}")
            }
            Self::Material(m) => {
                write!(f, "Material:{m}")
            }
            Self::ImagingPath(m) => {
                write!(f, "ImagingPath:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "Matrixoptics Error:Other:{m}"),
        }
    }
}
impl Error for MatrixOpticsError {}

impl std::convert::From<String> for MatrixOpticsError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
