//! This is the documentation for the **matrixoptics** package, a paraxial optics engine based on 2×2 ray-transfer
//! (ABCD) matrices.
//!
//! Optical elements ([`elements`]) are assembled into a [`MatrixGroup`](group::MatrixGroup). An
//! [`ImagingPath`](imaging_path::ImagingPath) adds the analysis of an imaging system (stops, field of view,
//! pupils, conjugates, Lagrange invariant) and a [`LaserPath`](laser_path::LaserPath) the propagation of
//! Gaussian beams and resonator eigenmodes.
//!
//! ```rust
//! use matrixoptics::{
//!     elements::{Lens, OpticalElement, Space},
//!     imaging_path::ImagingPath,
//! };
//!
//! let mut path = ImagingPath::new("relay");
//! path.append(Space::new(5.0, 1.0).unwrap());
//! path.append(Lens::new(5.0, 10.0).unwrap());
//! path.append(Space::new(15.0, 1.0).unwrap());
//! path.append(Lens::new(10.0, 10.0).unwrap());
//! path.append(Space::new(10.0, 1.0).unwrap());
//! assert_eq!(path.aperture_stop().unwrap().position, 5.0);
//! assert_eq!(path.group().physical_length(), 30.0);
//! ```
#![allow(clippy::module_name_repetitions)]

pub mod compound;
pub mod console;
pub mod elements;
pub mod error;
pub mod gaussian_beam;
pub mod group;
pub mod imaging_path;
pub mod laser_path;
pub mod matrix;
pub mod ray;
pub mod ray_distributions;
pub mod refractive_index;
pub mod reporter;
pub mod system_file;
pub mod utils;

pub use group::MatrixGroup;
pub use imaging_path::ImagingPath;
pub use laser_path::LaserPath;
pub use matrix::RayTransferMatrix;
