//! Handling the matrixoptics CLI
//!
//! This module handles the command line parsing and the validation of the given arguments.
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::error::{MatrixOpticsError, OpmResult};

/// Output format of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// YAML document
    #[default]
    Yaml,
    /// pretty printed JSON
    Json,
}
impl ReportFormat {
    /// Serialize `value` in this format.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn serialize<T: Serialize>(self, value: &T) -> OpmResult<String> {
        match self {
            Self::Yaml => serde_yaml::to_string(value)
                .map_err(|e| MatrixOpticsError::Console(format!("serialization failed: {e}"))),
            Self::Json => serde_json::to_string_pretty(value)
                .map_err(|e| MatrixOpticsError::Console(format!("serialization failed: {e}"))),
        }
    }
}

/// Command line arguments as parsed by clap.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct PartialArgs {
    /// system description file (YAML or JSON)
    #[arg(short, long)]
    file: String,

    /// format of the printed report
    #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
    format: ReportFormat,

    /// axial position at which the Lagrange invariant is evaluated (default: object plane)
    #[arg(short, long, allow_negative_numbers = true)]
    z: Option<f64>,
}

/// Validated command line arguments of the matrixoptics application.
#[derive(Debug)]
pub struct Args {
    /// path of the system description file
    pub file_path: PathBuf,
    /// format of the printed report
    pub format: ReportFormat,
    /// axial position of the Lagrange invariant
    pub z: Option<f64>,
}

fn file_path_is_valid(path: &Path) -> bool {
    path.exists()
        && path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "json")
}

impl TryFrom<PartialArgs> for Args {
    type Error = MatrixOpticsError;

    fn try_from(part_args: PartialArgs) -> OpmResult<Self> {
        let file_path = PathBuf::from(&part_args.file);
        if !file_path_is_valid(&file_path) {
            return Err(MatrixOpticsError::Console(format!(
                "invalid file path: {} (expected an existing .yaml, .yml or .json file)",
                file_path.display()
            )));
        }
        if part_args.z.is_some_and(|z| !z.is_finite()) {
            return Err(MatrixOpticsError::Console(
                "position z must be finite".into(),
            ));
        }
        Ok(Self {
            file_path,
            format: part_args.format,
            z: part_args.z,
        })
    }
}
