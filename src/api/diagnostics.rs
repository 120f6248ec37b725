use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;

/// A recovered problem, reported alongside results instead of aborting a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The file could not be read from disk.
    FileUnreadable { file: PathBuf, reason: String },
    /// The file is not valid JSON.
    FileParseFailed { file: PathBuf, reason: String },
    /// The file parsed, but its top-level value is neither an object nor a sequence.
    UnsupportedTopLevel { file: PathBuf, found: String },
    /// A sequence element that is not an object was skipped.
    NonObjectEntry {
        file: PathBuf,
        index: usize,
        found: String,
    },
    /// A location resolved but lies outside the valid latitude/longitude range.
    InvalidCoordinate {
        file: PathBuf,
        index: usize,
        longitude: f64,
        latitude: f64,
    },
    /// A route candidate was too far from the last accepted point.
    JumpRejected {
        file: PathBuf,
        index: usize,
        from: GeoPoint,
        to: GeoPoint,
        distance_km: f64,
    },
}

impl Diagnostic {
    #[must_use]
    pub fn file(&self) -> &Path {
        match self {
            Self::FileUnreadable { file, .. }
            | Self::FileParseFailed { file, .. }
            | Self::UnsupportedTopLevel { file, .. }
            | Self::NonObjectEntry { file, .. }
            | Self::InvalidCoordinate { file, .. }
            | Self::JumpRejected { file, .. } => file,
        }
    }

    /// `true` when the whole file was skipped.
    #[must_use]
    pub fn skips_file(&self) -> bool {
        matches!(
            self,
            Self::FileUnreadable { .. }
                | Self::FileParseFailed { .. }
                | Self::UnsupportedTopLevel { .. }
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileUnreadable { file, reason } => {
                write!(f, "{}: unreadable: {reason}", file.display())
            }
            Self::FileParseFailed { file, reason } => {
                write!(f, "{}: parse error: {reason}", file.display())
            }
            Self::UnsupportedTopLevel { file, found } => {
                write!(f, "{}: unsupported top-level value ({found})", file.display())
            }
            Self::NonObjectEntry { file, index, found } => {
                write!(f, "{}[{index}]: skipped non-object entry ({found})", file.display())
            }
            Self::InvalidCoordinate {
                file,
                index,
                longitude,
                latitude,
            } => write!(
                f,
                "{}[{index}]: invalid coordinate lon={longitude}, lat={latitude}",
                file.display()
            ),
            Self::JumpRejected {
                file,
                index,
                from,
                to,
                distance_km,
            } => write!(
                f,
                "{}[{index}]: rejected jump ({:.5}, {:.5}) -> ({:.5}, {:.5}): {distance_km:.2} km",
                file.display(),
                from.latitude,
                from.longitude,
                to.latitude,
                to.longitude
            ),
        }
    }
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
