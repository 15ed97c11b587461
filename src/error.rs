use thiserror::Error;

use crate::workflow::StageKind;

/// Domain failures raised by the inspection stages.
///
/// Infrastructure errors (SQLite, filesystem) stay in `anyhow`; these are the
/// conditions a caller is expected to match on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InspectionError {
    #[error("region '{region}' is not part of the selected regions")]
    InvalidRegionReference { region: String },

    #[error("report input references region '{region}' which was not selected")]
    MalformedReportInput { region: String },

    #[error("image step {step} is out of range or recorded twice")]
    InvalidImageStep { step: usize },

    #[error("{axis} coordinate {value} is outside [0, 1]")]
    CoordinateOutOfRange { axis: char, value: f64 },

    #[error("unknown region '{region}'")]
    UnknownRegion { region: String },

    #[error("unknown severity '{0}' (expected light, moderate or severe)")]
    UnknownSeverity(String),

    #[error("at least one damage region must be selected")]
    NoRegionsSelected,

    #[error("an image acquisition is already in progress")]
    CaptureInProgress,

    #[error("the capture stage has already completed")]
    CaptureFinished,

    #[error("operation requires the {expected} stage but the inspection is in {actual}")]
    WrongStage {
        expected: StageKind,
        actual: StageKind,
    },

    #[error("no damage report found")]
    MissingReport,
}
