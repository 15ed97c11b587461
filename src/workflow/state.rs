use serde::Serialize;
use std::fmt;

use crate::annotation::AnnotationController;
use crate::capture::CaptureController;
use crate::models::{CapturedImage, DamageReport};
use crate::selection::RegionSelectionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StageKind {
    Capture,
    RegionSelection,
    Annotation,
    Report,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Capture => "capture",
            StageKind::RegionSelection => "region selection",
            StageKind::Annotation => "annotation",
            StageKind::Report => "report",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current stage together with the context it owns. Each context is built
/// from the previous stage's output on entry and consumed on exit.
#[derive(Debug)]
pub enum Stage {
    Capture(CaptureController),
    RegionSelection {
        images: Vec<CapturedImage>,
        selection: RegionSelectionController,
    },
    Annotation(AnnotationController),
    Report(DamageReport),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Capture(_) => StageKind::Capture,
            Stage::RegionSelection { .. } => StageKind::RegionSelection,
            Stage::Annotation(_) => StageKind::Annotation,
            Stage::Report(_) => StageKind::Report,
        }
    }
}
