use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of reference photographs in one inspection.
pub const TOTAL_STEPS: usize = 4;

const PLACEHOLDER_PREFIX: &str = "simulated-image-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureAngle {
    pub label: &'static str,
    pub description: &'static str,
}

pub const CAPTURE_GUIDE: [CaptureAngle; TOTAL_STEPS] = [
    CaptureAngle {
        label: "Front View",
        description: "Center the pencil horizontally",
    },
    CaptureAngle {
        label: "Side View",
        description: "Rotate 90° to show the side profile",
    },
    CaptureAngle {
        label: "Back View",
        description: "Show the opposite side from front",
    },
    CaptureAngle {
        label: "Top View",
        description: "Point tip toward camera",
    },
];

/// Opaque reference to image bytes (a URI in practice). Never decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Deterministic stand-in used when a step is recorded without a real image.
    pub fn placeholder(step_index: usize) -> Self {
        Self(format!("{PLACEHOLDER_PREFIX}{}", step_index + 1))
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    Camera,
    Gallery,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Camera => "camera",
            ImageSource::Gallery => "gallery",
        }
    }
}

/// One acquired photograph. Serialized as `{ "uri": ..., "step": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedImage {
    #[serde(rename = "uri")]
    pub handle: ImageHandle,
    #[serde(rename = "step")]
    pub step_index: usize,
}

impl CapturedImage {
    pub fn new(step_index: usize, handle: ImageHandle) -> Self {
        Self { handle, step_index }
    }
}
