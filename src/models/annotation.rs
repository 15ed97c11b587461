use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::InspectionError;

use super::SelectedRegionSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Light,
    #[default]
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Light, Severity::Moderate, Severity::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Light => "light",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = InspectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Severity::Light),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            _ => Err(InspectionError::UnknownSeverity(value.to_string())),
        }
    }
}

/// Reject anything outside the unit interval (NaN included).
pub(crate) fn check_unit(axis: char, value: f64) -> Result<(), InspectionError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InspectionError::CoordinateOutOfRange { axis, value })
    }
}

/// A single severity-tagged damage mark on a region's image surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPoint {
    x: f64,
    y: f64,
    severity: Severity,
    region: String,
}

impl AnnotationPoint {
    /// Validates coordinates and that `region` belongs to `selected`.
    pub fn new(
        x: f64,
        y: f64,
        severity: Severity,
        region: &str,
        selected: &SelectedRegionSet,
    ) -> Result<Self, InspectionError> {
        if !selected.contains(region) {
            return Err(InspectionError::InvalidRegionReference {
                region: region.to_string(),
            });
        }
        check_unit('x', x)?;
        check_unit('y', y)?;

        Ok(Self {
            x,
            y,
            severity,
            region: region.to_string(),
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

/// On-screen rectangle of a region's image surface, in pointer units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a pointer position into fractional surface coordinates clamped to `[0, 1]`.
    pub fn fraction_of(&self, pointer_x: f64, pointer_y: f64) -> (f64, f64) {
        (
            unit_fraction(pointer_x - self.left, self.width),
            unit_fraction(pointer_y - self.top, self.height),
        )
    }
}

fn unit_fraction(offset: f64, extent: f64) -> f64 {
    if !(extent > 0.0) {
        return 0.0;
    }
    let fraction = offset / extent;
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected() -> SelectedRegionSet {
        ["tip", "eraser"].into_iter().collect()
    }

    #[test]
    fn severity_parses_case_insensitively() {
        assert_eq!("Severe".parse::<Severity>().unwrap(), Severity::Severe);
        assert_eq!(" light ".parse::<Severity>().unwrap(), Severity::Light);
        assert!(matches!(
            "critical".parse::<Severity>(),
            Err(InspectionError::UnknownSeverity(_))
        ));
        assert_eq!(Severity::default(), Severity::Moderate);
    }

    #[test]
    fn annotation_outside_selection_is_rejected() {
        let err = AnnotationPoint::new(0.5, 0.5, Severity::Light, "middle-shaft", &selected())
            .unwrap_err();
        assert_eq!(
            err,
            InspectionError::InvalidRegionReference {
                region: "middle-shaft".into()
            }
        );
    }

    #[test]
    fn annotation_coordinates_must_be_fractions() {
        assert!(AnnotationPoint::new(1.2, 0.5, Severity::Light, "tip", &selected()).is_err());
        assert!(AnnotationPoint::new(0.5, -0.1, Severity::Light, "tip", &selected()).is_err());
        assert!(AnnotationPoint::new(f64::NAN, 0.5, Severity::Light, "tip", &selected()).is_err());
        let edge = AnnotationPoint::new(0.0, 1.0, Severity::Light, "tip", &selected()).unwrap();
        assert_eq!((edge.x(), edge.y()), (0.0, 1.0));
    }

    #[test]
    fn pointer_positions_are_clamped_to_the_surface() {
        let rect = SurfaceRect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(rect.fraction_of(200.0, 75.0), (0.5, 0.25));
        assert_eq!(rect.fraction_of(20.0, 500.0), (0.0, 1.0));
        assert_eq!(rect.fraction_of(f64::NAN, f64::INFINITY), (0.0, 1.0));

        let collapsed = SurfaceRect::new(0.0, 0.0, 0.0, 10.0);
        assert_eq!(collapsed.fraction_of(5.0, 5.0), (0.0, 0.5));
    }
}
