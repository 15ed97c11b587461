use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::error::InspectionError;
use crate::models::{
    annotation::check_unit, AnnotationPoint, CapturedImage, DamageReport, SelectedRegionSet,
    TOTAL_STEPS,
};

/// Assemble an immutable report stamped with the current time.
pub fn build(
    images: Vec<CapturedImage>,
    selected_regions: SelectedRegionSet,
    annotations: Vec<AnnotationPoint>,
) -> Result<DamageReport, InspectionError> {
    build_at(images, selected_regions, annotations, Utc::now())
}

/// Same as [`build`] with an explicit timestamp. Every input is re-validated,
/// whatever produced it.
pub fn build_at(
    images: Vec<CapturedImage>,
    selected_regions: SelectedRegionSet,
    annotations: Vec<AnnotationPoint>,
    created_at: DateTime<Utc>,
) -> Result<DamageReport, InspectionError> {
    if selected_regions.is_empty() {
        return Err(InspectionError::NoRegionsSelected);
    }

    let mut steps = HashSet::with_capacity(images.len());
    for image in &images {
        if image.step_index >= TOTAL_STEPS || !steps.insert(image.step_index) {
            return Err(InspectionError::InvalidImageStep {
                step: image.step_index,
            });
        }
    }

    for annotation in &annotations {
        if !selected_regions.contains(annotation.region()) {
            return Err(InspectionError::MalformedReportInput {
                region: annotation.region().to_string(),
            });
        }
        check_unit('x', annotation.x())?;
        check_unit('y', annotation.y())?;
    }

    Ok(DamageReport::from_parts(
        images,
        selected_regions,
        annotations,
        created_at,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageHandle, Severity};

    fn selected(ids: &[&str]) -> SelectedRegionSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn dangling_region_is_rejected() {
        let original = selected(&["tip", "eraser"]);
        let point = AnnotationPoint::new(0.2, 0.3, Severity::Severe, "eraser", &original).unwrap();

        let err = build(Vec::new(), selected(&["tip"]), vec![point]).unwrap_err();
        assert_eq!(
            err,
            InspectionError::MalformedReportInput {
                region: "eraser".into()
            }
        );
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert_eq!(
            build(Vec::new(), SelectedRegionSet::new(), Vec::new()).unwrap_err(),
            InspectionError::NoRegionsSelected
        );
    }

    #[test]
    fn duplicate_image_steps_are_rejected() {
        let images = vec![
            CapturedImage::new(1, ImageHandle::placeholder(1)),
            CapturedImage::new(1, ImageHandle::new("file:///again.jpg")),
        ];
        assert_eq!(
            build(images, selected(&["tip"]), Vec::new()).unwrap_err(),
            InspectionError::InvalidImageStep { step: 1 }
        );

        let beyond = vec![CapturedImage::new(TOTAL_STEPS, ImageHandle::placeholder(TOTAL_STEPS))];
        assert!(build(beyond, selected(&["tip"]), Vec::new()).is_err());
    }

    #[test]
    fn short_image_sequences_are_accepted() {
        let images = vec![
            CapturedImage::new(0, ImageHandle::placeholder(0)),
            CapturedImage::new(3, ImageHandle::new("file:///top.jpg")),
        ];
        let regions = selected(&["tip"]);
        let point = AnnotationPoint::new(1.0, 0.0, Severity::Light, "tip", &regions).unwrap();
        let report = build(images, regions, vec![point]).unwrap();
        assert_eq!(report.images().len(), 2);
        assert_eq!(report.annotations().len(), 1);
    }

    #[test]
    fn build_at_keeps_the_given_timestamp() {
        let stamp = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = build_at(Vec::new(), selected(&["tip"]), Vec::new(), stamp).unwrap();
        assert_eq!(report.created_at(), stamp);
    }
}
