use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::InspectionError;
use crate::models::{
    AnnotationPoint, CapturedImage, DamageReport, SelectedRegionSet, Severity, SurfaceRect,
};
use crate::report::builder;

/// Collects severity-tagged damage points on the selected regions.
///
/// Points are append-only; there is no removal.
#[derive(Debug, Clone)]
pub struct AnnotationController {
    images: Vec<CapturedImage>,
    selected: SelectedRegionSet,
    current_severity: Severity,
    annotations: Vec<AnnotationPoint>,
}

impl AnnotationController {
    pub fn new(images: Vec<CapturedImage>, selected: SelectedRegionSet) -> Self {
        Self {
            images,
            selected,
            current_severity: Severity::default(),
            annotations: Vec::new(),
        }
    }

    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    pub fn selected_regions(&self) -> &SelectedRegionSet {
        &self.selected
    }

    pub fn annotations(&self) -> &[AnnotationPoint] {
        &self.annotations
    }

    pub fn current_severity(&self) -> Severity {
        self.current_severity
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.current_severity = severity;
    }

    /// Mark damage at fractional coordinates using the current severity.
    /// Coordinates must already lie in `[0, 1]`; see [`Self::place_at_pointer`].
    pub fn place_annotation(
        &mut self,
        region: &str,
        x_fraction: f64,
        y_fraction: f64,
    ) -> Result<&AnnotationPoint, InspectionError> {
        let point = AnnotationPoint::new(
            x_fraction,
            y_fraction,
            self.current_severity,
            region,
            &self.selected,
        )?;
        debug!(
            "Marked {} damage on '{}' at ({:.3}, {:.3})",
            point.severity(),
            region,
            x_fraction,
            y_fraction
        );
        self.annotations.push(point);
        Ok(&self.annotations[self.annotations.len() - 1])
    }

    /// Mark damage from a raw pointer position over the region's image surface.
    pub fn place_at_pointer(
        &mut self,
        region: &str,
        surface: SurfaceRect,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Result<&AnnotationPoint, InspectionError> {
        let (x, y) = surface.fraction_of(pointer_x, pointer_y);
        self.place_annotation(region, x, y)
    }

    pub fn count_for_region(&self, region: &str) -> usize {
        self.annotations
            .iter()
            .filter(|point| point.region() == region)
            .count()
    }

    pub fn finalize(self) -> Result<DamageReport, InspectionError> {
        self.finalize_at(Utc::now())
    }

    pub fn finalize_at(self, created_at: DateTime<Utc>) -> Result<DamageReport, InspectionError> {
        let report = builder::build_at(self.images, self.selected, self.annotations, created_at)?;
        info!(
            "Finalized damage report: {} image(s), {} region(s), {} mark(s)",
            report.images().len(),
            report.selected_regions().len(),
            report.annotations().len()
        );
        Ok(report)
    }
}
