//! The finalized inspection record.
//!
//! A `DamageReport` can only be obtained through the report builder, either
//! directly or by parsing a stored/exported document (which is re-validated
//! with the same rules), so every value in circulation satisfies the region
//! containment and coordinate invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InspectionError;
use crate::report::builder;

use super::{AnnotationPoint, CapturedImage, SelectedRegionSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ReportDocument")]
pub struct DamageReport {
    images: Vec<CapturedImage>,
    selected_regions: SelectedRegionSet,
    annotations: Vec<AnnotationPoint>,
    #[serde(rename = "timestamp")]
    created_at: DateTime<Utc>,
}

/// Unvalidated wire shape of a report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub images: Vec<CapturedImage>,
    pub selected_regions: SelectedRegionSet,
    pub annotations: Vec<AnnotationPoint>,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<ReportDocument> for DamageReport {
    type Error = InspectionError;

    fn try_from(document: ReportDocument) -> Result<Self, Self::Error> {
        builder::build_at(
            document.images,
            document.selected_regions,
            document.annotations,
            document.timestamp,
        )
    }
}

impl DamageReport {
    pub(crate) fn from_parts(
        images: Vec<CapturedImage>,
        selected_regions: SelectedRegionSet,
        annotations: Vec<AnnotationPoint>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            images,
            selected_regions,
            annotations,
            created_at,
        }
    }

    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    pub fn selected_regions(&self) -> &SelectedRegionSet {
        &self.selected_regions
    }

    pub fn annotations(&self) -> &[AnnotationPoint] {
        &self.annotations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
