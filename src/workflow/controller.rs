use std::sync::Arc;

use anyhow::Result;
use log::info;
use uuid::Uuid;

use crate::annotation::AnnotationController;
use crate::capture::{
    AcquisitionOutcome, CapabilityProvider, CaptureController, CaptureProgress,
};
use crate::error::InspectionError;
use crate::models::{
    CapturedImage, DamageReport, ImageHandle, ImageSource, RegionCatalog, Severity, SurfaceRect,
};
use crate::persistence::{KeyValueStore, ReportGateway};
use crate::report::{summarize, Summary};
use crate::selection::{RegionSelectionController, ToggleOutcome};

use super::{Stage, StageKind};

/// Linear inspection: Capture → RegionSelection → Annotation → Report.
///
/// There is no backwards navigation; the only way out of the report stage is
/// [`InspectionWorkflow::start_new`].
pub struct InspectionWorkflow {
    id: Uuid,
    catalog: RegionCatalog,
    provider: Arc<dyn CapabilityProvider>,
    gateway: ReportGateway<dyn KeyValueStore>,
    stage: Stage,
}

impl InspectionWorkflow {
    pub fn new(
        catalog: RegionCatalog,
        provider: Arc<dyn CapabilityProvider>,
        gateway: ReportGateway<dyn KeyValueStore>,
    ) -> Self {
        let id = Uuid::new_v4();
        info!("Inspection {id} started");
        Self {
            id,
            catalog,
            provider,
            gateway,
            stage: Stage::Capture(CaptureController::new()),
        }
    }

    /// Open the most recently persisted report, or start a fresh capture when
    /// none is stored (or the stored one is unreadable).
    pub async fn resume(
        catalog: RegionCatalog,
        provider: Arc<dyn CapabilityProvider>,
        gateway: ReportGateway<dyn KeyValueStore>,
    ) -> Result<Self> {
        let stored = gateway.load_current().await?;
        let mut workflow = Self::new(catalog, provider, gateway);
        if let Some(report) = stored {
            info!("Inspection {} resumed from stored report", workflow.id);
            workflow.stage = Stage::Report(report);
        }
        Ok(workflow)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_kind(&self) -> StageKind {
        self.stage.kind()
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    fn wrong_stage(&self, expected: StageKind) -> InspectionError {
        InspectionError::WrongStage {
            expected,
            actual: self.stage.kind(),
        }
    }

    fn enter(&mut self, stage: Stage) {
        info!(
            "Inspection {}: {} -> {}",
            self.id,
            self.stage.kind(),
            stage.kind()
        );
        self.stage = stage;
    }

    pub fn capture(&self) -> Result<&CaptureController, InspectionError> {
        match &self.stage {
            Stage::Capture(controller) => Ok(controller),
            _ => Err(self.wrong_stage(StageKind::Capture)),
        }
    }

    pub async fn acquire(
        &mut self,
        source: ImageSource,
    ) -> Result<AcquisitionOutcome, InspectionError> {
        let controller = self.capture()?.clone();
        controller.acquire(self.provider.as_ref(), source).await
    }

    pub fn record_capture(
        &mut self,
        handle: Option<ImageHandle>,
    ) -> Result<CapturedImage, InspectionError> {
        self.capture()?.record_capture(handle)
    }

    pub fn skip(&mut self) -> Result<StageKind, InspectionError> {
        let progress = self.capture()?.skip()?;
        Ok(self.apply_capture_progress(progress))
    }

    fn apply_capture_progress(&mut self, progress: CaptureProgress) -> StageKind {
        if let CaptureProgress::Complete(images) = progress {
            let selection = RegionSelectionController::new(self.catalog.clone());
            self.enter(Stage::RegionSelection { images, selection });
        }
        self.stage.kind()
    }

    pub fn selection(&self) -> Result<&RegionSelectionController, InspectionError> {
        match &self.stage {
            Stage::RegionSelection { selection, .. } => Ok(selection),
            _ => Err(self.wrong_stage(StageKind::RegionSelection)),
        }
    }

    pub fn toggle_region(&mut self, region_id: &str) -> Result<ToggleOutcome, InspectionError> {
        let actual = self.stage.kind();
        match &mut self.stage {
            Stage::RegionSelection { selection, .. } => Ok(selection.toggle(region_id)),
            _ => Err(InspectionError::WrongStage {
                expected: StageKind::RegionSelection,
                actual,
            }),
        }
    }

    /// Leave region selection. Refused, with the selection kept, while nothing is selected.
    pub fn confirm_regions(&mut self) -> Result<(), InspectionError> {
        if !self.selection()?.can_advance() {
            return Err(InspectionError::NoRegionsSelected);
        }

        let placeholder = Stage::Capture(CaptureController::new());
        match std::mem::replace(&mut self.stage, placeholder) {
            Stage::RegionSelection { images, selection } => {
                let selected = selection.finish()?;
                self.enter(Stage::Annotation(AnnotationController::new(images, selected)));
                Ok(())
            }
            other => {
                self.stage = other;
                Err(self.wrong_stage(StageKind::RegionSelection))
            }
        }
    }

    pub fn annotation(&self) -> Result<&AnnotationController, InspectionError> {
        match &self.stage {
            Stage::Annotation(controller) => Ok(controller),
            _ => Err(self.wrong_stage(StageKind::Annotation)),
        }
    }

    fn annotation_mut(&mut self) -> Result<&mut AnnotationController, InspectionError> {
        let actual = self.stage.kind();
        match &mut self.stage {
            Stage::Annotation(controller) => Ok(controller),
            _ => Err(InspectionError::WrongStage {
                expected: StageKind::Annotation,
                actual,
            }),
        }
    }

    pub fn set_severity(&mut self, severity: Severity) -> Result<(), InspectionError> {
        self.annotation_mut()?.set_severity(severity);
        Ok(())
    }

    pub fn place_annotation(
        &mut self,
        region: &str,
        x_fraction: f64,
        y_fraction: f64,
    ) -> Result<(), InspectionError> {
        self.annotation_mut()?
            .place_annotation(region, x_fraction, y_fraction)
            .map(|_| ())
    }

    pub fn place_at_pointer(
        &mut self,
        region: &str,
        surface: SurfaceRect,
        pointer_x: f64,
        pointer_y: f64,
    ) -> Result<(), InspectionError> {
        self.annotation_mut()?
            .place_at_pointer(region, surface, pointer_x, pointer_y)
            .map(|_| ())
    }

    /// Build the report, persist it under the well-known key and enter the report stage.
    /// On failure the annotation stage is left untouched.
    pub async fn finalize(&mut self) -> Result<&DamageReport> {
        let report = self.annotation()?.clone().finalize()?;
        self.gateway.save_current(&report).await?;
        self.enter(Stage::Report(report));
        Ok(self.report()?)
    }

    /// Generic forward action for whichever stage is active.
    pub async fn advance(&mut self) -> Result<StageKind> {
        match self.stage.kind() {
            StageKind::Capture => {
                let progress = self.capture()?.advance()?;
                Ok(self.apply_capture_progress(progress))
            }
            StageKind::RegionSelection => {
                self.confirm_regions()?;
                Ok(self.stage_kind())
            }
            StageKind::Annotation => {
                self.finalize().await?;
                Ok(self.stage_kind())
            }
            StageKind::Report => Ok(StageKind::Report),
        }
    }

    pub fn report(&self) -> Result<&DamageReport, InspectionError> {
        match &self.stage {
            Stage::Report(report) => Ok(report),
            _ => Err(self.wrong_stage(StageKind::Report)),
        }
    }

    pub fn summary(&self) -> Result<Summary, InspectionError> {
        self.report().map(summarize)
    }

    /// Discard the stored report and begin a new inspection from the capture stage.
    pub async fn start_new(&mut self) -> Result<()> {
        self.gateway.clear_current().await?;
        self.id = Uuid::new_v4();
        info!("Inspection {} started", self.id);
        self.stage = Stage::Capture(CaptureController::new());
        Ok(())
    }
}
