use serde::Serialize;

use crate::error::InspectionError;
use crate::models::{CapturedImage, ImageHandle, TOTAL_STEPS};

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStatus {
    #[default]
    Ready,
    Acquiring,
    Complete,
}

/// Result of a forward move through the capture steps.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureProgress {
    Advanced { step: usize },
    /// The last step was passed; the accumulated images are handed over.
    Complete(Vec<CapturedImage>),
}

/// Step sequence of the capture stage. `current_step` never leaves `0..TOTAL_STEPS`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureState {
    pub status: CaptureStatus,
    pub current_step: usize,
    pub images: Vec<CapturedImage>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_ready(&self) -> Result<(), InspectionError> {
        match self.status {
            CaptureStatus::Ready => Ok(()),
            CaptureStatus::Acquiring => Err(InspectionError::CaptureInProgress),
            CaptureStatus::Complete => Err(InspectionError::CaptureFinished),
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= TOTAL_STEPS
    }

    /// Mark an acquisition as pending for the current step.
    pub fn begin_acquisition(&mut self) -> Result<usize, InspectionError> {
        self.ensure_ready()?;
        self.status = CaptureStatus::Acquiring;
        Ok(self.current_step)
    }

    pub fn end_acquisition(&mut self) {
        if self.status == CaptureStatus::Acquiring {
            self.status = CaptureStatus::Ready;
        }
    }

    /// Record an image for the current step, falling back to the placeholder
    /// handle, then move on unless this is the last step. Recording the last
    /// step again replaces its image so each step appears at most once.
    pub fn record_capture(
        &mut self,
        handle: Option<ImageHandle>,
    ) -> Result<CapturedImage, InspectionError> {
        self.ensure_ready()?;

        let step = self.current_step;
        let image = CapturedImage::new(
            step,
            handle.unwrap_or_else(|| ImageHandle::placeholder(step)),
        );

        self.images.retain(|existing| existing.step_index != step);
        self.images.push(image.clone());

        if !self.is_last_step() {
            self.current_step += 1;
        }

        Ok(image)
    }

    pub fn advance(&mut self) -> Result<CaptureProgress, InspectionError> {
        self.ensure_ready()?;

        if self.is_last_step() {
            self.status = CaptureStatus::Complete;
            Ok(CaptureProgress::Complete(std::mem::take(&mut self.images)))
        } else {
            self.current_step += 1;
            Ok(CaptureProgress::Advanced {
                step: self.current_step,
            })
        }
    }

    /// Forward move without recording an image for the current step.
    pub fn skip(&mut self) -> Result<CaptureProgress, InspectionError> {
        self.advance()
    }
}
