use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::{info, warn};

use crate::error::InspectionError;
use crate::models::{CaptureAngle, CapturedImage, ImageHandle, ImageSource, CAPTURE_GUIDE, TOTAL_STEPS};

use super::{
    provider::{AcquisitionFailure, CapabilityProvider},
    CaptureProgress, CaptureState, CaptureStatus,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionOutcome {
    Captured(CapturedImage),
    /// The provider failed; a placeholder was recorded instead.
    Fallback {
        image: CapturedImage,
        reason: AcquisitionFailure,
    },
}

impl AcquisitionOutcome {
    pub fn image(&self) -> &CapturedImage {
        match self {
            AcquisitionOutcome::Captured(image) => image,
            AcquisitionOutcome::Fallback { image, .. } => image,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AcquisitionOutcome::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureGuide {
    pub step: usize,
    pub total_steps: usize,
    pub angle: CaptureAngle,
}

impl fmt::Display for CaptureGuide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {} of {}: {} ({})",
            self.step + 1,
            self.total_steps,
            self.angle.label,
            self.angle.description
        )
    }
}

/// Drives acquisition of one image per guide step.
///
/// Cloning shares the same state, so a second `acquire` issued while one is
/// pending (from any clone) is refused instead of producing a duplicate image.
#[derive(Debug, Clone, Default)]
pub struct CaptureController {
    state: Arc<Mutex<CaptureState>>,
}

/// Clears the in-flight flag if an acquisition future is dropped before completing.
struct InFlight<'a> {
    state: &'a Mutex<CaptureState>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .end_acquisition();
        }
    }
}

impl CaptureController {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_step(&self) -> usize {
        self.lock().current_step
    }

    pub fn status(&self) -> CaptureStatus {
        self.lock().status
    }

    pub fn images(&self) -> Vec<CapturedImage> {
        self.lock().images.clone()
    }

    pub fn guide(&self) -> CaptureGuide {
        let step = self.current_step();
        CaptureGuide {
            step,
            total_steps: TOTAL_STEPS,
            angle: CAPTURE_GUIDE[step],
        }
    }

    /// Ask the provider for an image for the current step. Provider failures are
    /// degraded to the placeholder image; only stage misuse is reported as an error.
    pub async fn acquire(
        &self,
        provider: &dyn CapabilityProvider,
        source: ImageSource,
    ) -> Result<AcquisitionOutcome, InspectionError> {
        let step = self.lock().begin_acquisition()?;
        let mut in_flight = InFlight {
            state: &self.state,
            armed: true,
        };

        let result = provider.acquire(source).await;

        let mut state = self.lock();
        state.end_acquisition();
        in_flight.armed = false;

        match result {
            Ok(handle) => {
                let image = state.record_capture(Some(handle))?;
                info!(
                    "Captured step {} of {} from {}: {}",
                    step + 1,
                    TOTAL_STEPS,
                    source.as_str(),
                    image.handle
                );
                Ok(AcquisitionOutcome::Captured(image))
            }
            Err(reason) => {
                warn!(
                    "{} acquisition failed for step {}: {}; recording placeholder",
                    source.as_str(),
                    step + 1,
                    reason
                );
                let image = state.record_capture(None)?;
                Ok(AcquisitionOutcome::Fallback { image, reason })
            }
        }
    }

    /// Record an image (or the placeholder when `handle` is `None`) for the current step.
    pub fn record_capture(
        &self,
        handle: Option<ImageHandle>,
    ) -> Result<CapturedImage, InspectionError> {
        self.lock().record_capture(handle)
    }

    pub fn advance(&self) -> Result<CaptureProgress, InspectionError> {
        let progress = self.lock().advance()?;
        if let CaptureProgress::Complete(images) = &progress {
            info!("Capture stage complete with {} image(s)", images.len());
        }
        Ok(progress)
    }

    pub fn skip(&self) -> Result<CaptureProgress, InspectionError> {
        let step = self.current_step();
        let progress = self.lock().skip()?;
        info!("Skipped capture step {}", step + 1);
        Ok(progress)
    }
}
