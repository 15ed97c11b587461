pub mod controller;
pub mod provider;
pub mod state;

pub use controller::{AcquisitionOutcome, CaptureController, CaptureGuide};
pub use provider::{AcquisitionFailure, CapabilityProvider, QueuedProvider, UnavailableProvider};
pub use state::{CaptureProgress, CaptureState, CaptureStatus};
