pub mod controller;
pub mod state;

pub use controller::InspectionWorkflow;
pub use state::{Stage, StageKind};
