pub mod controller;

pub use controller::{RegionSelectionController, ToggleOutcome};
