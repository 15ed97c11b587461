pub mod annotation;
pub mod capture;
pub mod region;
pub mod report;
pub mod selection;

pub use annotation::{AnnotationPoint, Severity, SurfaceRect};
pub use capture::{
    CaptureAngle, CapturedImage, ImageHandle, ImageSource, CAPTURE_GUIDE, TOTAL_STEPS,
};
pub use region::{display_label, RegionBounds, RegionCatalog, RegionDescriptor};
pub use report::{DamageReport, ReportDocument};
pub use selection::SelectedRegionSet;
