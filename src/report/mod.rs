pub mod builder;
pub mod export;
pub mod summary;

pub use builder::{build, build_at};
pub use export::{export_file_name, from_export_json, read_export, to_export_json, write_export};
pub use summary::{summarize, Condition, RegionTally, SeverityCounts, Summary};
