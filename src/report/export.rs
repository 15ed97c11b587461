use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::models::DamageReport;

const EXPORT_PREFIX: &str = "pencil-damage-report-";

/// `pencil-damage-report-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

/// Full record as a two-space indented JSON document. The derived summary is not included.
pub fn to_export_json(report: &DamageReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize damage report")
}

/// Parse an export document, applying the report builder's validation.
pub fn from_export_json(document: &str) -> Result<DamageReport> {
    serde_json::from_str(document).context("failed to parse damage report document")
}

pub fn write_export(report: &DamageReport, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(now.date_naive()));
    let document = to_export_json(report)?;
    fs::write(&path, document)
        .with_context(|| format!("failed to write report export to {}", path.display()))?;

    info!("Exported damage report to {}", path.display());
    Ok(path)
}

pub fn read_export(path: &Path) -> Result<DamageReport> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read report export {}", path.display()))?;
    from_export_json(&contents).with_context(|| format!("invalid report export {}", path.display()))
}
