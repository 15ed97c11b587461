use std::{fmt::Write as _, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{info, warn};

use crate::{
    capture::{AcquisitionOutcome, CapabilityProvider, QueuedProvider, UnavailableProvider},
    cli::{Command, InspectArgs, SettingsArgs},
    error::InspectionError,
    models::{display_label, DamageReport, ImageHandle, ImageSource, RegionCatalog, TOTAL_STEPS},
    persistence::REPORT_KEY,
    report::{read_export, summarize, write_export, Summary},
    selection::ToggleOutcome,
    workflow::{InspectionWorkflow, StageKind},
    AppState,
};

/// Placeholder argument for `--image` that simulates a failed capture.
const FAILED_CAPTURE: &str = "-";

pub async fn dispatch(state: &AppState, command: Command) -> Result<String> {
    match command {
        Command::Regions => list_regions(state),
        Command::Inspect(args) => inspect(state, args).await,
        Command::Report { json } => show_report(state, json).await,
        Command::Export { out } => export_report(state, out).await,
        Command::Import { file } => import_report(state, file).await,
        Command::Clear => clear_report(state).await,
        Command::Settings(args) => configure(state, args),
    }
}

fn region_name(catalog: &RegionCatalog, region_id: &str) -> String {
    catalog
        .get(region_id)
        .map(|region| region.name.clone())
        .unwrap_or_else(|| display_label(region_id))
}

pub fn list_regions(state: &AppState) -> Result<String> {
    let catalog = state.settings.catalog()?;
    let mut out = String::new();
    for region in catalog.iter() {
        writeln!(out, "{:<14} {:<14} {}", region.id, region.name, region.description)?;
    }
    Ok(out)
}

/// Walk a fresh inspection through every stage and persist the report.
pub async fn inspect(state: &AppState, args: InspectArgs) -> Result<String> {
    let settings = state.settings.current();
    let catalog = settings.catalog()?;

    if let Some(step) = args.skip.iter().find(|&&s| s == 0 || s > TOTAL_STEPS) {
        bail!("--skip must be between 1 and {TOTAL_STEPS}, got {step}");
    }

    let provider: Arc<dyn CapabilityProvider> = Arc::new(QueuedProvider::new(
        args.images.iter().map(|uri| {
            (uri.as_str() != FAILED_CAPTURE).then(|| ImageHandle::new(uri.as_str()))
        }),
    ));
    let mut workflow = InspectionWorkflow::new(catalog, provider, state.gateway.clone());
    let mut out = String::new();

    capture_all(&mut workflow, &args, settings.announce_fallbacks, &mut out).await?;

    for region in &args.regions {
        if workflow.selection()?.selected().contains(region) {
            continue;
        }
        if workflow.toggle_region(region)? == ToggleOutcome::Ignored {
            return Err(InspectionError::UnknownRegion {
                region: region.clone(),
            }
            .into());
        }
    }
    workflow.confirm_regions()?;

    for mark in &args.marks {
        workflow.set_severity(mark.severity.unwrap_or(args.severity))?;
        workflow.place_annotation(&mark.region, mark.x, mark.y)?;
    }

    workflow.finalize().await?;
    let report = workflow.report()?;
    info!(
        "Inspection {} stored with {} annotation(s)",
        workflow.id(),
        report.annotations().len()
    );

    out.push_str(&render_report(report, &summarize(report), workflow.catalog())?);
    Ok(out)
}

async fn capture_all(
    workflow: &mut InspectionWorkflow,
    args: &InspectArgs,
    announce_fallbacks: bool,
    out: &mut String,
) -> Result<()> {
    let source = ImageSource::from(args.source);
    let mut recorded = [false; TOTAL_STEPS];

    while workflow.stage_kind() == StageKind::Capture {
        let step = workflow.capture()?.current_step();
        if args.skip.contains(&(step + 1)) {
            workflow.skip()?;
            continue;
        }
        // The last step does not auto-advance after a capture.
        if recorded[step] {
            workflow.advance().await?;
            continue;
        }

        let guide = workflow.capture()?.guide();
        match workflow.acquire(source).await? {
            AcquisitionOutcome::Captured(image) => {
                writeln!(out, "{guide}: {}", image.handle)?;
            }
            AcquisitionOutcome::Fallback { image, reason } => {
                if announce_fallbacks {
                    writeln!(
                        out,
                        "{guide}: {reason}, using simulated image {}",
                        image.handle
                    )?;
                } else {
                    writeln!(out, "{guide}: {}", image.handle)?;
                }
            }
        }
        recorded[step] = true;
    }
    Ok(())
}

pub fn render_report(
    report: &DamageReport,
    summary: &Summary,
    catalog: &RegionCatalog,
) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "Damage Assessment Report - {}",
        report.created_at().format("%Y-%m-%d %H:%M UTC")
    )?;

    let placeholders = report
        .images()
        .iter()
        .filter(|image| image.handle.is_placeholder())
        .count();
    writeln!(
        out,
        "Images captured: {} ({placeholders} simulated)",
        report.images().len()
    )?;

    let regions: Vec<String> = report
        .selected_regions()
        .iter()
        .map(|id| region_name(catalog, id))
        .collect();
    writeln!(out, "Affected regions: {}", regions.join(", "))?;

    if summary.has_damage() {
        writeln!(
            out,
            "Damage points: {} (light {}, moderate {}, severe {})",
            summary.total_damage, summary.counts.light, summary.counts.moderate, summary.counts.severe
        )?;
        for tally in summary.per_region.iter().filter(|tally| tally.count > 0) {
            writeln!(
                out,
                "  {}: {} point(s)",
                region_name(catalog, &tally.region),
                tally.count
            )?;
        }
    } else {
        writeln!(out, "No damage detected")?;
    }

    writeln!(out, "Overall condition: {}", summary.condition)?;
    writeln!(
        out,
        "Replacement recommended: {}",
        if summary.replacement_recommended { "Yes" } else { "No" }
    )?;
    Ok(out)
}

pub async fn show_report(state: &AppState, json: bool) -> Result<String> {
    let workflow = InspectionWorkflow::resume(
        state.settings.catalog()?,
        Arc::new(UnavailableProvider),
        state.gateway.clone(),
    )
    .await?;

    let Ok(report) = workflow.report() else {
        return Ok("No damage report found. Run `pencil-inspect inspect` to create one.\n".into());
    };
    let summary = summarize(report);

    if json {
        let document = serde_json::json!({ "report": report, "summary": summary });
        let mut rendered = serde_json::to_string_pretty(&document)?;
        rendered.push('\n');
        return Ok(rendered);
    }
    let mut rendered = render_report(report, &summary, workflow.catalog())?;
    if let Some(saved) = state.db.updated_at(REPORT_KEY).await? {
        writeln!(rendered, "Last saved: {}", saved.format("%Y-%m-%d %H:%M UTC"))?;
    }
    Ok(rendered)
}

pub async fn export_report(state: &AppState, out: Option<PathBuf>) -> Result<String> {
    let Some(report) = state.gateway.load_current().await? else {
        return Err(InspectionError::MissingReport.into());
    };

    let dir = out
        .or_else(|| state.settings.current().export_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let path = write_export(&report, &dir, Utc::now())?;
    Ok(format!("Exported report to {}\n", path.display()))
}

pub async fn import_report(state: &AppState, file: PathBuf) -> Result<String> {
    let report = read_export(&file)?;
    state
        .gateway
        .save_current(&report)
        .await
        .with_context(|| format!("failed to store imported report {}", file.display()))?;
    let summary = summarize(&report);
    Ok(format!(
        "Imported report from {} ({} damage point(s), condition {})\n",
        file.display(),
        summary.total_damage,
        summary.condition
    ))
}

pub async fn clear_report(state: &AppState) -> Result<String> {
    let mut workflow = InspectionWorkflow::resume(
        state.settings.catalog()?,
        Arc::new(UnavailableProvider),
        state.gateway.clone(),
    )
    .await?;

    if workflow.stage_kind() != StageKind::Report {
        warn!("No stored report to clear");
    }
    workflow.start_new().await?;
    Ok("Stored report cleared\n".into())
}

/// Print the settings, persisting them first when any field was changed.
pub fn configure(state: &AppState, args: SettingsArgs) -> Result<String> {
    let mut settings = state.settings.current();
    let changed = args.export_dir.is_some()
        || args.clear_export_dir
        || args.announce_fallbacks.is_some();

    if let Some(dir) = args.export_dir {
        settings.export_dir = Some(dir);
    }
    if args.clear_export_dir {
        settings.export_dir = None;
    }
    if let Some(announce) = args.announce_fallbacks {
        settings.announce_fallbacks = announce;
    }

    if changed {
        state.settings.update(settings.clone())?;
        info!("Saved settings to {}", state.settings.path().display());
    }

    let mut rendered = serde_json::to_string_pretty(&settings)?;
    rendered.push('\n');
    Ok(rendered)
}
