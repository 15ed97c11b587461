use clap::Parser;
use pencil_inspect_lib::{
    cli::{Cli, Command},
    commands::dispatch,
    AppState, InspectionError,
};
use tempfile::TempDir;

fn command(args: &[&str]) -> Command {
    Cli::try_parse_from(std::iter::once("pencil-inspect").chain(args.iter().copied()))
        .unwrap()
        .command
}

async fn run(state: &AppState, args: &[&str]) -> anyhow::Result<String> {
    dispatch(state, command(args)).await
}

#[tokio::test]
async fn regions_lists_the_catalog() {
    let dir = TempDir::new().unwrap();
    let state = AppState::open(dir.path()).unwrap();

    let output = run(&state, &["regions"]).await.unwrap();
    assert_eq!(output.lines().count(), 5);
    assert!(output.lines().next().unwrap().starts_with("eraser"));
    assert!(output.contains("Graphite and wood point"));
}

#[tokio::test]
async fn inspect_report_export_clear_import() {
    let dir = TempDir::new().unwrap();
    let state = AppState::open(&dir.path().join("data")).unwrap();

    let output = run(
        &state,
        &[
            "inspect",
            "--image",
            "file:///front.jpg",
            "--image",
            "-",
            "--skip",
            "3",
            "--region",
            "tip",
            "--region",
            "eraser",
            "--mark",
            "tip:0.5:0.5:severe",
            "--mark",
            "eraser:0.2:0.8",
        ],
    )
    .await
    .unwrap();
    assert!(output.contains("Step 1 of 4: Front View"));
    assert!(output.contains("simulated-image-2"));
    assert!(output.contains("Images captured: 3 (2 simulated)"));
    assert!(output.contains("Affected regions: Tip, Eraser"));
    assert!(output.contains("Damage points: 2 (light 0, moderate 1, severe 1)"));
    assert!(output.contains("Overall condition: Poor"));
    assert!(output.contains("Replacement recommended: Yes"));

    let report = run(&state, &["report"]).await.unwrap();
    assert!(report.contains("Overall condition: Poor"));
    assert!(report.contains("Last saved: "));

    let json = run(&state, &["report", "--json"]).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["condition"], "Poor");
    assert_eq!(value["report"]["selectedRegions"][1], "eraser");

    let exports = dir.path().join("exports");
    let exported = run(&state, &["export", "--out", exports.to_str().unwrap()])
        .await
        .unwrap();
    let file = std::fs::read_dir(&exports)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let name = file.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("pencil-damage-report-") && name.ends_with(".json"));
    assert!(exported.contains(&name));

    run(&state, &["clear"]).await.unwrap();
    let empty = run(&state, &["report"]).await.unwrap();
    assert!(empty.starts_with("No damage report found"));
    let err = run(&state, &["export"]).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<InspectionError>(),
        Some(&InspectionError::MissingReport)
    );

    let imported = run(&state, &["import", file.to_str().unwrap()])
        .await
        .unwrap();
    assert!(imported.contains("2 damage point(s), condition Poor"));
    let report = run(&state, &["report"]).await.unwrap();
    assert!(report.contains("Affected regions: Tip, Eraser"));
}

#[tokio::test]
async fn inspect_rejects_unknown_or_missing_regions() {
    let dir = TempDir::new().unwrap();
    let state = AppState::open(dir.path()).unwrap();

    let err = run(&state, &["inspect", "--region", "ferrule"])
        .await
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<InspectionError>(),
        Some(&InspectionError::UnknownRegion {
            region: "ferrule".into()
        })
    );

    let err = run(&state, &["inspect"]).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<InspectionError>(),
        Some(&InspectionError::NoRegionsSelected)
    );

    let err = run(&state, &["inspect", "--region", "tip", "--mark", "eraser:0.5:0.5"])
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InspectionError>(),
        Some(InspectionError::InvalidRegionReference { .. })
    ));

    let report = run(&state, &["report"]).await.unwrap();
    assert!(report.starts_with("No damage report found"));
}

#[tokio::test]
async fn inspect_without_marks_reports_no_damage() {
    let dir = TempDir::new().unwrap();
    let state = AppState::open(dir.path()).unwrap();

    let output = run(&state, &["inspect", "--region", "middle-shaft"])
        .await
        .unwrap();
    assert!(output.contains("Images captured: 4 (4 simulated)"));
    assert!(output.contains("No damage detected"));
    assert!(output.contains("Overall condition: Good"));
    assert!(output.contains("Replacement recommended: No"));
    assert!(state.data_dir().join("pencil-inspect.sqlite3").exists());
}

#[tokio::test]
async fn settings_changes_persist_and_drive_other_commands() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports");
    {
        let state = AppState::open(&dir.path().join("data")).unwrap();
        let shown = run(&state, &["settings"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(value["announceFallbacks"], true);
        assert!(value["exportDir"].is_null());

        run(
            &state,
            &[
                "settings",
                "--export-dir",
                exports.to_str().unwrap(),
                "--announce-fallbacks",
                "false",
            ],
        )
        .await
        .unwrap();
    }

    let state = AppState::open(&dir.path().join("data")).unwrap();
    let settings = state.settings.current();
    assert_eq!(settings.export_dir.as_deref(), Some(exports.as_path()));
    assert!(!settings.announce_fallbacks);

    let output = run(&state, &["inspect", "--image", "-", "--region", "tip"])
        .await
        .unwrap();
    assert!(output.contains("simulated-image-1"));
    assert!(!output.contains("using simulated image"));

    run(&state, &["export"]).await.unwrap();
    assert_eq!(std::fs::read_dir(&exports).unwrap().count(), 1);

    let cleared = run(&state, &["settings", "--clear-export-dir"]).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&cleared).unwrap();
    assert!(value["exportDir"].is_null());
    assert_eq!(value["announceFallbacks"], false);
}
