pub mod annotation;
pub mod capture;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod persistence;
pub mod report;
pub mod selection;
pub mod settings;
pub mod workflow;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use db::Database;
use persistence::{KeyValueStore, ReportGateway};
use settings::SettingsStore;

pub use error::InspectionError;
pub use workflow::{InspectionWorkflow, Stage, StageKind};

pub const DB_FILE_NAME: &str = "pencil-inspect.sqlite3";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub struct AppState {
    pub db: Database,
    pub settings: SettingsStore,
    pub gateway: ReportGateway<dyn KeyValueStore>,
    data_dir: PathBuf,
}

impl AppState {
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join(DB_FILE_NAME))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE_NAME))?;
        let store: Arc<dyn KeyValueStore> = Arc::new(database.clone());

        Ok(Self {
            db: database,
            settings,
            gateway: ReportGateway::new(store),
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn debug_enabled() -> bool {
    std::env::var("PENCIL_INSPECT_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    // RUST_LOG wins over the default level
    let default_level = if debug_enabled() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let cli = Cli::parse();
    log::debug!("pencil-inspect starting with data dir {}", cli.data_dir.display());

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let state = AppState::open(&cli.data_dir)?;
        let output = commands::dispatch(&state, cli.command).await?;
        print!("{output}");
        Ok(())
    })
}
