use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use crate::models::{
    region::{default_regions, validate_regions},
    RegionCatalog, RegionDescriptor,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectionSettings {
    /// Region catalog offered during region selection.
    pub regions: Vec<RegionDescriptor>,
    /// Default directory for exported reports; the working directory when unset.
    pub export_dir: Option<PathBuf>,
    /// Emit an advisory when a placeholder replaces a failed acquisition.
    pub announce_fallbacks: bool,
}

impl Default for InspectionSettings {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            export_dir: None,
            announce_fallbacks: true,
        }
    }
}

impl InspectionSettings {
    pub fn validate(&self) -> Result<()> {
        validate_regions(&self.regions).context("invalid region catalog")
    }

    pub fn catalog(&self) -> Result<RegionCatalog> {
        RegionCatalog::new(self.regions.clone())
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<InspectionSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file is
    /// missing, unreadable, unparseable or carries an invalid region catalog.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            Self::load(&path)
        } else {
            InspectionSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn load(path: &Path) -> InspectionSettings {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("Failed to read {}: {err}; using defaults", path.display());
                return InspectionSettings::default();
            }
        };

        match serde_json::from_str::<InspectionSettings>(&contents) {
            Ok(settings) => match settings.validate() {
                Ok(()) => settings,
                Err(err) => {
                    warn!("Ignoring region catalog in {}: {err:#}", path.display());
                    InspectionSettings {
                        regions: default_regions(),
                        ..settings
                    }
                }
            },
            Err(err) => {
                warn!("Failed to parse {}: {err}; using defaults", path.display());
                InspectionSettings::default()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> InspectionSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn catalog(&self) -> Result<RegionCatalog> {
        self.current().catalog()
    }

    pub fn update(&self, settings: InspectionSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &InspectionSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
