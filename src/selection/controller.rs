use log::{debug, warn};

use crate::error::InspectionError;
use crate::models::{RegionCatalog, SelectedRegionSet};

/// Sentinel region id that clears the whole selection.
pub const CLEAR_ALL: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    Cleared,
    /// Id not present in the catalog; the selection is unchanged.
    Ignored,
}

/// Tracks which catalog regions the inspector has flagged as damaged.
#[derive(Debug, Clone)]
pub struct RegionSelectionController {
    catalog: RegionCatalog,
    selected: SelectedRegionSet,
}

impl RegionSelectionController {
    pub fn new(catalog: RegionCatalog) -> Self {
        Self {
            catalog,
            selected: SelectedRegionSet::new(),
        }
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn selected(&self) -> &SelectedRegionSet {
        &self.selected
    }

    /// Flip membership of `region_id`. The empty id clears everything; ids
    /// outside the catalog are ignored.
    pub fn toggle(&mut self, region_id: &str) -> ToggleOutcome {
        if region_id == CLEAR_ALL {
            self.clear();
            return ToggleOutcome::Cleared;
        }

        if !self.catalog.contains(region_id) {
            warn!("Ignoring toggle of unknown region '{region_id}'");
            return ToggleOutcome::Ignored;
        }

        let outcome = if self.selected.toggle(region_id) {
            ToggleOutcome::Selected
        } else {
            ToggleOutcome::Deselected
        };
        debug!("Region '{region_id}' {outcome:?}");
        outcome
    }

    /// Toggle the region under a diagram-space point.
    pub fn toggle_at(&mut self, x: f64, y: f64) -> Option<ToggleOutcome> {
        let region_id = self.catalog.hit_test(x, y)?.id.clone();
        Some(self.toggle(&region_id))
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn can_advance(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Hand the finalized selection forward. Refused while nothing is selected.
    pub fn finish(self) -> Result<SelectedRegionSet, InspectionError> {
        if !self.can_advance() {
            return Err(InspectionError::NoRegionsSelected);
        }
        Ok(self.selected)
    }
}
