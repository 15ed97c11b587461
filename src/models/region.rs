//! Static catalog of the physical regions an inspector can flag.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Diagram-space rectangle used for hit-testing a region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RegionBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RegionBounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open on the far edges so neighbouring regions never both match.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bounds: RegionBounds,
}

impl RegionDescriptor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        bounds: RegionBounds,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            bounds,
        }
    }
}

/// Render a region id for display, e.g. `upper-shaft` -> `upper shaft`.
pub fn display_label(region_id: &str) -> String {
    region_id.replace('-', " ")
}

pub fn default_regions() -> Vec<RegionDescriptor> {
    vec![
        RegionDescriptor::new(
            "eraser",
            "Eraser",
            "Metal ferrule and pink eraser",
            RegionBounds::new(10.0, 45.0, 40.0, 10.0),
        ),
        RegionDescriptor::new(
            "upper-shaft",
            "Upper Shaft",
            "Wood body near eraser",
            RegionBounds::new(50.0, 45.0, 80.0, 10.0),
        ),
        RegionDescriptor::new(
            "middle-shaft",
            "Middle Shaft",
            "Main body section",
            RegionBounds::new(130.0, 45.0, 100.0, 10.0),
        ),
        RegionDescriptor::new(
            "lower-shaft",
            "Lower Shaft",
            "Wood body near tip",
            RegionBounds::new(230.0, 45.0, 80.0, 10.0),
        ),
        RegionDescriptor::new(
            "tip",
            "Tip",
            "Graphite and wood point",
            RegionBounds::new(310.0, 45.0, 40.0, 10.0),
        ),
    ]
}

/// Validate a candidate catalog: ids must be non-empty and unique, bounds non-degenerate.
pub fn validate_regions(regions: &[RegionDescriptor]) -> Result<()> {
    if regions.is_empty() {
        bail!("region catalog must contain at least one region");
    }

    let mut seen = HashSet::new();
    for region in regions {
        if region.id.trim().is_empty() {
            bail!("region ids must not be empty");
        }
        if !seen.insert(region.id.as_str()) {
            bail!("duplicate region id '{}'", region.id);
        }
        if !(region.bounds.width > 0.0 && region.bounds.height > 0.0) {
            bail!(
                "region '{}' must have a positive width and height",
                region.id
            );
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionCatalog {
    regions: Vec<RegionDescriptor>,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self {
            regions: default_regions(),
        }
    }
}

impl RegionCatalog {
    pub fn new(regions: Vec<RegionDescriptor>) -> Result<Self> {
        validate_regions(&regions)?;
        Ok(Self { regions })
    }

    pub fn get(&self, region_id: &str) -> Option<&RegionDescriptor> {
        self.regions.iter().find(|region| region.id == region_id)
    }

    pub fn contains(&self, region_id: &str) -> bool {
        self.get(region_id).is_some()
    }

    /// Region under a diagram-space point, if any.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&RegionDescriptor> {
        self.regions.iter().find(|region| region.bounds.contains(x, y))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionDescriptor> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[RegionDescriptor] {
        &self.regions
    }
}
