//! Named tile set sources loaded from YAML.
//!
//! ```yaml
//! sources:
//!   - name: blue-marble
//!     url: https://maps.example.org/ogcapi/collections/blueMarble/map/tiles/WebMercatorQuad
//!     media_type: image/png
//!   - name: nad83
//!     url: https://maps.example.org/ogcapi/collections/roads/tiles/NAD83Quad
//!     projection:
//!       code: EPSG:4269
//!       axis_orientation: neu
//!       meters_per_unit: 111319.49
//!     context:
//!       styleId: night
//!     collections: [roads, rivers]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tiles_client::SourceInfo;
use tiles_common::Projection;
use tracing::debug;

/// Root of a sources file.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub sources: Vec<NamedSource>,
}

/// One configured tile set source.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedSource {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub projection: Option<ProjectionConfig>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub collections: Vec<String>,
}

/// Projection override for CRSs missing from the built-in registry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    pub code: String,
    #[serde(default = "default_axis_orientation")]
    pub axis_orientation: String,
    #[serde(default)]
    pub meters_per_unit: Option<f64>,
}

fn default_axis_orientation() -> String {
    "enu".to_string()
}

impl ProjectionConfig {
    pub fn to_projection(&self) -> Projection {
        let projection = Projection::new(self.code.clone(), self.axis_orientation.clone());
        match self.meters_per_unit {
            Some(mpu) => projection.with_meters_per_unit(mpu),
            None => projection,
        }
    }
}

impl NamedSource {
    pub fn to_source_info(&self) -> SourceInfo {
        let mut source = SourceInfo::new(self.url.clone()).with_collections(self.collections.iter().cloned());
        source.media_type = self.media_type.clone();
        source.projection = self.projection.as_ref().map(ProjectionConfig::to_projection);
        source.context = self.context.clone();
        source
    }
}

impl SourcesConfig {
    /// Load a sources file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: SourcesConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(sources = config.sources.len(), path = %path.display(), "Loaded sources config");
        Ok(config)
    }

    pub fn find(&self, name: &str) -> Option<&NamedSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}
