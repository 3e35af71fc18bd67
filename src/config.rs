//! Application configuration, read from an optional JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Dashboard and export settings. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset opened at start-up.
    pub input: Option<PathBuf>,
    /// Suggested file name in the export dialog.
    pub export_file_name: String,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Marker radius on the map view.
    pub map_point_radius: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: None,
            export_file_name: "seattle_properties.csv".to_string(),
            window_size: [1280.0, 820.0],
            map_point_radius: 2.0,
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
