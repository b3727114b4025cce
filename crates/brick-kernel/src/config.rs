//! Engine configuration.

use std::path::Path;

use brick_math::Tolerances;
use brick_mesh::MeshSettings;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Export defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Author line of exported models.
    pub author: String,
    /// Model name used when a scene has none.
    pub model_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            author: brick_ldraw::DEFAULT_AUTHOR.to_string(),
            model_name: "untitled".to_string(),
        }
    }
}

/// Every tunable of the engine, loadable from TOML.
///
/// Missing keys take their defaults, so an empty file is a valid config:
///
/// ```toml
/// snap_distance = 12.0
///
/// [tolerances]
/// alignment = 0.5
///
/// [export]
/// author = "Ada"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Horizontal search radius of the snap resolver (mm).
    pub snap_distance: f64,
    /// Placement, collision and connection tolerances.
    pub tolerances: Tolerances,
    /// Mesh generation parameters.
    pub mesh: MeshSettings,
    /// Export defaults.
    pub export: ExportSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_distance: 12.0,
            tolerances: Tolerances::default(),
            mesh: MeshSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tolerances.validate()?;
        if !self.snap_distance.is_finite() || self.snap_distance <= 0.0 {
            return Err(ConfigError::InvalidSettings(
                "snap_distance must be positive".into(),
            ));
        }
        if self.mesh.bevel < 0.0 {
            return Err(ConfigError::InvalidSettings(
                "mesh.bevel must not be negative".into(),
            ));
        }
        if self.mesh.wall_thickness <= 0.0 {
            return Err(ConfigError::InvalidSettings(
                "mesh.wall_thickness must be positive".into(),
            ));
        }
        if self.mesh.stud_segments < 3 || self.mesh.body_segments < 3 {
            return Err(ConfigError::InvalidSettings(
                "mesh segment counts must be at least 3".into(),
            ));
        }
        Ok(())
    }
}
