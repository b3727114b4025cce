//! Error types for scene operations.

use std::path::PathBuf;

use brick_catalog::CatalogError;
use brick_ir::SnapshotError;
use brick_math::ToleranceError;
use thiserror::Error;

/// Errors raised by [`Scene`](crate::Scene) operations.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Definition id not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// No placed part with this id.
    #[error("no placed part with id `{0}`")]
    UnknownPart(String),

    /// A part with this id already exists.
    #[error("a part with id `{0}` already exists")]
    DuplicatePart(String),

    /// The placement overlaps existing parts.
    #[error("part `{part}` would collide with {}", .with.join(", "))]
    Collision {
        /// Part being placed or moved.
        part: String,
        /// Parts it would overlap.
        with: Vec<String>,
    },

    /// The part is locked against edits.
    #[error("part `{0}` is locked")]
    Locked(String),

    /// Snapshot could not be read.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Errors raised while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config text is not valid TOML for the config schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A tolerance is out of range.
    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    /// Some other setting is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
