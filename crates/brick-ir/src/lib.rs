//! Serialized scene snapshot for the brickforge engine.
//!
//! A snapshot is the flat, ordered list of part placements that the
//! persistence layer stores. It carries no runtime state: selection, lock,
//! ghost and static flags are reset on load and connections are recomputed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Current snapshot format version.
pub const FORMAT_VERSION: &str = "0.1";

/// 3D vector with f64 components (millimeters or radians).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One placed part as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Instance identifier.
    pub id: String,
    /// Part definition identifier.
    #[serde(alias = "partId", alias = "part_id")]
    pub definition_id: String,
    /// World position in millimeters.
    pub position: Vec3,
    /// Euler rotation in radians.
    #[serde(default)]
    pub rotation: Vec3,
    /// Palette index.
    #[serde(default)]
    pub color: u32,
    /// Build step index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    /// Group identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Errors raised while reading a snapshot. Import is all-or-nothing.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Input is not valid JSON.
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level value is not an object.
    #[error("snapshot must be a JSON object")]
    NotAnObject,

    /// `name` missing, not a string, or blank.
    #[error("snapshot is missing a model name")]
    MissingName,

    /// `parts` missing or not an array.
    #[error("snapshot `parts` must be a list")]
    PartsNotList,

    /// A part record could not be decoded.
    #[error("part record {index} is malformed: {source}")]
    BadRecord {
        /// Position of the record in the `parts` array.
        index: usize,
        /// Decoder error.
        source: serde_json::Error,
    },
}

/// A saved scene: model name plus ordered part records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Format version string.
    pub version: String,
    /// Model name (also the exported model title).
    pub name: String,
    /// Placed parts, in scene order.
    pub parts: Vec<PartRecord>,
}

impl SceneSnapshot {
    /// Create an empty snapshot.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            name: name.into(),
            parts: Vec::new(),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, validating the shape before decoding records.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        let Value::Object(mut obj) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        let name = match obj.remove("name") {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => return Err(SnapshotError::MissingName),
        };

        let Some(Value::Array(raw_parts)) = obj.remove("parts") else {
            return Err(SnapshotError::PartsNotList);
        };

        let version = match obj.remove("version") {
            Some(Value::String(v)) => v,
            _ => FORMAT_VERSION.to_string(),
        };

        let parts = raw_parts
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value(raw).map_err(|source| SnapshotError::BadRecord { index, source })
            })
            .collect::<Result<Vec<PartRecord>, _>>()?;

        Ok(Self {
            version,
            name,
            parts,
        })
    }
}
