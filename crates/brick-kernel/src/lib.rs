#![warn(missing_docs)]

//! High-level scene facade for brickforge.
//!
//! Provides the [`Scene`] type: the placed parts of one model together with
//! the connection graph derived from them. Placing a part resolves a rough
//! pointer position by stud snapping, falls back to grid alignment, rejects
//! overlaps, and rebuilds connections.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use brick_kernel::{Catalog, EngineConfig, Point3, Scene};
//!
//! let mut scene = Scene::new(Arc::new(Catalog::standard()), EngineConfig::default());
//! let base = scene.place("brick_2x4", &Point3::origin(), 0.0, 0).unwrap();
//! let top = scene.place("brick_2x2", &Point3::new(-4.0, 9.6, 0.0), 0.0, 1).unwrap();
//! assert_eq!(scene.part(&top).unwrap().connections, vec![base]);
//! ```

pub use brick_catalog;
pub use brick_connect;
pub use brick_ir;
pub use brick_ldraw;
pub use brick_math;
pub use brick_mesh;
pub use brick_placement;

pub use brick_catalog::{Catalog, Category, PartDefinition, Shape};
pub use brick_connect::{Connection, ConnectionType};
pub use brick_ir::SceneSnapshot;
pub use brick_ldraw::LdrawExport;
pub use brick_math::{Point3, Tolerances, Vec3};
pub use brick_mesh::{MeshSettings, TriangleMesh};
pub use brick_placement::PlacedPart;

mod config;
mod error;
mod scene;
mod snapshot;

pub use config::{EngineConfig, ExportSettings};
pub use error::{ConfigError, Result, SceneError};
pub use scene::{PlacementPreview, Scene, SceneStats};
