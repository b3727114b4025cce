#![warn(missing_docs)]

//! Part catalog for the brickforge engine.
//!
//! Holds the immutable [`PartDefinition`]s every other component looks up by
//! id. Connection points and colliders are derived from each definition's
//! shape and dimensions by the pure functions in [`derive`], so the standard
//! set in [`catalog`] is just a table of footprints.
//!
//! # Example
//!
//! ```
//! use brick_catalog::{Catalog, Category};
//!
//! let catalog = Catalog::standard();
//! let brick = catalog.get("brick_2x4").unwrap();
//! assert_eq!(brick.studs().count(), 8);
//! assert!(catalog.by_category(Category::Slope).count() > 0);
//! ```

pub mod catalog;
pub mod definition;
pub mod derive;
pub mod dims;
mod error;
pub mod palette;

pub use catalog::{standard_parts, Catalog};
pub use definition::{
    Category, ColliderShape, ConnectionKind, ConnectionPoint, PartDefinition, Shape, SlopeDirection,
};
pub use error::CatalogError;
pub use palette::{Palette, PaletteColor};
