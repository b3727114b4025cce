#![warn(missing_docs)]

//! Placement logic for brickforge: where a new part may go.
//!
//! - [`grid`]: align a free point to the universal stud lattice
//! - [`snap`]: seat a part on (or under) the studs of existing parts
//! - [`collision`]: footprint box overlap between placed parts
//!
//! Every function is pure over a caller-supplied snapshot of the placed
//! parts and a shared [`Catalog`](brick_catalog::Catalog).

pub mod collision;
pub mod grid;
pub mod part;
pub mod snap;

pub use collision::{check_collision, find_colliding_parts, Aabb3};
pub use grid::{effective_footprint, snap_to_grid};
pub use part::{world_points, PlacedPart};
pub use snap::{find_snap_position, resolve_placement, SnapResult};
