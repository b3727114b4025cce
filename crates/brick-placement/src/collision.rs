//! Axis-aligned overlap tests between placed parts.

use brick_catalog::{Catalog, PartDefinition};
use brick_catalog::dims::STUD_SPACING;
use brick_math::{Point3, Tolerances};

use crate::grid::effective_footprint;
use crate::part::PlacedPart;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Footprint box of a part placed at `position` with `yaw`.
    ///
    /// Uses the same quarter-turn rule as grid snapping.
    pub fn for_part(def: &PartDefinition, position: &Point3, yaw: f64, tol: &Tolerances) -> Self {
        let (along_x, along_z) = effective_footprint(def.width, def.depth, yaw, tol);
        let hx = along_x as f64 * STUD_SPACING / 2.0;
        let hz = along_z as f64 * STUD_SPACING / 2.0;
        Self {
            min: Point3::new(position.x - hx, position.y, position.z - hz),
            max: Point3::new(position.x + hx, position.y + def.height_mm(), position.z + hz),
        }
    }

    /// True when no point has been included.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another.
    pub fn include(&mut self, other: &Aabb3) {
        self.include_point(&other.min);
        self.include_point(&other.max);
    }

    /// Shrink by `margin` on every side.
    pub fn shrink(&self, margin: f64) -> Self {
        Self {
            min: Point3::new(self.min.x + margin, self.min.y + margin, self.min.z + margin),
            max: Point3::new(self.max.x - margin, self.max.y - margin, self.max.z - margin),
        }
    }

    /// Strict overlap on all three axes; touching faces do not overlap.
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Shrunken box of a placed part, or `None` for an unknown definition.
fn part_box(part: &PlacedPart, catalog: &Catalog, tol: &Tolerances) -> Option<Aabb3> {
    match catalog.get(&part.definition_id) {
        Some(def) => Some(
            Aabb3::for_part(def, &part.position, part.yaw(), tol).shrink(tol.collision_margin),
        ),
        None => {
            tracing::warn!(
                part = %part.id,
                definition = %part.definition_id,
                "ignoring part with unknown definition in collision check"
            );
            None
        }
    }
}

/// Ids of the existing parts overlapping `candidate`, in iteration order.
///
/// `exclude_id` (typically the part being moved) and the candidate's own id
/// are skipped.
pub fn find_colliding_parts<'a>(
    candidate: &PlacedPart,
    existing: impl IntoIterator<Item = &'a PlacedPart>,
    exclude_id: Option<&str>,
    catalog: &Catalog,
    tol: &Tolerances,
) -> Vec<String> {
    let Some(probe) = part_box(candidate, catalog, tol) else {
        return Vec::new();
    };
    existing
        .into_iter()
        .filter(|other| other.id != candidate.id && Some(other.id.as_str()) != exclude_id)
        .filter(|other| part_box(other, catalog, tol).is_some_and(|b| probe.overlaps(&b)))
        .map(|other| other.id.clone())
        .collect()
}

/// True when `candidate` overlaps any existing part.
pub fn check_collision<'a>(
    candidate: &PlacedPart,
    existing: impl IntoIterator<Item = &'a PlacedPart>,
    exclude_id: Option<&str>,
    catalog: &Catalog,
    tol: &Tolerances,
) -> bool {
    let Some(probe) = part_box(candidate, catalog, tol) else {
        return false;
    };
    existing
        .into_iter()
        .filter(|other| other.id != candidate.id && Some(other.id.as_str()) != exclude_id)
        .any(|other| part_box(other, catalog, tol).is_some_and(|b| probe.overlaps(&b)))
}
