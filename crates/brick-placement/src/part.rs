//! Placed part instances and their world-space connection points.

use brick_catalog::{ConnectionKind, PartDefinition};
use brick_math::{Point3, Transform, Vec3};

/// A part instance in the scene.
///
/// The definition is referenced by id only; look it up in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPart {
    /// Unique instance id.
    pub id: String,
    /// Catalog key of the definition.
    pub definition_id: String,
    /// World position of the part origin (bottom-centre of the footprint), mm.
    pub position: Point3,
    /// Euler rotation in radians. Placement logic only reads `rotation.y`.
    pub rotation: Vec3,
    /// Palette index.
    pub color: u32,
    /// Selected in the editor.
    pub selected: bool,
    /// Locked against edits.
    pub locked: bool,
    /// Preview-only instance.
    pub ghost: bool,
    /// Pinned in place for simulation.
    pub is_static: bool,
    /// Ids of directly connected parts, refreshed on every graph rebuild.
    pub connections: Vec<String>,
    /// Build step index.
    pub step: Option<u32>,
    /// Group id.
    pub group: Option<String>,
}

impl PlacedPart {
    /// New unrotated part with default colour and cleared flags.
    pub fn new(id: impl Into<String>, definition_id: impl Into<String>, position: Point3) -> Self {
        Self {
            id: id.into(),
            definition_id: definition_id.into(),
            position,
            rotation: Vec3::zeros(),
            color: 0,
            selected: false,
            locked: false,
            ghost: false,
            is_static: false,
            connections: Vec::new(),
            step: None,
            group: None,
        }
    }

    /// Set the yaw, keeping the other rotation axes.
    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.rotation.y = yaw;
        self
    }

    /// Set the full Euler rotation.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the palette index.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Rotation about the vertical axis.
    pub fn yaw(&self) -> f64 {
        self.rotation.y
    }

    /// Local-to-world placement transform.
    pub fn transform(&self) -> Transform {
        Transform::placement(&self.position, self.yaw())
    }
}

/// World positions of the connection points of one kind, with their index
/// into the definition's point list.
///
/// The local offset is rotated by `yaw` and then translated by `position`.
/// Snap resolution and connection detection both go through this function
/// so they agree for rotated parts.
pub fn world_points(
    def: &PartDefinition,
    position: &Point3,
    yaw: f64,
    kind: ConnectionKind,
) -> Vec<(usize, Point3)> {
    let placement = Transform::placement(position, yaw);
    def.connection_points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.kind == kind)
        .map(|(i, p)| (i, placement.apply_point(&p.position)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use brick_catalog::Catalog;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_world_studs_translate() {
        let catalog = Catalog::standard();
        let def = catalog.get("brick_1x2").unwrap();
        let studs = world_points(def, &Point3::new(4.0, 0.0, 0.0), 0.0, ConnectionKind::Stud);
        assert_eq!(studs.len(), 2);
        assert_relative_eq!(studs[0].1.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(studs[1].1.x, 8.0, epsilon = 1e-9);
        assert_relative_eq!(studs[0].1.y, 9.6, epsilon = 1e-9);
    }

    #[test]
    fn test_world_studs_follow_yaw() {
        let catalog = Catalog::standard();
        let def = catalog.get("brick_1x2").unwrap();
        let studs = world_points(def, &Point3::origin(), FRAC_PI_2, ConnectionKind::Stud);
        // a quarter turn lays the 1x2 along Z
        for (_, p) in &studs {
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
            assert_relative_eq!(p.z.abs(), 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_point_indices_refer_to_definition() {
        let catalog = Catalog::standard();
        let def = catalog.get("plate_2x2").unwrap();
        let anti = world_points(def, &Point3::origin(), 0.0, ConnectionKind::AntiStud);
        assert_eq!(anti.first().map(|(i, _)| *i), Some(4));
        assert!(anti
            .iter()
            .all(|(i, _)| def.connection_points[*i].kind == ConnectionKind::AntiStud));
    }

    #[test]
    fn test_builder_sets_fields() {
        let part = PlacedPart::new("part-1", "brick_2x4", Point3::new(0.0, 9.6, 0.0))
            .with_yaw(FRAC_PI_2)
            .with_color(3);
        assert_eq!(part.yaw(), FRAC_PI_2);
        assert_eq!(part.color, 3);
        assert!(!part.selected && !part.locked && !part.ghost && !part.is_static);
    }
}
