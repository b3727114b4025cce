//! Part definition types.

use std::fmt;
use std::str::FromStr;

use brick_math::{Point3, Vec3};

use crate::derive;
use crate::dims::{MATERIAL_FACTOR, PLATE_HEIGHT, STUD_SPACING};
use crate::error::CatalogError;

/// Catalog grouping used for UI listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Bricks and plates.
    Basic,
    /// Slopes and inverted slopes.
    Slope,
    /// Round bricks, plates and cones.
    Round,
    /// Technic beams and bricks.
    Technic,
    /// Arches, wedges and other specials.
    Special,
    /// Minifigure parts.
    Minifig,
    /// Tiles and decoration.
    Decoration,
}

impl Category {
    /// All categories in listing order.
    pub const ALL: [Category; 7] = [
        Category::Basic,
        Category::Slope,
        Category::Round,
        Category::Technic,
        Category::Special,
        Category::Minifig,
        Category::Decoration,
    ];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Slope => "slope",
            Category::Round => "round",
            Category::Technic => "technic",
            Category::Special => "special",
            Category::Minifig => "minifig",
            Category::Decoration => "decoration",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// Direction a slope descends toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeDirection {
    /// Toward +Z.
    #[default]
    Front,
    /// Toward -Z.
    Back,
    /// Toward -X.
    Left,
    /// Toward +X.
    Right,
}

impl SlopeDirection {
    /// Yaw that maps the canonical (front-facing) slope onto this direction.
    pub fn yaw(&self) -> f64 {
        use std::f64::consts::{FRAC_PI_2, PI};
        match self {
            SlopeDirection::Front => 0.0,
            SlopeDirection::Back => PI,
            SlopeDirection::Left => -FRAC_PI_2,
            SlopeDirection::Right => FRAC_PI_2,
        }
    }

    /// True when the slope runs along X, so the canonical frame swaps width and depth.
    pub fn is_sideways(&self) -> bool {
        matches!(self, SlopeDirection::Left | SlopeDirection::Right)
    }
}

/// Body shape of a part, one variant per generator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    /// Rectangular brick or plate.
    #[default]
    Box,
    /// Slope descending toward `direction`.
    Slope {
        /// Nominal slope angle in degrees.
        angle_deg: f64,
        /// Descent direction.
        direction: SlopeDirection,
        /// Whether the underside is hollow.
        hollow: bool,
    },
    /// Inverted slope: flat top, underside ramps up toward `direction`.
    SlopeInverted {
        /// Nominal slope angle in degrees.
        angle_deg: f64,
        /// Direction the underside rises toward.
        direction: SlopeDirection,
    },
    /// Round brick or plate with bevelled rims.
    Round {
        /// Whether the core is hollow.
        hollow: bool,
    },
    /// Plain cylinder (generated like a round part).
    Cylinder,
    /// Cone tapering to a single stud.
    Cone,
    /// Wedge plate.
    Wedge {
        /// Direction of the cut edge.
        direction: SlopeDirection,
    },
    /// Arch with a cylindrical cut-out.
    Arch {
        /// Radius of the inner arch in millimeters.
        inner_radius: f64,
    },
}

impl Shape {
    /// Lowercase shape-kind name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Slope { .. } => "slope",
            Shape::SlopeInverted { .. } => "slope_inverted",
            Shape::Round { .. } => "round",
            Shape::Cylinder => "cylinder",
            Shape::Cone => "cone",
            Shape::Wedge { .. } => "wedge",
            Shape::Arch { .. } => "arch",
        }
    }

    /// True for shapes with a circular footprint.
    pub fn is_round(&self) -> bool {
        matches!(self, Shape::Round { .. } | Shape::Cylinder | Shape::Cone)
    }
}

/// Kind of a connection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Male stud on a top face.
    Stud,
    /// Female cavity under a bottom face.
    AntiStud,
    /// Cross-shaped axle hole.
    AxleHole,
    /// Round technic pin hole.
    PinHole,
    /// Axle end.
    Axle,
    /// Technic pin end.
    Pin,
}

/// A connector in part-local space (unrotated).
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPoint {
    /// Connector kind.
    pub kind: ConnectionKind,
    /// Position relative to the part origin (mm).
    pub position: Point3,
    /// Outward direction.
    pub normal: Vec3,
    /// Diameter for holes.
    pub size: Option<f64>,
}

impl ConnectionPoint {
    /// Stud on the top face.
    pub fn stud(x: f64, y: f64, z: f64) -> Self {
        Self {
            kind: ConnectionKind::Stud,
            position: Point3::new(x, y, z),
            normal: Vec3::y(),
            size: None,
        }
    }

    /// Anti-stud on the bottom face.
    pub fn anti_stud(x: f64, y: f64, z: f64) -> Self {
        Self {
            kind: ConnectionKind::AntiStud,
            position: Point3::new(x, y, z),
            normal: -Vec3::y(),
            size: None,
        }
    }
}

/// Collision primitive in part-local space.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Box with half extents, centered at `offset`.
    Cuboid {
        /// Half extents along each axis.
        half_extents: Vec3,
        /// Center relative to the part origin.
        offset: Vec3,
    },
    /// Vertical cylinder centered at `offset`.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Full height.
        height: f64,
        /// Center relative to the part origin.
        offset: Vec3,
    },
    /// Convex hull of local vertices.
    ConvexHull {
        /// Hull vertices.
        vertices: Vec<Point3>,
    },
}

/// Immutable description of a part type.
#[derive(Debug, Clone, PartialEq)]
pub struct PartDefinition {
    /// Unique catalog key.
    pub id: String,
    /// LDraw part file stem (e.g. `"3001"`).
    pub ldraw_id: String,
    /// Display name.
    pub name: String,
    /// Listing category.
    pub category: Category,
    /// Body shape.
    pub shape: Shape,
    /// Footprint along X in studs.
    pub width: u32,
    /// Footprint along Z in studs.
    pub depth: u32,
    /// Height in plate units.
    pub height: u32,
    /// Ordered local connection points.
    pub connection_points: Vec<ConnectionPoint>,
    /// Ordered local collision primitives.
    pub colliders: Vec<ColliderShape>,
    /// Approximate mass in grams.
    pub mass: f64,
}

impl PartDefinition {
    /// Build a definition, deriving connection points, colliders and mass
    /// from the shape and dimensions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        ldraw_id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        shape: Shape,
        width: u32,
        depth: u32,
        height: u32,
    ) -> Self {
        let width = width.max(1);
        let depth = depth.max(1);
        let height = height.max(1);
        let connection_points = derive::connection_points(&shape, width, depth, height);
        let colliders = derive::colliders(&shape, width, depth, height);
        Self {
            id: id.into(),
            ldraw_id: ldraw_id.into(),
            name: name.into(),
            category,
            shape,
            width,
            depth,
            height,
            connection_points,
            colliders,
            mass: width as f64 * depth as f64 * height as f64 * MATERIAL_FACTOR,
        }
    }

    /// Append extra connection points after derivation (technic holes, etc.).
    pub fn with_points(mut self, points: impl IntoIterator<Item = ConnectionPoint>) -> Self {
        self.connection_points.extend(points);
        self
    }

    /// Footprint width in millimeters.
    pub fn width_mm(&self) -> f64 {
        self.width as f64 * STUD_SPACING
    }

    /// Footprint depth in millimeters.
    pub fn depth_mm(&self) -> f64 {
        self.depth as f64 * STUD_SPACING
    }

    /// Body height in millimeters.
    pub fn height_mm(&self) -> f64 {
        self.height as f64 * PLATE_HEIGHT
    }

    /// Connection points of one kind, in definition order.
    pub fn points_of(&self, kind: ConnectionKind) -> impl Iterator<Item = &ConnectionPoint> {
        self.connection_points.iter().filter(move |p| p.kind == kind)
    }

    /// Stud points.
    pub fn studs(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.points_of(ConnectionKind::Stud)
    }

    /// Anti-stud points.
    pub fn anti_studs(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.points_of(ConnectionKind::AntiStud)
    }

    /// LDraw file name, e.g. `3001.dat`.
    pub fn ldraw_file(&self) -> String {
        if self.ldraw_id.ends_with(".dat") {
            self.ldraw_id.clone()
        } else {
            format!("{}.dat", self.ldraw_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_roundtrip() {
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>().unwrap(), c);
        }
        assert_eq!("SLOPE".parse::<Category>().unwrap(), Category::Slope);
        assert!("vehicle".parse::<Category>().is_err());
    }

    #[test]
    fn mass_scales_with_volume() {
        let def = PartDefinition::new("b", "3001", "Brick 2x4", Category::Basic, Shape::Box, 4, 2, 3);
        assert!((def.mass - 2.4).abs() < 1e-9);
    }

    #[test]
    fn zero_dimensions_are_clamped() {
        let def = PartDefinition::new("p", "3024", "Plate", Category::Basic, Shape::Box, 0, 1, 0);
        assert_eq!((def.width, def.depth, def.height), (1, 1, 1));
        assert_eq!(def.studs().count(), 1);
    }

    #[test]
    fn ldraw_file_suffix() {
        let def = PartDefinition::new("b", "3001", "Brick", Category::Basic, Shape::Box, 1, 1, 3);
        assert_eq!(def.ldraw_file(), "3001.dat");
        let def = PartDefinition::new("b", "3001.dat", "Brick", Category::Basic, Shape::Box, 1, 1, 3);
        assert_eq!(def.ldraw_file(), "3001.dat");
    }
}
