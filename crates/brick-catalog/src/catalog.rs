//! Part registry and the standard part set.

use indexmap::IndexMap;

use crate::definition::{Category, ConnectionKind, ConnectionPoint, PartDefinition, Shape, SlopeDirection};
use crate::dims::{cell_offset, PIN_HOLE_DIAMETER, PIN_HOLE_HEIGHT};
use crate::error::CatalogError;
use brick_math::{Point3, Vec3};

/// Registry of part definitions keyed by id, in registration order.
///
/// Constructed once at startup and shared by reference; definitions never
/// change after registration.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    defs: IndexMap<String, PartDefinition>,
}

/// `(id, ldraw, name, width, depth)` for standard bricks.
const BRICKS: &[(&str, &str, &str, u32, u32)] = &[
    ("brick_1x1", "3005", "Brick 1 x 1", 1, 1),
    ("brick_1x2", "3004", "Brick 1 x 2", 2, 1),
    ("brick_1x3", "3622", "Brick 1 x 3", 3, 1),
    ("brick_1x4", "3010", "Brick 1 x 4", 4, 1),
    ("brick_1x6", "3009", "Brick 1 x 6", 6, 1),
    ("brick_1x8", "3008", "Brick 1 x 8", 8, 1),
    ("brick_2x2", "3003", "Brick 2 x 2", 2, 2),
    ("brick_2x3", "3002", "Brick 2 x 3", 3, 2),
    ("brick_2x4", "3001", "Brick 2 x 4", 4, 2),
    ("brick_2x6", "2456", "Brick 2 x 6", 6, 2),
    ("brick_2x8", "3007", "Brick 2 x 8", 8, 2),
    ("brick_4x6", "2356", "Brick 4 x 6", 6, 4),
];

/// `(id, ldraw, name, width, depth)` for standard plates.
const PLATES: &[(&str, &str, &str, u32, u32)] = &[
    ("plate_1x1", "3024", "Plate 1 x 1", 1, 1),
    ("plate_1x2", "3023", "Plate 1 x 2", 2, 1),
    ("plate_1x3", "3623", "Plate 1 x 3", 3, 1),
    ("plate_1x4", "3710", "Plate 1 x 4", 4, 1),
    ("plate_1x6", "3666", "Plate 1 x 6", 6, 1),
    ("plate_1x8", "3460", "Plate 1 x 8", 8, 1),
    ("plate_2x2", "3022", "Plate 2 x 2", 2, 2),
    ("plate_2x3", "3021", "Plate 2 x 3", 3, 2),
    ("plate_2x4", "3020", "Plate 2 x 4", 4, 2),
    ("plate_2x6", "3795", "Plate 2 x 6", 6, 2),
    ("plate_2x8", "3034", "Plate 2 x 8", 8, 2),
    ("plate_4x4", "3031", "Plate 4 x 4", 4, 4),
    ("plate_4x6", "3032", "Plate 4 x 6", 6, 4),
    ("plate_4x8", "3035", "Plate 4 x 8", 8, 4),
    ("plate_6x6", "3958", "Plate 6 x 6", 6, 6),
    ("plate_6x8", "3036", "Plate 6 x 8", 8, 6),
    ("plate_8x8", "41539", "Plate 8 x 8", 8, 8),
];

/// `(id, ldraw, name, angle, width, depth, height)` for slopes descending to the front.
const SLOPES: &[(&str, &str, &str, f64, u32, u32, u32)] = &[
    ("slope_33_3x2", "3298", "Slope 33 3 x 2", 33.0, 2, 3, 3),
    ("slope_45_2x1", "3040", "Slope 45 2 x 1", 45.0, 1, 2, 3),
    ("slope_45_2x2", "3039", "Slope 45 2 x 2", 45.0, 2, 2, 3),
    ("slope_75_2x1x3", "4460", "Slope 75 2 x 1 x 3", 75.0, 1, 2, 9),
];

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-populated with the standard part set.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for def in standard_parts() {
            catalog.register(def);
        }
        catalog
    }

    /// Insert or overwrite a definition. Overwrites keep the original position.
    pub fn register(&mut self, def: PartDefinition) {
        self.defs.insert(def.id.clone(), def);
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&PartDefinition> {
        self.defs.get(id)
    }

    /// Look up a definition, failing with [`CatalogError::UnknownPart`].
    pub fn require(&self, id: &str) -> Result<&PartDefinition, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::UnknownPart(id.to_string()))
    }

    /// True when `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    /// All definitions in registration order.
    pub fn all(&self) -> impl Iterator<Item = &PartDefinition> {
        self.defs.values()
    }

    /// Definitions in one category, in registration order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &PartDefinition> {
        self.all().filter(move |d| d.category == category)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// The standard part set, in listing order.
pub fn standard_parts() -> Vec<PartDefinition> {
    let mut parts = Vec::new();

    for &(id, ldraw, name, w, d) in BRICKS {
        parts.push(PartDefinition::new(id, ldraw, name, Category::Basic, Shape::Box, w, d, 3));
    }
    for &(id, ldraw, name, w, d) in PLATES {
        parts.push(PartDefinition::new(id, ldraw, name, Category::Basic, Shape::Box, w, d, 1));
    }

    for &(id, ldraw, name, angle_deg, w, d, h) in SLOPES {
        let shape = Shape::Slope {
            angle_deg,
            direction: SlopeDirection::Front,
            hollow: true,
        };
        parts.push(PartDefinition::new(id, ldraw, name, Category::Slope, shape, w, d, h));
    }
    parts.push(PartDefinition::new(
        "slope_inverted_45_2x2",
        "3660",
        "Slope Inverted 45 2 x 2",
        Category::Slope,
        Shape::SlopeInverted {
            angle_deg: 45.0,
            direction: SlopeDirection::Front,
        },
        2,
        2,
        3,
    ));

    let round = [
        ("round_brick_1x1", "3062b", "Brick Round 1 x 1", Shape::Round { hollow: true }, 1, 3),
        ("round_brick_2x2", "3941", "Brick Round 2 x 2", Shape::Round { hollow: true }, 2, 3),
        ("round_plate_1x1", "4073", "Plate Round 1 x 1", Shape::Cylinder, 1, 1),
        ("round_plate_2x2", "4032", "Plate Round 2 x 2", Shape::Cylinder, 2, 1),
        ("cone_1x1", "4589", "Cone 1 x 1", Shape::Cone, 1, 3),
        ("cone_2x2x2", "3942c", "Cone 2 x 2 x 2", Shape::Cone, 2, 6),
    ];
    for (id, ldraw, name, shape, size, h) in round {
        parts.push(PartDefinition::new(id, ldraw, name, Category::Round, shape, size, size, h));
    }

    parts.push(
        PartDefinition::new(
            "technic_brick_1x4",
            "3701",
            "Technic Brick 1 x 4 with Holes",
            Category::Technic,
            Shape::Box,
            4,
            1,
            3,
        )
        .with_points(pin_holes(4)),
    );

    parts.push(PartDefinition::new(
        "arch_1x4",
        "3659",
        "Arch 1 x 4",
        Category::Special,
        Shape::Arch { inner_radius: 8.0 },
        1,
        4,
        3,
    ));
    parts.push(PartDefinition::new(
        "wedge_plate_3x2",
        "43722",
        "Wedge Plate 3 x 2 Right",
        Category::Special,
        Shape::Wedge {
            direction: SlopeDirection::Right,
        },
        2,
        3,
        1,
    ));

    parts
}

/// Pin holes through the side of a 1 x `length` technic brick, between studs.
fn pin_holes(length: u32) -> Vec<ConnectionPoint> {
    (0..length.saturating_sub(1))
        .flat_map(|i| {
            let x = cell_offset(i, length) + 4.0;
            [1.0, -1.0].map(|side| ConnectionPoint {
                kind: ConnectionKind::PinHole,
                position: Point3::new(x, PIN_HOLE_HEIGHT, 0.0),
                normal: Vec3::new(0.0, 0.0, side),
                size: Some(PIN_HOLE_DIAMETER),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_populated() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), standard_parts().len());
        let brick = catalog.get("brick_2x4").unwrap();
        assert_eq!((brick.width, brick.depth, brick.height), (4, 2, 3));
        assert_eq!(brick.ldraw_file(), "3001.dat");
    }

    #[test]
    fn registration_order_is_preserved() {
        let catalog = Catalog::standard();
        let ids: Vec<_> = catalog.all().take(3).map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["brick_1x1", "brick_1x2", "brick_1x3"]);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut catalog = Catalog::new();
        catalog.register(PartDefinition::new("a", "1", "A", Category::Basic, Shape::Box, 1, 1, 1));
        catalog.register(PartDefinition::new("b", "2", "B", Category::Basic, Shape::Box, 1, 1, 1));
        catalog.register(PartDefinition::new("a", "1", "A2", Category::Basic, Shape::Box, 2, 2, 1));

        let names: Vec<_> = catalog.all().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["A2", "B"]);
        assert_eq!(catalog.get("a").unwrap().width, 2);
    }

    #[test]
    fn unknown_part_is_an_error() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.require("brick_9x9").unwrap_err(),
            CatalogError::UnknownPart("brick_9x9".to_string())
        );
        assert!(catalog.get("brick_9x9").is_none());
    }

    #[test]
    fn by_category_filters() {
        let catalog = Catalog::standard();
        let slopes: Vec<_> = catalog.by_category(Category::Slope).collect();
        assert_eq!(slopes.len(), SLOPES.len() + 1);
        assert!(slopes.iter().all(|d| d.category == Category::Slope));
        assert_eq!(catalog.by_category(Category::Minifig).count(), 0);
    }

    #[test]
    fn every_box_part_has_full_stud_grid() {
        let catalog = Catalog::standard();
        for def in catalog.all().filter(|d| d.shape == Shape::Box) {
            let cells = (def.width * def.depth) as usize;
            assert_eq!(def.studs().count(), cells, "{}", def.id);
            assert_eq!(def.anti_studs().count(), cells, "{}", def.id);
        }
    }

    #[test]
    fn technic_brick_has_pin_holes() {
        let catalog = Catalog::standard();
        let def = catalog.get("technic_brick_1x4").unwrap();
        assert_eq!(def.points_of(ConnectionKind::PinHole).count(), 6);
        assert_eq!(def.studs().count(), 4);
    }
}
