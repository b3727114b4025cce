//! Pure derivation of connection points and colliders from dimensions.
//!
//! Nothing here is authored per part: a new footprint only needs a
//! `(shape, width, depth, height)` tuple.

use brick_math::{rotate_yaw, Point3, Vec3};

use crate::definition::{ColliderShape, ConnectionPoint, Shape, SlopeDirection};
use crate::dims::{cell_centers, slope_flat_depth, PLATE_HEIGHT, STUD_SPACING};

/// Derive the ordered connection points: studs first, then anti-studs.
///
/// Studs sit on the top face (`y = height`), anti-studs on the bottom face
/// (`y = 0`), so a stud and the anti-stud of a part stacked flush on top
/// share one world position.
pub fn connection_points(shape: &Shape, width: u32, depth: u32, height: u32) -> Vec<ConnectionPoint> {
    let top = height as f64 * PLATE_HEIGHT;

    if shape.is_round() {
        return vec![
            ConnectionPoint::stud(0.0, top, 0.0),
            ConnectionPoint::anti_stud(0.0, 0.0, 0.0),
        ];
    }

    let cells: Vec<(u32, u32, f64, f64)> = cell_centers(width, depth)
        .into_iter()
        .enumerate()
        .map(|(n, (x, z))| (n as u32 % width, n as u32 / width, x, z))
        .collect();

    let all = |_: u32, _: u32| true;
    let (stud_filter, anti_filter): (Box<dyn Fn(u32, u32) -> bool>, Box<dyn Fn(u32, u32) -> bool>) =
        match shape {
            Shape::Slope { direction, .. } => {
                (Box::new(flat_row(*direction, width, depth)), Box::new(all))
            }
            Shape::SlopeInverted { direction, .. } => {
                (Box::new(all), Box::new(flat_row(*direction, width, depth)))
            }
            Shape::Arch { .. } => (Box::new(all), Box::new(arch_piers(width, depth))),
            _ => (Box::new(all), Box::new(all)),
        };

    let mut points = Vec::with_capacity(cells.len() * 2);
    points.extend(
        cells
            .iter()
            .filter(|(i, j, _, _)| stud_filter(*i, *j))
            .map(|&(_, _, x, z)| ConnectionPoint::stud(x, top, z)),
    );
    points.extend(
        cells
            .iter()
            .filter(|(i, j, _, _)| anti_filter(*i, *j))
            .map(|&(_, _, x, z)| ConnectionPoint::anti_stud(x, 0.0, z)),
    );
    points
}

/// Cells on the flat (full-height) strip of a slope.
fn flat_row(direction: SlopeDirection, width: u32, depth: u32) -> impl Fn(u32, u32) -> bool {
    move |i, j| match direction {
        SlopeDirection::Front => j == 0,
        SlopeDirection::Back => j + 1 == depth,
        SlopeDirection::Left => i + 1 == width,
        SlopeDirection::Right => i == 0,
    }
}

/// End cells along the long axis of an arch.
fn arch_piers(width: u32, depth: u32) -> impl Fn(u32, u32) -> bool {
    move |i, j| {
        if depth >= width {
            j == 0 || j + 1 == depth
        } else {
            i == 0 || i + 1 == width
        }
    }
}

/// Derive the collision primitives.
pub fn colliders(shape: &Shape, width: u32, depth: u32, height: u32) -> Vec<ColliderShape> {
    let w = width as f64 * STUD_SPACING;
    let d = depth as f64 * STUD_SPACING;
    let h = height as f64 * PLATE_HEIGHT;
    let center = Vec3::new(0.0, h / 2.0, 0.0);

    match shape {
        Shape::Round { .. } | Shape::Cylinder | Shape::Cone => vec![ColliderShape::Cylinder {
            radius: w / 2.0,
            height: h,
            offset: center,
        }],
        Shape::Slope { direction, .. } => vec![ColliderShape::ConvexHull {
            vertices: slope_body_vertices(width, depth, height, *direction, false).to_vec(),
        }],
        Shape::SlopeInverted { direction, .. } => vec![ColliderShape::ConvexHull {
            vertices: slope_body_vertices(width, depth, height, *direction, true).to_vec(),
        }],
        Shape::Box | Shape::Wedge { .. } | Shape::Arch { .. } => vec![ColliderShape::Cuboid {
            half_extents: Vec3::new(w / 2.0, h / 2.0, d / 2.0),
            offset: center,
        }],
    }
}

/// The eight corners of a slope body in part-local space.
///
/// Canonical layout (descending toward +Z), per side `x = -w/2` then
/// `x = +w/2`: back-bottom, back-top, ridge, front-bottom. Inverted slopes
/// mirror the profile vertically. The result is rotated onto `direction`.
pub fn slope_body_vertices(
    width: u32,
    depth: u32,
    height: u32,
    direction: SlopeDirection,
    inverted: bool,
) -> [Point3; 8] {
    let (w, d) = if direction.is_sideways() {
        (depth as f64 * STUD_SPACING, width as f64 * STUD_SPACING)
    } else {
        (width as f64 * STUD_SPACING, depth as f64 * STUD_SPACING)
    };
    let h = height as f64 * PLATE_HEIGHT;
    let flat = slope_flat_depth(d);
    let (low, high) = if inverted { (h, 0.0) } else { (0.0, h) };

    let profile = [
        (low, -d / 2.0),
        (high, -d / 2.0),
        (high, -d / 2.0 + flat),
        (low, d / 2.0),
    ];

    let yaw = direction.yaw();
    let mut out = [Point3::origin(); 8];
    for (side, x) in [-w / 2.0, w / 2.0].into_iter().enumerate() {
        for (k, &(y, z)) in profile.iter().enumerate() {
            let v = rotate_yaw(&Vec3::new(x, y, z), yaw);
            out[side * 4 + k] = Point3::from(v);
        }
    }
    out
}
