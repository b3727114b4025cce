//! Grid alignment on the universal stud lattice.

use brick_catalog::dims::{PLATE_HEIGHT, STUD_SPACING};
use brick_math::{is_quarter_turn, Point3, Tolerances};

/// Footprint `(along X, along Z)` in studs after applying `yaw`.
///
/// Width and depth swap only for quarter turns; any other yaw keeps the
/// unrotated footprint.
pub fn effective_footprint(width: u32, depth: u32, yaw: f64, tol: &Tolerances) -> (u32, u32) {
    if is_quarter_turn(yaw, tol.rotation) {
        (depth, width)
    } else {
        (width, depth)
    }
}

/// Nearest valid placement point for a part of the given footprint.
///
/// Axes with an even stud count are offset by half a stud so the studs of
/// every part land on the same lattice. Y snaps to whole plates.
pub fn snap_to_grid(point: &Point3, width: u32, depth: u32, yaw: f64, tol: &Tolerances) -> Point3 {
    let (along_x, along_z) = effective_footprint(width, depth, yaw, tol);
    Point3::new(
        snap_axis(point.x, STUD_SPACING, parity_offset(along_x)),
        snap_axis(point.y, PLATE_HEIGHT, 0.0),
        snap_axis(point.z, STUD_SPACING, parity_offset(along_z)),
    )
}

fn parity_offset(studs: u32) -> f64 {
    if studs % 2 == 0 {
        STUD_SPACING / 2.0
    } else {
        0.0
    }
}

fn snap_axis(raw: f64, pitch: f64, offset: f64) -> f64 {
    ((raw - offset) / pitch).round() * pitch + offset
}
