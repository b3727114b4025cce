//! Physical dimensions of the part system, in millimeters.

/// Horizontal distance between adjacent stud centers.
pub const STUD_SPACING: f64 = 8.0;

/// Height of one plate unit.
pub const PLATE_HEIGHT: f64 = 3.2;

/// Plate units per standard brick.
pub const PLATES_PER_BRICK: u32 = 3;

/// Height of one standard brick.
pub const BRICK_HEIGHT: f64 = PLATE_HEIGHT * PLATES_PER_BRICK as f64;

/// Stud cylinder radius.
pub const STUD_RADIUS: f64 = 2.4;

/// Stud cylinder height above the top face.
pub const STUD_HEIGHT: f64 = 1.7;

/// Wall and top-plate thickness.
pub const WALL_THICKNESS: f64 = 1.2;

/// Outer radius of an underside support tube.
pub const TUBE_OUTER_RADIUS: f64 = 3.255;

/// Inner radius of an underside support tube.
pub const TUBE_INNER_RADIUS: f64 = 2.4;

/// Radius of the solid post used under 1xN parts.
pub const POST_RADIUS: f64 = 1.6;

/// Technic pin-hole diameter.
pub const PIN_HOLE_DIAMETER: f64 = 4.8;

/// Height of a technic hole center above the part bottom.
pub const PIN_HOLE_HEIGHT: f64 = 5.8;

/// Grams per stud-cell per plate unit.
pub const MATERIAL_FACTOR: f64 = 0.1;

/// Depth of the flat strip on a slope.
pub fn slope_flat_depth(depth_mm: f64) -> f64 {
    (depth_mm * 0.4).min(STUD_SPACING)
}

/// Local `(x, z)` centers of every footprint cell, row by row along Z.
pub fn cell_centers(width: u32, depth: u32) -> Vec<(f64, f64)> {
    let mut cells = Vec::with_capacity((width * depth) as usize);
    for j in 0..depth {
        for i in 0..width {
            cells.push((cell_offset(i, width), cell_offset(j, depth)));
        }
    }
    cells
}

/// Offset of cell `index` from the footprint center along an axis of `count` cells.
pub fn cell_offset(index: u32, count: u32) -> f64 {
    (index as f64 - (count as f64 - 1.0) / 2.0) * STUD_SPACING
}
