//! Per-shape mesh generators.

use std::f64::consts::FRAC_PI_2;

use brick_catalog::derive::slope_body_vertices;
use brick_catalog::dims::{POST_RADIUS, STUD_HEIGHT, STUD_RADIUS, STUD_SPACING, TUBE_INNER_RADIUS, TUBE_OUTER_RADIUS};
use brick_catalog::{PartDefinition, Shape, SlopeDirection};
use brick_math::{Point3, Vec3};

use crate::primitives::{chamfered_box, lathe, post, push_face, stud, tube};
use crate::{MeshSettings, TriangleMesh};

/// Build the mesh for a part definition.
///
/// Dispatches on the shape variant. Wedges and arches use the box
/// generator.
pub fn build_geometry(def: &PartDefinition, settings: &MeshSettings) -> TriangleMesh {
    match &def.shape {
        Shape::Box | Shape::Wedge { .. } | Shape::Arch { .. } => box_geometry(def, settings),
        Shape::Slope { direction, .. } => slope_geometry(def, *direction, false, settings),
        Shape::SlopeInverted { direction, .. } => slope_geometry(def, *direction, true, settings),
        Shape::Round { .. } | Shape::Cylinder => round_geometry(def, settings),
        Shape::Cone => cone_geometry(def, settings),
    }
}

fn box_geometry(def: &PartDefinition, settings: &MeshSettings) -> TriangleMesh {
    let (w, d, h) = (def.width_mm(), def.depth_mm(), def.height_mm());
    let mut mesh = chamfered_box(
        w / 2.0,
        h / 2.0,
        d / 2.0,
        &Point3::new(0.0, h / 2.0, 0.0),
        settings.bevel,
    );
    add_studs(&mut mesh, def, settings);
    add_supports(&mut mesh, def, settings);
    mesh
}

fn add_studs(mesh: &mut TriangleMesh, def: &PartDefinition, settings: &MeshSettings) {
    for point in def.studs() {
        mesh.merge(&stud(
            &point.position,
            STUD_RADIUS,
            STUD_HEIGHT,
            settings.bevel,
            settings.stud_segments,
        ));
    }
}

/// Underside tubes between interior grid intersections, or posts for 1xN parts.
fn add_supports(mesh: &mut TriangleMesh, def: &PartDefinition, settings: &MeshSettings) {
    let (w, d) = (def.width, def.depth);
    if w == 1 && d == 1 {
        return;
    }
    let height = def.height_mm() - settings.wall_thickness;
    if height < settings.wall_thickness {
        return;
    }
    let y = def.height_mm() - settings.wall_thickness;
    let line = |i: u32, count: u32| (i as f64 - count as f64 / 2.0) * STUD_SPACING;

    if w > 1 && d > 1 {
        for j in 1..d {
            for i in 1..w {
                let top = Point3::new(line(i, w), y, line(j, d));
                mesh.merge(&tube(
                    &top,
                    TUBE_OUTER_RADIUS,
                    TUBE_INNER_RADIUS,
                    height,
                    settings.stud_segments,
                ));
            }
        }
    } else if w > 1 {
        for i in 1..w {
            let top = Point3::new(line(i, w), y, 0.0);
            mesh.merge(&post(&top, POST_RADIUS, height, settings.stud_segments));
        }
    } else {
        for j in 1..d {
            let top = Point3::new(0.0, y, line(j, d));
            mesh.merge(&post(&top, POST_RADIUS, height, settings.stud_segments));
        }
    }
}

/// Slope hexahedron with flat-shaded faces oriented away from its centroid.
fn slope_geometry(
    def: &PartDefinition,
    direction: SlopeDirection,
    inverted: bool,
    settings: &MeshSettings,
) -> TriangleMesh {
    let v = slope_body_vertices(def.width, def.depth, def.height, direction, inverted);
    let centroid = Point3::from(v.iter().map(|p| p.coords).sum::<Vec3>() / v.len() as f64);

    const FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3], // side
        [4, 5, 6, 7], // side
        [0, 1, 5, 4], // back
        [1, 2, 6, 5], // flat strip
        [2, 3, 7, 6], // ramp
        [0, 3, 7, 4], // base
    ];

    let mut mesh = TriangleMesh::new();
    for face in FACES {
        let quad = face.map(|i| v[i]);
        let mut normal = (quad[2] - quad[0]).cross(&(quad[3] - quad[1]));
        let face_center = Point3::from(quad.iter().map(|p| p.coords).sum::<Vec3>() / 4.0);
        if normal.dot(&(face_center - centroid)) < 0.0 {
            normal = -normal;
        }
        push_face(&mut mesh, &quad, &normal);
    }
    add_studs(&mut mesh, def, settings);
    mesh
}

/// Round brick or plate: shaft with torus bevels, flat caps and one stud.
fn round_geometry(def: &PartDefinition, settings: &MeshSettings) -> TriangleMesh {
    let radius = def.width_mm() / 2.0;
    let h = def.height_mm();
    let b = settings.bevel.clamp(0.0, radius.min(h) * 0.25);
    let steps = settings.bevel_steps.max(1);

    let arc = |cr: f64, cy: f64, from: f64| {
        (0..=steps).map(move |k| {
            let phi = from + FRAC_PI_2 * k as f64 / steps as f64;
            (cr + b * phi.cos(), cy + b * phi.sin())
        })
    };

    let mut profile = vec![(0.0, 0.0)];
    profile.extend(arc(radius - b, b, -FRAC_PI_2));
    profile.extend(arc(radius - b, h - b, 0.0));
    profile.push((0.0, h));
    profile.dedup();

    let mut mesh = lathe(&profile, settings.body_segments, &Point3::origin());
    add_studs(&mut mesh, def, settings);
    mesh.compute_vertex_normals();
    mesh
}

/// Frustum from the footprint radius down to stud radius, topped by one stud.
fn cone_geometry(def: &PartDefinition, settings: &MeshSettings) -> TriangleMesh {
    let radius = def.width_mm() / 2.0;
    let h = def.height_mm();
    let profile = [(0.0, 0.0), (radius, 0.0), (STUD_RADIUS, h), (0.0, h)];

    let mut mesh = lathe(&profile, settings.body_segments, &Point3::origin());
    add_studs(&mut mesh, def, settings);
    mesh.compute_vertex_normals();
    mesh
}
