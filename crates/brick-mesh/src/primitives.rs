//! Low-level mesh primitives: oriented faces, chamfered boxes and lathed solids.

use std::f64::consts::TAU;

use brick_math::{Point3, Vec3};

use crate::TriangleMesh;

/// Append a planar convex polygon with a flat normal.
///
/// Vertices are fan-triangulated from the first one; the winding is flipped
/// when needed so every triangle faces along `normal`.
pub fn push_face(mesh: &mut TriangleMesh, verts: &[Point3], normal: &Vec3) {
    if verts.len() < 3 {
        return;
    }
    let n = normal.try_normalize(1e-12).unwrap_or_else(Vec3::y);
    let base = mesh.num_vertices() as u32;
    for v in verts {
        mesh.push_vertex(v, &n);
    }

    let flip = (verts[1] - verts[0]).cross(&(verts[2] - verts[0])).dot(&n) < 0.0;
    for k in 1..verts.len() as u32 - 1 {
        if flip {
            mesh.indices.extend_from_slice(&[base, base + k + 1, base + k]);
        } else {
            mesh.indices.extend_from_slice(&[base, base + k, base + k + 1]);
        }
    }
}

/// Box with half extents `(hx, hy, hz)` centered at `center`, every edge
/// chamfered by `bevel`.
///
/// Emits 6 inset main faces, 12 edge strips and 8 corner triangles. A
/// non-positive bevel gives a plain box.
pub fn chamfered_box(hx: f64, hy: f64, hz: f64, center: &Point3, bevel: f64) -> TriangleMesh {
    let h = [hx, hy, hz];
    let b = bevel.min(hx.min(hy).min(hz) * 0.5).max(0.0);
    let mut mesh = TriangleMesh::new();

    let at = |p: [f64; 3]| Point3::new(center.x + p[0], center.y + p[1], center.z + p[2]);
    let axis = |a: usize| {
        let mut v = Vec3::zeros();
        v[a] = 1.0;
        v
    };

    for a in 0..3 {
        let (u, v) = ((a + 1) % 3, (a + 2) % 3);
        for s in [-1.0, 1.0] {
            let quad: Vec<Point3> = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
                .iter()
                .map(|&(su, sv)| {
                    let mut p = [0.0; 3];
                    p[a] = s * h[a];
                    p[u] = su * (h[u] - b);
                    p[v] = sv * (h[v] - b);
                    at(p)
                })
                .collect();
            push_face(&mut mesh, &quad, &(axis(a) * s));
        }
    }

    if b <= 0.0 {
        return mesh;
    }

    // edge strips, one per (edge axis, sign pair)
    for a3 in 0..3 {
        let (a1, a2) = ((a3 + 1) % 3, (a3 + 2) % 3);
        for s1 in [-1.0, 1.0] {
            for s2 in [-1.0, 1.0] {
                let corner = |flush: usize, along: f64| {
                    let mut p = [0.0; 3];
                    if flush == a1 {
                        p[a1] = s1 * h[a1];
                        p[a2] = s2 * (h[a2] - b);
                    } else {
                        p[a1] = s1 * (h[a1] - b);
                        p[a2] = s2 * h[a2];
                    }
                    p[a3] = along * (h[a3] - b);
                    at(p)
                };
                let quad = [
                    corner(a1, -1.0),
                    corner(a1, 1.0),
                    corner(a2, 1.0),
                    corner(a2, -1.0),
                ];
                push_face(&mut mesh, &quad, &(axis(a1) * s1 + axis(a2) * s2));
            }
        }
    }

    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let s = [sx, sy, sz];
                let tri: Vec<Point3> = (0..3)
                    .map(|flush| {
                        at(std::array::from_fn(|k| {
                            s[k] * if k == flush { h[k] } else { h[k] - b }
                        }))
                    })
                    .collect();
                push_face(&mut mesh, &tri, &Vec3::new(sx, sy, sz));
            }
        }
    }

    mesh
}

/// Surface of revolution around the vertical axis through `center`.
///
/// `profile` is a polyline of `(radius, y)` pairs ordered counter-clockwise
/// in the radius/height plane, so the outward normal of each segment is
/// `(dy, -dr)`. Each segment becomes one band of `segments` quads; vertices
/// are duplicated per band so bands meet at hard edges. Triangles collapsing
/// on the axis are skipped.
pub fn lathe(profile: &[(f64, f64)], segments: u32, center: &Point3) -> TriangleMesh {
    let segments = segments.max(3);
    let mut mesh = TriangleMesh::new();

    for pair in profile.windows(2) {
        let ((r0, y0), (r1, y1)) = (pair[0], pair[1]);
        let (nr, ny) = (y1 - y0, -(r1 - r0));

        let ring = |r: f64, y: f64| -> Vec<(Point3, Vec3)> {
            (0..=segments)
                .map(|k| {
                    let theta = TAU * k as f64 / segments as f64;
                    let (sin, cos) = theta.sin_cos();
                    let p = Point3::new(center.x + r * cos, center.y + y, center.z + r * sin);
                    let n = Vec3::new(nr * cos, ny, nr * sin)
                        .try_normalize(1e-12)
                        .unwrap_or_else(Vec3::y);
                    (p, n)
                })
                .collect()
        };
        let lower = ring(r0, y0);
        let upper = ring(r1, y1);

        let base = mesh.num_vertices() as u32;
        for (p, n) in lower.iter().chain(upper.iter()) {
            mesh.push_vertex(p, n);
        }

        let stride = segments + 1;
        for k in 0..segments {
            let (a0, a1) = (base + k, base + k + 1);
            let (b0, b1) = (base + stride + k, base + stride + k + 1);
            let expected = lower[k as usize].1;
            push_triangle(&mut mesh, [a0, a1, b1], &expected);
            push_triangle(&mut mesh, [a0, b1, b0], &expected);
        }
    }

    mesh
}

/// Add a triangle over existing vertices, facing `expected`; degenerate ones are dropped.
fn push_triangle(mesh: &mut TriangleMesh, tri: [u32; 3], expected: &Vec3) {
    let (a, b, c) = (mesh.vertex(tri[0]), mesh.vertex(tri[1]), mesh.vertex(tri[2]));
    let n = (b - a).cross(&(c - a));
    if n.norm() < 1e-9 {
        return;
    }
    if n.dot(expected) < 0.0 {
        mesh.indices.extend_from_slice(&[tri[0], tri[2], tri[1]]);
    } else {
        mesh.indices.extend_from_slice(&tri);
    }
}

/// Stud standing on `base`, with its top rim chamfered by `bevel`.
pub fn stud(base: &Point3, radius: f64, height: f64, bevel: f64, segments: u32) -> TriangleMesh {
    let b = bevel.clamp(0.0, radius.min(height) * 0.5);
    let profile = [
        (radius, 0.0),
        (radius, height - b),
        (radius - b, height),
        (0.0, height),
    ];
    lathe(&profile, segments, base)
}

/// Hollow tube hanging from `top` down by `height`.
pub fn tube(top: &Point3, outer: f64, inner: f64, height: f64, segments: u32) -> TriangleMesh {
    let profile = [
        (inner, -height),
        (outer, -height),
        (outer, 0.0),
        (inner, 0.0),
        (inner, -height),
    ];
    lathe(&profile, segments, top)
}

/// Solid post hanging from `top` down by `height`.
pub fn post(top: &Point3, radius: f64, height: f64, segments: u32) -> TriangleMesh {
    let profile = [(0.0, -height), (radius, -height), (radius, 0.0)];
    lathe(&profile, segments, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Every triangle's geometric normal agrees with its first vertex normal.
    fn assert_consistent_winding(mesh: &TriangleMesh) {
        for tri in mesh.indices.chunks(3) {
            let (a, b, c) = (mesh.vertex(tri[0]), mesh.vertex(tri[1]), mesh.vertex(tri[2]));
            let n = (b - a).cross(&(c - a));
            assert!(n.dot(&mesh.normal(tri[0])) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn test_push_face_orients_to_normal() {
        let mut mesh = TriangleMesh::new();
        let quad = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        push_face(&mut mesh, &quad, &Vec3::y());
        assert_eq!(mesh.num_triangles(), 2);
        assert_consistent_winding(&mesh);

        let mut down = TriangleMesh::new();
        push_face(&mut down, &quad, &-Vec3::y());
        assert_consistent_winding(&down);
        assert_ne!(mesh.indices, down.indices);
    }

    #[test]
    fn test_plain_box() {
        let mesh = chamfered_box(1.0, 2.0, 3.0, &Point3::origin(), 0.0);
        assert_eq!(mesh.num_triangles(), 12);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.y, -2.0);
        assert_relative_eq!(max.z, 3.0);
        assert_consistent_winding(&mesh);
    }

    #[test]
    fn test_chamfered_box_face_counts() {
        let mesh = chamfered_box(16.0, 4.8, 8.0, &Point3::new(0.0, 4.8, 0.0), 0.2);
        // 6 faces + 12 edges as quads, 8 corner triangles
        assert_eq!(mesh.num_triangles(), 6 * 2 + 12 * 2 + 8);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(max.y, 9.6, epsilon = 1e-5);
        assert_relative_eq!(max.x, 16.0, epsilon = 1e-6);
        assert_consistent_winding(&mesh);
    }

    #[test]
    fn test_lathe_cylinder() {
        let profile = [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)];
        let mesh = lathe(&profile, 8, &Point3::origin());
        // caps lose their axis-degenerate half, the wall keeps both
        assert_eq!(mesh.num_triangles(), 8 + 16 + 8);
        assert_consistent_winding(&mesh);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(max.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(min.x, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_stud_sits_on_base() {
        let mesh = stud(&Point3::new(4.0, 9.6, 4.0), 2.4, 1.7, 0.2, 16);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.y, 9.6, epsilon = 1e-5);
        assert_relative_eq!(max.y, 11.3, epsilon = 1e-5);
        assert_relative_eq!(max.x, 6.4, epsilon = 1e-5);
        assert_consistent_winding(&mesh);
    }

    #[test]
    fn test_tube_hangs_below_top() {
        let mesh = tube(&Point3::new(0.0, 8.4, 0.0), 3.255, 2.4, 7.2, 16);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.y, 1.2, epsilon = 1e-5);
        assert_relative_eq!(max.y, 8.4, epsilon = 1e-5);
        assert_consistent_winding(&mesh);
    }
}
