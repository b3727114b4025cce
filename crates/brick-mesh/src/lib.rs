#![warn(missing_docs)]

//! Mesh generation for brickforge part definitions.
//!
//! Builds renderable triangle meshes from a [`PartDefinition`] by
//! dispatching on its shape:
//! 1. Generate the body (chamfered box, slope hexahedron, lathed round/cone)
//! 2. Add studs at the definition's stud points, and underside tubes
//! 3. Merge sub-meshes into one buffer with index-offset correction
//!
//! Results are memoized per definition id in a [`GeometryCache`].
//!
//! [`PartDefinition`]: brick_catalog::PartDefinition

use brick_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

mod cache;
mod primitives;
mod shapes;
pub mod stl;

pub use cache::GeometryCache;
pub use primitives::{chamfered_box, lathe, push_face};
pub use shapes::build_geometry;

/// Output triangle mesh for rendering and export.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Append a vertex with its normal, returning its index.
    pub fn push_vertex(&mut self, p: &Point3, n: &Vec3) -> u32 {
        let index = self.num_vertices() as u32;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        self.normals
            .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        index
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: u32) -> Point3 {
        let k = i as usize * 3;
        Point3::new(
            self.vertices[k] as f64,
            self.vertices[k + 1] as f64,
            self.vertices[k + 2] as f64,
        )
    }

    /// Normal of vertex `i`.
    pub fn normal(&self, i: u32) -> Vec3 {
        let k = i as usize * 3;
        Vec3::new(
            self.normals[k] as f64,
            self.normals[k + 1] as f64,
            self.normals[k + 2] as f64,
        )
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for v in self.vertices.chunks(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis] as f64);
                max[axis] = max[axis].max(v[axis] as f64);
            }
        }
        Some((min, max))
    }

    /// Replace all normals with area-weighted smooth vertex normals.
    ///
    /// Only vertices shared between triangles are smoothed; duplicated
    /// vertices keep hard edges.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::zeros(); self.num_vertices()];
        for tri in self.indices.chunks(3) {
            let (a, b, c) = (self.vertex(tri[0]), self.vertex(tri[1]), self.vertex(tri[2]));
            // unnormalized cross product weights by triangle area
            let n = (b - a).cross(&(c - a));
            for &i in tri {
                acc[i as usize] += n;
            }
        }

        self.normals.clear();
        for n in acc {
            let n = n.try_normalize(1e-12).unwrap_or_else(Vec3::y);
            self.normals
                .extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Mesh generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Chamfer applied to every body edge and stud rim (mm).
    pub bevel: f64,
    /// Top-wall thickness; support tubes shorter than this are omitted (mm).
    pub wall_thickness: f64,
    /// Segments around a stud or tube.
    pub stud_segments: u32,
    /// Segments around a round body.
    pub body_segments: u32,
    /// Segments along each torus bevel of a round body.
    pub bevel_steps: u32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            bevel: 0.2,
            wall_thickness: brick_catalog::dims::WALL_THICKNESS,
            stud_segments: 16,
            body_segments: 32,
            bevel_steps: 3,
        }
    }
}
