#![warn(missing_docs)]

//! Math types for the brickforge placement engine.
//!
//! Thin wrappers around nalgebra providing the types shared by every
//! brickforge crate: points, vectors, yaw/Euler transforms, and the
//! tolerance set that placement, collision and connection detection agree on.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in 3D space (millimeters).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 3x3 rotation matrix.
pub type Mat3 = Matrix3<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the Y (vertical) axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        Self::from_rotation(&rotation_y(angle))
    }

    /// Placement transform of a part: yaw about the part origin, then translate.
    pub fn placement(position: &Point3, yaw: f64) -> Self {
        Self::translation(position.x, position.y, position.z).then(&Self::rotation_y(yaw))
    }

    fn from_rotation(r: &Mat3) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(r);
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotation matrix about X.
pub fn rotation_x(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Rotation matrix about Y.
pub fn rotation_y(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation matrix about Z.
pub fn rotation_z(angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// Rotation matrix for Euler angles `(x, y, z)` composed as `Rz * Ry * Rx`.
///
/// A vector is rotated about X first, then Y, then Z.
pub fn euler_matrix(euler: &Vec3) -> Mat3 {
    rotation_z(euler.z) * rotation_y(euler.y) * rotation_x(euler.x)
}

/// Rotate a local offset about the vertical axis.
pub fn rotate_yaw(v: &Vec3, yaw: f64) -> Vec3 {
    rotation_y(yaw) * v
}

/// Normalize an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// True when `yaw` is within `tolerance` of 90° or 270°.
///
/// Footprints swap width and depth only for these quarter turns; any other
/// yaw keeps the unrotated footprint.
pub fn is_quarter_turn(yaw: f64, tolerance: f64) -> bool {
    let a = normalize_angle(yaw);
    (a - FRAC_PI_2).abs() < tolerance || (a - 3.0 * FRAC_PI_2).abs() < tolerance
}

/// Horizontal (X/Z) distance between two points.
pub fn horizontal_distance(a: &Point3, b: &Point3) -> f64 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// True when every axis of `a - b` is within `tolerance`.
pub fn within_per_axis(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    (a.x - b.x).abs() <= tolerance
        && (a.y - b.y).abs() <= tolerance
        && (a.z - b.z).abs() <= tolerance
}

/// One quarter turn about the vertical axis, the UI rotation step.
pub const QUARTER_TURN: f64 = FRAC_PI_2;

/// Invalid tolerance configuration.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid tolerance `{name}`: {value} (must be finite and > 0)")]
pub struct ToleranceError {
    /// Field name.
    pub name: &'static str,
    /// Offending value.
    pub value: f64,
}

/// Tolerance set shared by grid snapping, snap resolution, collision and
/// connection detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Yaw window (radians) around 90°/270° treated as a quarter turn.
    pub rotation: f64,
    /// Per-axis distance (mm) for an anti-stud to count as seated on a stud
    /// during snap resolution.
    pub alignment: f64,
    /// Maximum vertical jump (mm) between the pointer and a snap candidate.
    pub vertical_gate: f64,
    /// Amount (mm) each bounding box shrinks before the overlap test.
    pub collision_margin: f64,
    /// Per-axis distance (mm) for two connection points to form a connection.
    pub connection: f64,
}

impl Tolerances {
    /// Default engine tolerances.
    pub const DEFAULT: Self = Self {
        rotation: 0.1,
        alignment: 0.5,
        vertical_gate: 1.7,
        collision_margin: 0.1,
        connection: 0.5,
    };

    /// Validate every field.
    pub fn validate(&self) -> Result<(), ToleranceError> {
        let fields = [
            ("rotation", self.rotation),
            ("alignment", self.alignment),
            ("vertical_gate", self.vertical_gate),
            ("collision_margin", self.collision_margin),
            ("connection", self.connection),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ToleranceError { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::DEFAULT
    }
}
