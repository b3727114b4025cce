//! Unit, axis and number conversions for LDraw output.

use brick_math::{euler_matrix, Point3, Vec3};

/// LDraw units per millimeter.
pub const LDU_PER_MM: f64 = 2.5;

/// Position in LDU with Y flipped (LDraw is Y-down).
pub fn ldraw_position(p: &Point3) -> [f64; 3] {
    [p.x * LDU_PER_MM, -p.y * LDU_PER_MM, p.z * LDU_PER_MM]
}

/// The nine matrix fields of a type-1 line, in output order.
///
/// Builds `R = Rz * Ry * Rx`, conjugates it by the Y reflection (negating
/// the entries that touch the Y axis exactly once) and emits the row-major
/// entries as `m0 m3 m6 m1 m4 m7 m2 m5 m8`.
pub fn ldraw_matrix(rotation: &Vec3) -> [f64; 9] {
    let r = euler_matrix(rotation);
    let mut m = [0.0; 9];
    for row in 0..3 {
        for col in 0..3 {
            let flip = if (row == 1) != (col == 1) { -1.0 } else { 1.0 };
            m[row * 3 + col] = flip * r[(row, col)];
        }
    }
    [m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]]
}

/// Round to 3 decimals and strip trailing zeros; `-0` prints as `0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-0.0004), "0");
        assert_eq!(format_number(24.0), "24");
        assert_eq!(format_number(-24.0), "-24");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.12345), "0.123");
        assert_eq!(format_number(1.2346), "1.235");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(6.123e-17), "0");
    }

    #[test]
    fn test_position_converts_units() {
        let p = ldraw_position(&Point3::new(8.0, 9.6, -3.2));
        assert_eq!(p[0], 20.0);
        assert!((p[1] + 24.0).abs() < 1e-9);
        assert!((p[2] + 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_identity_matrix() {
        assert_eq!(
            ldraw_matrix(&Vec3::zeros()),
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_reflection_negates_y_couplings() {
        // z rotation couples X and Y, so the off-diagonal terms flip sign
        let m = ldraw_matrix(&Vec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
        let rounded: Vec<String> = m.iter().map(|&v| format_number(v)).collect();
        assert_eq!(rounded, ["0", "-1", "0", "1", "0", "0", "0", "0", "1"]);
    }
}
