// Landmark geometry used by every classifier

use crate::models::hand::Landmark;

/// Euclidean distance in normalized landmark space (depth ignored)
pub fn distance(p1: Landmark, p2: Landmark) -> f32 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle in degrees at `p2`, via the law of cosines.
///
/// Returns 0 when either side adjacent to `p2` has zero length. The cosine is
/// clamped to [-1, 1] before `acos`.
pub fn angle(p1: Landmark, p2: Landmark, p3: Landmark) -> f32 {
    let a = distance(p1, p2);
    let b = distance(p2, p3);
    let c = distance(p1, p3);

    if a == 0.0 || b == 0.0 {
        return 0.0;
    }

    let cos_angle = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y)
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for point in [p(0.0, 0.0), p(0.3, 0.7), p(1.0, 1.0)] {
            assert_eq!(distance(point, point), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [(p(0.1, 0.2), p(0.4, 0.6)), (p(0.9, 0.1), p(0.2, 0.3))];
        for (a, b) in pairs {
            assert_eq!(distance(a, b), distance(b, a));
        }
        assert!((distance(p(0.1, 0.2), p(0.4, 0.6)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_distance_ignores_depth() {
        let mut a = p(0.0, 0.0);
        a.z = 5.0;
        assert!((distance(a, p(0.3, 0.4)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_right_angle() {
        let deg = angle(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0));
        assert!((deg - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_straight_line_is_180() {
        let deg = angle(p(0.0, 0.5), p(0.5, 0.5), p(1.0, 0.5));
        assert!((deg - 180.0).abs() < 0.1);
    }

    #[test]
    fn test_degenerate_side_returns_zero() {
        assert_eq!(angle(p(0.2, 0.2), p(0.2, 0.2), p(0.5, 0.5)), 0.0);
        assert_eq!(angle(p(0.5, 0.5), p(0.2, 0.2), p(0.2, 0.2)), 0.0);
    }
}
