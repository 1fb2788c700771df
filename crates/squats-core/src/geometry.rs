//! Planar geometry on keypoint positions.

use nalgebra::Vector2;

use crate::types::{KeypointDetection, Position2D};

/// Vectors shorter than this are treated as zero-length
const MIN_MAGNITUDE: f64 = 1e-12;

/// Check whether a keypoint can be used for measurements.
///
/// Absent keypoints and keypoints at the origin (the upstream
/// "not detected" sentinel) are unusable.
pub fn is_valid_keypoint(keypoint: Option<&KeypointDetection>) -> bool {
    match keypoint {
        Some(kp) => !kp.position.is_origin(),
        None => false,
    }
}

/// Angle between two vectors in degrees, `None` if either has zero length.
///
/// The result lies in `[0, 180]`; inner and reflex angles are not
/// distinguished.
pub fn angle_between(v1: &Vector2<f64>, v2: &Vector2<f64>) -> Option<f64> {
    let (n1, n2) = (v1.norm(), v2.norm());
    if n1 < MIN_MAGNITUDE || n2 < MIN_MAGNITUDE {
        return None;
    }
    let cos = (v1.dot(v2) / (n1 * n2)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees
pub fn angle_at(a: &Position2D, b: &Position2D, c: &Position2D) -> Option<f64> {
    angle_between(&b.vector_to(a), &b.vector_to(c))
}

/// Euclidean distance between two positions
pub fn distance(a: &Position2D, b: &Position2D) -> f64 {
    a.distance_to(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Keypoint;

    fn p(x: f64, y: f64) -> Position2D {
        Position2D::new(x, y)
    }

    #[test]
    fn test_validity() {
        let detected = KeypointDetection::new(Keypoint::LeftKnee, p(3.0, 0.0), Some(0.4));
        let sentinel = KeypointDetection::new(Keypoint::LeftKnee, p(0.0, 0.0), Some(0.9));
        let on_axis = KeypointDetection::new(Keypoint::LeftKnee, p(0.0, 5.0), None);

        assert!(is_valid_keypoint(Some(&detected)));
        assert!(is_valid_keypoint(Some(&on_axis)));
        assert!(!is_valid_keypoint(Some(&sentinel)));
        assert!(!is_valid_keypoint(None));
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at(&p(0.0, 1.0), &p(0.0, 0.0), &p(1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line_is_180() {
        let angle = angle_at(&p(0.0, 0.0), &p(0.5, 0.0), &p(1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_folded_back_is_0() {
        let angle = angle_at(&p(2.0, 2.0), &p(1.0, 1.0), &p(3.0, 3.0)).unwrap();
        assert!(angle.abs() < 1e-4);
    }

    #[test]
    fn test_symmetry_and_range() {
        let points = [
            (p(1.0, 7.0), p(3.0, 2.0), p(-4.0, 1.5)),
            (p(120.0, 80.0), p(100.0, 100.0), p(130.0, 160.0)),
            (p(-2.0, -2.0), p(0.1, 0.3), p(5.0, -9.0)),
            (p(10.0, 10.0), p(10.0, 20.0), p(10.0001, 30.0)),
        ];
        for (a, b, c) in points {
            let forward = angle_at(&a, &b, &c).unwrap();
            let backward = angle_at(&c, &b, &a).unwrap();
            assert!((0.0..=180.0).contains(&forward));
            assert!((forward - backward).abs() < 1e-9);
        }
    }

    #[test]
    fn test_coincident_points_are_undefined() {
        assert!(angle_at(&p(1.0, 1.0), &p(1.0, 1.0), &p(2.0, 3.0)).is_none());
        assert!(angle_at(&p(2.0, 3.0), &p(1.0, 1.0), &p(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_distance() {
        assert!((distance(&p(1.0, 1.0), &p(4.0, 5.0)) - 5.0).abs() < 1e-12);
        assert_eq!(distance(&p(2.0, 2.0), &p(2.0, 2.0)), 0.0);
    }
}
