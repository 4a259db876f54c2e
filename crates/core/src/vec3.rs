//! Vector type alias for 3D positions and directions.

use nalgebra::Vector3;

/// 3D vector type for positions, velocities, and steering contributions.
///
/// This is a simple alias for `nalgebra::Vector3<f64>`, used throughout
/// the simulation for agent positions, velocities, and gust vectors.
pub type Vec3 = Vector3<f64>;

/// Extra vector operations the steering rules need.
pub trait Vec3Ext {
    /// Exact equality test against the zero vector. Deliberately not an
    /// epsilon test: cohesion and alignment use an exactly-zero sum as the
    /// "no neighbors found" sentinel, so the comparison must be exact.
    fn is_exactly_zero(&self) -> bool;

    /// Unit vector in the same direction, or the vector unchanged when its
    /// length is exactly zero. Several rules normalize a possibly-zero
    /// velocity; this never divides by zero.
    fn normalized_or_zero(&self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn is_exactly_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    fn normalized_or_zero(&self) -> Vec3 {
        let len = self.norm();
        if len == 0.0 {
            *self
        } else {
            self / len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_zero_vector_is_a_no_op() {
        let v = Vec3::zeros();
        let n = v.normalized_or_zero();
        assert!(n.is_exactly_zero());
        assert!(!n.x.is_nan() && !n.y.is_nan() && !n.z.is_nan());
    }

    #[test]
    fn normalize_produces_unit_length() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        let n = v.normalized_or_zero();
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(n.y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn zero_test_is_exact_not_epsilon() {
        assert!(Vec3::zeros().is_exactly_zero());
        assert!(!Vec3::new(1e-300, 0.0, 0.0).is_exactly_zero());
    }
}
