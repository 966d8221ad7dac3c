// Cached transform pairs for scene-graph traversal.
//
// Rays travel down the graph through inverses, normals travel back up
// through inverse-transposes. Both are computed once here instead of per ray.

use glam::{Mat3, Mat4, Vec3};

/// A local-to-parent matrix together with the caches traversal needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPair {
    /// Local-to-parent transform
    pub matrix: Mat4,
    /// Parent-to-local transform, applied to incoming rays
    pub inverse: Mat4,
    /// Linear part of `inverse` transposed, applied to outgoing normals
    pub inverse_transpose: Mat3,
}

impl TransformPair {
    pub const IDENTITY: TransformPair = TransformPair {
        matrix: Mat4::IDENTITY,
        inverse: Mat4::IDENTITY,
        inverse_transpose: Mat3::IDENTITY,
    };

    /// Build the caches for `matrix`. Returns `None` for singular matrices.
    pub fn new(matrix: Mat4) -> Option<Self> {
        let det = matrix.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inverse = matrix.inverse();
        Some(Self {
            matrix,
            inverse,
            inverse_transpose: Mat3::from_mat4(inverse).transpose(),
        })
    }

    /// Map an object-space normal into the parent space.
    ///
    /// Correct under non-uniform scaling. The result is not re-normalised.
    #[inline]
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.inverse_transpose * normal
    }
}

impl Default for TransformPair {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_matrix_rejected() {
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(TransformPair::new(flat).is_none());
    }

    #[test]
    fn test_inverse_round_trip() {
        use std::f32::consts::PI;

        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0)) * Mat4::from_rotation_y(PI / 4.0);
        let pair = TransformPair::new(mat).unwrap();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = pair.inverse.transform_point3(pair.matrix.transform_point3(point));
        assert!((back - point).length() < 0.001);
    }

    #[test]
    fn test_normal_under_non_uniform_scale() {
        // A 45 degree plane squashed along y: the normal must stay perpendicular.
        let pair = TransformPair::new(Mat4::from_scale(Vec3::new(1.0, 4.0, 1.0))).unwrap();

        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0);

        let world_tangent = pair.matrix.transform_vector3(tangent);
        let world_normal = pair.transform_normal(normal);
        assert!(world_tangent.dot(world_normal).abs() < 1e-5);
    }

    #[test]
    fn test_translation_does_not_move_normals() {
        let pair = TransformPair::new(Mat4::from_translation(Vec3::new(3.0, -2.0, 9.0))).unwrap();
        assert_eq!(pair.transform_normal(Vec3::Y), Vec3::Y);
    }
}
