//! Small closed-form solvers used by the geometry kernels.

use crate::{Vec2, Vec3};

/// Real roots of a polynomial of degree at most two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    None,
    One(f32),
    /// Two roots, smaller first. A tangent line gives two equal roots.
    Two(f32, f32),
}

impl Roots {
    pub fn count(&self) -> usize {
        match self {
            Roots::None => 0,
            Roots::One(_) => 1,
            Roots::Two(..) => 2,
        }
    }

    /// Iterate over the roots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = f32> {
        let (a, b) = match *self {
            Roots::None => (None, None),
            Roots::One(t) => (Some(t), None),
            Roots::Two(t0, t1) => (Some(t0), Some(t1)),
        };
        a.into_iter().chain(b)
    }
}

/// Solve `a t² + b t + c = 0`.
///
/// Uses the cancellation-free form `q = -(b + sign(b)·√disc) / 2`. Degenerates
/// to the linear solution when `a` vanishes.
pub fn quadratic_roots(a: f32, b: f32, c: f32) -> Roots {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return Roots::None;
        }
        return Roots::One(-c / b);
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Roots::None;
    }

    let sqrt_disc = disc.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - sqrt_disc)
    } else {
        -0.5 * (b + sqrt_disc)
    };

    let (t0, t1) = if q == 0.0 {
        // b == 0 and c == 0: double root at the origin.
        (0.0, 0.0)
    } else {
        (q / a, c / q)
    };

    if t0 <= t1 {
        Roots::Two(t0, t1)
    } else {
        Roots::Two(t1, t0)
    }
}

/// Express `v` in the (possibly non-orthogonal) planar basis `(up, right)`.
///
/// Returns `None` when the basis is degenerate or `v` does not lie in the
/// plane spanned by it.
pub fn solve_plane_coords(up: Vec3, right: Vec3, v: Vec3) -> Option<Vec2> {
    let uu = up.dot(up);
    let ur = up.dot(right);
    let rr = right.dot(right);

    let det = uu * rr - ur * ur;
    if det.abs() < 1e-10 {
        return None;
    }

    let uv = up.dot(v);
    let rv = right.dot(v);
    let a = (uv * rr - rv * ur) / det;
    let b = (rv * uu - uv * ur) / det;

    let residual = (a * up + b * right - v).length();
    if residual > 1e-3 * v.length().max(1.0) {
        return None;
    }

    Some(Vec2::new(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_roots() {
        // (t - 1)(t - 3) = t² - 4t + 3
        match quadratic_roots(1.0, -4.0, 3.0) {
            Roots::Two(t0, t1) => {
                assert!((t0 - 1.0).abs() < 1e-6);
                assert!((t1 - 3.0).abs() < 1e-6);
            }
            other => panic!("expected two roots, got {:?}", other),
        }
    }

    #[test]
    fn test_no_real_roots() {
        assert_eq!(quadratic_roots(1.0, 0.0, 1.0), Roots::None);
        assert_eq!(quadratic_roots(0.0, 0.0, 1.0), Roots::None);
    }

    #[test]
    fn test_linear_fallback() {
        assert_eq!(quadratic_roots(0.0, 2.0, -4.0), Roots::One(2.0));
    }

    #[test]
    fn test_tangent_gives_double_root() {
        // (t - 2)²
        let roots = quadratic_roots(1.0, -4.0, 4.0);
        assert_eq!(roots.count(), 2);
        let values: Vec<f32> = roots.iter().collect();
        assert!((values[0] - values[1]).abs() < 1e-6);
    }

    #[test]
    fn test_plane_coords_orthonormal() {
        let coords = solve_plane_coords(Vec3::Y, Vec3::X, Vec3::new(2.0, 3.0, 0.0)).unwrap();
        assert!((coords - Vec2::new(3.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_plane_coords_skewed_basis() {
        let up = Vec3::new(0.0, 1.0, 1.0);
        let right = Vec3::new(1.0, 0.0, 1.0);
        let v = 2.0 * up - 0.5 * right;
        let coords = solve_plane_coords(up, right, v).unwrap();
        assert!((coords - Vec2::new(2.0, -0.5)).length() < 1e-4);
    }

    #[test]
    fn test_plane_coords_degenerate() {
        assert!(solve_plane_coords(Vec3::Y, Vec3::ZERO, Vec3::Y).is_none());
        assert!(solve_plane_coords(Vec3::Y, Vec3::Y * 2.0, Vec3::Y).is_none());
        // Off-plane vector
        assert!(solve_plane_coords(Vec3::Y, Vec3::X, Vec3::Z).is_none());
    }
}
