//! Unit cube primitive, [0, 1]³.

use super::{Hit, Primitive};
use lumen_math::{Aabb, Ray, Vec2, Vec3, EPSILON};

#[derive(Debug, Clone, Copy, Default)]
pub struct Cube;

impl Cube {
    fn bounds() -> Aabb {
        Aabb::from_points(Vec3::ZERO, Vec3::ONE)
    }
}

impl Primitive for Cube {
    fn intersect(&self, ray: &Ray, _offset: f32) -> Vec<Hit> {
        match Self::bounds().crossings(ray) {
            Some((enter, exit)) => vec![
                Hit::new(ray, enter.t, enter.normal()),
                Hit::new(ray, exit.t, exit.normal()),
            ],
            None => Vec::new(),
        }
    }

    fn contains_point(&self, p: Vec3) -> bool {
        Self::bounds().contains_point(p, 0.0)
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        // Face whose plane the point is closest to
        let mut best = (f32::INFINITY, Vec3::Z);
        for axis in 0..3 {
            let mut n = Vec3::ZERO;
            n[axis] = -1.0;
            if p[axis].abs() < best.0 {
                best = (p[axis].abs(), n);
            }
            n[axis] = 1.0;
            if (p[axis] - 1.0).abs() < best.0 {
                best = ((p[axis] - 1.0).abs(), n);
            }
        }
        best.1
    }

    /// Planar projection onto the face the point lies on.
    fn texture_coords(&self, p: Vec3) -> Vec2 {
        let n = self.normal_at(p);
        let uv = if n.x.abs() > 1.0 - EPSILON {
            Vec2::new(p.z, p.y)
        } else if n.y.abs() > 1.0 - EPSILON {
            Vec2::new(p.x, p.z)
        } else {
            Vec2::new(p.x, p.y)
        };
        uv.clamp(Vec2::ZERO, Vec2::ONE)
    }
}
