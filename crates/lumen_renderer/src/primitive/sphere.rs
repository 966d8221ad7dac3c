//! Unit sphere primitive.

use std::f32::consts::PI;

use super::{Hit, Primitive};
use lumen_math::{quadratic_roots, Ray, Vec2, Vec3};

/// The unit sphere centred at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl Sphere {
    /// Get the UV coordinates for a point on the unit sphere.
    fn sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let p = p.normalize_or_zero();
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray, _offset: f32) -> Vec<Hit> {
        let o = ray.origin();
        let d = ray.direction();

        quadratic_roots(d.length_squared(), 2.0 * o.dot(d), o.length_squared() - 1.0)
            .iter()
            .map(|t| {
                let hit = Hit::new(ray, t, Vec3::ZERO);
                Hit {
                    normal: self.normal_at(hit.local_point),
                    ..hit
                }
            })
            .collect()
    }

    fn contains_point(&self, p: Vec3) -> bool {
        p.length_squared() <= 1.0
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        p
    }

    fn texture_coords(&self, p: Vec3) -> Vec2 {
        Self::sphere_uv(p)
    }
}
