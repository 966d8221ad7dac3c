//! Unit cone, x² + y² = z² with 0 ≤ z ≤ 1: apex at the origin, unit cap at z = 1.

use std::f32::consts::PI;

use super::{Disc, Hit, Primitive};
use lumen_math::{quadratic_roots, Ray, Vec2, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Cone {
    cap: Disc,
}

impl Cone {
    pub fn new() -> Self {
        Self {
            cap: Disc::with_unit_normal(Vec3::Z, Vec3::Z, 1.0, Some(Vec3::Y)),
        }
    }
}

impl Default for Cone {
    fn default() -> Self {
        Self::new()
    }
}

impl Primitive for Cone {
    fn intersect(&self, ray: &Ray, _offset: f32) -> Vec<Hit> {
        let o = ray.origin();
        let d = ray.direction();

        // A vanishes for rays parallel to the surface; quadratic_roots then
        // falls back to the single linear root.
        let a = d.x * d.x + d.y * d.y - d.z * d.z;
        let b = 2.0 * (o.x * d.x + o.y * d.y - o.z * d.z);
        let c = o.x * o.x + o.y * o.y - o.z * o.z;

        let mut hits: Vec<Hit> = quadratic_roots(a, b, c)
            .iter()
            .map(|t| Hit::new(ray, t, Vec3::ZERO))
            .filter(|h| (0.0..=1.0).contains(&h.local_point.z))
            .map(|h| Hit {
                normal: self.normal_at(h.local_point),
                ..h
            })
            .collect();

        hits.extend(self.cap.plane_hit(ray));
        hits
    }

    fn contains_point(&self, p: Vec3) -> bool {
        p.x * p.x + p.y * p.y <= p.z * p.z && (0.0..=1.0).contains(&p.z)
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        let radial = (p.x * p.x + p.y * p.y).sqrt();
        // Cap when closer to the z = 1 plane than to the slanted side
        let side_distance = (p.z - radial).abs() / std::f32::consts::SQRT_2;
        if (1.0 - p.z).abs() < side_distance {
            Vec3::Z
        } else {
            Vec3::new(p.x, p.y, -p.z)
        }
    }

    fn texture_coords(&self, p: Vec3) -> Vec2 {
        let u = (p.y.atan2(p.x) + PI) / (2.0 * PI);
        Vec2::new(u, p.z.clamp(0.0, 1.0))
    }
}
