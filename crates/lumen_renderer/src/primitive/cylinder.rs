//! Unit cylinder, x² + y² = 1 with 0 ≤ z ≤ 1, closed by two caps.

use std::f32::consts::PI;

use super::{Disc, Hit, Primitive};
use lumen_math::{quadratic_roots, Ray, Vec2, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    bottom: Disc,
    top: Disc,
}

impl Cylinder {
    pub fn new() -> Self {
        Self {
            bottom: Disc::with_unit_normal(Vec3::ZERO, -Vec3::Z, 1.0, Some(Vec3::Y)),
            top: Disc::with_unit_normal(Vec3::Z, Vec3::Z, 1.0, Some(Vec3::Y)),
        }
    }
}

impl Default for Cylinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Primitive for Cylinder {
    fn intersect(&self, ray: &Ray, _offset: f32) -> Vec<Hit> {
        let o = ray.origin();
        let d = ray.direction();

        let a = d.x * d.x + d.y * d.y;
        let b = 2.0 * (o.x * d.x + o.y * d.y);
        let c = o.x * o.x + o.y * o.y - 1.0;

        // Parallel to the axis the side is either missed or touched along a line
        let mut hits: Vec<Hit> = if a.abs() < 1e-12 {
            Vec::new()
        } else {
            quadratic_roots(a, b, c)
                .iter()
                .map(|t| Hit::new(ray, t, Vec3::ZERO))
                .filter(|h| (0.0..=1.0).contains(&h.local_point.z))
                .map(|h| Hit {
                    normal: self.normal_at(h.local_point),
                    ..h
                })
                .collect()
        };

        hits.extend(self.bottom.plane_hit(ray));
        hits.extend(self.top.plane_hit(ray));
        hits
    }

    fn contains_point(&self, p: Vec3) -> bool {
        p.x * p.x + p.y * p.y <= 1.0 && (0.0..=1.0).contains(&p.z)
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        let radial = p.x * p.x + p.y * p.y;
        // Caps win when the point is closer to them than to the side
        if (1.0 - radial.sqrt()) > p.z.abs().min((1.0 - p.z).abs()) {
            if p.z < 0.5 {
                -Vec3::Z
            } else {
                Vec3::Z
            }
        } else {
            Vec3::new(p.x, p.y, 0.0)
        }
    }

    /// Cylindrical mapping: u around the axis, v along it.
    fn texture_coords(&self, p: Vec3) -> Vec2 {
        let u = (p.y.atan2(p.x) + PI) / (2.0 * PI);
        Vec2::new(u, p.z.clamp(0.0, 1.0))
    }
}
