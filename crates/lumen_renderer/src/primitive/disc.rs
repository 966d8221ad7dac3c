//! Flat disc primitive; also used to close the ends of cylinders and cones.

use super::{Hit, Primitive, ShapeError, UNMAPPED};
use lumen_math::{solve_plane_coords, Ray, Vec2, Vec3, EPSILON};

#[derive(Debug, Clone, Copy)]
pub struct Disc {
    center: Vec3,
    /// Unit normal
    normal: Vec3,
    radius: f32,
    /// Texture basis: unit `up` in the plane, `right = up × normal`
    up: Vec3,
    right: Vec3,
}

impl Disc {
    /// Create a disc. `up` orients texture coordinates and defaults to any
    /// direction in the plane.
    pub fn new(center: Vec3, normal: Vec3, radius: f32, up: Option<Vec3>) -> Result<Self, ShapeError> {
        let normal = normal.try_normalize().ok_or(ShapeError::ZeroNormal)?;
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ShapeError::BadRadius(radius));
        }
        Ok(Self::with_unit_normal(center, normal, radius, up))
    }

    pub(crate) fn with_unit_normal(center: Vec3, normal: Vec3, radius: f32, up: Option<Vec3>) -> Self {
        let up = up
            .map(|u| u - normal * normal.dot(u))
            .and_then(Vec3::try_normalize)
            .unwrap_or_else(|| normal.any_orthonormal_vector());
        Self {
            center,
            normal,
            radius,
            up,
            right: up.cross(normal),
        }
    }

    /// The single crossing of the disc's plane, if it falls inside the disc.
    pub(crate) fn plane_hit(&self, ray: &Ray) -> Option<Hit> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = self.normal.dot(self.center - ray.origin()) / denom;
        let hit = Hit::new(ray, t, self.normal);
        ((hit.local_point - self.center).length_squared() <= self.radius * self.radius).then_some(hit)
    }
}

impl Primitive for Disc {
    /// A disc has no interior, so its crossing is reported twice to form a
    /// zero-length segment.
    fn intersect(&self, ray: &Ray, _offset: f32) -> Vec<Hit> {
        match self.plane_hit(ray) {
            Some(hit) => vec![hit, hit],
            None => Vec::new(),
        }
    }

    fn contains_point(&self, p: Vec3) -> bool {
        let v = p - self.center;
        self.normal.dot(v).abs() <= EPSILON && v.length_squared() <= self.radius * self.radius
    }

    fn normal_at(&self, _p: Vec3) -> Vec3 {
        self.normal
    }

    fn texture_coords(&self, p: Vec3) -> Vec2 {
        match solve_plane_coords(self.up, self.right, p - self.center) {
            Some(c) => Vec2::new((c.y / self.radius + 1.0) / 2.0, (c.x / self.radius + 1.0) / 2.0),
            None => {
                log::debug!("Disc texture mapping failed for point {:?}", p);
                UNMAPPED
            }
        }
    }

    fn is_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_disc() -> Disc {
        Disc::new(Vec3::ZERO, Vec3::Z, 1.0, Some(Vec3::Y)).unwrap()
    }

    #[test]
    fn test_disc_hit_is_duplicated() {
        let ray = Ray::new(Vec3::new(0.2, 0.3, 2.0), -Vec3::Z);
        let hits = unit_disc().filtered_intersect(&ray, 0.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], hits[1]);
        assert!((hits[0].t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_disc_miss_outside_radius() {
        let ray = Ray::new(Vec3::new(0.8, 0.8, 2.0), -Vec3::Z);
        assert!(unit_disc().filtered_intersect(&ray, 0.0).is_empty());

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        assert!(unit_disc().filtered_intersect(&parallel, 0.0).is_empty());
    }

    #[test]
    fn test_disc_texture_coords() {
        let disc = unit_disc();
        let centre = disc.texture_coords(Vec3::ZERO);
        assert!((centre - Vec2::splat(0.5)).length() < 1e-5);

        // up = +Y maps to v = 1; right = up × normal = +X maps to u = 1
        let top = disc.texture_coords(Vec3::Y);
        assert!((top - Vec2::new(0.5, 1.0)).length() < 1e-5);
        let right = disc.texture_coords(Vec3::X);
        assert!((right - Vec2::new(1.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_invalid_disc() {
        assert_eq!(
            Disc::new(Vec3::ZERO, Vec3::ZERO, 1.0, None).unwrap_err(),
            ShapeError::ZeroNormal
        );
        assert!(Disc::new(Vec3::ZERO, Vec3::Z, 0.0, None).is_err());
    }
}
