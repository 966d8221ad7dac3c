//! Convex planar polygon.

use super::{convex_contains, newell_normal, Hit, Primitive, ShapeError, UNMAPPED};
use lumen_math::{solve_plane_coords, Ray, Vec2, Vec3, EPSILON};

#[derive(Debug, Clone)]
pub struct Polygon {
    /// Counter-clockwise about `normal`
    vertices: Vec<Vec3>,
    /// Unit normal
    normal: Vec3,
    up: Vec3,
    right: Vec3,
    /// Extents of the vertices in (up, right) coordinates, `None` when the
    /// basis cannot map the polygon
    extents: Option<(Vec2, Vec2)>,
}

impl Polygon {
    /// Create a polygon from at least three coplanar points.
    ///
    /// If `normal` is given and disagrees with the winding, the winding is
    /// reversed. `up` orients texture coordinates and defaults to the first
    /// edge.
    pub fn new(points: Vec<Vec3>, normal: Option<Vec3>, up: Option<Vec3>) -> Result<Self, ShapeError> {
        if points.len() < 3 {
            return Err(ShapeError::TooFewPoints(points.len()));
        }

        let mut vertices = points;
        let winding = newell_normal(&vertices)
            .try_normalize()
            .ok_or(ShapeError::Degenerate)?;

        let normal = match normal {
            Some(n) => {
                let n = n.try_normalize().ok_or(ShapeError::ZeroNormal)?;
                if n.dot(winding) < 0.0 {
                    vertices.reverse();
                }
                n
            }
            None => winding,
        };

        let up = up.unwrap_or(vertices[1] - vertices[0]);
        let up = (up - normal * normal.dot(up)).normalize_or_zero();
        let right = up.cross(normal);

        let extents = Self::extents(&vertices, up, right);
        if extents.is_none() {
            log::warn!(
                "Polygon texture basis is degenerate (up {:?}, right {:?})",
                up,
                right
            );
        }

        Ok(Self {
            vertices,
            normal,
            up,
            right,
            extents,
        })
    }

    fn extents(vertices: &[Vec3], up: Vec3, right: Vec3) -> Option<(Vec2, Vec2)> {
        let origin = vertices[0];
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for v in vertices {
            let c = solve_plane_coords(up, right, *v - origin)?;
            min = min.min(c);
            max = max.max(c);
        }
        let span = max - min;
        (span.x > 0.0 && span.y > 0.0).then_some((min, max))
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Crossing of the supporting plane, if it lands inside the polygon.
    fn plane_hit(&self, ray: &Ray) -> Option<Hit> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = self.normal.dot(self.vertices[0] - ray.origin()) / denom;
        let hit = Hit::new(ray, t, self.normal);
        convex_contains(self.vertices.iter().copied(), self.normal, hit.local_point).then_some(hit)
    }
}

impl Primitive for Polygon {
    /// Reported twice, forming a zero-length segment.
    fn intersect(&self, ray: &Ray, _offset: f32) -> Vec<Hit> {
        match self.plane_hit(ray) {
            Some(hit) => vec![hit, hit],
            None => Vec::new(),
        }
    }

    fn contains_point(&self, p: Vec3) -> bool {
        self.normal.dot(p - self.vertices[0]).abs() <= EPSILON
            && convex_contains(self.vertices.iter().copied(), self.normal, p)
    }

    fn normal_at(&self, _p: Vec3) -> Vec3 {
        self.normal
    }

    /// `u` runs along `right`, `v` along `up`, both normalised to the
    /// polygon's extent.
    fn texture_coords(&self, p: Vec3) -> Vec2 {
        let coords = self
            .extents
            .and_then(|(min, max)| {
                let c = solve_plane_coords(self.up, self.right, p - self.vertices[0])?;
                Some((c - min) / (max - min))
            });
        match coords {
            Some(c) => Vec2::new(c.y, c.x),
            None => {
                log::debug!("Polygon texture mapping failed for point {:?}", p);
                UNMAPPED
            }
        }
    }

    fn is_closed(&self) -> bool {
        false
    }
}
