//! Polygon-soup mesh wrapped in a bounding sphere.

use super::{convex_contains, Hit, Primitive, ShapeError};
use lumen_math::{quadratic_roots, Aabb, Ray, Vec2, Vec3};

/// Containment rays leave along (1, 2, 3), away from the diagonals and edges
/// of axis-aligned models.
const PARITY_DIRECTION: Vec3 = Vec3::new(0.2673, 0.5345, 0.8018);

#[derive(Debug, Clone)]
struct Face {
    indices: Vec<usize>,
    /// `(b - a) × (c - a)`, outward for counter-clockwise faces
    normal: Vec3,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    bounds: Aabb,
    center: Vec3,
    radius: f32,
}

impl Mesh {
    /// Each face lists the indices of a convex polygon, counter-clockwise
    /// when seen from outside.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>) -> Result<Self, ShapeError> {
        if faces.is_empty() || vertices.is_empty() {
            return Err(ShapeError::EmptyMesh);
        }

        let faces = faces
            .into_iter()
            .enumerate()
            .map(|(i, indices)| {
                if indices.len() < 3 {
                    return Err(ShapeError::DegenerateFace(i));
                }
                if let Some(&index) = indices.iter().find(|&&idx| idx >= vertices.len()) {
                    return Err(ShapeError::IndexOutOfRange {
                        face: i,
                        index,
                        vertices: vertices.len(),
                    });
                }
                let [a, b, c] = [0, 1, 2].map(|k| vertices[indices[k]]);
                let normal = (b - a).cross(c - a);
                if normal.length_squared() < 1e-20 {
                    return Err(ShapeError::DegenerateFace(i));
                }
                Ok(Face { indices, normal })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bounds = Aabb::enclosing(&vertices);
        let center = bounds.centroid();
        let radius = vertices
            .iter()
            .map(|v| v.distance(center))
            .fold(0.0f32, f32::max);

        Ok(Self {
            vertices,
            faces,
            bounds,
            center,
            radius,
        })
    }

    /// Whether the line through `ray` can reach the bounding sphere past `offset`.
    fn bounding_sphere_reaches(&self, ray: &Ray, offset: f32) -> bool {
        let o = ray.origin() - self.center;
        let d = ray.direction();
        let r = self.radius * (1.0 + 1e-4) + 1e-6;
        quadratic_roots(d.length_squared(), 2.0 * o.dot(d), o.length_squared() - r * r)
            .iter()
            .any(|t| t > offset)
    }

    fn face_hit(&self, face: &Face, ray: &Ray) -> Option<Hit> {
        let denom = face.normal.dot(ray.direction());
        if denom.abs() < 1e-12 {
            return None;
        }
        let a = self.vertices[face.indices[0]];
        let t = face.normal.dot(a - ray.origin()) / denom;
        let hit = Hit::new(ray, t, face.normal);
        let corners = face.indices.iter().map(|&i| self.vertices[i]);
        convex_contains(corners, face.normal, hit.local_point).then_some(hit)
    }
}

impl Primitive for Mesh {
    fn intersect(&self, ray: &Ray, offset: f32) -> Vec<Hit> {
        if !self.bounding_sphere_reaches(ray, offset) {
            return Vec::new();
        }
        self.faces
            .iter()
            .filter_map(|face| self.face_hit(face, ray))
            .collect()
    }

    /// Parity of the face crossings on a ray leaving `p`.
    fn contains_point(&self, p: Vec3) -> bool {
        if !self.bounds.contains_point(p, 1e-4) {
            return false;
        }
        let ray = Ray::new(p, PARITY_DIRECTION);
        let crossings = self
            .faces
            .iter()
            .filter_map(|face| self.face_hit(face, &ray))
            .filter(|h| h.t > 0.0)
            .count();
        crossings % 2 == 1
    }

    /// Normal of the face whose plane passes closest to `p`.
    fn normal_at(&self, p: Vec3) -> Vec3 {
        self.faces
            .iter()
            .map(|f| {
                let n = f.normal.normalize();
                let distance = n.dot(p - self.vertices[f.indices[0]]).abs();
                (distance, n)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, n)| n)
            .unwrap_or(Vec3::Z)
    }

    /// Planar projection of the bounding box onto x/y.
    fn texture_coords(&self, p: Vec3) -> Vec2 {
        let min = self.bounds.min_corner();
        let size = self.bounds.max_corner() - min;
        let axis = |value: f32, lo: f32, extent: f32| {
            if extent > 0.0 {
                ((value - lo) / extent).clamp(0.0, 1.0)
            } else {
                0.5
            }
        };
        Vec2::new(axis(p.x, min.x, size.x), axis(p.y, min.y, size.y))
    }
}
