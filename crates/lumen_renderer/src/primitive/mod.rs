//! Geometry kernels.
//!
//! Every primitive lives in its own canonical object space and reports raw
//! ray-parameter hits along the whole line. [`Primitive::filtered_intersect`]
//! turns those into the entry/exit sequence the segment algebra expects:
//! sorted, with grazing clusters on closed solids resolved so the count stays
//! even.

mod cone;
mod cube;
mod cylinder;
mod disc;
mod mesh;
mod polygon;
mod sphere;

pub use cone::Cone;
pub use cube::Cube;
pub use cylinder::Cylinder;
pub use disc::Disc;
pub use mesh::Mesh;
pub use polygon::Polygon;
pub use sphere::Sphere;

use lumen_math::{Ray, Vec2, Vec3, EPSILON};
use thiserror::Error;

/// Graze probes step this many `EPSILON`s (in unit-direction distance) to
/// either side of a hit cluster.
const GRAZE_PROBE_SCALE: f32 = 100.0;

/// Texture coordinate returned when a surface point cannot be mapped.
pub const UNMAPPED: Vec2 = Vec2::new(-1.0, -1.0);

/// A single ray/surface crossing in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Ray parameter
    pub t: f32,
    /// Surface normal, not normalised
    pub normal: Vec3,
    /// Crossing point in the primitive's own space
    pub local_point: Vec3,
}

impl Hit {
    pub fn new(ray: &Ray, t: f32, normal: Vec3) -> Self {
        Self {
            t,
            normal,
            local_point: ray.at(t),
        }
    }
}

/// Reasons a primitive cannot be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("points are collinear or coincident")]
    Degenerate,

    #[error("normal must be non-zero")]
    ZeroNormal,

    #[error("radius must be positive, got {0}")]
    BadRadius(f32),

    #[error("mesh has no faces")]
    EmptyMesh,

    #[error("face {face} references vertex {index} but the mesh has {vertices}")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertices: usize,
    },

    #[error("face {0} is degenerate")]
    DegenerateFace(usize),
}

/// Ray intersection and surface queries for one shape.
pub trait Primitive: Send + Sync {
    /// All crossings of the infinite line through `ray`, in any order.
    ///
    /// `offset` may only be used to prune work that cannot yield a hit past
    /// it; individual hits at or before `offset` are still reported.
    fn intersect(&self, ray: &Ray, offset: f32) -> Vec<Hit>;

    /// Whether `p` lies inside or on the surface.
    fn contains_point(&self, p: Vec3) -> bool;

    /// Outward surface normal at a point on the surface.
    fn normal_at(&self, p: Vec3) -> Vec3;

    /// Texture coordinates in [0, 1]², or [`UNMAPPED`].
    fn texture_coords(&self, p: Vec3) -> Vec2;

    /// Closed solids get graze resolution; planar shapes do not.
    fn is_closed(&self) -> bool {
        true
    }

    /// Sorted hits ready to be paired into segments.
    ///
    /// Empty when every hit lies at or before `offset`.
    fn filtered_intersect(&self, ray: &Ray, offset: f32) -> Vec<Hit> {
        let mut hits = self.intersect(ray, offset);
        hits.retain(|h| h.t.is_finite());
        hits.sort_by(|a, b| a.t.total_cmp(&b.t));

        if self.is_closed() && hits.len() > 1 {
            hits = resolve_grazes(self, ray, hits);
        }

        if hits.iter().all(|h| h.t <= offset) {
            return Vec::new();
        }
        hits
    }
}

/// Collapse clusters of hits less than `EPSILON` apart along the ray, measured
/// as distance in the primitive's space rather than in raw `t`.
///
/// A cluster is probed just before and just after along the ray. If the
/// inside/outside state changes across it, the first hit stands for the whole
/// cluster; otherwise the ray only touched the surface and the cluster goes.
fn resolve_grazes<P: Primitive + ?Sized>(primitive: &P, ray: &Ray, hits: Vec<Hit>) -> Vec<Hit> {
    let len = ray.direction().length();
    if len <= f32::MIN_POSITIVE {
        return hits;
    }
    let probe = GRAZE_PROBE_SCALE * EPSILON / len;

    let mut resolved = Vec::with_capacity(hits.len());
    let mut start = 0;
    while start < hits.len() {
        let mut end = start + 1;
        while end < hits.len() && (hits[end].t - hits[end - 1].t) * len < EPSILON {
            end += 1;
        }

        if end - start == 1 {
            resolved.push(hits[start]);
        } else {
            let before = primitive.contains_point(ray.at(hits[start].t - probe));
            let after = primitive.contains_point(ray.at(hits[end - 1].t + probe));
            if before != after {
                resolved.push(hits[start]);
            }
        }
        start = end;
    }
    resolved
}

/// The closed set of shapes a geometry node can own.
#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Cube(Cube),
    Cylinder(Cylinder),
    Cone(Cone),
    Polygon(Polygon),
    Disc(Disc),
    Mesh(Mesh),
}

impl Shape {
    fn as_primitive(&self) -> &dyn Primitive {
        match self {
            Shape::Sphere(s) => s,
            Shape::Cube(s) => s,
            Shape::Cylinder(s) => s,
            Shape::Cone(s) => s,
            Shape::Polygon(s) => s,
            Shape::Disc(s) => s,
            Shape::Mesh(s) => s,
        }
    }

    /// Short lowercase name, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Sphere(_) => "sphere",
            Shape::Cube(_) => "cube",
            Shape::Cylinder(_) => "cylinder",
            Shape::Cone(_) => "cone",
            Shape::Polygon(_) => "polygon",
            Shape::Disc(_) => "disc",
            Shape::Mesh(_) => "mesh",
        }
    }
}

impl Primitive for Shape {
    fn intersect(&self, ray: &Ray, offset: f32) -> Vec<Hit> {
        self.as_primitive().intersect(ray, offset)
    }

    fn contains_point(&self, p: Vec3) -> bool {
        self.as_primitive().contains_point(p)
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        self.as_primitive().normal_at(p)
    }

    fn texture_coords(&self, p: Vec3) -> Vec2 {
        self.as_primitive().texture_coords(p)
    }

    fn is_closed(&self) -> bool {
        self.as_primitive().is_closed()
    }
}

/// Edge test shared by polygons and mesh faces.
///
/// `vertices` must wind counter-clockwise about `normal`. Points on an edge
/// (within `EPSILON`) count as inside.
pub(crate) fn convex_contains(vertices: impl Iterator<Item = Vec3> + Clone, normal: Vec3, p: Vec3) -> bool {
    let next = vertices.clone().cycle().skip(1);
    vertices.zip(next).all(|(cur, next)| {
        let outward = (next - cur).cross(normal);
        outward.dot(p - cur) <= EPSILON * outward.length().max(1.0)
    })
}

/// Newell's method; robust for slightly non-planar or concave input.
pub(crate) fn newell_normal(vertices: &[Vec3]) -> Vec3 {
    let mut n = Vec3::ZERO;
    for (i, cur) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        n.x += (cur.y - next.y) * (cur.z + next.z);
        n.y += (cur.z - next.z) * (cur.x + next.x);
        n.z += (cur.x - next.x) * (cur.y + next.y);
    }
    n
}
