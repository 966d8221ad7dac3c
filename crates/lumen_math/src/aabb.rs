use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Where a ray crosses one face of an [`Aabb`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SlabCrossing {
    /// Ray parameter of the crossing
    pub t: f32,
    /// Axis of the face (0=X, 1=Y, 2=Z)
    pub axis: usize,
    /// Outward direction of the face along `axis` (-1.0 or 1.0)
    pub sign: f32,
}

impl SlabCrossing {
    /// Outward unit normal of the crossed face.
    pub fn normal(&self) -> Vec3 {
        let mut n = Vec3::ZERO;
        n[self.axis] = self.sign;
        n
    }
}

impl Aabb {
    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self {
            x: Interval::EMPTY,
            y: Interval::EMPTY,
            z: Interval::EMPTY,
        }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Smallest AABB enclosing every point. Empty input gives an empty box.
    pub fn enclosing(points: &[Vec3]) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        if points.is_empty() {
            Self::empty()
        } else {
            Self::from_points(min, max)
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max_corner(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min_corner() + self.max_corner()) * 0.5
    }

    /// Inclusive containment test, widened by `tolerance` on every side.
    pub fn contains_point(&self, p: Vec3, tolerance: f32) -> bool {
        (0..3).all(|axis| {
            let iv = self.axis_interval(axis);
            p[axis] >= iv.min - tolerance && p[axis] <= iv.max + tolerance
        })
    }

    /// Entry and exit crossings of the ray's supporting line with the box.
    ///
    /// Uses the slab method. Unlike a pure hit test both faces are reported,
    /// including crossings behind the ray origin, so callers can build
    /// inside-spans from them. Returns `None` when the line misses the box.
    pub fn crossings(&self, r: &Ray) -> Option<(SlabCrossing, SlabCrossing)> {
        let mut enter = SlabCrossing { t: f32::NEG_INFINITY, axis: 0, sign: -1.0 };
        let mut exit = SlabCrossing { t: f32::INFINITY, axis: 0, sign: 1.0 };
        let mut constrained = false;

        for axis in 0..3 {
            let iv = self.axis_interval(axis);
            let o = r.origin[axis];
            let d = r.direction[axis];

            if d.abs() < f32::MIN_POSITIVE {
                // Parallel to this slab: either always inside it or never.
                if o < iv.min || o > iv.max {
                    return None;
                }
                continue;
            }
            constrained = true;

            let inv = 1.0 / d;
            let mut near = SlabCrossing { t: (iv.min - o) * inv, axis, sign: -1.0 };
            let mut far = SlabCrossing { t: (iv.max - o) * inv, axis, sign: 1.0 };
            if inv < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }

            if near.t > enter.t {
                enter = near;
            }
            if far.t < exit.t {
                exit = far;
            }
            if exit.t < enter.t {
                return None;
            }
        }

        constrained.then_some((enter, exit))
    }
}
