// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod solve;
mod transform;

pub use aabb::{Aabb, SlabCrossing};
pub use interval::Interval;
pub use ray::Ray;
pub use solve::{quadratic_roots, solve_plane_coords, Roots};
pub use transform::TransformPair;

/// Tolerance used for geometric comparisons (graze clustering, plane tests).
pub const EPSILON: f32 = 1e-4;
