//! Lumen Renderer - CSG ray tracing
//!
//! Primitives are combined through union, intersection and difference nodes
//! and shaded Whitted-style: Phong lighting with hard shadows, plus
//! Fresnel-weighted reflection and refraction for transparent surfaces.

mod builder;
mod camera;
mod material;
mod node;
pub mod primitive;
mod renderer;
mod scene;
mod segment;
mod shading;

pub use builder::{build_scene, BuiltScene};
pub use camera::Camera;
pub use material::{phong, BumpMaterial, Material, PhongMaterial, SurfaceSample, TextureMaterial};
pub use node::{GeometryNode, NodeKind, SceneNode};
pub use primitive::{
    Cone, Cube, Cylinder, Disc, Hit, Mesh, Polygon, Primitive, Shape, ShapeError, Sphere,
};
pub use renderer::{background, render, render_pixel, ImageBuffer, RenderConfig, SamplingMode};
pub use scene::Scene;
pub use segment::{Boundary, Segment, SegmentList};
pub use shading::{fresnel, Tracer, MAX_RECURSION_DEPTH, SECONDARY_RAY_OFFSET};

/// Re-export common math types from lumen_math
pub use lumen_math::{Ray, Vec3};
