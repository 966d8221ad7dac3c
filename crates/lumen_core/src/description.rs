//! JSON scene description.
//!
//! These types mirror the document on disk one to one. They carry no
//! geometry logic; `lumen_renderer::build_scene` validates a description and
//! turns it into a renderable scene graph.

use std::collections::BTreeMap;
use std::path::Path;

use lumen_math::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SceneResult;
use crate::light::Light;

/// Top-level scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraDescription,

    /// Ambient light colour
    #[serde(default)]
    pub ambient: [f32; 3],

    #[serde(default)]
    pub lights: Vec<LightDescription>,

    /// Materials by name, referenced from geometry nodes
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,

    pub root: NodeDescription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub eye: [f32; 3],
    pub view: [f32; 3],
    pub up: [f32; 3],
    /// Field of view in degrees
    pub fov: f32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub position: [f32; 3],
    pub colour: [f32; 3],
    #[serde(default = "default_falloff")]
    pub falloff: [f32; 3],
}

fn default_falloff() -> [f32; 3] {
    [1.0, 0.0, 0.0]
}

impl LightDescription {
    pub fn to_light(&self) -> Light {
        Light::new(Vec3::from(self.position), Vec3::from(self.colour)).with_falloff(self.falloff)
    }
}

/// Surface description, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    /// Plain Phong surface.
    Phong {
        kd: [f32; 3],
        ks: [f32; 3],
        shininess: f32,
        #[serde(default)]
        transparency: f32,
        #[serde(default = "default_refractive_index")]
        refractive_index: f32,
    },
    /// Diffuse colour and alpha read from an image.
    Texture {
        path: String,
        ks: [f32; 3],
        shininess: f32,
        #[serde(default)]
        transparency: f32,
        #[serde(default = "default_refractive_index")]
        refractive_index: f32,
    },
    /// Phong surface whose normal is perturbed by an image height field.
    Bump {
        kd: [f32; 3],
        ks: [f32; 3],
        shininess: f32,
        path: String,
        #[serde(default = "default_bump_strength")]
        strength: f32,
    },
}

fn default_refractive_index() -> f32 {
    1.0
}

fn default_bump_strength() -> f32 {
    1.0
}

/// Boolean role of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindDescription {
    #[default]
    Group,
    Union,
    Intersection,
    Difference,
    Geometry,
}

/// One node of the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,

    #[serde(default)]
    pub kind: NodeKindDescription,

    /// Transform operations, applied in order as `M = M * op`
    #[serde(default)]
    pub transform: Vec<TransformOp>,

    #[serde(default)]
    pub children: Vec<NodeDescription>,

    /// Required for geometry nodes
    #[serde(default)]
    pub primitive: Option<PrimitiveDescription>,

    /// Required for geometry nodes
    #[serde(default)]
    pub material: Option<String>,
}

impl NodeDescription {
    /// Compose the node's transform operations.
    ///
    /// Returns `None` if a rotation names a zero axis.
    pub fn local_transform(&self) -> Option<Mat4> {
        self.transform
            .iter()
            .try_fold(Mat4::IDENTITY, |m, op| op.matrix().map(|op| m * op))
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeDescription::node_count).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    Translate([f32; 3]),
    Scale([f32; 3]),
    Rotate { axis: [f32; 3], degrees: f32 },
}

impl TransformOp {
    pub fn matrix(&self) -> Option<Mat4> {
        match self {
            TransformOp::Translate(v) => Some(Mat4::from_translation(Vec3::from(*v))),
            TransformOp::Scale(v) => Some(Mat4::from_scale(Vec3::from(*v))),
            TransformOp::Rotate { axis, degrees } => {
                let axis = Vec3::from(*axis).try_normalize()?;
                Some(Mat4::from_quat(Quat::from_axis_angle(
                    axis,
                    degrees.to_radians(),
                )))
            }
        }
    }
}

/// Primitive shape in its canonical object space, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimitiveDescription {
    /// Unit sphere at the origin
    Sphere,
    /// Unit cube [0, 1]³
    Cube,
    /// Unit-radius cylinder around z, 0 ≤ z ≤ 1
    Cylinder,
    /// Cone x² + y² = z², 0 ≤ z ≤ 1
    Cone,
    Polygon {
        points: Vec<[f32; 3]>,
        #[serde(default)]
        normal: Option<[f32; 3]>,
        /// Texture "up" direction; defaults to the first edge
        #[serde(default)]
        up: Option<[f32; 3]>,
    },
    Disc {
        center: [f32; 3],
        normal: [f32; 3],
        radius: f32,
        #[serde(default)]
        up: Option<[f32; 3]>,
    },
    /// Polygon soup; each face lists vertex indices of a convex polygon
    Mesh {
        vertices: Vec<[f32; 3]>,
        faces: Vec<Vec<usize>>,
    },
}

/// Parse a scene description from a JSON string.
pub fn parse_description(json: &str) -> SceneResult<SceneDescription> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a scene description file.
pub fn load_description(path: impl AsRef<Path>) -> SceneResult<SceneDescription> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let description = parse_description(&text)?;
    log::debug!(
        "Parsed {}: {} nodes, {} materials, {} lights",
        path.as_ref().display(),
        description.root.node_count(),
        description.materials.len(),
        description.lights.len()
    );
    Ok(description)
}
