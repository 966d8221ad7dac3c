//! Read-only rendering context.

use crate::camera::Camera;
use crate::node::SceneNode;
use lumen_core::{Color, Light, SceneError, SceneResult};

/// Everything the tracer needs, borrowed for the duration of a render.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub root: &'a SceneNode,
    pub camera: Camera,
    pub ambient: Color,
    pub lights: Vec<Light>,
}

impl<'a> Scene<'a> {
    /// Fails if any node still has out-of-date transform caches.
    pub fn new(root: &'a SceneNode, camera: Camera, ambient: Color, lights: Vec<Light>) -> SceneResult<Self> {
        if let Some(name) = root.find_stale() {
            return Err(SceneError::StaleTransforms(name.to_string()));
        }
        Ok(Self {
            root,
            camera,
            ambient,
            lights,
        })
    }
}
