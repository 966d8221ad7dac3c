//! Error types for scene building and texture loading.

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Texture has no pixels: {0}")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Errors that stop a scene from being built. All of them are fatal.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene description parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Node '{node}' references unknown material '{material}'")]
    UnknownMaterial { node: String, material: String },

    #[error("Node '{0}' has a singular transform")]
    SingularTransform(String),

    #[error("Node '{node}' has an invalid primitive: {reason}")]
    InvalidPrimitive { node: String, reason: String },

    #[error("Geometry node '{0}' cannot have children")]
    GeometryWithChildren(String),

    #[error("Node '{0}' has stale transform caches; call rebuild_caches()")]
    StaleTransforms(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Material '{material}' texture error: {source}")]
    Texture {
        material: String,
        #[source]
        source: TextureError,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;
