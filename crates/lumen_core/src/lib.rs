//! Lumen Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Scene description**: the JSON document a scene is built from
//! - **Lights**: point lights with quadratic falloff
//! - **Textures**: image loading, caching and nearest-sample lookup
//! - **Errors**: `SceneError` and `TextureError`
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::description::load_description;
//!
//! let description = load_description("scenes/csg.json")?;
//! println!("{} lights, {} materials",
//!     description.lights.len(),
//!     description.materials.len());
//! ```

pub mod description;
pub mod error;
pub mod light;
pub mod texture;

// Re-export commonly used types
pub use description::{load_description, parse_description, SceneDescription};
pub use error::{SceneError, SceneResult, TextureError, TextureResult};
pub use light::{Color, Light};
pub use texture::{Texture, TextureCache};
