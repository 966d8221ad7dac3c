//! Texture loading and caching for materials.
//!
//! Provides a texture cache that loads images from disk once per path and
//! hands out shared handles, plus the nearest-sample lookup used by the
//! texture-mapped and bump-mapped materials.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_math::{Vec2, Vec3, Vec4};

use crate::error::{TextureError, TextureResult};

/// How far outside [0, 1] a coordinate may stray and still be clamped
/// instead of rejected.
const CLAMP_TOLERANCE: f32 = 1e-3;

/// A loaded texture with pixel data.
///
/// Stores pixels in linear RGBA float format for rendering.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (linear, 0-1 range)
    /// Stored as [R, G, B, A] per pixel, row-major order, top row first
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return Err(TextureError::Empty(path));
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            path: "<solid>".to_string(),
        }
    }

    /// Nearest-sample lookup at UV coordinates, (0, 0) at bottom-left.
    ///
    /// Coordinates marginally outside [0, 1] are clamped. Anything further out
    /// (including the `(-1, -1)` sentinel of a failed mapping) yields `None`.
    pub fn sample_nearest(&self, uv: Vec2) -> Option<Vec4> {
        let in_range = |c: f32| c.is_finite() && (-CLAMP_TOLERANCE..=1.0 + CLAMP_TOLERANCE).contains(&c);
        if !in_range(uv.x) || !in_range(uv.y) {
            log::debug!(
                "Texture lookup out of range in {}: ({:.4}, {:.4})",
                self.path,
                uv.x,
                uv.y
            );
            return None;
        }

        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);

        let x = (u * (self.width - 1) as f32).round() as u32;
        let y = ((1.0 - v) * (self.height - 1) as f32).round() as u32; // Flip V for image rows

        Some(Vec4::from_array(self.get_pixel(x, y)))
    }

    /// Luminance of the nearest sample, used as a height field by bump maps.
    pub fn height_at(&self, uv: Vec2) -> Option<f32> {
        self.sample_nearest(uv)
            .map(|p| 0.2126 * p.x + 0.7152 * p.y + 0.0722 * p.z)
    }

    /// Size of one texel in UV units.
    pub fn texel_size(&self) -> Vec2 {
        Vec2::new(
            1.0 / self.width.max(2) as f32,
            1.0 / self.height.max(2) as f32,
        )
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Cache for loaded textures.
///
/// Several materials may name the same file; it is decoded once.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    // Convert to linear float RGBA
    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| {
            [
                srgb_to_linear(p[0]),
                srgb_to_linear(p[1]),
                srgb_to_linear(p[2]),
                p[3] as f32 / 255.0, // Alpha is linear
            ]
        })
        .collect();

    Texture::new(width, height, pixels, path.to_string_lossy().to_string())
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
