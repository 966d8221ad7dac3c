//! Surface materials: how a shaded point turns lights into colour.

use std::fmt::Debug;
use std::sync::Arc;

use crate::primitive::{Primitive, Shape};
use lumen_core::{Color, Light, Texture};
use lumen_math::{Vec2, Vec3, Vec4};

/// Everything a material needs to know about the point being shaded.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample<'a> {
    /// World-space position
    pub point: Vec3,
    /// Unit normal, facing the viewer
    pub normal: Vec3,
    /// Unit vector from the point back toward the viewer
    pub view: Vec3,
    /// Position in the primitive's object space
    pub local_point: Vec3,
    pub primitive: &'a Shape,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync + Debug {
    /// Local illumination from the lights that reach the point, plus ambient.
    fn colour(&self, sample: &SurfaceSample, lights: &[&Light], ambient: Color) -> Color;

    /// Fraction of light passing through, in [0, 1].
    fn transparency(&self) -> f32 {
        0.0
    }

    /// Refractive index; 0 marks a perfect mirror.
    fn refractive_index(&self) -> f32 {
        1.0
    }

    /// Whether the surface is cut out (fully transparent texel) at this point.
    fn has_zero_alpha(&self, _primitive: &Shape, _local_point: Vec3) -> bool {
        false
    }

    /// Normal used for lighting, given the geometric one.
    fn shading_normal(&self, _primitive: &Shape, _local_point: Vec3, normal: Vec3) -> Vec3 {
        normal
    }
}

/// Phong illumination: `ambient·kd + Σ (kd (n·l) + ks (r·v)^shininess) · light · falloff`.
///
/// Lights behind the surface contribute nothing.
pub fn phong(kd: Color, ks: Color, shininess: f32, sample: &SurfaceSample, lights: &[&Light], ambient: Color) -> Color {
    let mut colour = ambient * kd;

    for light in lights {
        let to_light = light.position - sample.point;
        let distance = to_light.length();
        if distance <= 0.0 {
            continue;
        }
        let l = to_light / distance;

        let n_dot_l = sample.normal.dot(l);
        if n_dot_l <= 0.0 {
            continue;
        }

        let reflected = 2.0 * n_dot_l * sample.normal - l;
        let r_dot_v = reflected.dot(sample.view);
        let specular = if r_dot_v > 0.0 {
            r_dot_v.powf(shininess)
        } else {
            0.0
        };

        colour += (kd * n_dot_l + ks * specular) * light.colour * light.attenuation(distance);
    }

    colour
}

/// Plain Phong surface.
#[derive(Debug, Clone)]
pub struct PhongMaterial {
    pub kd: Color,
    pub ks: Color,
    pub shininess: f32,
    pub transparency: f32,
    pub refractive_index: f32,
}

impl PhongMaterial {
    /// An opaque surface.
    pub fn new(kd: Color, ks: Color, shininess: f32) -> Self {
        Self {
            kd,
            ks,
            shininess,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }

    pub fn with_transparency(mut self, transparency: f32, refractive_index: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self.refractive_index = refractive_index;
        self
    }

    /// A perfect mirror: fully transparent with refractive index 0, so every
    /// ray is reflected.
    pub fn mirror() -> Self {
        Self::new(Color::ZERO, Color::ZERO, 1.0).with_transparency(1.0, 0.0)
    }
}

impl Material for PhongMaterial {
    fn colour(&self, sample: &SurfaceSample, lights: &[&Light], ambient: Color) -> Color {
        phong(self.kd, self.ks, self.shininess, sample, lights, ambient)
    }

    fn transparency(&self) -> f32 {
        self.transparency
    }

    fn refractive_index(&self) -> f32 {
        self.refractive_index
    }
}

/// Nearest texel at the primitive's texture coordinates; a failed lookup is a
/// zero sample.
fn texel(texture: &Texture, primitive: &Shape, local_point: Vec3) -> Vec4 {
    texture
        .sample_nearest(primitive.texture_coords(local_point))
        .unwrap_or(Vec4::ZERO)
}

/// Diffuse colour and alpha come from an image.
#[derive(Debug, Clone)]
pub struct TextureMaterial {
    pub texture: Arc<Texture>,
    pub ks: Color,
    pub shininess: f32,
    pub transparency: f32,
    pub refractive_index: f32,
}

impl TextureMaterial {
    pub fn new(texture: Arc<Texture>, ks: Color, shininess: f32) -> Self {
        Self {
            texture,
            ks,
            shininess,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }

    pub fn with_transparency(mut self, transparency: f32, refractive_index: f32) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self.refractive_index = refractive_index;
        self
    }
}

impl Material for TextureMaterial {
    fn colour(&self, sample: &SurfaceSample, lights: &[&Light], ambient: Color) -> Color {
        let kd = texel(&self.texture, sample.primitive, sample.local_point).truncate();
        phong(kd, self.ks, self.shininess, sample, lights, ambient)
    }

    fn transparency(&self) -> f32 {
        self.transparency
    }

    fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    /// Only a real transparent texel cuts out; an unmapped point stays solid.
    fn has_zero_alpha(&self, primitive: &Shape, local_point: Vec3) -> bool {
        self.texture
            .sample_nearest(primitive.texture_coords(local_point))
            .map_or(false, |t| t.w <= 0.0)
    }
}

/// Phong surface whose normal is tilted by the gradient of a height map.
#[derive(Debug, Clone)]
pub struct BumpMaterial {
    pub kd: Color,
    pub ks: Color,
    pub shininess: f32,
    pub bump: Arc<Texture>,
    pub strength: f32,
}

impl BumpMaterial {
    pub fn new(kd: Color, ks: Color, shininess: f32, bump: Arc<Texture>, strength: f32) -> Self {
        Self {
            kd,
            ks,
            shininess,
            bump,
            strength,
        }
    }

    fn height(&self, uv: Vec2) -> f32 {
        self.bump.height_at(uv.clamp(Vec2::ZERO, Vec2::ONE)).unwrap_or(0.0)
    }
}

impl Material for BumpMaterial {
    fn colour(&self, sample: &SurfaceSample, lights: &[&Light], ambient: Color) -> Color {
        phong(self.kd, self.ks, self.shininess, sample, lights, ambient)
    }

    fn shading_normal(&self, primitive: &Shape, local_point: Vec3, normal: Vec3) -> Vec3 {
        let uv = primitive.texture_coords(local_point);
        if self.bump.sample_nearest(uv).is_none() {
            return normal;
        }

        // Central differences one texel apart
        let step = self.bump.texel_size();
        let du = self.height(uv + Vec2::new(step.x, 0.0)) - self.height(uv - Vec2::new(step.x, 0.0));
        let dv = self.height(uv + Vec2::new(0.0, step.y)) - self.height(uv - Vec2::new(0.0, step.y));

        let (tangent, bitangent) = normal.any_orthonormal_pair();
        (normal - self.strength * (du * tangent + dv * bitangent))
            .try_normalize()
            .unwrap_or(normal)
    }
}
