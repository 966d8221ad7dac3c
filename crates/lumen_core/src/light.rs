use lumen_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub colour: Color,
    /// Constant, linear and quadratic attenuation coefficients
    pub falloff: [f32; 3],
}

impl Light {
    /// A light with no distance falloff.
    pub fn new(position: Vec3, colour: Color) -> Self {
        Self {
            position,
            colour,
            falloff: [1.0, 0.0, 0.0],
        }
    }

    pub fn with_falloff(mut self, falloff: [f32; 3]) -> Self {
        self.falloff = falloff;
        self
    }

    /// Attenuation factor `1 / (c + l·r + q·r²)` at distance `r`.
    pub fn attenuation(&self, r: f32) -> f32 {
        let [c, l, q] = self.falloff;
        let denom = c + l * r + q * r * r;
        if denom <= 0.0 {
            1.0
        } else {
            1.0 / denom
        }
    }
}
