//! Pinhole camera for primary ray generation.

use lumen_core::{SceneError, SceneResult};
use lumen_math::{Ray, Vec3};

/// Camera for generating rays into the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    /// Unit viewing direction
    pub view: Vec3,
    /// Unit up, made perpendicular to `view`
    pub up: Vec3,
    /// Unit `up × view`
    pub left: Vec3,
    /// Field of view in degrees, across the larger image dimension
    pub fov: f32,
    pub width: u32,
    pub height: u32,
    /// Distance from the eye to the image plane, in pixels
    pub screen_distance: f32,
}

impl Camera {
    pub fn new(eye: Vec3, view: Vec3, up: Vec3, fov: f32, width: u32, height: u32) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidCamera(format!(
                "image size {}x{} is empty",
                width, height
            )));
        }
        if !(fov > 0.0 && fov < 180.0) {
            return Err(SceneError::InvalidCamera(format!(
                "field of view {} is outside (0, 180)",
                fov
            )));
        }

        let view = view
            .try_normalize()
            .ok_or_else(|| SceneError::InvalidCamera("view direction is zero".to_string()))?;
        let left = up
            .cross(view)
            .try_normalize()
            .ok_or_else(|| SceneError::InvalidCamera("up is zero or parallel to view".to_string()))?;
        let up = view.cross(left);

        let half_extent = width.max(height) as f32 / 2.0;
        let screen_distance = half_extent / (fov.to_radians() / 2.0).tan();

        Ok(Self {
            eye,
            view,
            up,
            left,
            fov,
            width,
            height,
            screen_distance,
        })
    }

    /// Ray through the image plane at `(dx, dy)` pixels left of and above the
    /// centre.
    pub fn primary_ray(&self, dx: f32, dy: f32) -> Ray {
        Ray::new(
            self.eye,
            self.screen_distance * self.view + dy * self.up + dx * self.left,
        )
    }

    /// Ray through image position `(x, y)`, with (0, 0) the top-left corner.
    pub fn pixel_ray(&self, x: f32, y: f32) -> Ray {
        self.primary_ray(
            self.width as f32 / 2.0 - x,
            self.height as f32 / 2.0 - y,
        )
    }
}
