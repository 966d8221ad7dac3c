//! Recursive Whitted-style shading.
//!
//! A shaded point gets Phong lighting from every light its shadow ray reaches,
//! plus Fresnel-weighted reflection and refraction for transparent materials.

use std::cell::Cell;

use crate::material::SurfaceSample;
use crate::scene::Scene;
use crate::segment::Boundary;
use lumen_core::{Color, Light};
use lumen_math::{Interval, Ray, Vec3};

/// Deepest secondary bounce; rays past it contribute black.
pub const MAX_RECURSION_DEPTH: u32 = 5;

/// Minimum distance along a unit-length secondary ray before a surface counts,
/// so rays do not hit the surface they leave from.
pub const SECONDARY_RAY_OFFSET: f32 = 1e-3;

/// Fraction of light reflected at an interface from index `n1` into `n2`.
///
/// `cos_i` is the cosine between the incoming direction (reversed) and the
/// normal. Unpolarised: the mean of the s and p reflectances. A target index
/// of zero is a perfect mirror, and total internal reflection reflects
/// everything.
pub fn fresnel(cos_i: f32, n1: f32, n2: f32) -> f32 {
    if n2 == 0.0 {
        return 1.0;
    }
    let cos_i = cos_i.abs().min(1.0);
    let eta = n1 / n2;
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();

    let s_denom = n1 * cos_i + n2 * cos_t;
    let p_denom = n2 * cos_i + n1 * cos_t;
    if s_denom <= 0.0 || p_denom <= 0.0 {
        return 1.0;
    }
    let rs = ((n1 * cos_i - n2 * cos_t) / s_denom).powi(2);
    let rp = ((n2 * cos_i - n1 * cos_t) / p_denom).powi(2);
    ((rs + rp) / 2.0).clamp(0.0, 1.0)
}

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Bend unit `incident` through a surface whose unit `normal` faces it.
///
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(incident: Vec3, normal: Vec3, eta: f32) -> Option<Vec3> {
    let cos_i = -incident.dot(normal);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * incident + (eta * cos_i - cos_t) * normal)
}

/// Traces rays for one pixel sample.
///
/// Cheap to create; holds the background colour escaping secondary rays take
/// and records the deepest recursion reached.
pub struct Tracer<'s> {
    scene: &'s Scene<'s>,
    background: Color,
    deepest: Cell<u32>,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s Scene<'s>, background: Color) -> Self {
        Self {
            scene,
            background,
            deepest: Cell::new(0),
        }
    }

    /// Deepest recursion level any ray from this tracer reached.
    pub fn deepest(&self) -> u32 {
        self.deepest.get()
    }

    /// Colour seen along a primary ray, or `None` if it hits nothing.
    pub fn trace_primary(&self, ray: &Ray) -> Option<Color> {
        self.trace(ray, 0.0, 1.0, 0)
    }

    /// Colour seen along `ray` past `offset`, travelling through a medium of
    /// refractive index `medium`.
    pub fn trace(&self, ray: &Ray, offset: f32, medium: f32, depth: u32) -> Option<Color> {
        self.deepest.set(self.deepest.get().max(depth));

        let segments = self.scene.root.intersect(ray, offset);
        let hit = segments
            .boundaries_after(offset)
            .into_iter()
            .find(|b| !b.owner.is_cutout_at(b.local_point))?;

        Some(self.shade(ray, &hit, medium, depth))
    }

    /// Outgoing colour at a resolved surface crossing.
    pub fn shade(&self, ray: &Ray, hit: &Boundary<'_>, medium: f32, depth: u32) -> Color {
        let point = ray.at(hit.t);
        let view = -ray.direction().normalize_or_zero();

        let geometric = hit.normal.try_normalize().unwrap_or(view);
        let entering = geometric.dot(view) >= 0.0;
        let facing = if entering { geometric } else { -geometric };

        let owner = hit.owner;
        let material = &owner.material;
        let normal = material.shading_normal(&owner.primitive, hit.local_point, facing);

        let transparency = material.transparency().clamp(0.0, 1.0);
        let mut colour = Color::ZERO;

        if transparency > 0.0 {
            let (n1, n2) = if entering {
                (medium, material.refractive_index())
            } else {
                (material.refractive_index(), 1.0)
            };
            let cos_i = normal.dot(view);
            let reflectance = fresnel(cos_i, n1, n2);

            let reflected = self.secondary(
                &Ray::new(point, reflect(-view, normal)),
                medium,
                depth,
            );
            let refracted = if reflectance < 1.0 {
                match refract(-view, normal, n1 / n2) {
                    Some(direction) => self.secondary(&Ray::new(point, direction), n2, depth),
                    None => Color::ZERO,
                }
            } else {
                Color::ZERO
            };

            colour += transparency * (reflectance * reflected + (1.0 - reflectance) * refracted);
        }

        if transparency < 1.0 {
            let visible: Vec<&Light> = self
                .scene
                .lights
                .iter()
                .filter(|light| !self.in_shadow(point, light.position))
                .collect();

            let sample = SurfaceSample {
                point,
                normal,
                view,
                local_point: hit.local_point,
                primitive: &owner.primitive,
            };
            colour += (1.0 - transparency) * material.colour(&sample, &visible, self.scene.ambient);
        }

        colour
    }

    /// A reflected or refracted ray one level deeper. Black past the depth
    /// cap; background if it escapes.
    fn secondary(&self, ray: &Ray, medium: f32, depth: u32) -> Color {
        if depth >= MAX_RECURSION_DEPTH {
            return Color::ZERO;
        }
        self.trace(ray, SECONDARY_RAY_OFFSET, medium, depth + 1)
            .unwrap_or(self.background)
    }

    /// Whether an opaque surface lies between `point` and `light`.
    ///
    /// Transparent and cut-out surfaces let light through.
    pub fn in_shadow(&self, point: Vec3, light: Vec3) -> bool {
        let to_light = light - point;
        let distance = to_light.length();
        if distance <= SECONDARY_RAY_OFFSET {
            return false;
        }

        // Parameterised so that t = 1 is the light
        let ray = Ray::new(point, to_light);
        let window = Interval::new(SECONDARY_RAY_OFFSET / distance, 1.0);

        self.scene
            .root
            .intersect(&ray, window.min)
            .iter()
            .filter(|seg| seg.span().overlaps(&window))
            .any(|seg| {
                seg.start.owner.occludes_at(seg.start.local_point)
                    || seg.end.owner.occludes_at(seg.end.local_point)
            })
    }
}
