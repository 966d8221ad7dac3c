//! Render driver.
//!
//! Casts primary rays for every pixel and accumulates samples into an image:
//! - Center sampling: one ray per pixel
//! - Stochastic sampling: jittered sub-pixel grid with Gaussian weights
//! - Rows interleaved across a fixed pool of worker threads

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

use crate::scene::Scene;
use crate::shading::Tracer;
use lumen_core::Color;

/// How primary rays are placed within a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// One ray per pixel.
    Center,
    /// A jittered `g × g` grid with `g = ⌊√rays_per_pixel⌋`.
    Stochastic { rays_per_pixel: u32 },
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Worker threads; rows are dealt out round-robin
    pub threads: usize,
    pub sampling: SamplingMode,
    /// Seed for sub-pixel jitter; equal seeds give identical images
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            sampling: SamplingMode::Stochastic { rays_per_pixel: 16 },
            seed: 0,
        }
    }
}

/// Background seen by rays that hit nothing: black at the top row fading to
/// blue at the bottom.
pub fn background(y: u32, height: u32) -> Color {
    Color::new(0.0, 0.0, y as f32 / height.max(1) as f32)
}

/// Render a single pixel.
pub fn render_pixel<R: Rng>(scene: &Scene, x: u32, y: u32, sampling: SamplingMode, rng: &mut R) -> Color {
    let camera = &scene.camera;
    let bg = background(y, camera.height);
    let tracer = Tracer::new(scene, bg);

    match sampling {
        SamplingMode::Center => tracer
            .trace_primary(&camera.pixel_ray(x as f32, y as f32))
            .unwrap_or(bg),
        SamplingMode::Stochastic { rays_per_pixel } => {
            let grid = ((rays_per_pixel.max(1) as f32).sqrt().floor() as u32).max(1);
            let step = 1.0 / grid as f32;

            let mut colour = Color::ZERO;
            let mut total_weight = 0.0;
            for sub_y in 0..grid {
                for sub_x in 0..grid {
                    // Offsets from the pixel position, each within its own cell
                    let x_off = (rng.gen::<f32>() - 0.5) * step + step * sub_x as f32 - 0.5 + step / 2.0;
                    let y_off = (rng.gen::<f32>() - 0.5) * step + step * sub_y as f32 - 0.5 + step / 2.0;

                    let ray = camera.pixel_ray(x as f32 - x_off, y as f32 - y_off);
                    let sample = tracer.trace_primary(&ray).unwrap_or(bg);

                    let weight = gaussian(x_off * x_off + y_off * y_off);
                    colour += weight * sample;
                    total_weight += weight;
                }
            }
            colour / total_weight
        }
    }
}

/// Unit-variance Gaussian of a squared distance.
fn gaussian(dist_squared: f32) -> f32 {
    (-0.5 * dist_squared).exp() / (2.0 * std::f32::consts::PI).sqrt()
}

/// Simple image buffer for storing render output, row-major from the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Interleaved linear RGB floats.
    pub fn to_rgb_f32(&self) -> Vec<f32> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Interleaved RGB bytes, clamped to [0, 1] before scaling.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| c.to_array())
            .map(|v| (255.0 * v.clamp(0.0, 1.0)).round() as u8)
            .collect()
    }
}

/// Render the entire scene on `config.threads` workers.
///
/// Worker `i` renders rows `i, i + n, i + 2n, …`. Every row gets its own RNG
/// seeded from `config.seed` and the row index, so the image does not depend
/// on the thread count.
pub fn render(scene: &Scene, config: &RenderConfig) -> Result<ImageBuffer, ThreadPoolBuildError> {
    let width = scene.camera.width;
    let height = scene.camera.height;
    let threads = config.threads.max(1);

    let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;

    log::info!(
        "Rendering {}x{} on {} threads ({:?})",
        width,
        height,
        threads,
        config.sampling
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(width, height);
    let mut workers: Vec<Vec<(u32, &mut [Color])>> = (0..threads).map(|_| Vec::new()).collect();
    for (y, row) in image.pixels.chunks_mut(width as usize).enumerate() {
        workers[y % threads].push((y as u32, row));
    }

    let completed = AtomicUsize::new(0);
    let report_every = (height as usize / 10).max(1);

    pool.scope(|s| {
        for rows in workers {
            let completed = &completed;
            s.spawn(move |_| {
                for (y, row) in rows {
                    let mut rng = StdRng::seed_from_u64(row_seed(config.seed, y));
                    for (x, pixel) in row.iter_mut().enumerate() {
                        *pixel = render_pixel(scene, x as u32, y, config.sampling, &mut rng);
                    }

                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % report_every == 0 || done == height as usize {
                        log::info!("{}% ..", done * 100 / height as usize);
                    }
                }
            });
        }
    });

    log::info!("Render complete in {:.2?}", start.elapsed());
    Ok(image)
}

fn row_seed(seed: u64, y: u32) -> u64 {
    seed ^ (y as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
