use crate::camera::Camera;
use crate::error::RenderError;
use crate::integrator::Integrator;
use crate::math::*;
use crate::scene::Hittable;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

// ─── Render Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    /// Bounce budget handed to the integrator for every camera ray.
    pub max_depth: u32,
    /// Base seed for the per-scanline generators. `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Render scanlines on the rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Report remaining scanlines on stderr.
    pub progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: None,
            parallel: true,
            progress: true,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        // Jitter divides by (width - 1) and (height - 1).
        if self.width < 2 || self.height < 2 {
            return Err(RenderError::InvalidConfig(format!(
                "image must be at least 2x2 pixels, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig("samples per pixel must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig("max depth must be at least 1".into()));
        }
        Ok(())
    }
}

/// Sizes rayon's global pool. Zero keeps rayon's default of one worker per core.
pub fn init_thread_pool(threads: usize) -> Result<(), RenderError> {
    if threads == 0 {
        return Ok(());
    }
    rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
    debug!("render pool sized to {threads} threads");
    Ok(())
}

// ─── Color Quantization ─────────────────────────────────────────────────────

/// Gamma 2 encoding: square root per channel. Negative inputs clamp to zero.
#[inline]
pub fn gamma_correct(color: Color) -> Color {
    Color::new(
        color.x.max(0.0).sqrt(),
        color.y.max(0.0).sqrt(),
        color.z.max(0.0).sqrt(),
    )
}

/// Quantizes an encoded color to 8 bits per channel, clamping to [0, 0.999]
/// first so that 1.0 lands on 255 rather than overflowing.
#[inline]
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let q = |c: f64| (256.0 * c.clamp(0.0, 0.999)) as u8;
    [q(color.x), q(color.y), q(color.z)]
}

// ─── Framebuffer ────────────────────────────────────────────────────────────

/// Display-encoded pixels in row-major order, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Pixels of display row `y`, counted from the top.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }
}

// ─── Progress & Statistics ──────────────────────────────────────────────────

/// Scanline countdown on stderr. Shared between workers through an atomic
/// counter, so rows may finish in any order.
struct ScanlineProgress {
    enabled: bool,
    total: u32,
    done: AtomicU32,
}

impl ScanlineProgress {
    fn new(total: u32, enabled: bool) -> Self {
        Self {
            enabled,
            total,
            done: AtomicU32::new(0),
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.enabled {
            eprint!("\rScanlines remaining: {} ", self.total - done);
            let _ = io::stderr().flush();
        }
    }

    fn finish(&self) {
        if self.enabled {
            eprintln!("\nDone.");
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    pub elapsed: Duration,
    pub pixels: u64,
    pub samples: u64,
}

impl RenderStats {
    pub fn samples_per_sec(&self) -> f64 {
        self.samples as f64 / self.elapsed.as_secs_f64().max(f64::EPSILON)
    }
}

// ─── Image Driver ───────────────────────────────────────────────────────────

/// Drives the camera and integrator over every pixel of the image.
pub struct Renderer<'a> {
    pub world: &'a dyn Hittable,
    pub camera: &'a Camera,
    pub integrator: Integrator,
    pub config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Linear-light average of `samples_per_pixel` jittered samples for the
    /// pixel whose lower-left corner is at `(i, j)`, with `j` counted upward.
    pub fn render_pixel(
        &self,
        i: u32,
        j: u32,
        rng: &mut dyn RngCore,
    ) -> Result<Color, RenderError> {
        self.config.validate()?;
        Ok(self.sample_pixel(i, j, rng))
    }

    /// [`Self::render_pixel`] for a config that already passed validation.
    fn sample_pixel(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Color {
        let w = (self.config.width - 1) as f64;
        let h = (self.config.height - 1) as f64;
        let spp = self.config.samples_per_pixel;

        let mut sum = Color::ZERO;
        for _ in 0..spp {
            let u = (i as f64 + random_double(rng)) / w;
            let v = (j as f64 + random_double(rng)) / h;
            let ray = self.camera.get_ray(u, v, rng);
            sum += self
                .integrator
                .ray_color(&ray, self.world, self.config.max_depth, rng);
        }
        sum / spp as f64
    }

    /// Renders scanline `j` (counted upward) into `row`, display-encoded.
    fn render_row(&self, j: u32, base_seed: u64, row: &mut [Color]) {
        let mut rng = SmallRng::seed_from_u64(row_seed(base_seed, j));
        for (i, pixel) in row.iter_mut().enumerate() {
            *pixel = gamma_correct(self.sample_pixel(i as u32, j, &mut rng));
        }
    }

    /// Renders the full image. Scanlines are emitted from the top of the image
    /// down, so `pixels[0]` is the upper-left corner.
    pub fn render(&self) -> Result<(Framebuffer, RenderStats), RenderError> {
        self.config.validate()?;

        let RenderConfig {
            width,
            height,
            samples_per_pixel,
            ..
        } = *self.config;
        let base_seed = self.config.seed.unwrap_or_else(|| SmallRng::from_entropy().next_u64());
        let max_depth = self.config.max_depth;
        debug!(
            "render {width}x{height}: {samples_per_pixel} spp, depth {max_depth}, seed {base_seed}"
        );
        debug!("parallel scanlines: {}", self.config.parallel);

        let mut fb = Framebuffer::new(width, height);
        let progress = ScanlineProgress::new(height, self.config.progress);
        let start = Instant::now();

        let scanline = |(y, row): (usize, &mut [Color])| {
            let j = height - 1 - y as u32;
            self.render_row(j, base_seed, row);
            progress.tick();
        };
        // One scanline per chunk; workers write disjoint slices.
        let row_len = width as usize;
        if self.config.parallel {
            fb.pixels.par_chunks_mut(row_len).enumerate().for_each(scanline);
        } else {
            fb.pixels.chunks_mut(row_len).enumerate().for_each(scanline);
        }
        progress.finish();

        let pixels = width as u64 * height as u64;
        let stats = RenderStats {
            elapsed: start.elapsed(),
            pixels,
            samples: pixels * samples_per_pixel as u64,
        };
        info!(
            "rendered {width}x{height} in {:.2?} ({:.2} Msamples/s)",
            stats.elapsed,
            stats.samples_per_sec() / 1e6
        );
        Ok((fb, stats))
    }
}

/// Decorrelated seed for scanline `j`, so any worker can render any row
/// and still reproduce the serial image.
fn row_seed(base: u64, j: u32) -> u64 {
    // splitmix64 finalizer
    let mut z = base ^ (j as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
