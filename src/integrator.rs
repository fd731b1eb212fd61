//! Light transport: turns a camera ray into a radiance estimate.

use crate::material::{Scatter, Scattered};
use crate::math::*;
use crate::scene::{HitRecord, Hittable};
use rand::RngCore;

/// Minimum hit distance. Rounding error puts a scattered ray's origin a hair
/// off the surface it left; without the bias it would re-hit that surface
/// ("shadow acne").
pub const T_MIN: f64 = 0.001;

pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
pub const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);
pub const ROYAL_BLUE: Color = Color::new(0.25, 0.41, 0.88);

/// Radiance arriving along rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Vertical blend from `horizon` (straight down) to `zenith` (straight up).
    Gradient { horizon: Color, zenith: Color },
    Solid(Color),
}

impl Default for Background {
    fn default() -> Self {
        Background::Gradient {
            horizon: WHITE,
            zenith: SKY_BLUE,
        }
    }
}

impl Background {
    pub fn sample(&self, ray: &Ray) -> Color {
        match *self {
            Background::Gradient { horizon, zenith } => {
                let t = 0.5 * (unit_vector(ray.direction).y + 1.0);
                horizon.lerp(zenith, t)
            }
            Background::Solid(color) => color,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Shading {
    /// Full Monte Carlo light transport through material scattering.
    #[default]
    PathTraced,
    /// Maps the hit normal to RGB, `0.5·(n + 1)`. No bounces.
    Normals,
    /// Any hit is this color. Only answers whether the ray met geometry.
    Flat(Color),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Integrator {
    pub background: Background,
    pub shading: Shading,
}

impl Integrator {
    pub fn new(background: Background, shading: Shading) -> Self {
        Self { background, shading }
    }

    /// Radiance carried back along `ray`, following at most `depth_budget`
    /// surface interactions. A spent budget contributes black.
    pub fn ray_color(
        &self,
        ray: &Ray,
        world: &dyn Hittable,
        depth_budget: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        match self.shading {
            Shading::PathTraced => self.trace(*ray, world, depth_budget, rng),
            Shading::Normals => self.primary(ray, world, depth_budget, |hit| {
                0.5 * (hit.normal + Color::ONE)
            }),
            Shading::Flat(color) => self.primary(ray, world, depth_budget, |_| color),
        }
    }

    fn trace(
        &self,
        mut ray: Ray,
        world: &dyn Hittable,
        depth_budget: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        // Product of every attenuation met so far, in bounce order.
        let mut throughput = Color::ONE;

        for _ in 0..depth_budget {
            let Some(hit) = world.hit(&ray, T_MIN, f64::INFINITY) else {
                return throughput * self.background.sample(&ray);
            };
            match hit.material.scatter(&ray, &hit, rng) {
                Some(Scattered { attenuation, ray: scattered }) => {
                    throughput = throughput * attenuation;
                    ray = scattered;
                }
                None => return Color::ZERO,
            }
        }

        Color::ZERO
    }

    /// Single-hit shading: `surface` colors the first hit, misses see the background.
    fn primary(
        &self,
        ray: &Ray,
        world: &dyn Hittable,
        depth_budget: u32,
        surface: impl Fn(&HitRecord<'_>) -> Color,
    ) -> Color {
        if depth_budget == 0 {
            return Color::ZERO;
        }
        match world.hit(ray, T_MIN, f64::INFINITY) {
            Some(hit) => surface(&hit),
            None => self.background.sample(ray),
        }
    }
}

/// [`Integrator::ray_color`] with the default sky and full path tracing.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth_budget: u32,
    rng: &mut dyn RngCore,
) -> Color {
    Integrator::default().ray_color(ray, world, depth_budget, rng)
}
