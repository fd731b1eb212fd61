use crate::camera::CameraConfig;
use crate::error::SceneError;
use crate::integrator::{Background, Integrator, Shading, ROYAL_BLUE, WHITE};
use crate::material::Material;
use crate::math::*;
use crate::scene::{HittableList, Sphere};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// A programmatically built scene: geometry plus the camera and integrator
/// settings it is meant to be viewed with.
pub struct SceneDescription {
    pub name: &'static str,
    pub world: HittableList,
    pub camera: CameraConfig,
    pub integrator: Integrator,
}

/// Built-in scenes, from a flat hit test up to the full material showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenePreset {
    /// A flat red sphere against a white to royal-blue sky. Hit testing only.
    Gradient,
    /// A sphere resting on a ground sphere, colored by surface normal.
    Normals,
    /// The same two spheres, both a 50% grey diffuser.
    Diffuse,
    /// Diffuse, fuzzy metal, and hollow glass spheres seen through a wide
    /// aperture lens.
    Materials,
    /// The random small-spheres cover scene.
    Showcase,
}

impl ScenePreset {
    pub fn build(self) -> Result<SceneDescription, SceneError> {
        match self {
            ScenePreset::Gradient => build_gradient(),
            ScenePreset::Normals => build_normals(),
            ScenePreset::Diffuse => build_diffuse(),
            ScenePreset::Materials => build_materials(),
            ScenePreset::Showcase => build_showcase(),
        }
    }
}

/// Sphere at (0, 0, −1) on a ground sphere of radius 100, both with `material`.
fn sphere_on_ground(material: Arc<Material>) -> Result<HittableList, SceneError> {
    let mut world = HittableList::new();
    world.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, material.clone())?);
    world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, material)?);
    Ok(world)
}

fn build_gradient() -> Result<SceneDescription, SceneError> {
    let red = Color::new(1.0, 0.0, 0.0);
    // Flat shading never scatters, so the material only fills the slot.
    let sphere = Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Material::lambertian(red)),
    )?;
    Ok(SceneDescription {
        name: "Gradient",
        world: HittableList::with_object(sphere),
        camera: CameraConfig::default(),
        integrator: Integrator::new(
            Background::Gradient {
                horizon: WHITE,
                zenith: ROYAL_BLUE,
            },
            Shading::Flat(red),
        ),
    })
}

fn build_normals() -> Result<SceneDescription, SceneError> {
    // Never scattered; the material only fills the slot.
    let unused = Arc::new(Material::lambertian(Color::ONE));
    Ok(SceneDescription {
        name: "Normals",
        world: sphere_on_ground(unused)?,
        camera: CameraConfig::default(),
        integrator: Integrator::new(Background::default(), Shading::Normals),
    })
}

fn build_diffuse() -> Result<SceneDescription, SceneError> {
    let grey = Arc::new(Material::lambertian(Color::splat(0.5)));
    Ok(SceneDescription {
        name: "Diffuse",
        world: sphere_on_ground(grey)?,
        camera: CameraConfig::default(),
        integrator: Integrator::default(),
    })
}

fn build_materials() -> Result<SceneDescription, SceneError> {
    let ground = Arc::new(Material::lambertian(Color::new(0.8, 0.8, 0.0)));
    let center = Arc::new(Material::lambertian(Color::new(0.1, 0.2, 0.5)));
    let glass = Arc::new(Material::dielectric(1.5)?);
    let gold = Arc::new(Material::metal(Color::new(0.8, 0.6, 0.2), 0.5));

    let mut world = HittableList::new();
    world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground)?);
    world.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, center)?);
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, glass.clone())?);
    world.add(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, gold)?);
    // Inverted normals turn this into a hollow glass bubble.
    world.add(Sphere::new(Point3::new(-0.4, -0.3, 0.0), -0.25, glass)?);

    let look_from = Point3::new(3.0, 3.0, 2.0);
    let look_at = Point3::new(0.0, 0.0, -1.0);
    Ok(SceneDescription {
        name: "Materials",
        world,
        camera: CameraConfig {
            look_from,
            look_at,
            vup: Vec3::Y,
            vfov_degrees: 20.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 2.0,
            focus_dist: (look_from - look_at).length(),
        },
        integrator: Integrator::default(),
    })
}

/// Fixed so that the cover scene's layout is the same on every run.
const SHOWCASE_LAYOUT_SEED: u64 = 0x5eed_cafe;

fn build_showcase() -> Result<SceneDescription, SceneError> {
    let mut rng = SmallRng::seed_from_u64(SHOWCASE_LAYOUT_SEED);
    let mut world = HittableList::new();

    world.add(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Material::lambertian(Color::splat(0.5))),
    )?);

    // Shared by every small glass sphere and the large center one.
    let glass = Arc::new(Material::dielectric(1.5)?);

    for a in -11..11 {
        for b in -11..11 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose: f64 = rng.gen();
            let material = if choose < 0.8 {
                let albedo = Color::random(&mut rng) * Color::random(&mut rng);
                Arc::new(Material::lambertian(albedo))
            } else if choose < 0.95 {
                let albedo = Color::random_range(&mut rng, 0.5, 1.0);
                let fuzz = random_double_range(&mut rng, 0.0, 0.5);
                Arc::new(Material::metal(albedo, fuzz))
            } else {
                glass.clone()
            };
            world.add(Sphere::new(center, 0.2, material)?);
        }
    }

    world.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass)?);
    world.add(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::lambertian(Color::new(0.4, 0.2, 0.1))),
    )?);
    world.add(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    )?);

    Ok(SceneDescription {
        name: "Showcase",
        world,
        camera: CameraConfig {
            look_from: Point3::new(13.0, 2.0, 3.0),
            look_at: Point3::ZERO,
            vup: Vec3::Y,
            vfov_degrees: 20.0,
            aspect_ratio: 3.0 / 2.0,
            aperture: 0.1,
            focus_dist: 10.0,
        },
        integrator: Integrator::default(),
    })
}
