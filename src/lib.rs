//! # glint
//!
//! A Monte Carlo path tracer for scenes made of spheres.
//!
//! Camera rays pass through a thin lens, bounce between diffuse, metallic and
//! glass surfaces, and pick up the sky color once they escape. Each pixel is
//! the average of many jittered samples:
//!
//! ```text
//!   pixel = √( (1/N) · Σ ray_color(camera.get_ray(u + ξ, v + ξ')) )
//! ```
//!
//! where `ray_color` multiplies the attenuation of every surface met along a
//! path, and the square root is the gamma-2 display encoding.
//!
//! Scanlines render in parallel on rayon's pool. Every row draws from its own
//! seeded generator, so the image depends only on the seed and never on the
//! thread count.

pub mod camera;
pub mod error;
pub mod integrator;
pub mod material;
pub mod math;
pub mod output;
pub mod presets;
pub mod renderer;
pub mod scene;

pub use camera::{Camera, CameraConfig};
pub use error::{OutputError, RenderError, SceneError};
pub use integrator::{ray_color, Background, Integrator, Shading};
pub use material::{Dielectric, Lambertian, Material, Metal, Scatter, Scattered};
pub use math::{Color, Point3, Ray, Vec3};
pub use output::{display_preview, PpmFormat, PreviewMode};
pub use presets::{SceneDescription, ScenePreset};
pub use renderer::{Framebuffer, RenderConfig, RenderStats, Renderer};
pub use scene::{Geometry, HitRecord, Hittable, HittableList, Sphere};
