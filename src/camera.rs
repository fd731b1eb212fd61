use crate::error::SceneError;
use crate::math::*;
use rand::RngCore;

/// Placement and lens parameters for a [`Camera`].
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub look_from: Point3,
    pub look_at: Point3,
    /// Hint for "up"; only its component orthogonal to the view direction matters.
    pub vup: Vec3,
    pub vfov_degrees: f64,
    pub aspect_ratio: f64,
    /// Lens diameter. Zero gives a pinhole camera with everything in focus.
    pub aperture: f64,
    /// Distance from `look_from` to the plane of perfect focus.
    pub focus_dist: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov_degrees: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

/// A thin-lens camera.
///
/// The image plane sits at `focus_dist` in front of the eye and spans
/// `horizontal × vertical` from `lower_left`. Primary rays start from a random
/// point on the lens disk and aim at the image-plane point, so geometry on the
/// focal plane stays sharp while everything else blurs with the aperture.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3,
    lower_left: Point3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Result<Self, SceneError> {
        validate(config)?;

        let half_height = (config.vfov_degrees.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * half_height * config.focus_dist;
        let viewport_width = config.aspect_ratio * viewport_height;

        let w = unit_vector(config.look_from - config.look_at);
        let u = unit_vector(cross(config.vup, w));
        let v = cross(w, u);

        let origin = config.look_from;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left = origin - horizontal / 2.0 - vertical / 2.0 - config.focus_dist * w;

        Ok(Camera {
            origin,
            lower_left,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: config.aperture / 2.0,
        })
    }

    /// Ray through the normalized image-plane point `(s, t)`, where `(0, 0)` is
    /// the lower-left corner and `(1, 1)` the upper-right.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let lens = self.lens_radius * Vec3::random_in_unit_disk(rng);
        let offset = self.u * lens.x + self.v * lens.y;
        let target = self.lower_left + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin + offset, target - self.origin - offset)
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// The orthonormal `(u, v, w)` frame: right, up, and backward.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

fn validate(config: &CameraConfig) -> Result<(), SceneError> {
    if !(config.vfov_degrees > 0.0 && config.vfov_degrees < 180.0) {
        return Err(SceneError::InvalidCamera(
            "vertical field of view must lie in (0, 180) degrees",
        ));
    }
    if !(config.aspect_ratio > 0.0) || !config.aspect_ratio.is_finite() {
        return Err(SceneError::InvalidCamera("aspect ratio must be positive"));
    }
    if !(config.focus_dist > 0.0) || !config.focus_dist.is_finite() {
        return Err(SceneError::InvalidCamera("focus distance must be positive"));
    }
    if !(config.aperture >= 0.0) || !config.aperture.is_finite() {
        return Err(SceneError::InvalidCamera("aperture must be non-negative"));
    }
    let view = config.look_from - config.look_at;
    if view.near_zero() {
        return Err(SceneError::InvalidCamera("look_from and look_at coincide"));
    }
    if cross(config.vup, view).near_zero() {
        return Err(SceneError::InvalidCamera("up vector is parallel to the view direction"));
    }
    Ok(())
}
