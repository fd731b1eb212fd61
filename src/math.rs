use rand::{Rng, RngCore};
use std::fmt;
use std::iter::Sum;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// Three real components shared by positions, directions and RGB colors.
///
/// Nothing distinguishes a point from a direction or a color at the type
/// level; `Point3` and `Color` are plain aliases so that the same arithmetic
/// serves geometry and light transport alike.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub type Point3 = Vec3;
pub type Color = Vec3;

/// Threshold under which a component counts as zero for degenerate-direction checks.
const NEAR_ZERO: f64 = 1e-8;

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
    pub const X: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    pub const Y: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    pub const Z: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline(always)]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    #[inline(always)]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline(always)]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction. The caller guarantees a non-zero
    /// input; a zero vector yields NaN components.
    #[inline(always)]
    pub fn normalized(self) -> Self {
        debug_assert!(self.length_squared() > 0.0, "normalizing a zero vector");
        self / self.length()
    }

    #[inline(always)]
    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline(always)]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// True when every component is within 1e-8 of zero. Scatter code uses
    /// this to catch a random sample that cancelled the normal out.
    #[inline(always)]
    pub fn near_zero(self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }

    /// Linear interpolation, `self` at `t = 0` and `other` at `t = 1`.
    #[inline(always)]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Each component drawn uniformly from [0, 1).
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::new(random_double(rng), random_double(rng), random_double(rng))
    }

    /// Each component drawn uniformly from [min, max).
    pub fn random_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Self {
        Self::new(
            random_double_range(rng, min, max),
            random_double_range(rng, min, max),
            random_double_range(rng, min, max),
        )
    }

    /// Uniform point strictly inside the unit ball, by rejection from the
    /// enclosing cube.
    pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = Self::random_range(rng, -1.0, 1.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    pub fn random_unit_vector(rng: &mut dyn RngCore) -> Self {
        unit_vector(Self::random_in_unit_sphere(rng))
    }

    /// Uniform point inside the unit disk in the z = 0 plane, used for lens sampling.
    pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = Self::new(
                random_double_range(rng, -1.0, 1.0),
                random_double_range(rng, -1.0, 1.0),
                0.0,
            );
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }
}

#[inline(always)]
pub fn dot(u: Vec3, v: Vec3) -> f64 {
    u.dot(v)
}

#[inline(always)]
pub fn cross(u: Vec3, v: Vec3) -> Vec3 {
    u.cross(v)
}

#[inline(always)]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v.normalized()
}

/// Mirror `v` about the plane whose unit normal is `n`: `v - 2·(v·n)·n`.
#[inline(always)]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of the unit direction `uv` through a surface with unit
/// normal `n`, split into the components perpendicular and parallel to `n`.
///
/// No total-internal-reflection check happens here; callers decide whether
/// refraction is possible before calling.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, eta_ratio: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = eta_ratio * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Uniform draw from [0, 1).
#[inline(always)]
pub fn random_double(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Uniform draw from [min, max).
#[inline(always)]
pub fn random_double_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * random_double(rng)
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

// Component-wise product, used for color attenuation.
impl Mul for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, t: f64) -> Self {
        Self::new(self.x * t, self.y * t, self.z * t)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    #[inline(always)]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl MulAssign<f64> for Vec3 {
    #[inline(always)]
    fn mul_assign(&mut self, t: f64) {
        *self = *self * t;
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn div(self, t: f64) -> Self {
        Self::new(self.x / t, self.y / t, self.z / t)
    }
}

impl DivAssign<f64> for Vec3 {
    #[inline(always)]
    fn div_assign(&mut self, t: f64) {
        *self = *self / t;
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of bounds: {i}"),
        }
    }
}

impl Sum for Vec3 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Vec3::ZERO, |acc, v| acc + v)
    }
}

// ─── Ray ────────────────────────────────────────────────────────────────────

/// The half-line `P(t) = origin + t·direction`. The direction is stored as
/// given; only the few consumers that need a unit direction normalize it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    #[inline(always)]
    pub const fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline(always)]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }
}
