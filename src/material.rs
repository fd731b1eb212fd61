use crate::error::SceneError;
use crate::math::*;
use crate::scene::HitRecord;
use rand::RngCore;

/// Result of a successful scatter: the color filter applied at this bounce
/// and the ray that continues the light path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scattered {
    pub attenuation: Color,
    pub ray: Ray,
}

/// Capability shared by every material variant. `None` means the incoming
/// light was absorbed.
pub trait Scatter {
    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scattered>;
}

// ─── Lambertian (Diffuse) ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Lambertian {
    pub albedo: Color,
}

impl Lambertian {
    pub const fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Scatter for Lambertian {
    fn scatter(&self, _ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scattered> {
        // normal + unit sphere sample, not an exact cosine lobe
        let mut direction = hit.normal + Vec3::random_unit_vector(rng);
        if direction.near_zero() {
            direction = hit.normal;
        }
        Some(Scattered {
            attenuation: self.albedo,
            ray: Ray::new(hit.point, direction),
        })
    }
}

// ─── Metal (Specular) ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    pub albedo: Color,
    pub fuzz: f64,
}

impl Metal {
    /// A mirror-like surface. `fuzz` is the radius of the sphere used to
    /// perturb the reflected direction and is clamped to [0, 1].
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Scatter for Metal {
    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scattered> {
        let reflected = reflect(unit_vector(ray.direction), hit.normal);
        let direction = reflected + self.fuzz * Vec3::random_in_unit_sphere(rng);

        // Perturbed below the surface: the ray is swallowed.
        if direction.dot(hit.normal) <= 0.0 {
            return None;
        }
        Some(Scattered {
            attenuation: self.albedo,
            ray: Ray::new(hit.point, direction),
        })
    }
}

// ─── Dielectric (Glass) ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Dielectric {
    pub refractive_index: f64,
}

impl Dielectric {
    pub fn new(refractive_index: f64) -> Result<Self, SceneError> {
        if !refractive_index.is_finite() || refractive_index <= 0.0 {
            return Err(SceneError::InvalidRefractiveIndex(refractive_index));
        }
        Ok(Self { refractive_index })
    }

    /// Schlick's approximation of the Fresnel reflectance.
    pub fn reflectance(cosine: f64, ratio: f64) -> f64 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Scatter for Dielectric {
    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scattered> {
        let ratio = if hit.front_face {
            1.0 / self.refractive_index
        } else {
            self.refractive_index
        };

        let unit_direction = unit_vector(ray.direction);
        let cos_theta = dot(-unit_direction, hit.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let total_internal = ratio * sin_theta > 1.0;
        let reflects = total_internal || random_double(rng) < Self::reflectance(cos_theta, ratio);
        let direction = if reflects {
            reflect(unit_direction, hit.normal)
        } else {
            refract(unit_direction, hit.normal, ratio)
        };

        Some(Scattered {
            attenuation: Color::ONE,
            ray: Ray::new(hit.point, direction),
        })
    }
}

// ─── Material ───────────────────────────────────────────────────────────────

/// The closed set of surface behaviours. Materials are immutable once built
/// and are shared between spheres behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(Lambertian::new(albedo))
    }

    pub fn metal(albedo: Color, fuzz: f64) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    pub fn dielectric(refractive_index: f64) -> Result<Self, SceneError> {
        Dielectric::new(refractive_index).map(Material::Dielectric)
    }
}

impl Scatter for Material {
    fn scatter(&self, ray: &Ray, hit: &HitRecord, rng: &mut dyn RngCore) -> Option<Scattered> {
        match self {
            Material::Lambertian(m) => m.scatter(ray, hit, rng),
            Material::Metal(m) => m.scatter(ray, hit, rng),
            Material::Dielectric(m) => m.scatter(ray, hit, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(material: &Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            point: Point3::ZERO,
            normal,
            t: 1.0,
            front_face,
            material,
        }
    }

    #[test]
    fn test_lambertian_always_scatters_off_the_surface() {
        let material = Material::lambertian(Color::new(0.2, 0.4, 0.6));
        let hit = record(&material, Vec3::Y, true);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let s = material.scatter(&ray, &hit, &mut rng).expect("diffuse never absorbs");
            assert_eq!(s.attenuation, Color::new(0.2, 0.4, 0.6));
            assert_eq!(s.ray.origin, hit.point);
            assert!(s.ray.direction.dot(hit.normal) >= 0.0);
            assert!(!s.ray.direction.near_zero());
        }
    }

    /// Replays a fixed cycle of words, so tests can pick exact samples.
    struct Sequence {
        words: Vec<u64>,
        next: usize,
    }

    impl RngCore for Sequence {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            let word = self.words[self.next % self.words.len()];
            self.next += 1;
            word
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_lambertian_degenerate_sample_falls_back_to_normal() {
        // Draws 0.5, 0.25, 0.5 map to the unit-ball point (0, -0.5, 0), whose
        // unit vector cancels the normal exactly.
        let mut rng = Sequence {
            words: vec![1 << 63, 1 << 62, 1 << 63],
            next: 0,
        };
        let material = Material::lambertian(Color::splat(0.5));
        let hit = record(&material, Vec3::Y, true);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);

        let s = material.scatter(&ray, &hit, &mut rng).expect("diffuse never absorbs");
        assert_eq!(s.ray.direction, hit.normal);
        assert_eq!(s.attenuation, Color::splat(0.5));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz, 1.0);
        assert_eq!(Metal::new(Color::ONE, 0.25).fuzz, 0.25);
    }

    #[test]
    fn test_perfect_mirror_reflects() {
        let material = Material::metal(Color::new(0.8, 0.8, 0.8), 0.0);
        let hit = record(&material, Vec3::Y, true);
        let ray = Ray::new(Point3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(2);

        let s = material.scatter(&ray, &hit, &mut rng).expect("mirror reflects");
        let expected = unit_vector(Vec3::new(1.0, 1.0, 0.0));
        assert!((s.ray.direction - expected).length() < 1e-12);
        assert_eq!(s.attenuation, Color::new(0.8, 0.8, 0.8));
    }

    #[test]
    fn test_metal_absorbs_rays_reflected_into_the_surface() {
        let material = Material::metal(Color::ONE, 0.0);
        // Normal agrees with the ray, so the mirror direction points into the surface.
        let hit = record(&material, -Vec3::Y, true);
        let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(material.scatter(&ray, &hit, &mut rng).is_none());
    }

    #[test]
    fn test_dielectric_rejects_bad_index() {
        assert_eq!(Dielectric::new(0.0), Err(SceneError::InvalidRefractiveIndex(0.0)));
        assert!(Dielectric::new(f64::NAN).is_err());
        assert!(Material::dielectric(-1.5).is_err());
        assert!(Dielectric::new(1.5).is_ok());
    }

    #[test]
    fn test_schlick_reflectance() {
        assert!((Dielectric::reflectance(1.0, 1.0)).abs() < 1e-12);
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-12);
        let r0 = ((1.0 - 1.5_f64) / (1.0 + 1.5)).powi(2);
        assert!((Dielectric::reflectance(1.0, 1.5) - r0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_index_dielectric_passes_straight_through() {
        let material = Material::dielectric(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        // Head-on: Schlick reflectance is zero, so the ray always transmits.
        for front_face in [true, false] {
            let hit = record(&material, Vec3::Z, front_face);
            let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), -Vec3::Z);
            for _ in 0..100 {
                let s = material.scatter(&ray, &hit, &mut rng).unwrap();
                assert_eq!(s.attenuation, Color::ONE);
                assert!((s.ray.direction - (-Vec3::Z)).length() < 1e-12);
            }
        }

        // Oblique: never total internal reflection, and transmission is undeviated.
        let hit = record(&material, Vec3::Z, false);
        let incoming = unit_vector(Vec3::new(0.9, 0.0, -0.1));
        let ray = Ray::new(Point3::ZERO, incoming);
        let mirrored = reflect(incoming, Vec3::Z);
        let mut transmitted = 0;
        for _ in 0..500 {
            let d = material.scatter(&ray, &hit, &mut rng).unwrap().ray.direction;
            if (d - incoming).length() < 1e-9 {
                transmitted += 1;
            } else {
                assert!((d - mirrored).length() < 1e-9);
            }
        }
        assert!(transmitted > 0);
    }

    #[test]
    fn test_total_internal_reflection_from_inside() {
        let material = Material::dielectric(1.5).unwrap();
        let hit = record(&material, Vec3::Z, false);
        // Grazing exit: 1.5 · sin(theta) > 1.
        let incoming = unit_vector(Vec3::new(1.0, 0.0, -0.2));
        let ray = Ray::new(Point3::ZERO, incoming);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let d = material.scatter(&ray, &hit, &mut rng).unwrap().ray.direction;
            assert!((d - reflect(incoming, Vec3::Z)).length() < 1e-12);
        }
    }
}
