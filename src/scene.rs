use crate::error::SceneError;
use crate::material::Material;
use crate::math::*;
use std::sync::Arc;

// ─── Hit Record ─────────────────────────────────────────────────────────────

/// Where and how a ray met a surface. Produced fresh by every successful
/// intersection query and borrowed from the geometry that produced it.
#[derive(Debug, Clone)]
pub struct HitRecord<'a> {
    pub point: Point3,
    /// Unit normal, always facing against the incoming ray.
    pub normal: Vec3,
    pub t: f64,
    pub front_face: bool,
    pub material: &'a Material,
}

impl<'a> HitRecord<'a> {
    /// Orients `outward_normal` against the ray and records which side was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

// ─── Hittable Trait ─────────────────────────────────────────────────────────

pub trait Hittable: Send + Sync {
    /// Closest intersection with parameter in `[t_min, t_max]`, if any.
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>>;
}

// ─── Sphere ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// A sphere of the given radius. A negative radius describes the same
    /// surface with its normals turned inward, which is how hollow glass
    /// shells are modelled.
    pub fn new(center: Point3, radius: f64, material: Arc<Material>) -> Result<Self, SceneError> {
        if !radius.is_finite() || radius == 0.0 {
            return Err(SceneError::InvalidRadius(radius));
        }
        Ok(Self { center, radius, material })
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Normal at a surface point, pointing away from the center for a positive
    /// radius and toward it for a negative one.
    #[inline]
    pub fn outward_normal(&self, point: Point3) -> Vec3 {
        (point - self.center) / self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let in_range = |t: f64| t_min <= t && t <= t_max;
        let root = [(-half_b - sqrtd) / a, (-half_b + sqrtd) / a]
            .into_iter()
            .find(|&t| in_range(t))?;

        let point = ray.at(root);
        let mut rec = HitRecord {
            point,
            normal: Vec3::ZERO,
            t: root,
            front_face: false,
            material: self.material.as_ref(),
        };
        rec.set_face_normal(ray, self.outward_normal(point));
        Some(rec)
    }
}

// ─── Aggregate ──────────────────────────────────────────────────────────────

/// An insertion-ordered collection queried as one surface. Duplicates are
/// allowed; members are shared handles and may appear in other lists too.
#[derive(Debug, Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<Geometry>>,
}

impl HittableList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(object: impl Into<Arc<Geometry>>) -> Self {
        let mut list = Self::new();
        list.add(object);
        list
    }

    pub fn add(&mut self, object: impl Into<Arc<Geometry>>) {
        self.objects.push(object.into());
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Arc<Geometry>] {
        &self.objects
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        let mut closest_so_far = t_max;
        let mut closest = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, t_min, closest_so_far) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────────

/// Everything that can be placed in a scene.
#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere(Sphere),
    List(HittableList),
}

impl Hittable for Geometry {
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord<'_>> {
        match self {
            Geometry::Sphere(sphere) => sphere.hit(ray, t_min, t_max),
            Geometry::List(list) => list.hit(ray, t_min, t_max),
        }
    }
}

impl From<Sphere> for Geometry {
    fn from(sphere: Sphere) -> Self {
        Geometry::Sphere(sphere)
    }
}

impl From<HittableList> for Geometry {
    fn from(list: HittableList) -> Self {
        Geometry::List(list)
    }
}

impl From<Sphere> for Arc<Geometry> {
    fn from(sphere: Sphere) -> Self {
        Arc::new(Geometry::Sphere(sphere))
    }
}

impl From<HittableList> for Arc<Geometry> {
    fn from(list: HittableList) -> Self {
        Arc::new(Geometry::List(list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    fn grey() -> Arc<Material> {
        Arc::new(Material::lambertian(Color::splat(0.5)))
    }

    fn sphere(center: Point3, radius: f64) -> Sphere {
        Sphere::new(center, radius, grey()).unwrap()
    }

    #[test]
    fn test_zero_radius_is_rejected() {
        assert_eq!(
            Sphere::new(Point3::ZERO, 0.0, grey()).unwrap_err(),
            SceneError::InvalidRadius(0.0)
        );
        assert!(Sphere::new(Point3::ZERO, f64::INFINITY, grey()).is_err());

        let material = grey();
        let hollow = Sphere::new(Point3::new(1.0, 2.0, 3.0), -0.5, material.clone()).unwrap();
        assert_eq!(hollow.center(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(hollow.radius(), -0.5);
        assert!(Arc::ptr_eq(hollow.material(), &material));
    }

    #[test]
    fn test_sphere_hit_near_root() {
        let s = sphere(Point3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = s.hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!((rec.t - 0.5).abs() < EPS);
        assert!((rec.point - Point3::new(0.0, 0.0, -0.5)).length() < EPS);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < EPS);
    }

    #[test]
    fn test_sphere_falls_back_to_far_root() {
        let s = sphere(Point3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = s.hit(&ray, 0.6, f64::INFINITY).expect("exit hit");
        assert!((rec.t - 1.5).abs() < EPS);
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < EPS);

        assert!(s.hit(&ray, 1.6, f64::INFINITY).is_none());
        assert!(s.hit(&ray, 0.001, 0.4).is_none());
    }

    #[test]
    fn test_sphere_miss() {
        let s = sphere(Point3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Point3::ZERO, Vec3::Y);
        assert!(s.hit(&ray, 0.001, f64::INFINITY).is_none());
    }

    #[test]
    fn test_hit_invariants_hold_for_many_rays() {
        let s = sphere(Point3::new(0.3, -0.2, -2.0), 0.8);
        let inverted = sphere(Point3::new(0.3, -0.2, -2.0), -0.8);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let origin = Vec3::random_range(&mut rng, -1.0, 1.0);
            let direction = Vec3::random_range(&mut rng, -1.0, 1.0) + Vec3::new(0.0, 0.0, -1.0);
            let ray = Ray::new(origin, direction);

            let (Some(a), Some(b)) = (
                s.hit(&ray, 0.001, 10.0),
                inverted.hit(&ray, 0.001, 10.0),
            ) else {
                assert!(s.hit(&ray, 0.001, 10.0).is_none());
                assert!(inverted.hit(&ray, 0.001, 10.0).is_none());
                continue;
            };

            for rec in [&a, &b] {
                assert!((0.001..=10.0).contains(&rec.t));
                assert!((ray.at(rec.t) - rec.point).length() < EPS);
                assert!(rec.normal.dot(ray.direction) <= 0.0);
                assert!((rec.normal.length() - 1.0).abs() < EPS);
            }

            assert!((a.t - b.t).abs() < EPS);
            assert!((a.point - b.point).length() < EPS);
            assert_ne!(a.front_face, b.front_face);
            let outward = s.outward_normal(a.point);
            let inward = inverted.outward_normal(b.point);
            assert!((outward + inward).length() < EPS);
        }
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let near = Arc::new(Material::lambertian(Color::new(1.0, 0.0, 0.0)));
        let ground = Arc::new(Material::lambertian(Color::new(0.0, 1.0, 0.0)));

        // Ground first, so the near sphere must shrink the window afterwards.
        let mut world = HittableList::new();
        world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground).unwrap());
        world.add(Sphere::new(Point3::new(0.0, 0.0, -3.0), 0.5, grey()).unwrap());
        world.add(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, near.clone()).unwrap());
        assert_eq!(world.len(), 3);

        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = world.hit(&ray, 0.001, f64::INFINITY).expect("hit");
        assert!((rec.t - 0.5).abs() < EPS);
        assert_eq!(rec.material, near.as_ref());
    }

    #[test]
    fn test_list_respects_range_and_nesting() {
        let mut inner = HittableList::new();
        inner.add(sphere(Point3::new(0.0, 0.0, -5.0), 1.0));

        let shared: Arc<Geometry> = inner.into();
        let mut world = HittableList::new();
        world.add(shared.clone());
        world.add(shared);
        assert_eq!(world.len(), 2);

        let ray = Ray::new(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!((world.hit(&ray, 0.001, f64::INFINITY).unwrap().t - 4.0).abs() < EPS);
        assert!(world.hit(&ray, 0.001, 3.0).is_none());

        world.clear();
        assert!(world.is_empty());
        assert!(world.hit(&ray, 0.001, f64::INFINITY).is_none());
    }
}
