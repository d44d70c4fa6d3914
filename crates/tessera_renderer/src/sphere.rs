//! Sphere primitive for ray tracing.

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, MaterialId};
use std::f32::consts::PI;
use tessera_math::{Interval, Ray, Vec3};

/// A sphere primitive.
///
/// A negative radius is allowed: it keeps the same surface but flips the
/// outward normal inward, which is how hollow glass shells are built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // p is a point on the unit sphere centered at origin
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        let u = phi / (2.0 * PI);
        let v = theta / PI;
        (u, v)
    }

    /// Test if a ray hits this sphere strictly inside `ray_t`.
    ///
    /// Returns the nearest qualifying root.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // A point has no surface to orient a normal on
        if self.radius == 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            self.material,
            Self::get_sphere_uv(outward_normal),
        ))
    }
}

/// Every kind of geometry a scene can hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
}

impl Primitive {
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
        }
    }

    pub fn material(&self) -> MaterialId {
        match self {
            Primitive::Sphere(sphere) => sphere.material(),
        }
    }

    /// Reject shapes whose normals are undefined.
    pub fn validate(&self) -> RenderResult<()> {
        match self {
            Primitive::Sphere(sphere) => {
                let radius = sphere.radius();
                if radius == 0.0 || !radius.is_finite() {
                    return Err(RenderError::invalid(format!(
                        "sphere at {} has degenerate radius {radius}",
                        sphere.center()
                    )));
                }
                Ok(())
            }
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f32 = 1e-4;

    fn forward() -> Interval {
        Interval::from_min(0.001)
    }

    #[test]
    fn test_centerline_hit_distance() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, MaterialId(0));
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, forward()).expect("ray should hit");
        assert!((rec.t - (5.0 - 1.0)).abs() < EPS);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < EPS);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0));

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, MaterialId(0));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, forward()).expect("ray should exit sphere");
        assert!((rec.t - 2.0).abs() < EPS);
        assert!(!rec.front_face);
        assert!(rec.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_interval_excludes_roots() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, MaterialId(0));
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        // Both roots (4 and 6) lie past t_max
        assert!(sphere.hit(&ray, Interval::new(0.001, 3.5)).is_none());
        // Near root excluded, far root accepted
        let rec = sphere.hit(&ray, Interval::new(4.5, 10.0)).expect("far root");
        assert!((rec.t - 6.0).abs() < EPS);
    }

    #[test]
    fn test_negative_radius_flips_orientation() {
        let solid = Sphere::new(Vec3::ZERO, 1.0, MaterialId(0));
        let shell = Sphere::new(Vec3::ZERO, -1.0, MaterialId(0));
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let outer = solid.hit(&ray, forward()).expect("hit");
        let inner = shell.hit(&ray, forward()).expect("hit");

        assert!((outer.t - inner.t).abs() < EPS);
        assert!(outer.front_face);
        assert!(!inner.front_face);
        // Stored normal still faces the ray
        assert!(inner.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_normals_match_front_face() {
        let mut rng = StdRng::seed_from_u64(11);
        let spheres = [
            Sphere::new(Vec3::new(0.3, -0.2, 0.1), 1.5, MaterialId(0)),
            Sphere::new(Vec3::new(-0.4, 0.6, 0.2), -1.2, MaterialId(0)),
        ];

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
                rng.gen_range(-4.0..4.0),
            );
            let direction = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if direction.length_squared() < 1e-3 {
                continue;
            }
            let ray = Ray::new_simple(origin, direction);

            for sphere in &spheres {
                if let Some(rec) = sphere.hit(&ray, forward()) {
                    hits += 1;
                    assert!((rec.normal.length() - 1.0).abs() < 1e-3);
                    assert!(rec.normal.dot(ray.direction()) <= 0.0);
                    let outward = (rec.p - sphere.center()) / sphere.radius();
                    assert_eq!(rec.front_face, ray.direction().dot(outward) < 0.0);
                }
            }
        }
        assert!(hits > 100);
    }

    #[test]
    fn test_zero_radius_never_hits() {
        let point = Sphere::new(Vec3::ZERO, 0.0, MaterialId(0));
        let through_center = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(point.hit(&through_center, forward()).is_none());

        let primitive = Primitive::from(point);
        assert!(matches!(primitive.validate(), Err(RenderError::InvalidConfig(_))));
        assert!(Primitive::from(Sphere::new(Vec3::ZERO, f32::NAN, MaterialId(0)))
            .validate()
            .is_err());
        assert!(Primitive::from(Sphere::new(Vec3::ZERO, -0.45, MaterialId(0)))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_uv_in_unit_range() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, MaterialId(0));
        let ray = Ray::new_simple(Vec3::new(3.0, 0.5, 0.2), Vec3::new(-1.0, 0.0, 0.0));

        let rec = sphere.hit(&ray, forward()).expect("hit");
        assert!((0.0..=1.0).contains(&rec.u));
        assert!((0.0..=1.0).contains(&rec.v));
    }

    #[test]
    fn test_primitive_dispatch() {
        let primitive: Primitive = Sphere::new(Vec3::ZERO, 1.0, MaterialId(2)).into();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(primitive.material(), MaterialId(2));
        assert_eq!(primitive.hit(&ray, forward()).map(|r| r.material), Some(MaterialId(2)));
    }
}
