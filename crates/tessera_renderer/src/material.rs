//! Surface scattering models.

use crate::hittable::HitRecord;
use crate::random::{gen_f32, random_unit_vector};
use crate::texture::Texture;
use rand::RngCore;
use tessera_math::{Color, Ray, Vec3};

/// Outcome of a successful scatter: how much light survives the bounce
/// and where it goes next.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// How light interacts with a surface.
///
/// Materials are immutable and hold no per-call state, so one table of
/// them can be read by every worker at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Diffuse surface.
    Lambertian { albedo: Texture },
    /// Mirror reflection perturbed by `fuzz` (0 = perfect mirror, 1 = very rough).
    Metal { albedo: Color, fuzz: f32 },
    /// Glass-like refraction with index of refraction `ior`.
    Dielectric { ior: f32 },
}

impl Material {
    /// Create a new Lambertian material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Self::textured(Texture::solid(albedo))
    }

    /// Lambertian material whose albedo comes from a texture.
    pub fn textured(albedo: Texture) -> Self {
        warn_if_amplifying(albedo.max_channel());
        Self::Lambertian { albedo }
    }

    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, clamped to [0, 1]
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        warn_if_amplifying(albedo.max_element());
        Self::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn dielectric(ior: f32) -> Self {
        Self::Dielectric { ior }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => {
                let direction = rec.normal + random_unit_vector(rng);
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }
                Some(Scatter {
                    attenuation: albedo.value(rec.u, rec.v, rec.p),
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let direction = reflected + fuzz * random_unit_vector(rng);

                // Only scatter if the reflected ray leaves the surface
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }
                Some(Scatter {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }
            Material::Dielectric { ior } => {
                let refraction_ratio = if rec.front_face { 1.0 / ior } else { ior };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).clamp(0.0, 1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction = if cannot_refract
                    || gen_f32(rng) < reflectance(cos_theta, refraction_ratio)
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(Scatter {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction, ray_in.time()),
                })
            }
        }
    }
}

fn warn_if_amplifying(max_channel: f32) {
    if max_channel > 1.0 {
        log::warn!(
            "Albedo channel {max_channel} exceeds 1.0; bounces off this material will gain energy"
        );
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance
#[inline]
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
