//! Camera for ray generation.

use crate::error::{RenderError, RenderResult};
use crate::random::{gen_f32, random_in_unit_disk};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tessera_math::{Ray, Vec3};

/// User-facing camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; 0 gives a pinhole camera
    pub aperture: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
    /// Shutter open time
    pub time0: f32,
    /// Shutter close time
    pub time1: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            vfov: 20.0,
            aperture: 0.1,
            focus_dist: 10.0,
            time0: 0.0,
            time1: 0.0,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the shutter interval rays are time-stamped within.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Compute the immutable camera for an image of the given aspect ratio.
    pub fn build(&self, aspect_ratio: f32) -> RenderResult<Camera> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(RenderError::invalid(format!(
                "aspect ratio must be positive, got {aspect_ratio}"
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::invalid(format!(
                "vertical field of view must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }
        if !(self.focus_dist > 0.0) {
            return Err(RenderError::invalid(format!(
                "focus distance must be positive, got {}",
                self.focus_dist
            )));
        }
        if !(self.aperture >= 0.0) {
            return Err(RenderError::invalid(format!(
                "aperture must not be negative, got {}",
                self.aperture
            )));
        }
        if self.time1 < self.time0 {
            return Err(RenderError::invalid(format!(
                "shutter closes ({}) before it opens ({})",
                self.time1, self.time0
            )));
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(RenderError::invalid("look_from and look_at coincide"));
        }

        // Calculate camera basis vectors
        let w = view.normalize();
        let u = self.vup.cross(w);
        if u.length_squared() < 1e-12 {
            return Err(RenderError::invalid("vup is parallel to the view direction"));
        }
        let u = u.normalize();
        let v = w.cross(u);

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        let origin = self.look_from;
        let horizontal = self.focus_dist * viewport_width * u;
        let vertical = self.focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - self.focus_dist * w;

        Ok(Camera {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: self.aperture / 2.0,
            time0: self.time0,
            time1: self.time1,
        })
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
    time0: f32,
    time1: f32,
}

impl Camera {
    /// Generate a ray through normalized image-plane coordinates.
    ///
    /// `s` runs left to right and `t` bottom to top, both in [0, 1].
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= f32::EPSILON {
            Vec3::ZERO
        } else {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        };

        let ray_origin = self.origin + offset;
        let ray_direction =
            self.lower_left_corner + s * self.horizontal + t * self.vertical - ray_origin;
        let ray_time = if self.time1 > self.time0 {
            self.time0 + gen_f32(rng) * (self.time1 - self.time0)
        } else {
            self.time0
        };

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pinhole() -> Camera {
        CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .build(2.0)
            .unwrap()
    }

    #[test]
    fn test_camera_basis() {
        let camera = pinhole();
        assert_eq!(camera.origin(), Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(0);
        let center = camera.get_ray(0.5, 0.5, &mut rng).direction().normalize();
        assert!((center - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_corner_rays() {
        let camera = pinhole();
        let mut rng = StdRng::seed_from_u64(42);

        // vfov 90 => viewport height 2; aspect 2 => width 4
        let center = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((center.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        let lower_left = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((lower_left.direction() - Vec3::new(-2.0, -1.0, -1.0)).length() < 1e-5);

        let upper_right = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((upper_right.direction() - Vec3::new(2.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_pinhole_has_fixed_origin() {
        let camera = pinhole();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(camera.get_ray(0.3, 0.7, &mut rng).origin(), Vec3::ZERO);
        }
    }

    #[test]
    fn test_lens_jitter_stays_on_disk_and_focuses() {
        let camera = CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(40.0, 2.0, 5.0)
            .build(1.5)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let focus_point = camera.lower_left_corner + 0.25 * camera.horizontal + 0.6 * camera.vertical;
        let mut moved = false;
        for _ in 0..100 {
            let ray = camera.get_ray(0.25, 0.6, &mut rng);
            let offset = ray.origin() - camera.origin();
            assert!(offset.length() <= camera.lens_radius() + 1e-5);
            assert!(offset.z.abs() < 1e-6);
            moved |= offset.length() > 0.0;
            // Every ray passes through the same point on the focus plane
            assert!((ray.at(1.0) - focus_point).length() < 1e-4);
        }
        assert!(moved);
    }

    #[test]
    fn test_shutter_time() {
        let camera = CameraSettings::default()
            .with_shutter(1.0, 2.0)
            .build(1.5)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let time = camera.get_ray(0.5, 0.5, &mut rng).time();
            assert!((1.0..2.0).contains(&time));
        }

        let still = CameraSettings::default().build(1.5).unwrap();
        assert_eq!(still.get_ray(0.5, 0.5, &mut rng).time(), 0.0);
    }

    #[test]
    fn test_degenerate_settings_rejected() {
        let same_point = CameraSettings::default().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(same_point.build(1.0).is_err());

        let parallel_up = CameraSettings::default().with_position(Vec3::Y, Vec3::ZERO, Vec3::Y);
        assert!(parallel_up.build(1.0).is_err());

        assert!(CameraSettings::default().with_lens(0.0, 0.0, 1.0).build(1.0).is_err());
        assert!(CameraSettings::default().with_lens(20.0, -1.0, 1.0).build(1.0).is_err());
        assert!(CameraSettings::default().with_shutter(1.0, 0.5).build(1.0).is_err());
        assert!(CameraSettings::default().build(0.0).is_err());
    }
}
