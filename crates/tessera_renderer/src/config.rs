//! Render configuration.
//!
//! Everything a render needs is injected through [`RenderConfig`], which
//! the binary builds from defaults or a JSON file.

use crate::camera::CameraSettings;
use crate::error::{RenderError, RenderResult};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Which built-in scene to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneKind {
    /// Large field of small random spheres around three big ones.
    Random {
        #[serde(default)]
        seed: u64,
        #[serde(default)]
        checkered_ground: bool,
    },
    /// Ground, diffuse center, hollow glass left, metal right.
    ThreeSpheres,
    /// A single ground sphere.
    Ground,
}

impl Default for SceneKind {
    fn default() -> Self {
        Self::Random {
            seed: 0,
            checkered_ground: false,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width divided by height
    pub aspect_ratio: f32,
    /// Image width in pixels; height is derived from the aspect ratio
    pub image_width: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed for per-pixel sample sequences
    pub seed: u64,
    /// Worker count override; detected from the hardware when unset
    pub threads: Option<NonZeroUsize>,
    /// Pin each worker to its own core (best effort)
    pub pin_threads: bool,
    pub camera: CameraSettings,
    pub scene: SceneKind,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 3.0 / 2.0,
            image_width: 200,
            samples_per_pixel: 10,
            max_depth: 50,
            seed: 0,
            threads: None,
            pin_threads: true,
            camera: CameraSettings::default(),
            scene: SceneKind::default(),
        }
    }
}

impl RenderConfig {
    /// Image height in pixels.
    pub fn image_height(&self) -> u32 {
        (self.image_width as f32 / self.aspect_ratio) as u32
    }

    /// Check that the configuration describes a renderable image.
    pub fn validate(&self) -> RenderResult<()> {
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(RenderError::invalid(format!(
                "aspect ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.image_width == 0 {
            return Err(RenderError::invalid("image width must be at least 1"));
        }
        if self.image_height() == 0 {
            return Err(RenderError::invalid(format!(
                "image width {} with aspect ratio {} gives zero height",
                self.image_width, self.aspect_ratio
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::invalid("samples per pixel must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_math::Vec3;

    #[test]
    fn test_default_matches_reference_setup() {
        let config = RenderConfig::default();
        assert_eq!(config.image_width, 200);
        assert_eq!(config.image_height(), 133);
        assert_eq!(config.max_depth, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_images() {
        let zero_width = RenderConfig {
            image_width: 0,
            ..Default::default()
        };
        assert!(matches!(zero_width.validate(), Err(RenderError::InvalidConfig(_))));

        let zero_height = RenderConfig {
            image_width: 2,
            aspect_ratio: 4.0,
            ..Default::default()
        };
        assert!(zero_height.validate().is_err());

        let no_samples = RenderConfig {
            samples_per_pixel: 0,
            ..Default::default()
        };
        assert!(no_samples.validate().is_err());

        let bad_aspect = RenderConfig {
            aspect_ratio: f32::NAN,
            ..Default::default()
        };
        assert!(bad_aspect.validate().is_err());
    }

    #[test]
    fn test_json_overrides_defaults() {
        let json = r#"{
            "image_width": 64,
            "aspect_ratio": 1.0,
            "threads": 3,
            "camera": { "look_from": [0.0, 1.0, 5.0], "vfov": 45.0 },
            "scene": { "kind": "three_spheres" }
        }"#;

        let config: RenderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.image_width, 64);
        assert_eq!(config.image_height(), 64);
        assert_eq!(config.threads, NonZeroUsize::new(3));
        assert_eq!(config.samples_per_pixel, 10);
        assert_eq!(config.camera.look_from, Vec3::new(0.0, 1.0, 5.0));
        assert_eq!(config.camera.vfov, 45.0);
        assert_eq!(config.camera.focus_dist, 10.0);
        assert_eq!(config.scene, SceneKind::ThreeSpheres);
    }

    #[test]
    fn test_random_scene_fields_default() {
        let kind: SceneKind =
            serde_json::from_str(r#"{ "kind": "random", "checkered_ground": true }"#).unwrap();
        assert_eq!(
            kind,
            SceneKind::Random {
                seed: 0,
                checkered_ground: true
            }
        );
    }
}
