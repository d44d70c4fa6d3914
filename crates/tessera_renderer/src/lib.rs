//! Tessera - tiled CPU path tracing
//!
//! A Monte Carlo path tracer that splits the image into one tile per
//! hardware thread, renders every tile on its own pinned worker and
//! reduces the accumulated samples into an 8-bit image.
//!
//! # Example
//!
//! ```ignore
//! use tessera_renderer::{ppm, render, scenes, RenderConfig};
//!
//! let config = RenderConfig::default();
//! let scene = scenes::build(config.scene)?;
//! let camera = config.camera.build(config.aspect_ratio)?;
//!
//! let output = render(&scene, &camera, &config)?;
//! let image = output.frame.resolve(config.samples_per_pixel);
//! ppm::write(std::io::stdout().lock(), &image)?;
//! ```

mod camera;
mod config;
mod error;
mod framebuffer;
mod hittable;
mod material;
mod progress;
mod random;
mod renderer;
mod scene;
mod sphere;
mod texture;
mod tile;

pub mod ppm;
pub mod scenes;

pub use camera::{Camera, CameraSettings};
pub use config::{RenderConfig, SceneKind};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{color_to_rgb, linear_to_gamma, FrameBuffer, TileView};
pub use hittable::{HitRecord, MaterialId};
pub use material::{Material, Scatter};
pub use progress::Progress;
pub use renderer::{
    detect_parallelism, ray_color, render, render_pixel, sky_gradient, RenderOutput, RenderStats,
    T_MIN,
};
pub use scene::Scene;
pub use sphere::{Primitive, Sphere};
pub use texture::Texture;
pub use tile::{closest_factors, render_tile, Tile, TileGrid};

/// Re-export Vec3 and common math types from tessera_math
pub use tessera_math::{Color, Interval, Ray, Vec3};
