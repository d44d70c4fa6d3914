//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing via jittered multi-sampling
//! - One pinned worker thread per image tile

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FrameBuffer;
use crate::progress::Progress;
use crate::random::gen_f32;
use crate::scene::Scene;
use crate::tile::{render_tile, TileGrid};
use rand::RngCore;
use std::num::NonZeroUsize;
use std::thread;
use std::time::{Duration, Instant};
use tessera_math::{Color, Interval, Ray};

/// Closest hit distance accepted, to avoid self-intersection ("shadow acne").
pub const T_MIN: f32 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and attenuating color per bounce.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = scene.hit(ray, Interval::from_min(T_MIN)) else {
        return sky_gradient(ray);
    };

    match scene.material(rec.material).scatter(ray, &rec, rng) {
        Some(scatter) => {
            scatter.attenuation * ray_color(&scatter.scattered, scene, depth - 1, rng)
        }
        // Ray was absorbed
        None => Color::ZERO,
    }
}

/// Vertical white-to-blue sky for rays that leave the scene.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Sum `samples_per_pixel` jittered radiance samples for pixel (x, y).
///
/// `y` counts from the bottom of the image. The sum is not averaged.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.image_width as f32;
    let height = config.image_height() as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (y as f32 + gen_f32(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, rng);
    }

    pixel_color
}

/// Number of workers to run: the override if given, else the hardware's
/// available parallelism.
pub fn detect_parallelism(requested: Option<NonZeroUsize>) -> RenderResult<NonZeroUsize> {
    match requested {
        Some(n) => Ok(n),
        None => thread::available_parallelism().map_err(RenderError::ParallelismUnavailable),
    }
}

/// Timing and layout of a finished render.
#[derive(Debug, Clone, Copy)]
pub struct RenderStats {
    /// Number of tiles, which is also the number of workers
    pub tiles: usize,
    /// Wall-clock time from first launch to last join
    pub wall_time: Duration,
    /// Sum of the time each worker spent rendering
    pub worker_time: Duration,
}

/// Result of rendering a frame.
#[derive(Debug)]
pub struct RenderOutput {
    /// Raw per-pixel sample sums
    pub frame: FrameBuffer,
    pub stats: RenderStats,
}

/// Render the scene with one worker thread per tile.
///
/// Fatal setup problems (bad config, undetectable parallelism, frame
/// buffer allocation) are reported before any worker starts.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> RenderResult<RenderOutput> {
    config.validate()?;
    let width = config.image_width;
    let height = config.image_height();

    let parallelism = detect_parallelism(config.threads)?;
    let mut frame = FrameBuffer::new(width, height)?;
    let grid = TileGrid::new(width, height, parallelism);

    log::info!(
        "Start to render the image in tiles of dim height: {} width: {} image height: {} image width: {}",
        grid.tile_height(),
        grid.tile_width(),
        height,
        width
    );
    log::debug!(
        "Camera at {} with lens radius {}",
        camera.origin(),
        camera.lens_radius()
    );

    let core_ids = if config.pin_threads {
        let ids = core_affinity::get_core_ids().unwrap_or_default();
        if ids.is_empty() {
            log::warn!("Unable to list CPU cores; workers will run unpinned");
        }
        ids
    } else {
        Vec::new()
    };

    let total_segments = grid.tiles().iter().map(|t| t.height as usize).sum();
    let progress = Progress::new(total_segments, grid.columns());
    let tile_count = grid.len();

    log::info!("Launching {tile_count} render threads");
    let start = Instant::now();

    let worker_time = thread::scope(|s| -> RenderResult<Duration> {
        let mut handles = Vec::with_capacity(tile_count);
        let mut spawn_error = None;

        for mut view in frame.tile_views(&grid) {
            let tile = view.tile();
            let core = (!core_ids.is_empty()).then(|| core_ids[tile.index % core_ids.len()]);
            let progress = &progress;

            let spawned = thread::Builder::new()
                .name(format!("tessera-tile-{}", tile.index))
                .spawn_scoped(s, move || {
                    let busy = Instant::now();
                    if let Some(core) = core {
                        pin_to_core(tile.index, core);
                    }
                    render_tile(&mut view, scene, camera, config, progress);
                    busy.elapsed()
                });

            match spawned {
                Ok(handle) => handles.push((tile.index, handle)),
                Err(err) => {
                    spawn_error = Some(RenderError::WorkerSpawn(err));
                    break;
                }
            }
        }

        // Join every worker that did start before reporting anything
        let mut total = Duration::ZERO;
        let mut panicked = None;
        for (tile, handle) in handles {
            match handle.join() {
                Ok(busy) => total += busy,
                Err(_) => {
                    log::error!("Render worker for tile {tile} panicked");
                    panicked.get_or_insert(RenderError::WorkerPanicked { tile });
                }
            }
        }

        match spawn_error.or(panicked) {
            Some(err) => Err(err),
            None => Ok(total),
        }
    })?;

    let wall_time = start.elapsed();
    log::debug!(
        "{} of {} tile rows finished",
        progress.completed(),
        total_segments
    );
    log::info!(
        "Rendering complete. Worker time used: {:.1} ms. Wall clock time passed: {:.1} ms",
        worker_time.as_secs_f64() * 1000.0,
        wall_time.as_secs_f64() * 1000.0
    );

    Ok(RenderOutput {
        frame,
        stats: RenderStats {
            tiles: tile_count,
            wall_time,
            worker_time,
        },
    })
}

/// Pin the current thread to `core`, logging instead of failing.
fn pin_to_core(tile: usize, core: core_affinity::CoreId) {
    if core_affinity::set_for_current(core) {
        log::debug!("Tile {tile} pinned to core {}", core.id);
    } else {
        log::warn!(
            "Error setting affinity for tile {tile} and core {}; continuing unpinned",
            core.id
        );
    }
}
