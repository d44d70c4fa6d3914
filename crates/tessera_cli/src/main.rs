//! tessera [CONFIG.json] [OUTPUT]
//!
//! Renders the configured scene. Without a config file the built-in
//! defaults are used. Without an output path the image is written to
//! stdout as plain PPM; a `.png` output path is saved as PNG.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tessera_renderer::{ppm, render, scenes, RenderConfig};

/// Command line arguments, both positional.
struct Args {
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = std::env::args_os().skip(1);
        let config = args.next().map(PathBuf::from);
        let output = args.next().map(PathBuf::from);
        if let Some(extra) = args.next() {
            bail!(
                "unexpected argument {:?}\nusage: tessera [CONFIG.json] [OUTPUT]",
                extra
            );
        }
        Ok(Self { config, output })
    }
}

fn load_config(path: Option<&Path>) -> Result<RenderConfig> {
    let Some(path) = path else {
        log::info!("No config file given, using defaults");
        return Ok(RenderConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with PPM on stdout
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse()?;
    let config = load_config(args.config.as_deref())?;
    config.validate()?;

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        config.image_width,
        config.image_height(),
        config.samples_per_pixel,
        config.max_depth
    );

    let scene = scenes::build(config.scene)?;
    let camera = config.camera.build(config.aspect_ratio)?;

    let output = render(&scene, &camera, &config)?;
    let image = output.frame.resolve(config.samples_per_pixel);

    match args.output {
        Some(path) if is_png(&path) => {
            image
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            log::info!("Saved image to {}", path.display());
        }
        Some(path) => {
            ppm::save(&path, &image).with_context(|| format!("Failed to save {}", path.display()))?;
            log::info!("Saved image to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            ppm::write(stdout.lock(), &image).context("Failed to write image to stdout")?;
        }
    }

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
