use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glint::camera::Camera;
use glint::output::{display_preview, PpmFormat, PreviewMode};
use glint::presets::ScenePreset;
use glint::renderer::{init_thread_pool, RenderConfig, Renderer};
use log::{info, LevelFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// glint: render sphere scenes with Monte Carlo path tracing
#[derive(Parser, Debug)]
#[command(
    name = "glint",
    version,
    about = "A Monte Carlo path tracer for diffuse, metal and glass spheres",
    after_help = "EXAMPLES:\n  \
                  glint --scene materials --output materials.ppm\n  \
                  glint --scene showcase --width 1200 --spp 500 --format binary -o cover.ppm\n  \
                  glint --scene normals --width 120 --spp 4 --preview halfblock\n  \
                  glint --scene diffuse --seed 7 --serial > diffuse.ppm"
)]
struct Cli {
    /// Scene preset to render
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Materials)]
    scene: ScenePreset,

    /// Image width in pixels
    #[arg(short = 'W', long, default_value_t = 400)]
    width: u32,

    /// Image height in pixels [default: width divided by the scene's aspect ratio]
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Samples per pixel. Noise falls off with the square root of this.
    #[arg(long, default_value_t = 100)]
    spp: u32,

    /// Maximum number of surface interactions per camera ray
    #[arg(long, default_value_t = 50)]
    max_depth: u32,

    /// Seed for reproducible renders. Drawn from entropy when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for rendering (0 = one per core)
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Render on the calling thread only
    #[arg(long)]
    serial: bool,

    /// Write the image to this PPM file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PPM encoding
    #[arg(short, long, value_enum, default_value_t = PpmFormat::Ascii)]
    format: PpmFormat,

    /// Also draw the image in the terminal
    #[arg(short, long, value_enum)]
    preview: Option<PreviewMode>,

    /// Hide the scanline countdown on stderr
    #[arg(long)]
    no_progress: bool,

    /// Log verbosity; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level.into());
    init_thread_pool(cli.threads).context("could not configure worker threads")?;

    let scene = cli
        .scene
        .build()
        .with_context(|| format!("could not build scene {:?}", cli.scene))?;

    let width = cli.width;
    let height = cli
        .height
        .unwrap_or_else(|| (width as f64 / scene.camera.aspect_ratio).round() as u32);

    // The image shape wins over the preset's nominal aspect ratio.
    let mut camera_config = scene.camera.clone();
    camera_config.aspect_ratio = width as f64 / height.max(1) as f64;
    let camera = Camera::new(&camera_config).context("invalid camera")?;

    let config = RenderConfig {
        width,
        height,
        samples_per_pixel: cli.spp,
        max_depth: cli.max_depth,
        seed: cli.seed,
        parallel: !cli.serial,
        progress: !cli.no_progress,
    };
    info!(
        "scene {} ({} objects), {width}x{height}, {} spp, depth {}",
        scene.name,
        scene.world.len(),
        config.samples_per_pixel,
        config.max_depth
    );

    let renderer = Renderer {
        world: &scene.world,
        camera: &camera,
        integrator: scene.integrator,
        config: &config,
    };
    let (framebuffer, _stats) = renderer.render().context("render failed")?;

    if let Some(mode) = cli.preview {
        display_preview(&framebuffer, mode).context("could not draw preview")?;
    }

    match &cli.output {
        Some(path) => {
            framebuffer
                .save(path, cli.format)
                .with_context(|| format!("could not save {}", path.display()))?;
            info!("saved {}", path.display());
        }
        None if cli.preview.is_none() => {
            framebuffer
                .write_ppm(io::stdout().lock(), cli.format)
                .context("could not write image to stdout")?;
        }
        None => {}
    }

    Ok(())
}
