/// Lumen Terminal Demo - lit scene of cubes, spheres and a platform
///
/// Controls:
///   - WASD / Space / C: Move the camera
///   - Arrow Keys: Look around
///   - F / P: Toggle spot / point light following the camera
///   - [ / ]: Narrow / widen the spot light cone
///   - Q/ESC: Quit
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use lumen_core::setup::{build_default_scene, build_model_scene, SceneAssets};
use lumen_terminal::{AppConfig, TerminalApp};

#[derive(Parser, Debug)]
#[command(version, about = "Interactive terminal scene renderer")]
pub struct Args {
    #[arg(long, default_value = "assets")]
    /// Directory holding `models/cube.obj`, `models/sphere.obj` and `models/plane.obj`
    assets: PathBuf,

    #[arg(long)]
    /// View a single mesh file instead of the default scene
    model: Option<PathBuf>,

    #[arg(long, default_value_t = 30)]
    /// Target frames per second
    fps: u32,

    #[arg(long)]
    /// Write log output here instead of stderr
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let (scene, config) = match &args.model {
        Some(path) => (
            build_model_scene(path).with_context(|| format!("failed to load {}", path.display()))?,
            AppConfig {
                target_fps: args.fps,
                camera_position: nalgebra::Point3::new(0.0, 0.0, 3.0),
                follow_spot: true,
            },
        ),
        None => (
            build_default_scene(&SceneAssets::in_dir(&args.assets)).context("failed to set up the scene")?,
            AppConfig {
                target_fps: args.fps,
                ..AppConfig::default()
            },
        ),
    };

    info!("Starting terminal renderer (press Q to quit)");
    let mut app = TerminalApp::new(scene, config)?;
    app.run()?;

    info!("Application finished");
    Ok(())
}
