/// Example: Load and render a mesh file in the terminal
///
/// Usage: cargo run --example view_obj -- path/to/file.obj
use std::env;

use anyhow::{Context, Result};
use lumen_core::setup::build_model_scene;
use lumen_terminal::{AppConfig, TerminalApp};
use nalgebra::Point3;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/models/sphere.obj".to_string());

    println!("Loading mesh file: {}", path);
    let scene = build_model_scene(&path).with_context(|| format!("failed to load {}", path))?;
    if let Some(geometry) = scene.objects().first().and_then(|object| scene.geometry(object.geometry)) {
        println!(
            "Loaded {} vertices, {} triangles",
            geometry.vertices().len(),
            geometry.triangle_count()
        );
    }

    let config = AppConfig {
        camera_position: Point3::new(0.0, 0.0, 3.0),
        follow_spot: true,
        ..AppConfig::default()
    };

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, config)?;
    app.run()?;

    println!("Thank you for using the Lumen terminal renderer!");
    Ok(())
}
