use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walkabout_assets::MapImage;
use walkabout_camera::{Camera, CameraLoop, CameraMode, FIXED_STEP, InputSnapshot, STEP_DISTANCE};
use walkabout_scene::build_cubicmap;
use walkabout_tools::CameraReport;

#[derive(Parser)]
#[command(name = "walkabout-cli", about = "CLI tool for walkabout operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info
    Info,
    /// Run the camera loop headless with synthetic frame deltas
    Simulate {
        /// Wall-clock seconds to simulate
        #[arg(short, long, default_value = "1.0")]
        seconds: f64,
        /// Synthetic render frame rate
        #[arg(short, long, default_value = "144.0")]
        fps: f64,
        /// Hold the forward key (the default when no axis flag is given)
        #[arg(long)]
        forward: bool,
        /// Hold the strafe-right key
        #[arg(long)]
        strafe: bool,
    },
    /// Load a map image and print its cubicmap mesh statistics
    Cubicmap {
        /// Path to the map image
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("walkabout-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", walkabout_common::crate_info());
            println!("camera: {}", walkabout_camera::crate_info());
            println!("input: {}", walkabout_input::crate_info());
            println!("assets: {}", walkabout_assets::crate_info());
            println!("scene: {}", walkabout_scene::crate_info());
            println!("tools: {}", walkabout_tools::crate_info());
            println!("console: {}", walkabout_console::crate_info());
        }
        Commands::Simulate {
            seconds,
            fps,
            forward,
            strafe,
        } => {
            anyhow::ensure!(seconds >= 0.0 && seconds.is_finite(), "bad --seconds");
            anyhow::ensure!(fps > 0.0 && fps.is_finite(), "bad --fps");

            println!("Headless simulation: {seconds} s at {fps} fps");

            let mut camera = Camera::default();
            let mut cam_loop = CameraLoop::new();
            let input = InputSnapshot {
                forward: forward || !strafe,
                right: strafe,
                ..InputSnapshot::default()
            };

            let start = camera.position;
            let frame_delta = 1.0 / fps;
            let frames = (seconds * fps).round() as u64;
            for _ in 0..frames {
                cam_loop.tick(&mut camera, frame_delta, &input);
            }

            let moved = (camera.position - start).length();
            let axes = u32::from(input.forward) + u32::from(input.right);
            let per_step = f64::from(STEP_DISTANCE) * f64::from(axes).sqrt();
            let expected_steps = (frames as f64 * frame_delta / FIXED_STEP).floor();
            println!("Frames: {frames}, accumulator: {:.6}", cam_loop.accumulator());
            println!(
                "Displacement: {moved:.3} units (expected {:.3})",
                expected_steps * per_step
            );
            println!("{}", CameraReport::capture(&camera, CameraMode::FirstPerson));
        }
        Commands::Cubicmap { path } => {
            let mut map = MapImage::load(&path)?;
            map.flip_vertical();

            let mesh = build_cubicmap(&map, glam::Vec3::ONE);
            println!("Map: {} ({}x{})", path.display(), map.width(), map.height());
            println!(
                "Cells: {} total, {} solid",
                map.width() * map.height(),
                map.solid_count()
            );
            println!(
                "Mesh: {} vertices, {} triangles",
                mesh.vertex_count(),
                mesh.triangle_count()
            );
        }
    }

    Ok(())
}
