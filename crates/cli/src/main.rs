#![deny(unsafe_code)]
//! CLI binary for the ode-viz planar ODE visualizer.
//!
//! Subcommands:
//! - `render`: run the animation headlessly at a fixed frame rate, write PNG
//! - `trace`: integrate one seed point and print its polyline
//! - `list`: print available systems and field styles

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use ode_viz_core::{FieldStyle, Scene, SystemKind, Vector, Visualizer};
use ode_viz_raster::snapshot::write_png;
use ode_viz_raster::RasterSurface;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ode-viz", about = "Planar ODE vector field visualizer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Scene selection shared by every subcommand that builds a visualizer.
/// Flags override values read from `--scene`.
#[derive(Args)]
struct SceneArgs {
    /// Scene file (JSON). Missing keys take defaults.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// ODE system name (see `list`).
    #[arg(long)]
    system: Option<String>,

    /// System parameters as a JSON object.
    #[arg(long)]
    params: Option<String>,

    /// Field style (raw, normalize, cap).
    #[arg(long)]
    style: Option<String>,

    /// Canvas width in pixels.
    #[arg(short = 'W', long)]
    width: Option<f64>,

    /// Canvas height in pixels.
    #[arg(short = 'H', long)]
    height: Option<f64>,

    /// PRNG seed for random seed placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Trajectory step length in pixels.
    #[arg(long)]
    step_size: Option<f64>,

    /// Euler steps per trajectory per frame.
    #[arg(long)]
    iterations: Option<usize>,

    /// Seed points as a JSON array of `[x, y]` canvas positions.
    #[arg(long)]
    points: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the animation for N frames and write the last frame as PNG.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Number of animation frames to run after the initial frame.
        #[arg(short, long, default_value_t = 60)]
        frames: u32,

        /// Simulated frame rate.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Stop after the last frame and write the reset frame instead.
        #[arg(long)]
        stop: bool,

        /// Output file path.
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },
    /// Integrate a single seed point and print the visited positions.
    Trace {
        #[command(flatten)]
        scene: SceneArgs,

        /// Seed x in canvas pixels.
        #[arg(long)]
        x: f64,

        /// Seed y in canvas pixels.
        #[arg(long)]
        y: f64,

        /// Time the field is frozen at.
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,
    },
    /// List available systems and field styles.
    List,
}

fn parse_json_arg(flag: &'static str, text: &str) -> Result<Value, CliError> {
    serde_json::from_str(text).map_err(|source| CliError::FlagJson { flag, source })
}

/// Simulated time between frames at `fps`.
fn frame_interval(fps: f64) -> Result<Duration, CliError> {
    let invalid = |reason: String| CliError::FlagValue {
        flag: "fps",
        reason,
    };
    if !(fps.is_finite() && fps > 0.0) {
        return Err(invalid(format!("must be positive, got {fps}")));
    }
    Duration::try_from_secs_f64(1.0 / fps).map_err(|e| invalid(format!("{fps}: {e}")))
}

fn read_scene_file(path: &Path) -> Result<Map<String, Value>, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::SceneRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&text).map_err(|source| CliError::SceneParse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::SceneNotObject {
            path: path.to_path_buf(),
        }),
    }
}

fn load_scene(args: &SceneArgs) -> Result<Scene, CliError> {
    let mut obj = match &args.scene {
        Some(path) => read_scene_file(path)?,
        None => Map::new(),
    };

    if let Some(system) = &args.system {
        obj.insert("system".into(), json!(system));
    }
    if let Some(params) = &args.params {
        obj.insert("system_params".into(), parse_json_arg("params", params)?);
    }
    if let Some(style) = &args.style {
        obj.insert("style".into(), json!(style));
    }
    if let Some(width) = args.width {
        obj.insert("width".into(), json!(width));
    }
    if let Some(height) = args.height {
        obj.insert("height".into(), json!(height));
    }
    if let Some(seed) = args.seed {
        obj.insert("seed".into(), json!(seed));
    }
    if let Some(step) = args.step_size {
        obj.insert("step_size".into(), json!(step));
    }
    if let Some(n) = args.iterations {
        obj.insert("iteration_count".into(), json!(n));
    }
    if let Some(points) = &args.points {
        obj.insert("points".into(), parse_json_arg("points", points)?);
    }

    let scene = Scene::from_json(&Value::Object(obj))?;
    scene.validate()?;
    Ok(scene)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let systems = SystemKind::list_names();
            let styles = FieldStyle::list_names();
            if cli.json {
                let info = json!({
                    "systems": systems,
                    "styles": styles,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Systems:");
                for name in systems {
                    println!("  {name}");
                }
                println!("Styles:");
                println!("  {}", styles.join(", "));
            }
        }
        Command::Render {
            scene,
            frames,
            fps,
            stop,
            output,
        } => {
            let frame = frame_interval(fps)?;
            let scene = load_scene(&scene)?;
            let mut viz = Visualizer::from_scene(&scene)?;
            let mut surface = RasterSurface::new(
                scene.width.round() as usize,
                scene.height.round() as usize,
            )?;

            viz.init(&mut surface);
            if frames > 0 {
                viz.start(Duration::ZERO);
                for i in 1..=frames {
                    viz.tick(frame.saturating_mul(i), &mut surface);
                }
                if stop {
                    viz.stop(&mut surface);
                }
            }
            let status = viz.status_line();

            write_png(&surface, &output)?;

            if cli.json {
                let info = json!({
                    "system": scene.system,
                    "width": surface.width(),
                    "height": surface.height(),
                    "frames": frames,
                    "fps": fps,
                    "seed": scene.seed,
                    "t": viz.snapshot().time(),
                    "trajectories": viz.integrator().len(),
                    "status": status,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!("{status}");
                eprintln!(
                    "rendered {} ({}x{}, {frames} frames @ {fps} fps, seed {}) -> {}",
                    scene.system,
                    surface.width(),
                    surface.height(),
                    scene.seed,
                    output.display()
                );
            }
        }
        Command::Trace { scene, x, y, time } => {
            let origin = Vector::new(x, y);
            if !origin.is_finite() {
                return Err(CliError::FlagValue {
                    flag: "x/--y",
                    reason: "seed position must be finite".into(),
                });
            }
            let scene = load_scene(&scene)?;
            let viz = Visualizer::from_scene(&scene)?;
            let (trace, _) = viz.integrator().trace(origin, viz.system(), time);

            if cli.json {
                let info = json!({
                    "system": scene.system,
                    "t": time,
                    "origin": trace.origin,
                    "exited": trace.exited,
                    "segments": trace.segments(),
                    "path": trace.path,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for p in &trace.path {
                    println!("{:.3} {:.3}", p.x, p.y);
                }
                eprintln!(
                    "traced {} from ({x}, {y}) at t = {time}: {} segments{}",
                    scene.system,
                    trace.segments(),
                    if trace.exited { ", left canvas" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
