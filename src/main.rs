use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use log::{info, warn, error, debug, trace};

// Define modules used by main
mod input;
mod render;
mod simulation;

use platformer_common::{FrameSnapshot, PlatformerConfig, Vector2};
use render::TextRenderer;
use simulation::FrameLoop;

/// Command-line arguments for the headless frame loop
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of frames to simulate (overrides [timing] frames)
    #[arg(long)]
    frames: Option<u64>,

    /// Output format for recorded frames: json, bincode or messagepack (overrides [output] format)
    #[arg(long)]
    format: Option<String>,

    /// Print the per-frame text line to stdout
    #[arg(long)]
    echo: bool,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting platformer frame loop...");
    run_with_args(Args::parse())
}

fn run_with_args(args: Args) -> Result<()> {
    // --- Load Configuration ---
    let mut config = PlatformerConfig::load(&args.config)?;
    if let Some(frames) = args.frames {
        config.timing.frames = frames;
    }
    if args.format.is_some() {
        config.output.format = args.format.clone();
    }
    let echo = args.echo || config.output.echo_text;

    let mut sim = FrameLoop::new(config);
    debug!("World parameters: {:#?}", sim.params());

    let total_frames = sim.config.timing.frames;
    info!(
        "Simulating {} frames ({:.2} s at {} fps), recording every {} frames.",
        total_frames,
        total_frames as f64 * sim.params().dt,
        sim.config.timing.frame_rate,
        sim.config.timing.record_interval_frames
    );

    let renderer = echo.then(|| TextRenderer::new(io::stdout().lock()));
    let start_time = Instant::now();
    run_frames(&mut sim, total_frames, renderer)?;

    info!("Frame loop finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());

    // --- Save Recorded Data ---
    let output = &sim.config.output;
    if output.save_frames {
        let format = output.format.as_deref().unwrap_or("json");
        let path = save_snapshots(sim.recorded_snapshots(), &output.base_filename, format)?;
        info!("{} snapshots saved to {}", sim.recorded_snapshots().len(), path.display());
    } else {
        info!("Skipping saving frames as per config (save_frames is false).");
    }

    if output.save_final_position {
        let filename = format!("{}_final_position.csv", output.base_filename);
        save_final_position(sim.position(), &filename)?;
        info!("Final position saved to {}", filename);
    } else {
        info!("Skipping saving final position as per config.");
    }

    info!("Done.");
    Ok(())
}

/// Steps `sim` for `total_frames` frames, recording snapshots on the configured
/// cadence and on the last frame. Each frame's label goes to `renderer` if given.
fn run_frames<W: Write>(
    sim: &mut FrameLoop,
    total_frames: u64,
    mut renderer: Option<TextRenderer<W>>,
) -> Result<()> {
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    // --- Initial Snapshot (frame 0) ---
    sim.record_snapshot();

    for step in 0..total_frames {
        let step_start_time = Instant::now();
        let frame = sim.frame();
        if let Err(e) = sim.step() {
            error!("Error during frame {}: {}", frame, e);
            return Err(e.context(format!("Frame loop failed at frame {}", frame)));
        }
        let step_duration = step_start_time.elapsed();

        // The label was drawn during `frame`, before the body moved.
        if let Some(renderer) = renderer.as_mut() {
            renderer
                .render(frame, sim.label(), sim.label_anchor())
                .context("Failed to write frame text")?;
        }

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_last_step = step + 1 == total_frames;

        if sim.should_record() || is_last_step {
            sim.record_snapshot();
        }

        if should_print_status || is_last_step {
            info!(
                "Frame [{}/{}] ({:.2} s) | Position: {} | Velocity: {} | Elapsed: {:.2} s",
                sim.frame(),
                total_frames,
                sim.params().elapsed_secs(),
                sim.position(),
                sim.velocity(),
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        } else {
            trace!("Frame [{}/{}] completed in {:.3} ms", sim.frame(), total_frames, step_duration.as_secs_f64() * 1000.0);
        }
    }

    Ok(())
}

/// Writes all snapshots to `<base>_frames.<ext>` in the requested format.
/// Unknown formats fall back to JSON.
fn save_snapshots(snapshots: &[FrameSnapshot], base_filename: &str, format: &str) -> Result<PathBuf> {
    let format = match format {
        "json" | "bincode" | "messagepack" => format,
        other => {
            error!("Unknown output format: {}. Using JSON instead.", other);
            "json"
        }
    };
    let extension = match format {
        "bincode" => "bin",
        "messagepack" => "msgpack",
        _ => "json",
    };
    let path = PathBuf::from(format!("{}_frames.{}", base_filename, extension));
    let mut file = File::create(&path)
        .with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;

    match format {
        "bincode" => bincode::serialize_into(&mut file, snapshots)
            .context("Error serializing snapshots to bincode")?,
        "messagepack" => rmp_serde::encode::write(&mut file, snapshots)
            .context("Error serializing snapshots to MessagePack")?,
        _ => {
            let json_string = serde_json::to_string(snapshots).context("Error serializing snapshots to JSON")?;
            file.write_all(json_string.as_bytes())
                .with_context(|| format!("Error writing snapshot JSON to file '{}'", path.display()))?;
        }
    }
    Ok(path)
}

fn save_final_position(position: Vector2, filename: &str) -> Result<()> {
    if !position.is_not_nan() {
        warn!("Final position {} is not a number.", position);
    }
    let mut writer = csv::Writer::from_path(filename)
        .with_context(|| format!("Error saving CSV file '{}'", filename))?;
    writer.write_record(["x", "y"])?;
    let (x, y): (f64, f64) = position.into();
    writer.write_record(&[format!("{:.4}", x), format!("{:.4}", y)])?;
    writer.flush()?;
    Ok(())
}
