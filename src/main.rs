//! Headless cubik driver.
//!
//! Builds a cube, runs notation moves through the animated pipeline on a
//! simulated clock and prints the resulting saved state as JSON.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use cubik::animation::ManualClock;
use cubik::cube::CubeState;
use cubik::engine::CubeEngine;
use cubik::error::CubikError;
use cubik::moves::{Move, MoveRequest};
use cubik::options::Options;

#[derive(Parser)]
#[command(name = "cubik", version, about = "Animated N×N×N cube simulation")]
struct Cli {
    /// Moves to apply, e.g. `y2+ x0- z1+2`.
    moves: Vec<String>,
    /// Cube size (overrides the options file).
    #[arg(long)]
    size: Option<usize>,
    /// TOML options file.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Saved state (JSON) to start from.
    #[arg(long)]
    load: Option<PathBuf>,
    /// Apply moves without animating them.
    #[arg(long)]
    instant: bool,
    /// Simulated frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Print the options JSON schema and exit.
    #[arg(long)]
    schema: bool,
}

fn main() -> Result<(), CubikError> {
    env_logger::init();
    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();

    if cli.schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())?;
        writeln!(out, "{schema}")?;
        return Ok(());
    }

    let mut options = match &cli.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(size) = cli.size {
        options.cube.size = size;
    }

    let clock = ManualClock::new();
    let mut engine = CubeEngine::with_clock(options, clock.clone())?;
    engine.on_move_completed(|done, cube| {
        log::info!(
            "move {} {} ({})",
            done.sequence,
            done.mv,
            if cube.is_solved() { "solved" } else { "scrambled" }
        );
    });

    if let Some(path) = &cli.load {
        let state: CubeState =
            serde_json::from_str(&std::fs::read_to_string(path)?)?;
        engine.load_from_data(&state)?;
    }

    let moves = Move::parse_sequence(&cli.moves.join(" "))?;
    for mv in moves {
        engine.request(MoveRequest {
            mv,
            animated: !cli.instant,
        })?;
    }

    let frame_ms = 1000.0 / f64::from(cli.fps.max(1));
    let mut frames = 0_u64;
    while engine.scheduler().is_running() {
        clock.advance_ms(frame_ms);
        frames += 1;
        if !engine.frame() {
            break;
        }
    }
    log::info!(
        "settled after {frames} frames ({:.0} ms simulated)",
        frames as f64 * frame_ms
    );

    let state = serde_json::to_string_pretty(&engine.serialize_state()?)?;
    writeln!(out, "{state}")?;
    Ok(())
}
