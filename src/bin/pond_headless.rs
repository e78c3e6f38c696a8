//! Runs the pond without a window and prints the final statistics as JSON.
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Parser;
use glam::Vec2;
use log::{debug, info, trace};
use pond::{
    init_logging, pointer_click, run_frame, AgentPose, FrameRenderer, FrameSnapshot,
    PerspectiveProjector, Pond, PondConfig, PondStats,
};
use serde::Serialize;

/// Screen positions, as fractions of the viewport, cycled through for drops.
const DROP_PATTERN: [[f32; 2]; 4] = [[0.5, 0.5], [0.3, 0.4], [0.7, 0.6], [0.55, 0.3]];

/// Headless pond runner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// TOML file overriding the scene tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the scene's random source
    #[arg(short, long)]
    seed: Option<u64>,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Drop food every N frames; 0 disables drops
    #[arg(long, default_value_t = 120)]
    drop_every: u32,
    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

/// Logs each rendered frame instead of drawing it.
#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl FrameRenderer for LogRenderer {
    fn render(&mut self, snapshot: &FrameSnapshot) {
        self.frames += 1;
        trace!(
            "frame {}: fish at {:?}, {} pellets",
            self.frames,
            snapshot.agent.position,
            snapshot.food.len()
        );
    }
}

#[derive(Serialize)]
struct Summary {
    seed: Option<u64>,
    frames_rendered: u64,
    elapsed_seconds: f32,
    feed_count: u64,
    live_pellets: usize,
    agent: AgentPose,
    stats: PondStats,
}

fn drop_point(frame: u32, drop_every: u32, viewport: Vec2) -> Option<Vec2> {
    if drop_every == 0 || frame % drop_every != 0 {
        return None;
    }
    let index = (frame / drop_every) as usize % DROP_PATTERN.len();
    DROP_PATTERN
        .get(index)
        .map(|fraction| Vec2::from_array(*fraction) * viewport)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        args.fps > 0.0 && args.fps.is_finite(),
        "--fps must be positive, got {}",
        args.fps
    );

    let config = PondConfig::resolve(args.config.as_deref(), args.seed)
        .context("loading scene configuration")?;
    let viewport = Vec2::new(args.width, args.height);
    let projector = PerspectiveProjector::from_config(&config, viewport)
        .context("camera settings do not describe a usable perspective camera")?;
    let seed = config.seed;
    let mut pond = Pond::new(config).context("building the pond")?;
    let mut renderer = LogRenderer::default();
    let dt = args.fps.recip();

    info!("simulating {} frames at {} fps", args.frames, args.fps);
    for frame in 0..args.frames {
        if let Some(screen) = drop_point(frame, args.drop_every, viewport) {
            match pointer_click(&mut pond, &projector, screen) {
                Some(added) => debug!("frame {frame}: dropped {added} pellets"),
                None => debug!("frame {frame}: drop at {screen:?} missed the plane"),
            }
        }
        run_frame(&mut pond, dt, &mut renderer);
    }

    let summary = Summary {
        seed,
        frames_rendered: renderer.frames,
        elapsed_seconds: pond.elapsed(),
        feed_count: pond.feed_count(),
        live_pellets: pond.food().len(),
        agent: pond.snapshot().agent,
        stats: *pond.stats(),
    };
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &summary).context("writing summary")?;
    writeln!(stdout).context("writing summary")?;
    Ok(())
}
