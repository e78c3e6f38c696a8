//! Windowed pond: click to feed the fish, WASD or arrow keys to orbit.
use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use pond::{init_logging, PondConfig, PondPlugin, PresentationPlugin};

/// An interactive fish-feeding pond
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
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = PondConfig::resolve(args.config.as_deref(), args.seed)
        .context("loading scene configuration")?;

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .build()
            .disable::<LogPlugin>()
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Pond View".into(),
                    ..default()
                }),
                ..default()
            }),
    )
    .add_plugins((PondPlugin::new(config), PresentationPlugin));
    #[cfg(feature = "text")]
    app.add_plugins(pond::HudPlugin);
    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("pond exited with code {code}"),
    }
}
