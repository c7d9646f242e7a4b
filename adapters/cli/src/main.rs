#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a dungeon level headlessly.

mod files;
mod logging;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use dungeon_crawler_world::{query, Level};
use log::info;

use crate::session::{format_stopwatch, Session};

/// Walks a dungeon level with scripted input and reports the outcome.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level description in TOML. Defaults to the built-in first level.
    #[arg(long)]
    level: Option<PathBuf>,
    /// Game configuration in TOML. Missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Duration of one frame in milliseconds.
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,
    /// Overrides the spawn RNG seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Jog forward without holding the forward key.
    #[arg(long)]
    autorun: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the dungeon crawler command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    if args.frame_ms == 0 {
        bail!("--frame-ms must be greater than zero");
    }

    let mut config = files::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.autorun |= args.autorun;

    let descriptor = files::load_level(args.level.as_deref())?;
    let level = Level::from_descriptor(&descriptor)
        .with_context(|| format!("level `{}` cannot be played", descriptor.name))?;

    info!("entering {} ({} walls)", level.name(), level.walls().len());
    let mut session = Session::new(level, &config, Duration::from_millis(args.frame_ms));
    for _ in 0..args.frames {
        let _ = session.step();
        if session.is_over() {
            info!("the player has fallen");
            break;
        }
    }

    print_summary(&session);
    Ok(())
}

fn print_summary(session: &Session) {
    let world = session.world();
    let stats = session.stats();
    let health = 100.0 * query::life(world) / query::max_health(world);

    println!("{}", query::level(world).name());
    println!("{} gold", query::score(world));
    println!("{health:.0}% health");
    println!("{}", format_stopwatch(query::elapsed(world)));
    println!(
        "{} frames, {} bumps, {} mobs spawned, {} frames under attack, {} walls hidden",
        stats.frames, stats.bumps, stats.spawns, stats.hurt_frames, stats.hidden_walls
    );
}
