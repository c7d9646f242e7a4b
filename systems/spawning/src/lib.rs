#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting mob spawn commands.

use std::time::Duration;

use dungeon_crawler_core::{Command, Event, GameConfig, Grid};
use log::debug;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_delay: Duration,
    max_active: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from the spawn cadence, mob cap, and seed.
    #[must_use]
    pub const fn new(spawn_delay: Duration, max_active: usize, rng_seed: u64) -> Self {
        Self {
            spawn_delay,
            max_active,
            rng_seed,
        }
    }

    /// Extracts the spawning parameters from the game configuration.
    #[must_use]
    pub fn from_game(config: &GameConfig) -> Self {
        Self::new(config.spawn_delay(), config.max_active_mobs, config.seed)
    }
}

/// Pure system that drops a mob on a random passable tile at a fixed cadence.
#[derive(Debug)]
pub struct Spawning {
    spawn_delay: Duration,
    max_active: usize,
    since_last_spawn: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_delay: config.spawn_delay,
            max_active: config.max_active,
            since_last_spawn: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes time events and emits at most one spawn command.
    ///
    /// While the dungeon is full the elapsed time is held at the delay, so a
    /// freed slot is refilled on the next tick without a burst of spawns.
    pub fn handle(
        &mut self,
        events: &[Event],
        grid: &Grid,
        active_mobs: usize,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.since_last_spawn = self.since_last_spawn.saturating_add(*dt);
            }
        }

        if self.since_last_spawn < self.spawn_delay {
            return;
        }

        if active_mobs >= self.max_active {
            self.since_last_spawn = self.spawn_delay;
            return;
        }

        let value: f64 = self.rng.gen();
        let Some(cell) = grid.random_passable_cell(value) else {
            return;
        };

        debug!("requesting mob spawn at {:?}", cell);
        self.since_last_spawn = Duration::ZERO;
        out.push(Command::SpawnMob { cell });
    }
}
