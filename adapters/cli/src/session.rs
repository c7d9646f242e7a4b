//! Headless frame loop driving the world through every gameplay system.

use std::time::Duration;

use dungeon_crawler_core::{Command, Event, GameConfig};
use dungeon_crawler_system_loot::LootPickup;
use dungeon_crawler_system_movement::{self as movement, InputIntent, PlayerMovement, StepReport};
use dungeon_crawler_system_spawning::{self as spawning, Spawning};
use dungeon_crawler_system_steering::{ContactDamage, Steering};
use dungeon_crawler_system_visibility::{FrameOcclusion, OcclusionMask};
use dungeon_crawler_world::{self as world, query, Level, World};
use log::{debug, info, trace};

/// Frames spent turning after the player walks into a wall.
const TURN_FRAMES: u32 = 6;

/// Scripted stand-in for keyboard input.
///
/// Holds forward (or lets autorun jog), and swings left for a few frames
/// whenever the previous step was blocked.
#[derive(Clone, Copy, Debug)]
struct Autopilot {
    autorun: bool,
    turning: u32,
}

impl Autopilot {
    fn new(autorun: bool) -> Self {
        Self {
            autorun,
            turning: 0,
        }
    }

    fn intent(&mut self) -> InputIntent {
        if self.turning > 0 {
            self.turning -= 1;
            return InputIntent {
                turn_left: true,
                ..InputIntent::default()
            };
        }
        InputIntent {
            forward: !self.autorun,
            ..InputIntent::default()
        }
    }

    fn observe(&mut self, report: StepReport) {
        if !report.decision.is_allowed() {
            self.turning = TURN_FRAMES;
        }
    }
}

/// Running totals reported when the session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SessionStats {
    /// Frames stepped so far.
    pub(crate) frames: u32,
    /// Forward moves stopped by a wall.
    pub(crate) bumps: u32,
    /// Mobs that entered the dungeon.
    pub(crate) spawns: u32,
    /// Frames in which at least one mob hurt the player.
    pub(crate) hurt_frames: u32,
    /// Walls hidden by the most recent occlusion pass.
    pub(crate) hidden_walls: usize,
}

/// Owns the world and the systems, and steps them in frame order.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    frame: Duration,
    pickup: LootPickup,
    contact: ContactDamage,
    steering: Steering,
    movement: PlayerMovement,
    spawning: Spawning,
    occlusion: OcclusionMask,
    autopilot: Autopilot,
    stats: SessionStats,
}

impl Session {
    /// Creates a session for the level using a fixed frame duration.
    pub(crate) fn new(level: Level, config: &GameConfig, frame: Duration) -> Self {
        Self {
            world: World::new(level, config),
            frame,
            pickup: LootPickup::new(config.player_radius, config.loot_radius),
            contact: ContactDamage::new(config.player_radius, config.mob_radius, config.mob_damage),
            steering: Steering::new(config.mob_speed),
            movement: PlayerMovement::new(movement::Config::from_game(config)),
            spawning: Spawning::new(spawning::Config::from_game(config)),
            occlusion: OcclusionMask::new(config.occlusion_policy),
            autopilot: Autopilot::new(config.autorun),
            stats: SessionStats::default(),
        }
    }

    /// Advances the simulation by one frame and recomputes camera occlusion.
    pub(crate) fn step(&mut self) -> FrameOcclusion {
        let dt = self.frame;
        let mut events = Vec::new();
        let mut commands = vec![Command::Tick { dt }];
        dispatch(&mut self.world, &mut commands, &mut events);

        let player = query::player(&self.world).position;
        self.pickup
            .handle(player, &query::loot_view(&self.world), &mut commands);
        dispatch(&mut self.world, &mut commands, &mut events);

        self.contact
            .handle(player, &query::mob_view(&self.world), dt, &mut commands);
        dispatch(&mut self.world, &mut commands, &mut events);

        self.steering.handle(
            query::walls(&self.world),
            player,
            &query::mob_view(&self.world),
            dt,
            &mut commands,
        );
        dispatch(&mut self.world, &mut commands, &mut events);

        let intent = self.autopilot.intent();
        let report = self.movement.handle(
            query::grid(&self.world),
            query::player(&self.world),
            intent,
            dt,
            &mut commands,
        );
        self.autopilot.observe(report);
        if report.bumped() {
            self.stats.bumps += 1;
        }
        dispatch(&mut self.world, &mut commands, &mut events);

        self.spawning.handle(
            &events,
            query::grid(&self.world),
            query::mob_view(&self.world).len(),
            &mut commands,
        );
        dispatch(&mut self.world, &mut commands, &mut events);

        self.record(&events);

        let occlusion = self.occlusion.refresh(
            query::walls(&self.world),
            query::camera(&self.world).position,
            query::player(&self.world).position,
        );
        if !occlusion.occluders.is_empty() {
            trace!(
                "{} wall(s) between camera and player ({:?})",
                occlusion.occluders.len(),
                occlusion.policy
            );
        }
        self.stats.hidden_walls = occlusion.occluders.len();
        occlusion
    }

    /// Reports whether the player has run out of life.
    pub(crate) fn is_over(&self) -> bool {
        query::life(&self.world) <= 0.0
    }

    /// Read-only access to the simulated world.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn stats(&self) -> SessionStats {
        self.stats
    }

    fn record(&mut self, events: &[Event]) {
        self.stats.frames += 1;
        let mut hurt = false;
        for event in events {
            match event {
                Event::LootCollected { score, .. } => info!("picked up gold, {score} total"),
                Event::MobSpawned { mob, cell, .. } => {
                    self.stats.spawns += 1;
                    debug!("mob {} appeared at {:?}", mob.get(), cell);
                }
                Event::PlayerDamaged { life, .. } => {
                    hurt = true;
                    trace!("player hit, {life:.1} life left");
                }
                _ => {}
            }
        }
        if hurt {
            self.stats.hurt_frames += 1;
        }
    }
}

fn dispatch(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, events);
    }
}

/// Formats elapsed play time as minutes and zero-padded seconds.
pub(crate) fn format_stopwatch(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{}:{:02} secs", total / 60, total % 60)
}
