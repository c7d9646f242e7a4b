#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the dungeon crawler.

use std::{f32::consts::PI, time::Duration};

use dungeon_crawler_core::{
    CellCoord, Command, Event, GameConfig, Grid, LevelDescriptor, LevelError, LootId, MobId, Pose,
};
use dungeon_crawler_system_loot::plan_loot_placement;
use glam::{Quat, Vec3};
use log::debug;

pub mod levels;
pub mod walls;

pub use walls::{Aabb, Wall, WallAxis, WallSet, WALL_HEIGHT, WALL_THICKNESS};

/// Height above the floor at which characters stand.
pub const ACTOR_HEIGHT: f32 = 1.0;

/// Immutable level data: the passability grid and the walls derived from it.
#[derive(Clone, Debug)]
pub struct Level {
    name: String,
    grid: Grid,
    walls: WallSet,
}

impl Level {
    /// Validates the descriptor and derives the wall geometry.
    pub fn from_descriptor(descriptor: &LevelDescriptor) -> Result<Self, LevelError> {
        let grid = Grid::from_descriptor(descriptor)?;
        let walls = WallSet::from_grid(&grid);
        debug!(
            "built level {:?}: {}x{} tiles, {} passable, {} walls",
            descriptor.name,
            grid.rows(),
            grid.columns(),
            grid.count_passable_cells(),
            walls.len()
        );
        Ok(Self {
            name: descriptor.name.clone(),
            grid,
            walls,
        })
    }

    /// Human readable level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Passability grid of the level.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Solid walls of the level.
    #[must_use]
    pub const fn walls(&self) -> &WallSet {
        &self.walls
    }
}

/// Represents the authoritative dungeon world state.
#[derive(Debug)]
pub struct World {
    level: Level,
    camera_offset: Vec3,
    max_health: f32,
    max_active_mobs: usize,
    player: Pose,
    camera: Pose,
    mobs: Vec<Mob>,
    loot: Vec<Loot>,
    next_mob_id: u32,
    score: u32,
    life: f32,
    elapsed: Duration,
}

impl World {
    /// Creates a world for the level with the player standing on the start tile.
    #[must_use]
    pub fn new(level: Level, config: &GameConfig) -> Self {
        let grid = level.grid();
        let start = grid.tile_center(grid.start()) + Vec3::Y * ACTOR_HEIGHT;
        let player = Pose::new(start, Quat::from_rotation_y(PI));

        let loot = plan_loot_placement(grid, config.loot_frequency)
            .into_iter()
            .enumerate()
            .map(|(index, cell)| Loot {
                id: LootId::new(index as u32),
                cell,
                position: grid.tile_center(cell),
            })
            .collect();

        let mut world = Self {
            level,
            camera_offset: config.camera_offset,
            max_health: config.max_health,
            max_active_mobs: config.max_active_mobs,
            player,
            camera: player,
            mobs: Vec::new(),
            loot,
            next_mob_id: 0,
            score: 0,
            life: config.max_health,
            elapsed: Duration::ZERO,
        };
        world.follow_player();
        world
    }

    fn follow_player(&mut self) {
        let target = self.player.position;
        let eye = target + self.player.orientation * self.camera_offset;
        let orientation = look_at(eye, target).unwrap_or(self.player.orientation);
        self.camera = Pose::new(eye, orientation);
    }

    fn mob_mut(&mut self, mob: MobId) -> Option<&mut Mob> {
        self.mobs.iter_mut().find(|candidate| candidate.id == mob)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::TurnPlayer { radians } => {
            if radians == 0.0 || !radians.is_finite() {
                return;
            }
            world.player.orientation =
                (world.player.orientation * Quat::from_rotation_y(radians)).normalize();
            world.follow_player();
            out_events.push(Event::PlayerTurned {
                orientation: world.player.orientation,
            });
        }
        Command::MovePlayer { delta } => {
            if delta == Vec3::ZERO || !delta.is_finite() {
                return;
            }
            let from = world.player.position;
            world.player.position += delta;
            world.follow_player();
            out_events.push(Event::PlayerMoved {
                from,
                to: world.player.position,
            });
        }
        Command::SpawnMob { cell } => {
            if world.mobs.len() >= world.max_active_mobs {
                return;
            }
            if !world.level.grid.is_passable(cell) {
                return;
            }
            let id = MobId::new(world.next_mob_id);
            world.next_mob_id = world.next_mob_id.wrapping_add(1);
            let position = world.level.grid.tile_center(cell) + Vec3::Y * ACTOR_HEIGHT;
            world.mobs.push(Mob { id, position });
            debug!("spawned mob {} at {:?}", id.get(), cell);
            out_events.push(Event::MobSpawned {
                mob: id,
                cell,
                position,
            });
        }
        Command::StepMob { mob, position } => {
            if !position.is_finite() {
                return;
            }
            let Some(entry) = world.mob_mut(mob) else {
                return;
            };
            let from = entry.position;
            if from == position {
                return;
            }
            entry.position = position;
            out_events.push(Event::MobMoved {
                mob,
                from,
                to: position,
            });
        }
        Command::CollectLoot { loot } => {
            let Some(index) = world.loot.iter().position(|item| item.id == loot) else {
                return;
            };
            let _ = world.loot.remove(index);
            world.score = world.score.saturating_add(1);
            debug!("collected loot {} (score {})", loot.get(), world.score);
            out_events.push(Event::LootCollected {
                loot,
                score: world.score,
            });
        }
        Command::DamagePlayer { amount } => {
            if !amount.is_finite() {
                return;
            }
            let applied = amount.max(0.0).min(world.life);
            if applied <= 0.0 {
                return;
            }
            world.life -= applied;
            out_events.push(Event::PlayerDamaged {
                amount: applied,
                life: world.life,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use dungeon_crawler_core::{Grid, LootSnapshot, LootView, MobSnapshot, MobView, Pose};

    use super::{Level, WallSet, World};

    /// Provides read-only access to the level.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Provides read-only access to the level's passability grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        world.level.grid()
    }

    /// Provides read-only access to the level's solid walls.
    #[must_use]
    pub fn walls(world: &World) -> &WallSet {
        world.level.walls()
    }

    /// Current pose of the player.
    #[must_use]
    pub fn player(world: &World) -> Pose {
        world.player
    }

    /// Current pose of the follow camera.
    #[must_use]
    pub fn camera(world: &World) -> Pose {
        world.camera
    }

    /// Captures a read-only view of the mobs roaming the dungeon.
    #[must_use]
    pub fn mob_view(world: &World) -> MobView {
        MobView::from_snapshots(
            world
                .mobs
                .iter()
                .map(|mob| MobSnapshot {
                    id: mob.id,
                    position: mob.position,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the loot still lying in the dungeon.
    #[must_use]
    pub fn loot_view(world: &World) -> LootView {
        LootView::from_snapshots(
            world
                .loot
                .iter()
                .map(|item| LootSnapshot {
                    id: item.id,
                    cell: item.cell,
                    position: item.position,
                })
                .collect(),
        )
    }

    /// Gold collected so far.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Remaining player health.
    #[must_use]
    pub fn life(world: &World) -> f32 {
        world.life
    }

    /// Maximum player health.
    #[must_use]
    pub fn max_health(world: &World) -> f32 {
        world.max_health
    }

    /// Simulated time elapsed since the level started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }
}

#[derive(Clone, Copy, Debug)]
struct Mob {
    id: MobId,
    position: Vec3,
}

#[derive(Clone, Copy, Debug)]
struct Loot {
    id: LootId,
    cell: CellCoord,
    position: Vec3,
}

/// Rotation whose forward axis (-Z) points from `eye` toward `target`.
fn look_at(eye: Vec3, target: Vec3) -> Option<Quat> {
    let forward = (target - eye).try_normalize()?;
    let yaw = (-forward.x).atan2(-forward.z);
    let pitch = forward.y.clamp(-1.0, 1.0).asin();
    Some(Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch))
}
