#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon crawler engine.
//!
//! This crate defines the message surface that connects the adapter, the
//! authoritative world, and pure systems. Systems read immutable world views
//! and submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what actually changed. The immutable level
//! [`Grid`] and the [`RayCast`] seam used for line-of-sight queries live here
//! so every system agrees on the same spatial vocabulary.

use std::time::Duration;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

mod config;
mod grid;

pub use config::{GameConfig, OcclusionPolicy};
pub use grid::{Grid, LevelDescriptor, LevelError};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Rotates the player about the world's vertical axis.
    TurnPlayer {
        /// Signed rotation in radians; positive values turn left.
        radians: f32,
    },
    /// Translates the player by a world-space displacement that already passed
    /// collision resolution.
    MovePlayer {
        /// World-space displacement applied to the player position.
        delta: Vec3,
    },
    /// Requests that a mob be spawned at the centre of the provided cell.
    SpawnMob {
        /// Passable cell that hosts the new mob.
        cell: CellCoord,
    },
    /// Moves a mob to a new world-space position.
    StepMob {
        /// Identifier of the mob being moved.
        mob: MobId,
        /// Position the mob occupies after the step.
        position: Vec3,
    },
    /// Requests that a loot item be picked up by the player.
    CollectLoot {
        /// Identifier of the loot item being collected.
        loot: LootId,
    },
    /// Applies damage to the player.
    DamagePlayer {
        /// Health points to subtract before clamping at zero.
        amount: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player turned.
    PlayerTurned {
        /// Orientation of the player after the turn.
        orientation: Quat,
    },
    /// Confirms that the player moved between two positions.
    PlayerMoved {
        /// Position before the move.
        from: Vec3,
        /// Position after the move.
        to: Vec3,
    },
    /// Confirms that a mob entered the dungeon.
    MobSpawned {
        /// Identifier assigned to the new mob.
        mob: MobId,
        /// Cell the mob was spawned in.
        cell: CellCoord,
        /// World-space position of the new mob.
        position: Vec3,
    },
    /// Confirms that a mob changed position.
    MobMoved {
        /// Identifier of the mob that moved.
        mob: MobId,
        /// Position before the move.
        from: Vec3,
        /// Position after the move.
        to: Vec3,
    },
    /// Confirms that the player picked up a loot item.
    LootCollected {
        /// Identifier of the collected loot item.
        loot: LootId,
        /// Score after the pickup.
        score: u32,
    },
    /// Confirms that the player lost health.
    PlayerDamaged {
        /// Health actually subtracted after clamping.
        amount: f32,
        /// Remaining health.
        life: f32,
    },
}

/// Location of a single grid cell expressed as row and column indices.
///
/// Indices are signed so positions that lie off the grid still map to a
/// coordinate; [`Grid::contains`] tells callers whether it is in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: i32,
    column: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }
}

/// Position and orientation of an actor in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation. Only the yaw component matters to the core.
    pub orientation: Quat,
}

impl Pose {
    /// Creates a pose from a position and an orientation.
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Rotates an object-space vector into world space, ignoring translation.
    #[must_use]
    pub fn to_world_direction(&self, local: Vec3) -> Vec3 {
        self.orientation * local
    }
}

/// Unique identifier assigned to a wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MobId(u32);

impl MobId {
    /// Creates a new mob identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a loot item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LootId(u32);

impl LootId {
    /// Creates a new loot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Single intersection reported by a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Wall that the ray intersected.
    pub wall: WallId,
    /// Distance from the ray origin to the intersection.
    pub distance: f32,
}

/// Ray-intersection primitive supplied by whoever owns the solid geometry.
pub trait RayCast {
    /// Casts a ray and returns every solid hit within `max_distance`.
    ///
    /// `direction` is unit length. Hits are ordered nearest-first.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit>;
}

/// Immutable representation of a single mob's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobSnapshot {
    /// Unique identifier assigned to the mob.
    pub id: MobId,
    /// World-space position of the mob.
    pub position: Vec3,
}

/// Read-only snapshot describing all mobs in the dungeon.
#[derive(Clone, Debug, Default)]
pub struct MobView {
    snapshots: Vec<MobSnapshot>,
}

impl MobView {
    /// Creates a new mob view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MobSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured mob snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &MobSnapshot> {
        self.snapshots.iter()
    }

    /// Number of mobs captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no mobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single loot item used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootSnapshot {
    /// Unique identifier assigned to the loot item.
    pub id: LootId,
    /// Cell hosting the loot item.
    pub cell: CellCoord,
    /// World-space position of the loot item.
    pub position: Vec3,
}

/// Read-only snapshot describing all uncollected loot.
#[derive(Clone, Debug, Default)]
pub struct LootView {
    snapshots: Vec<LootSnapshot>,
}

impl LootView {
    /// Creates a new loot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<LootSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured loot snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &LootSnapshot> {
        self.snapshots.iter()
    }

    /// Number of loot items captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no loot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Distance between two points measured in the horizontal (XZ) plane.
#[must_use]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let delta = b - a;
    (delta.x * delta.x + delta.z * delta.z).sqrt()
}
