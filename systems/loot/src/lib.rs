#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loot distribution at level load and loot pickup during play.

use dungeon_crawler_core::{horizontal_distance, CellCoord, Command, Grid, LootView};
use glam::Vec3;
use log::debug;

/// Scatters loot evenly across the passable cells of the grid.
///
/// The plan requests `ceil(rows * columns * frequency)` items and walks the
/// passable enumeration at a fixed stride, so it may deliver fewer items than
/// requested but never more. Every emitted cell is passable.
#[must_use]
pub fn plan_loot_placement(grid: &Grid, frequency: f32) -> Vec<CellCoord> {
    let target = requested_items(grid, frequency);
    if target == 0 {
        return Vec::new();
    }

    let passable = grid.count_passable_cells();
    let stride = (passable / target).max(1);

    let mut remaining = target;
    let mut plan = Vec::with_capacity(target.min(passable));
    for (tile_num, cell) in grid.passable_cells().enumerate() {
        if remaining == 0 {
            break;
        }
        if tile_num % stride == 0 {
            plan.push(cell);
            remaining -= 1;
        }
    }

    debug!(
        "planned {} of {} loot items over {} passable cells (stride {})",
        plan.len(),
        target,
        passable,
        stride
    );
    plan
}

fn requested_items(grid: &Grid, frequency: f32) -> usize {
    let tiles = grid.rows() as f32 * grid.columns() as f32;
    let requested = (tiles * frequency).ceil();
    if requested.is_finite() && requested > 0.0 {
        requested as usize
    } else {
        0
    }
}

/// Pure system that emits pickup commands for loot the player touches.
#[derive(Clone, Copy, Debug)]
pub struct LootPickup {
    reach: f32,
}

impl LootPickup {
    /// Creates a pickup system from the player's and loot's contact radii.
    #[must_use]
    pub fn new(player_radius: f32, loot_radius: f32) -> Self {
        Self {
            reach: player_radius + loot_radius,
        }
    }

    /// Emits a [`Command::CollectLoot`] for every item overlapping the player
    /// in the horizontal plane.
    pub fn handle(&self, player: Vec3, loot: &LootView, out: &mut Vec<Command>) {
        for item in loot.iter() {
            if horizontal_distance(player, item.position) < self.reach {
                out.push(Command::CollectLoot { loot: item.id });
            }
        }
    }
}
