#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mob pursuit and contact damage.

use std::time::Duration;

use dungeon_crawler_core::{horizontal_distance, Command, MobView, RayCast};
use dungeon_crawler_system_visibility::has_line_of_sight;
use glam::Vec3;
use log::trace;

/// Awareness of a single mob, re-evaluated every tick from line of sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MobState {
    /// The mob cannot see the player and holds position.
    Idle,
    /// The mob sees the player and closes in.
    Pursuing,
}

impl MobState {
    /// Derives the state from a line-of-sight result.
    #[must_use]
    pub const fn from_line_of_sight(can_see: bool) -> Self {
        if can_see {
            Self::Pursuing
        } else {
            Self::Idle
        }
    }
}

/// Advances a mob toward the player for one tick.
///
/// A mob that cannot see the player stays put. Otherwise it travels straight
/// toward the player by `speed * dt`, never past the player. Walls are not
/// considered.
#[must_use]
pub fn step_mob(mob: Vec3, player: Vec3, can_see: bool, speed: f32, dt: Duration) -> Vec3 {
    if !can_see {
        return mob;
    }

    let offset = player - mob;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return mob;
    }

    let step = (speed * dt.as_secs_f32()).max(0.0).min(distance);
    if step >= distance {
        return player;
    }
    mob + offset / distance * step
}

/// Pure system that moves every mob able to see the player.
#[derive(Clone, Copy, Debug)]
pub struct Steering {
    speed: f32,
}

impl Steering {
    /// Creates a steering system with the mobs' pursuit speed.
    #[must_use]
    pub const fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Emits a [`Command::StepMob`] for every pursuing mob that moves this tick.
    ///
    /// Line of sight is cast from each mob toward the player.
    pub fn handle<C>(
        &self,
        walls: &C,
        player: Vec3,
        mobs: &MobView,
        dt: Duration,
        out: &mut Vec<Command>,
    ) where
        C: RayCast + ?Sized,
    {
        if dt.is_zero() {
            return;
        }

        for mob in mobs.iter() {
            let can_see = has_line_of_sight(walls, mob.position, player);
            let state = MobState::from_line_of_sight(can_see);
            trace!("mob {} is {:?}", mob.id.get(), state);

            let next = step_mob(
                mob.position,
                player,
                state == MobState::Pursuing,
                self.speed,
                dt,
            );
            if next != mob.position {
                out.push(Command::StepMob {
                    mob: mob.id,
                    position: next,
                });
            }
        }
    }
}

/// Pure system that drains player health while mobs touch the player.
#[derive(Clone, Copy, Debug)]
pub struct ContactDamage {
    reach: f32,
    damage_per_second: f32,
}

impl ContactDamage {
    /// Creates a damage system from contact radii and the per-mob damage rate.
    #[must_use]
    pub fn new(player_radius: f32, mob_radius: f32, damage_per_second: f32) -> Self {
        Self {
            reach: player_radius + mob_radius,
            damage_per_second,
        }
    }

    /// Emits one [`Command::DamagePlayer`] per mob overlapping the player.
    pub fn handle(&self, player: Vec3, mobs: &MobView, dt: Duration, out: &mut Vec<Command>) {
        let amount = self.damage_per_second * dt.as_secs_f32();
        if amount <= 0.0 {
            return;
        }

        for mob in mobs.iter() {
            if horizontal_distance(player, mob.position) < self.reach {
                out.push(Command::DamagePlayer { amount });
            }
        }
    }
}
