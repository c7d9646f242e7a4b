//! Tuning knobs shared by the world and systems.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the adapter should treat walls that occlude the player from the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcclusionPolicy {
    /// Occluding walls are not drawn for the frame.
    #[default]
    Hide,
    /// Occluding walls are drawn as wireframes for the frame.
    Wireframe,
}

/// Game configuration that stays fixed for the lifetime of a level.
///
/// Every field has a default, so configuration files only need to name the
/// values they change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Camera position relative to the player, in the player's frame.
    pub camera_offset: Vec3,
    /// Whether the player keeps moving forward without input.
    pub autorun: bool,
    /// Player speed while running, in world units per second.
    pub run_speed: f32,
    /// Player speed while jogging, in world units per second.
    pub jog_speed: f32,
    /// Player speed while walking, in world units per second.
    pub walk_speed: f32,
    /// Player turn rate, in radians per second.
    pub turn_speed: f32,
    /// Maximum and initial player health.
    pub max_health: f32,
    /// Fraction of all tiles that receive a loot item.
    pub loot_frequency: f32,
    /// Maximum number of mobs alive at once.
    pub max_active_mobs: usize,
    /// Minimum time between two mob spawns, in seconds.
    pub mob_spawn_delay: f32,
    /// Mob pursuit speed, in world units per second.
    pub mob_speed: f32,
    /// Health removed per second by each touching mob.
    pub mob_damage: f32,
    /// Horizontal contact radius of the player.
    pub player_radius: f32,
    /// Horizontal contact radius of a loot item.
    pub loot_radius: f32,
    /// Horizontal contact radius of a mob.
    pub mob_radius: f32,
    /// Treatment of walls that occlude the player.
    pub occlusion_policy: OcclusionPolicy,
    /// Seed for the mob spawner's random source.
    pub seed: u64,
}

impl GameConfig {
    /// Spawn delay expressed as a [`Duration`]. Negative or non-finite values map to zero.
    #[must_use]
    pub fn spawn_delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.mob_spawn_delay).unwrap_or(Duration::ZERO)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            camera_offset: Vec3::new(0.0, 2.4, 10.0),
            autorun: false,
            run_speed: 20.0,
            jog_speed: 10.0,
            walk_speed: 5.0,
            turn_speed: 5.0,
            max_health: 100.0,
            loot_frequency: 0.05,
            max_active_mobs: 5,
            mob_spawn_delay: 5.0,
            mob_speed: 12.0,
            mob_damage: 10.0,
            player_radius: 0.8,
            loot_radius: 0.5,
            mob_radius: 1.6,
            occlusion_policy: OcclusionPolicy::Hide,
            seed: 0x5eed,
        }
    }
}
