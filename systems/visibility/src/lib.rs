#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-of-sight queries through the dungeon's solid geometry.
//!
//! The same segment query serves two consumers: the camera, which hides the
//! walls standing between it and the player for a single frame, and the mobs,
//! which may only pursue a player they can see.

use dungeon_crawler_core::{OcclusionPolicy, RayCast, RayHit, WallId};
use glam::Vec3;

/// Returns every solid object on the segment from `from` to `to`, nearest-first.
///
/// The ray length is capped at the distance between the endpoints so nothing
/// beyond the target is reported. Coincident endpoints yield an empty list.
pub fn find_occluders<C>(caster: &C, from: Vec3, to: Vec3) -> Vec<RayHit>
where
    C: RayCast + ?Sized,
{
    let offset = to - from;
    let distance = offset.length();
    if !distance.is_finite() || distance <= f32::EPSILON {
        return Vec::new();
    }
    caster.cast_ray(from, offset / distance, distance)
}

/// Reports whether nothing solid lies between the two points.
pub fn has_line_of_sight<C>(caster: &C, from: Vec3, to: Vec3) -> bool
where
    C: RayCast + ?Sized,
{
    find_occluders(caster, from, to).is_empty()
}

/// Visibility changes the renderer must apply for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameOcclusion {
    /// How occluders should be drawn this frame.
    pub policy: OcclusionPolicy,
    /// Walls hidden last frame that must be drawn normally again.
    pub restored: Vec<WallId>,
    /// Walls between camera and player this frame, nearest to the camera first.
    pub occluders: Vec<WallId>,
}

/// Tracks which walls are hidden between the camera and the player.
///
/// Only the current frame's occluders are ever hidden: each refresh restores
/// the entire previous set before computing the new one.
#[derive(Clone, Debug, Default)]
pub struct OcclusionMask {
    policy: OcclusionPolicy,
    hidden: Vec<WallId>,
}

impl OcclusionMask {
    /// Creates an empty mask using the provided treatment for occluders.
    #[must_use]
    pub fn new(policy: OcclusionPolicy) -> Self {
        Self {
            policy,
            hidden: Vec::new(),
        }
    }

    /// Restores last frame's occluders and computes this frame's.
    ///
    /// The segment is always cast from the camera toward the player.
    pub fn refresh<C>(&mut self, caster: &C, camera: Vec3, player: Vec3) -> FrameOcclusion
    where
        C: RayCast + ?Sized,
    {
        let restored = std::mem::take(&mut self.hidden);

        for hit in find_occluders(caster, camera, player) {
            if !self.hidden.contains(&hit.wall) {
                self.hidden.push(hit.wall);
            }
        }

        FrameOcclusion {
            policy: self.policy,
            restored,
            occluders: self.hidden.clone(),
        }
    }

    /// Walls currently hidden.
    #[must_use]
    pub fn hidden(&self) -> &[WallId] {
        &self.hidden
    }

    /// Reports whether the wall is hidden this frame.
    #[must_use]
    pub fn is_hidden(&self, wall: WallId) -> bool {
        self.hidden.contains(&wall)
    }

    /// Treatment applied to occluders.
    #[must_use]
    pub const fn policy(&self) -> OcclusionPolicy {
        self.policy
    }
}
