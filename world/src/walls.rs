//! Solid wall geometry derived from the tile grid.

use dungeon_crawler_core::{CellCoord, Grid, RayCast, RayHit, WallId};
use glam::Vec3;

/// Height of every wall measured from the floor.
pub const WALL_HEIGHT: f32 = 4.0;
/// Thickness of every wall slab.
pub const WALL_THICKNESS: f32 = 0.1;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Orientation of a wall slab in the horizontal plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WallAxis {
    /// Slab spans one tile along the X axis, separating two rows.
    AlongX,
    /// Slab spans one tile along the Z axis, separating two columns.
    AlongZ,
}

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its centre and full extents.
    #[must_use]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Distance along the ray at which it enters the box, clamped to zero when
    /// the origin is already inside.
    ///
    /// `direction` does not need to be unit length; the distance is measured in
    /// multiples of it.
    #[must_use]
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut near = f32::NEG_INFINITY;
        let mut far = f32::INFINITY;

        for axis in 0..3 {
            let start = origin[axis];
            let step = direction[axis];
            let (low, high) = (self.min[axis], self.max[axis]);

            if step.abs() < PARALLEL_EPSILON {
                if start < low || start > high {
                    return None;
                }
                continue;
            }

            let first = (low - start) / step;
            let second = (high - start) / step;
            near = near.max(first.min(second));
            far = far.min(first.max(second));
            if near > far {
                return None;
            }
        }

        if far < 0.0 {
            return None;
        }
        Some(near.max(0.0))
    }
}

/// A single wall slab.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    id: WallId,
    axis: WallAxis,
    bounds: Aabb,
}

impl Wall {
    /// Identifier of the wall.
    #[must_use]
    pub const fn id(&self) -> WallId {
        self.id
    }

    /// Orientation of the wall slab.
    #[must_use]
    pub const fn axis(&self) -> WallAxis {
        self.axis
    }

    /// World-space bounds of the slab.
    #[must_use]
    pub const fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/// Every solid wall of a level. Floors and roofs are never part of the set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallSet {
    walls: Vec<Wall>,
}

impl WallSet {
    /// Places a wall on every edge between a passable cell and a blocked cell
    /// or the map boundary.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let rows = grid.rows() as i32;
        let columns = grid.columns() as i32;
        let tile = grid.tile_size();
        let mut walls = Vec::new();

        for row in 0..rows {
            let mut was_inside = false;
            for column in 0..columns {
                let inside = grid.is_passable(CellCoord::new(row, column));
                if inside != was_inside {
                    push_wall(&mut walls, WallAxis::AlongZ, row, column, tile);
                }
                was_inside = inside;
            }
            if was_inside {
                push_wall(&mut walls, WallAxis::AlongZ, row, columns, tile);
            }
        }

        for column in 0..columns {
            let mut was_inside = false;
            for row in 0..rows {
                let inside = grid.is_passable(CellCoord::new(row, column));
                if inside != was_inside {
                    push_wall(&mut walls, WallAxis::AlongX, row, column, tile);
                }
                was_inside = inside;
            }
            if was_inside {
                push_wall(&mut walls, WallAxis::AlongX, rows, column, tile);
            }
        }

        Self { walls }
    }

    /// Iterator over every wall in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.walls.iter()
    }

    /// Looks up a wall by identifier.
    #[must_use]
    pub fn get(&self, id: WallId) -> Option<&Wall> {
        usize::try_from(id.get())
            .ok()
            .and_then(|index| self.walls.get(index))
    }

    /// Number of walls in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Reports whether the level has no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

impl RayCast for WallSet {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .walls
            .iter()
            .filter_map(|wall| {
                let distance = wall.bounds.ray_entry(origin, direction)?;
                (distance <= max_distance).then_some(RayHit {
                    wall: wall.id,
                    distance,
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.wall.cmp(&b.wall))
        });
        hits
    }
}

// Row and column name the grid line the slab sits on for its own axis and the
// tile it spans along the other.
fn push_wall(walls: &mut Vec<Wall>, axis: WallAxis, row: i32, column: i32, tile: f32) {
    let (center, size) = match axis {
        WallAxis::AlongX => (
            Vec3::new(
                (column as f32 + 0.5) * tile,
                WALL_HEIGHT / 2.0,
                row as f32 * tile,
            ),
            Vec3::new(tile, WALL_HEIGHT, WALL_THICKNESS),
        ),
        WallAxis::AlongZ => (
            Vec3::new(
                column as f32 * tile,
                WALL_HEIGHT / 2.0,
                (row as f32 + 0.5) * tile,
            ),
            Vec3::new(WALL_THICKNESS, WALL_HEIGHT, tile),
        ),
    };
    let id = WallId::new(walls.len() as u32);
    walls.push(Wall {
        id,
        axis,
        bounds: Aabb::from_center_size(center, size),
    });
}
