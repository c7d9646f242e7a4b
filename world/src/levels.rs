//! Built-in level descriptions.

use dungeon_crawler_core::{CellCoord, LevelDescriptor};

const TILE_SIZE: f32 = 10.0;

/// The first dungeon level: a winding 10x10 cave from the north-east corner
/// down to the southern exit.
#[must_use]
pub fn first_level() -> LevelDescriptor {
    LevelDescriptor {
        name: "Level 1".to_owned(),
        tile_size: TILE_SIZE,
        tiles: vec![
            vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1],
            vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
            vec![0, 0, 1, 1, 0, 1, 1, 1, 1, 0],
            vec![0, 1, 1, 1, 1, 1, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 1, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 1, 1, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 1, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
        ],
        start: CellCoord::new(0, 8),
        end: CellCoord::new(9, 4),
    }
}
