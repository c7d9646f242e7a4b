//! Loading of level descriptors and game configuration from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use dungeon_crawler_core::{GameConfig, LevelDescriptor};
use dungeon_crawler_world::levels;

/// Reads the level at `path`, or the built-in first level when no path is given.
pub(crate) fn load_level(path: Option<&Path>) -> Result<LevelDescriptor> {
    let Some(path) = path else {
        return Ok(levels::first_level());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file at {}", path.display()))?;
    parse_level(&contents).with_context(|| format!("invalid level file {}", path.display()))
}

/// Reads the configuration at `path`, or the defaults when no path is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse_level(contents: &str) -> Result<LevelDescriptor> {
    toml::from_str(contents).context("failed to parse level toml contents")
}

fn parse_config(contents: &str) -> Result<GameConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawler_core::{CellCoord, OcclusionPolicy};

    #[test]
    fn parses_level_with_cell_tables() {
        let level = parse_level(
            r#"
            name = "Cellar"
            tile_size = 4.0
            tiles = [[1, 1], [0, 1]]
            start = { row = 0, column = 0 }
            end = { row = 1, column = 1 }
            "#,
        )
        .expect("level parses");

        assert_eq!(level.name, "Cellar");
        assert_eq!(level.tiles, vec![vec![1, 1], vec![0, 1]]);
        assert_eq!(level.end, CellCoord::new(1, 1));
    }

    #[test]
    fn rejects_level_without_tiles() {
        let error = parse_level("name = \"Broken\"\ntile_size = 4.0\n").unwrap_err();
        assert!(error.to_string().contains("level toml"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            autorun = true
            max_active_mobs = 2
            occlusion_policy = "wireframe"
            camera_offset = [0.0, 3.0, 12.0]
            "#,
        )
        .expect("config parses");

        assert!(config.autorun);
        assert_eq!(config.max_active_mobs, 2);
        assert_eq!(config.occlusion_policy, OcclusionPolicy::Wireframe);
        assert_eq!(config.camera_offset, glam::Vec3::new(0.0, 3.0, 12.0));
        assert_eq!(config.run_speed, GameConfig::default().run_speed);
    }

    #[test]
    fn missing_paths_fall_back_to_builtins() {
        let level = load_level(None).expect("built-in level");
        assert_eq!(level.name, "Level 1");
        let config = load_config(None).expect("default config");
        assert_eq!(config, GameConfig::default());
    }
}
