#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player movement: turning, speed selection, and wall collision against the tile grid.

use std::time::Duration;

use dungeon_crawler_core::{Command, GameConfig, Grid, Pose};
use glam::{Quat, Vec3};
use log::trace;

/// Object-space direction the player walks in.
const FORWARD: Vec3 = Vec3::NEG_Z;

/// Outcome of checking a proposed move against the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDecision {
    /// The move may be applied.
    Allowed,
    /// The move would leave the map or enter a blocked cell.
    Blocked,
}

impl MoveDecision {
    /// Reports whether the move may be applied.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Decides whether an actor may move by `local_move`, expressed in its own frame.
///
/// Leaving the grid is always blocked. Crossing into another cell is allowed
/// only when that cell is passable. Moving within the current cell is always
/// allowed, whatever that cell's own passability.
#[must_use]
pub fn resolve_move(grid: &Grid, pose: &Pose, local_move: Vec3) -> MoveDecision {
    let end = pose.position + pose.to_world_direction(local_move);
    let from = grid.cell_at(pose.position);
    let to = grid.cell_at(end);

    if !grid.contains(to) {
        return MoveDecision::Blocked;
    }
    if to != from && !grid.is_passable(to) {
        return MoveDecision::Blocked;
    }
    MoveDecision::Allowed
}

/// Buttons held by the player during a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputIntent {
    /// Turn counter-clockwise seen from above.
    pub turn_left: bool,
    /// Turn clockwise seen from above.
    pub turn_right: bool,
    /// Run forward.
    pub forward: bool,
    /// Walk backward, or slow to a walk while autorunning.
    pub backward: bool,
}

/// Speeds used to translate input into motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    run_speed: f32,
    jog_speed: f32,
    walk_speed: f32,
    turn_speed: f32,
    autorun: bool,
}

impl Config {
    /// Extracts the movement parameters from the game configuration.
    #[must_use]
    pub fn from_game(config: &GameConfig) -> Self {
        Self {
            run_speed: config.run_speed,
            jog_speed: config.jog_speed,
            walk_speed: config.walk_speed,
            turn_speed: config.turn_speed,
            autorun: config.autorun,
        }
    }

    fn speed(&self, intent: InputIntent) -> f32 {
        match (self.autorun, intent.forward, intent.backward) {
            (_, true, _) => self.run_speed,
            (true, false, true) => self.walk_speed,
            (true, false, false) => self.jog_speed,
            (false, false, true) => -self.walk_speed,
            (false, false, false) => 0.0,
        }
    }

    fn turn_direction(intent: InputIntent) -> f32 {
        let mut direction = 0.0;
        if intent.turn_left {
            direction += 1.0;
        }
        if intent.turn_right {
            direction -= 1.0;
        }
        direction
    }
}

/// What happened to the player's move during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Collision decision for the attempted translation.
    pub decision: MoveDecision,
    /// Signed speed the player attempted to move at.
    pub speed: f32,
}

impl StepReport {
    /// Reports whether the player ran into a wall while moving forward.
    #[must_use]
    pub fn bumped(&self) -> bool {
        self.decision == MoveDecision::Blocked && self.speed > 0.0
    }
}

/// Pure system that turns input intent into player commands.
#[derive(Clone, Copy, Debug)]
pub struct PlayerMovement {
    config: Config,
}

impl PlayerMovement {
    /// Creates a movement system with the provided speeds.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Emits turn and move commands for one tick of input.
    ///
    /// The turn is applied before the move is resolved, so the player walks
    /// along its new heading. A blocked move emits no command.
    pub fn handle(
        &self,
        grid: &Grid,
        player: Pose,
        intent: InputIntent,
        dt: Duration,
        out: &mut Vec<Command>,
    ) -> StepReport {
        let seconds = dt.as_secs_f32();
        let speed = self.config.speed(intent);

        let radians = Config::turn_direction(intent) * self.config.turn_speed * seconds;
        let mut pose = player;
        if radians != 0.0 {
            pose.orientation = (pose.orientation * Quat::from_rotation_y(radians)).normalize();
            out.push(Command::TurnPlayer { radians });
        }

        let local_move = FORWARD * speed * seconds;
        let decision = resolve_move(grid, &pose, local_move);
        if decision.is_allowed() {
            let delta = pose.to_world_direction(local_move);
            if delta != Vec3::ZERO {
                out.push(Command::MovePlayer { delta });
            }
        } else {
            trace!("player move blocked at {:?}", grid.cell_at(pose.position));
        }

        StepReport { decision, speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_crawler_core::{CellCoord, LevelDescriptor};

    fn open_grid() -> Grid {
        Grid::from_descriptor(&LevelDescriptor {
            name: "open".to_owned(),
            tile_size: 10.0,
            tiles: vec![vec![1; 10]; 10],
            start: CellCoord::new(0, 0),
            end: CellCoord::new(9, 9),
        })
        .expect("valid grid")
    }

    fn grid_with_hole() -> Grid {
        Grid::from_descriptor(&LevelDescriptor {
            name: "hole".to_owned(),
            tile_size: 10.0,
            tiles: vec![vec![1, 0, 1], vec![1, 1, 1]],
            start: CellCoord::new(0, 0),
            end: CellCoord::new(1, 2),
        })
        .expect("valid grid")
    }

    fn at(x: f32, z: f32) -> Pose {
        Pose::new(Vec3::new(x, 1.0, z), Quat::IDENTITY)
    }

    #[test]
    fn leaving_the_map_is_blocked() {
        let grid = open_grid();
        let decision = resolve_move(&grid, &at(5.0, 5.0), Vec3::new(-6.0, 0.0, 0.0));
        assert_eq!(decision, MoveDecision::Blocked);
    }

    #[test]
    fn entering_a_blocked_cell_is_blocked() {
        let grid = grid_with_hole();
        let decision = resolve_move(&grid, &at(5.0, 5.0), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(decision, MoveDecision::Blocked);
    }

    #[test]
    fn entering_a_passable_cell_is_allowed() {
        let grid = grid_with_hole();
        let decision = resolve_move(&grid, &at(5.0, 5.0), Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(decision, MoveDecision::Allowed);
    }

    #[test]
    fn moving_inside_a_blocked_cell_is_allowed() {
        let grid = grid_with_hole();
        let decision = resolve_move(&grid, &at(12.0, 5.0), Vec3::new(5.0, 0.0, 3.0));
        assert_eq!(decision, MoveDecision::Allowed);
    }

    #[test]
    fn local_move_is_rotated_by_orientation() {
        let grid = grid_with_hole();
        // Facing +X: forward now points into the hole.
        let pose = Pose::new(
            Vec3::new(5.0, 1.0, 5.0),
            Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        );
        assert_eq!(
            resolve_move(&grid, &pose, Vec3::new(0.0, 0.0, -10.0)),
            MoveDecision::Blocked
        );
        assert_eq!(
            resolve_move(&grid, &pose, Vec3::new(0.0, 0.0, 10.0)),
            MoveDecision::Blocked,
            "backing out of the map is blocked too"
        );
    }

    #[test]
    fn speed_selection_honours_autorun() {
        let manual = Config::from_game(&GameConfig::default());
        let autorun = Config::from_game(&GameConfig {
            autorun: true,
            ..GameConfig::default()
        });
        let idle = InputIntent::default();
        let back = InputIntent {
            backward: true,
            ..InputIntent::default()
        };
        let ahead = InputIntent {
            forward: true,
            ..InputIntent::default()
        };

        assert_eq!(manual.speed(idle), 0.0);
        assert_eq!(manual.speed(back), -5.0);
        assert_eq!(manual.speed(ahead), 20.0);
        assert_eq!(autorun.speed(idle), 10.0);
        assert_eq!(autorun.speed(back), 5.0);
        assert_eq!(autorun.speed(ahead), 20.0);
    }

    #[test]
    fn blocked_forward_move_reports_bump() {
        let grid = grid_with_hole();
        let movement = PlayerMovement::new(Config::from_game(&GameConfig::default()));
        let pose = Pose::new(
            Vec3::new(9.0, 1.0, 5.0),
            Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
        );
        let intent = InputIntent {
            forward: true,
            ..InputIntent::default()
        };
        let mut commands = Vec::new();
        let report = movement.handle(
            &grid,
            pose,
            intent,
            Duration::from_millis(100),
            &mut commands,
        );
        assert!(report.bumped());
        assert!(commands.is_empty());
    }

    #[test]
    fn turning_emits_turn_before_move() {
        let grid = open_grid();
        let movement = PlayerMovement::new(Config::from_game(&GameConfig::default()));
        let intent = InputIntent {
            turn_left: true,
            forward: true,
            ..InputIntent::default()
        };
        let mut commands = Vec::new();
        let report = movement.handle(
            &grid,
            at(50.0, 50.0),
            intent,
            Duration::from_millis(100),
            &mut commands,
        );
        assert!(report.decision.is_allowed());
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[0],
            Command::TurnPlayer { radians } if (radians - 0.5).abs() < 1e-6
        ));
        match commands[1] {
            Command::MovePlayer { delta } => {
                assert!((delta.length() - 2.0).abs() < 1e-5);
                let expected = Quat::from_rotation_y(0.5) * Vec3::new(0.0, 0.0, -2.0);
                assert!((delta - expected).length() < 1e-5);
            }
            ref other => panic!("unexpected command: {other:?}"),
        }
    }
}
