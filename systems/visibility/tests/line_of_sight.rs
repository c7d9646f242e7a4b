use std::f32::consts::PI;

use dungeon_crawler_core::{CellCoord, Command, GameConfig, OcclusionPolicy};
use dungeon_crawler_system_visibility::{find_occluders, has_line_of_sight, OcclusionMask};
use dungeon_crawler_world::{self as world, levels, query, Level, World, ACTOR_HEIGHT};
use glam::Vec3;

fn first_world() -> World {
    let level = Level::from_descriptor(&levels::first_level()).expect("first level is valid");
    World::new(level, &GameConfig::default())
}

fn actor_at(world: &World, row: i32, column: i32) -> Vec3 {
    query::grid(world).tile_center(CellCoord::new(row, column)) + Vec3::Y * ACTOR_HEIGHT
}

#[test]
fn open_corridor_has_line_of_sight() {
    let world = first_world();
    let walls = query::walls(&world);
    let west = actor_at(&world, 3, 1);
    let east = actor_at(&world, 3, 5);
    assert!(find_occluders(walls, west, east).is_empty());
    assert!(has_line_of_sight(walls, east, west));
}

#[test]
fn blocked_cells_between_actors_occlude() {
    let world = first_world();
    let walls = query::walls(&world);
    let west = actor_at(&world, 4, 1);
    let east = actor_at(&world, 4, 5);

    let hits = find_occluders(walls, west, east);
    assert_eq!(hits.len(), 2);
    assert!(hits[0].distance <= hits[1].distance);
    assert!(!has_line_of_sight(walls, west, east));
}

#[test]
fn identical_endpoints_are_clear() {
    let world = first_world();
    let point = actor_at(&world, 4, 1);
    assert!(find_occluders(query::walls(&world), point, point).is_empty());
}

#[test]
fn camera_occluders_follow_the_current_frame_only() {
    let mut world = first_world();
    let mut mask = OcclusionMask::new(OcclusionPolicy::Hide);

    let camera = query::camera(&world).position;
    let player = query::player(&world).position;
    let first = mask.refresh(query::walls(&world), camera, player);
    assert!(
        !first.occluders.is_empty(),
        "the start tile's northern wall sits between camera and player"
    );

    let again = mask.refresh(query::walls(&world), camera, player);
    assert_eq!(again.occluders, first.occluders);
    assert_eq!(again.restored, first.occluders);

    let mut events = Vec::new();
    world::apply(&mut world, Command::TurnPlayer { radians: PI }, &mut events);

    let camera = query::camera(&world).position;
    let player = query::player(&world).position;
    let turned = mask.refresh(query::walls(&world), camera, player);
    assert!(turned.occluders.is_empty());
    assert_eq!(turned.restored, first.occluders);
    for wall in &first.occluders {
        assert!(!mask.is_hidden(*wall));
    }
}
