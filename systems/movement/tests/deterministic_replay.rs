use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use dungeon_crawler_core::{Command, Event, GameConfig};
use dungeon_crawler_system_movement::{Config, InputIntent, PlayerMovement};
use dungeon_crawler_world::{self as world, levels, query, Level, World};

#[test]
fn deterministic_replay_produces_identical_log() {
    let first = replay(&scripted_intents());
    let second = replay(&scripted_intents());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.bumps > 0, "script should run into at least one wall");
}

#[test]
fn autorun_replay_differs_from_manual_replay() {
    let manual = replay(&scripted_intents());
    let autorun = replay_with(
        &GameConfig {
            autorun: true,
            ..GameConfig::default()
        },
        &scripted_intents(),
    );

    assert_ne!(manual.fingerprint(), autorun.fingerprint());
}

fn scripted_intents() -> Vec<InputIntent> {
    let ahead = InputIntent {
        forward: true,
        ..InputIntent::default()
    };
    let left = InputIntent {
        turn_left: true,
        ..InputIntent::default()
    };
    let back = InputIntent {
        backward: true,
        ..InputIntent::default()
    };

    let mut script = Vec::new();
    script.extend(std::iter::repeat(ahead).take(16));
    script.extend(std::iter::repeat(left).take(3));
    script.extend(std::iter::repeat(ahead).take(6));
    script.extend(std::iter::repeat(back).take(4));
    script.extend(std::iter::repeat(InputIntent::default()).take(3));
    script
}

fn replay(intents: &[InputIntent]) -> ReplayOutcome {
    replay_with(&GameConfig::default(), intents)
}

fn replay_with(config: &GameConfig, intents: &[InputIntent]) -> ReplayOutcome {
    let level = Level::from_descriptor(&levels::first_level()).expect("first level is valid");
    let mut world = World::new(level, config);
    let movement = PlayerMovement::new(Config::from_game(config));
    let dt = Duration::from_millis(100);
    let mut log = Vec::new();
    let mut bumps = 0;

    for intent in intents {
        let mut commands = vec![Command::Tick { dt }];
        let report = movement.handle(
            query::grid(&world),
            query::player(&world),
            *intent,
            dt,
            &mut commands,
        );
        if report.bumped() {
            bumps += 1;
        }

        for command in commands {
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut events);
            log.extend(events.iter().filter_map(EventRecord::from_event));
        }
    }

    ReplayOutcome { log, bumps }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    log: Vec<EventRecord>,
    bumps: u32,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Turned { orientation: [u32; 4] },
    Moved { to: [u32; 3] },
}

impl EventRecord {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::PlayerTurned { orientation } => Some(Self::Turned {
                orientation: orientation.to_array().map(f32::to_bits),
            }),
            Event::PlayerMoved { to, .. } => Some(Self::Moved {
                to: to.to_array().map(f32::to_bits),
            }),
            _ => None,
        }
    }
}
