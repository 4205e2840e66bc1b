use haunted_dreams_core::{Command, Cue, Event, InitialParameters, Tuning};
use haunted_dreams_system_objectives::Objectives;
use haunted_dreams_world::{self as world, query, World};

fn world_facing(angle: f64) -> World {
    let tuning = Tuning {
        initial: InitialParameters {
            angle: Some(angle),
            ..InitialParameters::default()
        },
        ..Tuning::default()
    };
    World::with_tuning(&tuning, 0).expect("default tuning is valid")
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn run_objectives(world: &mut World, objectives: &mut Objectives) -> Vec<Command> {
    let mut commands = Vec::new();
    let parameters = query::parameters(world);
    let target = query::current_target(world);
    let _ = objectives.handle(&parameters, &target, &mut commands);
    let _ = apply_all(world, commands.clone());
    commands
}

#[test]
fn first_nightmare_locks_aligns_and_snaps() {
    let mut world = world_facing(5.10);
    let mut objectives = Objectives::default();

    let _ = apply_all(
        &mut world,
        vec![
            Command::AdjustAmplitude { delta: 0.99 },
            Command::AdjustFrequency { delta: 0.02 },
        ],
    );

    let commands = run_objectives(&mut world, &mut objectives);
    assert!(
        commands.contains(&Command::PlayCue {
            cue: Cue::Discovery
        }),
        "lock should play the discovery cue"
    );
    assert!(commands.contains(&Command::SnapPositionFrequency));
    assert!(commands.contains(&Command::SetDistorted { distorted: false }));

    let parameters = query::parameters(&world);
    assert_eq!(parameters.position_frequency(), parameters.frequency());
    assert!(!query::distorted(&world), "aligned heading clears the noise");
}

#[test]
fn discovery_cue_plays_once_per_lock() {
    let mut world = world_facing(0.0);
    let mut objectives = Objectives::default();
    let _ = apply_all(
        &mut world,
        vec![
            Command::AdjustAmplitude { delta: 0.99 },
            Command::AdjustFrequency { delta: 0.02 },
        ],
    );

    let mut discoveries = 0;
    for _ in 0..5 {
        discoveries += run_objectives(&mut world, &mut objectives)
            .iter()
            .filter(|command| **command == Command::PlayCue { cue: Cue::Discovery })
            .count();
    }
    assert_eq!(discoveries, 1, "held lock must not replay the cue");

    let _ = apply_all(&mut world, vec![Command::AdjustFrequency { delta: 0.5 }]);
    let _ = run_objectives(&mut world, &mut objectives);
    let _ = apply_all(&mut world, vec![Command::AdjustFrequency { delta: -0.5 }]);
    let relock = run_objectives(&mut world, &mut objectives);
    assert!(
        relock.contains(&Command::PlayCue {
            cue: Cue::Discovery
        }),
        "losing and regaining the lock should replay the cue"
    );
}

#[test]
fn amplitude_saturates_at_maximum() {
    let mut world = World::new();
    let commands = (0..200)
        .map(|_| Command::AdjustAmplitude { delta: 0.01 })
        .collect();
    let _ = apply_all(&mut world, commands);
    assert_eq!(query::parameters(&world).amplitude(), 1.5);
}
