use std::{f64::consts::PI, time::Duration};

use haunted_dreams_core::{Command, ControlId, Event, InitialParameters, ScrollDirection, Tuning};
use haunted_dreams_system_controls::Controls;
use haunted_dreams_world::{self as world, query, World};

fn fresh_world() -> World {
    let tuning = Tuning {
        initial: InitialParameters {
            angle: Some(1.0),
            ..InitialParameters::default()
        },
        ..Tuning::default()
    };
    let mut world = World::with_tuning(&tuning, 0).expect("default tuning is valid");
    let mut events = Vec::new();
    for control in ControlId::ALL {
        world::apply(&mut world, Command::RegisterControl { control }, &mut events);
    }
    world
}

fn pump(world: &mut World, controls: &mut Controls, input: Vec<Command>) {
    let mut events = Vec::new();
    for command in input {
        world::apply(world, command, &mut events);
    }
    let mut commands = Vec::new();
    controls.handle(&events, query::engine_powered(world), &mut commands);
    let mut ignored: Vec<Event> = Vec::new();
    for command in commands {
        world::apply(world, command, &mut ignored);
    }
}

fn tick() -> Command {
    Command::Tick {
        dt: Duration::from_millis(16),
    }
}

#[test]
fn holding_left_turns_the_ship() {
    let mut world = fresh_world();
    let mut controls = Controls::default();

    pump(
        &mut world,
        &mut controls,
        vec![
            Command::SetHovered {
                control: Some(ControlId::Left),
            },
            Command::PointerDown,
        ],
    );
    for _ in 0..50 {
        pump(&mut world, &mut controls, vec![tick()]);
    }
    pump(&mut world, &mut controls, vec![Command::PointerUp, tick()]);

    let angle = query::parameters(&world).angle();
    assert!(
        (angle - (1.0 + 50.0 * PI / 500.0)).abs() < 1e-9,
        "fifty held ticks should rotate by fifty steps, got {angle}"
    );
}

#[test]
fn leaving_the_surface_stops_the_hold_loop() {
    let mut world = fresh_world();
    let mut controls = Controls::default();

    pump(
        &mut world,
        &mut controls,
        vec![
            Command::SetHovered {
                control: Some(ControlId::Down),
            },
            Command::PointerDown,
            tick(),
            Command::PointerLeave,
            tick(),
            tick(),
        ],
    );

    assert!(!controls.is_incrementing());
    let amplitude = query::parameters(&world).position_amplitude();
    assert!(
        (amplitude - 0.0975).abs() < 1e-12,
        "only the tick before leaving should apply, got {amplitude}"
    );
}

#[test]
fn scrolling_the_frequency_knob_tunes_the_wave() {
    let mut world = fresh_world();
    let mut controls = Controls::default();

    let mut input = vec![Command::SetHovered {
        control: Some(ControlId::Frequency),
    }];
    input.extend((0..3).map(|_| Command::Scroll {
        direction: ScrollDirection::Up,
    }));
    pump(&mut world, &mut controls, input);

    let frequency = query::parameters(&world).frequency();
    assert!((frequency - 1.03).abs() < 1e-12, "got {frequency}");
}

#[test]
fn scrolling_below_the_minimum_saturates() {
    let mut world = fresh_world();
    let mut controls = Controls::default();

    pump(
        &mut world,
        &mut controls,
        vec![
            Command::SetHovered {
                control: Some(ControlId::Amplitude),
            },
            Command::Scroll {
                direction: ScrollDirection::Down,
            },
        ],
    );

    assert_eq!(query::parameters(&world).amplitude(), 0.01);
}
