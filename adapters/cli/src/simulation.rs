use std::time::Duration;

use anyhow::Result;
use haunted_dreams_core::{Command, Event, MatchState};
use haunted_dreams_rendering::{FrameInput, Scene};
use haunted_dreams_system_controls::Controls;
use haunted_dreams_system_objectives::{is_overlap, Objectives};
use haunted_dreams_system_photography::Photography;
use haunted_dreams_system_tutorial::{Tutorial, TutorialInputs};
use haunted_dreams_world::{self as world, query, World};
use log::{info, warn};

use crate::{config::GameConfig, narration::NarrationPlayer};

/// Upper bound on command/event rounds within one frame.
const MAX_ROUNDS_PER_FRAME: usize = 32;

/// Owns the world and every system, and pumps commands and events between them.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    controls: Controls,
    objectives: Objectives,
    photography: Photography,
    tutorial: Tutorial,
    narration: NarrationPlayer,
    match_state: MatchState,
    pending: Vec<Command>,
    events: Vec<Event>,
}

impl Simulation {
    pub(crate) fn new(config: &GameConfig, seed: u64) -> Result<Self> {
        let world = World::with_tuning(&config.puzzle, seed)?;
        Ok(Self {
            world,
            controls: Controls::new(config.controls()),
            objectives: Objectives::default(),
            photography: Photography::new(config.photography()),
            tutorial: Tutorial::new(config.tutorial()),
            narration: NarrationPlayer::default(),
            match_state: MatchState::default(),
            pending: Vec::new(),
            events: Vec::new(),
        })
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Translates one frame of input into commands and runs them to quiescence.
    pub(crate) fn advance(&mut self, dt: Duration, input: &FrameInput) {
        self.pending.extend(
            input
                .loaded_controls
                .iter()
                .map(|control| Command::RegisterControl { control: *control }),
        );
        if input.pointer_left {
            self.pending.push(Command::PointerLeave);
        } else {
            self.pending.push(Command::SetHovered {
                control: input.hovered,
            });
        }
        if let Some(direction) = input.scroll {
            self.pending.push(Command::Scroll { direction });
        }
        if input.pointer_down {
            self.pending.push(Command::PointerDown);
        }
        if input.pointer_up {
            self.pending.push(Command::PointerUp);
        }
        self.pending.push(Command::Tick { dt });

        self.pump();
    }

    fn pump(&mut self) {
        let mut rounds = 0;
        while !self.pending.is_empty() {
            if rounds == MAX_ROUNDS_PER_FRAME {
                warn!(
                    "dropping {} commands that did not settle within one frame",
                    self.pending.len()
                );
                self.pending.clear();
                break;
            }
            rounds += 1;

            self.events.clear();
            for command in self.pending.drain(..) {
                world::apply(&mut self.world, command, &mut self.events);
            }
            self.log_events();

            let mut next = Vec::new();
            self.controls.handle(
                &self.events,
                query::engine_powered(&self.world),
                &mut next,
            );

            let parameters = query::parameters(&self.world);
            let target = query::current_target(&self.world);
            self.match_state = self.objectives.handle(&parameters, &target, &mut next);
            let overlap = is_overlap(&parameters, &target);
            let target_index = query::target_index(&self.world);

            self.photography
                .handle(&self.events, overlap, target_index, &mut next);
            self.tutorial.handle(
                &self.events,
                &TutorialInputs {
                    match_state: self.match_state,
                    overlap,
                    target_index,
                },
                &mut next,
            );
            self.narration.handle(&self.events, &mut next);

            self.pending = next;
        }
    }

    fn log_events(&self) {
        for event in &self.events {
            match event {
                Event::CuePlayed { cue } => info!("cue {cue:?} ({})", cue.asset()),
                Event::PhotoRevealed { index } => info!("photo {index} pinned to the wall"),
                Event::TargetAdvanced { index } => info!("hunting nightmare {index}"),
                Event::TutorialStepChanged { step } => info!("tutorial step {step:?}"),
                Event::HostilityScheduled { grace } => {
                    info!("hostility scheduled after {:.0}s", grace.as_secs_f64());
                }
                Event::EnginePowerChanged { powered } => info!("engine powered: {powered}"),
                _ => {}
            }
        }
    }

    /// Copies the state the renderer needs into the scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let world = &self.world;
        scene.parameters = query::parameters(world);
        scene.distorted = query::distorted(world);
        scene.engine_powered = query::engine_powered(world);
        scene.angle_to_aim = self.match_state.angle_to_aim;
        scene.hovered = query::hovered(world);
        scene.hint = query::hint(world).cloned();
        scene.subtitle = self.narration.subtitle().map(str::to_owned);
        scene.revealed_photos = query::revealed_photos(world).iter().copied().collect();
        scene.nightmare_count = query::catalog(world).len();
        scene.ringing = self.tutorial.is_ringing();
    }

    pub(crate) fn scene(&self) -> Scene {
        let mut scene = Scene::new(
            query::parameters(&self.world),
            query::catalog(&self.world).len(),
        );
        self.populate_scene(&mut scene);
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haunted_dreams_core::{
        ClipId, ControlId, InitialParameters, ScrollDirection, Target, Tuning, TutorialStep,
    };

    fn simulation(tuning: Tuning) -> Simulation {
        let config = GameConfig {
            puzzle: tuning,
            ..GameConfig::default()
        };
        Simulation::new(&config, 7).expect("valid config")
    }

    fn frame(simulation: &mut Simulation, input: FrameInput) {
        simulation.advance(Duration::from_millis(16), &input);
    }

    fn wait(simulation: &mut Simulation, seconds: u32) {
        for _ in 0..seconds {
            simulation.advance(Duration::from_secs(1), &FrameInput::default());
        }
    }

    fn click(simulation: &mut Simulation, control: ControlId) {
        frame(
            simulation,
            FrameInput {
                hovered: Some(control),
                pointer_down: true,
                ..FrameInput::default()
            },
        );
        frame(
            simulation,
            FrameInput {
                hovered: Some(control),
                pointer_up: true,
                ..FrameInput::default()
            },
        );
    }

    #[test]
    fn first_frame_registers_loaded_controls() {
        let mut simulation = simulation(Tuning::default());
        frame(
            &mut simulation,
            FrameInput {
                loaded_controls: ControlId::ALL.to_vec(),
                ..FrameInput::default()
            },
        );
        assert_eq!(
            query::registered_controls(simulation.world()).len(),
            ControlId::ALL.len()
        );
        assert_eq!(query::tick_index(simulation.world()), 1);
    }

    #[test]
    fn aligned_parameters_snap_and_clear_distortion_within_one_frame() {
        let mut simulation = simulation(Tuning {
            initial: InitialParameters {
                amplitude: 1.0,
                frequency: 1.02,
                position_frequency: 3.0,
                angle: Some(5.1),
                ..InitialParameters::default()
            },
            nightmares: vec![Target::new(1.0, 1.02, 5.1)],
            ..Tuning::default()
        });
        frame(&mut simulation, FrameInput::default());

        let parameters = query::parameters(simulation.world());
        assert_eq!(parameters.position_frequency(), parameters.frequency());
        assert!(!query::distorted(simulation.world()));
        let scene = simulation.scene();
        assert_eq!(scene.angle_to_aim, Some(5.1));
        assert!(!scene.distorted);
    }

    #[test]
    fn photograph_of_overlapping_nightmare_advances_the_hunt() {
        let mut simulation = simulation(Tuning {
            initial: InitialParameters {
                amplitude: 1.0,
                frequency: 1.02,
                position_amplitude: 1.0,
                position_frequency: 1.02,
                angle: Some(5.1),
            },
            ..Tuning::default()
        });
        frame(
            &mut simulation,
            FrameInput {
                loaded_controls: ControlId::ALL.to_vec(),
                ..FrameInput::default()
            },
        );
        click(&mut simulation, ControlId::Photo);
        for _ in 0..300 {
            frame(&mut simulation, FrameInput::default());
        }

        assert_eq!(query::target_index(simulation.world()), 1);
        assert!(query::revealed_photos(simulation.world()).contains(&0));
        assert_eq!(simulation.scene().revealed_photos, vec![0]);
    }

    #[test]
    fn telephone_rings_and_intro_plays_after_answering() {
        let mut simulation = simulation(Tuning::default());
        frame(
            &mut simulation,
            FrameInput {
                loaded_controls: ControlId::ALL.to_vec(),
                ..FrameInput::default()
            },
        );
        for _ in 0..320 {
            frame(&mut simulation, FrameInput::default());
        }
        assert!(simulation.scene().ringing);

        click(&mut simulation, ControlId::Telephone);
        for _ in 0..70 {
            frame(&mut simulation, FrameInput::default());
        }
        assert!(!simulation.scene().ringing);
        assert!(query::active_narration(simulation.world()).is_some());
        assert_eq!(
            query::tutorial_step(simulation.world()),
            TutorialStep::Idle
        );
    }

    #[test]
    fn scrolling_into_the_lock_clears_the_hint_in_the_same_frame() {
        let mut simulation = simulation(Tuning {
            initial: InitialParameters {
                amplitude: 0.99,
                frequency: 1.02,
                ..InitialParameters::default()
            },
            ..Tuning::default()
        });
        frame(
            &mut simulation,
            FrameInput {
                loaded_controls: ControlId::ALL.to_vec(),
                ..FrameInput::default()
            },
        );
        wait(&mut simulation, 6);
        click(&mut simulation, ControlId::Telephone);
        wait(&mut simulation, 50);
        assert_eq!(
            query::tutorial_step(simulation.world()),
            TutorialStep::AwaitingPaperClick
        );

        click(&mut simulation, ControlId::PaperSheet);
        wait(&mut simulation, 10);
        assert_eq!(
            query::tutorial_step(simulation.world()),
            TutorialStep::AwaitingWaveMatch
        );
        assert!(query::hint(simulation.world()).is_some());

        simulation.advance(
            Duration::ZERO,
            &FrameInput {
                hovered: Some(ControlId::Amplitude),
                scroll: Some(ScrollDirection::Up),
                ..FrameInput::default()
            },
        );
        assert!(query::hint(simulation.world()).is_none());
        assert_eq!(
            query::active_narration(simulation.world()),
            Some(ClipId::new(5))
        );
    }
}
