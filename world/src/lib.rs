#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Haunted Dreams.
//!
//! The world owns the tunable parameters, the nightmare catalog, and every
//! piece of interaction state the cockpit exposes. It mutates only through
//! [`apply`] and reports each observable change as an [`Event`].

use std::{collections::BTreeSet, time::Duration};

use haunted_dreams_core::{
    ClipId, Command, ControlId, Event, ParameterState, TargetCatalog, TutorialHint, TutorialStep,
    Tuning, TuningError, FULL_TURN, WELCOME_BANNER,
};
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_SEED: u64 = 0x6861_756e_7465_6421;

/// Represents the authoritative Haunted Dreams session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    parameters: ParameterState,
    catalog: TargetCatalog,
    distorted: bool,
    engine_powered: bool,
    hovered: Option<ControlId>,
    registered: BTreeSet<ControlId>,
    pointer_held: bool,
    revealed_photos: BTreeSet<usize>,
    narration: Option<ClipId>,
    hint: Option<TutorialHint>,
    tutorial_step: TutorialStep,
    hostility_grace: Option<Duration>,
    tick_index: u64,
}

impl World {
    /// Creates a session with the built-in tuning and a fixed heading seed.
    #[must_use]
    pub fn new() -> Self {
        let tuning = Tuning::default();
        let parameters = ParameterState::new(
            tuning.amplitude,
            tuning.frequency,
            tuning.initial.amplitude,
            tuning.initial.frequency,
            tuning.initial.position_amplitude,
            tuning.initial.position_frequency,
            initial_heading(DEFAULT_SEED),
        );
        Self::from_parts(parameters, TargetCatalog::default())
    }

    /// Creates a session from validated tuning, drawing the heading from `seed`
    /// unless the tuning fixes one.
    pub fn with_tuning(tuning: &Tuning, seed: u64) -> Result<Self, TuningError> {
        let parameters = tuning.parameter_state(initial_heading(seed))?;
        let catalog = tuning.catalog()?;
        Ok(Self::from_parts(parameters, catalog))
    }

    fn from_parts(parameters: ParameterState, catalog: TargetCatalog) -> Self {
        Self {
            banner: WELCOME_BANNER,
            parameters,
            catalog,
            distorted: true,
            engine_powered: true,
            hovered: None,
            registered: BTreeSet::new(),
            pointer_held: false,
            revealed_photos: BTreeSet::new(),
            narration: None,
            hint: None,
            tutorial_step: TutorialStep::Idle,
            hostility_grace: None,
            tick_index: 0,
        }
    }

    fn mutate_parameters(
        &mut self,
        mutation: impl FnOnce(&mut ParameterState),
        out_events: &mut Vec<Event>,
    ) {
        let before = self.parameters;
        mutation(&mut self.parameters);
        if self.parameters != before {
            out_events.push(Event::ParametersChanged {
                parameters: self.parameters,
            });
        }
    }

    fn set_hovered(&mut self, control: Option<ControlId>, out_events: &mut Vec<Event>) {
        if self.hovered != control {
            self.hovered = control;
            out_events.push(Event::HoverChanged { control });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_heading(seed: u64) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.gen_range(0.0..FULL_TURN)
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::RegisterControl { control } => {
            if world.registered.insert(control) {
                out_events.push(Event::ControlRegistered { control });
            }
        }
        Command::SetHovered { control } => {
            let control = control.filter(|candidate| world.registered.contains(candidate));
            world.set_hovered(control, out_events);
        }
        Command::PointerDown => {
            world.pointer_held = true;
            out_events.push(Event::ControlPressed {
                control: world.hovered,
            });
        }
        Command::PointerUp => {
            if world.pointer_held {
                world.pointer_held = false;
                out_events.push(Event::PointerReleased);
            }
        }
        Command::PointerLeave => {
            if world.pointer_held {
                world.pointer_held = false;
                out_events.push(Event::PointerReleased);
            }
            world.set_hovered(None, out_events);
        }
        Command::Scroll { direction } => {
            out_events.push(Event::Scrolled {
                control: world.hovered,
                direction,
            });
        }
        Command::AdjustAmplitude { delta } => {
            world.mutate_parameters(|parameters| parameters.adjust_amplitude(delta), out_events);
        }
        Command::AdjustFrequency { delta } => {
            world.mutate_parameters(|parameters| parameters.adjust_frequency(delta), out_events);
        }
        Command::AdjustPositionAmplitude { delta } => {
            world.mutate_parameters(
                |parameters| parameters.adjust_position_amplitude(delta),
                out_events,
            );
        }
        Command::AdjustAngle { delta } => {
            world.mutate_parameters(|parameters| parameters.adjust_angle(delta), out_events);
        }
        Command::SnapPositionFrequency => {
            world.mutate_parameters(ParameterState::snap_position_frequency, out_events);
        }
        Command::SetDistorted { distorted } => {
            if world.distorted != distorted {
                world.distorted = distorted;
                out_events.push(Event::DistortionChanged { distorted });
            }
        }
        Command::AdvanceTarget => {
            if world.catalog.advance() {
                out_events.push(Event::TargetAdvanced {
                    index: world.catalog.index(),
                });
            } else {
                debug!(
                    "nightmare {} is the last one; advance ignored",
                    world.catalog.index()
                );
            }
        }
        Command::RevealPhoto { index } => {
            if index >= world.catalog.len() {
                warn!("photo {index} does not match any nightmare");
            } else if world.revealed_photos.insert(index) {
                out_events.push(Event::PhotoRevealed { index });
            }
        }
        Command::PlayCue { cue } => {
            out_events.push(Event::CuePlayed { cue });
        }
        Command::Narrate {
            clip,
            duration,
            subtitles,
        } => {
            if let Some(active) = world.narration.replace(clip) {
                debug!(
                    "clip {} interrupted by clip {}",
                    active.get(),
                    clip.get()
                );
            }
            out_events.push(Event::NarrationStarted {
                clip,
                duration,
                subtitles,
            });
        }
        Command::CompleteNarration { clip } => {
            if world.narration == Some(clip) {
                world.narration = None;
                out_events.push(Event::NarrationFinished { clip });
            } else {
                warn!(
                    "completion for clip {} ignored; active clip is {:?}",
                    clip.get(),
                    world.narration.map(|active| active.get())
                );
            }
        }
        Command::ShowHint { hint } => {
            if world.hint != hint {
                world.hint = hint.clone();
                out_events.push(Event::HintChanged { hint });
            }
        }
        Command::RecordTutorialStep { step } => {
            if step > world.tutorial_step {
                world.tutorial_step = step;
                out_events.push(Event::TutorialStepChanged { step });
            } else {
                debug!(
                    "tutorial step {step:?} ignored; already at {:?}",
                    world.tutorial_step
                );
            }
        }
        Command::ScheduleHostility { grace } => {
            world.hostility_grace = Some(grace);
            out_events.push(Event::HostilityScheduled { grace });
        }
        Command::SetEnginePower { powered } => {
            if world.engine_powered != powered {
                world.engine_powered = powered;
                out_events.push(Event::EnginePowerChanged { powered });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::BTreeSet, time::Duration};

    use super::World;
    use haunted_dreams_core::{
        ClipId, ControlId, ParameterState, Target, TargetCatalog, TutorialHint, TutorialStep,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Snapshot of the tunable parameters.
    #[must_use]
    pub fn parameters(world: &World) -> ParameterState {
        world.parameters
    }

    /// Provides read-only access to the nightmare catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &TargetCatalog {
        &world.catalog
    }

    /// Nightmare currently being hunted.
    #[must_use]
    pub fn current_target(world: &World) -> Target {
        *world.catalog.current()
    }

    /// Progress key: zero-based index of the current nightmare.
    #[must_use]
    pub fn target_index(world: &World) -> usize {
        world.catalog.index()
    }

    /// Whether the position wave renders as noise.
    #[must_use]
    pub fn distorted(world: &World) -> bool {
        world.distorted
    }

    /// Whether the ship engine is running.
    #[must_use]
    pub fn engine_powered(world: &World) -> bool {
        world.engine_powered
    }

    /// Control under the pointer, if any.
    #[must_use]
    pub fn hovered(world: &World) -> Option<ControlId> {
        world.hovered
    }

    /// Whether the host reported the control as loaded.
    #[must_use]
    pub fn is_registered(world: &World, control: ControlId) -> bool {
        world.registered.contains(&control)
    }

    /// Controls the host reported as loaded.
    #[must_use]
    pub fn registered_controls(world: &World) -> &BTreeSet<ControlId> {
        &world.registered
    }

    /// Whether the primary pointer button is held down.
    #[must_use]
    pub fn pointer_held(world: &World) -> bool {
        world.pointer_held
    }

    /// Catalog indices of the photographs pinned to the wall.
    #[must_use]
    pub fn revealed_photos(world: &World) -> &BTreeSet<usize> {
        &world.revealed_photos
    }

    /// Narration clip currently playing, if any.
    #[must_use]
    pub fn active_narration(world: &World) -> Option<ClipId> {
        world.narration
    }

    /// Tutorial hint currently displayed, if any.
    #[must_use]
    pub fn hint(world: &World) -> Option<&TutorialHint> {
        world.hint.as_ref()
    }

    /// Furthest tutorial step reached.
    #[must_use]
    pub fn tutorial_step(world: &World) -> TutorialStep {
        world.tutorial_step
    }

    /// Grace period of the most recent hostility request.
    #[must_use]
    pub fn hostility_grace(world: &World) -> Option<Duration> {
        world.hostility_grace
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
