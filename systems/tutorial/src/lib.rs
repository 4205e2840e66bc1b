#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tutorial sequencer gating progression through the cockpit.
//!
//! The sequencer rings the telephone, plays the intro narration once the
//! player answers, and then walks a fixed step table. Each step arms one
//! predicate and shows a hint; completing the predicate disarms it before
//! anything else happens and continues with either a narration clip or the
//! next step.

mod script;

use std::{collections::BTreeSet, time::Duration};

use haunted_dreams_core::{ClipId, Command, ControlId, Cue, Event, MatchState, TutorialStep};
use log::{debug, info, warn};

pub use script::clip_asset;
use script::{Condition, Continuation, Predicate, StepPlan};

/// Timing knobs for the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    ring_delay: Duration,
    answer_delay: Duration,
    poll_interval: Duration,
    load_grace: Duration,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// `load_grace` bounds how long a step waits for the controls it refers to
    /// before its hint is shown regardless and its press predicate accepts
    /// any press.
    #[must_use]
    pub const fn new(
        ring_delay: Duration,
        answer_delay: Duration,
        poll_interval: Duration,
        load_grace: Duration,
    ) -> Self {
        Self {
            ring_delay,
            answer_delay,
            poll_interval,
            load_grace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(5),
            Duration::from_secs(1),
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
    }
}

/// World conditions the polled predicates read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TutorialInputs {
    /// Latest match between the parameters and the current nightmare.
    pub match_state: MatchState,
    /// Whether the position wave overlaps the current nightmare.
    pub overlap: bool,
    /// Index of the nightmare currently being hunted.
    pub target_index: usize,
}

#[derive(Clone, Copy, Debug)]
struct Armed {
    step: TutorialStep,
    plan: StepPlan,
    elapsed: Duration,
    since_poll: Duration,
    hint_shown: bool,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Dormant { elapsed: Duration },
    Ringing { elapsed: Duration },
    Answered { elapsed: Duration },
    Narrating { clip: ClipId },
    Armed(Armed),
    Finished,
}

/// Pure system sequencing the telephone call, narration, and tutorial steps.
#[derive(Debug)]
pub struct Tutorial {
    config: Config,
    phase: Phase,
    step: TutorialStep,
    registered: BTreeSet<ControlId>,
}

impl Tutorial {
    /// Creates the sequencer in its dormant state.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            phase: Phase::Dormant {
                elapsed: Duration::ZERO,
            },
            step: TutorialStep::Idle,
            registered: BTreeSet::new(),
        }
    }

    /// Most recent step armed by the sequencer.
    #[must_use]
    pub fn step(&self) -> TutorialStep {
        self.step
    }

    /// Whether the telephone is ringing.
    #[must_use]
    pub fn is_ringing(&self) -> bool {
        matches!(self.phase, Phase::Ringing { .. })
    }

    /// Consumes world events and emits the commands that move the tutorial forward.
    pub fn handle(&mut self, events: &[Event], inputs: &TutorialInputs, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::ControlRegistered { control } => {
                    let _ = self.registered.insert(*control);
                    self.refresh_hint(out);
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, inputs, out),
                Event::ControlPressed { control } => self.on_press(*control, inputs, out),
                Event::Scrolled { .. } | Event::ParametersChanged { .. } => {
                    self.poll(inputs, out);
                }
                Event::NarrationFinished { clip } => self.on_narration_finished(*clip, out),
                _ => {}
            }
        }
    }

    fn advance(&mut self, dt: Duration, inputs: &TutorialInputs, out: &mut Vec<Command>) {
        match &mut self.phase {
            Phase::Dormant { elapsed } => {
                *elapsed = elapsed.saturating_add(dt);
                if *elapsed >= self.config.ring_delay {
                    info!("telephone ringing");
                    self.phase = Phase::Ringing {
                        elapsed: Duration::ZERO,
                    };
                    out.push(Command::PlayCue {
                        cue: Cue::RingtoneStart,
                    });
                }
            }
            Phase::Ringing { elapsed } => {
                *elapsed = elapsed.saturating_add(dt);
            }
            Phase::Answered { elapsed } => {
                *elapsed = elapsed.saturating_add(dt);
                if *elapsed >= self.config.answer_delay {
                    self.narrate(script::INTRO, out);
                }
            }
            Phase::Armed(armed) => {
                armed.elapsed = armed.elapsed.saturating_add(dt);
                armed.since_poll = armed.since_poll.saturating_add(dt);
                let poll_due = armed.since_poll >= self.config.poll_interval;
                if poll_due {
                    armed.since_poll = Duration::ZERO;
                }
                self.refresh_hint(out);
                if poll_due {
                    self.poll(inputs, out);
                }
            }
            Phase::Narrating { .. } | Phase::Finished => {}
        }
    }

    fn on_press(&mut self, control: Option<ControlId>, inputs: &TutorialInputs, out: &mut Vec<Command>) {
        match self.phase {
            Phase::Ringing { elapsed } => {
                if self.accepts_press(control, ControlId::Telephone, elapsed) {
                    info!("telephone answered");
                    self.phase = Phase::Answered {
                        elapsed: Duration::ZERO,
                    };
                    out.push(Command::PlayCue {
                        cue: Cue::RingtoneStop,
                    });
                }
            }
            Phase::Armed(armed) => match armed.plan.predicate {
                Predicate::Press(expected) => {
                    if self.accepts_press(control, expected, armed.elapsed) {
                        self.complete(out);
                    }
                }
                Predicate::Poll(_) => self.poll(inputs, out),
            },
            _ => {}
        }
    }

    fn accepts_press(&self, pressed: Option<ControlId>, expected: ControlId, waited: Duration) -> bool {
        if pressed == Some(expected) {
            return true;
        }
        if !self.registered.contains(&expected) && waited >= self.config.load_grace {
            warn!(
                "{} never loaded after {:?}; accepting press on {:?}",
                expected.label(),
                waited,
                pressed
            );
            return true;
        }
        false
    }

    fn poll(&mut self, inputs: &TutorialInputs, out: &mut Vec<Command>) {
        let Phase::Armed(armed) = self.phase else {
            return;
        };
        let Predicate::Poll(condition) = armed.plan.predicate else {
            return;
        };
        let satisfied = match condition {
            Condition::WaveLocked => inputs.match_state.amplitude_frequency_locked,
            Condition::HeadingAligned => inputs.match_state.angle_aligned,
            Condition::PositionOverlap => inputs.overlap,
            Condition::TargetAdvanced => inputs.target_index != 0,
        };
        if satisfied {
            self.complete(out);
        }
    }

    fn complete(&mut self, out: &mut Vec<Command>) {
        let Phase::Armed(armed) = std::mem::replace(&mut self.phase, Phase::Finished) else {
            return;
        };
        info!("tutorial step {:?} completed", armed.step);
        out.push(Command::ShowHint { hint: None });
        if armed.step.next() == Some(TutorialStep::Complete) {
            self.step = TutorialStep::Complete;
            out.push(Command::RecordTutorialStep {
                step: TutorialStep::Complete,
            });
        }
        self.follow(armed.plan.on_complete, out);
    }

    fn on_narration_finished(&mut self, clip: ClipId, out: &mut Vec<Command>) {
        match self.phase {
            Phase::Narrating { clip: active } if active == clip => {
                self.follow(script::after_clip(clip), out);
            }
            _ => debug!("narration {} finished outside the script", clip.get()),
        }
    }

    fn follow(&mut self, continuation: Continuation, out: &mut Vec<Command>) {
        match continuation {
            Continuation::Play(clip) => self.narrate(clip, out),
            Continuation::Arm(step) => self.arm(step, out),
            Continuation::Finish => {
                info!("tutorial finished");
                self.phase = Phase::Finished;
            }
        }
    }

    fn narrate(&mut self, clip: ClipId, out: &mut Vec<Command>) {
        let Some(clip_script) = script::clip(clip) else {
            warn!("clip {} is missing from the narration script", clip.get());
            self.phase = Phase::Finished;
            return;
        };
        debug!(
            "narrating clip {} ({})",
            clip.get(),
            clip_asset(clip).unwrap_or("unknown asset")
        );
        self.phase = Phase::Narrating { clip };
        out.push(Command::Narrate {
            clip,
            duration: clip_script.duration,
            subtitles: clip_script.subtitles,
        });
    }

    fn arm(&mut self, step: TutorialStep, out: &mut Vec<Command>) {
        let Some(plan) = script::plan(step) else {
            self.phase = Phase::Finished;
            return;
        };
        info!("tutorial step {step:?} armed");
        self.step = step;
        self.phase = Phase::Armed(Armed {
            step,
            plan,
            elapsed: Duration::ZERO,
            since_poll: Duration::ZERO,
            hint_shown: false,
        });
        out.push(Command::RecordTutorialStep { step });
        self.refresh_hint(out);
    }

    fn refresh_hint(&mut self, out: &mut Vec<Command>) {
        let Phase::Armed(armed) = &mut self.phase else {
            return;
        };
        if armed.hint_shown {
            return;
        }
        let registered = &self.registered;
        let all_loaded = armed
            .plan
            .controls
            .iter()
            .all(|control| registered.contains(control));
        if !all_loaded && armed.elapsed < self.config.load_grace {
            return;
        }
        if !all_loaded {
            warn!(
                "showing hint for {:?} before all of its controls loaded",
                armed.step
            );
        }
        armed.hint_shown = true;
        out.push(Command::ShowHint {
            hint: Some(armed.plan.hint(|control| registered.contains(&control))),
        });
    }
}

impl Default for Tutorial {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
