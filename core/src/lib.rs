#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Haunted Dreams puzzle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, read immutable
//! snapshots such as [`ParameterState`], and respond exclusively with new
//! command batches.

mod puzzle;
mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use puzzle::{
    fixed_eq, normalize_angle, to_fixed, CatalogError, MatchState, ParameterRange,
    ParameterState, Target, TargetCatalog, ANGLE_PRECISION, FULL_TURN, LOCK_PRECISION,
    OVERLAP_TOLERANCE,
};
pub use tuning::{InitialParameters, Tuning, TuningError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Haunted Dreams. Stay near the telephone.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports that the host finished loading the object backing a control.
    RegisterControl {
        /// Control whose object became available for hover tests.
        control: ControlId,
    },
    /// Records the control currently under the pointer, if any.
    SetHovered {
        /// Control returned by the host's pick test.
        control: Option<ControlId>,
    },
    /// Primary pointer button went down.
    PointerDown,
    /// Primary pointer button went up.
    PointerUp,
    /// Pointer left the rendering surface.
    PointerLeave,
    /// Scroll wheel moved by one notch.
    Scroll {
        /// Sign of the wheel movement.
        direction: ScrollDirection,
    },
    /// Adds the delta to the tunable amplitude.
    AdjustAmplitude {
        /// Signed amount added before clamping.
        delta: f64,
    },
    /// Adds the delta to the tunable frequency.
    AdjustFrequency {
        /// Signed amount added before clamping.
        delta: f64,
    },
    /// Adds the delta to the ship's position amplitude.
    AdjustPositionAmplitude {
        /// Signed amount added before clamping.
        delta: f64,
    },
    /// Rotates the ship heading by the delta, in radians.
    AdjustAngle {
        /// Signed rotation applied before wrapping.
        delta: f64,
    },
    /// Re-synchronises the position frequency with the tunable frequency.
    SnapPositionFrequency,
    /// Toggles the noisy rendering of the position wave.
    SetDistorted {
        /// Whether the position wave should render as noise.
        distorted: bool,
    },
    /// Moves the catalog cursor to the next nightmare.
    AdvanceTarget,
    /// Pins the photograph taken of the nightmare at the provided index.
    RevealPhoto {
        /// Catalog index of the photographed nightmare.
        index: usize,
    },
    /// Requests a one-shot sound cue from the audio collaborator.
    PlayCue {
        /// Cue that should be played.
        cue: Cue,
    },
    /// Starts a narration clip with its subtitles.
    Narrate {
        /// Identifier of the narration clip.
        clip: ClipId,
        /// Playback length of the clip.
        duration: Duration,
        /// Subtitle lines displayed in sequence while the clip plays.
        subtitles: Vec<SubtitleLine>,
    },
    /// Reports that the narration collaborator finished playing a clip.
    CompleteNarration {
        /// Clip that finished.
        clip: ClipId,
    },
    /// Replaces the tutorial hint overlay.
    ShowHint {
        /// Hint to display, or `None` to clear the overlay.
        hint: Option<TutorialHint>,
    },
    /// Records the tutorial step reached by the sequencer.
    RecordTutorialStep {
        /// Step that became active.
        step: TutorialStep,
    },
    /// Asks the hostility collaborator to arm its timers.
    ScheduleHostility {
        /// Grace period granted before hostilities begin.
        grace: Duration,
    },
    /// Powers the ship engine on or off.
    SetEnginePower {
        /// Desired engine state.
        powered: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a control's backing object finished loading.
    ControlRegistered {
        /// Control that became available.
        control: ControlId,
    },
    /// Announces that the hovered control changed.
    HoverChanged {
        /// Control now under the pointer, if any.
        control: Option<ControlId>,
    },
    /// Reports a primary pointer press.
    ControlPressed {
        /// Control hovered when the press happened, if any.
        control: Option<ControlId>,
    },
    /// Reports that the pointer press ended, either by release or by leaving the surface.
    PointerReleased,
    /// Reports a scroll notch.
    Scrolled {
        /// Control hovered when the wheel moved, if any.
        control: Option<ControlId>,
        /// Sign of the wheel movement.
        direction: ScrollDirection,
    },
    /// Confirms that the tunable parameters changed.
    ParametersChanged {
        /// Snapshot captured after the mutation.
        parameters: ParameterState,
    },
    /// Confirms that the distortion flag flipped.
    DistortionChanged {
        /// New value of the flag.
        distorted: bool,
    },
    /// Confirms that the catalog cursor moved.
    TargetAdvanced {
        /// Index of the nightmare that became current.
        index: usize,
    },
    /// Confirms that a photograph was pinned to the wall.
    PhotoRevealed {
        /// Catalog index of the photographed nightmare.
        index: usize,
    },
    /// Forwards a sound cue to the audio collaborator.
    CuePlayed {
        /// Cue to play.
        cue: Cue,
    },
    /// Announces that a narration clip started.
    NarrationStarted {
        /// Identifier of the narration clip.
        clip: ClipId,
        /// Playback length of the clip.
        duration: Duration,
        /// Subtitle lines displayed in sequence while the clip plays.
        subtitles: Vec<SubtitleLine>,
    },
    /// Announces that the active narration clip finished.
    NarrationFinished {
        /// Clip that finished.
        clip: ClipId,
    },
    /// Announces that the tutorial hint overlay changed.
    HintChanged {
        /// Hint now displayed, if any.
        hint: Option<TutorialHint>,
    },
    /// Announces that the tutorial advanced to a new step.
    TutorialStepChanged {
        /// Step that became active.
        step: TutorialStep,
    },
    /// Forwards a hostility request to the hostility collaborator.
    HostilityScheduled {
        /// Grace period granted before hostilities begin.
        grace: Duration,
    },
    /// Announces that the engine changed power state.
    EnginePowerChanged {
        /// New engine state.
        powered: bool,
    },
}

/// Interactive objects of the ship cockpit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ControlId {
    /// Scroll knob tuning the amplitude.
    Amplitude,
    /// Scroll knob tuning the frequency.
    Frequency,
    /// Arrow raising the position amplitude.
    Up,
    /// Arrow lowering the position amplitude.
    Down,
    /// Arrow turning the ship counter-clockwise.
    Left,
    /// Arrow turning the ship clockwise.
    Right,
    /// Camera button.
    Photo,
    /// Engine power switch.
    Motor,
    /// Cockpit telephone.
    Telephone,
    /// Patient file lying on the console.
    PaperSheet,
}

impl ControlId {
    /// Every control, in cockpit layout order.
    pub const ALL: [ControlId; 10] = [
        ControlId::Amplitude,
        ControlId::Frequency,
        ControlId::Up,
        ControlId::Down,
        ControlId::Left,
        ControlId::Right,
        ControlId::Photo,
        ControlId::Motor,
        ControlId::Telephone,
        ControlId::PaperSheet,
    ];

    /// Looks up the behavior bound to the control.
    #[must_use]
    pub const fn behavior(self) -> ControlBehavior {
        match self {
            Self::Amplitude => ControlBehavior::Tune(TuningAxis::Amplitude),
            Self::Frequency => ControlBehavior::Tune(TuningAxis::Frequency),
            Self::Up => ControlBehavior::Steer(SteerDirection::Up),
            Self::Down => ControlBehavior::Steer(SteerDirection::Down),
            Self::Left => ControlBehavior::Steer(SteerDirection::Left),
            Self::Right => ControlBehavior::Steer(SteerDirection::Right),
            Self::Photo => ControlBehavior::Photograph,
            Self::Motor => ControlBehavior::ToggleEngine,
            Self::Telephone => ControlBehavior::AnswerPhone,
            Self::PaperSheet => ControlBehavior::Inspect,
        }
    }

    /// Short label printed on the control.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amplitude => "A",
            Self::Frequency => "f",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Photo => "Photo",
            Self::Motor => "Engine",
            Self::Telephone => "Phone",
            Self::PaperSheet => "Paper",
        }
    }
}

/// What pressing, scrolling, or holding a control does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlBehavior {
    /// Scrolling tunes one of the wave parameters.
    Tune(TuningAxis),
    /// Holding the pointer steers the ship.
    Steer(SteerDirection),
    /// Pressing takes a photograph.
    Photograph,
    /// Pressing toggles the engine.
    ToggleEngine,
    /// Pressing answers the telephone.
    AnswerPhone,
    /// Pressing opens a document.
    Inspect,
}

/// Wave parameter tuned by a scroll knob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TuningAxis {
    /// Tunable amplitude.
    Amplitude,
    /// Tunable frequency.
    Frequency,
}

/// Direction applied while a steering arrow is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SteerDirection {
    /// Raises the position amplitude.
    Up,
    /// Lowers the position amplitude.
    Down,
    /// Increases the heading.
    Left,
    /// Decreases the heading.
    Right,
}

/// Sign of a scroll wheel notch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Wheel moved away from the player; increments the tuned value.
    Up,
    /// Wheel moved toward the player; decrements the tuned value.
    Down,
}

impl ScrollDirection {
    /// Classifies a raw wheel delta, where negative values scroll up.
    #[must_use]
    pub fn from_wheel_delta(delta_y: f32) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::Up)
        } else if delta_y > 0.0 {
            Some(Self::Down)
        } else {
            None
        }
    }

    /// Multiplier applied to the scroll step.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// One-shot sound cues requested from the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Beep played when amplitude and frequency lock onto a nightmare.
    Discovery,
    /// Camera shutter.
    PhotoShutter,
    /// Thumb tack pinning a successful photograph.
    PhotoPinned,
    /// Paper ripping after a photograph of an empty dream.
    DreamTorn,
    /// Telephone starts ringing.
    RingtoneStart,
    /// Telephone stops ringing.
    RingtoneStop,
}

impl Cue {
    /// Audio asset backing the cue.
    #[must_use]
    pub const fn asset(self) -> &'static str {
        match self {
            Self::Discovery => "sons/beep.mp3",
            Self::PhotoShutter => "sons/photo.mp3",
            Self::PhotoPinned => "sons/thumb-tack.mp3",
            Self::DreamTorn => "sons/paper-ripping.mp3",
            Self::RingtoneStart | Self::RingtoneStop => "sons/ringtone.mp3",
        }
    }
}

/// Identifier of a narration clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(u8);

impl ClipId {
    /// Creates a new clip identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Subtitle line shown while narration plays.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubtitleLine {
    /// Text displayed to the player.
    pub text: String,
    /// How long the line stays on screen.
    pub duration: Duration,
}

impl SubtitleLine {
    /// Creates a subtitle line.
    #[must_use]
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            duration,
        }
    }
}

/// Floating tutorial instructions attached to highlighted controls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TutorialHint {
    /// Controls drawn with the tutorial highlight.
    pub controls: Vec<ControlId>,
    /// Instruction lines displayed next to the controls.
    pub lines: Vec<String>,
}

/// Ordered steps of the tutorial.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TutorialStep {
    /// Telephone has not been answered or the intro is still playing.
    #[default]
    Idle,
    /// Waiting for the player to click the patient file.
    AwaitingPaperClick,
    /// Waiting for amplitude and frequency to lock.
    AwaitingWaveMatch,
    /// Waiting for the heading to align with the aim.
    AwaitingAngleMatch,
    /// Waiting for the position wave to overlap the nightmare.
    AwaitingPositionOverlap,
    /// Waiting for the first successful photograph.
    AwaitingPhotoClick,
    /// Tutorial finished.
    Complete,
}

impl TutorialStep {
    /// Step that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::AwaitingPaperClick),
            Self::AwaitingPaperClick => Some(Self::AwaitingWaveMatch),
            Self::AwaitingWaveMatch => Some(Self::AwaitingAngleMatch),
            Self::AwaitingAngleMatch => Some(Self::AwaitingPositionOverlap),
            Self::AwaitingPositionOverlap => Some(Self::AwaitingPhotoClick),
            Self::AwaitingPhotoClick => Some(Self::Complete),
            Self::Complete => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClipId, ControlBehavior, ControlId, Cue, ScrollDirection, TutorialStep};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn control_id_round_trips_through_bincode() {
        assert_round_trip(&ControlId::PaperSheet);
    }

    #[test]
    fn clip_id_round_trips_through_bincode() {
        assert_round_trip(&ClipId::new(7));
    }

    #[test]
    fn cue_round_trips_through_bincode() {
        assert_round_trip(&Cue::DreamTorn);
    }

    #[test]
    fn every_steering_arrow_maps_to_a_steer_behavior() {
        let steering: Vec<ControlId> = ControlId::ALL
            .into_iter()
            .filter(|control| matches!(control.behavior(), ControlBehavior::Steer(_)))
            .collect();
        assert_eq!(
            steering,
            vec![ControlId::Up, ControlId::Down, ControlId::Left, ControlId::Right]
        );
    }

    #[test]
    fn wheel_delta_sign_selects_direction() {
        assert_eq!(
            ScrollDirection::from_wheel_delta(-120.0),
            Some(ScrollDirection::Up)
        );
        assert_eq!(
            ScrollDirection::from_wheel_delta(3.0),
            Some(ScrollDirection::Down)
        );
        assert_eq!(ScrollDirection::from_wheel_delta(0.0), None);
    }

    #[test]
    fn tutorial_steps_advance_strictly_forward() {
        let mut step = TutorialStep::Idle;
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            assert!(next > step, "steps must only move forward");
            step = next;
            visited.push(step);
        }
        assert_eq!(visited.len(), 7);
        assert_eq!(step, TutorialStep::Complete);
    }
}
