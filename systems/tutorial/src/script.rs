//! Narration clips and the tutorial step table.

use std::time::Duration;

use haunted_dreams_core::{ClipId, ControlId, SubtitleLine, TutorialHint, TutorialStep};

/// Number of narration clips in the script.
pub(crate) const CLIP_COUNT: u8 = 9;

/// First clip played once the telephone is answered.
pub(crate) const INTRO: ClipId = ClipId::new(0);

const CLIP_DURATIONS_MS: [u64; CLIP_COUNT as usize] =
    [9_000, 12_000, 11_000, 10_000, 9_000, 8_000, 8_000, 9_000, 12_000];

/// Audio asset backing a narration clip.
#[must_use]
pub fn clip_asset(clip: ClipId) -> Option<&'static str> {
    const ASSETS: [&str; CLIP_COUNT as usize] = [
        "sons/intro.mp3",
        "sons/tuto1.mp3",
        "sons/tuto2.mp3",
        "sons/tuto3.mp3",
        "sons/tuto4.mp3",
        "sons/tuto5.mp3",
        "sons/tuto6.mp3",
        "sons/tuto7.mp3",
        "sons/tuto8.mp3",
    ];
    ASSETS.get(usize::from(clip.get())).copied()
}

/// Playback description of one clip.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClipScript {
    pub(crate) duration: Duration,
    pub(crate) subtitles: Vec<SubtitleLine>,
}

pub(crate) fn clip(clip: ClipId) -> Option<ClipScript> {
    let duration = Duration::from_millis(*CLIP_DURATIONS_MS.get(usize::from(clip.get()))?);
    let subtitles = if clip == INTRO {
        // The greeting appears one second into the intro.
        vec![
            SubtitleLine::new("", Duration::from_secs(1)),
            SubtitleLine::new("Hello ??", Duration::from_secs(3)),
        ]
    } else {
        Vec::new()
    };
    Some(ClipScript {
        duration,
        subtitles,
    })
}

/// What happens once a clip or a step completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    Play(ClipId),
    Arm(TutorialStep),
    Finish,
}

pub(crate) fn after_clip(clip: ClipId) -> Continuation {
    match clip.get() {
        0..=2 => Continuation::Play(ClipId::new(clip.get() + 1)),
        3 => Continuation::Arm(TutorialStep::AwaitingPaperClick),
        4 => Continuation::Arm(TutorialStep::AwaitingWaveMatch),
        5 => Continuation::Arm(TutorialStep::AwaitingAngleMatch),
        6 => Continuation::Arm(TutorialStep::AwaitingPhotoClick),
        7 => Continuation::Play(ClipId::new(8)),
        _ => Continuation::Finish,
    }
}

/// World conditions polled by a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Condition {
    WaveLocked,
    HeadingAligned,
    PositionOverlap,
    TargetAdvanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Predicate {
    Press(ControlId),
    Poll(Condition),
}

/// One row of the step table.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StepPlan {
    pub(crate) predicate: Predicate,
    pub(crate) controls: &'static [ControlId],
    pub(crate) lines: &'static [&'static str],
    pub(crate) on_complete: Continuation,
}

impl StepPlan {
    pub(crate) fn hint(&self, visible: impl Fn(ControlId) -> bool) -> TutorialHint {
        TutorialHint {
            controls: self
                .controls
                .iter()
                .copied()
                .filter(|control| visible(*control))
                .collect(),
            lines: self.lines.iter().map(|line| (*line).to_owned()).collect(),
        }
    }
}

pub(crate) fn plan(step: TutorialStep) -> Option<StepPlan> {
    let plan = match step {
        TutorialStep::AwaitingPaperClick => StepPlan {
            predicate: Predicate::Press(ControlId::PaperSheet),
            controls: &[ControlId::PaperSheet],
            lines: &["Left click on the paper", "to see patient's info"],
            on_complete: Continuation::Play(ClipId::new(4)),
        },
        TutorialStep::AwaitingWaveMatch => StepPlan {
            predicate: Predicate::Poll(Condition::WaveLocked),
            controls: &[ControlId::Amplitude, ControlId::Frequency],
            lines: &["Scroll on the buttons", "to update wave's coord"],
            on_complete: Continuation::Play(ClipId::new(5)),
        },
        TutorialStep::AwaitingAngleMatch => StepPlan {
            predicate: Predicate::Poll(Condition::HeadingAligned),
            controls: &[ControlId::Left, ControlId::Right],
            lines: &[
                "Use the left/right arrows",
                "to turn the ship towards",
                "the dot",
            ],
            on_complete: Continuation::Arm(TutorialStep::AwaitingPositionOverlap),
        },
        TutorialStep::AwaitingPositionOverlap => StepPlan {
            predicate: Predicate::Poll(Condition::PositionOverlap),
            controls: &[ControlId::Up, ControlId::Down],
            lines: &["Use the up/down ", "arrows to update", "your position's wave"],
            on_complete: Continuation::Play(ClipId::new(6)),
        },
        TutorialStep::AwaitingPhotoClick => StepPlan {
            predicate: Predicate::Poll(Condition::TargetAdvanced),
            controls: &[ControlId::Photo],
            lines: &["Left click on button", "to take a photo"],
            on_complete: Continuation::Play(ClipId::new(7)),
        },
        TutorialStep::Idle | TutorialStep::Complete => return None,
    };
    Some(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_clip_has_an_asset_and_a_script() {
        for value in 0..CLIP_COUNT {
            let id = ClipId::new(value);
            assert!(clip_asset(id).is_some(), "clip {value} lacks an asset");
            assert!(clip(id).is_some(), "clip {value} lacks a script");
        }
        assert!(clip(ClipId::new(CLIP_COUNT)).is_none());
    }

    #[test]
    fn every_armed_step_has_a_plan() {
        let mut step = TutorialStep::Idle;
        while let Some(next) = step.next() {
            if next != TutorialStep::Complete {
                assert!(plan(next).is_some(), "{next:?} has no plan");
            }
            step = next;
        }
    }

    #[test]
    fn hints_carry_two_or_three_lines() {
        let mut step = TutorialStep::Idle;
        while let Some(next) = step.next() {
            if let Some(plan) = plan(next) {
                assert!((2..=3).contains(&plan.lines.len()));
            }
            step = next;
        }
    }
}
