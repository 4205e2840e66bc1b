#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that matches the tunable parameters against the current nightmare.

use haunted_dreams_core::{
    fixed_eq, Command, Cue, MatchState, ParameterState, Target, ANGLE_PRECISION, LOCK_PRECISION,
    OVERLAP_TOLERANCE,
};
use log::debug;

/// Compares the parameters with the nightmare at fixed decimal precision.
#[must_use]
pub fn evaluate(parameters: &ParameterState, target: &Target) -> MatchState {
    let amplitude_frequency_locked =
        fixed_eq(parameters.amplitude(), target.amplitude, LOCK_PRECISION)
            && fixed_eq(parameters.frequency(), target.frequency, LOCK_PRECISION);

    let angle_to_aim = amplitude_frequency_locked.then_some(target.angle);
    let angle_aligned = angle_to_aim
        .map(|aim| fixed_eq(parameters.angle(), aim, ANGLE_PRECISION))
        .unwrap_or(false);

    MatchState {
        amplitude_frequency_locked,
        angle_to_aim,
        angle_aligned,
    }
}

/// Reports whether the ship's position wave sits on top of the nightmare.
#[must_use]
pub fn is_overlap(parameters: &ParameterState, target: &Target) -> bool {
    (parameters.position_amplitude() - target.amplitude).abs() < OVERLAP_TOLERANCE
        && (parameters.position_frequency() - target.frequency).abs() < OVERLAP_TOLERANCE
}

/// Reacts to match transitions: discovery cue, frequency snap, distortion.
#[derive(Debug, Default)]
pub struct Objectives {
    discovery_played: bool,
    requested_distortion: Option<bool>,
}

impl Objectives {
    /// Evaluates the parameters and emits the commands the match state implies.
    pub fn handle(
        &mut self,
        parameters: &ParameterState,
        target: &Target,
        out: &mut Vec<Command>,
    ) -> MatchState {
        let state = evaluate(parameters, target);

        if state.amplitude_frequency_locked {
            if !self.discovery_played {
                self.discovery_played = true;
                debug!(
                    "locked onto nightmare A={:.2} f={:.2}",
                    target.amplitude, target.frequency
                );
                out.push(Command::PlayCue {
                    cue: Cue::Discovery,
                });
            }
        } else {
            self.discovery_played = false;
        }

        if state.angle_aligned && parameters.position_frequency() != parameters.frequency() {
            out.push(Command::SnapPositionFrequency);
        }

        let distorted = !state.angle_aligned;
        if self.requested_distortion != Some(distorted) {
            self.requested_distortion = Some(distorted);
            out.push(Command::SetDistorted { distorted });
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameters(amplitude: f64, frequency: f64, angle: f64) -> ParameterState {
        ParameterState::new(
            ParameterState::AMPLITUDE_RANGE,
            ParameterState::FREQUENCY_RANGE,
            amplitude,
            frequency,
            0.1,
            1.0,
            angle,
        )
    }

    #[test]
    fn lock_uses_two_decimals() {
        let target = Target::new(1.00, 1.02, 5.10);
        assert!(evaluate(&parameters(1.004, 1.02, 0.0), &target).amplitude_frequency_locked);
        assert!(!evaluate(&parameters(1.006, 1.02, 0.0), &target).amplitude_frequency_locked);
    }

    #[test]
    fn alignment_uses_one_decimal() {
        let target = Target::new(1.00, 1.02, 5.10);
        assert!(evaluate(&parameters(1.0, 1.02, 5.14), &target).angle_aligned);
        assert!(!evaluate(&parameters(1.0, 1.02, 5.16), &target).angle_aligned);
    }

    #[test]
    fn aim_is_hidden_until_locked() {
        let target = Target::new(1.00, 1.02, 5.10);
        let state = evaluate(&parameters(0.5, 1.02, 5.10), &target);
        assert_eq!(state, MatchState::default());
    }

    #[test]
    fn overlap_is_strict() {
        let target = Target::new(0.12, 1.0, 1.2);
        let start = parameters(0.5, 1.0, 0.0);
        assert!(!is_overlap(&start, &target));

        let mut near = start;
        near.adjust_position_amplitude(0.0225);
        assert!(is_overlap(&near, &target));
        assert_eq!(is_overlap(&near, &target), is_overlap(&near, &target));
    }

    #[test]
    fn distortion_is_requested_once_per_change() {
        let mut objectives = Objectives::default();
        let target = Target::new(1.00, 1.02, 5.10);
        let mut out = Vec::new();
        let _ = objectives.handle(&parameters(0.5, 2.0, 0.0), &target, &mut out);
        let _ = objectives.handle(&parameters(0.5, 2.0, 0.0), &target, &mut out);
        assert_eq!(out, vec![Command::SetDistorted { distorted: true }]);
    }
}
