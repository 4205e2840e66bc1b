//! Designer-facing knobs for the puzzle: parameter ranges, starting values, and nightmares.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::{
    normalize_angle, CatalogError, ParameterRange, ParameterState, Target, TargetCatalog,
};

/// Reasons a tuning table is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// The minimum of a range exceeds its maximum.
    #[error("{parameter} range is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// A range bound, starting value, or nightmare field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A nightmare sits where the tunable parameters can never reach.
    #[error("{field} {value} lies outside the configured range [{min}, {max}]")]
    TargetOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Configured nightmare value.
        value: f64,
        /// Lower bound of the matching range.
        min: f64,
        /// Upper bound of the matching range.
        max: f64,
    },
    /// The nightmare catalog is empty.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Values the parameters hold when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialParameters {
    /// Starting tunable amplitude.
    pub amplitude: f64,
    /// Starting tunable frequency.
    pub frequency: f64,
    /// Starting amplitude of the position wave.
    pub position_amplitude: f64,
    /// Starting frequency of the position wave.
    pub position_frequency: f64,
    /// Fixed starting heading; a seeded random heading is used when absent.
    pub angle: Option<f64>,
}

impl Default for InitialParameters {
    fn default() -> Self {
        Self {
            amplitude: 0.01,
            frequency: 1.0,
            position_amplitude: 0.1,
            position_frequency: 1.0,
            angle: None,
        }
    }
}

/// Complete puzzle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Bounds for the tunable and position amplitudes.
    pub amplitude: ParameterRange,
    /// Bounds for the tunable and position frequencies.
    pub frequency: ParameterRange,
    /// Starting parameter values.
    pub initial: InitialParameters,
    /// Nightmares in hunting order.
    pub nightmares: Vec<Target>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            amplitude: ParameterState::AMPLITUDE_RANGE,
            frequency: ParameterState::FREQUENCY_RANGE,
            initial: InitialParameters::default(),
            nightmares: TargetCatalog::built_in_targets(),
        }
    }
}

impl Tuning {
    /// Checks that every range is ordered, every number is finite, and every
    /// nightmare can be reached by the tunable parameters.
    pub fn validate(&self) -> Result<(), TuningError> {
        validate_range("amplitude", self.amplitude)?;
        validate_range("frequency", self.frequency)?;

        finite("initial.amplitude", self.initial.amplitude)?;
        finite("initial.frequency", self.initial.frequency)?;
        finite("initial.position_amplitude", self.initial.position_amplitude)?;
        finite("initial.position_frequency", self.initial.position_frequency)?;
        if let Some(angle) = self.initial.angle {
            finite("initial.angle", angle)?;
        }

        if self.nightmares.is_empty() {
            return Err(CatalogError::Empty.into());
        }
        for nightmare in &self.nightmares {
            finite("nightmares.amplitude", nightmare.amplitude)?;
            finite("nightmares.frequency", nightmare.frequency)?;
            finite("nightmares.angle", nightmare.angle)?;
            reachable("nightmares.amplitude", nightmare.amplitude, self.amplitude)?;
            reachable("nightmares.frequency", nightmare.frequency, self.frequency)?;
        }
        Ok(())
    }

    /// Builds the starting parameters, using `random_angle` when no heading is configured.
    pub fn parameter_state(&self, random_angle: f64) -> Result<ParameterState, TuningError> {
        self.validate()?;
        let angle = self.initial.angle.unwrap_or(random_angle);
        Ok(ParameterState::new(
            self.amplitude,
            self.frequency,
            self.initial.amplitude,
            self.initial.frequency,
            self.initial.position_amplitude,
            self.initial.position_frequency,
            normalize_angle(if angle.is_finite() { angle } else { 0.0 }),
        ))
    }

    /// Builds the nightmare catalog, positioned at its first entry.
    pub fn catalog(&self) -> Result<TargetCatalog, TuningError> {
        self.validate()?;
        Ok(TargetCatalog::new(self.nightmares.clone())?)
    }
}

fn validate_range(parameter: &'static str, range: ParameterRange) -> Result<(), TuningError> {
    finite(parameter, range.min)?;
    finite(parameter, range.max)?;
    if range.min > range.max {
        return Err(TuningError::InvertedRange {
            parameter,
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

fn reachable(field: &'static str, value: f64, range: ParameterRange) -> Result<(), TuningError> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(TuningError::TargetOutOfRange {
            field,
            value,
            min: range.min,
            max: range.max,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NonFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let tuning = Tuning {
            frequency: ParameterRange::new(10.0, 1.0),
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::InvertedRange {
                parameter: "frequency",
                min: 10.0,
                max: 1.0,
            })
        );
    }

    #[test]
    fn empty_nightmare_table_is_rejected() {
        let tuning = Tuning {
            nightmares: Vec::new(),
            ..Tuning::default()
        };
        assert_eq!(
            tuning.catalog(),
            Err(TuningError::Catalog(CatalogError::Empty))
        );
    }

    #[test]
    fn configured_angle_overrides_random_heading() {
        let tuning = Tuning {
            initial: InitialParameters {
                angle: Some(2.5),
                ..InitialParameters::default()
            },
            ..Tuning::default()
        };
        let state = tuning.parameter_state(4.0).expect("valid tuning");
        assert_eq!(state.angle(), 2.5);
    }

    #[test]
    fn starting_values_match_the_cockpit_defaults() {
        let state = Tuning::default()
            .parameter_state(1.25)
            .expect("valid tuning");
        assert_eq!(state.amplitude(), 0.01);
        assert_eq!(state.frequency(), 1.0);
        assert_eq!(state.position_amplitude(), 0.1);
        assert_eq!(state.position_frequency(), 1.0);
        assert_eq!(state.angle(), 1.25);
    }

    #[test]
    fn nan_nightmare_is_rejected() {
        let tuning = Tuning {
            nightmares: vec![Target::new(f64::NAN, 1.0, 1.0)],
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NonFinite {
                field: "nightmares.amplitude"
            })
        );
    }

    #[test]
    fn unreachable_nightmare_is_rejected() {
        let tuning = Tuning {
            nightmares: vec![Target::new(1.0, 1.02, 5.1), Target::new(0.5, 12.0, 1.0)],
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::TargetOutOfRange {
                field: "nightmares.frequency",
                value: 12.0,
                min: 1.0,
                max: 10.0,
            })
        );
    }
}
