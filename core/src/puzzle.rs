//! Tunable wave parameters, the nightmare catalog, and match results.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a full compass turn in radians.
pub const FULL_TURN: f64 = TAU;

/// Decimal places compared when locking amplitude and frequency onto a nightmare.
pub const LOCK_PRECISION: usize = 2;

/// Decimal places compared when aligning the heading with the aim.
///
/// Deliberately coarser than [`LOCK_PRECISION`]; the two must not be unified.
pub const ANGLE_PRECISION: usize = 1;

/// Largest distance, per axis, at which the position wave overlaps a nightmare.
pub const OVERLAP_TOLERANCE: f64 = 0.01;

/// Digits after the point needed to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Formats the value with a fixed number of decimal places.
///
/// Exact halves round away from zero, and negative zero prints without a sign.
#[must_use]
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() || decimals >= EXACT_FRACTION_DIGITS {
        return format!("{value:.decimals$}");
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let exact = format!("{magnitude:.EXACT_FRACTION_DIGITS$}");
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, dropped) = fraction.split_at(decimals.min(fraction.len()));
    let is_tie = dropped.starts_with('5') && dropped[1..].bytes().all(|digit| digit == b'0');
    if !is_tie {
        return format!("{sign}{magnitude:.decimals$}");
    }

    let mut digits: Vec<u8> = whole.bytes().chain(kept.bytes()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let mut rounded = String::with_capacity(digits.len() + 2);
    rounded.push_str(sign);
    let split = digits.len() - decimals;
    rounded.extend(digits[..split].iter().map(|digit| char::from(*digit)));
    if decimals > 0 {
        rounded.push('.');
        rounded.extend(digits[split..].iter().map(|digit| char::from(*digit)));
    }
    rounded
}

/// Compares two values after formatting both to the same fixed precision.
#[must_use]
pub fn fixed_eq(left: f64, right: f64, decimals: usize) -> bool {
    to_fixed(left, decimals) == to_fixed(right, decimals)
}

/// Wraps a finite angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 2π.
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

/// Inclusive bounds applied to a tunable parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    /// Smallest permitted value.
    pub min: f64,
    /// Largest permitted value.
    pub max: f64,
}

impl ParameterRange {
    /// Creates a range from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Saturates the value at the range bounds.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Reports whether the value lies inside the inclusive bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Amplitude, frequency, and heading controlled by the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterState {
    amplitude: f64,
    frequency: f64,
    position_amplitude: f64,
    position_frequency: f64,
    angle: f64,
    amplitude_range: ParameterRange,
    frequency_range: ParameterRange,
}

impl ParameterState {
    /// Default amplitude bounds.
    pub const AMPLITUDE_RANGE: ParameterRange = ParameterRange::new(0.01, 1.5);

    /// Default frequency bounds.
    pub const FREQUENCY_RANGE: ParameterRange = ParameterRange::new(1.0, 10.0);

    /// Creates a parameter state, clamping every starting value into its range.
    ///
    /// The position amplitude shares the amplitude range and the position
    /// frequency shares the frequency range.
    #[must_use]
    pub fn new(
        amplitude_range: ParameterRange,
        frequency_range: ParameterRange,
        amplitude: f64,
        frequency: f64,
        position_amplitude: f64,
        position_frequency: f64,
        angle: f64,
    ) -> Self {
        Self {
            amplitude: amplitude_range.clamp(amplitude),
            frequency: frequency_range.clamp(frequency),
            position_amplitude: amplitude_range.clamp(position_amplitude),
            position_frequency: frequency_range.clamp(position_frequency),
            angle: if angle.is_finite() {
                normalize_angle(angle)
            } else {
                0.0
            },
            amplitude_range,
            frequency_range,
        }
    }

    /// Tunable amplitude.
    #[must_use]
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Tunable frequency.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Amplitude of the ship's position wave.
    #[must_use]
    pub const fn position_amplitude(&self) -> f64 {
        self.position_amplitude
    }

    /// Frequency of the ship's position wave.
    #[must_use]
    pub const fn position_frequency(&self) -> f64 {
        self.position_frequency
    }

    /// Ship heading in `[0, 2π)`.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Bounds applied to both amplitudes.
    #[must_use]
    pub const fn amplitude_range(&self) -> ParameterRange {
        self.amplitude_range
    }

    /// Bounds applied to both frequencies.
    #[must_use]
    pub const fn frequency_range(&self) -> ParameterRange {
        self.frequency_range
    }

    /// Adds the delta to the amplitude, saturating at the bounds.
    pub fn adjust_amplitude(&mut self, delta: f64) {
        if delta.is_nan() {
            return;
        }
        self.amplitude = self.amplitude_range.clamp(self.amplitude + delta);
    }

    /// Adds the delta to the frequency, saturating at the bounds.
    pub fn adjust_frequency(&mut self, delta: f64) {
        if delta.is_nan() {
            return;
        }
        self.frequency = self.frequency_range.clamp(self.frequency + delta);
    }

    /// Adds the delta to the position amplitude, saturating at the amplitude bounds.
    pub fn adjust_position_amplitude(&mut self, delta: f64) {
        if delta.is_nan() {
            return;
        }
        self.position_amplitude = self.amplitude_range.clamp(self.position_amplitude + delta);
    }

    /// Rotates the heading, wrapping the result into `[0, 2π)`.
    ///
    /// Non-finite deltas are ignored since they cannot be wrapped.
    pub fn adjust_angle(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.angle = normalize_angle(self.angle + delta);
    }

    /// Copies the tunable frequency onto the position wave.
    pub fn snap_position_frequency(&mut self) {
        self.position_frequency = self.frequency_range.clamp(self.frequency);
    }
}

impl Default for ParameterState {
    fn default() -> Self {
        Self::new(
            Self::AMPLITUDE_RANGE,
            Self::FREQUENCY_RANGE,
            0.01,
            1.0,
            0.1,
            1.0,
            0.0,
        )
    }
}

/// Signature of one nightmare the player must locate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Amplitude the tunable wave must show.
    pub amplitude: f64,
    /// Frequency the tunable wave must show.
    pub frequency: f64,
    /// Heading the ship must face once locked.
    pub angle: f64,
}

impl Target {
    /// Creates a new nightmare signature.
    #[must_use]
    pub const fn new(amplitude: f64, frequency: f64, angle: f64) -> Self {
        Self {
            amplitude,
            frequency,
            angle,
        }
    }
}

const BUILT_IN_NIGHTMARES: [Target; 6] = [
    Target::new(1.00, 1.02, 5.10),
    Target::new(0.45, 2.42, 3.30),
    Target::new(0.12, 3.98, 1.20),
    Target::new(0.97, 5.23, 5.70),
    Target::new(1.44, 6.57, 2.70),
    Target::new(1.17, 8.11, 6.00),
];

/// Reasons a catalog cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A catalog needs at least one nightmare so that a current target exists.
    #[error("nightmare catalog must contain at least one target")]
    Empty,
}

/// Ordered nightmares with a cursor pointing at the one being hunted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TargetCatalog {
    targets: Vec<Target>,
    cursor: usize,
}

impl TargetCatalog {
    /// Creates a catalog positioned at its first nightmare.
    pub fn new(targets: Vec<Target>) -> Result<Self, CatalogError> {
        if targets.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { targets, cursor: 0 })
    }

    /// Built-in nightmare table.
    #[must_use]
    pub fn built_in_targets() -> Vec<Target> {
        BUILT_IN_NIGHTMARES.to_vec()
    }

    /// Nightmare currently being hunted.
    #[must_use]
    pub fn current(&self) -> &Target {
        &self.targets[self.cursor]
    }

    /// Moves to the next nightmare.
    ///
    /// Returns `false` without moving when the cursor already sits on the final
    /// nightmare, which then stays current indefinitely.
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.targets.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Zero-based position of the cursor.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.cursor
    }

    /// Number of nightmares in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false`; catalogs cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Reports whether the cursor sits on the final nightmare.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cursor + 1 == self.targets.len()
    }

    /// All nightmares in hunting order.
    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}

impl Default for TargetCatalog {
    fn default() -> Self {
        Self {
            targets: Self::built_in_targets(),
            cursor: 0,
        }
    }
}

/// Outcome of comparing the parameters against the current nightmare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    /// Amplitude and frequency both match at [`LOCK_PRECISION`].
    pub amplitude_frequency_locked: bool,
    /// Heading the player should aim for; present only while locked.
    pub angle_to_aim: Option<f64>,
    /// Heading matches the aim at [`ANGLE_PRECISION`].
    pub angle_aligned: bool,
}
