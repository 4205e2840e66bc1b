#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Translates cockpit input events into parameter adjustments.
//!
//! Scrolling over a tuning knob nudges the tunable wave once per notch.
//! Pressing a steering arrow starts a hold loop that applies one increment per
//! tick to whichever arrow is hovered, until the pointer is released or leaves
//! the surface.

use std::{f64::consts::PI, time::Duration};

use haunted_dreams_core::{
    Command, ControlBehavior, ControlId, Event, SteerDirection, TuningAxis,
};
use log::debug;

/// Step sizes applied by the controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    scroll_step: f64,
    position_amplitude_step: f64,
    angle_step: f64,
    restart_grace: Duration,
}

impl Config {
    /// Creates a configuration from the step sizes and the grace period
    /// granted when the engine is switched back on.
    #[must_use]
    pub const fn new(
        scroll_step: f64,
        position_amplitude_step: f64,
        angle_step: f64,
        restart_grace: Duration,
    ) -> Self {
        Self {
            scroll_step,
            position_amplitude_step,
            angle_step,
            restart_grace,
        }
    }

    /// Amount added to a tuned parameter per scroll notch.
    #[must_use]
    pub const fn scroll_step(&self) -> f64 {
        self.scroll_step
    }

    /// Amount added to the position amplitude per held tick.
    #[must_use]
    pub const fn position_amplitude_step(&self) -> f64 {
        self.position_amplitude_step
    }

    /// Rotation applied to the heading per held tick, in radians.
    #[must_use]
    pub const fn angle_step(&self) -> f64 {
        self.angle_step
    }

    /// Hostility grace requested whenever the engine is powered back on.
    #[must_use]
    pub const fn restart_grace(&self) -> Duration {
        self.restart_grace
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(0.01, 0.0025, PI / 500.0, Duration::from_secs(120))
    }
}

/// Pure system translating hover, scroll, and press events into commands.
#[derive(Debug)]
pub struct Controls {
    config: Config,
    incrementing: bool,
    hovered: Option<ControlId>,
}

impl Controls {
    /// Creates the controls system with the provided step sizes.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            incrementing: false,
            hovered: None,
        }
    }

    /// Whether a steering arrow is currently being held.
    #[must_use]
    pub fn is_incrementing(&self) -> bool {
        self.incrementing
    }

    /// Consumes world events and emits the adjustments they imply.
    pub fn handle(&mut self, events: &[Event], engine_powered: bool, out: &mut Vec<Command>) {
        let mut powered = engine_powered;
        for event in events {
            match event {
                Event::HoverChanged { control } => {
                    self.hovered = *control;
                }
                Event::Scrolled {
                    control: Some(control),
                    direction,
                } => {
                    if let ControlBehavior::Tune(axis) = control.behavior() {
                        let delta = direction.sign() * self.config.scroll_step;
                        out.push(match axis {
                            TuningAxis::Amplitude => Command::AdjustAmplitude { delta },
                            TuningAxis::Frequency => Command::AdjustFrequency { delta },
                        });
                    }
                }
                Event::ControlPressed {
                    control: Some(control),
                } => match control.behavior() {
                    ControlBehavior::Steer(_) => {
                        self.incrementing = true;
                    }
                    ControlBehavior::ToggleEngine => {
                        powered = !powered;
                        debug!("engine switched {}", if powered { "on" } else { "off" });
                        out.push(Command::SetEnginePower { powered });
                        if powered {
                            out.push(Command::ScheduleHostility {
                                grace: self.config.restart_grace,
                            });
                        }
                    }
                    _ => {}
                },
                Event::PointerReleased => {
                    self.incrementing = false;
                }
                Event::TimeAdvanced { .. } => {
                    if self.incrementing {
                        if let Some(command) = self.increment() {
                            out.push(command);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn increment(&self) -> Option<Command> {
        let ControlBehavior::Steer(direction) = self.hovered?.behavior() else {
            return None;
        };
        let command = match direction {
            SteerDirection::Up => Command::AdjustPositionAmplitude {
                delta: self.config.position_amplitude_step,
            },
            SteerDirection::Down => Command::AdjustPositionAmplitude {
                delta: -self.config.position_amplitude_step,
            },
            SteerDirection::Left => Command::AdjustAngle {
                delta: self.config.angle_step,
            },
            SteerDirection::Right => Command::AdjustAngle {
                delta: -self.config.angle_step,
            },
        };
        Some(command)
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
