#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Photograph action resolving the nightmare in front of the ship.
//!
//! A photograph taken while the position wave overlaps the nightmare pins the
//! picture to the wall and moves the hunt to the next nightmare once the
//! development delay elapses. A photograph of an empty dream tears the paper
//! and shortens the hostility grace period. A re-entrancy guard suppresses
//! further photographs while a successful one is developing.

use std::time::Duration;

use haunted_dreams_core::{Command, ControlBehavior, Cue, Event};
use log::{debug, info};

/// Delays and grace periods governing a photograph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pin_delay: Duration,
    success_delay: Duration,
    tear_delay: Duration,
    success_grace: Duration,
    failure_grace: Duration,
}

impl Config {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(
        pin_delay: Duration,
        success_delay: Duration,
        tear_delay: Duration,
        success_grace: Duration,
        failure_grace: Duration,
    ) -> Self {
        Self {
            pin_delay,
            success_delay,
            tear_delay,
            success_grace,
            failure_grace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(3),
            Duration::from_secs(60),
            Duration::from_secs(10),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Followup {
    Pin,
    Resolve { index: usize },
    Tear,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    remaining: Duration,
    followup: Followup,
    fresh: bool,
}

/// Pure system owning the photograph timers.
#[derive(Debug)]
pub struct Photography {
    config: Config,
    taking_photo: bool,
    pending: Vec<Pending>,
    in_batch: bool,
}

impl Photography {
    /// Creates the photography system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            taking_photo: false,
            pending: Vec::new(),
            in_batch: false,
        }
    }

    /// Whether a successful photograph is still developing.
    #[must_use]
    pub fn is_taking_photo(&self) -> bool {
        self.taking_photo
    }

    /// Consumes events, taking photographs on camera presses and firing due timers.
    ///
    /// `overlap` and `target_index` describe the world as of the start of the batch.
    /// Timers started by a press only count ticks from later batches.
    pub fn handle(
        &mut self,
        events: &[Event],
        overlap: bool,
        target_index: usize,
        out: &mut Vec<Command>,
    ) {
        self.in_batch = true;
        for event in events {
            match event {
                Event::ControlPressed {
                    control: Some(control),
                } if control.behavior() == ControlBehavior::Photograph => {
                    let _ = self.take_photo(overlap, target_index, out);
                }
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                _ => {}
            }
        }
        self.in_batch = false;
        for pending in &mut self.pending {
            pending.fresh = false;
        }
    }

    /// Takes a photograph, returning `false` when one is already developing.
    pub fn take_photo(&mut self, overlap: bool, target_index: usize, out: &mut Vec<Command>) -> bool {
        if self.taking_photo {
            debug!("photograph ignored; previous one still developing");
            return false;
        }

        out.push(Command::PlayCue {
            cue: Cue::PhotoShutter,
        });

        if overlap {
            info!("nightmare {target_index} photographed");
            self.taking_photo = true;
            self.schedule(self.config.pin_delay, Followup::Pin);
            self.schedule(
                self.config.success_delay,
                Followup::Resolve {
                    index: target_index,
                },
            );
        } else {
            info!("empty dream photographed");
            self.schedule(self.config.tear_delay, Followup::Tear);
            out.push(Command::ScheduleHostility {
                grace: self.config.failure_grace,
            });
        }
        true
    }

    fn schedule(&mut self, delay: Duration, followup: Followup) {
        self.pending.push(Pending {
            remaining: delay,
            followup,
            fresh: self.in_batch,
        });
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let mut due = Vec::new();
        self.pending.retain_mut(|pending| {
            if pending.fresh {
                return true;
            }
            pending.remaining = pending.remaining.saturating_sub(dt);
            if pending.remaining.is_zero() {
                due.push(pending.followup);
                false
            } else {
                true
            }
        });

        for followup in due {
            match followup {
                Followup::Pin => out.push(Command::PlayCue {
                    cue: Cue::PhotoPinned,
                }),
                Followup::Tear => out.push(Command::PlayCue {
                    cue: Cue::DreamTorn,
                }),
                Followup::Resolve { index } => {
                    out.push(Command::ScheduleHostility {
                        grace: self.config.success_grace,
                    });
                    out.push(Command::RevealPhoto { index });
                    out.push(Command::AdvanceTarget);
                    self.taking_photo = false;
                }
            }
        }
    }
}

impl Default for Photography {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(seconds: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_secs(seconds),
        }
    }

    #[test]
    fn successful_photo_resolves_after_development() {
        let mut photography = Photography::default();
        let mut out = Vec::new();
        assert!(photography.take_photo(true, 2, &mut out));
        assert_eq!(
            out,
            vec![Command::PlayCue {
                cue: Cue::PhotoShutter
            }]
        );

        out.clear();
        photography.handle(&[tick(2)], true, 2, &mut out);
        assert_eq!(
            out,
            vec![Command::PlayCue {
                cue: Cue::PhotoPinned
            }]
        );
        assert!(photography.is_taking_photo());

        out.clear();
        photography.handle(&[tick(2)], true, 2, &mut out);
        assert_eq!(
            out,
            vec![
                Command::ScheduleHostility {
                    grace: Duration::from_secs(60)
                },
                Command::RevealPhoto { index: 2 },
                Command::AdvanceTarget,
            ]
        );
        assert!(!photography.is_taking_photo());
    }

    #[test]
    fn failed_photo_clears_guard_immediately() {
        let mut photography = Photography::default();
        let mut out = Vec::new();
        assert!(photography.take_photo(false, 0, &mut out));
        assert!(!photography.is_taking_photo());
        assert_eq!(
            out,
            vec![
                Command::PlayCue {
                    cue: Cue::PhotoShutter
                },
                Command::ScheduleHostility {
                    grace: Duration::from_secs(10)
                },
            ]
        );

        out.clear();
        photography.handle(&[tick(3)], false, 0, &mut out);
        assert_eq!(
            out,
            vec![Command::PlayCue {
                cue: Cue::DreamTorn
            }]
        );
    }

    #[test]
    fn tick_in_the_pressing_batch_does_not_shorten_the_delay() {
        let mut photography = Photography::default();
        let mut out = Vec::new();
        let press = Event::ControlPressed {
            control: Some(haunted_dreams_core::ControlId::Photo),
        };
        photography.handle(&[press, tick(1)], true, 0, &mut out);
        assert_eq!(out.len(), 1, "only the shutter sounds on the press");

        out.clear();
        photography.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(1_999),
            }],
            true,
            0,
            &mut out,
        );
        assert!(out.is_empty(), "pin must wait the full two seconds");

        photography.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(1),
            }],
            true,
            0,
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::PlayCue {
                cue: Cue::PhotoPinned
            }]
        );
    }

    #[test]
    fn second_photo_during_development_is_suppressed() {
        let mut photography = Photography::default();
        let mut out = Vec::new();
        assert!(photography.take_photo(true, 0, &mut out));
        assert!(!photography.take_photo(true, 0, &mut out));
        assert!(!photography.take_photo(false, 0, &mut out));
        assert_eq!(out.len(), 1, "only the first shutter should sound");
    }
}
