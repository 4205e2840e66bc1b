use std::{f64::consts::PI, fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use haunted_dreams_core::Tuning;
use haunted_dreams_system_controls::Config as ControlsConfig;
use haunted_dreams_system_photography::Config as PhotographyConfig;
use haunted_dreams_system_tutorial::Config as TutorialConfig;
use serde::Deserialize;

/// Everything a play session can be tuned with; each section falls back to its defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) puzzle: Tuning,
    pub(crate) controls: ControlsSection,
    pub(crate) photography: PhotographySection,
    pub(crate) tutorial: TutorialSection,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ControlsSection {
    pub(crate) scroll_step: f64,
    pub(crate) position_amplitude_step: f64,
    pub(crate) angle_step: f64,
    pub(crate) restart_grace_ms: u64,
}

impl Default for ControlsSection {
    fn default() -> Self {
        Self {
            scroll_step: 0.01,
            position_amplitude_step: 0.0025,
            angle_step: PI / 500.0,
            restart_grace_ms: 120_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PhotographySection {
    pub(crate) pin_delay_ms: u64,
    pub(crate) success_delay_ms: u64,
    pub(crate) tear_delay_ms: u64,
    pub(crate) success_grace_ms: u64,
    pub(crate) failure_grace_ms: u64,
}

impl Default for PhotographySection {
    fn default() -> Self {
        Self {
            pin_delay_ms: 2_000,
            success_delay_ms: 4_000,
            tear_delay_ms: 3_000,
            success_grace_ms: 60_000,
            failure_grace_ms: 10_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TutorialSection {
    pub(crate) ring_delay_ms: u64,
    pub(crate) answer_delay_ms: u64,
    pub(crate) poll_interval_ms: u64,
    pub(crate) load_grace_ms: u64,
}

impl Default for TutorialSection {
    fn default() -> Self {
        Self {
            ring_delay_ms: 5_000,
            answer_delay_ms: 1_000,
            poll_interval_ms: 100,
            load_grace_ms: 10_000,
        }
    }
}

impl GameConfig {
    /// Reads the file at `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.puzzle.validate().context("[puzzle] is invalid")?;
        let controls = &self.controls;
        for (name, value) in [
            ("scroll_step", controls.scroll_step),
            ("position_amplitude_step", controls.position_amplitude_step),
            ("angle_step", controls.angle_step),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "[controls] {name} must be a positive number (got {value})"
            );
        }
        ensure!(
            self.tutorial.poll_interval_ms > 0,
            "[tutorial] poll_interval_ms must be positive"
        );
        Ok(())
    }

    pub(crate) fn controls(&self) -> ControlsConfig {
        let section = self.controls;
        ControlsConfig::new(
            section.scroll_step,
            section.position_amplitude_step,
            section.angle_step,
            Duration::from_millis(section.restart_grace_ms),
        )
    }

    pub(crate) fn photography(&self) -> PhotographyConfig {
        let section = self.photography;
        PhotographyConfig::new(
            Duration::from_millis(section.pin_delay_ms),
            Duration::from_millis(section.success_delay_ms),
            Duration::from_millis(section.tear_delay_ms),
            Duration::from_millis(section.success_grace_ms),
            Duration::from_millis(section.failure_grace_ms),
        )
    }

    pub(crate) fn tutorial(&self) -> TutorialConfig {
        let section = self.tutorial;
        TutorialConfig::new(
            Duration::from_millis(section.ring_delay_ms),
            Duration::from_millis(section.answer_delay_ms),
            Duration::from_millis(section.poll_interval_ms),
            Duration::from_millis(section.load_grace_ms),
        )
    }
}
