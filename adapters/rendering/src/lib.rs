#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Haunted Dreams adapters.

mod surface;
mod waveform;

use anyhow::Result as AnyResult;
use glam::Vec2;
use haunted_dreams_core::{ControlId, ParameterState, ScrollDirection, TutorialHint};
use std::time::Duration;
use thiserror::Error;

pub use surface::{Screen, Screens, Surface, CANVAS_SIZE};
pub use waveform::{
    amplitude_readout, frequency_readout, wave_points, CockpitRenderer, CompassReading, WaveTrace,
    WaveformRenderer, COMPASS_DOTS,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Phosphor green used for the tunable wave, readouts, and highlights.
    pub const LIME: Self = Self::from_rgb_u8(0, 255, 0);
    /// Pale green used for the ship's position wave.
    pub const LIGHT_GREEN: Self = Self::from_rgb_u8(0x90, 0xee, 0x90);
    /// Dim green of unlit compass dots.
    pub const COMPASS_BASE: Self = Self::from_rgb_u8(0x01, 0x35, 0x00);
    /// Red of the compass needle.
    pub const NEEDLE_RED: Self = Self::from_rgb_u8(0xff, 0x00, 0x00);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Control under the pointer according to the adapter's pick test.
    pub hovered: Option<ControlId>,
    /// Scroll notch detected on this frame, if any.
    pub scroll: Option<ScrollDirection>,
    /// Whether the primary pointer button went down on this frame.
    pub pointer_down: bool,
    /// Whether the primary pointer button went up on this frame.
    pub pointer_up: bool,
    /// Whether the pointer left the rendering surface on this frame.
    pub pointer_left: bool,
    /// Controls whose backing objects finished loading on this frame.
    pub loaded_controls: Vec<ControlId>,
    /// Whether the player asked to quit.
    pub quit: bool,
}

/// Scene description mirroring the cockpit state for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tunable and position wave parameters.
    pub parameters: ParameterState,
    /// Whether the position wave renders as noise.
    pub distorted: bool,
    /// Whether the engine is running; every screen is dark otherwise.
    pub engine_powered: bool,
    /// Heading of the locked nightmare, highlighted on the compass.
    pub angle_to_aim: Option<f64>,
    /// Control under the pointer, if any.
    pub hovered: Option<ControlId>,
    /// Tutorial hint overlay, if any.
    pub hint: Option<TutorialHint>,
    /// Subtitle line currently on screen, if any.
    pub subtitle: Option<String>,
    /// Catalog indices of the photographs pinned to the wall.
    pub revealed_photos: Vec<usize>,
    /// Number of nightmares in the catalog.
    pub nightmare_count: usize,
    /// Whether the telephone is ringing.
    pub ringing: bool,
}

impl Scene {
    /// Creates a scene for the provided parameters with every overlay cleared.
    #[must_use]
    pub fn new(parameters: ParameterState, nightmare_count: usize) -> Self {
        Self {
            parameters,
            distorted: true,
            engine_powered: true,
            angle_to_aim: None,
            hovered: None,
            hint: None,
            subtitle: None,
            revealed_photos: Vec::new(),
            nightmare_count,
            ringing: false,
        }
    }

    /// Whether the control is highlighted by the active tutorial hint.
    #[must_use]
    pub fn is_hinted(&self, control: ControlId) -> bool {
        self.hint
            .as_ref()
            .is_some_and(|hint| hint.controls.contains(&control))
    }
}

/// Rectangle of the window that displays one logical screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    origin: Vec2,
    size: Vec2,
}

impl Viewport {
    /// Creates a viewport, rejecting empty or non-finite extents.
    pub fn new(origin: Vec2, size: Vec2) -> Result<Self, RenderingError> {
        if !(size.x > 0.0 && size.y > 0.0 && size.is_finite() && origin.is_finite()) {
            return Err(RenderingError::InvalidViewport {
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self { origin, size })
    }

    /// Top-left corner in window coordinates.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Extent in window coordinates.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Maps a point on the logical canvas into window coordinates.
    #[must_use]
    pub fn to_window(&self, canvas_point: Vec2) -> Vec2 {
        self.origin + canvas_point * (self.size / CANVAS_SIZE)
    }

    /// Scale applied to lengths along the horizontal axis.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.size.x / CANVAS_SIZE
    }

    /// Whether the window point lies inside the viewport.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backends capable of presenting Haunted Dreams scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when preparing presentation data.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// A viewport must cover a positive, finite area.
    #[error("viewport must have a positive finite size (received {width}x{height})")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}
