use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use haunted_dreams_core::ControlId;
use haunted_dreams_rendering::{RenderingError, Screen, Viewport};
use serde::Deserialize;

const SUPPORTED_LAYOUT_VERSION: u32 = 1;

/// Axis-aligned rectangle in window pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Extent.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether the point lies inside; the right and bottom edges are exclusive.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }
}

/// Window rectangles of the cockpit screens.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ScreenRects {
    /// Tunable wave screen.
    pub selector: Rect,
    /// Navigation screen with both waves.
    pub navigation: Rect,
    /// Compass screen.
    pub compass: Rect,
    /// Amplitude readout.
    pub amplitude_readout: Rect,
    /// Frequency readout.
    pub frequency_readout: Rect,
}

impl ScreenRects {
    /// Rectangle assigned to the screen.
    #[must_use]
    pub const fn get(&self, screen: Screen) -> Rect {
        match screen {
            Screen::Selector => self.selector,
            Screen::Navigation => self.navigation,
            Screen::Compass => self.compass,
            Screen::AmplitudeReadout => self.amplitude_readout,
            Screen::FrequencyReadout => self.frequency_readout,
        }
    }
}

/// Clickable rectangle bound to a cockpit control.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ControlPlacement {
    /// Control the rectangle stands for.
    pub control: ControlId,
    /// Hit area in window pixels.
    #[serde(flatten)]
    pub rect: Rect,
}

/// Placement of every cockpit element inside the window.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CockpitLayout {
    /// Window width requested at startup.
    pub window_width: i32,
    /// Window height requested at startup.
    pub window_height: i32,
    /// Screen rectangles.
    pub screens: ScreenRects,
    /// Control hit areas, tested in order.
    pub controls: Vec<ControlPlacement>,
    /// Area where photographs get pinned.
    pub photo_wall: Rect,
}

#[derive(Debug, Deserialize)]
struct LayoutFile {
    version: u32,
    #[serde(flatten)]
    layout: CockpitLayout,
}

impl CockpitLayout {
    /// Loads and validates a layout from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read cockpit layout {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid cockpit layout {}", path.display()))
    }

    /// Parses and validates a layout from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: LayoutFile =
            toml::from_str(contents).context("failed to parse cockpit layout toml contents")?;
        if file.version != SUPPORTED_LAYOUT_VERSION {
            bail!(
                "unsupported cockpit layout version {} (expected {})",
                file.version,
                SUPPORTED_LAYOUT_VERSION
            );
        }
        file.layout.validate()?;
        Ok(file.layout)
    }

    /// Rejects empty rectangles and controls placed twice.
    pub fn validate(&self) -> Result<()> {
        if self.window_width <= 0 || self.window_height <= 0 {
            bail!(
                "window must have a positive size (received {}x{})",
                self.window_width,
                self.window_height
            );
        }
        for screen in Screen::ALL {
            let _ = self
                .viewport(screen)
                .with_context(|| format!("screen {screen:?} has an invalid rectangle"))?;
        }
        let mut seen = BTreeSet::new();
        for placement in &self.controls {
            if !seen.insert(placement.control) {
                bail!("control {:?} is placed more than once", placement.control);
            }
            if placement.rect.width <= 0.0 || placement.rect.height <= 0.0 {
                bail!("control {:?} has an empty hit area", placement.control);
            }
        }
        Ok(())
    }

    /// Viewport that maps the screen's canvas into the window.
    pub fn viewport(&self, screen: Screen) -> Result<Viewport, RenderingError> {
        let rect = self.screens.get(screen);
        Viewport::new(rect.origin(), rect.size())
    }

    /// Control whose hit area contains the window point.
    #[must_use]
    pub fn control_at(&self, point: Vec2) -> Option<ControlId> {
        self.controls
            .iter()
            .find(|placement| placement.rect.contains(point))
            .map(|placement| placement.control)
    }

    /// Hit area of the control, if placed.
    #[must_use]
    pub fn placement(&self, control: ControlId) -> Option<Rect> {
        self.controls
            .iter()
            .find(|placement| placement.control == control)
            .map(|placement| placement.rect)
    }

    /// Controls present in the layout, in hit-test order.
    pub fn placed_controls(&self) -> impl Iterator<Item = ControlId> + '_ {
        self.controls.iter().map(|placement| placement.control)
    }
}

impl Default for CockpitLayout {
    fn default() -> Self {
        let place = |control, x, y, width, height| ControlPlacement {
            control,
            rect: Rect::new(x, y, width, height),
        };
        Self {
            window_width: 1280,
            window_height: 800,
            screens: ScreenRects {
                selector: Rect::new(40.0, 40.0, 300.0, 300.0),
                navigation: Rect::new(384.0, 40.0, 512.0, 512.0),
                compass: Rect::new(940.0, 40.0, 300.0, 300.0),
                amplitude_readout: Rect::new(40.0, 360.0, 140.0, 140.0),
                frequency_readout: Rect::new(200.0, 360.0, 140.0, 140.0),
            },
            controls: vec![
                place(ControlId::Amplitude, 40.0, 510.0, 140.0, 60.0),
                place(ControlId::Frequency, 200.0, 510.0, 140.0, 60.0),
                place(ControlId::Up, 1050.0, 360.0, 80.0, 60.0),
                place(ControlId::Left, 960.0, 430.0, 80.0, 60.0),
                place(ControlId::Right, 1140.0, 430.0, 80.0, 60.0),
                place(ControlId::Down, 1050.0, 500.0, 80.0, 60.0),
                place(ControlId::Photo, 384.0, 580.0, 160.0, 80.0),
                place(ControlId::Motor, 560.0, 580.0, 160.0, 80.0),
                place(ControlId::Telephone, 736.0, 580.0, 160.0, 80.0),
                place(ControlId::PaperSheet, 40.0, 600.0, 300.0, 140.0),
            ],
            photo_wall: Rect::new(940.0, 580.0, 300.0, 180.0),
        }
    }
}
