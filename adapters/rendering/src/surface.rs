use glam::Vec2;

use crate::Color;

/// Side length of the square logical canvas every screen draws on.
pub const CANVAS_SIZE: f32 = 512.0;

/// 2D drawing target backing one cockpit screen.
///
/// Coordinates are expressed on a [`CANVAS_SIZE`] square canvas with the
/// origin at the top-left corner and the y axis pointing down.
pub trait Surface {
    /// Fills the whole canvas with a solid color.
    fn clear(&mut self, color: Color);

    /// Strokes an open polyline through the points.
    fn stroke_path(&mut self, points: &[Vec2], width: f32, color: Color);

    /// Fills a disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Fills a convex polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Draws a single line of text with its baseline starting at `position`.
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color);

    /// Publishes everything drawn since the previous flush.
    fn flush(&mut self);
}

/// Screens mounted in the cockpit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Shows the tunable wave.
    Selector,
    /// Shows the tunable wave over the ship's position wave.
    Navigation,
    /// Shows the heading needle and the aim dots.
    Compass,
    /// Shows the amplitude readout.
    AmplitudeReadout,
    /// Shows the frequency readout.
    FrequencyReadout,
}

impl Screen {
    /// Every screen, in drawing order.
    pub const ALL: [Screen; 5] = [
        Screen::Selector,
        Screen::Navigation,
        Screen::Compass,
        Screen::AmplitudeReadout,
        Screen::FrequencyReadout,
    ];
}

/// Surfaces available to the renderer; absent screens are skipped.
#[derive(Debug)]
pub struct Screens<S> {
    selector: Option<S>,
    navigation: Option<S>,
    compass: Option<S>,
    amplitude: Option<S>,
    frequency: Option<S>,
}

impl<S> Screens<S> {
    /// Creates an empty screen set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            selector: None,
            navigation: None,
            compass: None,
            amplitude: None,
            frequency: None,
        }
    }

    /// Mounts a surface, returning the one it replaces.
    pub fn insert(&mut self, screen: Screen, surface: S) -> Option<S> {
        self.slot_mut(screen).replace(surface)
    }

    /// Builder-style variant of [`Screens::insert`].
    #[must_use]
    pub fn with(mut self, screen: Screen, surface: S) -> Self {
        let _ = self.insert(screen, surface);
        self
    }

    /// Surface mounted for the screen, if any.
    #[must_use]
    pub fn get(&self, screen: Screen) -> Option<&S> {
        match screen {
            Screen::Selector => self.selector.as_ref(),
            Screen::Navigation => self.navigation.as_ref(),
            Screen::Compass => self.compass.as_ref(),
            Screen::AmplitudeReadout => self.amplitude.as_ref(),
            Screen::FrequencyReadout => self.frequency.as_ref(),
        }
    }

    /// Mutable surface mounted for the screen, if any.
    pub fn get_mut(&mut self, screen: Screen) -> Option<&mut S> {
        self.slot_mut(screen).as_mut()
    }

    fn slot_mut(&mut self, screen: Screen) -> &mut Option<S> {
        match screen {
            Screen::Selector => &mut self.selector,
            Screen::Navigation => &mut self.navigation,
            Screen::Compass => &mut self.compass,
            Screen::AmplitudeReadout => &mut self.amplitude,
            Screen::FrequencyReadout => &mut self.frequency,
        }
    }
}

impl<S> Default for Screens<S> {
    fn default() -> Self {
        Self::new()
    }
}
