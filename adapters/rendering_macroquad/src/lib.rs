#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Haunted Dreams.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature, so narration and cues are reported through the
//! log instead of played.
//!
//! Every cockpit screen is drawn into its own rectangle of a single window.
//! The rectangles and the control hit areas come from a [`CockpitLayout`],
//! which can be loaded from TOML.

mod layout;
mod surface;

use anyhow::Result;
use glam::Vec2;
use haunted_dreams_core::{ControlId, ScrollDirection};
use haunted_dreams_rendering::{
    CockpitRenderer, Color, FrameInput, Presentation, RenderingBackend, Scene, Screen, Screens,
};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, is_mouse_button_released, mouse_position,
    mouse_wheel, KeyCode, MouseButton,
};
use std::time::{Duration, Instant};

pub use layout::{CockpitLayout, ControlPlacement, Rect, ScreenRects};

use self::surface::{to_macroquad_color, MacroquadSurface};

const BUTTON_BASE: Color = Color::from_rgb_u8(0x2b, 0x2b, 0x2b);
const BUTTON_HOVER_LIGHTEN: f32 = 0.25;
const HINT_OUTLINE: f32 = 4.0;
const HINT_TEXT_SIZE: f32 = 22.0;
const LABEL_TEXT_SIZE: f32 = 24.0;
const SUBTITLE_TEXT_SIZE: f32 = 30.0;
const PHOTO_WALL_COLUMNS: usize = 3;
const PHOTO_MARGIN: f32 = 6.0;

/// Raw pointer and keyboard state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// Cursor position in window pixels.
    pub cursor: Vec2,
    /// Whether the cursor lies inside the window.
    pub cursor_inside: bool,
    /// Primary button went down this frame.
    pub primary_pressed: bool,
    /// Primary button went up this frame.
    pub primary_released: bool,
    /// Vertical wheel delta where negative values scroll up.
    pub wheel_delta: f32,
    /// `Escape` or `Q` was pressed.
    pub quit_pressed: bool,
}

impl InputObservations {
    fn poll() -> Self {
        let (x, y) = mouse_position();
        let cursor = Vec2::new(x, y);
        let width = macroquad::window::screen_width();
        let height = macroquad::window::screen_height();
        let (_, wheel_y) = mouse_wheel();

        Self {
            cursor,
            cursor_inside: cursor.x >= 0.0 && cursor.y >= 0.0 && cursor.x < width && cursor.y < height,
            primary_pressed: is_mouse_button_pressed(MouseButton::Left),
            primary_released: is_mouse_button_released(MouseButton::Left),
            // Macroquad reports positive values when scrolling away from the player.
            wheel_delta: -wheel_y,
            quit_pressed: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }
}

/// Turns per-frame observations into [`FrameInput`] values.
///
/// The tracker remembers whether the cursor was inside the window so that
/// leaving it is reported exactly once, and announces every placed control
/// as loaded on the first frame.
#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    was_inside: bool,
    announced_controls: bool,
}

impl InputTracker {
    /// Creates a tracker that has not observed any frame yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the frame input for one set of observations.
    pub fn observe(
        &mut self,
        layout: &CockpitLayout,
        observations: &InputObservations,
    ) -> FrameInput {
        let mut input = FrameInput {
            quit: observations.quit_pressed,
            ..FrameInput::default()
        };

        if !self.announced_controls {
            input.loaded_controls = layout.placed_controls().collect();
            self.announced_controls = true;
        }

        let inside = observations.cursor_inside;
        input.pointer_left = self.was_inside && !inside;
        self.was_inside = inside;

        if inside {
            input.hovered = layout.control_at(observations.cursor);
            input.pointer_down = observations.primary_pressed;
            input.scroll = ScrollDirection::from_wheel_delta(observations.wheel_delta);
        }
        input.pointer_up = observations.primary_released;

        input
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    layout: CockpitLayout,
    noise_seed: u64,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            layout: CockpitLayout::default(),
            noise_seed: 0,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Replaces the default cockpit layout.
    #[must_use]
    pub fn with_layout(mut self, layout: CockpitLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Seeds the generator behind the distortion noise.
    #[must_use]
    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }
}

/// Timing and scene state gathered over roughly one second of cockpit frames.
#[derive(Debug, Default)]
struct CockpitStats {
    span: Duration,
    frames: u32,
    distorted_frames: u32,
    update: Duration,
    draw: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CockpitReport {
    frames_per_second: f64,
    update_ms: f64,
    draw_ms: f64,
    distorted_percent: f64,
}

impl CockpitStats {
    fn record(
        &mut self,
        dt: Duration,
        update: Duration,
        draw: Duration,
        distorted: bool,
    ) -> Option<CockpitReport> {
        self.span += dt;
        self.frames += 1;
        self.update += update;
        self.draw += draw;
        if distorted {
            self.distorted_frames += 1;
        }
        if self.span < Duration::from_secs(1) {
            return None;
        }

        let frames = f64::from(self.frames);
        let report = CockpitReport {
            frames_per_second: frames / self.span.as_secs_f64(),
            update_ms: self.update.as_secs_f64() * 1_000.0 / frames,
            draw_ms: self.draw.as_secs_f64() * 1_000.0 / frames,
            distorted_percent: f64::from(self.distorted_frames) * 100.0 / frames,
        };
        *self = Self::default();
        Some(report)
    }
}

fn mount_screens(layout: &CockpitLayout) -> Result<Screens<MacroquadSurface>> {
    let mut screens = Screens::new();
    for screen in Screen::ALL {
        let _ = screens.insert(screen, MacroquadSurface::new(layout.viewport(screen)?));
    }
    Ok(screens)
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            layout,
            noise_seed,
        } = self;

        layout.validate()?;
        let screens = mount_screens(&layout)?;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: layout.window_width,
            window_height: layout.window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut screens = screens;
            let mut renderer = CockpitRenderer::new(noise_seed);
            let mut tracker = InputTracker::new();
            let mut stats = CockpitStats::default();
            let background = to_macroquad_color(clear_color);

            loop {
                let observations = InputObservations::poll();
                let frame_input = tracker.observe(&layout, &observations);
                if frame_input.quit {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                renderer.render(&scene, &mut screens);
                draw_controls(&layout, &scene);
                draw_photo_wall(&layout, &scene);
                draw_hint(&layout, &scene);
                draw_subtitle(&scene, macroquad::window::screen_height());
                let render = render_start.elapsed();

                let report = stats.record(frame_dt, simulation, render, scene.distorted);
                if let (true, Some(report)) = (show_fps, report) {
                    println!(
                        "cockpit {:.1} fps | update {:.2}ms | draw {:.2}ms | distorted {:.0}%",
                        report.frames_per_second,
                        report.update_ms,
                        report.draw_ms,
                        report.distorted_percent,
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn button_color(scene: &Scene, control: ControlId) -> Color {
    let base = match control {
        ControlId::Telephone if scene.ringing => Color::NEEDLE_RED,
        ControlId::Motor if !scene.engine_powered => Color::COMPASS_BASE,
        _ => BUTTON_BASE,
    };
    if scene.hovered == Some(control) {
        base.lighten(BUTTON_HOVER_LIGHTEN)
    } else {
        base
    }
}

fn draw_controls(layout: &CockpitLayout, scene: &Scene) {
    for placement in &layout.controls {
        let Rect {
            x,
            y,
            width,
            height,
        } = placement.rect;
        let control = placement.control;
        macroquad::shapes::draw_rectangle(
            x,
            y,
            width,
            height,
            to_macroquad_color(button_color(scene, control)),
        );
        if scene.is_hinted(control) {
            macroquad::shapes::draw_rectangle_lines(
                x,
                y,
                width,
                height,
                HINT_OUTLINE,
                to_macroquad_color(Color::LIME),
            );
        }
        let _ = macroquad::text::draw_text(
            control.label(),
            x + 10.0,
            y + height / 2.0 + LABEL_TEXT_SIZE / 3.0,
            LABEL_TEXT_SIZE,
            to_macroquad_color(Color::WHITE),
        );
    }
}

/// Splits the photo wall into one slot per nightmare, filled row by row.
#[must_use]
pub fn photo_slots(wall: Rect, nightmare_count: usize) -> Vec<Rect> {
    if nightmare_count == 0 {
        return Vec::new();
    }
    let columns = PHOTO_WALL_COLUMNS.min(nightmare_count);
    let rows = (nightmare_count + columns - 1) / columns;
    let slot_width = wall.width / columns as f32;
    let slot_height = wall.height / rows as f32;
    (0..nightmare_count)
        .map(|index| {
            let column = (index % columns) as f32;
            let row = (index / columns) as f32;
            Rect::new(
                wall.x + column * slot_width + PHOTO_MARGIN,
                wall.y + row * slot_height + PHOTO_MARGIN,
                (slot_width - 2.0 * PHOTO_MARGIN).max(0.0),
                (slot_height - 2.0 * PHOTO_MARGIN).max(0.0),
            )
        })
        .collect()
}

fn draw_photo_wall(layout: &CockpitLayout, scene: &Scene) {
    let outline = to_macroquad_color(Color::COMPASS_BASE.lighten(0.3));
    for (index, slot) in photo_slots(layout.photo_wall, scene.nightmare_count)
        .into_iter()
        .enumerate()
    {
        if scene.revealed_photos.contains(&index) {
            macroquad::shapes::draw_rectangle(
                slot.x,
                slot.y,
                slot.width,
                slot.height,
                to_macroquad_color(Color::LIGHT_GREEN),
            );
            let _ = macroquad::text::draw_text(
                &format!("#{}", index + 1),
                slot.x + 6.0,
                slot.y + LABEL_TEXT_SIZE,
                LABEL_TEXT_SIZE,
                to_macroquad_color(Color::BLACK),
            );
        } else {
            macroquad::shapes::draw_rectangle_lines(
                slot.x,
                slot.y,
                slot.width,
                slot.height,
                2.0,
                outline,
            );
        }
    }
}

fn draw_hint(layout: &CockpitLayout, scene: &Scene) {
    let Some(hint) = &scene.hint else {
        return;
    };
    let anchor = hint
        .controls
        .iter()
        .find_map(|control| layout.placement(*control))
        .map_or(Vec2::new(40.0, 0.0), |rect| rect.origin());
    let line_height = HINT_TEXT_SIZE + 2.0;
    let top = (anchor.y - line_height * hint.lines.len() as f32).max(line_height);
    let color = to_macroquad_color(Color::WHITE);
    for (row, line) in hint.lines.iter().enumerate() {
        let _ = macroquad::text::draw_text(
            line,
            anchor.x,
            top + line_height * row as f32,
            HINT_TEXT_SIZE,
            color,
        );
    }
}

fn draw_subtitle(scene: &Scene, screen_height: f32) {
    if let Some(subtitle) = scene.subtitle.as_deref().filter(|text| !text.is_empty()) {
        let _ = macroquad::text::draw_text(
            subtitle,
            40.0,
            screen_height - 20.0,
            SUBTITLE_TEXT_SIZE,
            to_macroquad_color(Color::WHITE),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haunted_dreams_core::ParameterState;

    #[test]
    fn hovered_button_is_lightened() {
        let mut scene = Scene::new(ParameterState::default(), 6);
        let idle = button_color(&scene, ControlId::Photo);
        scene.hovered = Some(ControlId::Photo);
        assert_eq!(
            button_color(&scene, ControlId::Photo),
            idle.lighten(BUTTON_HOVER_LIGHTEN)
        );
    }

    #[test]
    fn ringing_telephone_turns_red() {
        let mut scene = Scene::new(ParameterState::default(), 6);
        scene.ringing = true;
        assert_eq!(button_color(&scene, ControlId::Telephone), Color::NEEDLE_RED);
    }

    #[test]
    fn cockpit_stats_report_once_per_second() {
        let mut stats = CockpitStats::default();
        let quarter = Duration::from_millis(250);
        let update = Duration::from_millis(4);
        let draw = Duration::from_millis(2);
        for distorted in [true, false, true] {
            assert!(stats.record(quarter, update, draw, distorted).is_none());
        }

        let report = stats
            .record(quarter, update, draw, false)
            .expect("a full second has elapsed");
        assert!((report.frames_per_second - 4.0).abs() < 1e-9);
        assert!((report.update_ms - 4.0).abs() < 1e-9);
        assert!((report.draw_ms - 2.0).abs() < 1e-9);
        assert!((report.distorted_percent - 50.0).abs() < 1e-9);

        assert!(stats.record(quarter, update, draw, false).is_none());
    }
}
