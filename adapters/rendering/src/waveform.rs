use std::f64::consts::{PI, TAU};

use glam::Vec2;
use haunted_dreams_core::{fixed_eq, to_fixed, ParameterState, ANGLE_PRECISION, LOCK_PRECISION};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Color, Scene, Screen, Screens, Surface, CANVAS_SIZE};

/// Number of aim dots around the compass ring.
pub const COMPASS_DOTS: usize = 21;

const SAMPLES: usize = 512;
const CENTER_Y: f64 = 256.0;
const WAVE_HEIGHT: f64 = 80.0;
const WAVE_LENGTH: f64 = 4.0 * PI;
const LINE_WIDTH: f32 = 3.0;

const COMPASS_RADIUS: f32 = 220.0;
const DOT_RADIUS: f32 = 20.0;
const NEEDLE_DISC_RADIUS: f32 = 150.0;
const NEEDLE: [Vec2; 3] = [
    Vec2::new(130.0, 0.0),
    Vec2::new(-100.0, -70.0),
    Vec2::new(-100.0, 70.0),
];

const READOUT_POSITION: Vec2 = Vec2::new(70.0, 150.0);
const READOUT_SIZE: f32 = 80.0;

/// One wave drawn on an oscilloscope screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTrace {
    /// Amplitude of the sine.
    pub amplitude: f64,
    /// Frequency of the sine.
    pub frequency: f64,
    /// Stroke color.
    pub color: Color,
    /// Whether the global distortion flag may replace the sine with noise.
    pub allow_distortion: bool,
}

impl WaveTrace {
    /// Trace of the player-tuned wave; never distorted.
    #[must_use]
    pub fn tunable(parameters: &ParameterState) -> Self {
        Self {
            amplitude: parameters.amplitude(),
            frequency: parameters.frequency(),
            color: Color::LIME,
            allow_distortion: false,
        }
    }

    /// Trace of the ship's position wave.
    #[must_use]
    pub fn position(parameters: &ParameterState) -> Self {
        Self {
            amplitude: parameters.position_amplitude(),
            frequency: parameters.position_frequency(),
            color: Color::LIGHT_GREEN,
            allow_distortion: true,
        }
    }
}

/// Samples a clean sine across the canvas width.
#[must_use]
pub fn wave_points(amplitude: f64, frequency: f64) -> Vec<Vec2> {
    (0..SAMPLES)
        .map(|i| {
            let phase = frequency * (i as f64 / SAMPLES as f64) * WAVE_LENGTH;
            let y = CENTER_Y - amplitude * phase.sin() * WAVE_HEIGHT;
            Vec2::new(i as f32, y as f32)
        })
        .collect()
}

/// Heading and aim shown on the compass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompassReading {
    /// Current heading in radians.
    pub angle: f64,
    /// Heading of the locked nightmare, if any.
    pub angle_to_aim: Option<f64>,
}

/// Angle of the compass dot at `index`.
fn dot_angle(index: usize) -> f64 {
    index as f64 / COMPASS_DOTS as f64 * TAU
}

/// Formats the amplitude readout.
#[must_use]
pub fn amplitude_readout(amplitude: f64) -> String {
    format!("A : {}", to_fixed(amplitude, LOCK_PRECISION))
}

/// Formats the frequency readout.
#[must_use]
pub fn frequency_readout(frequency: f64) -> String {
    format!("f : {} Hz", to_fixed(frequency, LOCK_PRECISION))
}

/// Draws oscilloscope traces, the compass, and readouts.
///
/// Distortion noise is drawn from a seeded generator so that a run can be
/// reproduced exactly.
#[derive(Debug)]
pub struct WaveformRenderer {
    rng: ChaCha8Rng,
}

impl WaveformRenderer {
    /// Creates a renderer whose distortion noise is seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Strokes the trace, substituting noise when distortion applies.
    pub fn draw_wave<S: Surface + ?Sized>(&mut self, surface: &mut S, trace: &WaveTrace, distorted: bool) {
        let points = if trace.allow_distortion && distorted {
            self.noise_points()
        } else {
            wave_points(trace.amplitude, trace.frequency)
        };
        surface.stroke_path(&points, LINE_WIDTH, trace.color);
    }

    fn noise_points(&mut self) -> Vec<Vec2> {
        (0..SAMPLES)
            .map(|i| {
                let i_f = i as f64;
                let r: [f64; 5] = self.rng.gen();
                let y = CENTER_Y
                    + (i_f * 0.1 + r[0] * 50.0).sin() * (r[1] * 50.0)
                    + (i_f * 0.05 + r[2] * 30.0).cos() * (r[3] * 30.0)
                    + (r[4] - 0.5) * 10.0;
                Vec2::new(i as f32, y as f32)
            })
            .collect()
    }

    /// Draws the aim dots and the heading needle.
    pub fn draw_compass<S: Surface + ?Sized>(&self, surface: &mut S, reading: &CompassReading) {
        let center = Vec2::splat(CANVAS_SIZE / 2.0);
        for index in 0..COMPASS_DOTS {
            let angle = dot_angle(index);
            let position = center
                + Vec2::new(angle.cos() as f32, angle.sin() as f32) * COMPASS_RADIUS;
            let lit = reading
                .angle_to_aim
                .is_some_and(|aim| fixed_eq(angle, aim, ANGLE_PRECISION));
            let color = if lit {
                Color::LIME
            } else {
                Color::COMPASS_BASE
            };
            surface.fill_circle(position, DOT_RADIUS, color);
        }

        surface.fill_circle(center, NEEDLE_DISC_RADIUS, Color::BLACK);
        let (sin, cos) = reading.angle.sin_cos();
        let (sin, cos) = (sin as f32, cos as f32);
        let needle: Vec<Vec2> = NEEDLE
            .iter()
            .map(|point| center + Vec2::new(point.x * cos - point.y * sin, point.x * sin + point.y * cos))
            .collect();
        surface.fill_polygon(&needle, Color::NEEDLE_RED);
        let mut outline = needle.clone();
        outline.push(needle[0]);
        surface.stroke_path(&outline, LINE_WIDTH, Color::NEEDLE_RED);
    }

    /// Draws a readout line.
    pub fn draw_readout<S: Surface + ?Sized>(&self, surface: &mut S, text: &str) {
        surface.draw_text(text, READOUT_POSITION, READOUT_SIZE, Color::LIME);
    }
}

/// Renders every cockpit screen from a scene.
#[derive(Debug)]
pub struct CockpitRenderer {
    waveform: WaveformRenderer,
}

impl CockpitRenderer {
    /// Creates a renderer whose distortion noise is seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            waveform: WaveformRenderer::new(seed),
        }
    }

    /// Redraws and flushes every mounted screen.
    pub fn render<S: Surface>(&mut self, scene: &Scene, screens: &mut Screens<S>) {
        if !scene.engine_powered {
            for screen in Screen::ALL {
                if let Some(surface) = screens.get_mut(screen) {
                    surface.clear(Color::BLACK);
                    surface.flush();
                }
            }
            return;
        }

        let parameters = &scene.parameters;
        let tunable = WaveTrace::tunable(parameters);

        if let Some(surface) = screens.get_mut(Screen::Selector) {
            surface.clear(Color::BLACK);
            self.waveform.draw_wave(surface, &tunable, scene.distorted);
            surface.flush();
        }

        if let Some(surface) = screens.get_mut(Screen::Navigation) {
            surface.clear(Color::BLACK);
            self.waveform.draw_wave(surface, &tunable, scene.distorted);
            self.waveform
                .draw_wave(surface, &WaveTrace::position(parameters), scene.distorted);
            surface.flush();
        }

        if let Some(surface) = screens.get_mut(Screen::Compass) {
            surface.clear(Color::BLACK);
            self.waveform.draw_compass(
                surface,
                &CompassReading {
                    angle: parameters.angle(),
                    angle_to_aim: scene.angle_to_aim,
                },
            );
            surface.flush();
        }

        if let Some(surface) = screens.get_mut(Screen::AmplitudeReadout) {
            surface.clear(Color::BLACK);
            self.waveform
                .draw_readout(surface, &amplitude_readout(parameters.amplitude()));
            surface.flush();
        }

        if let Some(surface) = screens.get_mut(Screen::FrequencyReadout) {
            surface.clear(Color::BLACK);
            self.waveform
                .draw_readout(surface, &frequency_readout(parameters.frequency()));
            surface.flush();
        }
    }
}
