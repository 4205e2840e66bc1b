use glam::Vec2;
use haunted_dreams_core::ParameterState;
use haunted_dreams_rendering::{
    CockpitRenderer, Color, CompassReading, Scene, Screen, Screens, Surface, WaveTrace,
    WaveformRenderer, COMPASS_DOTS,
};

#[derive(Clone, Debug, PartialEq)]
enum Op {
    Clear(Color),
    Stroke { points: Vec<Vec2>, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
    Text(String),
    Flush,
}

#[derive(Debug, Default)]
struct RecordingSurface {
    ops: Vec<Op>,
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.ops.push(Op::Clear(color));
    }

    fn stroke_path(&mut self, points: &[Vec2], _width: f32, color: Color) {
        self.ops.push(Op::Stroke {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ops.push(Op::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.ops.push(Op::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, _position: Vec2, _size: f32, _color: Color) {
        self.ops.push(Op::Text(text.to_owned()));
    }

    fn flush(&mut self) {
        self.ops.push(Op::Flush);
    }
}

fn all_screens() -> Screens<RecordingSurface> {
    Screen::ALL
        .into_iter()
        .fold(Screens::new(), |screens, screen| {
            screens.with(screen, RecordingSurface::default())
        })
}

fn scene() -> Scene {
    let parameters = ParameterState::new(
        ParameterState::AMPLITUDE_RANGE,
        ParameterState::FREQUENCY_RANGE,
        0.45,
        2.42,
        0.1,
        1.0,
        3.3,
    );
    Scene::new(parameters, 6)
}

fn ops(screens: &Screens<RecordingSurface>, screen: Screen) -> &[Op] {
    &screens.get(screen).expect("screen mounted").ops
}

#[test]
fn engine_off_blacks_out_every_screen() {
    let mut renderer = CockpitRenderer::new(1);
    let mut screens = all_screens();
    let mut scene = scene();
    scene.engine_powered = false;

    renderer.render(&scene, &mut screens);

    for screen in Screen::ALL {
        assert_eq!(
            ops(&screens, screen),
            &[Op::Clear(Color::BLACK), Op::Flush],
            "{screen:?} should only be cleared"
        );
    }
}

#[test]
fn missing_screens_are_skipped() {
    let mut renderer = CockpitRenderer::new(1);
    let mut screens = Screens::new().with(Screen::Compass, RecordingSurface::default());

    renderer.render(&scene(), &mut screens);

    assert!(screens.get(Screen::Selector).is_none());
    assert_eq!(ops(&screens, Screen::Compass).last(), Some(&Op::Flush));
}

#[test]
fn readouts_show_two_decimals() {
    let mut renderer = CockpitRenderer::new(1);
    let mut screens = all_screens();

    renderer.render(&scene(), &mut screens);

    assert!(ops(&screens, Screen::AmplitudeReadout).contains(&Op::Text("A : 0.45".to_owned())));
    assert!(
        ops(&screens, Screen::FrequencyReadout).contains(&Op::Text("f : 2.42 Hz".to_owned()))
    );
}

#[test]
fn navigation_overlays_noise_only_while_distorted() {
    let mut renderer = CockpitRenderer::new(9);
    let mut screens = all_screens();
    let mut scene = scene();

    renderer.render(&scene, &mut screens);
    let strokes: Vec<&Op> = ops(&screens, Screen::Navigation)
        .iter()
        .filter(|op| matches!(op, Op::Stroke { .. }))
        .collect();
    assert_eq!(strokes.len(), 2, "tunable and position waves");
    let Op::Stroke { points, color } = strokes[1] else {
        unreachable!("filtered to strokes");
    };
    assert_eq!(*color, Color::LIGHT_GREEN);
    let clean = haunted_dreams_rendering::wave_points(0.1, 1.0);
    assert_ne!(points, &clean, "distorted position wave should be noise");

    scene.distorted = false;
    let mut screens = all_screens();
    renderer.render(&scene, &mut screens);
    let Some(Op::Stroke { points, .. }) = ops(&screens, Screen::Navigation)
        .iter()
        .filter(|op| matches!(op, Op::Stroke { .. }))
        .nth(1)
    else {
        panic!("position wave missing");
    };
    assert_eq!(points, &clean);
}

#[test]
fn tunable_wave_is_never_distorted() {
    let mut renderer = WaveformRenderer::new(3);
    let mut surface = RecordingSurface::default();
    let parameters = scene().parameters;
    renderer.draw_wave(&mut surface, &WaveTrace::tunable(&parameters), true);

    let expected = haunted_dreams_rendering::wave_points(0.45, 2.42);
    assert_eq!(
        surface.ops,
        vec![Op::Stroke {
            points: expected,
            color: Color::LIME
        }]
    );
}

#[test]
fn compass_lights_dot_matching_aim() {
    let renderer = WaveformRenderer::new(0);
    let mut surface = RecordingSurface::default();
    let aim = 3.0 / COMPASS_DOTS as f64 * std::f64::consts::TAU;
    renderer.draw_compass(
        &mut surface,
        &CompassReading {
            angle: 0.0,
            angle_to_aim: Some(aim),
        },
    );

    let dots: Vec<&Op> = surface
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Circle { radius, .. } if *radius == 20.0))
        .collect();
    assert_eq!(dots.len(), COMPASS_DOTS);
    let lit = dots
        .iter()
        .filter(|op| matches!(op, Op::Circle { color, .. } if *color == Color::LIME))
        .count();
    assert!(lit >= 1, "the dot at the aim angle must be lit");

    let needle = surface
        .ops
        .iter()
        .find_map(|op| match op {
            Op::Polygon { points, color } if *color == Color::NEEDLE_RED => Some(points.clone()),
            _ => None,
        })
        .expect("needle drawn");
    assert_eq!(needle[0], Vec2::new(256.0 + 130.0, 256.0));
}

#[test]
fn compass_stays_dark_without_lock() {
    let renderer = WaveformRenderer::new(0);
    let mut surface = RecordingSurface::default();
    renderer.draw_compass(&mut surface, &CompassReading::default());

    assert!(surface.ops.iter().all(|op| !matches!(
        op,
        Op::Circle { color, .. } if *color == Color::LIME
    )));
}
