use glam::Vec2;
use haunted_dreams_rendering::{Color, Surface, Viewport};
use macroquad::math::Vec2 as MacroquadVec2;

/// Draws a screen's logical canvas straight into the macroquad window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MacroquadSurface {
    viewport: Viewport,
}

impl MacroquadSurface {
    pub(crate) const fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    fn point(&self, canvas_point: Vec2) -> MacroquadVec2 {
        let window = self.viewport.to_window(canvas_point);
        MacroquadVec2::new(window.x, window.y)
    }
}

impl Surface for MacroquadSurface {
    fn clear(&mut self, color: Color) {
        let origin = self.viewport.origin();
        let size = self.viewport.size();
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }

    fn stroke_path(&mut self, points: &[Vec2], width: f32, color: Color) {
        let thickness = (width * self.viewport.scale()).max(1.0);
        let color = to_macroquad_color(color);
        for pair in points.windows(2) {
            let start = self.point(pair[0]);
            let end = self.point(pair[1]);
            macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = self.point(center);
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius * self.viewport.scale(),
            to_macroquad_color(color),
        );
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let color = to_macroquad_color(color);
        let anchor = self.point(first);
        for pair in rest.windows(2) {
            macroquad::shapes::draw_triangle(
                anchor,
                self.point(pair[0]),
                self.point(pair[1]),
                color,
            );
        }
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color) {
        let anchor = self.point(position);
        let _ = macroquad::text::draw_text(
            text,
            anchor.x,
            anchor.y,
            size * self.viewport.scale(),
            to_macroquad_color(color),
        );
    }

    fn flush(&mut self) {
        // Shapes land in the window batch directly; next_frame presents them.
    }
}

pub(crate) fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
