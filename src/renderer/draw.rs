//! Sticker drawing pass

use glam::Vec2;

use super::Canvas2d;
use crate::settings::Palette;
use crate::sim::state::SceneState;
use crate::sim::sticker::StickerStyle;
use crate::sim::world::{Body, PhysicsWorld, Shape};

/// Trace a body outline in body-local space
pub fn trace_shape<C: Canvas2d + ?Sized>(canvas: &mut C, shape: &Shape) {
    canvas.begin_path();
    match shape {
        Shape::Circle { radius } => canvas.circle(Vec2::ZERO, *radius),
        Shape::Polygon { vertices } => {
            let mut iter = vertices.iter();
            if let Some(first) = iter.next() {
                canvas.move_to(*first);
                for v in iter {
                    canvas.line_to(*v);
                }
            }
            canvas.close_path();
        }
    }
}

/// Draw one body with its descriptor: outer ring, fill, outline, inner
/// line, then the fitted text
pub fn draw_sticker<C: Canvas2d + ?Sized>(canvas: &mut C, body: &Body, style: &StickerStyle, palette: &Palette) {
    canvas.save();
    canvas.translate(body.position);
    canvas.rotate(body.angle);

    if let Some(ring) = style.outer_ring {
        trace_shape(canvas, &body.shape);
        canvas.stroke(palette.hex(ring), style.outline_width + style.outer_ring_width);
    }

    trace_shape(canvas, &body.shape);
    canvas.fill(palette.hex(style.fill));

    trace_shape(canvas, &body.shape);
    canvas.stroke(palette.hex(style.outline), style.outline_width);

    if let Some(inner) = style.inner_line {
        trace_shape(canvas, &body.shape);
        canvas.stroke(palette.hex(inner), style.inner_width);
    }

    if let Some(fitted) = &style.fitted {
        let font = style.font.css(fitted.size);
        let color = palette.hex(style.text_color);
        let start = fitted.first_line_offset();
        for (i, line) in fitted.lines.iter().enumerate() {
            let y = start + i as f32 * fitted.line_height as f32;
            canvas.fill_text_centered(line, Vec2::new(0.0, y), color, &font);
        }
    }

    canvas.restore();
}

/// Clear to the background and draw every body that has a descriptor, in
/// world order
pub fn render_scene<C: Canvas2d + ?Sized, W: PhysicsWorld>(canvas: &mut C, state: &SceneState<W>) {
    let palette = &state.config.palette;
    canvas.clear(state.viewport(), &palette.background);

    for handle in state.world.handles() {
        if let (Some(body), Some(style)) = (state.world.body(handle), state.descriptor(handle)) {
            draw_sticker(canvas, body, style, palette);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SceneConfig;
    use crate::sim::scheme::PaletteColor;
    use crate::sim::text_fit::{ApproxMeasure, FontSpec, fit};
    use crate::sim::world::BodyOptions;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Save,
        Restore,
        Translate(Vec2),
        Rotate(f32),
        Clear(String),
        Begin,
        MoveTo(Vec2),
        LineTo(Vec2),
        Circle(f32),
        Close,
        Fill(String),
        Stroke(String, f32),
        Text(String, f32, String),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
    }

    impl RecordingCanvas {
        fn paints(&self) -> Vec<&Op> {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Fill(_) | Op::Stroke(..) | Op::Text(..)))
                .collect()
        }
    }

    impl Canvas2d for RecordingCanvas {
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn translate(&mut self, offset: Vec2) {
            self.ops.push(Op::Translate(offset));
        }
        fn rotate(&mut self, angle: f32) {
            self.ops.push(Op::Rotate(angle));
        }
        fn clear(&mut self, _size: Vec2, color: &str) {
            self.ops.push(Op::Clear(color.into()));
        }
        fn begin_path(&mut self) {
            self.ops.push(Op::Begin);
        }
        fn move_to(&mut self, point: Vec2) {
            self.ops.push(Op::MoveTo(point));
        }
        fn line_to(&mut self, point: Vec2) {
            self.ops.push(Op::LineTo(point));
        }
        fn circle(&mut self, _center: Vec2, radius: f32) {
            self.ops.push(Op::Circle(radius));
        }
        fn close_path(&mut self) {
            self.ops.push(Op::Close);
        }
        fn fill(&mut self, color: &str) {
            self.ops.push(Op::Fill(color.into()));
        }
        fn stroke(&mut self, color: &str, width: f32) {
            self.ops.push(Op::Stroke(color.into(), width));
        }
        fn fill_text_centered(&mut self, text: &str, position: Vec2, _color: &str, font: &str) {
            self.ops.push(Op::Text(text.into(), position.y, font.into()));
        }
    }

    fn rimmed_style() -> StickerStyle {
        let font = FontSpec::new("system-ui", 900);
        StickerStyle {
            fill: PaletteColor::Black,
            outline: PaletteColor::Black,
            outline_width: 1.0,
            inner_line: Some(PaletteColor::Orange),
            inner_width: 1.0,
            outer_ring: Some(PaletteColor::Blue),
            outer_ring_width: 1.0,
            text_color: PaletteColor::Orange,
            fitted: Some(fit(&ApproxMeasure::default(), "Ingen\ntager", 200.0, 100.0, &font)),
            font,
        }
    }

    #[test]
    fn test_paint_order() {
        let palette = Palette::default();
        let body = Body::circle(Vec2::new(10.0, 20.0), 30.0, BodyOptions::default());
        let mut canvas = RecordingCanvas::default();
        draw_sticker(&mut canvas, &body, &rimmed_style(), &palette);

        let paints = canvas.paints();
        assert_eq!(paints[0], &Op::Stroke("#2F80FF".into(), 2.0));
        assert_eq!(paints[1], &Op::Fill("#000000".into()));
        assert_eq!(paints[2], &Op::Stroke("#000000".into(), 1.0));
        assert_eq!(paints[3], &Op::Stroke("#FF5F00".into(), 1.0));
        assert!(matches!(paints[4], Op::Text(t, _, _) if t == "Ingen"));
        assert!(matches!(paints[5], Op::Text(t, _, _) if t == "tager"));

        assert_eq!(canvas.ops.first(), Some(&Op::Save));
        assert_eq!(canvas.ops[1], Op::Translate(Vec2::new(10.0, 20.0)));
        assert_eq!(canvas.ops.last(), Some(&Op::Restore));
    }

    #[test]
    fn test_text_lines_are_centered_vertically() {
        let style = rimmed_style();
        let fitted = style.fitted.clone().unwrap();
        let body = Body::circle(Vec2::ZERO, 30.0, BodyOptions::default());
        let mut canvas = RecordingCanvas::default();
        draw_sticker(&mut canvas, &body, &style, &Palette::default());

        let ys: Vec<f32> = canvas
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(_, y, _) => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys.len(), 2);
        // Symmetric around the center
        assert!((ys[0] + ys[1]).abs() < 1e-4);
        assert_eq!(ys[1] - ys[0], fitted.line_height as f32);
    }

    #[test]
    fn test_polygon_path_uses_local_vertices() {
        let mut body = Body::rectangle(Vec2::new(500.0, 500.0), 40.0, 20.0, 0.0, BodyOptions::default());
        body.angle = 1.0;
        let mut canvas = RecordingCanvas::default();
        trace_shape(&mut canvas, &body.shape);

        assert_eq!(canvas.ops.first(), Some(&Op::Begin));
        assert_eq!(canvas.ops.last(), Some(&Op::Close));
        for op in &canvas.ops {
            if let Op::MoveTo(p) | Op::LineTo(p) = op {
                assert!(p.x.abs() <= 20.0 + 1e-4 && p.y.abs() <= 10.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_render_scene_skips_undecorated_bodies() {
        let state = SceneState::new(SceneConfig::default(), Vec2::new(800.0, 600.0), 3, 0.0);
        let mut canvas = RecordingCanvas::default();
        render_scene(&mut canvas, &state);

        assert_eq!(canvas.ops[0], Op::Clear("#FF5F00".into()));
        // Only the launcher is drawn; walls have no descriptor
        let saves = canvas.ops.iter().filter(|op| **op == Op::Save).count();
        assert_eq!(saves, 1);
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Text(..))));
    }
}
