//! Browser `CanvasRenderingContext2d` backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::Canvas2d;
use crate::sim::text_fit::{FontSpec, TextMeasure};

impl Canvas2d for CanvasRenderingContext2d {
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = CanvasRenderingContext2d::translate(self, offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = CanvasRenderingContext2d::rotate(self, angle as f64);
    }

    fn clear(&mut self, size: Vec2, color: &str) {
        self.set_fill_style_str(color);
        self.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, point: Vec2) {
        CanvasRenderingContext2d::move_to(self, point.x as f64, point.y as f64);
    }

    fn line_to(&mut self, point: Vec2) {
        CanvasRenderingContext2d::line_to(self, point.x as f64, point.y as f64);
    }

    fn circle(&mut self, center: Vec2, radius: f32) {
        let _ = self.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn fill(&mut self, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self, color: &str, width: f32) {
        self.set_stroke_style_str(color);
        self.set_line_width(width as f64);
        self.set_line_join("round");
        self.set_line_cap("round");
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_text_centered(&mut self, text: &str, position: Vec2, color: &str, font: &str) {
        self.set_text_align("center");
        self.set_text_baseline("middle");
        self.set_fill_style_str(color);
        self.set_font(font);
        let _ = self.fill_text(text, position.x as f64, position.y as f64);
    }
}

/// Text measurement on a detached canvas
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
    pub fn new(document: &Document) -> Option<Self> {
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }
}

impl TextMeasure for CanvasMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec, size: u32) -> f32 {
        self.ctx.set_font(&font.css(size));
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(_) => f32::INFINITY,
        }
    }
}
