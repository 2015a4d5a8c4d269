//! Canvas 2D rendering
//!
//! Stickers are drawn from their cached descriptors on top of the physics
//! bodies. Nothing here is recomputed per frame except the transform.

pub mod draw;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use draw::{draw_sticker, render_scene, trace_shape};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasMeasure;

use glam::Vec2;

/// The subset of the 2D canvas API the sticker pass uses
pub trait Canvas2d {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);

    /// Fill the whole surface with `color`
    fn clear(&mut self, size: Vec2, color: &str);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    /// Full circle sub-path
    fn circle(&mut self, center: Vec2, radius: f32);
    fn close_path(&mut self);

    fn fill(&mut self, color: &str);
    /// Stroke the current path with round joins and caps
    fn stroke(&mut self, color: &str, width: f32);

    /// Text centered horizontally and vertically on `position`
    fn fill_text_centered(&mut self, text: &str, position: Vec2, color: &str, font: &str);
}
