//! Sticker Burst - quote stickers launched into a 2D physics scene
//!
//! Core modules:
//! - `sim`: Deterministic scene simulation (text fitting, sticker generation,
//!   launch state machine, world maintenance, scroll-tracked obstacles)
//! - `renderer`: Canvas 2D drawing of cached sticker descriptors
//! - `platform`: Browser/native capabilities (clock, DOM regions, scroll gate)
//! - `settings`: Serde-backed scene configuration

pub mod phrases;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Palette, SceneConfig};

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Base physics step (ms); velocities are expressed in px per base step
    pub const STEP_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta added to the step accumulator (ms)
    pub const MAX_STEP_MS: f64 = 1000.0 / 30.0;
    /// Max physics steps per frame (prevents spiral of death)
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Gravity is scaled like a force: `gravity * GRAVITY_SCALE * dt²`
    pub const GRAVITY_SCALE: f32 = 0.001;

    /// Default number of stickers per explosion
    pub const LAUNCH_COUNT: usize = 34;
    /// Default gravity scalar
    pub const GRAVITY: f32 = 1.05;

    /// Vibrate phase length before the explosion (ms)
    pub const VIBRATE_MS: f64 = 2000.0;
    /// Delay between explosion and the scroll unlock signal (ms)
    pub const SCROLL_UNLOCK_DELAY_MS: f64 = 1000.0;
    /// Vibration amplitude ramps from START to START + RAMP px
    pub const VIBRATE_AMP_START: f32 = 2.0;
    pub const VIBRATE_AMP_RAMP: f32 = 5.0;
    /// Peak vibration rotation (radians)
    pub const VIBRATE_ROT_MAX: f32 = 0.01;
    /// Random jitter added to the horizontal offset (px, full width)
    pub const VIBRATE_JITTER: f32 = 1.5;

    /// Launcher box defaults
    pub const BOX_W: f32 = 90.0;
    pub const BOX_H: f32 = 190.0;
    pub const BOX_CHAMFER: f32 = 36.0;
    pub const BOX_BOTTOM_GAP: f32 = 10.0;
    /// Spawn footprint as a fraction of the launcher box (±)
    pub const SPAWN_SPREAD_X: f32 = 0.28;
    pub const SPAWN_SPREAD_Y: f32 = 0.22;
    /// Radial launch speed range (px/step)
    pub const LAUNCH_SPEED_MIN: f32 = 9.0;
    pub const LAUNCH_SPEED_MAX: f32 = 17.0;
    /// Extra upward kick range (px/step)
    pub const LAUNCH_LIFT_MIN: f32 = 7.0;
    pub const LAUNCH_LIFT_MAX: f32 = 13.0;

    /// Sticker body material
    pub const STICKER_RESTITUTION: f32 = 0.35;
    pub const STICKER_AIR_FRICTION: f32 = 0.018;
    /// Surface friction of every collider
    pub const BODY_FRICTION: f32 = 0.1;
    /// Pixels per physics length unit, scales contact tolerances
    pub const LENGTH_UNIT: f32 = 100.0;
    /// Initial spin range (rad/step, ±)
    pub const STICKER_SPIN_MAX: f32 = 0.22;
    /// Probability that a sticker renders its inner line
    pub const INNER_LINE_CHANCE: f64 = 0.55;
    /// Probability that a polygon sticker is a hexagon (else octagon)
    pub const HEXAGON_CHANCE: f64 = 0.6;

    /// Text box padding as a fraction of the body bounds, per axis
    pub const TEXT_PAD_RATIO: f32 = 0.12;
    pub const TEXT_PAD_MIN: f32 = 10.0;
    pub const TEXT_BOX_MIN_W: f32 = 30.0;
    pub const TEXT_BOX_MIN_H: f32 = 20.0;

    /// Text fitting
    pub const FONT_SIZE_MAX: u32 = 18;
    pub const FONT_SIZE_START_MIN: u32 = 10;
    pub const FONT_SIZE_FLOOR: u32 = 8;
    pub const FONT_SIZE_WIDTH_RATIO: f32 = 0.12;
    pub const LINE_HEIGHT_RATIO: f32 = 1.10;
    pub const MAX_LINES: usize = 4;

    /// Dynamic bodies this far below the viewport are removed (px)
    pub const CLEANUP_MARGIN: f32 = 600.0;
    /// Boundary wall thickness (px)
    pub const WALL_THICKNESS: f32 = 80.0;

    /// Trailing scroll update delay (ms)
    pub const SCROLL_DEBOUNCE_MS: f64 = 50.0;
    /// Pointer drag spring stiffness
    pub const POINTER_STIFFNESS: f32 = 0.2;
    /// Device pixel ratio cap
    pub const MAX_PIXEL_RATIO: f64 = 2.0;
}

/// Axis-aligned rectangle in screen/world pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// True if any part of the rect is inside the vertical band [0, viewport_h)
    pub fn intersects_viewport(&self, viewport_h: f32) -> bool {
        self.top < viewport_h && self.bottom() > 0.0
    }
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_viewport_intersection() {
        assert!(Rect::new(0.0, 500.0, 100.0, 200.0).intersects_viewport(600.0));
        assert!(Rect::new(0.0, -150.0, 100.0, 200.0).intersects_viewport(600.0));
        assert!(!Rect::new(0.0, 600.0, 100.0, 200.0).intersects_viewport(600.0));
        assert!(!Rect::new(0.0, -200.0, 100.0, 200.0).intersects_viewport(600.0));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
