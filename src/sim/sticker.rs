//! Sticker generation
//!
//! A sticker is a physics body plus an immutable render descriptor. The
//! text layout is computed once here and never again.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scheme::{ColorScheme, PaletteColor, draw_inner_line, pick_scheme};
use super::text_fit::{FittedText, FontSpec, TextMeasure, fit};
use super::world::{Body, BodyHandle, BodyOptions, PhysicsWorld};
use crate::Rect;
use crate::consts::*;
use crate::phrases::pick_phrase;

/// Circle radius range
pub const CIRCLE_RADIUS: (f32, f32) = (44.0, 72.0);
/// Oval width/height ranges; chamfer is 45% of the short side
pub const OVAL_W: (f32, f32) = (120.0, 190.0);
pub const OVAL_H: (f32, f32) = (80.0, 120.0);
/// Rounded rectangle width/height/chamfer ranges
pub const ROUNDED_W: (f32, f32) = (130.0, 210.0);
pub const ROUNDED_H: (f32, f32) = (60.0, 100.0);
pub const ROUNDED_CHAMFER: (f32, f32) = (18.0, 28.0);
/// Capsule width/height ranges; chamfer is half the height
pub const CAPSULE_W: (f32, f32) = (160.0, 240.0);
pub const CAPSULE_H: (f32, f32) = (60.0, 82.0);
/// Hexagon/octagon radius and chamfer ranges
pub const POLYGON_RADIUS: (f32, f32) = (46.0, 74.0);
pub const POLYGON_CHAMFER: (f32, f32) = (10.0, 16.0);

#[inline]
fn between<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    rng.random_range(lo..hi)
}

/// Sticker outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Oval,
    RoundedRect,
    Capsule,
    Polygon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Oval,
        ShapeKind::RoundedRect,
        ShapeKind::Capsule,
        ShapeKind::Polygon,
    ];
}

/// Generated size of a sticker body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimensions {
    Circle { radius: f32 },
    Rect { width: f32, height: f32, chamfer: f32 },
    Polygon { sides: u32, radius: f32, chamfer: f32 },
}

impl Dimensions {
    /// Draw a random size for `kind` from its fixed ranges
    pub fn random<R: Rng>(kind: ShapeKind, rng: &mut R) -> Self {
        match kind {
            ShapeKind::Circle => Dimensions::Circle {
                radius: between(rng, CIRCLE_RADIUS),
            },
            ShapeKind::Oval => {
                let width = between(rng, OVAL_W);
                let height = between(rng, OVAL_H);
                Dimensions::Rect {
                    width,
                    height,
                    chamfer: width.min(height) * 0.45,
                }
            }
            ShapeKind::RoundedRect => Dimensions::Rect {
                width: between(rng, ROUNDED_W),
                height: between(rng, ROUNDED_H),
                chamfer: between(rng, ROUNDED_CHAMFER),
            },
            ShapeKind::Capsule => {
                let width = between(rng, CAPSULE_W);
                let height = between(rng, CAPSULE_H);
                Dimensions::Rect {
                    width,
                    height,
                    chamfer: height * 0.5,
                }
            }
            ShapeKind::Polygon => {
                let sides = if rng.random_bool(HEXAGON_CHANCE) { 6 } else { 8 };
                Dimensions::Polygon {
                    sides,
                    radius: between(rng, POLYGON_RADIUS),
                    chamfer: between(rng, POLYGON_CHAMFER),
                }
            }
        }
    }

    /// Physics body for these dimensions
    pub fn body(&self, position: Vec2, options: BodyOptions) -> Body {
        match *self {
            Dimensions::Circle { radius } => Body::circle(position, radius, options),
            Dimensions::Rect {
                width,
                height,
                chamfer,
            } => Body::rectangle(position, width, height, chamfer, options),
            Dimensions::Polygon {
                sides,
                radius,
                chamfer,
            } => Body::polygon(position, sides, radius, chamfer, options),
        }
    }
}

/// Immutable render descriptor attached to a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerStyle {
    pub fill: PaletteColor,
    pub outline: PaletteColor,
    pub outline_width: f32,
    /// Thin stroke of the same path, drawn over the outline
    pub inner_line: Option<PaletteColor>,
    pub inner_width: f32,
    pub outer_ring: Option<PaletteColor>,
    pub outer_ring_width: f32,
    pub text_color: PaletteColor,
    pub font: FontSpec,
    pub fitted: Option<FittedText>,
}

impl StickerStyle {
    /// Textless pink box used for the launcher
    pub fn launcher(font: FontSpec) -> Self {
        Self {
            fill: PaletteColor::Pink,
            outline: PaletteColor::Black,
            outline_width: 1.0,
            inner_line: None,
            inner_width: 0.0,
            outer_ring: None,
            outer_ring_width: 0.0,
            text_color: PaletteColor::Black,
            font,
            fitted: None,
        }
    }

    fn from_scheme(scheme: &ColorScheme, use_inner: bool, font: FontSpec, fitted: FittedText) -> Self {
        let inner_line = if use_inner { scheme.inner } else { None };
        Self {
            fill: scheme.fill,
            outline: PaletteColor::Black,
            outline_width: 1.0,
            inner_line,
            inner_width: if inner_line.is_some() { 1.0 } else { 0.0 },
            outer_ring: scheme.outer,
            outer_ring_width: if scheme.outer.is_some() { 1.0 } else { 0.0 },
            text_color: scheme.text,
            font,
            fitted: Some(fitted),
        }
    }
}

/// A launched sticker. Position and rotation belong to the physics body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sticker {
    pub handle: BodyHandle,
    pub kind: ShapeKind,
    pub dimensions: Dimensions,
    pub scheme: ColorScheme,
    pub style: StickerStyle,
}

/// Text box inside body bounds: 12% padding per axis (at least 10px)
pub fn text_box(bounds: &Rect) -> (f32, f32) {
    let pad_x = TEXT_PAD_MIN.max(bounds.width * TEXT_PAD_RATIO);
    let pad_y = TEXT_PAD_MIN.max(bounds.height * TEXT_PAD_RATIO);
    let max_w = TEXT_BOX_MIN_W.max(bounds.width - pad_x * 2.0);
    let max_h = TEXT_BOX_MIN_H.max(bounds.height - pad_y * 2.0);
    (max_w, max_h)
}

/// Builds stickers: body, scheme, fitted text and initial spin
#[derive(Debug, Clone)]
pub struct StickerFactory {
    pub font: FontSpec,
    pub phrases: Vec<String>,
}

impl StickerFactory {
    pub fn new(font: FontSpec, phrases: Vec<String>) -> Self {
        Self { font, phrases }
    }

    pub fn sticker_options() -> BodyOptions {
        BodyOptions {
            is_static: false,
            restitution: STICKER_RESTITUTION,
            air_friction: STICKER_AIR_FRICTION,
            visible: false,
        }
    }

    /// Create a sticker at `position` and add its body to `world`
    pub fn create<W, R, M>(&self, world: &mut W, rng: &mut R, measure: &M, position: Vec2) -> Sticker
    where
        W: PhysicsWorld,
        R: Rng,
        M: TextMeasure + ?Sized,
    {
        let kind = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];
        let phrase = pick_phrase(rng, &self.phrases).to_string();
        let scheme = pick_scheme(rng);
        let dimensions = Dimensions::random(kind, rng);
        let use_inner = draw_inner_line(rng);

        let body = dimensions.body(position, Self::sticker_options());
        let (max_w, max_h) = text_box(&body.bounds());
        let fitted = fit(measure, &phrase, max_w, max_h, &self.font);
        let style = StickerStyle::from_scheme(&scheme, use_inner, self.font.clone(), fitted);

        let handle = world.add(body);
        world.set_angular_velocity(handle, rng.random_range(-STICKER_SPIN_MAX..STICKER_SPIN_MAX));

        Sticker {
            handle,
            kind,
            dimensions,
            scheme,
            style,
        }
    }
}
