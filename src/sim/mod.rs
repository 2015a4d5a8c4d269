//! Deterministic scene simulation
//!
//! Everything that decides what the scene looks like lives here. This module
//! must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body handle)
//! - No rendering or platform dependencies; host capabilities come in
//!   through traits ([`Clock`], [`ScrollGate`], [`TextMeasure`], [`RegionSource`])

pub mod host;
pub mod launcher;
pub mod pointer;
pub mod scheme;
pub mod scroll;
pub mod state;
pub mod sticker;
pub mod text_fit;
pub mod tick;
pub mod walls;
pub mod world;

pub use host::{Clock, LatchGate, ManualClock, ScrollGate};
pub use launcher::{LaunchController, LaunchEvent, LaunchKick, LaunchPhase, LauncherPose, vibration_offset};
pub use pointer::{Grab, PointerDrag};
pub use scheme::{ColorScheme, PaletteColor, SCHEME_TABLE, SchemeVariant, pick_scheme};
pub use scroll::{RegionSource, ScrollDebounce, ScrollTracker, TrackedRegion, TrackerUpdate};
pub use state::SceneState;
pub use sticker::{Dimensions, ShapeKind, Sticker, StickerFactory, StickerStyle};
pub use text_fit::{ApproxMeasure, FittedText, FontSpec, TextMeasure, fit};
pub use tick::{FrameReport, tick};
pub use walls::{Walls, cleanup_tick};
pub use world::{Body, BodyHandle, BodyOptions, PhysicsWorld, Shape, World};
