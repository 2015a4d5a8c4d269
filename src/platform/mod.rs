//! Platform abstraction layer
//!
//! Implements the host capabilities the simulation consumes:
//! - Time ([`Clock`](crate::sim::Clock)): `performance.now()` on web, `Instant` natively
//! - Page regions and scroll unlock (web only)

pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use time::SystemClock;

#[cfg(target_arch = "wasm32")]
pub use dom::{BodyScrollGate, DomRegions, set_interactive};
