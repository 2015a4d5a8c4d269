//! Host capabilities consumed by the simulation
//!
//! The simulation never reads wall-clock time or touches the page directly;
//! the frame driver passes these in.

use std::cell::Cell;

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Receives the one-shot "page may scroll now" signal after the explosion
pub trait ScrollGate {
    fn allow_scroll(&mut self);
}

/// Clock advanced by hand (tests, headless runs)
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Scroll gate that only records whether it fired
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LatchGate {
    pub opened: u32,
}

impl ScrollGate for LatchGate {
    fn allow_scroll(&mut self) {
        self.opened += 1;
    }
}
