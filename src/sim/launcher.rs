//! Launcher box: vibrate, then explode exactly once
//!
//! `Vibrating` -> `Exploded` is driven by polling elapsed clock time each
//! tick. The explosion itself (spawning stickers) is performed by the caller
//! when [`LaunchEvent::Exploded`] is returned.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::world::{Body, BodyHandle, BodyOptions, PhysicsWorld};
use crate::consts::*;
use crate::settings::LauncherConfig;

/// Launcher lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LaunchPhase {
    Vibrating,
    /// Terminal. `at_ms` is the clock reading of the explosion tick.
    Exploded { at_ms: f64 },
}

/// What a controller tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchEvent {
    /// Still shaking
    Vibrating,
    /// Threshold crossed this tick; spawn the stickers now
    Exploded,
    /// Scroll-unlock delay elapsed this tick (fires once)
    ScrollUnlocked,
    /// Nothing left to do
    Idle,
}

/// Rest pose the vibration oscillates around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LauncherPose {
    pub position: Vec2,
    pub angle: f32,
}

/// Spawn position and initial velocity of one sticker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchKick {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Bounded vibration offset at `elapsed_ms` into a `vibrate_ms` phase.
///
/// Returns `(dx, dangle)`: amplitude ramps 2 -> 7 px and rotation
/// 0 -> 0.01 rad. `jitter` in [-0.5, 0.5) adds up to ±0.75 px of noise.
pub fn vibration_offset(elapsed_ms: f64, vibrate_ms: f64, now_ms: f64, jitter: f32) -> (f32, f32) {
    let ramp = (elapsed_ms / vibrate_ms).clamp(0.0, 1.0) as f32;
    let amp = VIBRATE_AMP_START + VIBRATE_AMP_RAMP * ramp;
    let rot = VIBRATE_ROT_MAX * ramp;

    let t = (now_ms * 0.06) as f32;
    let dx = t.sin() * amp + jitter * VIBRATE_JITTER;
    let da = (t * 0.9).sin() * rot;
    (dx, da)
}

#[derive(Debug, Clone)]
pub struct LaunchController {
    handle: BodyHandle,
    base: LauncherPose,
    size: Vec2,
    phase: LaunchPhase,
    start_ms: f64,
    vibrate_ms: f64,
    scroll_unlock_delay_ms: f64,
    scroll_unlocked: bool,
}

impl LaunchController {
    /// Add the static launcher body at its base pose and start vibrating
    pub fn spawn<W: PhysicsWorld>(
        world: &mut W,
        launcher: &LauncherConfig,
        viewport: Vec2,
        vibrate_ms: f64,
        scroll_unlock_delay_ms: f64,
        now_ms: f64,
    ) -> Self {
        let position = launcher.base_position(viewport);
        let handle = world.add(Body::rectangle(
            position,
            launcher.width,
            launcher.height,
            launcher.chamfer,
            BodyOptions::fixed(),
        ));

        Self {
            handle,
            base: LauncherPose {
                position,
                angle: 0.0,
            },
            size: launcher.size(),
            phase: LaunchPhase::Vibrating,
            start_ms: now_ms,
            vibrate_ms,
            scroll_unlock_delay_ms,
            scroll_unlocked: false,
        }
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    pub fn phase(&self) -> LaunchPhase {
        self.phase
    }

    pub fn is_exploded(&self) -> bool {
        matches!(self.phase, LaunchPhase::Exploded { .. })
    }

    pub fn base(&self) -> LauncherPose {
        self.base
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Advance the state machine to `now_ms`
    pub fn tick<W: PhysicsWorld, R: Rng>(&mut self, world: &mut W, rng: &mut R, now_ms: f64) -> LaunchEvent {
        match self.phase {
            LaunchPhase::Vibrating => {
                let elapsed = now_ms - self.start_ms;
                if elapsed < self.vibrate_ms {
                    let jitter = rng.random::<f32>() - 0.5;
                    let (dx, da) = vibration_offset(elapsed, self.vibrate_ms, now_ms, jitter);
                    world.set_position(self.handle, self.base.position + Vec2::new(dx, 0.0));
                    world.set_angle(self.handle, self.base.angle + da);
                    LaunchEvent::Vibrating
                } else {
                    self.snap_to_base(world);
                    self.phase = LaunchPhase::Exploded { at_ms: now_ms };
                    log::info!("Launcher exploded after {elapsed:.0}ms");
                    LaunchEvent::Exploded
                }
            }
            LaunchPhase::Exploded { at_ms } => {
                if !self.scroll_unlocked && now_ms - at_ms >= self.scroll_unlock_delay_ms {
                    self.scroll_unlocked = true;
                    LaunchEvent::ScrollUnlocked
                } else {
                    LaunchEvent::Idle
                }
            }
        }
    }

    /// Put the launcher exactly on its base pose
    pub fn snap_to_base<W: PhysicsWorld>(&self, world: &mut W) {
        world.set_position(self.handle, self.base.position);
        world.set_angle(self.handle, self.base.angle);
    }

    /// Move the base pose (viewport resize) and snap to it
    pub fn set_base_position<W: PhysicsWorld>(&mut self, world: &mut W, position: Vec2) {
        self.base.position = position;
        self.snap_to_base(world);
    }

    /// Random spawn points inside the launcher footprint, each with an
    /// outward kick plus an upward bias
    pub fn kicks<W: PhysicsWorld, R: Rng>(&self, world: &W, rng: &mut R, count: usize) -> Vec<LaunchKick> {
        let origin = world
            .body(self.handle)
            .map(|b| b.position)
            .unwrap_or(self.base.position);
        let spread = Vec2::new(self.size.x * SPAWN_SPREAD_X, self.size.y * SPAWN_SPREAD_Y);

        (0..count)
            .map(|_| {
                let position = origin
                    + Vec2::new(
                        rng.random_range(-spread.x..=spread.x),
                        rng.random_range(-spread.y..=spread.y),
                    );
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let speed = rng.random_range(LAUNCH_SPEED_MIN..LAUNCH_SPEED_MAX);
                let lift = rng.random_range(LAUNCH_LIFT_MIN..LAUNCH_LIFT_MAX);
                LaunchKick {
                    position,
                    velocity: Vec2::new(angle.cos() * speed, angle.sin() * speed - lift),
                }
            })
            .collect()
    }
}
