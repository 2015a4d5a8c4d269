//! Scene state owned by the frame driver
//!
//! Holds the physics world plus every controller that mutates it. Event
//! handlers and the tick both go through this struct on the one thread.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::launcher::LaunchController;
use super::pointer::PointerDrag;
use super::scroll::{RegionSource, ScrollDebounce, ScrollTracker, TrackerUpdate};
use super::sticker::{Sticker, StickerFactory, StickerStyle};
use super::text_fit::TextMeasure;
use super::walls::Walls;
use super::world::{BodyHandle, PhysicsWorld, World};
use crate::settings::SceneConfig;

/// Everything the scene needs between frames
#[derive(Debug)]
pub struct SceneState<W: PhysicsWorld = World> {
    pub config: SceneConfig,
    pub world: W,
    pub launcher: LaunchController,
    pub walls: Walls,
    pub tracker: ScrollTracker,
    pub scroll_debounce: ScrollDebounce,
    pub pointer: PointerDrag,
    /// Run seed for reproducibility
    pub seed: u64,
    viewport: Vec2,
    factory: StickerFactory,
    /// Render descriptors keyed by body; bodies without one are not drawn
    stickers: BTreeMap<BodyHandle, Sticker>,
    launcher_style: StickerStyle,
    pub(crate) rng: Pcg32,
    /// Unsimulated time carried between frames (ms)
    pub(crate) accumulator: f64,
    pub(crate) last_frame_ms: Option<f64>,
}

impl SceneState<World> {
    /// Scene on the built-in arena
    pub fn new(config: SceneConfig, viewport: Vec2, seed: u64, now_ms: f64) -> Self {
        let world = World::new(config.gravity);
        Self::with_world(world, config, viewport, seed, now_ms)
    }
}

impl<W: PhysicsWorld> SceneState<W> {
    /// Build walls and the launcher in `world` and start vibrating at `now_ms`
    pub fn with_world(mut world: W, config: SceneConfig, viewport: Vec2, seed: u64, now_ms: f64) -> Self {
        world.set_gravity(config.gravity);

        let mut walls = Walls::new(config.wall_thickness);
        walls.rebuild(&mut world, viewport);

        let launcher = LaunchController::spawn(
            &mut world,
            &config.launcher,
            viewport,
            config.vibrate_ms,
            config.scroll_unlock_delay_ms,
            now_ms,
        );

        let font = config.font();
        log::info!("Scene started: seed={seed}, viewport={}x{}", viewport.x, viewport.y);

        Self {
            factory: StickerFactory::new(font.clone(), config.phrases.clone()),
            launcher_style: StickerStyle::launcher(font),
            scroll_debounce: ScrollDebounce::new(config.scroll_debounce_ms),
            pointer: PointerDrag::new(config.pointer_stiffness),
            tracker: ScrollTracker::new(),
            rng: Pcg32::seed_from_u64(seed),
            stickers: BTreeMap::new(),
            accumulator: 0.0,
            last_frame_ms: None,
            config,
            world,
            launcher,
            walls,
            seed,
            viewport,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn sticker_count(&self) -> usize {
        self.stickers.len()
    }

    pub fn stickers(&self) -> impl Iterator<Item = &Sticker> {
        self.stickers.values()
    }

    pub fn sticker(&self, handle: BodyHandle) -> Option<&Sticker> {
        self.stickers.get(&handle)
    }

    /// Render descriptor for a body (stickers and the launcher)
    pub fn descriptor(&self, handle: BodyHandle) -> Option<&StickerStyle> {
        if handle == self.launcher.handle() {
            return Some(&self.launcher_style);
        }
        self.stickers.get(&handle).map(|s| &s.style)
    }

    /// Spawn `count` stickers inside the launcher footprint with outward
    /// kicks. Adds exactly `count` dynamic bodies; static bodies are untouched.
    pub fn explode_from_box<M: TextMeasure + ?Sized>(&mut self, count: usize, measure: &M) -> Vec<BodyHandle> {
        let kicks = self.launcher.kicks(&self.world, &mut self.rng, count);

        let handles: Vec<BodyHandle> = kicks
            .into_iter()
            .map(|kick| {
                let sticker = self.factory.create(&mut self.world, &mut self.rng, measure, kick.position);
                let handle = sticker.handle;
                self.world.set_velocity(handle, kick.velocity);
                self.stickers.insert(handle, sticker);
                handle
            })
            .collect();

        log::info!("Spawned {} stickers", handles.len());
        handles
    }

    /// Drop descriptors of bodies that left the world
    pub(crate) fn forget(&mut self, handles: &[BodyHandle]) {
        for handle in handles {
            self.stickers.remove(handle);
        }
    }

    /// Viewport changed: rebuild walls, move the launcher base, and refresh
    /// the tracked proxies if they exist
    pub fn on_resize<S: RegionSource + ?Sized>(&mut self, viewport: Vec2, regions: &S) {
        self.viewport = viewport;
        self.walls.rebuild(&mut self.world, viewport);

        let base = self.config.launcher.base_position(viewport);
        self.launcher.set_base_position(&mut self.world, base);

        if self.tracker.is_active() {
            self.tracker.update(&mut self.world, regions, viewport.y);
        }
    }

    /// Scroll event: update now and schedule the trailing update
    pub fn on_scroll<S: RegionSource + ?Sized>(&mut self, now_ms: f64, regions: &S) -> TrackerUpdate {
        self.scroll_debounce.on_scroll(now_ms);
        self.tracker.update(&mut self.world, regions, self.viewport.y)
    }

    pub fn pointer_down(&mut self, position: Vec2) -> Option<BodyHandle> {
        self.pointer.press(&self.world, position)
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.pointer.move_to(position);
    }

    pub fn pointer_up(&mut self) {
        self.pointer.release();
    }
}
