//! Screen regions mirrored into the world as moving static obstacles
//!
//! While the host region (the page footer) is on screen, two static bodies
//! track the rectangles of its orange and pink sections. Scrolling moves the
//! bodies, which shovels stickers around.

use serde::{Deserialize, Serialize};

use super::world::{Body, BodyHandle, BodyOptions, PhysicsWorld};
use crate::Rect;

/// The two tracked sub-regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedRegion {
    Orange,
    Pink,
}

impl TrackedRegion {
    pub const ALL: [TrackedRegion; 2] = [TrackedRegion::Orange, TrackedRegion::Pink];
}

/// Screen-rectangle queries against the page. `None` means "not mounted".
pub trait RegionSource {
    /// Rectangle of the host region that decides visibility
    fn host_rect(&self) -> Option<Rect>;

    fn region_rect(&self, region: TrackedRegion) -> Option<Rect>;
}

/// Outcome of one [`ScrollTracker::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerUpdate {
    /// A region is not mounted; nothing changed
    Skipped,
    /// Host off screen and no proxies exist
    Idle,
    Created,
    Moved,
    Removed,
}

/// Lifecycle of the two proxy bodies
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    proxies: Option<[BodyHandle; 2]>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.proxies.is_some()
    }

    /// Proxy handles in [`TrackedRegion::ALL`] order
    pub fn proxies(&self) -> Option<[BodyHandle; 2]> {
        self.proxies
    }

    /// Sync proxies with the current region rectangles
    pub fn update<W: PhysicsWorld, S: RegionSource + ?Sized>(
        &mut self,
        world: &mut W,
        source: &S,
        viewport_h: f32,
    ) -> TrackerUpdate {
        let Some(host) = source.host_rect() else {
            return TrackerUpdate::Skipped;
        };

        if !host.intersects_viewport(viewport_h) {
            return match self.proxies.take() {
                Some(handles) => {
                    world.remove_many(&handles);
                    log::info!("Tracked regions left the viewport, proxies removed");
                    TrackerUpdate::Removed
                }
                None => TrackerUpdate::Idle,
            };
        }

        let (Some(orange), Some(pink)) = (
            source.region_rect(TrackedRegion::Orange),
            source.region_rect(TrackedRegion::Pink),
        ) else {
            return TrackerUpdate::Skipped;
        };

        match self.proxies {
            None => {
                let handles = [orange, pink].map(|rect| {
                    world.add(Body::rectangle(
                        rect.center(),
                        rect.width,
                        rect.height,
                        0.0,
                        BodyOptions::fixed(),
                    ))
                });
                self.proxies = Some(handles);
                log::info!("Tracked regions entered the viewport, proxies created");
                TrackerUpdate::Created
            }
            Some([orange_body, pink_body]) => {
                world.set_position(orange_body, orange.center());
                world.set_position(pink_body, pink.center());
                TrackerUpdate::Moved
            }
        }
    }
}

/// Immediate update on every scroll event plus one trailing update once
/// scrolling has been quiet for `delay_ms`
#[derive(Debug, Clone)]
pub struct ScrollDebounce {
    delay_ms: f64,
    pending_at: Option<f64>,
}

impl ScrollDebounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending_at: None,
        }
    }

    /// Record a scroll event, pushing the trailing update back
    pub fn on_scroll(&mut self, now_ms: f64) {
        self.pending_at = Some(now_ms + self.delay_ms);
    }

    /// True once when the trailing update is due
    pub fn take_due(&mut self, now_ms: f64) -> bool {
        match self.pending_at {
            Some(at) if now_ms >= at => {
                self.pending_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::World;
    use std::cell::Cell;

    const VIEWPORT_H: f32 = 800.0;

    /// Footer whose top edge is moved by the test
    struct FakePage {
        footer_top: Cell<f32>,
        mounted: bool,
    }

    impl FakePage {
        fn new(footer_top: f32) -> Self {
            Self {
                footer_top: Cell::new(footer_top),
                mounted: true,
            }
        }
    }

    impl RegionSource for FakePage {
        fn host_rect(&self) -> Option<Rect> {
            Some(Rect::new(0.0, self.footer_top.get(), 1000.0, 300.0))
        }

        fn region_rect(&self, region: TrackedRegion) -> Option<Rect> {
            if !self.mounted {
                return None;
            }
            let left = match region {
                TrackedRegion::Orange => 0.0,
                TrackedRegion::Pink => 500.0,
            };
            Some(Rect::new(left, self.footer_top.get(), 500.0, 300.0))
        }
    }

    #[test]
    fn test_out_of_view_without_proxies_is_noop() {
        let mut world = World::default();
        let mut tracker = ScrollTracker::new();
        let page = FakePage::new(2000.0);

        assert_eq!(tracker.update(&mut world, &page, VIEWPORT_H), TrackerUpdate::Idle);
        assert_eq!(world.len(), 0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_create_then_move_then_remove() {
        let mut world = World::default();
        let mut tracker = ScrollTracker::new();
        let page = FakePage::new(600.0);

        assert_eq!(tracker.update(&mut world, &page, VIEWPORT_H), TrackerUpdate::Created);
        assert_eq!(world.len(), 2);
        assert_eq!(world.static_count(), 2);
        let handles = tracker.proxies().unwrap();

        page.footer_top.set(400.0);
        assert_eq!(tracker.update(&mut world, &page, VIEWPORT_H), TrackerUpdate::Moved);
        assert_eq!(world.len(), 2);
        assert_eq!(tracker.proxies(), Some(handles));
        let orange = world.body(handles[0]).unwrap();
        assert_eq!(orange.position.y, 400.0 + 150.0);
        assert_eq!(orange.position.x, 250.0);

        page.footer_top.set(VIEWPORT_H + 10.0);
        assert_eq!(tracker.update(&mut world, &page, VIEWPORT_H), TrackerUpdate::Removed);
        assert_eq!(world.len(), 0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_reentry_recreates() {
        let mut world = World::default();
        let mut tracker = ScrollTracker::new();
        let page = FakePage::new(600.0);

        tracker.update(&mut world, &page, VIEWPORT_H);
        let first = tracker.proxies().unwrap();
        page.footer_top.set(-500.0);
        tracker.update(&mut world, &page, VIEWPORT_H);
        page.footer_top.set(500.0);
        assert_eq!(tracker.update(&mut world, &page, VIEWPORT_H), TrackerUpdate::Created);
        assert_ne!(tracker.proxies().unwrap(), first);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_only_proxies_are_removed() {
        let mut world = World::default();
        let other = world.add(Body::circle(glam::Vec2::ZERO, 5.0, BodyOptions::fixed()));
        let mut tracker = ScrollTracker::new();
        let page = FakePage::new(600.0);

        tracker.update(&mut world, &page, VIEWPORT_H);
        page.footer_top.set(5000.0);
        tracker.update(&mut world, &page, VIEWPORT_H);
        assert_eq!(world.len(), 1);
        assert!(world.contains(other));
    }

    #[test]
    fn test_unmounted_sections_skip() {
        let mut world = World::default();
        let mut tracker = ScrollTracker::new();
        let mut page = FakePage::new(600.0);
        page.mounted = false;

        assert_eq!(tracker.update(&mut world, &page, VIEWPORT_H), TrackerUpdate::Skipped);
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_debounce_trailing_call() {
        let mut debounce = ScrollDebounce::new(50.0);
        assert!(!debounce.take_due(0.0));

        debounce.on_scroll(100.0);
        debounce.on_scroll(130.0);
        assert!(!debounce.take_due(170.0));
        assert!(debounce.take_due(180.0));
        assert!(!debounce.take_due(500.0));
        assert!(!debounce.is_pending());
    }
}
