//! Boundary walls and off-screen cleanup

use glam::Vec2;

use super::world::{Body, BodyHandle, BodyOptions, PhysicsWorld};

/// Floor + left wall + right wall for a viewport.
///
/// Each wall sits just outside the visible area and overlaps the corners by
/// `thickness` so nothing slips through.
pub fn wall_bodies(viewport: Vec2, thickness: f32) -> [Body; 3] {
    let (w, h) = (viewport.x, viewport.y);
    [
        Body::rectangle(
            Vec2::new(w / 2.0, h + thickness / 2.0),
            w + thickness * 2.0,
            thickness,
            0.0,
            BodyOptions::fixed(),
        ),
        Body::rectangle(
            Vec2::new(-thickness / 2.0, h / 2.0),
            thickness,
            h + thickness * 2.0,
            0.0,
            BodyOptions::fixed(),
        ),
        Body::rectangle(
            Vec2::new(w + thickness / 2.0, h / 2.0),
            thickness,
            h + thickness * 2.0,
            0.0,
            BodyOptions::fixed(),
        ),
    ]
}

/// Owns the three boundary walls
#[derive(Debug, Clone, Default)]
pub struct Walls {
    handles: Vec<BodyHandle>,
    thickness: f32,
}

impl Walls {
    pub fn new(thickness: f32) -> Self {
        Self {
            handles: Vec::new(),
            thickness,
        }
    }

    pub fn handles(&self) -> &[BodyHandle] {
        &self.handles
    }

    /// Replace the current walls with ones sized to `viewport`.
    ///
    /// Removal and insertion happen in the same call, so outside of it the
    /// world always holds exactly three walls.
    pub fn rebuild<W: PhysicsWorld>(&mut self, world: &mut W, viewport: Vec2) {
        world.remove_many(&self.handles);
        self.handles = world.add_many(wall_bodies(viewport, self.thickness).into());
        log::info!("Walls rebuilt for {}x{}", viewport.x, viewport.y);
    }
}

/// Remove every dynamic body whose y exceeds `viewport_h + margin`.
///
/// Static bodies are never touched. Returns the removed handles.
pub fn cleanup_tick<W: PhysicsWorld>(world: &mut W, viewport_h: f32, margin: f32) -> Vec<BodyHandle> {
    let limit = viewport_h + margin;
    let doomed: Vec<BodyHandle> = world
        .handles()
        .into_iter()
        .filter(|h| {
            world
                .body(*h)
                .is_some_and(|b| !b.is_static && b.position.y > limit)
        })
        .collect();

    world.remove_many(&doomed);
    doomed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CLEANUP_MARGIN, WALL_THICKNESS};
    use crate::sim::world::World;

    const VIEWPORT: Vec2 = Vec2::new(1024.0, 768.0);

    fn dynamic_at(world: &mut World, y: f32) -> BodyHandle {
        world.add(Body::circle(Vec2::new(100.0, y), 10.0, BodyOptions::default()))
    }

    #[test]
    fn test_rebuild_keeps_exactly_three_walls() {
        let mut world = World::default();
        let mut walls = Walls::new(WALL_THICKNESS);

        walls.rebuild(&mut world, VIEWPORT);
        assert_eq!(world.len(), 3);
        let first = walls.handles().to_vec();

        walls.rebuild(&mut world, Vec2::new(640.0, 480.0));
        assert_eq!(world.len(), 3);
        assert_eq!(world.static_count(), 3);
        assert!(first.iter().all(|h| !world.contains(*h)));
    }

    #[test]
    fn test_walls_frame_the_viewport() {
        let [floor, left, right] = wall_bodies(VIEWPORT, 80.0);
        assert!((floor.bounds().top - VIEWPORT.y).abs() < 1e-3);
        assert!((left.bounds().right() - 0.0).abs() < 1e-3);
        assert!((right.bounds().left - VIEWPORT.x).abs() < 1e-3);
        assert!(floor.is_static && left.is_static && right.is_static);
        assert!(!floor.visible);
    }

    #[test]
    fn test_cleanup_threshold() {
        let mut world = World::default();
        let below = dynamic_at(&mut world, VIEWPORT.y + 601.0);
        let above = dynamic_at(&mut world, VIEWPORT.y + 599.0);

        let removed = cleanup_tick(&mut world, VIEWPORT.y, CLEANUP_MARGIN);
        assert_eq!(removed, vec![below]);
        assert!(!world.contains(below));
        assert!(world.contains(above));
    }

    #[test]
    fn test_cleanup_never_removes_static() {
        let mut world = World::default();
        let fixed = world.add(Body::circle(Vec2::new(0.0, 99_999.0), 5.0, BodyOptions::fixed()));
        let mut walls = Walls::new(WALL_THICKNESS);
        walls.rebuild(&mut world, VIEWPORT);

        let removed = cleanup_tick(&mut world, VIEWPORT.y, CLEANUP_MARGIN);
        assert!(removed.is_empty());
        assert!(world.contains(fixed));
        assert_eq!(world.len(), 4);
    }

    #[test]
    fn test_cleanup_on_empty_world_is_noop() {
        let mut world = World::default();
        assert!(cleanup_tick(&mut world, VIEWPORT.y, CLEANUP_MARGIN).is_empty());
    }
}
