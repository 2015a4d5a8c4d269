//! Pointer drag constraint
//!
//! A grabbed body keeps the body-local point it was picked up at. Every step
//! its velocity is pulled toward the pointer by `stiffness`.

use glam::Vec2;

use super::world::{BodyHandle, PhysicsWorld};
use crate::rotate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub handle: BodyHandle,
    /// Contact point in body space
    pub local_anchor: Vec2,
}

#[derive(Debug, Clone)]
pub struct PointerDrag {
    stiffness: f32,
    pointer: Vec2,
    grab: Option<Grab>,
}

impl PointerDrag {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness,
            pointer: Vec2::ZERO,
            grab: None,
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn grab(&self) -> Option<Grab> {
        self.grab
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Grab the topmost dynamic body under `position`. Returns the grabbed
    /// handle, if any.
    pub fn press<W: PhysicsWorld>(&mut self, world: &W, position: Vec2) -> Option<BodyHandle> {
        self.pointer = position;
        // Later insertions are drawn on top
        self.grab = world.handles().into_iter().rev().find_map(|handle| {
            let body = world.body(handle)?;
            if body.is_static || !body.contains_point(position) {
                return None;
            }
            Some(Grab {
                handle,
                local_anchor: rotate(position - body.position, -body.angle),
            })
        });

        if let Some(grab) = self.grab {
            log::debug!("Pointer grabbed body {:?}", grab.handle);
        }
        self.grab.map(|g| g.handle)
    }

    pub fn release(&mut self) {
        self.grab = None;
    }

    /// Pull the grabbed body toward the pointer. Releases if the body is gone.
    pub fn apply<W: PhysicsWorld>(&mut self, world: &mut W) {
        let Some(grab) = self.grab else {
            return;
        };
        let Some(body) = world.body(grab.handle) else {
            self.grab = None;
            return;
        };

        let anchor = body.position + rotate(grab.local_anchor, body.angle);
        let velocity = (self.pointer - anchor) * self.stiffness;
        world.set_velocity(grab.handle, velocity);
    }
}
