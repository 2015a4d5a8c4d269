//! Physics world seam and the rapier-backed body arena
//!
//! Scene code talks to physics only through [`PhysicsWorld`]. [`World`] keeps
//! a plain [`Body`] per handle for rendering and hit tests and mirrors it into
//! a rapier rigid body. Setters write through; `step` copies the simulated
//! pose and velocity back.
//!
//! Scene units are pixels and base steps (1/60 s). Rapier works in pixels and
//! seconds, so velocities are scaled by [`STEPS_PER_SECOND`] at the boundary.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use rapier2d::na::{Point2, UnitComplex, Vector2};
use rapier2d::prelude::{
    BroadPhaseBvh, CCDSolver, CoefficientCombineRule, ColliderBuilder, ColliderSet, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real, RigidBodyBuilder,
    RigidBodyHandle, RigidBodySet,
};
use serde::{Deserialize, Serialize};

use crate::consts::{BODY_FRICTION, GRAVITY, GRAVITY_SCALE, LENGTH_UNIT, STEP_MS};
use crate::{Rect, rotate};

/// Base steps per simulated second
pub const STEPS_PER_SECOND: f32 = (1000.0 / STEP_MS) as f32;

/// Stable body identifier. Handles are never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision/render geometry in body-local coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Convex polygon, vertices relative to the body position at angle 0
    Polygon { vertices: Vec<Vec2> },
}

/// Material and lifecycle flags applied at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyOptions {
    pub is_static: bool,
    pub restitution: f32,
    pub air_friction: f32,
    /// Whether the engine's own debug renderer should draw the body
    pub visible: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        Self {
            is_static: false,
            restitution: 0.0,
            air_friction: 0.01,
            visible: true,
        }
    }
}

impl BodyOptions {
    /// Static, invisible body (walls, tracked regions, launcher)
    pub fn fixed() -> Self {
        Self {
            is_static: true,
            visible: false,
            ..Default::default()
        }
    }
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub shape: Shape,
    pub position: Vec2,
    pub angle: f32,
    /// Linear velocity (px per base step)
    pub velocity: Vec2,
    /// Angular velocity (radians per base step)
    pub angular_velocity: f32,
    pub is_static: bool,
    pub restitution: f32,
    pub air_friction: f32,
    pub visible: bool,
}

impl Body {
    fn with_shape(shape: Shape, position: Vec2, options: BodyOptions) -> Self {
        Self {
            shape,
            position,
            angle: 0.0,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            is_static: options.is_static,
            restitution: options.restitution,
            air_friction: options.air_friction,
            visible: options.visible,
        }
    }

    pub fn circle(position: Vec2, radius: f32, options: BodyOptions) -> Self {
        Self::with_shape(Shape::Circle { radius }, position, options)
    }

    /// Rectangle centered on `position`; corners rounded by `chamfer` (0 = sharp)
    pub fn rectangle(position: Vec2, width: f32, height: f32, chamfer: f32, options: BodyOptions) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        Self::with_shape(
            Shape::Polygon {
                vertices: chamfer_vertices(&corners, chamfer),
            },
            position,
            options,
        )
    }

    /// Regular polygon with `sides` corners on a circle of `radius`
    pub fn polygon(position: Vec2, sides: u32, radius: f32, chamfer: f32, options: BodyOptions) -> Self {
        let sides = sides.max(3);
        let theta = std::f32::consts::TAU / sides as f32;
        let offset = theta * 0.5;
        let corners: Vec<Vec2> = (0..sides)
            .map(|i| {
                let a = offset + i as f32 * theta;
                Vec2::new(a.cos() * radius, a.sin() * radius)
            })
            .collect();
        Self::with_shape(
            Shape::Polygon {
                vertices: chamfer_vertices(&corners, chamfer),
            },
            position,
            options,
        )
    }

    /// Circle radius, if this is a circle
    pub fn circle_radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            Shape::Polygon { .. } => None,
        }
    }

    /// Vertices in world space (empty for circles)
    pub fn world_vertices(&self) -> Vec<Vec2> {
        match &self.shape {
            Shape::Circle { .. } => Vec::new(),
            Shape::Polygon { vertices } => vertices
                .iter()
                .map(|v| self.position + rotate(*v, self.angle))
                .collect(),
        }
    }

    /// World-space axis-aligned bounds
    pub fn bounds(&self) -> Rect {
        match self.shape {
            Shape::Circle { radius } => Rect::new(
                self.position.x - radius,
                self.position.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
            Shape::Polygon { .. } => {
                let verts = self.world_vertices();
                let mut min = Vec2::splat(f32::INFINITY);
                let mut max = Vec2::splat(f32::NEG_INFINITY);
                for v in &verts {
                    min = min.min(*v);
                    max = max.max(*v);
                }
                Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
            }
        }
    }

    /// Point-in-body test (convex polygons only)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = rotate(point - self.position, -self.angle);
        match &self.shape {
            Shape::Circle { radius } => local.length_squared() <= radius * radius,
            Shape::Polygon { vertices } => {
                let n = vertices.len();
                if n < 3 {
                    return false;
                }
                let mut sign = 0.0f32;
                for i in 0..n {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % n];
                    let cross = (b - a).perp_dot(local - a);
                    if cross.abs() < f32::EPSILON {
                        continue;
                    }
                    if sign == 0.0 {
                        sign = cross.signum();
                    } else if cross.signum() != sign {
                        return false;
                    }
                }
                true
            }
        }
    }
}

/// Replace every corner of a convex polygon with a sampled arc of `radius`.
///
/// The radius is clamped per corner so neighbouring arcs never overlap.
/// Segment count grows with the radius (2..=14, always even).
pub fn chamfer_vertices(corners: &[Vec2], radius: f32) -> Vec<Vec2> {
    if radius <= 0.0 || corners.len() < 3 {
        return corners.to_vec();
    }

    let n = corners.len();
    let mut out = Vec::with_capacity(n * 8);

    for i in 0..n {
        let v = corners[i];
        let prev = corners[(i + n - 1) % n];
        let next = corners[(i + 1) % n];

        let to_prev = prev - v;
        let to_next = next - v;
        let (len_prev, len_next) = (to_prev.length(), to_next.length());
        if len_prev <= f32::EPSILON || len_next <= f32::EPSILON {
            out.push(v);
            continue;
        }
        let e1 = to_prev / len_prev;
        let e2 = to_next / len_next;

        let interior = e1.dot(e2).clamp(-1.0, 1.0).acos();
        let half = interior / 2.0;
        if half <= f32::EPSILON || half >= std::f32::consts::FRAC_PI_2 {
            out.push(v);
            continue;
        }

        // Tangent distance from the corner must fit within half of each edge
        let max_tangent = len_prev.min(len_next) / 2.0;
        let r = radius.min(max_tangent * half.tan());
        let tangent = r / half.tan();
        let center = v + (e1 + e2).normalize_or_zero() * (r / half.sin());

        let start = v + e1 * tangent - center;
        let end = v + e2 * tangent - center;
        let a0 = start.y.atan2(start.x);
        let a1 = end.y.atan2(end.x);
        let mut sweep = a1 - a0;
        if sweep > std::f32::consts::PI {
            sweep -= std::f32::consts::TAU;
        } else if sweep < -std::f32::consts::PI {
            sweep += std::f32::consts::TAU;
        }

        let segments = chamfer_segments(r);
        for k in 0..=segments {
            let a = a0 + sweep * (k as f32 / segments as f32);
            out.push(center + Vec2::new(a.cos(), a.sin()) * r);
        }
    }

    out
}

fn chamfer_segments(radius: f32) -> u32 {
    let mut segments = (radius.powf(0.32) * 1.75).clamp(2.0, 14.0).round() as u32;
    if segments % 2 == 1 {
        segments += 1;
    }
    segments.min(14)
}

/// Operations the scene needs from a physics engine.
///
/// Everything runs on one thread; implementations need no interior locking.
pub trait PhysicsWorld {
    /// Insert a body and return its handle
    fn add(&mut self, body: Body) -> BodyHandle;

    /// Remove a body; `None` if the handle is unknown
    fn remove(&mut self, handle: BodyHandle) -> Option<Body>;

    /// Current pose, velocity and material of a body
    fn body(&self, handle: BodyHandle) -> Option<&Body>;

    /// All live handles in insertion order
    fn handles(&self) -> Vec<BodyHandle>;

    fn len(&self) -> usize;

    fn gravity(&self) -> f32;

    fn set_gravity(&mut self, gravity: f32);

    /// Teleport a body
    fn set_position(&mut self, handle: BodyHandle, position: Vec2);

    fn set_angle(&mut self, handle: BodyHandle, angle: f32);

    /// Linear velocity in px per base step
    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2);

    /// Angular velocity in radians per base step
    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32);

    /// Advance the simulation by `delta_ms`
    fn step(&mut self, delta_ms: f64);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn add_many(&mut self, bodies: Vec<Body>) -> Vec<BodyHandle> {
        bodies.into_iter().map(|b| self.add(b)).collect()
    }

    /// Remove several bodies, returning how many were present
    fn remove_many(&mut self, handles: &[BodyHandle]) -> usize {
        handles.iter().filter(|h| self.remove(**h).is_some()).count()
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_some()
    }

    /// Count of static bodies
    fn static_count(&self) -> usize {
        self.handles()
            .into_iter()
            .filter(|h| self.body(*h).is_some_and(|b| b.is_static))
            .count()
    }

    /// Count of dynamic bodies
    fn dynamic_count(&self) -> usize {
        self.len() - self.static_count()
    }
}

/// A scene body and the rapier body simulating it
#[derive(Debug, Clone)]
struct Slot {
    rigid: RigidBodyHandle,
    body: Body,
}

/// Body arena simulated by rapier
pub struct World {
    bodies: BTreeMap<BodyHandle, Slot>,
    gravity: f32,
    next_id: u32,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("bodies", &self.bodies.len())
            .field("gravity", &self.gravity)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(GRAVITY)
    }
}

impl World {
    pub fn new(gravity: f32) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = (STEP_MS / 1000.0) as Real;
        params.length_unit = LENGTH_UNIT;

        Self {
            bodies: BTreeMap::new(),
            gravity,
            next_id: 1,
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Iterate bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies.iter().map(|(h, slot)| (*h, &slot.body))
    }

    /// Gravity as an acceleration in px/s²
    ///
    /// The per-step velocity gain `gravity * GRAVITY_SCALE * dt_ms²` is the
    /// same at every step length once expressed per second squared.
    fn gravity_vector(&self) -> Vector2<Real> {
        Vector2::new(0.0, self.gravity * GRAVITY_SCALE * 1.0e6)
    }

    /// Copy simulated poses and velocities back into the scene bodies
    fn sync(&mut self) {
        for slot in self.bodies.values_mut().filter(|s| !s.body.is_static) {
            let Some(rb) = self.rigid_bodies.get(slot.rigid) else {
                continue;
            };
            let t = rb.translation();
            let v = rb.linvel();
            slot.body.position = Vec2::new(t.x, t.y);
            slot.body.angle = rb.rotation().angle();
            slot.body.velocity = Vec2::new(v.x, v.y) / STEPS_PER_SECOND;
            slot.body.angular_velocity = rb.angvel() / STEPS_PER_SECOND;
        }
    }
}

/// Collider matching the body's render outline
fn collider_for(body: &Body) -> ColliderBuilder {
    let builder = match &body.shape {
        Shape::Circle { radius } => ColliderBuilder::ball(*radius),
        Shape::Polygon { vertices } => {
            let points: Vec<Point2<Real>> = vertices.iter().map(|v| Point2::new(v.x, v.y)).collect();
            ColliderBuilder::convex_hull(&points).unwrap_or_else(|| {
                let radius = vertices.iter().map(|v| v.length()).fold(1.0, f32::max);
                log::warn!("Degenerate polygon with {} vertices, colliding as a ball", vertices.len());
                ColliderBuilder::ball(radius)
            })
        }
    };
    builder
        .restitution(body.restitution)
        .restitution_combine_rule(CoefficientCombineRule::Max)
        .friction(BODY_FRICTION)
}

impl PhysicsWorld for World {
    fn add(&mut self, body: Body) -> BodyHandle {
        let builder = if body.is_static {
            RigidBodyBuilder::fixed()
        } else {
            // Damping per second that matches `air_friction` lost per base step
            let damping = body.air_friction * STEPS_PER_SECOND;
            RigidBodyBuilder::dynamic()
                .linear_damping(damping)
                .angular_damping(damping)
                .ccd_enabled(true)
        };
        let rb = builder
            .translation(Vector2::new(body.position.x, body.position.y))
            .rotation(body.angle)
            .linvel(Vector2::new(body.velocity.x, body.velocity.y) * STEPS_PER_SECOND)
            .angvel(body.angular_velocity * STEPS_PER_SECOND)
            .build();

        let rigid = self.rigid_bodies.insert(rb);
        self.colliders
            .insert_with_parent(collider_for(&body).build(), rigid, &mut self.rigid_bodies);

        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.insert(handle, Slot { rigid, body });
        handle
    }

    fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        let slot = self.bodies.remove(&handle)?;
        self.rigid_bodies.remove(
            slot.rigid,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        Some(slot.body)
    }

    fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(&handle).map(|slot| &slot.body)
    }

    fn handles(&self) -> Vec<BodyHandle> {
        self.bodies.keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.bodies.len()
    }

    fn gravity(&self) -> f32 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec2) {
        let Some(slot) = self.bodies.get_mut(&handle) else {
            return;
        };
        slot.body.position = position;
        if let Some(rb) = self.rigid_bodies.get_mut(slot.rigid) {
            rb.set_translation(Vector2::new(position.x, position.y), true);
        }
    }

    fn set_angle(&mut self, handle: BodyHandle, angle: f32) {
        let Some(slot) = self.bodies.get_mut(&handle) else {
            return;
        };
        slot.body.angle = angle;
        if let Some(rb) = self.rigid_bodies.get_mut(slot.rigid) {
            rb.set_rotation(UnitComplex::new(angle), true);
        }
    }

    fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) {
        let Some(slot) = self.bodies.get_mut(&handle) else {
            return;
        };
        if slot.body.is_static {
            return;
        }
        slot.body.velocity = velocity;
        if let Some(rb) = self.rigid_bodies.get_mut(slot.rigid) {
            rb.set_linvel(Vector2::new(velocity.x, velocity.y) * STEPS_PER_SECOND, true);
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, angular_velocity: f32) {
        let Some(slot) = self.bodies.get_mut(&handle) else {
            return;
        };
        if slot.body.is_static {
            return;
        }
        slot.body.angular_velocity = angular_velocity;
        if let Some(rb) = self.rigid_bodies.get_mut(slot.rigid) {
            rb.set_angvel(angular_velocity * STEPS_PER_SECOND, true);
        }
    }

    fn step(&mut self, delta_ms: f64) {
        self.params.dt = (delta_ms / 1000.0) as Real;
        let gravity = self.gravity_vector();

        self.pipeline.step(
            &gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.sync();
    }
}
