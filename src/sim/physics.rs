//! Arcade physics world
//!
//! Gravity, velocity integration, world bounds and the registered
//! collider/overlap pairs. Overlaps are reported back to the caller instead of
//! invoking callbacks, so the tick decides what a contact means.

use glam::Vec2;

use super::body::{Body, Faces};
use super::collision::{aabb_overlap, clamp_to_world_bounds, separate_from_static};
use super::state::GameState;

/// Named body collections in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Player,
    Platforms,
    Enemies,
    Bullets,
}

/// What happens when a registered pair intersects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// Solid: the first group is pushed out of the second
    Collide,
    /// Non-blocking: the contact is only reported
    Overlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub a: Group,
    pub b: Group,
    pub kind: PairKind,
}

/// A body within a group (groups only grow, so indices are stable)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyRef {
    pub group: Group,
    pub index: usize,
}

/// A reported overlap between two bodies of an `Overlap` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyRef,
    pub b: BodyRef,
}

/// World settings plus the collider registry
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    /// World bounds (origin at top-left)
    pub bounds: Vec2,
    pub gravity: Vec2,
    paused: bool,
    pairs: Vec<Pair>,
}

impl PhysicsWorld {
    pub fn new(width: f32, height: f32, gravity_y: f32) -> Self {
        Self {
            bounds: Vec2::new(width, height),
            gravity: Vec2::new(0.0, gravity_y),
            paused: false,
            pairs: Vec::new(),
        }
    }

    /// Register a solid collision between two groups
    pub fn add_collider(&mut self, a: Group, b: Group) {
        self.pairs.push(Pair {
            a,
            b,
            kind: PairKind::Collide,
        });
    }

    /// Register a non-blocking overlap between two groups
    pub fn add_overlap(&mut self, a: Group, b: Group) {
        self.pairs.push(Pair {
            a,
            b,
            kind: PairKind::Overlap,
        });
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Stop all integration and collision processing for good
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Gravity and velocity integration for a single body
pub fn integrate(body: &mut Body, gravity: Vec2, dt: f32) {
    body.prev_pos = body.pos;
    body.touching = Faces::default();
    body.blocked = Faces::default();

    if body.is_static() {
        return;
    }
    if body.allow_gravity {
        body.vel += gravity * dt;
    }
    body.pos += body.vel * dt;
}

/// Advance the world by one step and return the overlaps found.
///
/// Does nothing while the world is paused.
pub fn step(state: &mut GameState, dt: f32) -> Vec<Contact> {
    if state.world.is_paused() {
        return Vec::new();
    }
    let gravity = state.world.gravity;
    let bounds = state.world.bounds;

    for group in [Group::Player, Group::Enemies, Group::Bullets] {
        for body in state.bodies_mut(group) {
            integrate(body, gravity, dt);
            if body.collide_world_bounds {
                clamp_to_world_bounds(body, bounds.x, bounds.y);
            }
        }
    }

    let pairs = state.world.pairs().to_vec();
    let mut contacts = Vec::new();

    for pair in pairs {
        match pair.kind {
            PairKind::Collide => {
                let walls: Vec<Body> = state.bodies(pair.b).into_iter().cloned().collect();
                for body in state.bodies_mut(pair.a) {
                    if body.is_static() {
                        continue;
                    }
                    for wall in &walls {
                        let result = separate_from_static(body, wall);
                        if result.hit {
                            log::trace!(
                                "{:?} separated from {:?}: normal {:?}, depth {:.2}",
                                pair.a,
                                pair.b,
                                result.normal,
                                result.penetration
                            );
                        }
                    }
                }
            }
            PairKind::Overlap => {
                let others = state.bodies(pair.b);
                for (i, body) in state.bodies(pair.a).into_iter().enumerate() {
                    for (j, other) in others.iter().enumerate() {
                        if aabb_overlap(body, other) {
                            contacts.push(Contact {
                                a: BodyRef {
                                    group: pair.a,
                                    index: i,
                                },
                                b: BodyRef {
                                    group: pair.b,
                                    index: j,
                                },
                            });
                        }
                    }
                }
            }
        }
    }

    contacts
}
