//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, never reordered)
//! - No rendering or platform dependencies

pub mod anim;
pub mod body;
pub mod collision;
pub mod physics;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use anim::{AnimDef, AnimKey, Animator};
pub use body::{Body, BodyKind, Faces};
pub use collision::{CollisionResult, aabb_overlap, clamp_to_world_bounds, separate_from_static};
pub use physics::{Contact, Group, PhysicsWorld};
pub use rng::SceneRng;
pub use spawn::{create_enemy, shoot, velocity_toward};
pub use state::{Bullet, Enemy, GameState, Platform, Player};
pub use tick::{TickInput, hit_player, tick, update};
