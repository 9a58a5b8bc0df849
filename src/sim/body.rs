//! Arcade physics body
//!
//! Axis-aligned box positioned by its centre, like a sprite with origin 0.5.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-face contact flags, cleared at the start of every physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faces {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub fn none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }
}

/// Whether a body moves under physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves; other bodies are separated from it
    Static,
    /// Integrates gravity and velocity each step
    Dynamic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    /// Centre position
    pub pos: Vec2,
    /// Position before the last integration (used to pick the separation side)
    pub prev_pos: Vec2,
    /// Half extents of the box
    pub half: Vec2,
    pub vel: Vec2,
    /// Restitution per axis (0 = dead stop, 1 = perfectly elastic)
    pub bounce: Vec2,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    /// Contact with another body during the last step
    pub touching: Faces,
    /// Contact with the world bounds during the last step
    pub blocked: Faces,
}

impl Body {
    fn new(kind: BodyKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        let pos = Vec2::new(x, y);
        Self {
            kind,
            pos,
            prev_pos: pos,
            half: Vec2::new(width, height) * 0.5,
            vel: Vec2::ZERO,
            bounce: Vec2::ZERO,
            allow_gravity: kind == BodyKind::Dynamic,
            collide_world_bounds: false,
            touching: Faces::default(),
            blocked: Faces::default(),
        }
    }

    pub fn new_static(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(BodyKind::Static, x, y, width, height)
    }

    pub fn new_dynamic(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(BodyKind::Dynamic, x, y, width, height)
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.half.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half.y
    }

    pub fn width(&self) -> f32 {
        self.half.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half.y * 2.0
    }

    /// Scale the box around its centre (sprite scale followed by a body refresh)
    pub fn set_scale(&mut self, scale: f32) {
        self.half *= scale;
    }

    pub fn set_bounce(&mut self, bounce: f32) {
        self.bounce = Vec2::splat(bounce);
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.vel = Vec2::new(x, y);
    }

    pub fn set_velocity_x(&mut self, x: f32) {
        self.vel.x = x;
    }

    pub fn set_velocity_y(&mut self, y: f32) {
        self.vel.y = y;
    }

    /// Resting on another body (a platform) this step
    pub fn on_floor(&self) -> bool {
        self.touching.down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_from_centre() {
        let body = Body::new_dynamic(100.0, 450.0, 32.0, 48.0);
        assert_eq!(body.left(), 84.0);
        assert_eq!(body.right(), 116.0);
        assert_eq!(body.top(), 426.0);
        assert_eq!(body.bottom(), 474.0);
    }

    #[test]
    fn test_scale_refreshes_extents() {
        let mut ground = Body::new_static(400.0, 568.0, 400.0, 32.0);
        ground.set_scale(2.0);
        assert_eq!(ground.width(), 800.0);
        assert_eq!(ground.height(), 64.0);
        assert_eq!(ground.top(), 536.0);
        assert_eq!(ground.bottom(), 600.0);
    }

    #[test]
    fn test_static_has_no_gravity() {
        assert!(!Body::new_static(0.0, 0.0, 1.0, 1.0).allow_gravity);
        assert!(Body::new_dynamic(0.0, 0.0, 1.0, 1.0).allow_gravity);
    }
}
