//! Collision detection and response for axis-aligned boxes
//!
//! Dynamic bodies are pushed out of static ones; the side is chosen from
//! where the body was before this step's integration, so a fast fall onto a
//! thin platform still lands on top instead of being shoved sideways.

use glam::Vec2;

use super::body::Body;

/// How far (pixels) a body may already be past a face and still count as
/// having arrived from that side.
pub const OVERLAP_BIAS: f32 = 4.0;

/// Result of a separation
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the bodies overlapped
    pub hit: bool,
    /// Normal of the static face that was hit (pointing toward the moved body)
    pub normal: Vec2,
    /// Penetration depth that was corrected
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }
}

/// Strict AABB intersection; boxes that only share an edge do not overlap
pub fn aabb_overlap(a: &Body, b: &Body) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Penetration depth on each axis (non-positive components mean no overlap)
fn overlap_extent(a: &Body, b: &Body) -> Vec2 {
    Vec2::new(
        a.right().min(b.right()) - a.left().max(b.left()),
        a.bottom().min(b.bottom()) - a.top().max(b.top()),
    )
}

/// Reflect one velocity component off a face, scaled by restitution
#[inline]
pub fn rebound(vel: f32, bounce: f32) -> f32 {
    -vel * bounce
}

/// Push a dynamic body out of a static one, set its touching face and
/// rebound its velocity on the separating axis.
pub fn separate_from_static(body: &mut Body, wall: &Body) -> CollisionResult {
    if !aabb_overlap(body, wall) {
        return CollisionResult::miss();
    }
    let overlap = overlap_extent(body, wall);

    let prev_top = body.prev_pos.y - body.half.y;
    let prev_bottom = body.prev_pos.y + body.half.y;
    let prev_left = body.prev_pos.x - body.half.x;
    let prev_right = body.prev_pos.x + body.half.x;

    if prev_bottom <= wall.top() + OVERLAP_BIAS && body.vel.y >= 0.0 {
        land_on_top(body, wall);
        CollisionResult::hit(Vec2::NEG_Y, overlap.y)
    } else if prev_top >= wall.bottom() - OVERLAP_BIAS && body.vel.y <= 0.0 {
        bump_underside(body, wall);
        CollisionResult::hit(Vec2::Y, overlap.y)
    } else if prev_right <= wall.left() + OVERLAP_BIAS {
        push_left(body, wall);
        CollisionResult::hit(Vec2::NEG_X, overlap.x)
    } else if prev_left >= wall.right() - OVERLAP_BIAS {
        push_right(body, wall);
        CollisionResult::hit(Vec2::X, overlap.x)
    } else if overlap.y <= overlap.x {
        // Started inside: resolve along the shallower axis
        if body.pos.y <= wall.pos.y {
            land_on_top(body, wall);
            CollisionResult::hit(Vec2::NEG_Y, overlap.y)
        } else {
            bump_underside(body, wall);
            CollisionResult::hit(Vec2::Y, overlap.y)
        }
    } else if body.pos.x <= wall.pos.x {
        push_left(body, wall);
        CollisionResult::hit(Vec2::NEG_X, overlap.x)
    } else {
        push_right(body, wall);
        CollisionResult::hit(Vec2::X, overlap.x)
    }
}

fn land_on_top(body: &mut Body, wall: &Body) {
    body.pos.y = wall.top() - body.half.y;
    if body.vel.y > 0.0 {
        body.vel.y = rebound(body.vel.y, body.bounce.y);
    }
    body.touching.down = true;
}

fn bump_underside(body: &mut Body, wall: &Body) {
    body.pos.y = wall.bottom() + body.half.y;
    if body.vel.y < 0.0 {
        body.vel.y = rebound(body.vel.y, body.bounce.y);
    }
    body.touching.up = true;
}

fn push_left(body: &mut Body, wall: &Body) {
    body.pos.x = wall.left() - body.half.x;
    if body.vel.x > 0.0 {
        body.vel.x = rebound(body.vel.x, body.bounce.x);
    }
    body.touching.right = true;
}

fn push_right(body: &mut Body, wall: &Body) {
    body.pos.x = wall.right() + body.half.x;
    if body.vel.x < 0.0 {
        body.vel.x = rebound(body.vel.x, body.bounce.x);
    }
    body.touching.left = true;
}

/// Keep a body inside `[0, width] x [0, height]`, rebounding off the edges.
///
/// Returns true if any edge was hit.
pub fn clamp_to_world_bounds(body: &mut Body, width: f32, height: f32) -> bool {
    let mut hit = false;

    if body.left() < 0.0 {
        body.pos.x = body.half.x;
        if body.vel.x < 0.0 {
            body.vel.x = rebound(body.vel.x, body.bounce.x);
        }
        body.blocked.left = true;
        hit = true;
    } else if body.right() > width {
        body.pos.x = width - body.half.x;
        if body.vel.x > 0.0 {
            body.vel.x = rebound(body.vel.x, body.bounce.x);
        }
        body.blocked.right = true;
        hit = true;
    }

    if body.top() < 0.0 {
        body.pos.y = body.half.y;
        if body.vel.y < 0.0 {
            body.vel.y = rebound(body.vel.y, body.bounce.y);
        }
        body.blocked.up = true;
        hit = true;
    } else if body.bottom() > height {
        body.pos.y = height - body.half.y;
        if body.vel.y > 0.0 {
            body.vel.y = rebound(body.vel.y, body.bounce.y);
        }
        body.blocked.down = true;
        hit = true;
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> Body {
        // 400x32 platform spanning x 400..800, y 384..416
        Body::new_static(600.0, 400.0, 400.0, 32.0)
    }

    fn falling_box(x: f32, prev_y: f32, y: f32, vy: f32) -> Body {
        let mut body = Body::new_dynamic(x, y, 32.0, 48.0);
        body.prev_pos = Vec2::new(x, prev_y);
        body.vel = Vec2::new(0.0, vy);
        body
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Body::new_static(0.0, 0.0, 10.0, 10.0);
        let touching = Body::new_static(10.0, 0.0, 10.0, 10.0);
        let inside = Body::new_static(9.0, 0.0, 10.0, 10.0);
        assert!(!aabb_overlap(&a, &touching));
        assert!(aabb_overlap(&a, &inside));
    }

    #[test]
    fn test_land_on_top_sets_touching_down() {
        let wall = platform();
        // Bottom was at 359 + 24 = 383 (above top 384), now 2px inside
        let mut body = falling_box(600.0, 359.0, 362.0, 120.0);
        body.set_bounce(0.2);

        let result = separate_from_static(&mut body, &wall);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!(body.touching.down);
        assert_eq!(body.bottom(), wall.top());
        assert!((body.vel.y - (-24.0)).abs() < 1e-4);
    }

    #[test]
    fn test_elastic_rebound_keeps_speed() {
        let wall = platform();
        let mut body = falling_box(600.0, 359.0, 362.0, 250.0);
        body.set_bounce(1.0);
        separate_from_static(&mut body, &wall);
        assert_eq!(body.vel.y, -250.0);
    }

    #[test]
    fn test_hit_underside_while_rising() {
        let wall = platform();
        // Top was at 442 - 24 = 418 (below bottom 416), now inside
        let mut body = falling_box(600.0, 442.0, 438.0, -300.0);
        let result = separate_from_static(&mut body, &wall);
        assert!(result.hit);
        assert!(body.touching.up);
        assert!(!body.touching.down);
        assert_eq!(body.top(), wall.bottom());
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_side_hit_from_left() {
        let wall = platform();
        let mut body = Body::new_dynamic(386.0, 400.0, 32.0, 48.0);
        body.prev_pos = Vec2::new(380.0, 400.0);
        body.vel = Vec2::new(160.0, 0.0);
        separate_from_static(&mut body, &wall);
        assert!(body.touching.right);
        assert_eq!(body.right(), wall.left());
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_miss_leaves_body_untouched() {
        let wall = platform();
        let mut body = falling_box(100.0, 100.0, 101.0, 10.0);
        let before = body.pos;
        let result = separate_from_static(&mut body, &wall);
        assert!(!result.hit);
        assert_eq!(body.pos, before);
        assert!(body.touching.none());
    }

    #[test]
    fn test_world_bounds_clamp_and_bounce() {
        let mut body = Body::new_dynamic(5.0, 0.0, 14.0, 14.0);
        body.set_bounce(1.0);
        body.vel = Vec2::new(-150.0, -20.0);

        assert!(clamp_to_world_bounds(&mut body, 800.0, 600.0));
        assert_eq!(body.left(), 0.0);
        assert_eq!(body.top(), 0.0);
        assert_eq!(body.vel, Vec2::new(150.0, 20.0));
        assert!(body.blocked.left && body.blocked.up);
        assert!(body.touching.none());
    }

    #[test]
    fn test_world_bounds_inside_is_noop() {
        let mut body = Body::new_dynamic(400.0, 300.0, 14.0, 14.0);
        body.vel = Vec2::new(10.0, 10.0);
        assert!(!clamp_to_world_bounds(&mut body, 800.0, 600.0));
        assert_eq!(body.vel, Vec2::new(10.0, 10.0));
    }
}
