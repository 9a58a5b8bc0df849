//! Entity factory: enemies and the shots they fire

use glam::Vec2;

use super::body::Body;
use super::state::{Bullet, Enemy, GameState};
use crate::assets::AssetKey;
use crate::consts::*;

/// Spawn an enemy at `(x, y)` with a random horizontal velocity.
///
/// Bounces elastically and stays inside the world. Returns the new enemy's ID.
pub fn create_enemy(state: &mut GameState, x: f32, y: f32) -> u32 {
    let size = AssetKey::Bomb.frame_size();
    let mut body = Body::new_dynamic(x, y, size.x, size.y);
    body.set_bounce(ENEMY_BOUNCE);
    body.collide_world_bounds = true;

    let vx = state.rng.between(-ENEMY_SPEED_X_MAX, ENEMY_SPEED_X_MAX) as f32;
    body.set_velocity(vx, ENEMY_SPEED_Y);

    let id = state.next_entity_id();
    log::debug!("Enemy {} spawned at ({}, {}) vel ({}, {})", id, x, y, vx, ENEMY_SPEED_Y);
    state.enemies.push(Enemy { id, body });
    id
}

/// Velocity of magnitude `speed` pointing from `from` to `to`.
///
/// Coincident points give a zero vector.
pub fn velocity_toward(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// Fire a bullet from the enemy at `enemy_index`, aimed once at where the
/// player is right now. Returns the new bullet's ID.
pub fn shoot(state: &mut GameState, enemy_index: usize) -> Option<u32> {
    let origin = state.enemies.get(enemy_index)?.body.pos;
    let target = state.player.body.pos;

    let size = AssetKey::Star.frame_size();
    let mut body = Body::new_dynamic(origin.x, origin.y, size.x, size.y);
    body.allow_gravity = false;
    body.vel = velocity_toward(origin, target, BULLET_SPEED);

    let id = state.next_entity_id();
    log::debug!(
        "Bullet {} fired from ({:.1}, {:.1}) vel ({:.1}, {:.1})",
        id,
        origin.x,
        origin.y,
        body.vel.x,
        body.vel.y
    );
    state.bullets.push(Bullet { id, body });
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_enemy_properties() {
        let mut state = GameState::new(2024);
        let before = state.enemies.len();
        let id = create_enemy(&mut state, 300.0, 40.0);

        assert_eq!(state.enemies.len(), before + 1);
        let enemy = state.enemies.last().unwrap();
        assert_eq!(enemy.id, id);
        assert_eq!(enemy.body.pos, Vec2::new(300.0, 40.0));
        assert_eq!(enemy.body.bounce, Vec2::ONE);
        assert!(enemy.body.collide_world_bounds);
        assert!(enemy.body.allow_gravity);
        assert_eq!(enemy.body.vel.y, 20.0);
        assert!((-200.0..=200.0).contains(&enemy.body.vel.x));
        assert_eq!(enemy.body.vel.x.fract(), 0.0);
    }

    #[test]
    fn test_velocity_toward() {
        let v = velocity_toward(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 200.0);
        assert!((v - Vec2::new(120.0, 160.0)).length() < 1e-3);
        assert_eq!(velocity_toward(Vec2::ONE, Vec2::ONE, 200.0), Vec2::ZERO);
    }

    #[test]
    fn test_shoot_aims_at_player() {
        let mut state = GameState::new(9);
        state.enemies[0].body.pos = Vec2::new(100.0, 150.0);
        state.player.body.pos = Vec2::new(400.0, 550.0);

        let id = shoot(&mut state, 0).unwrap();
        let bullet = state.bullets.last().unwrap();
        assert_eq!(bullet.id, id);
        assert_eq!(bullet.body.pos, Vec2::new(100.0, 150.0));
        assert!((bullet.body.vel - Vec2::new(120.0, 160.0)).length() < 1e-3);
        assert!(!bullet.body.allow_gravity);
        assert!(!bullet.body.collide_world_bounds);
    }

    #[test]
    fn test_shoot_missing_enemy() {
        let mut state = GameState::new(9);
        assert!(shoot(&mut state, 99).is_none());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_not_reaimed() {
        use crate::sim::physics;

        let mut state = GameState::new(9);
        shoot(&mut state, 0).unwrap();
        let vel = state.bullets[0].body.vel;

        state.player.body.pos = Vec2::new(700.0, 100.0);
        for _ in 0..30 {
            physics::step(&mut state, SIM_DT);
        }
        assert_eq!(state.bullets[0].body.vel, vel);
    }
}
