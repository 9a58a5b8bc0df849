//! Fixed timestep simulation tick
//!
//! One call per frame: the physics step first (which may end the game through
//! the player/bullet overlap), then the update logic.

use super::anim::AnimKey;
use super::physics::{self, Contact, Group};
use super::spawn::shoot;
use super::state::GameState;
use crate::consts::*;

/// Held keys for a single tick (polled, not edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let contacts = physics::step(state, dt);
    for contact in contacts {
        handle_contact(state, contact);
    }

    update(state, input, dt);
}

fn handle_contact(state: &mut GameState, contact: Contact) {
    if contact.a.group == Group::Player && contact.b.group == Group::Bullets {
        hit_player(state, contact.b.index);
    }
}

/// Player hit by a bullet: freeze the world and show the banner.
///
/// The bullet stays where it is.
pub fn hit_player(state: &mut GameState, bullet_index: usize) {
    if state.game_over {
        return;
    }
    state.world.pause();
    state.player.set_tint(TINT_RED);
    state.player.anim.play(AnimKey::Turn, false);
    state.game_over = true;
    state.game_over_text.visible = true;

    let bullet_id = state.bullets.get(bullet_index).map(|b| b.id);
    log::info!(
        "Game over at tick {} (bullet {:?})",
        state.tick_count,
        bullet_id
    );
}

/// Per-frame logic; does nothing once the game is over
pub fn update(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.game_over {
        return;
    }
    state.tick_count += 1;

    handle_movement(state, input);
    enemy_fire(state);

    state.player.anim.advance(dt);
}

/// Run/idle selection and the jump/double-jump rules
fn handle_movement(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    if input.left {
        player.body.set_velocity_x(-PLAYER_RUN_SPEED);
        player.anim.play(AnimKey::Left, true);
    } else if input.right {
        player.body.set_velocity_x(PLAYER_RUN_SPEED);
        player.anim.play(AnimKey::Right, true);
    } else {
        player.body.set_velocity_x(0.0);
        player.anim.play(AnimKey::Turn, false);
    }

    let grounded = player.body.on_floor();

    if input.up && grounded {
        player.body.set_velocity_y(JUMP_VELOCITY);
    }

    if input.up && !grounded && player.can_double_jump {
        player.body.set_velocity_y(JUMP_VELOCITY);
        player.can_double_jump = false;
    }

    if grounded {
        player.can_double_jump = true;
    }
}

/// Each enemy independently fires with probability 1/FIRE_ONE_IN
fn enemy_fire(state: &mut GameState) {
    for index in 0..state.enemies.len() {
        if state.rng.one_in(FIRE_ONE_IN) {
            shoot(state, index);
        }
    }
}
