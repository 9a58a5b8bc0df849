//! Scene to draw-list conversion
//!
//! Turns a `GameState` into texture-grouped vertex batches in draw order.
//! Pure CPU work, independent of the GPU.

use glam::Vec2;

use super::shapes::{FULL_UV, rect_outline, sprite_quad};
use super::vertex::{Vertex, colors};
use crate::assets::AssetKey;
use crate::settings::Settings;
use crate::sim::{Body, GameState};
use crate::tint_to_rgba;

/// Which texture a batch samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    Asset(AssetKey),
    /// 1x1 white pixel for flat-coloured shapes
    White,
}

/// Consecutive vertices sharing a texture
#[derive(Debug, Clone)]
pub struct SpriteBatch {
    pub texture: TextureId,
    pub vertices: Vec<Vertex>,
}

/// Outline thickness for debug bodies (pixels)
const DEBUG_LINE: f32 = 1.0;

/// Append vertices, merging with the previous batch when the texture matches
fn push(batches: &mut Vec<SpriteBatch>, texture: TextureId, vertices: &[Vertex]) {
    match batches.last_mut() {
        Some(last) if last.texture == texture => last.vertices.extend_from_slice(vertices),
        _ => batches.push(SpriteBatch {
            texture,
            vertices: vertices.to_vec(),
        }),
    }
}

fn body_sprite(body: &Body) -> (Vec2, Vec2) {
    (body.pos, Vec2::new(body.width(), body.height()))
}

/// Build the frame's draw list: sky, platforms, player, enemies, bullets,
/// then body outlines when enabled.
///
/// `frame_uv` maps a texture and frame index to texture coordinates.
pub fn build_batches(
    state: &GameState,
    settings: &Settings,
    frame_uv: &dyn Fn(AssetKey, u32) -> [f32; 4],
) -> Vec<SpriteBatch> {
    let mut batches = Vec::new();

    let sky = state.background.texture;
    push(
        &mut batches,
        TextureId::Asset(sky),
        &sprite_quad(state.background.pos, sky.frame_size(), FULL_UV, colors::WHITE),
    );

    for platform in &state.platforms {
        let (pos, size) = body_sprite(&platform.body);
        push(
            &mut batches,
            TextureId::Asset(AssetKey::Ground),
            &sprite_quad(pos, size, FULL_UV, colors::WHITE),
        );
    }

    let player = &state.player;
    let tint = player.tint.map_or(colors::WHITE, tint_to_rgba);
    let (pos, size) = body_sprite(&player.body);
    push(
        &mut batches,
        TextureId::Asset(AssetKey::Dude),
        &sprite_quad(
            pos,
            size,
            frame_uv(AssetKey::Dude, player.anim.current_frame()),
            tint,
        ),
    );

    for enemy in &state.enemies {
        let (pos, size) = body_sprite(&enemy.body);
        push(
            &mut batches,
            TextureId::Asset(AssetKey::Bomb),
            &sprite_quad(pos, size, FULL_UV, colors::WHITE),
        );
    }

    for bullet in &state.bullets {
        let (pos, size) = body_sprite(&bullet.body);
        push(
            &mut batches,
            TextureId::Asset(AssetKey::Star),
            &sprite_quad(pos, size, FULL_UV, colors::WHITE),
        );
    }

    if settings.debug_bodies {
        for platform in &state.platforms {
            let (pos, size) = body_sprite(&platform.body);
            push(
                &mut batches,
                TextureId::White,
                &rect_outline(pos, size, DEBUG_LINE, colors::DEBUG_STATIC),
            );
        }
        let dynamic = std::iter::once(&state.player.body)
            .chain(state.enemies.iter().map(|e| &e.body))
            .chain(state.bullets.iter().map(|b| &b.body));
        for body in dynamic {
            let (pos, size) = body_sprite(body);
            push(
                &mut batches,
                TextureId::White,
                &rect_outline(pos, size, DEBUG_LINE, colors::DEBUG_DYNAMIC),
            );
        }
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{TickInput, hit_player, tick};

    fn whole(_: AssetKey, _: u32) -> [f32; 4] {
        FULL_UV
    }

    fn textures(batches: &[SpriteBatch]) -> Vec<TextureId> {
        batches.iter().map(|b| b.texture).collect()
    }

    #[test]
    fn test_draw_order_and_merging() {
        let state = GameState::new(1);
        let batches = build_batches(&state, &Settings::default(), &whole);

        assert_eq!(
            textures(&batches),
            vec![
                TextureId::Asset(AssetKey::Sky),
                TextureId::Asset(AssetKey::Ground),
                TextureId::Asset(AssetKey::Dude),
                TextureId::Asset(AssetKey::Bomb),
            ]
        );
        // Four platforms merged into one batch
        assert_eq!(batches[1].vertices.len(), 4 * 6);
        assert_eq!(batches[3].vertices.len(), 2 * 6);
    }

    #[test]
    fn test_player_uses_current_frame() {
        let state = GameState::new(1);
        let by_frame = |key: AssetKey, frame: u32| {
            if key == AssetKey::Dude {
                [frame as f32, 0.0, frame as f32 + 1.0, 1.0]
            } else {
                FULL_UV
            }
        };
        let batches = build_batches(&state, &Settings::default(), &by_frame);
        let player = &batches[2];
        assert_eq!(player.vertices[0].uv, [4.0, 0.0]);
    }

    #[test]
    fn test_player_tinted_after_hit() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::default(), SIM_DT);
        hit_player(&mut state, 0);
        let batches = build_batches(&state, &Settings::default(), &whole);
        let player = &batches[2];
        assert!(player.vertices.iter().all(|v| v.color == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_debug_outlines() {
        let state = GameState::new(1);
        let settings = Settings {
            debug_bodies: true,
            ..Default::default()
        };
        let batches = build_batches(&state, &settings, &whole);
        let last = batches.last().unwrap();
        assert_eq!(last.texture, TextureId::White);
        // 4 platforms + player + 2 enemies, 24 vertices each
        assert_eq!(last.vertices.len(), 7 * 24);
    }
}
