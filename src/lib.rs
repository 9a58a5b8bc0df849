//! Double Jump - a small arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic scene simulation (arcade physics, input handling, enemy fire)
//! - `assets`: Asset manifest, sprite sheet layout and loading
//! - `hud`: Text overlays (score, game over banner)
//! - `renderer`: WebGPU sprite pipeline
//! - `settings`: Persisted player preferences

pub mod assets;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::{AssetError, AssetKey, SpriteSheet};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (world bounds match the canvas)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// World gravity (pixels/s², positive is down)
    pub const GRAVITY_Y: f32 = 300.0;

    /// Fixed simulation timestep: one update per rendered frame at 60 Hz
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player movement
    pub const PLAYER_RUN_SPEED: f32 = 160.0;
    pub const JUMP_VELOCITY: f32 = -330.0;
    pub const PLAYER_BOUNCE: f32 = 0.2;
    pub const PLAYER_SPAWN: (f32, f32) = (100.0, 450.0);

    /// Enemy spawn velocity: x drawn from [-ENEMY_SPEED_X_MAX, ENEMY_SPEED_X_MAX]
    pub const ENEMY_SPEED_X_MAX: i32 = 200;
    pub const ENEMY_SPEED_Y: f32 = 20.0;
    pub const ENEMY_BOUNCE: f32 = 1.0;

    /// Each enemy fires with probability 1/FIRE_ONE_IN per update
    pub const FIRE_ONE_IN: u32 = 100;
    /// Bullet speed (pixels/s), fixed at spawn
    pub const BULLET_SPEED: f32 = 200.0;

    /// HUD text
    pub const SCORE_TEXT_POS: (f32, f32) = (16.0, 16.0);
    pub const SCORE_FONT_PX: u32 = 32;
    pub const GAME_OVER_FONT_PX: u32 = 64;
    pub const TEXT_FILL: &str = "#000";

    /// Tint applied to the player on game over
    pub const TINT_RED: u32 = 0xff0000;
}

/// Convert a 0xRRGGBB tint into a linear RGBA multiplier
#[inline]
pub fn tint_to_rgba(tint: u32) -> [f32; 4] {
    let r = ((tint >> 16) & 0xff) as f32 / 255.0;
    let g = ((tint >> 8) & 0xff) as f32 / 255.0;
    let b = (tint & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_to_rgba() {
        assert_eq!(tint_to_rgba(consts::TINT_RED), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(tint_to_rgba(0xffffff), [1.0, 1.0, 1.0, 1.0]);
    }
}
