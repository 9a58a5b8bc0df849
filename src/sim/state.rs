//! Scene state and entity types
//!
//! Everything the update loop reads or writes lives in `GameState`: the
//! physics world, every entity, the overlays and the game-over flag.

use glam::Vec2;

use super::anim::{Animator, PLAYER_IDLE_FRAME, player_anims};
use super::body::Body;
use super::physics::{Group, PhysicsWorld};
use super::rng::SceneRng;
use super::spawn::create_enemy;
use crate::assets::AssetKey;
use crate::consts::*;
use crate::hud::{self, TextOverlay};

/// A static image with no body (the backdrop)
#[derive(Debug, Clone)]
pub struct Image {
    pub texture: AssetKey,
    pub pos: Vec2,
}

/// A static platform
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: u32,
    pub body: Body,
    /// Uniform sprite scale (the body already reflects it)
    pub scale: f32,
}

/// The player sprite
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// An airborne jump is still available
    pub can_double_jump: bool,
    /// 0xRRGGBB multiplier, `None` when untinted
    pub tint: Option<u32>,
    pub anim: Animator,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        let size = AssetKey::Dude.frame_size();
        let mut body = Body::new_dynamic(x, y, size.x, size.y);
        body.set_bounce(PLAYER_BOUNCE);
        body.collide_world_bounds = true;
        Self {
            body,
            can_double_jump: false,
            tint: None,
            anim: Animator::new(player_anims(), PLAYER_IDLE_FRAME),
        }
    }

    pub fn set_tint(&mut self, tint: u32) {
        self.tint = Some(tint);
    }
}

/// A bouncing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
}

/// A shot fired by an enemy
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    pub body: Body,
}

/// Complete scene state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Scene RNG
    pub rng: SceneRng,
    /// Physics settings and collider registry
    pub world: PhysicsWorld,
    /// Backdrop
    pub background: Image,
    pub player: Player,
    pub platforms: Vec<Platform>,
    /// Enemies, in spawn order (never removed)
    pub enemies: Vec<Enemy>,
    /// Bullets, in spawn order (never removed)
    pub bullets: Vec<Bullet>,
    /// Displayed score; nothing awards points yet
    pub score: u64,
    pub score_text: TextOverlay,
    pub game_over_text: TextOverlay,
    /// Set once the player is hit; never cleared
    pub game_over: bool,
    /// Updates run while playing
    pub tick_count: u64,
    /// Next entity ID
    next_id: u32,
}

/// Platform layout: (x, y, scale)
pub const PLATFORM_LAYOUT: [(f32, f32, f32); 4] = [
    (400.0, 568.0, 2.0),
    (600.0, 400.0, 1.0),
    (50.0, 250.0, 1.0),
    (750.0, 220.0, 1.0),
];

/// Enemy spawn points, spawned in this order at scene creation
pub const ENEMY_SPAWNS: [(f32, f32); 2] = [(200.0, 0.0), (600.0, 0.0)];

impl GameState {
    /// Build the scene with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            rng: SceneRng::new(seed),
            world: PhysicsWorld::new(CANVAS_WIDTH, CANVAS_HEIGHT, GRAVITY_Y),
            background: Image {
                texture: AssetKey::Sky,
                pos: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            },
            player: Player::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            platforms: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            score: 0,
            score_text: hud::score_overlay(0),
            game_over_text: hud::game_over_overlay(),
            game_over: false,
            tick_count: 0,
            next_id: 1,
        };

        for (x, y, scale) in PLATFORM_LAYOUT {
            state.add_platform(x, y, scale);
        }

        state.world.add_collider(Group::Player, Group::Platforms);

        for (x, y) in ENEMY_SPAWNS {
            create_enemy(&mut state, x, y);
        }

        state.world.add_collider(Group::Enemies, Group::Platforms);
        state.world.add_overlap(Group::Player, Group::Bullets);

        log::info!(
            "Scene created: seed {}, {} platforms, {} enemies",
            seed,
            state.platforms.len(),
            state.enemies.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a static platform; scaling also resizes its body
    pub fn add_platform(&mut self, x: f32, y: f32, scale: f32) {
        let size = AssetKey::Ground.frame_size();
        let mut body = Body::new_static(x, y, size.x, size.y);
        if scale != 1.0 {
            body.set_scale(scale);
        }
        let id = self.next_entity_id();
        self.platforms.push(Platform { id, body, scale });
    }

    /// Bodies belonging to a group, in group order
    pub fn bodies(&self, group: Group) -> Vec<&Body> {
        match group {
            Group::Player => vec![&self.player.body],
            Group::Platforms => self.platforms.iter().map(|p| &p.body).collect(),
            Group::Enemies => self.enemies.iter().map(|e| &e.body).collect(),
            Group::Bullets => self.bullets.iter().map(|b| &b.body).collect(),
        }
    }

    /// Mutable bodies belonging to a group, in group order
    pub fn bodies_mut(&mut self, group: Group) -> Vec<&mut Body> {
        match group {
            Group::Player => vec![&mut self.player.body],
            Group::Platforms => self.platforms.iter_mut().map(|p| &mut p.body).collect(),
            Group::Enemies => self.enemies.iter_mut().map(|e| &mut e.body).collect(),
            Group::Bullets => self.bullets.iter_mut().map(|b| &mut b.body).collect(),
        }
    }
}
