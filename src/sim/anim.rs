//! Sprite sheet animations
//!
//! Definitions are data (frame list, rate, repeat); an `Animator` is the
//! per-sprite playback cursor advanced by the fixed timestep.

use serde::{Deserialize, Serialize};

/// Animation keys used by the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimKey {
    Left,
    Turn,
    Right,
}

impl AnimKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimKey::Left => "left",
            AnimKey::Turn => "turn",
            AnimKey::Right => "right",
        }
    }
}

/// A named frame sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimDef {
    pub key: AnimKey,
    /// Sprite sheet frame indices, in play order
    pub frames: Vec<u32>,
    /// Frames per second
    pub frame_rate: f32,
    /// Loop forever when true, otherwise hold the last frame
    pub repeat: bool,
}

impl AnimDef {
    /// Consecutive frames `start..=end` of a sheet
    pub fn range(key: AnimKey, start: u32, end: u32, frame_rate: f32, repeat: bool) -> Self {
        Self {
            key,
            frames: (start..=end).collect(),
            frame_rate,
            repeat,
        }
    }

    /// Seconds each frame stays on screen
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

/// Frame shown for the player before any animation has played
pub const PLAYER_IDLE_FRAME: u32 = 4;

/// The player's three animations: run left, idle, run right
pub fn player_anims() -> Vec<AnimDef> {
    vec![
        AnimDef::range(AnimKey::Left, 0, 3, 10.0, true),
        AnimDef {
            key: AnimKey::Turn,
            frames: vec![PLAYER_IDLE_FRAME],
            frame_rate: 20.0,
            repeat: false,
        },
        AnimDef::range(AnimKey::Right, 5, 8, 10.0, true),
    ]
}

/// Playback state for one sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animator {
    defs: Vec<AnimDef>,
    current: Option<AnimKey>,
    /// Index into the current definition's frame list
    cursor: usize,
    /// Time accumulated toward the next frame
    elapsed: f32,
    /// Frame shown while nothing is playing
    rest_frame: u32,
}

impl Animator {
    pub fn new(defs: Vec<AnimDef>, rest_frame: u32) -> Self {
        Self {
            defs,
            current: None,
            cursor: 0,
            elapsed: 0.0,
            rest_frame,
        }
    }

    fn def(&self, key: AnimKey) -> Option<&AnimDef> {
        self.defs.iter().find(|d| d.key == key)
    }

    /// Start `key` from its first frame.
    ///
    /// With `ignore_if_playing`, a request for the animation that is already
    /// running leaves it untouched so a held key doesn't restart the cycle.
    pub fn play(&mut self, key: AnimKey, ignore_if_playing: bool) {
        if ignore_if_playing && self.current == Some(key) {
            return;
        }
        if self.def(key).is_none() {
            log::warn!("No animation registered for '{}'", key.as_str());
            return;
        }
        self.current = Some(key);
        self.cursor = 0;
        self.elapsed = 0.0;
    }

    /// Advance playback by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let Some(key) = self.current else {
            return;
        };
        let Some(def) = self.def(key) else {
            return;
        };
        let len = def.frames.len();
        let step = def.frame_duration();
        let repeat = def.repeat;
        if len <= 1 {
            return;
        }

        self.elapsed += dt;
        while self.elapsed >= step {
            self.elapsed -= step;
            if self.cursor + 1 < len {
                self.cursor += 1;
            } else if repeat {
                self.cursor = 0;
            } else {
                self.elapsed = 0.0;
                break;
            }
        }
    }

    pub fn current_key(&self) -> Option<AnimKey> {
        self.current
    }

    /// Sprite sheet frame to draw right now
    pub fn current_frame(&self) -> u32 {
        self.current
            .and_then(|key| self.def(key))
            .and_then(|def| def.frames.get(self.cursor).copied())
            .unwrap_or(self.rest_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Animator {
        Animator::new(player_anims(), PLAYER_IDLE_FRAME)
    }

    #[test]
    fn test_rest_frame_before_play() {
        let anim = player();
        assert_eq!(anim.current_key(), None);
        assert_eq!(anim.current_frame(), 4);
    }

    #[test]
    fn test_left_loops_through_frames() {
        let mut anim = player();
        anim.play(AnimKey::Left, true);
        assert_eq!(anim.current_frame(), 0);

        // 10 fps: 0.1s per frame
        let mut frames = Vec::new();
        for _ in 0..5 {
            anim.advance(0.1);
            frames.push(anim.current_frame());
        }
        assert_eq!(frames, vec![1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_ignore_if_playing_keeps_cursor() {
        let mut anim = player();
        anim.play(AnimKey::Right, true);
        anim.advance(0.25);
        assert_eq!(anim.current_frame(), 7);

        anim.play(AnimKey::Right, true);
        assert_eq!(anim.current_frame(), 7);

        // Without the flag the cycle restarts
        anim.play(AnimKey::Right, false);
        assert_eq!(anim.current_frame(), 5);
    }

    #[test]
    fn test_turn_holds_single_frame() {
        let mut anim = player();
        anim.play(AnimKey::Left, true);
        anim.advance(0.2);
        anim.play(AnimKey::Turn, false);
        anim.advance(3.0);
        assert_eq!(anim.current_key(), Some(AnimKey::Turn));
        assert_eq!(anim.current_frame(), 4);
    }

    #[test]
    fn test_non_repeating_holds_last_frame() {
        let def = AnimDef::range(AnimKey::Left, 0, 2, 10.0, false);
        let mut anim = Animator::new(vec![def], 0);
        anim.play(AnimKey::Left, false);
        anim.advance(1.0);
        assert_eq!(anim.current_frame(), 2);
    }

    #[test]
    fn test_small_steps_accumulate() {
        let mut anim = player();
        anim.play(AnimKey::Left, true);
        for _ in 0..6 {
            anim.advance(1.0 / 60.0);
        }
        // 6/60 = 0.1s: exactly one frame, allow float slop either way
        let frame = anim.current_frame();
        assert!(frame == 0 || frame == 1);
        for _ in 0..6 {
            anim.advance(1.0 / 60.0);
        }
        let frame = anim.current_frame();
        assert!(frame == 1 || frame == 2);
    }
}
