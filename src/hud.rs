//! Text overlays drawn over the canvas
//!
//! The simulation owns the overlay state; the web front end mirrors it into
//! DOM elements each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A line of text positioned in canvas coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub text: String,
    pub pos: Vec2,
    pub font_px: u32,
    /// CSS colour
    pub fill: String,
    /// Anchor within the text box: (0, 0) top-left, (0.5, 0.5) centred
    pub origin: Vec2,
    pub visible: bool,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_px: u32) -> Self {
        Self {
            text: text.into(),
            pos: Vec2::new(x, y),
            font_px,
            fill: TEXT_FILL.to_string(),
            origin: Vec2::ZERO,
            visible: true,
        }
    }

    pub fn with_origin(mut self, origin: f32) -> Self {
        self.origin = Vec2::splat(origin);
        self
    }

    /// CSS `transform` that applies the origin to an absolutely positioned box
    pub fn css_transform(&self) -> String {
        if self.origin == Vec2::ZERO {
            return "none".to_string();
        }
        format!(
            "translate({}%, {}%)",
            -self.origin.x * 100.0,
            -self.origin.y * 100.0
        )
    }
}

/// Score readout text
pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

/// Score overlay in the top-left corner
pub fn score_overlay(score: u64) -> TextOverlay {
    TextOverlay::new(
        score_text(score),
        SCORE_TEXT_POS.0,
        SCORE_TEXT_POS.1,
        SCORE_FONT_PX,
    )
}

/// Centred "Game Over" banner, hidden until the player is hit
pub fn game_over_overlay() -> TextOverlay {
    let mut overlay = TextOverlay::new(
        "Game Over",
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT / 2.0,
        GAME_OVER_FONT_PX,
    )
    .with_origin(0.5);
    overlay.visible = false;
    overlay
}

/// Frames-per-second counter over a sliding window of frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Record a frame timestamp (milliseconds)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we'll overwrite next; N samples span N-1 frames
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time_ms - oldest_time;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_format() {
        assert_eq!(score_text(0), "Score: 0");
        assert_eq!(score_text(120), "Score: 120");
    }

    #[test]
    fn test_default_overlays() {
        let score = score_overlay(0);
        assert_eq!(score.pos, Vec2::new(16.0, 16.0));
        assert_eq!(score.font_px, 32);
        assert_eq!(score.fill, "#000");
        assert!(score.visible);
        assert_eq!(score.css_transform(), "none");

        let banner = game_over_overlay();
        assert_eq!(banner.text, "Game Over");
        assert_eq!(banner.pos, Vec2::new(400.0, 300.0));
        assert_eq!(banner.font_px, 64);
        assert_eq!(banner.origin, Vec2::splat(0.5));
        assert!(!banner.visible);
        assert_eq!(banner.css_transform(), "translate(-50%, -50%)");
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::new();
        for i in 1..=120 {
            fps.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }

    #[test]
    fn test_fps_counter_at_30hz() {
        let mut fps = FpsCounter::new();
        for i in 1..=90 {
            fps.record(i as f64 * 1000.0 / 30.0);
        }
        assert_eq!(fps.fps(), 30);
    }
}
