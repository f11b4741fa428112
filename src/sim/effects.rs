//! Floating feedback text (damage numbers, pickups, status)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{TEXT_DRIFT, TEXT_LIFETIME};

/// Common text colors (0xRRGGBB)
pub const COLOR_DAMAGE: u32 = 0xFFFFFF;
pub const COLOR_PLAYER_HURT: u32 = 0xFF4444;
pub const COLOR_HEAL: u32 = 0x44FF66;
pub const COLOR_STATUS: u32 = 0xFFD700;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u32,
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    /// Frames left
    pub life: u32,
    /// Vertical drift per frame
    pub drift: f32,
}

/// Live floating texts with their own id counter
#[derive(Debug, Clone, Default)]
pub struct FloatingTexts {
    texts: Vec<FloatingText>,
    next_id: u32,
}

impl FloatingTexts {
    pub fn spawn(&mut self, pos: Vec2, text: impl Into<String>, color: u32) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.texts.push(FloatingText {
            id,
            pos,
            text: text.into(),
            color,
            life: TEXT_LIFETIME,
            drift: TEXT_DRIFT,
        });
        id
    }

    /// Drift and age every text by one frame
    pub fn update(&mut self) {
        for t in &mut self.texts {
            t.pos.y += t.drift;
            t.life = t.life.saturating_sub(1);
        }
    }

    /// Drop expired texts. Returns how many were removed.
    pub fn reap(&mut self) -> usize {
        let before = self.texts.len();
        self.texts.retain(|t| t.life > 0);
        before - self.texts.len()
    }

    pub fn as_slice(&self) -> &[FloatingText] {
        &self.texts
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
