//! Delve Extract - a 2D side-scrolling extraction looter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, AI, extraction, loot)
//! - `input`: Logical actions, key bindings and the per-frame input latch
//! - `session`: Session orchestration (step driver, end-of-session callback)
//! - `platform`: Host drivers (browser frame loop on wasm32)
//! - `tuning`: Data-driven game balance
//! - `settings`: Per-session preferences
//! - `ledger`: Lifetime currency and kill totals across sessions

pub mod input;
pub mod ledger;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::{Action, InputLatch, KeyBindings};
pub use ledger::Ledger;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Fixed physics and world constants (balance lives in `tuning`)
pub mod consts {
    /// Simulation frames per second (one `tick` per frame)
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Downward acceleration, pixels/frame²
    pub const GRAVITY: f32 = 0.6;
    /// Horizontal velocity multiplier applied after integration
    pub const FRICTION: f32 = 0.82;
    /// Vertical speed clamp so a single frame never tunnels through the support band
    pub const MAX_FALL_SPEED: f32 = 18.0;
    /// Max vertical overlap still treated as "resting on" a platform
    pub const SUPPORT_TOLERANCE: f32 = 20.0;
    /// Vertical velocity damping for flyers (hover)
    pub const HOVER_DAMPING: f32 = 0.92;

    /// Fog-of-war grid cell size
    pub const CHUNK_SIZE: f32 = 400.0;

    /// Viewport used for camera centering
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
    /// Camera lerp factor per frame
    pub const CAMERA_LERP: f32 = 0.1;

    /// World bounds for minimap/fog projection (must contain all terrain)
    pub const WORLD_MIN_X: f32 = -3200.0;
    pub const WORLD_MAX_X: f32 = 3200.0;
    pub const WORLD_MIN_Y: f32 = -2400.0;
    pub const WORLD_MAX_Y: f32 = 2400.0;

    /// Floating text defaults
    pub const TEXT_LIFETIME: u32 = 45;
    pub const TEXT_DRIFT: f32 = -0.8;

    /// Cosmetic hit flash duration
    pub const HIT_FLASH_FRAMES: u32 = 10;
}

/// Sign of `v` as -1/0/1 (unlike `f32::signum`, zero stays zero)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Convert a frame count to whole seconds (rounded up), for HUD countdowns
#[inline]
pub fn frames_to_secs(frames: u64) -> u64 {
    frames.div_ceil(consts::FRAMES_PER_SECOND as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }

    #[test]
    fn test_frames_to_secs() {
        assert_eq!(frames_to_secs(0), 0);
        assert_eq!(frames_to_secs(1), 1);
        assert_eq!(frames_to_secs(60), 1);
        assert_eq!(frames_to_secs(61), 2);
    }
}
