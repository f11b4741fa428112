//! Exploration and extraction state machine
//!
//! ```text
//! Exploring -> ExtractionActive <-> ExtractingInZone -> Extracted
//!     \______________\___________________\____________-> Killed
//! ```
//! Helpers here are pure; `tick` owns every write to the machine fields.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::world::World;
use crate::consts::CHUNK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionPhase {
    /// Zone not yet open
    Exploring,
    /// Zone open, player outside it
    ExtractionActive,
    /// Player inside the zone, dwell counting
    ExtractingInZone,
    /// Terminal success
    Extracted,
    /// Terminal failure
    Killed,
}

impl ExtractionPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, ExtractionPhase::Extracted | ExtractionPhase::Killed)
    }

    pub fn zone_open(self) -> bool {
        matches!(
            self,
            ExtractionPhase::ExtractionActive | ExtractionPhase::ExtractingInZone
        )
    }
}

/// Grid cell containing `pos`
pub fn chunk_of(pos: Vec2) -> (i32, i32) {
    let size = CHUNK_SIZE.max(1.0);
    ((pos.x / size).floor() as i32, (pos.y / size).floor() as i32)
}

/// Visited chunks; only ever grows during a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FogOfWar {
    visited: BTreeSet<(i32, i32)>,
}

impl FogOfWar {
    /// Mark the chunk under `pos` and its 8 neighbors. Returns newly revealed count.
    pub fn reveal_around(&mut self, pos: Vec2) -> usize {
        let (cx, cy) = chunk_of(pos);
        let mut added = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.visited.insert((cx + dx, cy + dy)) {
                    added += 1;
                }
            }
        }
        added
    }

    pub fn is_visited(&self, chunk: (i32, i32)) -> bool {
        self.visited.contains(&chunk)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(i32, i32)> {
        self.visited.iter()
    }
}

/// Zone of side `size` resting on top of `platform`, centered horizontally
pub fn zone_above(platform: &Rect, size: f32) -> Rect {
    Rect::new(
        platform.center().x - size / 2.0,
        platform.top() - size,
        size,
        size,
    )
}

/// Pick a random extraction site. Falls back to the starting platform when
/// no eligible site exists.
pub fn pick_zone<R: Rng>(world: &World, rng: &mut R, size: f32) -> Rect {
    let sites = world.extraction_sites();
    let platform = if sites.is_empty() {
        log::warn!("No eligible extraction platform, using the starting platform");
        world.start_platform()
    } else {
        &world.platforms[sites[rng.random_range(0..sites.len())]]
    };
    zone_above(&platform.rect, size)
}

/// One frame of dwell bookkeeping: `(new_dwell, done)`.
/// Leaving the zone drops the counter straight to zero.
pub fn dwell_step(in_zone: bool, dwell: u32, threshold: u32) -> (u32, bool) {
    if !in_zone {
        return (0, false);
    }
    let dwell = dwell + 1;
    (dwell, dwell > threshold)
}
