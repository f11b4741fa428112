//! Level geometry generation
//!
//! Terrain is identical every session; only entity and loot spawning are
//! randomized. Layout (y grows downward):
//! - starting ledge at the origin
//! - a central shaft of staggered wooden ledges climbing upward
//! - upper side chambers left and right, reached by step platforms
//! - a wide crossroads layer below the start, broken by three hazard pools
//! - a lower chamber beneath the crossroads
//! - a safety floor far below everything

use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;

/// Surface material of a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Soil,
    Stone,
    /// Decorative ledges; walkable but never an extraction site
    Wood,
    /// Instant death on contact
    HazardLiquid,
    /// Chamber ceilings and walls; solid, but their tops are out of reach
    Bedrock,
}

impl SurfaceKind {
    pub fn is_hazard(self) -> bool {
        self == SurfaceKind::HazardLiquid
    }

    /// Something can stand on top of it
    pub fn is_standable(self) -> bool {
        !matches!(self, SurfaceKind::HazardLiquid | SurfaceKind::Bedrock)
    }
}

/// An immutable piece of terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: SurfaceKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32, kind: SurfaceKind) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind,
        }
    }
}

/// Number of ledges in the central shaft
pub const SHAFT_LEDGES: usize = 12;
/// Vertical spacing between shaft ledges
pub const SHAFT_STEP: f32 = 140.0;
/// Centers of the three crossroads hazard pools
pub const HAZARD_POOL_CENTERS: [f32; 3] = [-1400.0, 500.0, 1700.0];
pub const HAZARD_POOL_WIDTH: f32 = 220.0;

/// Top of the crossroads layer
pub const CROSSROADS_Y: f32 = 600.0;
const CROSSROADS_HALF_WIDTH: f32 = 2800.0;
const UPPER_CHAMBER_Y: f32 = -900.0;
const LOWER_CHAMBER_Y: f32 = 1400.0;
/// Top of the safety floor
pub const SAFETY_FLOOR_Y: f32 = 2200.0;

/// Generated level
#[derive(Debug, Clone)]
pub struct World {
    pub platforms: Vec<Platform>,
    /// Index of the starting platform
    pub start: usize,
    /// Index of the safety floor
    pub safety_floor: usize,
}

impl World {
    pub fn start_platform(&self) -> &Platform {
        &self.platforms[self.start]
    }

    /// Platforms an entity may be spawned on (standable, not the safety floor)
    pub fn spawnable(&self) -> Vec<usize> {
        self.platforms
            .iter()
            .enumerate()
            .filter(|(i, p)| p.kind.is_standable() && *i != self.safety_floor)
            .map(|(i, _)| i)
            .collect()
    }

    /// Platforms eligible to host the extraction zone
    pub fn extraction_sites(&self) -> Vec<usize> {
        self.platforms
            .iter()
            .enumerate()
            .filter(|(i, p)| {
                p.kind.is_standable() && p.kind != SurfaceKind::Wood && *i != self.safety_floor
            })
            .map(|(i, _)| i)
            .collect()
    }
}

/// Build the level. Deterministic: every call yields the same layout.
pub fn generate_world() -> World {
    use SurfaceKind::*;

    let mut platforms = Vec::with_capacity(64);

    // Starting ledge straddles the origin
    let start = platforms.len();
    platforms.push(Platform::new(-150.0, 0.0, 300.0, 30.0, Stone));

    // Central shaft: staggered ledges climbing upward
    for i in 0..SHAFT_LEDGES {
        let y = -SHAFT_STEP * (i as f32 + 1.0);
        let x = if i % 2 == 0 { -260.0 } else { 60.0 };
        platforms.push(Platform::new(x, y, 200.0, 20.0, Wood));
    }

    // Steps from the shaft out to the upper chambers (both sides)
    for side in [-1.0f32, 1.0] {
        for (i, y) in [-420.0f32, -600.0, -780.0].into_iter().enumerate() {
            let offset = 500.0 + 380.0 * i as f32;
            let x = if side < 0.0 { -offset - 180.0 } else { offset };
            platforms.push(Platform::new(x, y, 180.0, 20.0, Stone));
        }
    }

    // Upper side chambers: floor + ceiling + back wall
    for side in [-1.0f32, 1.0] {
        let (x, wall_x) = if side < 0.0 {
            (-2500.0, -2540.0)
        } else {
            (1600.0, 2500.0)
        };
        platforms.push(Platform::new(x, UPPER_CHAMBER_Y, 900.0, 40.0, Stone));
        platforms.push(Platform::new(x, UPPER_CHAMBER_Y - 420.0, 900.0, 40.0, Bedrock));
        platforms.push(Platform::new(wall_x, UPPER_CHAMBER_Y - 420.0, 40.0, 460.0, Bedrock));
    }

    // Steps from the start down to the crossroads
    for (i, y) in [150.0f32, 300.0, 450.0].into_iter().enumerate() {
        let x = -360.0 - 160.0 * i as f32;
        platforms.push(Platform::new(x, y, 160.0, 20.0, Wood));
    }

    // Crossroads: wide soil layer split by hazard pools
    let mut cursor = -CROSSROADS_HALF_WIDTH;
    for center in HAZARD_POOL_CENTERS {
        let pool_left = center - HAZARD_POOL_WIDTH / 2.0;
        platforms.push(Platform::new(cursor, CROSSROADS_Y, pool_left - cursor, 40.0, Soil));
        cursor = pool_left + HAZARD_POOL_WIDTH;
    }
    platforms.push(Platform::new(
        cursor,
        CROSSROADS_Y,
        CROSSROADS_HALF_WIDTH - cursor,
        40.0,
        Soil,
    ));

    // Hazard pools sit just below the crossroads gaps
    for center in HAZARD_POOL_CENTERS {
        platforms.push(Platform::new(
            center - HAZARD_POOL_WIDTH / 2.0,
            CROSSROADS_Y + 40.0,
            HAZARD_POOL_WIDTH,
            30.0,
            HazardLiquid,
        ));
    }

    // Steps from the crossroads' west edge down into the lower chamber
    for (i, y) in [850.0f32, 1050.0, 1250.0].into_iter().enumerate() {
        let x = -3050.0 + 400.0 * i as f32;
        platforms.push(Platform::new(x, y, 200.0, 20.0, Stone));
    }

    // Lower chamber
    platforms.push(Platform::new(-1800.0, LOWER_CHAMBER_Y, 3600.0, 40.0, Stone));
    platforms.push(Platform::new(-600.0, LOWER_CHAMBER_Y - 160.0, 300.0, 20.0, Wood));
    platforms.push(Platform::new(300.0, LOWER_CHAMBER_Y - 160.0, 300.0, 20.0, Wood));

    // Safety floor: effectively infinite, far below the play area
    let safety_floor = platforms.len();
    platforms.push(Platform::new(-100_000.0, SAFETY_FLOOR_Y, 200_000.0, 200.0, Soil));

    log::debug!("Generated world with {} platforms", platforms.len());

    World {
        platforms,
        start,
        safety_floor,
    }
}

/// True if `rect` lies inside the fixed fog/minimap bounds
pub fn within_world_bounds(rect: &Rect) -> bool {
    rect.left() >= WORLD_MIN_X
        && rect.right() <= WORLD_MAX_X
        && rect.top() >= WORLD_MIN_Y
        && rect.bottom() <= WORLD_MAX_Y
}
