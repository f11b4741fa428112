//! Game state and core simulation types
//!
//! Everything the per-frame step reads or writes lives here. Only `tick`
//! mutates the machine fields (phase, zone, dwell, kills).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::FloatingTexts;
use super::entity::{Entity, HeroKind, PLAYER_SIZE};
use super::extraction::{ExtractionPhase, FogOfWar};
use super::geom::Rect;
use super::interaction::SearchState;
use super::loot::{Inventory, Item};
use super::registry::EntityRegistry;
use super::spawn::{position_on, spawn_initial};
use super::world::{World, generate_world};
use crate::consts::*;
use crate::tuning::Tuning;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub success: bool,
    /// Sum of inventory values on success, 0 on death
    pub loot_value: u64,
    pub kills: u32,
}

/// Smoothed view position (top-left of the viewport)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    fn target(focus: Vec2) -> Vec2 {
        focus - Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT) / 2.0
    }

    /// Camera already centered on `focus`
    pub fn centered_on(focus: Vec2) -> Self {
        Self {
            pos: Self::target(focus),
        }
    }

    /// Move a fraction of the way toward centering `focus`
    pub fn follow(&mut self, focus: Vec2) {
        self.pos = self.pos.lerp(Self::target(focus), CAMERA_LERP);
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Frames simulated so far
    pub frame: u64,
    pub camera: Camera,
    pub world: World,
    pub registry: EntityRegistry,
    pub phase: ExtractionPhase,
    /// Extraction zone, set once when extraction opens
    pub zone: Option<Rect>,
    /// Consecutive frames spent inside the zone
    pub dwell: u32,
    pub search: SearchState,
    /// Item waiting on the accept/discard decision (loot menu open)
    pub pending_loot: Option<Item>,
    pub fog: FogOfWar,
    /// Elite kills this session
    pub kills: u32,
    pub inventory: Inventory,
    pub potions: u32,
    pub texts: FloatingTexts,
    /// Set once on entering a terminal phase
    pub outcome: Option<SessionOutcome>,
}

impl GameState {
    /// Fresh session on the standard world
    pub fn new(seed: u64, hero: HeroKind, tuning: Tuning) -> Self {
        let world = generate_world();
        log::info!("World generated: {} platforms", world.platforms.len());
        Self::with_world(seed, hero, tuning, world)
    }

    /// Fresh session on a given world: player on the starting platform,
    /// initial population spawned from the session RNG.
    pub fn with_world(seed: u64, hero: HeroKind, tuning: Tuning, world: World) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let start = position_on(world.start_platform(), PLAYER_SIZE, &mut rng);
        let mut registry =
            EntityRegistry::new(|id| Entity::player(id, start, hero, tuning.player_health));
        spawn_initial(&mut registry, &world, &mut rng, &tuning);

        let focus = registry.player().body.center();
        let mut fog = FogOfWar::default();
        fog.reveal_around(focus);

        Self {
            seed,
            rng,
            frame: 0,
            camera: Camera::centered_on(focus),
            world,
            registry,
            phase: ExtractionPhase::Exploring,
            zone: None,
            dwell: 0,
            search: SearchState::default(),
            pending_loot: None,
            fog,
            kills: 0,
            inventory: Inventory::new(tuning.inventory_slots),
            potions: tuning.starting_potions,
            texts: FloatingTexts::default(),
            outcome: None,
            tuning,
        }
    }

    pub fn player(&self) -> &Entity {
        self.registry.player()
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Loot menu open: movement and combat input are ignored
    pub fn loot_menu_open(&self) -> bool {
        self.pending_loot.is_some()
    }

    /// Frames until the extraction zone opens (0 once open)
    pub fn frames_until_extraction(&self) -> u64 {
        self.tuning.extraction_start_frame.saturating_sub(self.frame)
    }
}
