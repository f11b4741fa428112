//! Read-only view of a frame for the presentation layer
//!
//! Built after `tick` returns; serializes to JSON for hosts that render
//! outside Rust.

use glam::Vec2;
use serde::Serialize;

use super::effects::FloatingText;
use super::entity::{Entity, EntityKind, Facing};
use super::extraction::ExtractionPhase;
use super::geom::Rect;
use super::interaction::find_target;
use super::loot::Item;
use super::state::GameState;
use super::world::Platform;
use crate::frames_to_secs;

/// One live entity as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: &'static str,
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    /// Clamped to zero
    pub health: f32,
    pub max_health: f32,
    pub attack_cooldown: u32,
    pub hit_flash: u32,
    /// Chests only
    pub opened: bool,
}

impl EntityView {
    fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind.label(),
            pos: entity.body.pos,
            size: entity.body.size,
            facing: entity.body.facing,
            health: entity.body.display_health(),
            max_health: entity.body.max_health,
            attack_cooldown: entity.body.attack_cooldown,
            hit_flash: entity.body.hit_flash,
            opened: matches!(&entity.kind, EntityKind::Chest(c) if c.opened),
        }
    }
}

/// HUD scalars
#[derive(Debug, Clone, Serialize)]
pub struct HudSnapshot<'a> {
    pub phase: ExtractionPhase,
    pub inventory: &'a [Item],
    pub inventory_slots: usize,
    pub inventory_value: u64,
    pub potions: u32,
    pub kills: u32,
    /// A chest is in range and no menu is open
    pub search_prompt: bool,
    pub search_percent: u32,
    /// Seconds until extraction opens; `None` once open
    pub extraction_countdown: Option<u64>,
    /// Dwell progress in the zone (0-100)
    pub extraction_percent: u32,
    /// Item waiting on take/discard
    pub loot_menu: Option<&'a Item>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot<'a> {
    pub frame: u64,
    pub camera: Vec2,
    pub platforms: &'a [Platform],
    pub entities: Vec<EntityView>,
    pub visited: Vec<(i32, i32)>,
    pub zone: Option<Rect>,
    pub texts: &'a [FloatingText],
    pub hud: HudSnapshot<'a>,
}

impl<'a> RenderSnapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        let tuning = &state.tuning;
        let player = state.registry.player();

        let entities = state
            .registry
            .iter()
            .filter(|e| !e.body.dead || e.is_chest())
            .map(EntityView::of)
            .collect();

        let search_prompt = !state.loot_menu_open()
            && !state.is_over()
            && find_target(player, state.registry.actors(), tuning.search_radius).is_some();

        let extraction_countdown = (state.phase == ExtractionPhase::Exploring)
            .then(|| frames_to_secs(state.frames_until_extraction()));

        let extraction_percent = if tuning.extraction_dwell == 0 {
            0
        } else {
            (state.dwell.min(tuning.extraction_dwell) * 100) / tuning.extraction_dwell
        };

        Self {
            frame: state.frame,
            camera: state.camera.pos,
            platforms: &state.world.platforms,
            entities,
            visited: state.fog.iter().copied().collect(),
            zone: state.zone,
            texts: state.texts.as_slice(),
            hud: HudSnapshot {
                phase: state.phase,
                inventory: state.inventory.items(),
                inventory_slots: state.inventory.slots(),
                inventory_value: state.inventory.total_value(),
                potions: state.potions,
                kills: state.kills,
                search_prompt,
                search_percent: state.search.percent(tuning.search_duration),
                extraction_countdown,
                extraction_percent,
                loot_menu: state.pending_loot.as_ref(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
