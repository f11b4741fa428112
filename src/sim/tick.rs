//! Fixed timestep simulation tick
//!
//! One call advances the session by exactly one frame, in this order:
//! input snapshot, player intent, physics and collision, interaction and
//! combat, AI, lifecycle cleanup, extraction bookkeeping, camera.

use glam::Vec2;

use super::ai::{AiDriven, AiTarget};
use super::combat::{CombatReport, HitEvent, basic_attack, cast_skill, cool_down, hostile_contact};
use super::effects::{COLOR_DAMAGE, COLOR_HEAL, COLOR_PLAYER_HURT, COLOR_STATUS};
use super::entity::{EntityKind, Physical};
use super::extraction::{ExtractionPhase, dwell_step, pick_zone};
use super::interaction::{SearchStep, find_target};
use super::loot::roll_drop;
use super::physics::{apply_player_intent, step_body};
use super::spawn::spawn_rogue_wave;
use super::state::{GameState, SessionOutcome};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Held state; jumps fire on the press edge
    pub jump: bool,
    pub attack: bool,
    pub skill: bool,
    /// Held state; a potion is used on the press edge
    pub potion: bool,
    /// Hold to search the targeted chest
    pub search: bool,
    /// One-shot: take the item in the loot menu
    pub accept_loot: bool,
    /// One-shot: throw the item in the loot menu away
    pub discard_loot: bool,
}

impl TickInput {
    /// Any movement key held (cancels searching)
    pub fn is_moving(&self) -> bool {
        self.left || self.right || self.jump
    }
}

/// Advance the game state by one frame.
///
/// Returns the outcome on the frame the session ends; terminal states are
/// frozen and every later call returns `None` without mutating anything.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<SessionOutcome> {
    if state.phase.is_terminal() {
        return None;
    }
    state.frame += 1;

    resolve_loot_menu(state, input);

    let locked = state.loot_menu_open();
    {
        let (player, actors) = state.registry.split_mut();
        for entity in std::iter::once(player).chain(actors.iter_mut()) {
            cool_down(entity);
        }
    }

    apply_player_intent(state.registry.player_mut(), input, &state.tuning, locked);
    use_potion(state, input, locked);

    step_physics(state);

    if !locked {
        update_search(state, input);
        resolve_player_actions(state, input);
    }

    update_ai(state);

    cleanup(state);

    let outcome = update_extraction(state);

    let focus = state.registry.player().body.center();
    state.camera.follow(focus);

    outcome
}

/// Consume the one-shot loot decision, if a menu is open
fn resolve_loot_menu(state: &mut GameState, input: &TickInput) {
    if state.pending_loot.is_none() {
        return;
    }
    if input.accept_loot {
        if let Some(item) = state.pending_loot.take() {
            let name = item.name.clone();
            if state.inventory.add(item) {
                log::debug!("Took {}", name);
            }
        }
    } else if input.discard_loot {
        if let Some(item) = state.pending_loot.take() {
            log::debug!("Discarded {}", item.name);
        }
    }
}

fn use_potion(state: &mut GameState, input: &TickInput, locked: bool) {
    let potions = state.potions;
    let heal = state.tuning.potion_heal;
    let player = state.registry.player_mut();
    let Some(data) = player.player_data_mut() else {
        return;
    };
    let pressed = input.potion && !data.potion_held;
    data.potion_held = input.potion;
    if !pressed || locked || potions == 0 || player.body.dead {
        return;
    }
    let body = &mut player.body;
    if body.health >= body.max_health {
        return;
    }
    let healed = heal.min(body.max_health - body.health);
    body.health += healed;
    let at = body.center();
    state.potions -= 1;
    state
        .texts
        .spawn(at, format!("+{}", healed.round() as i32), COLOR_HEAL);
}

fn step_physics(state: &mut GameState) {
    let platforms = &state.world.platforms;
    let player = state.registry.player_mut();
    let was_alive = player.body.health > 0.0;
    let contact = step_body(player, platforms);
    if contact.hazard && was_alive {
        let at = player.body.center();
        log::debug!("Player fell into hazard at ({:.0}, {:.0})", at.x, at.y);
        state.texts.spawn(at, "BURNED!", COLOR_PLAYER_HURT);
    }
    for actor in state.registry.actors_mut() {
        step_body(actor, platforms);
    }
}

fn update_search(state: &mut GameState, input: &TickInput) {
    let (player, actors) = state.registry.split_mut();
    let target = if player.body.dead {
        None
    } else {
        find_target(player, actors, state.tuning.search_radius)
    };
    let step = state
        .search
        .advance(target, input.search, input.is_moving(), state.tuning.search_duration);
    let SearchStep::Completed(chest_id) = step else {
        return;
    };

    let Some(chest) = state.registry.get_mut(chest_id) else {
        return;
    };
    let EntityKind::Chest(data) = &mut chest.kind else {
        return;
    };
    if data.opened {
        return;
    }
    data.opened = true;
    let at = chest.body.center();

    let drop = roll_drop(&mut state.rng, state.tuning.potion_chance);
    log::info!(
        "Chest {} opened: {} ({}, value {})",
        chest_id,
        drop.item.name,
        drop.item.rarity.as_str(),
        drop.item.value
    );
    state.texts.spawn(at, "LOOT!", drop.item.color);
    if drop.potion {
        state.potions += 1;
        state
            .texts
            .spawn(at - Vec2::new(0.0, 20.0), "+1 POTION", COLOR_HEAL);
    }
    state.pending_loot = Some(drop.item);
}

fn resolve_player_actions(state: &mut GameState, input: &TickInput) {
    let mut reports: Vec<CombatReport> = Vec::new();
    {
        let (player, actors) = state.registry.split_mut();
        if input.attack {
            reports.push(basic_attack(player, actors, &state.tuning));
        }
        if input.skill {
            reports.push(cast_skill(player, actors, &state.tuning));
        }
    }

    for report in &reports {
        let elite_kills = report.elite_kills();
        if elite_kills > 0 {
            state.kills += elite_kills;
            log::debug!("Rogue down, session kills: {}", state.kills);
        }
        for hit in &report.hits {
            damage_text(state, hit, COLOR_DAMAGE);
        }
    }
}

fn damage_text(state: &mut GameState, hit: &HitEvent, color: u32) {
    state
        .texts
        .spawn(hit.at, format!("-{}", hit.damage.round() as i32), color);
}

fn update_ai(state: &mut GameState) {
    let target = AiTarget::of(state.registry.player());
    if !state.registry.player().body.dead {
        for actor in state.registry.actors_mut() {
            actor.think(&target, &state.tuning);
        }
    }

    let hits = {
        let (player, actors) = state.registry.split_mut();
        hostile_contact(player, actors, &state.tuning)
    };
    // Continuous slime contact is too small to label every frame
    for hit in hits.iter().filter(|h| h.damage >= 1.0) {
        damage_text(state, hit, COLOR_PLAYER_HURT);
    }
}

/// Deaths, rogue waves, text aging, and the end-of-frame reap
fn cleanup(state: &mut GameState) {
    let (player, actors) = state.registry.split_mut();
    for entity in std::iter::once(player).chain(actors.iter_mut()) {
        if entity.is_chest() {
            continue;
        }
        let body = entity.body_mut();
        if !body.dead && body.health <= 0.0 {
            body.dead = true;
        }
    }

    let interval = state.tuning.rogue_wave_interval;
    if interval > 0 && state.frame % interval == 0 {
        let player_center = state.registry.player().body.center();
        let spawned = spawn_rogue_wave(
            &mut state.registry,
            &state.world,
            &mut state.rng,
            &state.tuning,
            player_center,
        );
        if spawned > 0 {
            log::info!("Rogue wave at frame {}: {} spawned", state.frame, spawned);
        }
    }

    state.texts.update();
    state.registry.reap();
    state.texts.reap();
}

fn update_extraction(state: &mut GameState) -> Option<SessionOutcome> {
    let player_rect = state.registry.player().body.rect();
    state.fog.reveal_around(player_rect.center());

    if state.registry.player().body.dead {
        return finish(state, false);
    }

    if state.phase == ExtractionPhase::Exploring && state.frame >= state.tuning.extraction_start_frame {
        let zone = pick_zone(&state.world, &mut state.rng, state.tuning.extraction_zone_size);
        log::info!(
            "Extraction open at ({:.0}, {:.0}) on frame {}",
            zone.center().x,
            zone.center().y,
            state.frame
        );
        state.texts.spawn(player_rect.center(), "EXTRACTION OPEN", COLOR_STATUS);
        state.zone = Some(zone);
        state.phase = ExtractionPhase::ExtractionActive;
    }

    if !state.phase.zone_open() {
        return None;
    }
    let Some(zone) = state.zone else {
        return None;
    };
    let in_zone = zone.intersects(&player_rect);
    let (dwell, done) = dwell_step(in_zone, state.dwell, state.tuning.extraction_dwell);
    state.dwell = dwell;
    state.phase = if in_zone {
        ExtractionPhase::ExtractingInZone
    } else {
        ExtractionPhase::ExtractionActive
    };
    if done {
        return finish(state, true);
    }
    None
}

/// Enter the terminal phase and record the outcome
fn finish(state: &mut GameState, success: bool) -> Option<SessionOutcome> {
    let outcome = SessionOutcome {
        success,
        loot_value: if success { state.inventory.total_value() } else { 0 },
        kills: state.kills,
    };
    state.phase = if success {
        ExtractionPhase::Extracted
    } else {
        ExtractionPhase::Killed
    };
    state.outcome = Some(outcome);
    log::info!(
        "Session over on frame {}: success={}, loot={}, kills={}",
        state.frame,
        outcome.success,
        outcome.loot_value,
        outcome.kills
    );
    Some(outcome)
}
