//! Combat resolution: player attacks, hero skills, hostile contact damage
//!
//! Kills are decided at the moment damage lands (`HitOutcome::Killed`), so a
//! target can only be counted once no matter how many hits land in a frame.

use glam::Vec2;

use super::entity::{Damageable, Entity, EntityKind, HeroKind, HitOutcome, Physical};
use super::geom::{Rect, center_distance, intersects};
use crate::sign;
use crate::tuning::Tuning;

/// One landed hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub target: u32,
    pub damage: f32,
    /// Target center when hit (for floating text)
    pub at: Vec2,
    pub killed: bool,
    /// Target was the elite hostile
    pub elite: bool,
}

/// Hits from one player action
#[derive(Debug, Clone, Default)]
pub struct CombatReport {
    /// Whether the action fired (was off cooldown)
    pub fired: bool,
    pub hits: Vec<HitEvent>,
}

impl CombatReport {
    /// Elite kills caused by this action
    pub fn elite_kills(&self) -> u32 {
        self.hits.iter().filter(|h| h.killed && h.elite).count() as u32
    }
}

/// Count every frame-based timer down by one
pub fn cool_down(entity: &mut Entity) {
    let body = entity.body_mut();
    body.attack_cooldown = body.attack_cooldown.saturating_sub(1);
    body.hit_flash = body.hit_flash.saturating_sub(1);
    match &mut entity.kind {
        EntityKind::Player(p) => p.skill_cooldown = p.skill_cooldown.saturating_sub(1),
        EntityKind::Rogue(r) => r.jump_cooldown = r.jump_cooldown.saturating_sub(1),
        _ => {}
    }
}

fn hit(target: &mut Entity, damage: f32, knockback: Vec2) -> Option<HitEvent> {
    let outcome = target.take_hit(damage, knockback);
    if outcome == HitOutcome::Ignored {
        return None;
    }
    Some(HitEvent {
        target: target.id,
        damage,
        at: target.body.center(),
        killed: outcome == HitOutcome::Killed,
        elite: target.is_rogue(),
    })
}

fn is_target(e: &Entity) -> bool {
    e.is_hostile() && !e.body.dead && e.body.health > 0.0
}

/// Hitbox of the basic attack: extends `reach` in front of the player
pub fn attack_hitbox(player: &Entity, reach: f32) -> Rect {
    let body = &player.body;
    let x = match body.facing {
        super::entity::Facing::Right => body.pos.x + body.size.x,
        super::entity::Facing::Left => body.pos.x - reach,
    };
    Rect::new(x, body.pos.y - 10.0, reach, body.size.y + 20.0)
}

/// Basic attack: directional rectangle, fixed damage and knockback
pub fn basic_attack(player: &mut Entity, actors: &mut [Entity], tuning: &Tuning) -> CombatReport {
    let mut report = CombatReport::default();
    if player.body.dead || player.body.attack_cooldown > 0 {
        return report;
    }
    player.body.attack_cooldown = tuning.attack_cooldown;
    report.fired = true;

    let hitbox = attack_hitbox(player, tuning.attack_reach);
    let knockback = Vec2::new(
        player.body.facing.sign() * tuning.attack_knockback_x,
        tuning.attack_knockback_y,
    );
    for target in actors.iter_mut().filter(|e| is_target(e)) {
        if intersects(&hitbox, &target.body.rect()) {
            report.hits.extend(hit(target, tuning.attack_damage, knockback));
        }
    }
    report
}

/// Hero skill: radius check around the player (Warrior) or in front (Mage)
pub fn cast_skill(player: &mut Entity, actors: &mut [Entity], tuning: &Tuning) -> CombatReport {
    let mut report = CombatReport::default();
    let Some(data) = player.player_data_mut() else {
        return report;
    };
    if data.skill_cooldown > 0 {
        return report;
    }
    let hero = data.hero;
    if player.body.dead {
        return report;
    }
    if let Some(data) = player.player_data_mut() {
        data.skill_cooldown = tuning.skill_cooldown;
    }
    report.fired = true;

    let facing = player.body.facing;
    let origin = match hero {
        HeroKind::Warrior => player.body.rect(),
        HeroKind::Mage => {
            let center = player.body.center() + Vec2::new(facing.sign() * tuning.mage_skill_offset, 0.0);
            Rect::centered(center, Vec2::ZERO)
        }
    };
    let (radius, damage) = match hero {
        HeroKind::Warrior => (tuning.warrior_skill_radius, tuning.warrior_skill_damage),
        HeroKind::Mage => (tuning.mage_skill_radius, tuning.mage_skill_damage),
    };

    for target in actors.iter_mut().filter(|e| is_target(e)) {
        if center_distance(&origin, &target.body.rect()) > radius {
            continue;
        }
        let knockback = match hero {
            HeroKind::Warrior => {
                let dx = target.body.center().x - origin.center().x;
                let dir = if dx == 0.0 { facing.sign() } else { sign(dx) };
                Vec2::new(dir * tuning.warrior_knockback_x, tuning.warrior_knockback_y)
            }
            HeroKind::Mage => Vec2::new(0.0, tuning.mage_lift),
        };
        report.hits.extend(hit(target, damage, knockback));
    }
    report
}

/// Damage dealt to the player by hostiles this frame
pub fn hostile_contact(player: &mut Entity, actors: &mut [Entity], tuning: &Tuning) -> Vec<HitEvent> {
    let mut hits = Vec::new();
    for hostile in actors.iter_mut().filter(|e| is_target(e)) {
        if player.body.dead {
            break;
        }
        let player_rect = player.body.rect();
        let hostile_rect = hostile.body.rect();
        let dist = center_distance(&player_rect, &hostile_rect);
        if dist >= tuning.aggro_radius {
            continue;
        }
        match hostile.kind {
            EntityKind::Rogue(_) => {
                if dist < tuning.rogue_melee_range && hostile.body.attack_cooldown == 0 {
                    let dir = sign(player_rect.center().x - hostile_rect.center().x);
                    let dir = if dir == 0.0 { hostile.body.facing.sign() } else { dir };
                    let knockback = Vec2::new(dir * tuning.rogue_knockback_x, tuning.rogue_knockback_y);
                    hostile.body.attack_cooldown = tuning.rogue_attack_cooldown;
                    hits.extend(hit(player, tuning.rogue_attack_damage, knockback));
                }
            }
            EntityKind::Slime => {
                if intersects(&player_rect, &hostile_rect) {
                    hits.extend(hit(player, tuning.slime_contact_damage, Vec2::ZERO));
                }
            }
            _ => {}
        }
    }
    hits
}
