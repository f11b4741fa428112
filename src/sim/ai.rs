//! Hostile behaviours
//!
//! Each hostile only thinks while the player is inside the aggro radius.
//! Behaviour only steers velocity; the physics step moves the body.

use glam::Vec2;

use super::entity::{Body, Entity, EntityKind};
use super::geom::{Rect, center_distance};
use crate::sign;
use crate::tuning::Tuning;

/// Snapshot of the player that AI steers against
#[derive(Debug, Clone, Copy)]
pub struct AiTarget {
    pub center: Vec2,
    pub rect: Rect,
}

impl AiTarget {
    pub fn of(player: &Entity) -> Self {
        Self {
            center: player.body.center(),
            rect: player.body.rect(),
        }
    }
}

/// Capability: steered by a per-kind behaviour
pub trait AiDriven {
    /// Update velocity/facing toward `target`. Returns true if the entity acted.
    fn think(&mut self, target: &AiTarget, tuning: &Tuning) -> bool;
}

impl AiDriven for Entity {
    fn think(&mut self, target: &AiTarget, tuning: &Tuning) -> bool {
        if self.body.dead {
            return false;
        }
        let dist = center_distance(&self.body.rect(), &target.rect);
        if dist >= tuning.aggro_radius {
            return false;
        }
        let delta = target.center - self.body.center();

        match self.kind {
            EntityKind::Slime => {
                slime(&mut self.body, delta, tuning);
                true
            }
            EntityKind::Bat => {
                bat(&mut self.body, delta, tuning);
                true
            }
            EntityKind::Rogue(_) => {
                rogue(self, delta, tuning);
                true
            }
            EntityKind::Player(_) | EntityKind::Chest(_) => false,
        }
    }
}

fn slime(body: &mut Body, delta: Vec2, tuning: &Tuning) {
    let dir = sign(delta.x);
    body.vel.x += dir * tuning.slime_accel;
    body.facing = body.facing.toward(dir);
}

fn bat(body: &mut Body, delta: Vec2, tuning: &Tuning) {
    // Hover-seek: steer along the offset, physics damps vertical speed
    body.vel += delta.normalize_or_zero() * tuning.bat_accel;
    body.facing = body.facing.toward(delta.x);
}

fn rogue(entity: &mut Entity, delta: Vec2, tuning: &Tuning) {
    let dist = delta.length();
    let Entity { body, kind, .. } = entity;
    let EntityKind::Rogue(data) = kind else {
        return;
    };

    let toward = sign(delta.x);
    // Kite: back off at reduced speed while the attack is ready
    let retreating = dist < tuning.rogue_kite_range && body.attack_cooldown == 0;
    let (dir, cap) = if retreating {
        (-toward, tuning.rogue_max_speed * tuning.rogue_retreat_factor)
    } else {
        (toward, tuning.rogue_max_speed)
    };
    body.vel.x = (body.vel.x + dir * tuning.rogue_accel).clamp(-cap, cap);
    body.facing = body.facing.toward(toward);

    if body.on_ground && data.jump_cooldown == 0 {
        let player_above = -delta.y > tuning.rogue_climb_trigger;
        let stuck = body.vel.x.abs() < tuning.rogue_stuck_speed
            && delta.x.abs() > tuning.rogue_stuck_distance;
        if player_above || stuck {
            body.vel.y = tuning.rogue_jump_impulse;
            body.on_ground = false;
            data.jump_cooldown = tuning.rogue_jump_cooldown;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::HeroKind;

    fn target_at(x: f32, y: f32) -> AiTarget {
        AiTarget::of(&Entity::player(1, Vec2::new(x, y), HeroKind::Warrior, 100.0))
    }

    #[test]
    fn test_idle_outside_aggro() {
        let tuning = Tuning::default();
        let mut slime = Entity::slime(2, Vec2::ZERO, 40.0);
        assert!(!slime.think(&target_at(5000.0, 0.0), &tuning));
        assert_eq!(slime.body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_slime_accelerates_horizontally_only() {
        let tuning = Tuning::default();
        let mut slime = Entity::slime(2, Vec2::ZERO, 40.0);
        assert!(slime.think(&target_at(-200.0, -300.0), &tuning));
        assert_eq!(slime.body.vel, Vec2::new(-tuning.slime_accel, 0.0));
    }

    #[test]
    fn test_bat_seeks_vertically() {
        let tuning = Tuning::default();
        let mut bat = Entity::bat(2, Vec2::ZERO, 25.0);
        bat.think(&target_at(0.0, -300.0), &tuning);
        assert!(bat.body.vel.y < 0.0);
    }

    #[test]
    fn test_rogue_speed_capped() {
        let tuning = Tuning::default();
        let mut rogue = Entity::rogue(2, Vec2::ZERO, 120.0);
        rogue.body.attack_cooldown = 10;
        for _ in 0..100 {
            rogue.think(&target_at(400.0, 0.0), &tuning);
        }
        assert_eq!(rogue.body.vel.x, tuning.rogue_max_speed);
    }

    #[test]
    fn test_rogue_kites_when_attack_ready() {
        let tuning = Tuning::default();
        let mut rogue = Entity::rogue(2, Vec2::ZERO, 120.0);
        rogue.think(&target_at(100.0, 0.0), &tuning);
        assert!(rogue.body.vel.x < 0.0);
        for _ in 0..100 {
            rogue.think(&target_at(100.0, 0.0), &tuning);
        }
        assert_eq!(
            rogue.body.vel.x,
            -tuning.rogue_max_speed * tuning.rogue_retreat_factor
        );
        // Still faces the player while backing off
        assert_eq!(rogue.body.facing, crate::sim::entity::Facing::Right);
    }

    #[test]
    fn test_rogue_jumps_when_player_above() {
        let tuning = Tuning::default();
        let mut rogue = Entity::rogue(2, Vec2::ZERO, 120.0);
        rogue.body.on_ground = true;
        rogue.body.attack_cooldown = 10;
        rogue.think(&target_at(0.0, -200.0), &tuning);
        assert_eq!(rogue.body.vel.y, tuning.rogue_jump_impulse);

        // Jump cooldown blocks an immediate second jump
        rogue.body.on_ground = true;
        rogue.body.vel.y = 0.0;
        rogue.think(&target_at(0.0, -200.0), &tuning);
        assert_eq!(rogue.body.vel.y, 0.0);
    }

    #[test]
    fn test_rogue_jumps_when_stuck() {
        let tuning = Tuning::default();
        let mut rogue = Entity::rogue(2, Vec2::ZERO, 120.0);
        rogue.body.on_ground = true;
        rogue.body.attack_cooldown = 10;
        // Pressed against a wall: velocity was zeroed, player still far
        rogue.body.vel.x = -tuning.rogue_accel;
        rogue.think(&target_at(300.0, 0.0), &tuning);
        assert_eq!(rogue.body.vel.y, tuning.rogue_jump_impulse);
    }

    #[test]
    fn test_chest_is_inert() {
        let tuning = Tuning::default();
        let mut chest = Entity::chest(2, Vec2::ZERO);
        assert!(!chest.think(&target_at(10.0, 0.0), &tuning));
    }
}
