//! Per-frame motion: player intent, integration, platform collision
//!
//! Collision is a sequential pass over the platform list: each overlapping
//! platform applies its own correction in list order, so the last one wins.

use super::entity::{Entity, EntityKind, Motion, Physical};
use super::geom::intersects;
use super::tick::TickInput;
use super::world::Platform;
use crate::consts::*;
use crate::tuning::Tuning;

/// What a body touched during collision resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Came to rest on top of a platform
    pub landed: bool,
    /// Hit a ceiling
    pub bumped: bool,
    /// Touched hazard liquid (health forced to zero, body marked dead)
    pub hazard: bool,
}

/// Apply movement and jump input to the player.
///
/// When `locked` (loot menu open) movement is ignored but the jump key state
/// is still tracked, so holding jump through the menu doesn't fire on close.
pub fn apply_player_intent(player: &mut Entity, input: &TickInput, tuning: &Tuning, locked: bool) {
    let Entity { body, kind, .. } = player;
    let EntityKind::Player(data) = kind else {
        return;
    };
    if body.dead {
        return;
    }

    if !locked {
        let mut dir = 0.0;
        if input.left {
            dir -= 1.0;
        }
        if input.right {
            dir += 1.0;
        }
        if dir != 0.0 {
            body.vel.x = (body.vel.x + dir * tuning.player_accel)
                .clamp(-tuning.player_max_speed, tuning.player_max_speed);
            body.facing = body.facing.toward(dir);
        }

        // Edge-triggered: a held key never fires twice
        let pressed = input.jump && !data.jump_held;
        if pressed && data.jumps_used < tuning.max_jumps {
            body.vel.y = tuning.jump_impulse;
            body.on_ground = false;
            data.jumps_used += 1;
        }
    }
    data.jump_held = input.jump;
}

/// Integrate one body and resolve it against every platform
pub fn step_body<P: Physical + ?Sized>(entity: &mut P, platforms: &[Platform]) -> Contact {
    let mut contact = Contact::default();
    if !entity.is_simulated() {
        return contact;
    }
    let motion = entity.motion();
    let body = entity.body_mut();

    match motion {
        Motion::Walker => body.vel.y = (body.vel.y + GRAVITY).min(MAX_FALL_SPEED),
        Motion::Flyer => body.vel.y *= HOVER_DAMPING,
        Motion::Static => {}
    }
    body.vel.y = body.vel.y.clamp(-MAX_FALL_SPEED * 2.0, MAX_FALL_SPEED);

    body.pos += body.vel;
    body.vel.x *= FRICTION;
    body.on_ground = false;

    for platform in platforms {
        let rect = body.rect();
        if !intersects(&rect, &platform.rect) {
            continue;
        }

        if platform.kind.is_hazard() {
            body.health = 0.0;
            body.dead = true;
            contact.hazard = true;
            continue;
        }

        let overlap = rect.bottom() - platform.rect.top();
        if body.vel.y >= 0.0 && overlap <= SUPPORT_TOLERANCE {
            body.pos.y = platform.rect.top() - body.size.y;
            body.vel.y = 0.0;
            body.on_ground = true;
            contact.landed = true;
        } else if body.vel.y < 0.0
            && rect.top() >= platform.rect.top()
            && rect.top() <= platform.rect.bottom()
        {
            body.pos.y = platform.rect.bottom();
            body.vel.y = 0.0;
            contact.bumped = true;
        }
    }

    if contact.landed {
        entity.on_land();
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, HeroKind, PLAYER_SIZE};
    use crate::sim::world::SurfaceKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn floor() -> Vec<Platform> {
        vec![Platform::new(-500.0, 100.0, 1000.0, 40.0, SurfaceKind::Stone)]
    }

    fn player_at(x: f32, y: f32) -> Entity {
        Entity::player(1, Vec2::new(x, y), HeroKind::Warrior, 100.0)
    }

    fn jumps_used(e: &Entity) -> u8 {
        e.player_data().map(|p| p.jumps_used).unwrap_or(0)
    }

    #[test]
    fn test_rests_on_platform() {
        let platforms = floor();
        let mut player = player_at(0.0, 100.0 - PLAYER_SIZE.y);
        for _ in 0..10 {
            step_body(&mut player, &platforms);
        }
        assert_eq!(player.body.vel.y, 0.0);
        assert_eq!(player.body.rect().bottom(), 100.0);
        assert!(player.body.on_ground);
    }

    #[test]
    fn test_hazard_kills_same_frame() {
        let platforms = vec![Platform::new(-100.0, 100.0, 200.0, 30.0, SurfaceKind::HazardLiquid)];
        let mut player = player_at(0.0, 100.0 - PLAYER_SIZE.y + 2.0);
        let contact = step_body(&mut player, &platforms);
        assert!(contact.hazard);
        assert_eq!(player.body.health, 0.0);
        assert!(player.body.dead);
    }

    #[test]
    fn test_ceiling_stops_ascent() {
        let platforms = vec![Platform::new(-100.0, 0.0, 200.0, 20.0, SurfaceKind::Stone)];
        let mut player = player_at(0.0, 25.0);
        player.body.vel.y = -10.0;
        let contact = step_body(&mut player, &platforms);
        assert!(contact.bumped);
        assert_eq!(player.body.pos.y, 20.0);
        assert_eq!(player.body.vel.y, 0.0);
    }

    #[test]
    fn test_friction_damps_horizontal() {
        let mut player = player_at(0.0, -500.0);
        player.body.vel.x = 10.0;
        step_body(&mut player, &[]);
        assert!((player.body.vel.x - 10.0 * FRICTION).abs() < 1e-5);
        assert_eq!(player.body.pos.x, 10.0);
    }

    #[test]
    fn test_flyer_ignores_gravity() {
        let mut bat = Entity::bat(2, Vec2::new(0.0, -500.0), 10.0);
        for _ in 0..30 {
            step_body(&mut bat, &[]);
        }
        assert_eq!(bat.body.pos.y, -500.0);
    }

    #[test]
    fn test_last_platform_wins() {
        // Two overlapping supports at different heights: the later one in the list wins
        let platforms = vec![
            Platform::new(-100.0, 100.0, 200.0, 20.0, SurfaceKind::Stone),
            Platform::new(-100.0, 95.0, 200.0, 20.0, SurfaceKind::Soil),
        ];
        let mut player = player_at(0.0, 100.0 - PLAYER_SIZE.y + 6.0);
        step_body(&mut player, &platforms);
        assert_eq!(player.body.rect().bottom(), 95.0);
    }

    #[test]
    fn test_double_jump_consumes_two_charges() {
        let platforms = floor();
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 100.0 - PLAYER_SIZE.y);
        step_body(&mut player, &platforms);
        assert!(player.body.on_ground);

        let press = TickInput {
            jump: true,
            ..Default::default()
        };
        let release = TickInput::default();

        apply_player_intent(&mut player, &press, &tuning, false);
        step_body(&mut player, &platforms);
        assert_eq!(jumps_used(&player), 1);

        // Holding the key does nothing
        apply_player_intent(&mut player, &press, &tuning, false);
        step_body(&mut player, &platforms);
        assert_eq!(jumps_used(&player), 1);

        apply_player_intent(&mut player, &release, &tuning, false);
        step_body(&mut player, &platforms);
        apply_player_intent(&mut player, &press, &tuning, false);
        assert_eq!(jumps_used(&player), 2);
        assert_eq!(player.body.vel.y, tuning.jump_impulse);
        step_body(&mut player, &platforms);

        // Third press in the air is refused
        apply_player_intent(&mut player, &release, &tuning, false);
        step_body(&mut player, &platforms);
        let vy_before = player.body.vel.y;
        apply_player_intent(&mut player, &press, &tuning, false);
        assert_eq!(jumps_used(&player), 2);
        assert_eq!(player.body.vel.y, vy_before);

        // Land and charges come back
        for _ in 0..200 {
            apply_player_intent(&mut player, &release, &tuning, false);
            step_body(&mut player, &platforms);
        }
        assert!(player.body.on_ground);
        assert_eq!(jumps_used(&player), 0);
    }

    #[test]
    fn test_locked_intent_ignores_movement() {
        let tuning = Tuning::default();
        let mut player = player_at(0.0, 0.0);
        let input = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        apply_player_intent(&mut player, &input, &tuning, true);
        assert_eq!(player.body.vel, Vec2::ZERO);
        // Key state still latched
        assert!(player.player_data().is_some_and(|p| p.jump_held));
    }

    proptest! {
        #[test]
        fn landing_snaps_exactly_to_top(
            top in -1000i32..1000,
            x in -50.0f32..50.0,
            sink in 0.0f32..4.0,
            vy in 0.0f32..12.0,
        ) {
            let top = top as f32;
            let platforms = vec![Platform::new(-200.0, top, 400.0, 40.0, SurfaceKind::Soil)];
            let mut slime = Entity::slime(5, Vec2::new(x, top - 24.0 + sink), 10.0);
            slime.body.vel.y = vy;
            step_body(&mut slime, &platforms);
            prop_assert_eq!(slime.body.vel.y, 0.0);
            prop_assert_eq!(slime.body.rect().bottom(), top);
            prop_assert!(slime.body.on_ground);
        }

        #[test]
        fn hazard_always_zeroes_health(health in 1.0f32..10_000.0, sink in 1.0f32..20.0) {
            let platforms = vec![Platform::new(-200.0, 0.0, 400.0, 40.0, SurfaceKind::HazardLiquid)];
            let mut slime = Entity::slime(5, Vec2::new(0.0, -24.0 + sink), health);
            step_body(&mut slime, &platforms);
            prop_assert_eq!(slime.body.health, 0.0);
            prop_assert!(slime.body.dead);
        }
    }
}
