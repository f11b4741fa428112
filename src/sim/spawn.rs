//! Population: initial spawn and timed rogue waves

use glam::Vec2;
use rand::Rng;

use super::entity::{BAT_SIZE, CHEST_SIZE, Entity, ROGUE_SIZE, SLIME_SIZE};
use super::registry::EntityRegistry;
use super::world::{Platform, World};
use crate::tuning::Tuning;

/// Height bats hover above their spawn platform
const BAT_HOVER_HEIGHT: f32 = 120.0;

/// Random standing position on top of `platform` for a body of `size`
pub fn position_on<R: Rng>(platform: &Platform, size: Vec2, rng: &mut R) -> Vec2 {
    let rect = &platform.rect;
    let span = (rect.size.x - size.x).max(0.0);
    let x = if span > 0.0 {
        rect.left() + rng.random_range(0.0..span)
    } else {
        rect.center().x - size.x / 2.0
    };
    Vec2::new(x, rect.top() - size.y)
}

fn pick<'w, R: Rng>(world: &'w World, rng: &mut R, from: &[usize]) -> &'w Platform {
    &world.platforms[from[rng.random_range(0..from.len())]]
}

/// Spawn chests, slimes and bats. Hostiles never start on the player's platform.
pub fn spawn_initial<R: Rng>(registry: &mut EntityRegistry, world: &World, rng: &mut R, tuning: &Tuning) {
    let sites = world.spawnable();
    if sites.is_empty() {
        log::warn!("No spawnable platforms, world left empty");
        return;
    }
    let hostile_sites: Vec<usize> = sites.iter().copied().filter(|&i| i != world.start).collect();
    let hostile_sites = if hostile_sites.is_empty() { sites.clone() } else { hostile_sites };

    for _ in 0..tuning.chest_count {
        let platform = pick(world, rng, &sites);
        let pos = position_on(platform, CHEST_SIZE, rng);
        registry.spawn(|id| Entity::chest(id, pos));
    }
    for _ in 0..tuning.slime_count {
        let platform = pick(world, rng, &hostile_sites);
        let pos = position_on(platform, SLIME_SIZE, rng);
        registry.spawn(|id| Entity::slime(id, pos, tuning.slime_health));
    }
    for _ in 0..tuning.bat_count {
        let platform = pick(world, rng, &hostile_sites);
        let pos = position_on(platform, BAT_SIZE, rng) - Vec2::new(0.0, BAT_HOVER_HEIGHT);
        registry.spawn(|id| Entity::bat(id, pos, tuning.bat_health));
    }

    log::debug!(
        "Spawned {} chests, {} slimes, {} bats",
        tuning.chest_count,
        tuning.slime_count,
        tuning.bat_count
    );
}

/// Spawn a rogue wave away from the player, respecting the live-rogue cap.
/// Returns how many rogues were spawned.
pub fn spawn_rogue_wave<R: Rng>(
    registry: &mut EntityRegistry,
    world: &World,
    rng: &mut R,
    tuning: &Tuning,
    player_center: Vec2,
) -> usize {
    let alive = registry.count_alive(|e| e.is_rogue());
    let room = tuning.max_rogues.saturating_sub(alive);
    let count = tuning.rogue_wave_size.min(room);
    if count == 0 {
        return 0;
    }

    let sites: Vec<usize> = world
        .spawnable()
        .into_iter()
        .filter(|&i| world.platforms[i].rect.center().distance(player_center) >= tuning.rogue_min_spawn_distance)
        .collect();
    if sites.is_empty() {
        log::debug!("No rogue spawn site far enough from the player");
        return 0;
    }

    for _ in 0..count {
        let platform = pick(world, rng, &sites);
        let pos = position_on(platform, ROGUE_SIZE, rng);
        let id = registry.spawn(|id| Entity::rogue(id, pos, tuning.rogue_health));
        log::debug!("Rogue {} spawned at ({:.0}, {:.0})", id, pos.x, pos.y);
    }
    count
}
