//! Entity registry with spawn/despawn lifecycle
//!
//! The player is held apart from the other actors so systems can borrow the
//! player and the rest mutably at once (`split_mut`). Actors stay sorted by
//! id: ids are allocated monotonically and only appended.

use super::entity::{Entity, Physical};

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    player: Entity,
    actors: Vec<Entity>,
    next_id: u32,
}

impl EntityRegistry {
    /// Create a registry around the player. `make_player` receives the id.
    pub fn new(make_player: impl FnOnce(u32) -> Entity) -> Self {
        Self {
            player: make_player(1),
            actors: Vec::new(),
            next_id: 2,
        }
    }

    /// Allocate an id and insert the entity built from it
    pub fn spawn(&mut self, make: impl FnOnce(u32) -> Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.actors.push(make(id));
        id
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    /// Every non-player actor, in id order
    pub fn actors(&self) -> &[Entity] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Entity] {
        &mut self.actors
    }

    /// Borrow the player and all other actors mutably at once
    pub fn split_mut(&mut self) -> (&mut Entity, &mut [Entity]) {
        (&mut self.player, &mut self.actors)
    }

    /// Player first, then actors in id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        std::iter::once(&self.player).chain(self.actors.iter())
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        if id == self.player.id {
            return Some(&self.player);
        }
        self.actors
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.actors[i])
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        if id == self.player.id {
            return Some(&mut self.player);
        }
        match self.actors.binary_search_by_key(&id, |e| e.id) {
            Ok(i) => Some(&mut self.actors[i]),
            Err(_) => None,
        }
    }

    /// Total entities including the player
    pub fn len(&self) -> usize {
        self.actors.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Count live actors matching `pred`
    pub fn count_alive(&self, pred: impl Fn(&Entity) -> bool) -> usize {
        self.actors
            .iter()
            .filter(|e| !e.body().dead && pred(e))
            .count()
    }

    /// Remove dead non-chest actors. Returns how many were removed.
    ///
    /// Runs once at end of frame; the player is never removed.
    pub fn reap(&mut self) -> usize {
        let before = self.actors.len();
        self.actors.retain(|e| e.is_chest() || !e.body().dead);
        before - self.actors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::HeroKind;
    use glam::Vec2;

    fn mark_dead(reg: &mut EntityRegistry, id: u32) {
        if let Some(e) = reg.get_mut(id) {
            e.body.dead = true;
        }
    }

    fn registry() -> EntityRegistry {
        EntityRegistry::new(|id| Entity::player(id, Vec2::ZERO, HeroKind::Warrior, 100.0))
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut reg = registry();
        let a = reg.spawn(|id| Entity::slime(id, Vec2::ZERO, 10.0));
        let b = reg.spawn(|id| Entity::bat(id, Vec2::ZERO, 10.0));
        assert!(b > a && a > reg.player().id);
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get(b).map(|e| e.id), Some(b));
        assert!(reg.get(999).is_none());
    }

    #[test]
    fn test_reap_keeps_chests_and_player() {
        let mut reg = registry();
        let slime = reg.spawn(|id| Entity::slime(id, Vec2::ZERO, 10.0));
        let chest = reg.spawn(|id| Entity::chest(id, Vec2::ZERO));
        mark_dead(&mut reg, slime);
        mark_dead(&mut reg, chest);
        reg.player_mut().body.dead = true;

        assert_eq!(reg.reap(), 1);
        assert!(reg.get(slime).is_none());
        assert!(reg.get(chest).is_some());
        assert_eq!(reg.iter().count(), 2);
    }

    #[test]
    fn test_lookup_after_reap() {
        let mut reg = registry();
        let ids: Vec<u32> = (0..5)
            .map(|_| reg.spawn(|id| Entity::slime(id, Vec2::ZERO, 10.0)))
            .collect();
        mark_dead(&mut reg, ids[1]);
        reg.reap();
        assert_eq!(reg.get(ids[3]).map(|e| e.id), Some(ids[3]));
    }
}
