//! Simulated actors
//!
//! Every actor shares a physical [`Body`]; kind-specific state lives in the
//! [`EntityKind`] variant. Physics and combat go through the [`Physical`] and
//! [`Damageable`] capabilities instead of matching on kind.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::HIT_FLASH_FRAMES;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that points along `dx` (keeps `self` when dx is zero)
    pub fn toward(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}

/// Player hero class, decides the skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeroKind {
    /// Melee: radial burst around the player
    #[default]
    Warrior,
    /// Ranged: blast centered in front of the player
    Mage,
}

/// Shared physical record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// May dip below zero before the death pass runs
    pub health: f32,
    pub max_health: f32,
    pub facing: Facing,
    /// Frames until the next attack is allowed
    pub attack_cooldown: u32,
    /// Cosmetic damage flash, frames remaining
    pub hit_flash: u32,
    pub dead: bool,
    /// Set by collision when resting on a platform this frame
    pub on_ground: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, health: f32) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            health,
            max_health: health,
            facing: Facing::Right,
            attack_cooldown: 0,
            hit_flash: 0,
            dead: false,
            on_ground: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Health as shown to the player
    #[inline]
    pub fn display_health(&self) -> f32 {
        self.health.max(0.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerData {
    pub hero: HeroKind,
    /// Airborne jump charges consumed since last landing (0..=2)
    pub jumps_used: u8,
    /// Jump key state last frame (edge detection)
    pub jump_held: bool,
    /// Potion key state last frame (edge detection)
    pub potion_held: bool,
    pub skill_cooldown: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RogueData {
    pub jump_cooldown: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChestData {
    pub opened: bool,
}

/// Kind tag plus per-kind state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player(PlayerData),
    Slime,
    Bat,
    Rogue(RogueData),
    Chest(ChestData),
}

impl EntityKind {
    /// Stable label for render snapshots and logs
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Player(_) => "player",
            EntityKind::Slime => "slime",
            EntityKind::Bat => "bat",
            EntityKind::Rogue(_) => "rogue",
            EntityKind::Chest(_) => "chest",
        }
    }
}

/// How an entity moves through the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Gravity, friction, platform collision
    Walker,
    /// No gravity; hover damping instead
    Flyer,
    /// Not simulated (chests)
    Static,
}

/// A simulated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub body: Body,
    pub kind: EntityKind,
}

/// Body dimensions per kind
pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
pub const SLIME_SIZE: Vec2 = Vec2::new(36.0, 24.0);
pub const BAT_SIZE: Vec2 = Vec2::new(28.0, 20.0);
pub const ROGUE_SIZE: Vec2 = Vec2::new(32.0, 48.0);
pub const CHEST_SIZE: Vec2 = Vec2::new(40.0, 30.0);

impl Entity {
    pub fn player(id: u32, pos: Vec2, hero: HeroKind, health: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, PLAYER_SIZE, health),
            kind: EntityKind::Player(PlayerData {
                hero,
                ..Default::default()
            }),
        }
    }

    pub fn slime(id: u32, pos: Vec2, health: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, SLIME_SIZE, health),
            kind: EntityKind::Slime,
        }
    }

    pub fn bat(id: u32, pos: Vec2, health: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, BAT_SIZE, health),
            kind: EntityKind::Bat,
        }
    }

    pub fn rogue(id: u32, pos: Vec2, health: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, ROGUE_SIZE, health),
            kind: EntityKind::Rogue(RogueData::default()),
        }
    }

    pub fn chest(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, CHEST_SIZE, 1.0),
            kind: EntityKind::Chest(ChestData::default()),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_rogue(&self) -> bool {
        matches!(self.kind, EntityKind::Rogue(_))
    }

    pub fn is_chest(&self) -> bool {
        matches!(self.kind, EntityKind::Chest(_))
    }

    /// Unopened chest
    pub fn is_searchable(&self) -> bool {
        matches!(&self.kind, EntityKind::Chest(c) if !c.opened)
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }
}

/// Capability: takes part in the physics step
pub trait Physical {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    fn motion(&self) -> Motion;

    /// Alive and moved by physics
    fn is_simulated(&self) -> bool {
        self.motion() != Motion::Static && !self.body().dead
    }

    /// Called after collision put the body on top of a platform
    fn on_land(&mut self) {}
}

/// Result of a damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Target was already dead or cannot be damaged
    Ignored,
    Wounded,
    /// This hit moved health from above zero to zero or below
    Killed,
}

/// Capability: can be hurt and killed
pub trait Damageable: Physical {
    /// Hostile to the player (valid target for player attacks)
    fn is_hostile(&self) -> bool;

    fn can_be_damaged(&self) -> bool;

    /// Subtract `damage`, flash, and add `knockback` to velocity
    fn take_hit(&mut self, damage: f32, knockback: Vec2) -> HitOutcome {
        if !self.can_be_damaged() || self.body().dead {
            return HitOutcome::Ignored;
        }
        let body = self.body_mut();
        let was_alive = body.health > 0.0;
        body.health -= damage;
        body.hit_flash = HIT_FLASH_FRAMES;
        body.vel += knockback;
        if was_alive && body.health <= 0.0 {
            body.dead = true;
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded
        }
    }
}

impl Physical for Entity {
    #[inline]
    fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn motion(&self) -> Motion {
        match self.kind {
            EntityKind::Bat => Motion::Flyer,
            EntityKind::Chest(_) => Motion::Static,
            _ => Motion::Walker,
        }
    }

    fn on_land(&mut self) {
        if let EntityKind::Player(data) = &mut self.kind {
            data.jumps_used = 0;
        }
    }
}

impl Damageable for Entity {
    fn is_hostile(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Slime | EntityKind::Bat | EntityKind::Rogue(_)
        )
    }

    fn can_be_damaged(&self) -> bool {
        !self.is_chest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_reported_once() {
        let mut rogue = Entity::rogue(1, Vec2::ZERO, 30.0);
        assert_eq!(rogue.take_hit(20.0, Vec2::ZERO), HitOutcome::Wounded);
        assert_eq!(rogue.take_hit(20.0, Vec2::ZERO), HitOutcome::Killed);
        assert!(rogue.body.dead);
        assert!(rogue.body.health < 0.0);
        assert_eq!(rogue.take_hit(20.0, Vec2::ZERO), HitOutcome::Ignored);
        assert_eq!(rogue.body.display_health(), 0.0);
    }

    #[test]
    fn test_chest_is_immune_and_static() {
        let mut chest = Entity::chest(2, Vec2::ZERO);
        assert_eq!(chest.take_hit(999.0, Vec2::X), HitOutcome::Ignored);
        assert!(!chest.body.dead);
        assert!(!chest.is_simulated());
        assert!(!chest.is_hostile());
        assert!(chest.is_searchable());
    }

    #[test]
    fn test_knockback_and_flash() {
        let mut slime = Entity::slime(3, Vec2::ZERO, 40.0);
        slime.take_hit(5.0, Vec2::new(8.0, -4.0));
        assert_eq!(slime.body.vel, Vec2::new(8.0, -4.0));
        assert_eq!(slime.body.hit_flash, HIT_FLASH_FRAMES);
    }

    #[test]
    fn test_motion_by_kind() {
        assert_eq!(Entity::bat(1, Vec2::ZERO, 1.0).motion(), Motion::Flyer);
        assert_eq!(Entity::slime(1, Vec2::ZERO, 1.0).motion(), Motion::Walker);
        assert_eq!(
            Entity::player(1, Vec2::ZERO, HeroKind::Mage, 1.0).motion(),
            Motion::Walker
        );
    }

    #[test]
    fn test_facing_toward() {
        assert_eq!(Facing::Right.toward(-2.0), Facing::Left);
        assert_eq!(Facing::Left.toward(0.0), Facing::Left);
        assert_eq!(Facing::Left.sign(), -1.0);
    }
}
