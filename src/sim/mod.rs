//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One frame per `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod combat;
pub mod effects;
pub mod entity;
pub mod extraction;
pub mod geom;
pub mod interaction;
pub mod loot;
pub mod physics;
pub mod registry;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use entity::{Damageable, Entity, EntityKind, Facing, HeroKind, Physical};
pub use extraction::ExtractionPhase;
pub use geom::{Rect, center_distance, intersects};
pub use loot::{Inventory, Item, Rarity};
pub use snapshot::RenderSnapshot;
pub use state::{GameState, SessionOutcome};
pub use tick::{TickInput, tick};
pub use world::{Platform, SurfaceKind, World, generate_world};
