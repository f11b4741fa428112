//! Data-driven game balance
//!
//! Every number a designer would tweak lives here. Frame-based: cooldowns and
//! timers count simulation frames, speeds are pixels per frame.

use serde::{Deserialize, Serialize};

/// Combat and movement balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_health: f32,
    pub player_accel: f32,
    pub player_max_speed: f32,
    pub jump_impulse: f32,
    pub max_jumps: u8,

    // === Basic attack ===
    pub attack_cooldown: u32,
    pub attack_damage: f32,
    /// Hitbox reach in front of the player
    pub attack_reach: f32,
    pub attack_knockback_x: f32,
    pub attack_knockback_y: f32,

    // === Skill ===
    pub skill_cooldown: u32,
    pub warrior_skill_radius: f32,
    pub warrior_skill_damage: f32,
    pub warrior_knockback_x: f32,
    pub warrior_knockback_y: f32,
    /// Distance from the player to the Mage blast center
    pub mage_skill_offset: f32,
    pub mage_skill_radius: f32,
    pub mage_skill_damage: f32,
    pub mage_lift: f32,

    // === Hostiles ===
    pub aggro_radius: f32,
    pub slime_health: f32,
    pub slime_accel: f32,
    /// Damage per frame while touching the player
    pub slime_contact_damage: f32,
    pub bat_health: f32,
    pub bat_accel: f32,
    pub rogue_health: f32,
    pub rogue_accel: f32,
    pub rogue_max_speed: f32,
    /// Retreat speed as a fraction of max speed
    pub rogue_retreat_factor: f32,
    pub rogue_kite_range: f32,
    pub rogue_melee_range: f32,
    pub rogue_attack_damage: f32,
    pub rogue_attack_cooldown: u32,
    pub rogue_knockback_x: f32,
    pub rogue_knockback_y: f32,
    pub rogue_jump_impulse: f32,
    pub rogue_jump_cooldown: u32,
    /// Player this far above the rogue triggers a jump
    pub rogue_climb_trigger: f32,
    /// Horizontal speed under which the rogue counts as stuck
    pub rogue_stuck_speed: f32,
    /// Must still be this far from the player horizontally to count as stuck
    pub rogue_stuck_distance: f32,

    // === Spawning ===
    pub chest_count: usize,
    pub slime_count: usize,
    pub bat_count: usize,
    pub rogue_wave_interval: u64,
    pub rogue_wave_size: usize,
    pub max_rogues: usize,
    pub rogue_min_spawn_distance: f32,

    // === Interaction / loot ===
    pub search_radius: f32,
    pub search_duration: u32,
    pub inventory_slots: usize,
    pub potion_chance: f64,
    pub potion_heal: f32,
    pub starting_potions: u32,

    // === Extraction ===
    /// Frame at which the extraction zone opens
    pub extraction_start_frame: u64,
    /// Frames the player must stay in the zone
    pub extraction_dwell: u32,
    pub extraction_zone_size: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_health: 100.0,
            player_accel: 1.2,
            player_max_speed: 6.0,
            jump_impulse: -12.0,
            max_jumps: 2,

            attack_cooldown: 20,
            attack_damage: 20.0,
            attack_reach: 70.0,
            attack_knockback_x: 8.0,
            attack_knockback_y: -4.0,

            skill_cooldown: 240,
            warrior_skill_radius: 160.0,
            warrior_skill_damage: 40.0,
            warrior_knockback_x: 12.0,
            warrior_knockback_y: -6.0,
            mage_skill_offset: 140.0,
            mage_skill_radius: 110.0,
            mage_skill_damage: 60.0,
            mage_lift: -10.0,

            aggro_radius: 600.0,
            slime_health: 40.0,
            slime_accel: 0.25,
            slime_contact_damage: 0.5,
            bat_health: 25.0,
            bat_accel: 0.35,
            rogue_health: 120.0,
            rogue_accel: 0.5,
            rogue_max_speed: 4.5,
            rogue_retreat_factor: 0.5,
            rogue_kite_range: 140.0,
            rogue_melee_range: 45.0,
            rogue_attack_damage: 12.0,
            rogue_attack_cooldown: 60,
            rogue_knockback_x: 9.0,
            rogue_knockback_y: -5.0,
            rogue_jump_impulse: -13.0,
            rogue_jump_cooldown: 70,
            rogue_climb_trigger: 90.0,
            rogue_stuck_speed: 0.3,
            rogue_stuck_distance: 60.0,

            chest_count: 12,
            slime_count: 14,
            bat_count: 10,
            rogue_wave_interval: 1200,
            rogue_wave_size: 2,
            max_rogues: 6,
            rogue_min_spawn_distance: 800.0,

            search_radius: 90.0,
            search_duration: 90,
            inventory_slots: 6,
            potion_chance: 0.35,
            potion_heal: 40.0,
            starting_potions: 1,

            extraction_start_frame: 60 * 60,
            extraction_dwell: 180,
            extraction_zone_size: 120.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {} - using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {} - using defaults", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "attack_damage": 35.0, "max_rogues": 2 }"#).unwrap();
        assert_eq!(tuning.attack_damage, 35.0);
        assert_eq!(tuning.max_rogues, 2);
        assert_eq!(tuning.rogue_health, Tuning::default().rogue_health);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load("/definitely/not/here.json");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_skill_damage_ordering() {
        let t = Tuning::default();
        assert!(t.warrior_skill_damage > t.attack_damage);
        assert!(t.mage_skill_damage > t.warrior_skill_damage);
        assert!(t.skill_cooldown > t.attack_cooldown);
    }
}
