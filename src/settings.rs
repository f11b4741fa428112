//! Per-session settings and preferences
//!
//! Loaded from JSON; any missing field takes its default.

use serde::{Deserialize, Serialize};

use crate::consts::FRAMES_PER_SECOND;
use crate::input::KeyBindings;
use crate::sim::HeroKind;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Warrior (melee) or Mage (ranged)
    pub hero: HeroKind,
    /// Fixed seed for a reproducible session; random when absent
    pub seed: Option<u64>,
    /// Frame limit for headless runs
    pub max_frames: u64,
    pub bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hero: HeroKind::Warrior,
            seed: None,
            // Five minutes of play
            max_frames: FRAMES_PER_SECOND as u64 * 60 * 5,
            bindings: KeyBindings::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings file {}: {} - using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings file {}: {} - using defaults", path, e);
                Self::default()
            }
        }
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.hero, HeroKind::Warrior);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.max_frames, 18_000);
        assert!(!settings.bindings.is_empty());
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "hero": "Mage", "seed": 42 }"#).unwrap();
        assert_eq!(settings.hero, HeroKind::Mage);
        assert_eq!(settings.resolve_seed(), 42);
        assert_eq!(settings.bindings.lookup("j"), Some(Action::Attack));
    }

    #[test]
    fn test_custom_bindings_replace_defaults() {
        let settings = Settings::from_json(r#"{ "bindings": { "x": "Skill" } }"#).unwrap();
        assert_eq!(settings.bindings.lookup("x"), Some(Action::Skill));
        assert_eq!(settings.bindings.lookup("k"), None);
    }

    #[test]
    fn test_bad_file_falls_back() {
        assert_eq!(Settings::load("/no/such/settings.json"), Settings::default());
        assert!(Settings::from_json(r#"{ "hero": "Bard" }"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(9),
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
