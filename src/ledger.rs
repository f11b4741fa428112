//! Lifetime totals across sessions
//!
//! Owned by the orchestration layer, never by the simulation. Persisted to
//! LocalStorage on the web and to a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::sim::SessionOutcome;

/// Cumulative currency and kills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    /// Sum of extracted loot values
    pub lifetime_currency: u64,
    pub lifetime_kills: u64,
    pub sessions: u32,
    pub extractions: u32,
}

impl Ledger {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "delve_extract_ledger";

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished session in. Kills always count; currency only on success.
    pub fn record(&mut self, outcome: &SessionOutcome) {
        self.sessions += 1;
        self.lifetime_kills += outcome.kills as u64;
        if outcome.success {
            self.extractions += 1;
            self.lifetime_currency += outcome.loot_value;
        }
        log::info!(
            "Ledger: {} currency, {} kills over {} sessions",
            self.lifetime_currency,
            self.lifetime_kills,
            self.sessions
        );
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load the ledger from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(ledger) => return ledger,
                    Err(e) => log::warn!("Discarding unreadable ledger: {}", e),
                }
            }
        }
        Self::new()
    }

    /// Save the ledger to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let (Some(storage), Ok(json)) = (storage, self.to_json()) {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
        }
    }

    /// Load the ledger from a JSON file; missing or unreadable files start fresh
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &str) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            log::info!("No ledger at {}, starting fresh", path);
            return Self::new();
        };
        match Self::from_json(&json) {
            Ok(ledger) => ledger,
            Err(e) => {
                log::warn!("Invalid ledger file {}: {} - starting fresh", path, e);
                Self::new()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_file(&self, path: &str) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(success: bool, loot_value: u64, kills: u32) -> SessionOutcome {
        SessionOutcome {
            success,
            loot_value,
            kills,
        }
    }

    #[test]
    fn test_success_credits_currency_and_kills() {
        let mut ledger = Ledger::new();
        ledger.record(&outcome(true, 345, 2));
        assert_eq!(ledger.lifetime_currency, 345);
        assert_eq!(ledger.lifetime_kills, 2);
        assert_eq!(ledger.extractions, 1);
    }

    #[test]
    fn test_death_credits_kills_only() {
        let mut ledger = Ledger::new();
        ledger.record(&outcome(true, 100, 1));
        ledger.record(&outcome(false, 0, 4));
        assert_eq!(ledger.lifetime_currency, 100);
        assert_eq!(ledger.lifetime_kills, 5);
        assert_eq!(ledger.sessions, 2);
        assert_eq!(ledger.extractions, 1);
    }

    #[test]
    fn test_json_round_trip_and_partial() {
        let mut ledger = Ledger::new();
        ledger.record(&outcome(true, 50, 3));
        let parsed = Ledger::from_json(&ledger.to_json().unwrap()).unwrap();
        assert_eq!(parsed, ledger);

        let partial = Ledger::from_json(r#"{ "lifetime_kills": 7 }"#).unwrap();
        assert_eq!(partial.lifetime_kills, 7);
        assert_eq!(partial.lifetime_currency, 0);
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        assert_eq!(Ledger::load_file("/no/such/ledger.json"), Ledger::new());
    }
}
