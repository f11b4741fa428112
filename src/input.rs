//! Logical input: actions, key bindings and the per-frame latch
//!
//! Hosts feed raw key names in as they arrive; the simulation samples the
//! latch exactly once per frame. Accept/discard are one-shot signals that
//! are consumed by the sample that reads them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Recognized logical actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    Skill,
    UsePotion,
    Search,
    AcceptLoot,
    DiscardLoot,
}

impl Action {
    /// Fires once per press instead of being held
    pub fn is_one_shot(self) -> bool {
        matches!(self, Action::AcceptLoot | Action::DiscardLoot)
    }
}

/// Key name (as reported by the host, e.g. `KeyboardEvent.key`) to action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("arrowleft", Action::MoveLeft),
            ("a", Action::MoveLeft),
            ("arrowright", Action::MoveRight),
            ("d", Action::MoveRight),
            ("arrowup", Action::Jump),
            ("w", Action::Jump),
            (" ", Action::Jump),
            ("j", Action::Attack),
            ("k", Action::Skill),
            ("q", Action::UsePotion),
            ("e", Action::Search),
            ("enter", Action::AcceptLoot),
            ("y", Action::AcceptLoot),
            ("backspace", Action::DiscardLoot),
            ("n", Action::DiscardLoot),
        ];
        Self {
            map: pairs
                .into_iter()
                .map(|(key, action)| (key.to_string(), action))
                .collect(),
        }
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Bind `key` (case-insensitive), replacing any previous binding for it
    pub fn bind(&mut self, key: &str, action: Action) {
        self.map.insert(key.to_lowercase(), action);
    }

    /// Action bound to `key`, if any. Lookup is case-insensitive.
    pub fn lookup(&self, key: &str) -> Option<Action> {
        self.map
            .get(key)
            .or_else(|| self.map.get(&key.to_lowercase()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Latched key state between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    held: BTreeSet<Action>,
    accept: bool,
    discard: bool,
}

impl InputLatch {
    pub fn press(&mut self, action: Action) {
        match action {
            Action::AcceptLoot => self.accept = true,
            Action::DiscardLoot => self.discard = true,
            _ => {
                self.held.insert(action);
            }
        }
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    /// Route a raw key press. Returns true if the key is bound.
    pub fn key_down(&mut self, bindings: &KeyBindings, key: &str) -> bool {
        match bindings.lookup(key) {
            Some(action) => {
                self.press(action);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, bindings: &KeyBindings, key: &str) -> bool {
        match bindings.lookup(key) {
            Some(action) => {
                self.release(action);
                true
            }
            None => false,
        }
    }

    /// Drop every held key (e.g. when the host loses focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Build this frame's input, consuming pending one-shots
    pub fn sample(&mut self) -> TickInput {
        let input = TickInput {
            left: self.is_held(Action::MoveLeft),
            right: self.is_held(Action::MoveRight),
            jump: self.is_held(Action::Jump),
            attack: self.is_held(Action::Attack),
            skill: self.is_held(Action::Skill),
            potion: self.is_held(Action::UsePotion),
            search: self.is_held(Action::Search),
            accept_loot: self.accept,
            discard_loot: self.discard,
        };
        self.accept = false;
        self.discard = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_case_insensitive() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.lookup("ArrowLeft"), Some(Action::MoveLeft));
        assert_eq!(bindings.lookup("D"), Some(Action::MoveRight));
        assert_eq!(bindings.lookup(" "), Some(Action::Jump));
        assert_eq!(bindings.lookup("F12"), None);
    }

    #[test]
    fn test_held_keys_persist_across_samples() {
        let bindings = KeyBindings::default();
        let mut latch = InputLatch::default();
        assert!(latch.key_down(&bindings, "a"));
        assert!(latch.sample().left);
        assert!(latch.sample().left);
        latch.key_up(&bindings, "a");
        assert!(!latch.sample().left);
    }

    #[test]
    fn test_loot_decisions_are_one_shot() {
        let bindings = KeyBindings::default();
        let mut latch = InputLatch::default();
        latch.key_down(&bindings, "Enter");
        let first = latch.sample();
        assert!(first.accept_loot);
        assert!(!first.discard_loot);
        assert!(!latch.sample().accept_loot);
        assert!(Action::DiscardLoot.is_one_shot());
    }

    #[test]
    fn test_custom_binding_round_trips_json() {
        let mut bindings = KeyBindings::empty();
        bindings.bind("Z", Action::Attack);
        let json = serde_json::to_string(&bindings).unwrap();
        assert_eq!(json, r#"{"z":"Attack"}"#);
        let parsed: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.lookup("z"), Some(Action::Attack));
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut latch = InputLatch::default();
        latch.press(Action::MoveRight);
        latch.press(Action::Search);
        latch.clear();
        assert_eq!(latch.sample(), TickInput::default());
    }
}
