//! Loot generation and the player's inventory

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rarity tier, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Display color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            Rarity::Common => 0xB0B0B0,
            Rarity::Epic => 0xA335EE,
            Rarity::Legendary => 0xFF8000,
            Rarity::Mythic => 0xFF3355,
        }
    }

    /// Value range `[min, max)`
    pub fn value_range(&self) -> (u32, u32) {
        match self {
            Rarity::Common => (1, 20),
            Rarity::Epic => (20, 120),
            Rarity::Legendary => (120, 500),
            Rarity::Mythic => (500, 1500),
        }
    }
}

/// Cumulative upper bounds of the tier roll (last must be 1.0)
pub const RARITY_THRESHOLDS: [(f64, Rarity); 4] = [
    (0.60, Rarity::Common),
    (0.88, Rarity::Epic),
    (0.98, Rarity::Legendary),
    (1.00, Rarity::Mythic),
];

const FLAVOR_NAMES: [&str; 10] = [
    "Idol",
    "Chalice",
    "Amulet",
    "Coin Purse",
    "Relic Blade",
    "Gem Cluster",
    "Sigil Ring",
    "Crown Shard",
    "Rune Tablet",
    "Star Map",
];

/// A looted item; immutable once generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub rarity: Rarity,
    pub name: String,
    pub value: u32,
    pub color: u32,
}

impl Item {
    pub fn new(rarity: Rarity, name: impl Into<String>, value: u32) -> Self {
        Self {
            rarity,
            name: name.into(),
            value,
            color: rarity.color(),
        }
    }
}

/// Result of opening a container
#[derive(Debug, Clone, PartialEq)]
pub struct LootDrop {
    pub item: Item,
    /// Also found a heal potion
    pub potion: bool,
}

/// Map a uniform roll in `[0, 1)` to a tier
pub fn rarity_for_roll(roll: f64) -> Rarity {
    RARITY_THRESHOLDS
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map(|(_, rarity)| *rarity)
        .unwrap_or(Rarity::Mythic)
}

/// Draw one item: tier, then value within the tier, then an independent name
pub fn roll_item<R: Rng>(rng: &mut R) -> Item {
    let rarity = rarity_for_roll(rng.random::<f64>());
    let (min, max) = rarity.value_range();
    let value = rng.random_range(min..max);
    let flavor = FLAVOR_NAMES[rng.random_range(0..FLAVOR_NAMES.len())];
    Item::new(rarity, format!("{} {}", rarity.as_str(), flavor), value)
}

/// Draw a full container drop (item plus independent potion check)
pub fn roll_drop<R: Rng>(rng: &mut R, potion_chance: f64) -> LootDrop {
    let item = roll_item(rng);
    let potion = rng.random_bool(potion_chance.clamp(0.0, 1.0));
    LootDrop { item, potion }
}

/// Fixed-capacity item storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    slots: usize,
}

impl Inventory {
    pub fn new(slots: usize) -> Self {
        Self {
            items: Vec::with_capacity(slots),
            slots,
        }
    }

    /// Store an item. Returns false (item dropped) when full.
    pub fn add(&mut self, item: Item) -> bool {
        if self.is_full() {
            log::debug!("Inventory full, dropping {}", item.name);
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.slots
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn total_value(&self) -> u64 {
        self.items.iter().map(|i| i.value as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(rarity_for_roll(0.0), Rarity::Common);
        assert_eq!(rarity_for_roll(0.5999), Rarity::Common);
        assert_eq!(rarity_for_roll(0.60), Rarity::Epic);
        assert_eq!(rarity_for_roll(0.88), Rarity::Legendary);
        assert_eq!(rarity_for_roll(0.98), Rarity::Mythic);
        assert_eq!(rarity_for_roll(0.99999), Rarity::Mythic);
    }

    #[test]
    fn test_empirical_frequencies() {
        let mut rng = Pcg32::seed_from_u64(7);
        let n = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..n {
            let item = roll_item(&mut rng);
            counts[item.rarity as usize] += 1;
        }
        let freq = |c: usize| c as f64 / n as f64;
        assert!((freq(counts[0]) - 0.60).abs() < 0.01);
        assert!((freq(counts[1]) - 0.28).abs() < 0.01);
        assert!((freq(counts[2]) - 0.10).abs() < 0.01);
        assert!((freq(counts[3]) - 0.02).abs() < 0.005);
        // Mythic is strictly the rarest
        assert!(counts[3] < counts[2] && counts[3] < counts[1] && counts[3] < counts[0]);
    }

    #[test]
    fn test_inventory_drops_when_full() {
        let mut inv = Inventory::new(2);
        assert!(inv.add(Item::new(Rarity::Common, "a", 5)));
        assert!(inv.add(Item::new(Rarity::Epic, "b", 40)));
        assert!(!inv.add(Item::new(Rarity::Mythic, "c", 900)));
        assert_eq!(inv.items().len(), 2);
        assert_eq!(inv.total_value(), 45);
    }

    #[test]
    fn test_potion_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(roll_drop(&mut rng, 1.0).potion);
        assert!(!roll_drop(&mut rng, 0.0).potion);
        // Out-of-range chances are clamped rather than panicking
        assert!(roll_drop(&mut rng, 5.0).potion);
    }

    proptest! {
        #[test]
        fn value_within_tier_range(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let item = roll_item(&mut rng);
            let (min, max) = item.rarity.value_range();
            prop_assert!(item.value >= min && item.value < max);
            prop_assert!(item.name.starts_with(item.rarity.as_str()));
            prop_assert_eq!(item.color, item.rarity.color());
        }
    }
}
