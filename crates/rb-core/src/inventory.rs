//! Player inventory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single non-stackable item, tracked individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Unique instance identifier.
    pub id: Uuid,
    /// Catalog item this instance belongs to.
    pub item_id: String,
}

/// How an item is stored, taken from its catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemTraits {
    /// Identical units collapse into a count.
    pub stackable: bool,
    /// Weight of one unit.
    pub weight: f64,
}

impl Default for ItemTraits {
    fn default() -> Self {
        Self {
            stackable: true,
            weight: 0.0,
        }
    }
}

/// Items carried by the player.
///
/// Stackable items are counted; non-stackable items get one
/// [`ItemInstance`] per unit. Weight is derived from remembered unit weights
/// and the capacity is advisory: adding never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    stacks: BTreeMap<String, u32>,
    instances: Vec<ItemInstance>,
    unit_weights: BTreeMap<String, f64>,
    /// Advisory carry limit.
    pub max_weight: f64,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(50.0)
    }
}

impl Inventory {
    /// Create an empty inventory with the given advisory carry limit.
    pub fn with_capacity(max_weight: f64) -> Self {
        Self {
            stacks: BTreeMap::new(),
            instances: Vec::new(),
            unit_weights: BTreeMap::new(),
            max_weight,
        }
    }

    /// Units of an item held, stacked and individual combined.
    pub fn quantity(&self, item: &str) -> u32 {
        let stacked = self.stacks.get(item).copied().unwrap_or(0);
        let individual = self.instances.iter().filter(|i| i.item_id == item).count() as u32;
        stacked.saturating_add(individual)
    }

    /// Whether at least one unit is held.
    pub fn has(&self, item: &str) -> bool {
        self.quantity(item) > 0
    }

    /// Add units of an item.
    pub fn add(&mut self, item: &str, quantity: u32, traits: ItemTraits) {
        if quantity == 0 {
            return;
        }
        self.unit_weights.insert(item.to_string(), traits.weight);
        if traits.stackable {
            let stack = self.stacks.entry(item.to_string()).or_insert(0);
            *stack = stack.saturating_add(quantity);
        } else {
            for _ in 0..quantity {
                self.instances.push(ItemInstance {
                    id: Uuid::new_v4(),
                    item_id: item.to_string(),
                });
            }
        }
    }

    /// Remove units of an item.
    ///
    /// Returns `false` without changing anything when fewer than `quantity`
    /// units are held.
    pub fn remove(&mut self, item: &str, quantity: u32) -> bool {
        if self.quantity(item) < quantity {
            return false;
        }
        let mut remaining = quantity;

        if let Some(stack) = self.stacks.get_mut(item) {
            let taken = remaining.min(*stack);
            *stack -= taken;
            remaining -= taken;
            if *stack == 0 {
                self.stacks.remove(item);
            }
        }

        while remaining > 0 {
            match self.instances.iter().position(|i| i.item_id == item) {
                Some(pos) => {
                    self.instances.remove(pos);
                    remaining -= 1;
                }
                None => break,
            }
        }
        true
    }

    /// Individually tracked instances of an item.
    pub fn instances_of<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a ItemInstance> {
        self.instances.iter().filter(move |i| i.item_id == item)
    }

    /// Total carried weight.
    pub fn current_weight(&self) -> f64 {
        self.item_ids()
            .map(|id| {
                let unit = self.unit_weights.get(id).copied().unwrap_or(0.0);
                unit * f64::from(self.quantity(id))
            })
            .sum()
    }

    /// Whether the carried weight exceeds the advisory limit.
    pub fn is_overloaded(&self) -> bool {
        self.current_weight() > self.max_weight
    }

    /// Distinct item ids held, in sorted order.
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        let mut ids: Vec<&str> = self
            .stacks
            .keys()
            .map(String::as_str)
            .chain(self.instances.iter().map(|i| i.item_id.as_str()))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
    }
}
