//! The player character: attributes, vitals, and purse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::currency::Purse;
use crate::error::{CoreError, CoreResult};

/// A readable, modifiable character number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    /// Attribute, 1-10.
    Strength,
    /// Attribute, 1-10.
    Dexterity,
    /// Attribute, 1-10.
    Intelligence,
    /// Attribute, 1-10.
    Wisdom,
    /// Attribute, 1-10.
    Charisma,
    /// Vital, 0-100.
    Hp,
    /// Vital, 0-100.
    Energy,
    /// Vital, 0-100.
    Hunger,
}

impl Stat {
    /// Every stat, attributes first.
    pub const ALL: [Stat; 8] = [
        Stat::Strength,
        Stat::Dexterity,
        Stat::Intelligence,
        Stat::Wisdom,
        Stat::Charisma,
        Stat::Hp,
        Stat::Energy,
        Stat::Hunger,
    ];

    /// Parse a stat name.
    pub fn parse(s: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| CoreError::UnknownStat(s.to_string()))
    }

    /// Lowercase name used in conditions and actions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
            Self::Hp => "hp",
            Self::Energy => "energy",
            Self::Hunger => "hunger",
        }
    }

    /// Inclusive range the stat is clamped to.
    pub fn bounds(self) -> (i32, i32) {
        match self {
            Self::Hp | Self::Energy | Self::Hunger => (0, 100),
            _ => (1, 10),
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Physical power.
    pub strength: i32,
    /// Agility and hand skill.
    pub dexterity: i32,
    /// Reasoning and learning.
    pub intelligence: i32,
    /// Perception and judgement.
    pub wisdom: i32,
    /// Presence with other people.
    pub charisma: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 5,
            dexterity: 5,
            intelligence: 5,
            wisdom: 5,
            charisma: 5,
        }
    }
}

/// Bodily resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// Health; starts at 100.
    pub hp: i32,
    /// Stamina spent by work; starts at 100.
    pub energy: i32,
    /// Grows as the player goes without food; starts at 0.
    pub hunger: i32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hp: 100,
            energy: 100,
            hunger: 0,
        }
    }
}

/// The player character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    /// Display name.
    pub name: String,
    /// Attributes.
    pub attributes: Attributes,
    /// Vitals.
    pub vitals: Vitals,
    /// Coins carried.
    pub purse: Purse,
}

impl Character {
    /// Current value of a stat.
    pub fn stat(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.attributes.strength,
            Stat::Dexterity => self.attributes.dexterity,
            Stat::Intelligence => self.attributes.intelligence,
            Stat::Wisdom => self.attributes.wisdom,
            Stat::Charisma => self.attributes.charisma,
            Stat::Hp => self.vitals.hp,
            Stat::Energy => self.vitals.energy,
            Stat::Hunger => self.vitals.hunger,
        }
    }

    fn stat_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Strength => &mut self.attributes.strength,
            Stat::Dexterity => &mut self.attributes.dexterity,
            Stat::Intelligence => &mut self.attributes.intelligence,
            Stat::Wisdom => &mut self.attributes.wisdom,
            Stat::Charisma => &mut self.attributes.charisma,
            Stat::Hp => &mut self.vitals.hp,
            Stat::Energy => &mut self.vitals.energy,
            Stat::Hunger => &mut self.vitals.hunger,
        }
    }

    /// Overwrite a stat, clamped to its bounds. Returns the stored value.
    pub fn set_stat(&mut self, stat: Stat, value: i32) -> i32 {
        let (lo, hi) = stat.bounds();
        let slot = self.stat_mut(stat);
        *slot = value.clamp(lo, hi);
        *slot
    }

    /// Add `delta` to a stat, clamped to its bounds. Returns the stored value.
    pub fn modify_stat(&mut self, stat: Stat, delta: i32) -> i32 {
        let current = self.stat(stat);
        self.set_stat(stat, current.saturating_add(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown() {
        assert_eq!(Stat::parse("charisma").unwrap(), Stat::Charisma);
        assert!(matches!(Stat::parse("luck"), Err(CoreError::UnknownStat(_))));
    }

    #[test]
    fn attributes_clamp_one_to_ten() {
        let mut c = Character::default();
        assert_eq!(c.modify_stat(Stat::Strength, 20), 10);
        assert_eq!(c.modify_stat(Stat::Strength, -50), 1);
    }

    #[test]
    fn vitals_clamp_zero_to_hundred() {
        let mut c = Character::default();
        assert_eq!(c.modify_stat(Stat::Hunger, -5), 0);
        assert_eq!(c.set_stat(Stat::Energy, 140), 100);
    }
}
