//! Copper/silver/gold purse.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Copper pieces per silver piece, and silver pieces per gold piece.
pub const CARRY: u64 = 100;

/// A coin denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    /// Base unit.
    Copper,
    /// 100 copper.
    Silver,
    /// 100 silver.
    Gold,
}

impl CurrencyKind {
    /// Parse a denomination name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "copper" => Some(Self::Copper),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            _ => None,
        }
    }

    /// Value of one coin of this denomination in copper.
    pub fn copper_value(self) -> u64 {
        match self {
            Self::Copper => 1,
            Self::Silver => CARRY,
            Self::Gold => CARRY * CARRY,
        }
    }

    /// Lowercase name used in conditions and actions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Copper => "copper",
            Self::Silver => "silver",
            Self::Gold => "gold",
        }
    }
}

impl fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coins carried by the player.
///
/// Always kept normalized: after any mutation `copper < 100` and
/// `silver < 100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purse {
    /// Copper pieces (0-99 once normalized).
    pub copper: u64,
    /// Silver pieces (0-99 once normalized).
    pub silver: u64,
    /// Gold pieces.
    pub gold: u64,
}

impl Purse {
    /// Build a normalized purse holding `total` copper worth of coins.
    pub fn from_copper(total: u64) -> Self {
        Self {
            copper: total % CARRY,
            silver: (total / CARRY) % CARRY,
            gold: total / (CARRY * CARRY),
        }
    }

    /// Total value in copper.
    pub fn total_copper(&self) -> u64 {
        self.copper
            .saturating_add(self.silver.saturating_mul(CARRY))
            .saturating_add(self.gold.saturating_mul(CARRY * CARRY))
    }

    /// Coins of a single denomination.
    pub fn amount(&self, kind: CurrencyKind) -> u64 {
        match kind {
            CurrencyKind::Copper => self.copper,
            CurrencyKind::Silver => self.silver,
            CurrencyKind::Gold => self.gold,
        }
    }

    /// Add coins and carry overflow into the next denomination.
    pub fn add(&mut self, kind: CurrencyKind, amount: u64) {
        let total = self
            .total_copper()
            .saturating_add(amount.saturating_mul(kind.copper_value()));
        *self = Self::from_copper(total);
    }

    /// Whether the purse holds at least `copper` worth of coins.
    pub fn can_afford(&self, copper: u64) -> bool {
        self.total_copper() >= copper
    }

    /// Remove `copper` worth of coins, breaking larger coins as needed.
    ///
    /// Returns `false` and leaves the purse untouched if funds are short.
    pub fn remove(&mut self, copper: u64) -> bool {
        if !self.can_afford(copper) {
            return false;
        }
        *self = Self::from_copper(self.total_copper() - copper);
        true
    }
}

impl fmt::Display for Purse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}g {}s {}c", self.gold, self.silver, self.copper)
    }
}
