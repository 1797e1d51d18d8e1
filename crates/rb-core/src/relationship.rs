//! NPC relationship axes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lowest value any relationship axis can hold.
pub const MIN_BOND: i32 = -100;
/// Highest value any relationship axis can hold.
pub const MAX_BOND: i32 = 100;

/// A dimension of an NPC's feelings toward the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Always present; the default axis for `relationship.<npc>`.
    Friendship,
    /// Romantic interest.
    Love,
    /// Fear of the player.
    Fear,
    /// Willingness to follow orders.
    Obedience,
}

impl Axis {
    /// Parse an axis name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "friendship" => Some(Self::Friendship),
            "love" => Some(Self::Love),
            "fear" => Some(Self::Fear),
            "obedience" => Some(Self::Obedience),
            _ => None,
        }
    }

    /// Lowercase axis name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Friendship => "friendship",
            Self::Love => "love",
            Self::Fear => "fear",
            Self::Obedience => "obedience",
        }
    }
}

/// A clamped value on one axis.
///
/// Loaded bonds are clamped into range: `max` to `[MIN_BOND, MAX_BOND]`
/// and `value` to `[MIN_BOND, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BondFields")]
pub struct Bond {
    /// Current value.
    pub value: i32,
    /// Upper bound for `value`, at most [`MAX_BOND`].
    pub max: i32,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            value: 0,
            max: MAX_BOND,
        }
    }
}

impl Bond {
    fn set(&mut self, value: i32) -> i32 {
        self.max = self.max.clamp(MIN_BOND, MAX_BOND);
        self.value = value.clamp(MIN_BOND, self.max);
        self.value
    }
}

#[derive(Deserialize)]
struct BondFields {
    #[serde(default)]
    value: i32,
    #[serde(default = "default_max")]
    max: i32,
}

fn default_max() -> i32 {
    MAX_BOND
}

impl From<BondFields> for Bond {
    fn from(raw: BondFields) -> Self {
        let mut bond = Bond {
            value: 0,
            max: raw.max,
        };
        bond.set(raw.value);
        bond
    }
}

/// Everything one NPC feels about the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Friendship, always tracked.
    pub friendship: Bond,
    /// Love, tracked once touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub love: Option<Bond>,
    /// Fear, tracked once touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fear: Option<Bond>,
    /// Obedience, tracked once touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obedience: Option<Bond>,
}

impl Relationship {
    /// Value on an axis, 0 if the axis is untracked.
    pub fn value(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Friendship => self.friendship.value,
            Axis::Love => self.love.map_or(0, |b| b.value),
            Axis::Fear => self.fear.map_or(0, |b| b.value),
            Axis::Obedience => self.obedience.map_or(0, |b| b.value),
        }
    }

    fn bond_mut(&mut self, axis: Axis) -> &mut Bond {
        match axis {
            Axis::Friendship => &mut self.friendship,
            Axis::Love => self.love.get_or_insert_with(Bond::default),
            Axis::Fear => self.fear.get_or_insert_with(Bond::default),
            Axis::Obedience => self.obedience.get_or_insert_with(Bond::default),
        }
    }
}

/// Relationships with every NPC, created lazily on first update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationships {
    by_npc: BTreeMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty relationship table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the relationship with an NPC.
    pub fn get(&self, npc: &str) -> Option<&Relationship> {
        self.by_npc.get(npc)
    }

    /// Value on an axis; unknown NPCs read as 0.
    pub fn value(&self, npc: &str, axis: Axis) -> i32 {
        self.by_npc.get(npc).map_or(0, |r| r.value(axis))
    }

    /// Add `delta` to an axis and return the clamped result.
    pub fn adjust(&mut self, npc: &str, axis: Axis, delta: i32) -> i32 {
        let bond = self.by_npc.entry(npc.to_string()).or_default().bond_mut(axis);
        let target = bond.value.saturating_add(delta);
        bond.set(target)
    }

    /// Overwrite an axis and return the clamped result.
    pub fn set(&mut self, npc: &str, axis: Axis, value: i32) -> i32 {
        self.by_npc
            .entry(npc.to_string())
            .or_default()
            .bond_mut(axis)
            .set(value)
    }

    /// Iterate over all NPC relationships.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.by_npc.iter().map(|(k, v)| (k.as_str(), v))
    }
}
