//! The aggregate world state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::character::{Character, Stat};
use crate::clock::GameClock;
use crate::config::EngineConfig;
use crate::currency::Purse;
use crate::diary::{Diary, DiaryKind};
use crate::flags::Flags;
use crate::inventory::Inventory;
use crate::job::Employment;
use crate::quest::{QuestLog, QuestRecord};
use crate::relationship::{Axis, Relationships};

/// Read-only access to world state, as seen by the condition evaluator.
///
/// [`WorldState`] is the production implementation; tests can implement
/// this on a small fixture instead of building a full state.
pub trait WorldView {
    /// Flag value, `false` when unset.
    fn flag(&self, name: &str) -> bool;
    /// Quest record, if the quest was ever started or completed.
    fn quest(&self, id: &str) -> Option<&QuestRecord>;
    /// Relationship value, 0 when there is no record.
    fn relationship(&self, npc: &str, axis: Axis) -> i32;
    /// Id of the job currently held.
    fn active_job(&self) -> Option<&str>;
    /// Whether a firing record exists for `job`.
    fn is_fired_from(&self, job: &str) -> bool;
    /// Units of an item carried.
    fn item_quantity(&self, item: &str) -> u32;
    /// Coins carried.
    fn purse(&self) -> Purse;
    /// Character stat.
    fn stat(&self, stat: Stat) -> i32;
    /// Current date and time.
    fn clock(&self) -> &GameClock;
}

/// Clock and location saved on entering a temporal instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalBackup {
    /// Clock before entering.
    pub clock: GameClock,
    /// Location before entering.
    pub location: Option<String>,
}

/// Progress of the current debt collection round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRound {
    /// Number of rounds already turned in.
    pub cycle: u32,
    collected: BTreeSet<String>,
    /// Copper collected this round and not yet turned in.
    pub carried_copper: u64,
}

impl DebtRound {
    /// Whether `npc` already paid this round.
    pub fn has_collected(&self, npc: &str) -> bool {
        self.collected.contains(npc)
    }

    /// Record a payment from `npc`.
    pub fn record(&mut self, npc: &str, copper: u64) {
        self.collected.insert(npc.to_string());
        self.carried_copper = self.carried_copper.saturating_add(copper);
    }

    /// Debtors collected from this round.
    pub fn collected(&self) -> impl Iterator<Item = &str> {
        self.collected.iter().map(String::as_str)
    }

    /// Close the round and start the next one. Returns the carried sum.
    pub fn settle(&mut self) -> u64 {
        self.collected.clear();
        self.cycle += 1;
        std::mem::take(&mut self.carried_copper)
    }
}

/// Everything that changes during play.
///
/// Each field is a namespace store with its own mutators; nothing outside a
/// store touches its internals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    /// `world_flags` namespace.
    pub flags: Flags,
    /// `quest` namespace.
    pub quests: QuestLog,
    /// `relationship` namespace.
    pub relationships: Relationships,
    /// `job` namespace.
    pub employment: Employment,
    /// `inventory` namespace and `has_item`.
    pub inventory: Inventory,
    /// `stats` and `currency` namespaces.
    pub character: Character,
    /// `time` namespace.
    pub clock: GameClock,
    /// NPCs the player has been introduced to.
    pub known_npcs: BTreeSet<String>,
    /// Narration log.
    pub diary: Diary,
    /// Current location id.
    pub location: Option<String>,
    /// Set while inside a temporal instance.
    pub temporal_backup: Option<TemporalBackup>,
    /// Debt collection progress.
    pub debt_round: DebtRound,
}

impl WorldState {
    /// A fresh game using the configured carry limit.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            inventory: Inventory::with_capacity(config.max_carry_weight),
            ..Self::default()
        }
    }

    /// Absolute in-game day.
    pub fn today(&self) -> i64 {
        self.clock.absolute_day()
    }

    /// Write a diary entry dated today.
    pub fn narrate(&mut self, kind: DiaryKind, text: impl Into<String>) {
        let day = self.today();
        self.diary.write(kind, text, day);
    }

    /// Whether the player has met `npc`.
    pub fn knows_npc(&self, npc: &str) -> bool {
        self.known_npcs.contains(npc)
    }

    /// Mark `npc` as met. Returns `true` if this is the first meeting.
    pub fn meet_npc(&mut self, npc: &str) -> bool {
        self.known_npcs.insert(npc.to_string())
    }

    /// Read a state snapshot from JSON.
    pub fn from_json(json: &str) -> crate::error::CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the state to pretty JSON.
    pub fn to_json(&self) -> crate::error::CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl WorldView for WorldState {
    fn flag(&self, name: &str) -> bool {
        self.flags.get(name)
    }

    fn quest(&self, id: &str) -> Option<&QuestRecord> {
        self.quests.get(id)
    }

    fn relationship(&self, npc: &str, axis: Axis) -> i32 {
        self.relationships.value(npc, axis)
    }

    fn active_job(&self) -> Option<&str> {
        self.employment.active().map(|j| j.job_id.as_str())
    }

    fn is_fired_from(&self, job: &str) -> bool {
        self.employment.is_fired(job)
    }

    fn item_quantity(&self, item: &str) -> u32 {
        self.inventory.quantity(item)
    }

    fn purse(&self) -> Purse {
        self.character.purse
    }

    fn stat(&self, stat: Stat) -> i32 {
        self.character.stat(stat)
    }

    fn clock(&self) -> &GameClock {
        &self.clock
    }
}
