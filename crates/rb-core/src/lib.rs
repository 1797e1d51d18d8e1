//! Core types for Riverbend: the world state store, content catalog, and
//! engine configuration.
//!
//! The store is an explicit value ([`WorldState`]) with one module per
//! namespace. Each namespace owns its data and exposes a narrow set of
//! mutators; readers go through the [`WorldView`] trait so the condition
//! evaluator can be driven by any state source, including test doubles.

/// Character attributes, vitals, and stats.
pub mod character;
/// Game clock with the fixed 30-day-month calendar.
pub mod clock;
/// Engine configuration (costs, cooldowns, item ids).
pub mod config;
/// Static content documents: quests, jobs, items, NPCs, dialogues, locations.
pub mod content;
/// Copper/silver/gold purse with base-100 carry.
pub mod currency;
/// Player-facing diary of narrated events.
pub mod diary;
/// Error types used throughout the crate.
pub mod error;
/// Boolean world flags.
pub mod flags;
/// Inventory of stackable items and distinct item instances.
pub mod inventory;
/// Active job and firing history.
pub mod job;
/// Quest records and stage progression.
pub mod quest;
/// NPC relationship axes.
pub mod relationship;
/// The aggregate world state and its read-only view trait.
pub mod state;

pub use character::{Character, Stat};
pub use clock::{DayPeriod, GameClock, Season, Weekday};
pub use config::EngineConfig;
pub use content::Content;
pub use currency::{CurrencyKind, Purse};
pub use diary::{Diary, DiaryEntry, DiaryKind};
pub use error::{CoreError, CoreResult};
pub use flags::Flags;
pub use inventory::Inventory;
pub use job::{ActiveJob, Employment, FiredJob};
pub use quest::{QuestLog, QuestProgress, QuestRecord};
pub use relationship::{Axis, Bond, Relationship, Relationships};
pub use state::{DebtRound, TemporalBackup, WorldState, WorldView};
