//! Error types for the world state store and content loading.

use thiserror::Error;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by namespace mutators and content loading.
///
/// Mutators return these instead of panicking so the action executor can
/// decide whether a refusal is a silent no-op or a narrated one.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A quest was started while it is already running.
    #[error("quest already active: {0}")]
    QuestAlreadyActive(String),

    /// A quest was started after it was completed.
    #[error("quest already completed: {0}")]
    QuestAlreadyCompleted(String),

    /// A quest operation referenced a quest with no record.
    #[error("quest not started: {0}")]
    QuestNotStarted(String),

    /// A stage change would move a quest backwards.
    #[error("quest {quest} cannot move from stage {current} back to {requested}")]
    StageRegression {
        /// Quest identifier.
        quest: String,
        /// Stage the quest is currently at.
        current: u32,
        /// Stage that was requested.
        requested: u32,
    },

    /// The player already holds a job.
    #[error("already employed as {0}")]
    AlreadyEmployed(String),

    /// The player was fired from this job and the cooldown has not elapsed.
    #[error("cannot be rehired as {job} before day {until}")]
    RehireCooldown {
        /// Job identifier.
        job: String,
        /// First absolute day on which rehiring is allowed.
        until: i64,
    },

    /// The player holds no job.
    #[error("not employed")]
    NotEmployed,

    /// The player does not hold the named job.
    #[error("not employed as {0}")]
    NotEmployedAt(String),

    /// A currency name did not match copper, silver, or gold.
    #[error("unknown currency: {0}")]
    InvalidCurrency(String),

    /// A stat name did not match any attribute or vital.
    #[error("unknown stat: {0}")]
    UnknownStat(String),

    /// Content could not be read from disk.
    #[error("cannot read content: {0}")]
    Io(#[from] std::io::Error),

    /// Content or state JSON was malformed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
