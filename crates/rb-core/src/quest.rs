//! Quest records and stage progression.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Progress of a single quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    /// The quest is running.
    pub active: bool,
    /// The quest has finished.
    pub completed: bool,
    /// Index of the current stage. Never decreases.
    pub current_stage: u32,
    /// Number of stages in the quest definition.
    pub stage_count: u32,
}

/// Result of a stage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestProgress {
    /// Stage after the change.
    pub stage: u32,
    /// The change moved the quest into the completed state.
    pub completed_now: bool,
}

/// All quest records, keyed by quest id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestLog {
    quests: BTreeMap<String, QuestRecord>,
}

impl QuestLog {
    /// Create an empty quest log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a quest record.
    pub fn get(&self, id: &str) -> Option<&QuestRecord> {
        self.quests.get(id)
    }

    /// Iterate over all quest records.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuestRecord)> {
        self.quests.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Start a quest at stage 0.
    pub fn start(&mut self, id: &str, stage_count: u32) -> CoreResult<()> {
        if let Some(existing) = self.quests.get(id) {
            if existing.completed {
                return Err(CoreError::QuestAlreadyCompleted(id.to_string()));
            }
            if existing.active {
                return Err(CoreError::QuestAlreadyActive(id.to_string()));
            }
        }
        self.quests.insert(
            id.to_string(),
            QuestRecord {
                active: true,
                completed: false,
                current_stage: 0,
                stage_count,
            },
        );
        Ok(())
    }

    /// Move a quest forward one stage.
    pub fn advance(&mut self, id: &str) -> CoreResult<QuestProgress> {
        let current = self
            .quests
            .get(id)
            .map(|q| q.current_stage)
            .ok_or_else(|| CoreError::QuestNotStarted(id.to_string()))?;
        self.set_stage(id, current.saturating_add(1))
    }

    /// Raise a quest to `stage`, clamped to the stage count.
    ///
    /// Reaching the stage count completes the quest. Requests below the
    /// current stage are refused.
    pub fn set_stage(&mut self, id: &str, stage: u32) -> CoreResult<QuestProgress> {
        let record = self
            .quests
            .get_mut(id)
            .ok_or_else(|| CoreError::QuestNotStarted(id.to_string()))?;

        if stage < record.current_stage {
            return Err(CoreError::StageRegression {
                quest: id.to_string(),
                current: record.current_stage,
                requested: stage,
            });
        }

        record.current_stage = stage.min(record.stage_count);
        let completed_now = record.current_stage == record.stage_count && !record.completed;
        if completed_now {
            record.completed = true;
            record.active = false;
        }

        Ok(QuestProgress {
            stage: record.current_stage,
            completed_now,
        })
    }

    /// Mark a quest completed, creating the record if it was never started.
    ///
    /// Returns `false` if the quest was already completed.
    pub fn complete(&mut self, id: &str, stage_count: u32) -> bool {
        let record = self.quests.entry(id.to_string()).or_insert(QuestRecord {
            stage_count,
            ..QuestRecord::default()
        });
        if record.completed {
            return false;
        }
        record.active = false;
        record.completed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn start_creates_active_record() {
        let mut log = QuestLog::new();
        log.start("q1", 3).unwrap();
        let q = log.get("q1").unwrap();
        assert!(q.active);
        assert!(!q.completed);
        assert_eq!(q.current_stage, 0);
    }

    #[test]
    fn start_twice_is_refused() {
        let mut log = QuestLog::new();
        log.start("q1", 3).unwrap();
        assert!(matches!(
            log.start("q1", 3),
            Err(CoreError::QuestAlreadyActive(_))
        ));
    }

    #[test]
    fn start_after_completion_is_refused() {
        let mut log = QuestLog::new();
        log.start("q1", 1).unwrap();
        log.advance("q1").unwrap();
        assert!(matches!(
            log.start("q1", 1),
            Err(CoreError::QuestAlreadyCompleted(_))
        ));
    }

    #[test]
    fn advance_clamps_and_completes() {
        let mut log = QuestLog::new();
        log.start("q1", 2).unwrap();
        assert_eq!(log.advance("q1").unwrap().stage, 1);
        let last = log.advance("q1").unwrap();
        assert_eq!(last.stage, 2);
        assert!(last.completed_now);

        let again = log.advance("q1").unwrap();
        assert_eq!(again.stage, 2);
        assert!(!again.completed_now);

        let q = log.get("q1").unwrap();
        assert!(q.completed);
        assert!(!q.active);
    }

    #[test]
    fn advance_missing_quest_fails() {
        let mut log = QuestLog::new();
        assert!(matches!(
            log.advance("nope"),
            Err(CoreError::QuestNotStarted(_))
        ));
    }

    #[test]
    fn set_stage_refuses_regression() {
        let mut log = QuestLog::new();
        log.start("q1", 5).unwrap();
        log.set_stage("q1", 3).unwrap();
        assert!(matches!(
            log.set_stage("q1", 1),
            Err(CoreError::StageRegression { current: 3, .. })
        ));
        assert_eq!(log.get("q1").unwrap().current_stage, 3);
    }

    #[test]
    fn complete_without_start_creates_record() {
        let mut log = QuestLog::new();
        assert!(log.complete("q9", 4));
        assert!(log.get("q9").unwrap().completed);
        assert!(!log.complete("q9", 4));
    }

    proptest! {
        #[test]
        fn stage_never_decreases(stage_count in 0u32..8, ops in proptest::collection::vec(proptest::option::of(0u32..12), 0..30)) {
            let mut log = QuestLog::new();
            log.start("q", stage_count).unwrap();
            let mut last = 0;
            for op in ops {
                let _ = match op {
                    Some(stage) => log.set_stage("q", stage),
                    None => log.advance("q"),
                };
                let record = log.get("q").unwrap();
                prop_assert!(record.current_stage >= last);
                prop_assert!(record.current_stage <= stage_count);
                prop_assert_eq!(record.completed, record.current_stage == stage_count);
                last = record.current_stage;
            }
        }
    }
}
