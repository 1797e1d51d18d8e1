//! Employment: the active job and firing history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Performance score a new hire starts with.
pub const STARTING_PERFORMANCE: i32 = 50;

/// The job the player currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveJob {
    /// Job identifier.
    pub job_id: String,
    /// Performance score, 0-100.
    pub performance: i32,
    /// Shifts completed.
    pub days_worked: u32,
    /// Absolute day of hire.
    pub hired_on: i64,
    /// Shifts skipped.
    pub missed_days: u32,
    /// Shifts started late.
    pub late_days: u32,
    /// Copper added to every wage.
    pub pay_bonus: u64,
}

/// Why and until when the player cannot return to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredJob {
    /// Reason given on dismissal.
    pub reason: String,
    /// First absolute day on which the job may be taken again.
    pub rehired_from: i64,
}

/// Employment namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employment {
    active: Option<ActiveJob>,
    fired: BTreeMap<String, FiredJob>,
}

impl Employment {
    /// Create an unemployed record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently held job, if any.
    pub fn active(&self) -> Option<&ActiveJob> {
        self.active.as_ref()
    }

    /// Whether `job` is the currently held job.
    pub fn is_active(&self, job: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.job_id == job)
    }

    /// Whether the player has ever been fired from `job` without being rehired.
    pub fn is_fired(&self, job: &str) -> bool {
        self.fired.contains_key(job)
    }

    /// Firing record for a job.
    pub fn fired(&self, job: &str) -> Option<&FiredJob> {
        self.fired.get(job)
    }

    /// Check whether `job` can be taken on absolute day `today`.
    pub fn can_hire(&self, job: &str, today: i64) -> CoreResult<()> {
        if let Some(current) = &self.active {
            return Err(CoreError::AlreadyEmployed(current.job_id.clone()));
        }
        if let Some(record) = self.fired.get(job)
            && today < record.rehired_from
        {
            return Err(CoreError::RehireCooldown {
                job: job.to_string(),
                until: record.rehired_from,
            });
        }
        Ok(())
    }

    /// Take a job. Clears an expired firing record for it.
    pub fn hire(&mut self, job: &str, today: i64) -> CoreResult<()> {
        self.can_hire(job, today)?;
        self.fired.remove(job);
        self.active = Some(ActiveJob {
            job_id: job.to_string(),
            performance: STARTING_PERFORMANCE,
            days_worked: 0,
            hired_on: today,
            missed_days: 0,
            late_days: 0,
            pay_bonus: 0,
        });
        Ok(())
    }

    /// Leave the current job voluntarily.
    pub fn quit(&mut self) -> CoreResult<ActiveJob> {
        self.active.take().ok_or(CoreError::NotEmployed)
    }

    /// Dismiss the player from `job`, barring rehire until `rehired_from`.
    pub fn fire(
        &mut self,
        job: &str,
        reason: impl Into<String>,
        rehired_from: i64,
    ) -> CoreResult<ActiveJob> {
        if !self.is_active(job) {
            return Err(CoreError::NotEmployedAt(job.to_string()));
        }
        let previous = self.active.take().ok_or(CoreError::NotEmployed)?;
        self.fired.insert(
            job.to_string(),
            FiredJob {
                reason: reason.into(),
                rehired_from,
            },
        );
        Ok(previous)
    }

    /// Record a completed shift and raise performance.
    pub fn record_shift(&mut self, job: &str, performance_gain: i32) -> CoreResult<&ActiveJob> {
        match self.active.as_mut() {
            Some(active) if active.job_id == job => {
                active.days_worked = active.days_worked.saturating_add(1);
                active.performance = active.performance.saturating_add(performance_gain).clamp(0, 100);
                Ok(active)
            }
            _ => Err(CoreError::NotEmployedAt(job.to_string())),
        }
    }

    /// Iterate over firing records.
    pub fn fired_jobs(&self) -> impl Iterator<Item = (&str, &FiredJob)> {
        self.fired.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hire_sets_active_job() {
        let mut emp = Employment::new();
        emp.hire("job_dockhand", 10).unwrap();
        assert!(emp.is_active("job_dockhand"));
        assert_eq!(emp.active().unwrap().hired_on, 10);
    }

    #[test]
    fn cannot_hold_two_jobs() {
        let mut emp = Employment::new();
        emp.hire("job_dockhand", 10).unwrap();
        assert!(matches!(
            emp.hire("job_miller", 10),
            Err(CoreError::AlreadyEmployed(j)) if j == "job_dockhand"
        ));
    }

    #[test]
    fn fired_job_respects_cooldown() {
        let mut emp = Employment::new();
        emp.hire("job_dockhand", 10).unwrap();
        emp.fire("job_dockhand", "late again", 17).unwrap();
        assert!(emp.is_fired("job_dockhand"));
        assert!(!emp.is_active("job_dockhand"));

        assert!(matches!(
            emp.hire("job_dockhand", 16),
            Err(CoreError::RehireCooldown { until: 17, .. })
        ));

        emp.hire("job_dockhand", 17).unwrap();
        assert!(emp.is_active("job_dockhand"));
        assert!(!emp.is_fired("job_dockhand"));
    }

    #[test]
    fn fire_requires_matching_job() {
        let mut emp = Employment::new();
        emp.hire("job_dockhand", 0).unwrap();
        assert!(emp.fire("job_miller", "no", 5).is_err());
        assert!(emp.is_active("job_dockhand"));
    }

    #[test]
    fn shifts_accumulate() {
        let mut emp = Employment::new();
        emp.hire("job_dockhand", 0).unwrap();
        emp.record_shift("job_dockhand", 5).unwrap();
        let job = emp.record_shift("job_dockhand", 60).unwrap();
        assert_eq!(job.days_worked, 2);
        assert_eq!(job.performance, 100);
    }

    #[test]
    fn quit_when_unemployed_fails() {
        let mut emp = Employment::new();
        assert!(matches!(emp.quit(), Err(CoreError::NotEmployed)));
    }
}
