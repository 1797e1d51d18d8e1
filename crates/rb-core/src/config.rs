//! Engine configuration.
//!
//! Read from the `config` section of a content document. Every field has a
//! default so partial sections are fine.

use serde::{Deserialize, Serialize};

/// Settings for the debt collection round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtConfig {
    /// Quest that must be active for collection to be possible.
    pub quest: String,
    /// Copper collected from each debtor.
    pub amount_copper: u64,
    /// Share of the turned-in sum paid back to the player, in percent.
    pub commission_percent: u64,
}

impl Default for DebtConfig {
    fn default() -> Self {
        Self {
            quest: "debt_collection".to_string(),
            amount_copper: 500,
            commission_percent: 10,
        }
    }
}

/// Tunable engine rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Copper charged per plank at the sawmill.
    pub plank_cost_copper: u64,
    /// Item id consumed by plank conversion.
    pub log_item: String,
    /// Item id produced by plank conversion.
    pub plank_item: String,
    /// Days a fired player must wait before being rehired.
    pub rehire_cooldown_days: i64,
    /// Wage for jobs that do not define one.
    pub default_wage_copper: u64,
    /// Performance gained per completed shift.
    pub shift_performance_gain: i32,
    /// Flag set by a successful `pay_debt` without an explicit flag.
    pub debt_paid_flag: String,
    /// Advisory inventory weight limit for a fresh game.
    pub max_carry_weight: f64,
    /// Deepest level a dialogue preview will expand.
    pub preview_depth: usize,
    /// Most nodes a single dialogue preview will expand in total.
    pub preview_node_limit: usize,
    /// Debt round settings.
    pub debt: DebtConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            plank_cost_copper: 2,
            log_item: "log".to_string(),
            plank_item: "plank".to_string(),
            rehire_cooldown_days: 7,
            default_wage_copper: 50,
            shift_performance_gain: 5,
            debt_paid_flag: "debt_paid".to_string(),
            max_carry_weight: 50.0,
            preview_depth: 32,
            preview_node_limit: 256,
            debt: DebtConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the per-plank sawmill fee.
    pub fn with_plank_cost(mut self, copper: u64) -> Self {
        self.plank_cost_copper = copper;
        self
    }

    /// Set the rehire cooldown (never negative).
    pub fn with_rehire_cooldown(mut self, days: i64) -> Self {
        self.rehire_cooldown_days = days.max(0);
        self
    }

    /// Set the preview depth cap (at least 1).
    pub fn with_preview_depth(mut self, depth: usize) -> Self {
        self.preview_depth = depth.max(1);
        self
    }

    /// Set the preview node budget (at least 1).
    pub fn with_preview_node_limit(mut self, nodes: usize) -> Self {
        self.preview_node_limit = nodes.max(1);
        self
    }

    /// Replace the debt round settings.
    pub fn with_debt(mut self, debt: DebtConfig) -> Self {
        self.debt = debt;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.plank_cost_copper, 2);
        assert_eq!(cfg.log_item, "log");
        assert_eq!(cfg.rehire_cooldown_days, 7);
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_plank_cost(3)
            .with_rehire_cooldown(-4)
            .with_preview_depth(0)
            .with_preview_node_limit(0);
        assert_eq!(cfg.plank_cost_copper, 3);
        assert_eq!(cfg.preview_node_limit, 1);
        assert_eq!(cfg.rehire_cooldown_days, 0);
        assert_eq!(cfg.preview_depth, 1);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"plank_cost_copper": 5, "debt": {"amount_copper": 20}}"#)
                .unwrap();
        assert_eq!(cfg.plank_cost_copper, 5);
        assert_eq!(cfg.plank_item, "plank");
        assert_eq!(cfg.debt.amount_copper, 20);
        assert_eq!(cfg.debt.quest, "debt_collection");
    }
}
