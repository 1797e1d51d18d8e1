//! Action execution.
//!
//! An action string is parsed into segments and each segment is applied to
//! the world in order. A segment that fails leaves the world as it was for
//! that segment only; earlier segments stay applied and later ones still run.

use std::str::FromStr;

use rb_core::{
    Axis, Content, CoreError, CurrencyKind, DiaryKind, GameClock, Stat, TemporalBackup,
    WorldState,
};
use rb_dsl::{ActionCall, ActionParseError, Verb, parse_actions};

use crate::error::{ActionError, ActionResult};

/// Something the UI must do after an action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Open the named shop screen.
    OpenShop(String),
    /// Move the current conversation to this node.
    GotoNode(String),
    /// Close the current conversation.
    EndDialogue,
}

/// What running an action string did.
#[derive(Debug, Default)]
pub struct Outcome {
    /// UI directives, in the order they were issued.
    pub directives: Vec<Directive>,
    /// Segments that changed the world or issued a directive.
    pub applied: usize,
    /// Segments that did nothing, with the reason.
    pub rejected: Vec<ActionError>,
}

impl Outcome {
    /// Whether an `end_dialogue` was issued.
    pub fn ends_dialogue(&self) -> bool {
        self.directives.contains(&Directive::EndDialogue)
    }

    /// Target of the last `goto_node`, if any.
    pub fn goto_node(&self) -> Option<&str> {
        self.directives.iter().rev().find_map(|d| match d {
            Directive::GotoNode(node) => Some(node.as_str()),
            _ => None,
        })
    }

    /// Shop to open, if any.
    pub fn open_shop(&self) -> Option<&str> {
        self.directives.iter().find_map(|d| match d {
            Directive::OpenShop(shop) => Some(shop.as_str()),
            _ => None,
        })
    }

    /// Whether every segment applied.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Run an action string against `state`.
pub fn execute(state: &mut WorldState, content: &Content, actions: &str) -> Outcome {
    Executor::new(state, content).execute(actions)
}

/// Applies parsed actions to one world state.
pub struct Executor<'a> {
    state: &'a mut WorldState,
    content: &'a Content,
}

impl<'a> Executor<'a> {
    /// Borrow a state to mutate and the content it is checked against.
    pub fn new(state: &'a mut WorldState, content: &'a Content) -> Self {
        Self { state, content }
    }

    /// Run every segment of `actions`. Never fails; see [`Outcome`].
    pub fn execute(&mut self, actions: &str) -> Outcome {
        let mut outcome = Outcome::default();
        for parsed in parse_actions(actions) {
            let result = match parsed {
                Ok(call) => {
                    tracing::debug!(action = %call, "executing");
                    if !call.ignored.is_empty() {
                        tracing::debug!(
                            action = %call,
                            ignored = ?call.ignored,
                            "extra parameters ignored"
                        );
                    }
                    self.dispatch(&call, &mut outcome)
                }
                Err(ActionParseError::UnknownVerb { verb, .. }) => {
                    Err(ActionError::UnknownVerb(verb))
                }
                Err(e) => Err(ActionError::Malformed(e.to_string())),
            };
            match result {
                Ok(()) => outcome.applied += 1,
                Err(e) => {
                    tracing::warn!(actions, error = %e, "action rejected");
                    if let ActionError::InsufficientResource(reason) = &e {
                        self.state.narrate(DiaryKind::Refusal, reason.clone());
                    }
                    outcome.rejected.push(e);
                }
            }
        }
        outcome
    }

    fn dispatch(&mut self, call: &ActionCall, outcome: &mut Outcome) -> ActionResult<()> {
        match call.verb {
            Verb::SetFlag => self.set_flag(call),
            Verb::StartQuest => self.start_quest(call),
            Verb::AdvanceQuestStage => self.advance_quest_stage(call),
            Verb::SetQuestStage => self.set_quest_stage(call),
            Verb::CompleteQuest => self.complete_quest(call),
            Verb::GrantItem => self.grant_item(call),
            Verb::RemoveItem => self.remove_item(call),
            Verb::GrantCurrency => self.grant_currency(call),
            Verb::PayDebt => self.pay_debt(call),
            Verb::HireJob => self.hire_job(call),
            Verb::QuitJob => self.quit_job(),
            Verb::FireJob => self.fire_job(call),
            Verb::WorkShift => self.work_shift(call),
            Verb::UpdateRelationship => self.relationship(call, false),
            Verb::SetRelationship => self.relationship(call, true),
            Verb::AddKnownNpc => {
                let npc = required(call, 0, "npc")?;
                self.state.meet_npc(npc);
                Ok(())
            }
            Verb::ModifyStat => {
                let stat = Stat::parse(required(call, 0, "stat")?)?;
                let delta = number(call, 1, "delta")?;
                self.state.character.modify_stat(stat, delta);
                Ok(())
            }
            Verb::OpenShop => {
                let shop = required(call, 0, "shop")?;
                outcome.directives.push(Directive::OpenShop(shop.to_string()));
                Ok(())
            }
            Verb::PassTime => {
                let minutes: u64 = number(call, 0, "minutes")?;
                self.state.clock.advance_minutes(minutes);
                Ok(())
            }
            Verb::SetWeather => {
                self.state.clock.weather = required(call, 0, "weather")?.to_string();
                Ok(())
            }
            Verb::ConvertLogsToPlanks => self.convert_logs_to_planks(call),
            Verb::EnterTemporalInstance => self.enter_temporal_instance(call),
            Verb::ExitTemporalInstance => self.exit_temporal_instance(),
            Verb::CollectDebtFrom => self.collect_debt_from(call),
            Verb::TurnInDebt => self.turn_in_debt(),
            Verb::GotoNode => {
                let node = required(call, 0, "node")?;
                outcome.directives.push(Directive::GotoNode(node.to_string()));
                Ok(())
            }
            Verb::EndDialogue => {
                outcome.directives.push(Directive::EndDialogue);
                Ok(())
            }
            Verb::WriteDiary => {
                self.state
                    .narrate(DiaryKind::Narrative, call.params.join(":"));
                Ok(())
            }
        }
    }

    // -- Flags and quests --

    fn set_flag(&mut self, call: &ActionCall) -> ActionResult<()> {
        let name = required(call, 0, "flag")?;
        let value = match call.param(1) {
            None => true,
            Some(raw) => parse_bool(raw).ok_or_else(|| invalid(call, "value", raw))?,
        };
        self.state.flags.set(name, value);
        Ok(())
    }

    fn quest_title(&self, id: &str) -> String {
        self.content
            .quests
            .get(id)
            .map_or_else(|| id.to_string(), |q| q.title.clone())
    }

    fn start_quest(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "quest")?;
        let def = self.content.quests.get(id).ok_or_else(|| missing("quest", id))?;
        self.state.quests.start(id, def.stage_count())?;
        tracing::info!(quest = id, "quest started");
        self.state
            .narrate(DiaryKind::Quest, format!("Quest started: {}", def.title));
        Ok(())
    }

    fn note_progress(&mut self, id: &str, completed_now: bool) {
        if completed_now {
            tracing::info!(quest = id, "quest completed");
            let title = self.quest_title(id);
            self.state
                .narrate(DiaryKind::Quest, format!("Quest completed: {title}"));
        }
    }

    fn advance_quest_stage(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "quest")?;
        let progress = self.state.quests.advance(id)?;
        self.note_progress(id, progress.completed_now);
        Ok(())
    }

    fn set_quest_stage(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "quest")?;
        let stage: u32 = number(call, 1, "stage")?;
        let progress = self.state.quests.set_stage(id, stage)?;
        self.note_progress(id, progress.completed_now);
        Ok(())
    }

    fn complete_quest(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "quest")?;
        let def = self.content.quests.get(id).ok_or_else(|| missing("quest", id))?;
        if !self.state.quests.complete(id, def.stage_count()) {
            return Err(ActionError::Core(CoreError::QuestAlreadyCompleted(
                id.to_string(),
            )));
        }
        self.note_progress(id, true);
        Ok(())
    }

    // -- Items and coin --

    fn grant_item(&mut self, call: &ActionCall) -> ActionResult<()> {
        let item = required(call, 0, "item")?;
        let quantity = optional_number(call, 1, "quantity", 1u32)?;
        self.state
            .inventory
            .add(item, quantity, self.content.item_traits(item));
        if self.state.inventory.is_overloaded() {
            tracing::debug!(
                weight = self.state.inventory.current_weight(),
                max = self.state.inventory.max_weight,
                "inventory over its carry limit"
            );
        }
        Ok(())
    }

    fn remove_item(&mut self, call: &ActionCall) -> ActionResult<()> {
        let item = required(call, 0, "item")?;
        let quantity = optional_number(call, 1, "quantity", 1u32)?;
        if !self.state.inventory.remove(item, quantity) {
            return Err(ActionError::InsufficientResource(format!(
                "You don't have {quantity} {}.",
                self.content.item_name(item)
            )));
        }
        Ok(())
    }

    fn grant_currency(&mut self, call: &ActionCall) -> ActionResult<()> {
        let raw_kind = required(call, 0, "currency")?;
        let kind = CurrencyKind::parse(raw_kind)
            .ok_or_else(|| CoreError::InvalidCurrency(raw_kind.to_string()))?;
        let amount: u64 = number(call, 1, "amount")?;
        self.state.character.purse.add(kind, amount);
        Ok(())
    }

    fn pay_debt(&mut self, call: &ActionCall) -> ActionResult<()> {
        let amount: u64 = number(call, 0, "amount")?;
        let flag = call
            .param(1)
            .unwrap_or(self.content.config.debt_paid_flag.as_str());
        if !self.state.character.purse.remove(amount) {
            return Err(ActionError::InsufficientResource(format!(
                "You cannot pay the {amount} copper you owe."
            )));
        }
        self.state.flags.set(flag, true);
        self.state
            .narrate(DiaryKind::Trade, format!("Paid {amount} copper toward the debt."));
        Ok(())
    }

    /// Saw logs into planks at a per-plank fee.
    ///
    /// Converts as many as the request, the logs held, and the purse allow.
    /// Logs are removed before payment; a failed payment returns them.
    fn convert_logs_to_planks(&mut self, call: &ActionCall) -> ActionResult<()> {
        let raw = required(call, 0, "quantity")?;
        let requested: u64 = if raw == "all" {
            u64::MAX
        } else {
            parse_number(call, "quantity", raw)?
        };
        let config = &self.content.config;
        let cost = config.plank_cost_copper;
        let logs = self.state.inventory.quantity(&config.log_item);
        let affordable = self
            .state
            .character
            .purse
            .total_copper()
            .checked_div(cost)
            .unwrap_or(u64::MAX);
        let n = requested.min(u64::from(logs)).min(affordable);

        if n == 0 {
            let reason = if logs == 0 {
                "You have no logs to bring to the sawmill."
            } else if requested == 0 {
                "You decide not to saw anything."
            } else {
                "You cannot afford the sawmill's fee."
            };
            return Err(ActionError::InsufficientResource(reason.to_string()));
        }

        // n <= logs, which is a u32.
        let n = u32::try_from(n).unwrap_or(logs);
        let fee = u64::from(n) * cost;
        if !self.state.inventory.remove(&config.log_item, n) {
            return Err(ActionError::InsufficientResource(
                "Your logs went missing on the way to the sawmill.".to_string(),
            ));
        }
        if !self.state.character.purse.remove(fee) {
            self.state
                .inventory
                .add(&config.log_item, n, self.content.item_traits(&config.log_item));
            return Err(ActionError::InsufficientResource(format!(
                "The sawmill wants {fee} copper; you take your logs back."
            )));
        }
        self.state
            .inventory
            .add(&config.plank_item, n, self.content.item_traits(&config.plank_item));
        self.state.narrate(
            DiaryKind::Trade,
            format!("Sawed {n} logs into planks for {fee} copper."),
        );
        Ok(())
    }

    // -- Jobs --

    fn hire_job(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "job")?;
        let def = self.content.jobs.get(id).ok_or_else(|| missing("job", id))?;
        let today = self.state.today();
        if let Err(e) = self.state.employment.hire(id, today) {
            let reason = match &e {
                CoreError::RehireCooldown { until, .. } => format!(
                    "{} won't take you back for another {} day(s).",
                    def.name,
                    until - today
                ),
                CoreError::AlreadyEmployed(current) => {
                    format!("You already work as {current}; quit first.")
                }
                other => other.to_string(),
            };
            self.state.narrate(DiaryKind::Refusal, reason);
            return Err(e.into());
        }
        tracing::info!(job = id, day = today, "hired");
        self.state
            .narrate(DiaryKind::Job, format!("Hired as {}.", def.name));
        Ok(())
    }

    fn quit_job(&mut self) -> ActionResult<()> {
        let previous = self.state.employment.quit()?;
        tracing::info!(job = %previous.job_id, "quit job");
        self.state
            .narrate(DiaryKind::Job, format!("Quit work at {}.", previous.job_id));
        Ok(())
    }

    fn fire_job(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "job")?;
        let reason = call.param(1).unwrap_or("dismissed");
        let cooldown = self
            .content
            .jobs
            .get(id)
            .and_then(|def| def.rehire_cooldown_days)
            .unwrap_or(self.content.config.rehire_cooldown_days);
        let rehired_from = self.state.today() + cooldown.max(0);
        self.state.employment.fire(id, reason, rehired_from)?;
        tracing::info!(job = id, reason, rehired_from, "fired");
        self.state
            .narrate(DiaryKind::Job, format!("Dismissed from {id}: {reason}."));
        Ok(())
    }

    fn work_shift(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "job")?;
        let def = self.content.jobs.get(id).ok_or_else(|| missing("job", id))?;
        let wage = def
            .wage_copper
            .unwrap_or(self.content.config.default_wage_copper);
        let gain = self.content.config.shift_performance_gain;
        let bonus = self.state.employment.record_shift(id, gain)?.pay_bonus;
        let pay = wage.saturating_add(bonus);
        self.state.character.purse.add(CurrencyKind::Copper, pay);
        self.state.narrate(
            DiaryKind::Job,
            format!("Worked a shift as {} and earned {pay} copper.", def.name),
        );
        Ok(())
    }

    // -- Relationships --

    fn relationship(&mut self, call: &ActionCall, absolute: bool) -> ActionResult<()> {
        let npc = required(call, 0, "npc")?;
        let amount: i32 = number(call, 1, if absolute { "value" } else { "delta" })?;
        let axis = match call.param(2) {
            None => Axis::Friendship,
            Some(raw) => Axis::parse(raw).ok_or_else(|| invalid(call, "axis", raw))?,
        };
        let value = if absolute {
            self.state.relationships.set(npc, axis, amount)
        } else {
            self.state.relationships.adjust(npc, axis, amount)
        };
        tracing::debug!(npc, axis = axis.name(), value, "relationship changed");
        Ok(())
    }

    // -- Temporal instances --

    fn enter_temporal_instance(&mut self, call: &ActionCall) -> ActionResult<()> {
        let id = required(call, 0, "instance")?;
        let def = self
            .content
            .temporal_instances
            .get(id)
            .ok_or_else(|| missing("temporal instance", id))?;
        if self.state.temporal_backup.is_none() {
            self.state.temporal_backup = Some(TemporalBackup {
                clock: self.state.clock.clone(),
                location: self.state.location.clone(),
            });
        } else {
            tracing::debug!(instance = id, "already inside an instance, keeping first backup");
        }
        let mut clock = GameClock::new(def.year, def.month, def.day_of_month, def.hour, def.minute);
        if let Some(weather) = &def.weather {
            clock.weather = weather.clone();
        }
        self.state.clock = clock;
        self.state.location = Some(def.location.clone());
        Ok(())
    }

    fn exit_temporal_instance(&mut self) -> ActionResult<()> {
        let backup = self
            .state
            .temporal_backup
            .take()
            .ok_or_else(|| ActionError::Rejected("not inside a temporal instance".to_string()))?;
        self.state.clock = backup.clock;
        self.state.location = backup.location;
        Ok(())
    }

    // -- Debt round --

    fn collect_debt_from(&mut self, call: &ActionCall) -> ActionResult<()> {
        let npc = required(call, 0, "npc")?;
        let content = self.content;
        let debt = &content.config.debt;
        let round_active = self
            .state
            .quests
            .get(&debt.quest)
            .is_some_and(|q| q.active);
        if !round_active {
            return Err(ActionError::Rejected(format!(
                "no debt round in progress (quest `{}` is not active)",
                debt.quest
            )));
        }
        if self.state.debt_round.has_collected(npc) {
            return Err(ActionError::Rejected(format!(
                "already collected from {npc} this round"
            )));
        }
        self.state.debt_round.record(npc, debt.amount_copper);
        self.state
            .character
            .purse
            .add(CurrencyKind::Copper, debt.amount_copper);
        match self.state.quests.advance(&debt.quest) {
            Ok(progress) => self.note_progress(&debt.quest, progress.completed_now),
            Err(e) => tracing::warn!(error = %e, "debt quest did not advance"),
        }
        self.state.narrate(
            DiaryKind::Trade,
            format!("Collected {} copper from {npc}.", debt.amount_copper),
        );
        Ok(())
    }

    /// Hand the round's takings to the creditor and keep the commission.
    fn turn_in_debt(&mut self) -> ActionResult<()> {
        let content = self.content;
        let debt = &content.config.debt;
        let carried = self.state.debt_round.carried_copper;
        if carried == 0 {
            return Err(ActionError::InsufficientResource(
                "You have no collected debts to turn in.".to_string(),
            ));
        }
        if !self.state.character.purse.remove(carried) {
            return Err(ActionError::InsufficientResource(format!(
                "You no longer have the {carried} copper you collected."
            )));
        }
        let commission = carried.saturating_mul(debt.commission_percent) / 100;
        self.state
            .character
            .purse
            .add(CurrencyKind::Copper, commission);
        self.state.debt_round.settle();

        let stage_count = content
            .quests
            .get(&debt.quest)
            .map_or(0, |q| q.stage_count());
        if self.state.quests.complete(&debt.quest, stage_count) {
            self.note_progress(&debt.quest, true);
        }
        self.state.narrate(
            DiaryKind::Trade,
            format!("Turned in {carried} copper and kept {commission} as commission."),
        );
        Ok(())
    }
}

// -- Parameter helpers --

fn required<'c>(call: &'c ActionCall, index: usize, name: &'static str) -> ActionResult<&'c str> {
    call.param(index).ok_or(ActionError::MissingParam {
        verb: call.verb.name(),
        name,
    })
}

fn invalid(call: &ActionCall, name: &'static str, value: &str) -> ActionError {
    ActionError::InvalidParam {
        verb: call.verb.name(),
        name,
        value: value.to_string(),
    }
}

fn missing(kind: &'static str, id: &str) -> ActionError {
    ActionError::MissingReference {
        kind,
        id: id.to_string(),
    }
}

fn parse_number<T: FromStr>(call: &ActionCall, name: &'static str, raw: &str) -> ActionResult<T> {
    raw.parse().map_err(|_| invalid(call, name, raw))
}

fn number<T: FromStr>(call: &ActionCall, index: usize, name: &'static str) -> ActionResult<T> {
    parse_number(call, name, required(call, index, name)?)
}

fn optional_number<T: FromStr>(
    call: &ActionCall,
    index: usize,
    name: &'static str,
    default: T,
) -> ActionResult<T> {
    match call.param(index) {
        Some(raw) => parse_number(call, name, raw),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::{EngineConfig, WorldView};

    const CONTENT: &str = r#"{
        "quests": {
            "q1": { "title": "Lost Ledger", "stages": ["find", "read", "return"] },
            "debt_collection": { "title": "Debts", "stages": ["a", "b", "c", "d"] }
        },
        "jobs": {
            "job_dockhand": { "name": "Dockhand", "wage_copper": 40 },
            "job_miller": { "name": "Miller", "rehire_cooldown_days": 3 }
        },
        "items": {
            "log": { "name": "Log", "weight": 5.0 },
            "sword": { "name": "Sword", "weight": 3.0, "stackable": false }
        },
        "temporal_instances": {
            "flood_night": { "location": "old_docks", "year": 0, "month": 11,
                             "day_of_month": 12, "hour": 23, "weather": "storm" }
        }
    }"#;

    fn setup() -> (WorldState, Content) {
        let content = Content::from_json(CONTENT).unwrap();
        let state = WorldState::new(&EngineConfig::default());
        (state, content)
    }

    #[test]
    fn hire_job_end_to_end() {
        let (mut state, content) = setup();
        let outcome = execute(&mut state, &content, "hire_job:job_dockhand");
        assert!(outcome.is_clean());
        assert_eq!(state.active_job(), Some("job_dockhand"));
        let job = state.employment.active().unwrap();
        assert_eq!(job.performance, 50);
        assert_eq!(job.days_worked, 0);
        assert_eq!(job.hired_on, state.today());
        assert!(rb_dsl::evaluate("job.job_dockhand==true", &state));
        assert!(state.diary.last().unwrap().text.contains("Dockhand"));
    }

    #[test]
    fn hire_job_flips_its_own_guard() {
        let (mut state, content) = setup();
        let guard = "job.job_dockhand.active==false && job.job_dockhand.fired==false";
        assert!(rb_dsl::evaluate(guard, &state));
        assert!(execute(&mut state, &content, "hire_job:job_dockhand").is_clean());
        assert!(!rb_dsl::evaluate(guard, &state));
        assert!(rb_dsl::evaluate("job.job_dockhand.active==true", &state));
        assert!(!rb_dsl::evaluate("relationship.npc_unknown>=10", &state));
    }

    #[test]
    fn extra_parameters_are_ignored() {
        let (mut state, content) = setup();
        let outcome = execute(&mut state, &content, "hire_job:job_dockhand:note");
        assert!(outcome.is_clean());
        assert_eq!(outcome.applied, 1);
        assert_eq!(state.active_job(), Some("job_dockhand"));
    }

    #[test]
    fn later_segments_see_earlier_effects() {
        let (mut state, content) = setup();
        let outcome = execute(
            &mut state,
            &content,
            "grant_item:log:5|remove_item:log:3|start_quest:q1|advance_quest_stage:q1",
        );
        assert!(outcome.is_clean());
        assert_eq!(outcome.applied, 4);
        assert_eq!(state.item_quantity("log"), 2);
        assert_eq!(state.quest("q1").unwrap().current_stage, 1);
    }

    #[test]
    fn failed_segment_does_not_stop_the_rest() {
        let (mut state, content) = setup();
        let outcome = execute(
            &mut state,
            &content,
            "remove_item:log:1|bogus_verb:x|set_flag:met_boric",
        );
        assert_eq!(outcome.rejected.len(), 2);
        assert!(matches!(outcome.rejected[1], ActionError::UnknownVerb(_)));
        assert!(state.flag("met_boric"));
        assert_eq!(state.diary.last().unwrap().kind, DiaryKind::Refusal);
    }

    #[test]
    fn set_flag_values() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "set_flag:a|set_flag:b:false|set_flag:c:maybe");
        assert!(state.flag("a"));
        assert!(!state.flag("b"));
        assert!(!state.flag("c"));
    }

    #[test]
    fn quest_lifecycle() {
        let (mut state, content) = setup();
        let outcome = execute(&mut state, &content, "start_quest:q1|start_quest:q1");
        assert_eq!(outcome.applied, 1);
        assert!(matches!(
            outcome.rejected[0],
            ActionError::Core(CoreError::QuestAlreadyActive(_))
        ));

        execute(&mut state, &content, "set_quest_stage:q1:2");
        let outcome = execute(&mut state, &content, "set_quest_stage:q1:1");
        assert!(!outcome.is_clean());
        assert_eq!(state.quest("q1").unwrap().current_stage, 2);

        execute(&mut state, &content, "advance_quest_stage:q1|advance_quest_stage:q1");
        let q = state.quest("q1").unwrap();
        assert_eq!(q.current_stage, 3);
        assert!(q.completed && !q.active);
    }

    #[test]
    fn unknown_quest_is_a_missing_reference() {
        let (mut state, content) = setup();
        let outcome = execute(&mut state, &content, "start_quest:nope|complete_quest:nope");
        assert_eq!(outcome.rejected.len(), 2);
        assert!(matches!(
            outcome.rejected[0],
            ActionError::MissingReference { kind: "quest", .. }
        ));
        assert!(state.quest("nope").is_none());
    }

    #[test]
    fn complete_quest_without_start() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "complete_quest:q1");
        let q = state.quest("q1").unwrap();
        assert!(q.completed);
        assert!(!q.active);
    }

    #[test]
    fn plank_conversion_limited_by_purse() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "grant_item:log:10|grant_currency:copper:7");
        let outcome = execute(&mut state, &content, "convert_logs_to_planks:all");
        assert!(outcome.is_clean());
        // 7 copper at 2 each buys 3 planks.
        assert_eq!(state.item_quantity("plank"), 3);
        assert_eq!(state.item_quantity("log"), 7);
        assert_eq!(state.purse().total_copper(), 1);
    }

    #[test]
    fn plank_conversion_with_nothing_affordable_changes_nothing() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "grant_item:log:4|grant_currency:copper:1");
        let before = state.clone();
        let diary_len = state.diary.len();
        let outcome = execute(&mut state, &content, "convert_logs_to_planks:4");
        assert!(matches!(
            outcome.rejected[0],
            ActionError::InsufficientResource(_)
        ));
        assert_eq!(state.inventory, before.inventory);
        assert_eq!(state.character.purse, before.character.purse);
        assert_eq!(state.diary.len(), diary_len + 1);
        assert_eq!(state.diary.last().unwrap().kind, DiaryKind::Refusal);
    }

    #[test]
    fn plank_conversion_respects_request() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "grant_item:log:10|grant_currency:silver:1");
        execute(&mut state, &content, "convert_logs_to_planks:2");
        assert_eq!(state.item_quantity("plank"), 2);
        assert_eq!(state.purse().total_copper(), 96);
    }

    #[test]
    fn pay_debt_sets_flag_or_refuses() {
        let (mut state, content) = setup();
        let outcome = execute(&mut state, &content, "pay_debt:50");
        assert!(!outcome.is_clean());
        assert!(!state.flag("debt_paid"));

        execute(&mut state, &content, "grant_currency:copper:80|pay_debt:50|pay_debt:20:boric_paid");
        assert!(state.flag("debt_paid"));
        assert!(state.flag("boric_paid"));
        assert_eq!(state.purse().total_copper(), 10);
    }

    #[test]
    fn fired_job_cooldown_blocks_then_allows_rehire() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "hire_job:job_miller|fire_job:job_miller:late");
        assert!(state.is_fired_from("job_miller"));
        assert!(rb_dsl::evaluate("job.job_miller.fired==true", &state));

        let outcome = execute(&mut state, &content, "hire_job:job_miller");
        assert!(matches!(
            outcome.rejected[0],
            ActionError::Core(CoreError::RehireCooldown { .. })
        ));
        assert_eq!(state.diary.last().unwrap().kind, DiaryKind::Refusal);

        execute(&mut state, &content, "pass_time:4320");
        let outcome = execute(&mut state, &content, "hire_job:job_miller");
        assert!(outcome.is_clean());
        assert!(!state.is_fired_from("job_miller"));
    }

    #[test]
    fn work_shift_pays_wage() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "hire_job:job_dockhand|work_shift:job_dockhand");
        assert_eq!(state.purse().total_copper(), 40);
        let job = state.employment.active().unwrap();
        assert_eq!(job.days_worked, 1);
        assert_eq!(job.performance, 55);

        let outcome = execute(&mut state, &content, "work_shift:job_miller");
        assert!(!outcome.is_clean());
    }

    #[test]
    fn relationships_default_axis_and_clamp() {
        let (mut state, content) = setup();
        execute(
            &mut state,
            &content,
            "update_relationship:npc_boric:-30|update_relationship:npc_boric:-90|set_relationship:npc_boric:20:fear",
        );
        assert_eq!(state.relationship("npc_boric", Axis::Friendship), -100);
        assert_eq!(state.relationship("npc_boric", Axis::Fear), 20);

        let outcome = execute(&mut state, &content, "update_relationship:npc_boric:lots");
        assert!(matches!(outcome.rejected[0], ActionError::InvalidParam { .. }));
    }

    #[test]
    fn directives_are_collected() {
        let (mut state, content) = setup();
        let outcome = execute(
            &mut state,
            &content,
            "open_shop:general_store|goto_node:3|end_dialogue",
        );
        assert_eq!(outcome.open_shop(), Some("general_store"));
        assert_eq!(outcome.goto_node(), Some("3"));
        assert!(outcome.ends_dialogue());
    }

    #[test]
    fn temporal_instance_round_trip() {
        let (mut state, content) = setup();
        state.location = Some("market".into());
        let original = state.clock.clone();

        execute(&mut state, &content, "enter_temporal_instance:flood_night");
        assert_eq!(state.location.as_deref(), Some("old_docks"));
        assert_eq!(state.clock.weather, "storm");
        assert_eq!(state.clock.hour, 23);

        // A nested enter keeps the first backup.
        execute(&mut state, &content, "pass_time:30|enter_temporal_instance:flood_night");

        execute(&mut state, &content, "exit_temporal_instance");
        assert_eq!(state.clock, original);
        assert_eq!(state.location.as_deref(), Some("market"));

        let outcome = execute(&mut state, &content, "exit_temporal_instance");
        assert!(matches!(outcome.rejected[0], ActionError::Rejected(_)));
    }

    #[test]
    fn debt_round() {
        let (mut state, content) = setup();
        let outcome = execute(&mut state, &content, "collect_debt_from:npc_a");
        assert!(!outcome.is_clean());

        execute(
            &mut state,
            &content,
            "start_quest:debt_collection|collect_debt_from:npc_a|collect_debt_from:npc_b",
        );
        assert_eq!(state.debt_round.carried_copper, 1000);
        assert_eq!(state.quest("debt_collection").unwrap().current_stage, 2);

        let outcome = execute(&mut state, &content, "collect_debt_from:npc_a");
        assert!(matches!(outcome.rejected[0], ActionError::Rejected(_)));

        execute(&mut state, &content, "turn_in_debt");
        assert_eq!(state.purse().total_copper(), 100);
        assert_eq!(state.debt_round.carried_copper, 0);
        assert_eq!(state.debt_round.cycle, 1);
        assert!(state.quest("debt_collection").unwrap().completed);
    }

    #[test]
    fn turn_in_debt_refuses_when_purse_is_short() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "start_quest:debt_collection|collect_debt_from:npc_a");
        assert!(state.character.purse.remove(400));
        let outcome = execute(&mut state, &content, "turn_in_debt");
        assert!(matches!(
            outcome.rejected[0],
            ActionError::InsufficientResource(_)
        ));
        assert_eq!(state.debt_round.carried_copper, 500);
        assert_eq!(state.purse().total_copper(), 100);
    }

    #[test]
    fn stats_and_clock() {
        let (mut state, content) = setup();
        execute(
            &mut state,
            &content,
            "modify_stat:strength:3|modify_stat:hunger:-10|set_weather:rain|pass_time:90",
        );
        assert_eq!(state.stat(Stat::Strength), 8);
        assert_eq!(state.stat(Stat::Hunger), 0);
        assert_eq!(state.clock.weather, "rain");
        assert_eq!((state.clock.hour, state.clock.minute), (9, 30));

        let outcome = execute(&mut state, &content, "modify_stat:luck:1");
        assert!(matches!(
            outcome.rejected[0],
            ActionError::Core(CoreError::UnknownStat(_))
        ));
    }

    #[test]
    fn write_diary_joins_colons() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "write_diary:Note:the river rose");
        let last = state.diary.last().unwrap();
        assert_eq!(last.kind, DiaryKind::Narrative);
        assert_eq!(last.text, "Note:the river rose");
    }

    #[test]
    fn non_stackable_items_are_instances() {
        let (mut state, content) = setup();
        execute(&mut state, &content, "grant_item:sword:2|add_known_npc:npc_boric");
        assert_eq!(state.inventory.instances_of("sword").count(), 2);
        assert!(state.knows_npc("npc_boric"));
    }
}
