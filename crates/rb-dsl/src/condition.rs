//! Compiled conditions.
//!
//! A condition string is parsed and resolved once into a [`Condition`], then
//! evaluated against any [`WorldView`]. Evaluation never errors: a condition
//! that fails to compile is false, and the failure is logged.

use std::fmt;

use rb_core::WorldView;

use crate::ast::{CmpOp, Literal};
use crate::error::ConditionResult;
use crate::parser::parse_condition;
use crate::resolver::{Query, QuestField, TimeField, resolve};

/// A value read from the world or written in a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Flags, quest states, `has_item`, `job`.
    Bool(bool),
    /// Counts, stages, bonds, stats, clock numbers.
    Number(f64),
    /// Weekday, season, weather and identifier literals.
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(b) => Value::Bool(b),
            Literal::Number(n) => Value::Number(n),
            Literal::Ident(s) => Value::Text(s),
        }
    }
}

/// Compare two values.
///
/// Equality holds only between values of the same type, so a type mismatch
/// makes `==` false and `!=` true. Ordering operators apply to numbers only.
pub fn compare(lhs: &Value, op: CmpOp, rhs: &Value) -> bool {
    match (op, lhs, rhs) {
        (CmpOp::Eq, _, _) => lhs == rhs,
        (CmpOp::Ne, _, _) => lhs != rhs,
        (CmpOp::Ge, Value::Number(a), Value::Number(b)) => a >= b,
        (CmpOp::Le, Value::Number(a), Value::Number(b)) => a <= b,
        (CmpOp::Gt, Value::Number(a), Value::Number(b)) => a > b,
        (CmpOp::Lt, Value::Number(a), Value::Number(b)) => a < b,
        _ => false,
    }
}

/// Read the current value of a query.
pub fn read_query<V: WorldView + ?Sized>(query: &Query, view: &V) -> Value {
    match query {
        Query::Quest { id, field } => {
            let record = view.quest(id);
            match field {
                QuestField::Active => Value::Bool(record.is_some_and(|q| q.active)),
                QuestField::Completed => Value::Bool(record.is_some_and(|q| q.completed)),
                QuestField::Started => Value::Bool(record.is_some()),
                QuestField::Stage => {
                    Value::Number(record.map_or(0.0, |q| f64::from(q.current_stage)))
                }
            }
        }
        Query::Flag(name) => Value::Bool(view.flag(name)),
        Query::Time(field) => {
            let clock = view.clock();
            match field {
                TimeField::Hour => Value::Number(f64::from(clock.hour)),
                TimeField::Minute => Value::Number(f64::from(clock.minute)),
                TimeField::Day => Value::Number(f64::from(clock.day_of_month)),
                TimeField::Month => Value::Number(f64::from(clock.month)),
                TimeField::Year => Value::Number(clock.year as f64),
                TimeField::Weekday => Value::Text(clock.weekday().name().to_string()),
                TimeField::Season => Value::Text(clock.season.name().to_string()),
                TimeField::Weather => Value::Text(clock.weather.clone()),
                TimeField::IsWeekend => Value::Bool(clock.weekday().is_weekend()),
                TimeField::Period => Value::Text(clock.period().name().to_string()),
            }
        }
        Query::Relationship { npc, axis } => {
            Value::Number(f64::from(view.relationship(npc, *axis)))
        }
        Query::JobActive(id) => Value::Bool(view.active_job() == Some(id.as_str())),
        Query::JobFired(id) => Value::Bool(view.is_fired_from(id)),
        Query::Inventory(item) => Value::Number(f64::from(view.item_quantity(item))),
        Query::HasItem(item) => Value::Bool(view.item_quantity(item) > 0),
        Query::Currency(kind) => {
            let purse = view.purse();
            let amount = match kind {
                Some(kind) => purse.amount(*kind),
                None => purse.total_copper(),
            };
            Value::Number(amount as f64)
        }
        Query::Stat(stat) => Value::Number(f64::from(view.stat(*stat))),
    }
}

/// One resolved `query op value` check.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    /// What to read.
    pub query: Query,
    /// How to compare it.
    pub op: CmpOp,
    /// The literal from the clause.
    pub expected: Value,
}

/// A parsed and resolved condition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    checks: Vec<Check>,
}

impl Condition {
    /// Compile a condition string. Blank input compiles to a condition that
    /// always holds.
    pub fn parse(source: &str) -> ConditionResult<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let expr = parse_condition(source)?;
        let checks = expr
            .clauses
            .into_iter()
            .map(|clause| {
                Ok(Check {
                    query: resolve(&clause.path, &clause.path_span)?,
                    op: clause.op,
                    expected: clause.literal.into(),
                })
            })
            .collect::<ConditionResult<Vec<_>>>()?;
        Ok(Self { checks })
    }

    /// Resolved checks, in source order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Whether every check holds. Stops at the first failing check.
    pub fn holds<V: WorldView + ?Sized>(&self, view: &V) -> bool {
        self.checks
            .iter()
            .all(|check| compare(&read_query(&check.query, view), check.op, &check.expected))
    }
}

/// Evaluate a condition string against the world, failing closed.
///
/// Any parse or resolution error makes the condition false and is logged
/// as a warning.
pub fn evaluate<V: WorldView + ?Sized>(source: &str, view: &V) -> bool {
    match Condition::parse(source) {
        Ok(condition) => condition.holds(view),
        Err(e) => {
            tracing::warn!(condition = source, error = %e, "condition rejected, treating as false");
            false
        }
    }
}

/// Evaluate an optional condition; a missing condition always holds.
pub fn evaluate_opt<V: WorldView + ?Sized>(source: Option<&str>, view: &V) -> bool {
    source.is_none_or(|s| evaluate(s, view))
}
