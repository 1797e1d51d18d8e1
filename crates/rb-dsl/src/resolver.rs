//! Namespace dispatch.
//!
//! A clause path is resolved once, at compile time, into a typed [`Query`].
//! Each namespace owns a resolver function in [`NAMESPACES`]; adding a
//! namespace means adding one row there and one arm in
//! `condition::read_query`.

use rb_core::{Axis, CurrencyKind, Stat};

use crate::ast::{Path, Span};
use crate::error::{ConditionError, ConditionResult};

/// Which part of a quest record a clause reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestField {
    /// Started and not yet completed.
    Active,
    /// Completed.
    Completed,
    /// True once the quest has a record at all.
    Started,
    /// Current stage index; 0 for unknown quests.
    Stage,
}

/// Which part of the clock a clause reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    /// `time.hour`, 0 to 23.
    Hour,
    /// `time.minute`, 0 to 59.
    Minute,
    /// `time.day` or `time.day_of_month`, from 1.
    Day,
    /// `time.month`, 1 to 12.
    Month,
    /// `time.year`
    Year,
    /// `time.weekday`, compared by name.
    Weekday,
    /// `time.season`, compared by name.
    Season,
    /// `time.weather`, compared by name.
    Weather,
    /// `time.is_weekend`
    IsWeekend,
    /// `time.period`: morning, afternoon, evening or night.
    Period,
}

impl TimeField {
    const NAMES: &'static [(&'static str, TimeField)] = &[
        ("hour", TimeField::Hour),
        ("minute", TimeField::Minute),
        ("day", TimeField::Day),
        ("day_of_month", TimeField::Day),
        ("month", TimeField::Month),
        ("year", TimeField::Year),
        ("weekday", TimeField::Weekday),
        ("season", TimeField::Season),
        ("weather", TimeField::Weather),
        ("is_weekend", TimeField::IsWeekend),
        ("period", TimeField::Period),
    ];

    fn parse(s: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, field)| *field)
    }
}

/// A typed read against the world state.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// `quest.<id>.<field>`
    Quest {
        /// Quest id.
        id: String,
        /// Part of the record to read.
        field: QuestField,
    },
    /// `world_flags.<name>`
    Flag(String),
    /// `time.<field>`
    Time(TimeField),
    /// `relationship.<npc>[.<axis>]`
    Relationship {
        /// NPC id.
        npc: String,
        /// Bond axis; friendship when omitted.
        axis: Axis,
    },
    /// `job.<id>`: whether the player currently holds the job.
    JobActive(String),
    /// `job.<id>.fired`: whether the player was dismissed from the job.
    JobFired(String),
    /// `inventory.<item>`: units held.
    Inventory(String),
    /// `has_item:<item>`: at least one unit held.
    HasItem(String),
    /// `currency.<kind>`, or `None` for `currency.total`.
    Currency(Option<CurrencyKind>),
    /// `stats.<stat>`
    Stat(Stat),
}

type Resolver = fn(&[String], &Span) -> ConditionResult<Query>;

/// Every namespace a dotted path may start with.
pub const NAMESPACES: &[(&str, Resolver)] = &[
    ("quest", resolve_quest),
    ("world_flags", resolve_flag),
    ("time", resolve_time),
    ("relationship", resolve_relationship),
    ("job", resolve_job),
    ("inventory", resolve_inventory),
    ("currency", resolve_currency),
    ("stats", resolve_stat),
];

/// Names of every namespace, for suggestions.
pub fn namespace_names() -> impl Iterator<Item = &'static str> {
    NAMESPACES.iter().map(|(name, _)| *name)
}

/// Resolve a clause path into a query.
pub fn resolve(path: &Path, span: &Span) -> ConditionResult<Query> {
    let segments = match path {
        Path::HasItem(item) => return Ok(Query::HasItem(item.clone())),
        Path::Dotted(segments) => segments,
    };
    let Some((namespace, rest)) = segments.split_first() else {
        return Err(ConditionError::Parse {
            span: span.clone(),
            message: "empty path".to_string(),
        });
    };
    let resolver = NAMESPACES
        .iter()
        .find(|(name, _)| *name == namespace.as_str())
        .map(|(_, resolver)| *resolver)
        .ok_or_else(|| ConditionError::UnknownNamespace {
            span: span.clone(),
            namespace: namespace.clone(),
        })?;
    resolver(rest, span)
}

fn unknown(namespace: &str, rest: &[String], span: &Span) -> ConditionError {
    ConditionError::UnknownField {
        span: span.clone(),
        namespace: namespace.to_string(),
        field: if rest.is_empty() {
            "<missing>".to_string()
        } else {
            rest.join(".")
        },
    }
}

fn resolve_quest(rest: &[String], span: &Span) -> ConditionResult<Query> {
    let (id, field) = match rest {
        [id] => (id, QuestField::Active),
        [id, field] => {
            let field = match field.as_str() {
                "active" => QuestField::Active,
                "completed" => QuestField::Completed,
                "started" => QuestField::Started,
                "stage" => QuestField::Stage,
                _ => return Err(unknown("quest", rest, span)),
            };
            (id, field)
        }
        _ => return Err(unknown("quest", rest, span)),
    };
    Ok(Query::Quest {
        id: id.clone(),
        field,
    })
}

fn resolve_flag(rest: &[String], span: &Span) -> ConditionResult<Query> {
    match rest {
        [name] => Ok(Query::Flag(name.clone())),
        _ => Err(unknown("world_flags", rest, span)),
    }
}

fn resolve_time(rest: &[String], span: &Span) -> ConditionResult<Query> {
    match rest {
        [field] => TimeField::parse(field)
            .map(Query::Time)
            .ok_or_else(|| unknown("time", rest, span)),
        _ => Err(unknown("time", rest, span)),
    }
}

fn resolve_relationship(rest: &[String], span: &Span) -> ConditionResult<Query> {
    let (npc, axis) = match rest {
        [npc] => (npc, Axis::Friendship),
        [npc, axis] => (
            npc,
            Axis::parse(axis).ok_or_else(|| unknown("relationship", rest, span))?,
        ),
        _ => return Err(unknown("relationship", rest, span)),
    };
    Ok(Query::Relationship {
        npc: npc.clone(),
        axis,
    })
}

/// `job.<id>.fired` reads dismissal; any other shape reads employment.
fn resolve_job(rest: &[String], span: &Span) -> ConditionResult<Query> {
    match rest {
        [id, field] if field == "fired" => Ok(Query::JobFired(id.clone())),
        [id, ..] => Ok(Query::JobActive(id.clone())),
        [] => Err(unknown("job", rest, span)),
    }
}

fn resolve_inventory(rest: &[String], span: &Span) -> ConditionResult<Query> {
    match rest {
        [item] => Ok(Query::Inventory(item.clone())),
        _ => Err(unknown("inventory", rest, span)),
    }
}

fn resolve_currency(rest: &[String], span: &Span) -> ConditionResult<Query> {
    match rest {
        [kind] if kind == "total" => Ok(Query::Currency(None)),
        [kind] => CurrencyKind::parse(kind)
            .map(|k| Query::Currency(Some(k)))
            .ok_or_else(|| unknown("currency", rest, span)),
        _ => Err(unknown("currency", rest, span)),
    }
}

fn resolve_stat(rest: &[String], span: &Span) -> ConditionResult<Query> {
    match rest {
        [name] => Stat::parse(name)
            .map(Query::Stat)
            .map_err(|_| unknown("stats", rest, span)),
        _ => Err(unknown("stats", rest, span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dotted(path: &str) -> ConditionResult<Query> {
        let segments = path.split('.').map(str::to_string).collect();
        resolve(&Path::Dotted(segments), &(0..path.len()))
    }

    #[test]
    fn quest_field_defaults_to_active() {
        assert_eq!(
            dotted("quest.q1").unwrap(),
            Query::Quest {
                id: "q1".into(),
                field: QuestField::Active
            }
        );
        assert_eq!(
            dotted("quest.q1.stage").unwrap(),
            Query::Quest {
                id: "q1".into(),
                field: QuestField::Stage
            }
        );
    }

    #[test]
    fn relationship_axis_defaults_to_friendship() {
        assert_eq!(
            dotted("relationship.npc_boric").unwrap(),
            Query::Relationship {
                npc: "npc_boric".into(),
                axis: Axis::Friendship
            }
        );
        assert_eq!(
            dotted("relationship.npc_boric.fear").unwrap(),
            Query::Relationship {
                npc: "npc_boric".into(),
                axis: Axis::Fear
            }
        );
    }

    #[test]
    fn job_fired_versus_active() {
        assert_eq!(
            dotted("job.job_dockhand.fired").unwrap(),
            Query::JobFired("job_dockhand".into())
        );
        assert_eq!(
            dotted("job.job_dockhand").unwrap(),
            Query::JobActive("job_dockhand".into())
        );
        assert_eq!(
            dotted("job.job_dockhand.active").unwrap(),
            Query::JobActive("job_dockhand".into())
        );
    }

    #[test]
    fn currency_total_and_kinds() {
        assert_eq!(dotted("currency.total").unwrap(), Query::Currency(None));
        assert_eq!(
            dotted("currency.silver").unwrap(),
            Query::Currency(Some(CurrencyKind::Silver))
        );
        assert!(dotted("currency.platinum").is_err());
    }

    #[test]
    fn unknown_namespace() {
        let err = dotted("weather.rain").unwrap_err();
        assert!(matches!(
            err,
            ConditionError::UnknownNamespace { ref namespace, .. } if namespace == "weather"
        ));
    }

    #[test]
    fn unknown_time_field() {
        let err = dotted("time.fortnight").unwrap_err();
        assert!(matches!(err, ConditionError::UnknownField { .. }));
    }

    #[test]
    fn stats_resolve_by_name() {
        assert_eq!(dotted("stats.hp").unwrap(), Query::Stat(Stat::Hp));
        assert!(dotted("stats.luck").is_err());
    }

    #[test]
    fn has_item_needs_no_namespace() {
        let q = resolve(&Path::HasItem("rope".into()), &(0..13)).unwrap();
        assert_eq!(q, Query::HasItem("rope".into()));
    }
}
