//! The Riverbend content mini-language.
//!
//! Two small grammars live in JSON content fields:
//!
//! - **conditions** (`condition` fields): `path op literal` clauses joined by
//!   `&&`, e.g. `relationship.npc_boric>=-50 && job.job_dockhand.fired==false`;
//! - **actions** (`action` fields): `verb:param:param` segments joined by
//!   `|`, e.g. `grant_item:log:5|start_quest:q1`.
//!
//! Conditions are lexed with logos, parsed with chumsky, resolved against a
//! fixed namespace table, and evaluated fail-closed against any
//! [`rb_core::WorldView`]. Action strings are parsed into a closed [`Verb`]
//! vocabulary; executing them is the job of `rb-fiction`.

/// Action string parsing and the verb vocabulary.
pub mod action;
/// Condition syntax tree.
pub mod ast;
/// Compiled conditions and their evaluation.
pub mod condition;
/// Diagnostics and terminal rendering.
pub mod diagnostics;
/// Error types for condition parsing.
pub mod error;
/// Condition tokenizer.
pub mod lexer;
/// Content-wide syntax checking.
pub mod lint;
/// Condition parser.
pub mod parser;
/// Namespace dispatch from paths to typed queries.
pub mod resolver;

pub use action::{ActionCall, ActionParseError, Verb, parse_actions};
pub use condition::{Condition, Value, evaluate};
pub use diagnostics::Diagnostic;
pub use error::{ConditionError, ConditionResult};
pub use lint::{LintReport, lint_content};
pub use resolver::Query;
