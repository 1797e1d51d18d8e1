//! Content-wide checking of every condition and action string.
//!
//! Errors here are problems the runtime would silently swallow (a condition
//! that can never hold, a verb that does nothing). Warnings are dangling
//! references the runtime tolerates.

use rb_core::Content;
use rb_core::content::ROOT_NODE;

use crate::action::{ActionCall, Verb, parse_actions};
use crate::condition::Condition;
use crate::diagnostics::{Diagnostic, render_fragment};

/// A diagnostic together with the content fragment it points into.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Where the fragment lives, e.g. `dialogues.boric_main.nodes.0.choices[1].condition`.
    pub origin: String,
    /// The fragment itself; empty for structural findings.
    pub source: String,
    /// What is wrong and where in `source`.
    pub diagnostic: Diagnostic,
}

/// Result of linting a content document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintReport {
    /// Every finding, in document order.
    pub findings: Vec<Finding>,
    /// Condition fields seen.
    pub conditions_checked: usize,
    /// Action fields seen.
    pub actions_checked: usize,
}

impl LintReport {
    /// Findings that fail the lint.
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.diagnostic.is_error())
            .count()
    }

    /// Findings that are reported but tolerated.
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }

    /// Whether the content should be refused.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Render every finding for a terminal.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for finding in &self.findings {
            if finding.source.is_empty() {
                out.push_str(&format!("{} [{}]\n", finding.diagnostic, finding.origin));
            } else {
                out.push_str(&render_fragment(
                    &finding.origin,
                    &finding.source,
                    std::slice::from_ref(&finding.diagnostic),
                ));
            }
        }
        out
    }

    fn push(&mut self, origin: &str, source: &str, diagnostic: Diagnostic) {
        self.findings.push(Finding {
            origin: origin.to_string(),
            source: source.to_string(),
            diagnostic,
        });
    }

    fn structural(&mut self, origin: &str, message: String) {
        self.push(origin, "", Diagnostic::warning(0..0, message));
    }

    fn condition(&mut self, origin: &str, source: &str) {
        self.conditions_checked += 1;
        if let Err(e) = Condition::parse(source) {
            self.push(origin, source, Diagnostic::from(&e));
        }
    }

    fn action(&mut self, origin: &str, source: &str, content: &Content) {
        self.actions_checked += 1;
        for result in parse_actions(source) {
            match result {
                Ok(call) => {
                    if !call.ignored.is_empty() {
                        self.push(
                            origin,
                            source,
                            Diagnostic::warning(
                                call.span.clone(),
                                format!(
                                    "{} ignores extra parameter(s): {}",
                                    call.verb,
                                    call.ignored.join(":")
                                ),
                            ),
                        );
                    }
                    if let Some(message) = dangling_reference(&call, content) {
                        self.push(
                            origin,
                            source,
                            Diagnostic::warning(call.span.clone(), message),
                        );
                    }
                }
                Err(e) => self.push(origin, source, Diagnostic::from(&e)),
            }
        }
    }
}

/// A reference from an action to a content id that does not exist.
fn dangling_reference(call: &ActionCall, content: &Content) -> Option<String> {
    let id = call.param(0)?;
    let (kind, known) = match call.verb {
        Verb::StartQuest | Verb::AdvanceQuestStage | Verb::SetQuestStage | Verb::CompleteQuest => {
            ("quest", content.quests.contains_key(id))
        }
        Verb::HireJob | Verb::FireJob | Verb::WorkShift => ("job", content.jobs.contains_key(id)),
        Verb::EnterTemporalInstance => (
            "temporal instance",
            content.temporal_instances.contains_key(id),
        ),
        _ => return None,
    };
    (!known).then(|| format!("{} refers to unknown {kind} `{id}`", call.verb))
}

/// Check every condition and action in `content`.
pub fn lint_content(content: &Content) -> LintReport {
    let mut report = LintReport::default();

    for (npc_id, npc) in &content.npcs {
        if !content.dialogues.contains_key(&npc.dialogue) {
            report.structural(
                &format!("npcs.{npc_id}.dialogue"),
                format!("dialogue `{}` does not exist", npc.dialogue),
            );
        }
        let overrides = [
            ("event_overrides", &npc.event_overrides),
            ("quest_dialogues", &npc.quest_dialogues),
        ];
        for (field, list) in overrides {
            for (i, alt) in list.iter().enumerate() {
                let origin = format!("npcs.{npc_id}.{field}[{i}]");
                report.condition(&format!("{origin}.condition"), &alt.condition);
                if !content.dialogues.contains_key(&alt.dialogue) {
                    report.structural(
                        &origin,
                        format!("dialogue `{}` does not exist", alt.dialogue),
                    );
                }
            }
        }
    }

    for (dialogue_id, doc) in &content.dialogues {
        if !doc.nodes.contains_key(ROOT_NODE) {
            report.structural(
                &format!("dialogues.{dialogue_id}"),
                format!("dialogue has no root node `{ROOT_NODE}`"),
            );
        }
        for (node_id, node) in &doc.nodes {
            for (i, choice) in node.choices.iter().enumerate() {
                let origin = format!("dialogues.{dialogue_id}.nodes.{node_id}.choices[{i}]");
                if let Some(condition) = &choice.condition {
                    report.condition(&format!("{origin}.condition"), condition);
                }
                if let Some(action) = &choice.action {
                    report.action(&format!("{origin}.action"), action, content);
                }
                if let Some(next) = &choice.next_node {
                    if choice.closes_dialogue {
                        report.structural(
                            &origin,
                            "next_node is ignored on a choice that closes the dialogue".into(),
                        );
                    } else if !doc.nodes.contains_key(next) {
                        report.structural(&origin, format!("next_node `{next}` does not exist"));
                    }
                }
            }
        }
    }

    for (location_id, location) in &content.locations {
        for action in &location.actions {
            let origin = format!("locations.{location_id}.actions.{}", action.id);
            if let Some(condition) = &action.condition {
                report.condition(&format!("{origin}.condition"), condition);
            }
            if let Some(source) = &action.action {
                report.action(&format!("{origin}.action"), source, content);
            }
        }
    }

    tracing::debug!(
        conditions = report.conditions_checked,
        actions = report.actions_checked,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "linted content"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(json: &str) -> Content {
        Content::from_json(json).unwrap()
    }

    const CLEAN: &str = r#"{
        "quests": { "q1": { "title": "Lost Ledger", "stages": ["a", "b"] } },
        "jobs": { "job_dockhand": { "name": "Dockhand" } },
        "npcs": {
            "npc_boric": {
                "name": "Boric",
                "dialogue": "boric_main",
                "quest_dialogues": [
                    { "condition": "quest.q1.active==true", "dialogue": "boric_quest" }
                ]
            }
        },
        "dialogues": {
            "boric_main": { "nodes": { "0": { "text": "Hm?", "choices": [
                { "text": "Work?", "condition": "job.job_dockhand.fired==false",
                  "action": "hire_job:job_dockhand", "next_node": "1" }
            ] }, "1": { "text": "Go.", "choices": [] } } },
            "boric_quest": { "nodes": { "0": { "text": "The ledger?", "choices": [] } } }
        },
        "locations": {
            "docks": { "name": "Docks", "actions": [
                { "id": "saw", "label": "Saw logs", "condition": "inventory.log>=1",
                  "action": "convert_logs_to_planks:all" }
            ] }
        }
    }"#;

    #[test]
    fn clean_content_has_no_findings() {
        let report = lint_content(&content(CLEAN));
        assert!(report.findings.is_empty(), "{}", report.render());
        assert_eq!(report.conditions_checked, 3);
        assert_eq!(report.actions_checked, 2);
    }

    #[test]
    fn disjunction_is_an_error() {
        let json = CLEAN.replace("quest.q1.active==true", "quest.q1.active==true || world_flags.x==true");
        let report = lint_content(&content(&json));
        assert_eq!(report.error_count(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.origin, "npcs.npc_boric.quest_dialogues[0].condition");
        assert!(finding.diagnostic.message.contains("||"));
    }

    #[test]
    fn extra_parameters_are_a_warning() {
        let json = CLEAN.replace("hire_job:job_dockhand", "hire_job:job_dockhand:note");
        let report = lint_content(&content(&json));
        assert!(!report.has_errors());
        assert_eq!(report.warning_count(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.origin, "dialogues.boric_main.nodes.0.choices[0].action");
        assert_eq!(
            finding.diagnostic.message,
            "hire_job ignores extra parameter(s): note"
        );
    }

    #[test]
    fn unknown_verb_is_an_error_with_suggestion() {
        let json = CLEAN.replace("hire_job:job_dockhand", "hire_jb:job_dockhand");
        let report = lint_content(&content(&json));
        assert!(report.has_errors());
        let diag = &report.findings[0].diagnostic;
        assert_eq!(diag.label.as_deref(), Some("did you mean `hire_job`?"));
        assert!(report.render().contains("unknown verb"));
    }

    #[test]
    fn dangling_references_are_warnings() {
        let json = CLEAN
            .replace("hire_job:job_dockhand", "hire_job:job_miller")
            .replace("\"next_node\": \"1\"", "\"next_node\": \"9\"");
        let report = lint_content(&content(&json));
        assert!(!report.has_errors());
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn unknown_namespace_is_an_error() {
        let json = CLEAN.replace("inventory.log>=1", "bag.log>=1");
        let report = lint_content(&content(&json));
        assert_eq!(report.error_count(), 1);
        assert!(report.findings[0].origin.starts_with("locations.docks"));
    }
}
