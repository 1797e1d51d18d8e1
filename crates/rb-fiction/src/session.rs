//! Game session management.

use std::path::Path;

use rb_core::content::LocationAction;
use rb_core::{Content, WorldState};

use crate::dialogue::{DialogueEngine, DialogueView};
use crate::error::{FictionError, FictionResult};
use crate::executor::{Outcome, execute};
use crate::location::{available_actions, perform_location_action};
use crate::preview::{PreviewLimits, PreviewNode, preview_tree};

/// Read a content document and refuse it if linting finds errors.
pub fn load_content(path: &Path) -> FictionResult<Content> {
    let content = Content::from_path(path)?;
    let report = rb_dsl::lint_content(&content);
    if report.has_errors() {
        return Err(FictionError::InvalidContent {
            errors: report.error_count(),
            report: report.render(),
        });
    }
    if report.warning_count() > 0 {
        tracing::warn!(
            path = %path.display(),
            warnings = report.warning_count(),
            "content loaded with warnings"
        );
    }
    Ok(content)
}

/// One playthrough: a content document, the world it acts on, and the
/// conversation in progress.
pub struct GameSession {
    content: Content,
    state: WorldState,
    dialogue: DialogueEngine,
}

impl GameSession {
    /// Start a fresh game.
    pub fn new(content: Content) -> Self {
        let state = WorldState::new(&content.config);
        Self::with_state(content, state)
    }

    /// Resume from a saved state.
    pub fn with_state(content: Content, state: WorldState) -> Self {
        Self {
            content,
            state,
            dialogue: DialogueEngine::new(),
        }
    }

    /// Load and lint content from disk, then start a fresh game.
    pub fn load(path: &Path) -> FictionResult<Self> {
        Ok(Self::new(load_content(path)?))
    }

    /// The loaded content.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The world as it stands.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Direct access for loading saves and test setup.
    pub fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    /// Give up the session, keeping the state.
    pub fn into_state(self) -> WorldState {
        self.state
    }

    /// The conversation engine.
    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    /// Evaluate a condition against the current world.
    pub fn evaluate(&self, condition: &str) -> bool {
        rb_dsl::evaluate(condition, &self.state)
    }

    /// Run an action string.
    pub fn execute(&mut self, actions: &str) -> Outcome {
        execute(&mut self.state, &self.content, actions)
    }

    /// Talk to `npc`; see [`DialogueEngine::start`].
    pub fn start_dialogue(&mut self, npc: &str) -> Option<DialogueView> {
        self.dialogue.start(npc, &mut self.state, &self.content)
    }

    /// Pick the visible choice at `index`; see [`DialogueEngine::select`].
    pub fn select_response(&mut self, index: usize) -> Option<DialogueView> {
        self.dialogue.select(index, &mut self.state, &self.content)
    }

    /// Leave the current conversation.
    pub fn end_dialogue(&mut self) {
        self.dialogue.end();
    }

    /// The open conversation's node, or `None` when idle.
    pub fn current_view(&self) -> Option<DialogueView> {
        self.dialogue.current_view(&self.state, &self.content)
    }

    /// Location actions currently on offer.
    pub fn available_actions(&self, location: &str) -> Option<Vec<&LocationAction>> {
        available_actions(&self.content, location, &self.state)
    }

    /// Run a location action if it is on offer; `None` if nothing ran.
    pub fn perform_location_action(&mut self, location: &str, action_id: &str) -> Option<Outcome> {
        perform_location_action(&mut self.state, &self.content, location, action_id)
    }

    /// Choice tree of `dialogue`, within the configured depth and node budget.
    pub fn preview(&self, dialogue: &str) -> Option<PreviewNode> {
        preview_tree(
            &self.content,
            dialogue,
            &self.state,
            PreviewLimits::from_config(&self.content.config),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::WorldView;
    use std::io::Write;

    const CONTENT: &str = r#"{
        "jobs": { "job_dockhand": { "name": "Dockhand", "wage_copper": 30 } },
        "npcs": { "npc_boric": { "name": "Boric", "dialogue": "boric_main" } },
        "dialogues": {
            "boric_main": { "nodes": { "0": { "text": "Work?", "choices": [
                { "text": "Yes.", "condition": "job.job_dockhand==false",
                  "action": "hire_job:job_dockhand", "closes_dialogue": true }
            ] } } }
        },
        "locations": {
            "docks": { "name": "Docks", "actions": [
                { "id": "shift", "label": "Work a shift", "condition": "job.job_dockhand==true",
                  "action": "work_shift:job_dockhand|pass_time:480" }
            ] }
        },
        "config": { "max_carry_weight": 80.0 }
    }"#;

    fn write_content(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_and_play_through() {
        let file = write_content(CONTENT);
        let mut session = GameSession::load(file.path()).unwrap();
        assert_eq!(session.state().inventory.max_weight, 80.0);

        assert!(session.available_actions("docks").unwrap().is_empty());
        let view = session.start_dialogue("npc_boric").unwrap();
        assert_eq!(view.choices.len(), 1);
        assert!(session.select_response(0).is_none());
        assert!(session.evaluate("job.job_dockhand==true"));

        let outcome = session.perform_location_action("docks", "shift").unwrap();
        assert!(outcome.is_clean());
        assert_eq!(session.state().purse().total_copper(), 30);
        assert_eq!(session.state().clock.hour, 16);
    }

    #[test]
    fn lint_errors_refuse_content() {
        let bad = CONTENT.replace("job.job_dockhand==false", "job.job_dockhand==false || a.b==1");
        let file = write_content(&bad);
        match GameSession::load(file.path()) {
            Err(FictionError::InvalidContent { errors, report }) => {
                assert_eq!(errors, 1);
                assert!(report.contains("||"));
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("content with `||` should be refused"),
        }
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let file = write_content("{ not json");
        assert!(matches!(
            GameSession::load(file.path()),
            Err(FictionError::Load(_))
        ));
    }

    #[test]
    fn preview_uses_configured_depth() {
        let content = Content::from_json(CONTENT).unwrap();
        let session = GameSession::new(content);
        let tree = session.preview("boric_main").unwrap();
        assert_eq!(tree.node_count(), 1);
    }
}
