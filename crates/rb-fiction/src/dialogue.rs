//! NPC conversations.
//!
//! The engine is either idle or sitting at one node of one dialogue. Choice
//! visibility is recomputed from the world every time a node is shown, so a
//! choice's action can reveal or hide options on the next render.

use rb_core::content::{DialogueChoice, DialogueNode, NpcDef, ROOT_NODE};
use rb_core::{Content, WorldState, WorldView};
use rb_dsl::condition::evaluate_opt;

use crate::executor::Executor;

/// Where the conversation is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialoguePhase {
    /// No conversation.
    #[default]
    Idle,
    /// Showing `node` of `dialogue`, spoken by `npc`.
    AtNode {
        /// NPC id.
        npc: String,
        /// Dialogue id, already resolved through the NPC's overrides.
        dialogue: String,
        /// Node id within the dialogue.
        node: String,
    },
}

/// A choice the player can currently pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleChoice {
    /// Position in the node's full choice list.
    pub source_index: usize,
    /// Text shown to the player.
    pub text: String,
}

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueView {
    /// NPC being talked to.
    pub npc: String,
    /// Dialogue being walked.
    pub dialogue: String,
    /// Current node id.
    pub node: String,
    /// NPC display name, when the NPC is in the catalog.
    pub speaker: Option<String>,
    /// Node text, with the greeting in front on a first meeting.
    pub text: String,
    /// Visible choices; the player picks by position in this list.
    pub choices: Vec<VisibleChoice>,
}

/// One exchange in the current conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    /// Node the reply was picked at.
    pub node: String,
    /// What the NPC said there.
    pub npc_text: String,
    /// Text of the choice the player picked.
    pub reply: String,
}

/// Which dialogue an NPC opens with right now.
///
/// Event overrides win over quest dialogues, which win over the default.
/// Within each list the first entry whose condition holds is used.
pub fn resolve_dialogue<'c, V: WorldView + ?Sized>(npc: &'c NpcDef, view: &V) -> &'c str {
    npc.event_overrides
        .iter()
        .chain(&npc.quest_dialogues)
        .find(|alt| rb_dsl::evaluate(&alt.condition, view))
        .map_or(npc.dialogue.as_str(), |alt| alt.dialogue.as_str())
}

/// Choices of `node` whose conditions hold, with their source positions.
pub fn visible_choices<'c, V: WorldView + ?Sized>(
    node: &'c DialogueNode,
    view: &V,
) -> Vec<(usize, &'c DialogueChoice)> {
    node.choices
        .iter()
        .enumerate()
        .filter(|(_, choice)| evaluate_opt(choice.condition.as_deref(), view))
        .collect()
}

/// Conversation state machine.
#[derive(Debug, Clone, Default)]
pub struct DialogueEngine {
    phase: DialoguePhase,
    history: Vec<HistoryLine>,
}

impl DialogueEngine {
    /// An idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the conversation is.
    pub fn phase(&self) -> &DialoguePhase {
        &self.phase
    }

    /// Whether a conversation is open.
    pub fn is_active(&self) -> bool {
        self.phase != DialoguePhase::Idle
    }

    /// Exchanges since the conversation started.
    pub fn history(&self) -> &[HistoryLine] {
        &self.history
    }

    /// Open a conversation with `npc_id` at the root node.
    ///
    /// On the first meeting the NPC's greeting, if any, is put in front of
    /// the root text. Returns `None` (and stays idle) if the NPC, its
    /// dialogue, or the root node is missing.
    pub fn start(
        &mut self,
        npc_id: &str,
        state: &mut WorldState,
        content: &Content,
    ) -> Option<DialogueView> {
        let Some(npc) = content.npcs.get(npc_id) else {
            tracing::warn!(npc = npc_id, "cannot start dialogue: unknown npc");
            return None;
        };
        let dialogue_id = resolve_dialogue(npc, &*state);
        if content.node(dialogue_id, ROOT_NODE).is_none() {
            tracing::warn!(
                npc = npc_id,
                dialogue = dialogue_id,
                "cannot start dialogue: dialogue or root node missing"
            );
            return None;
        }

        self.history.clear();
        self.phase = DialoguePhase::AtNode {
            npc: npc_id.to_string(),
            dialogue: dialogue_id.to_string(),
            node: ROOT_NODE.to_string(),
        };
        tracing::debug!(npc = npc_id, dialogue = dialogue_id, "dialogue started");

        let mut view = self.current_view(&*state, content)?;
        let first_meeting = state.meet_npc(npc_id);
        if first_meeting && let Some(greeting) = &npc.greeting {
            view.text = format!("{greeting}\n\n{}", view.text);
        }
        Some(view)
    }

    /// Pick the `index`-th visible choice at the current node.
    ///
    /// Runs the choice's action, records the exchange, then follows the
    /// choice: closing ends the conversation, otherwise `next_node` or a
    /// `goto_node` directive moves it, otherwise it stays put. Returns the
    /// new view, or `None` if the conversation is over or `index` is out of
    /// range (in which case nothing happens).
    pub fn select(
        &mut self,
        index: usize,
        state: &mut WorldState,
        content: &Content,
    ) -> Option<DialogueView> {
        let DialoguePhase::AtNode {
            npc,
            dialogue,
            node: node_id,
        } = self.phase.clone()
        else {
            tracing::warn!(index, "no conversation in progress");
            return None;
        };
        let Some(node) = content.node(&dialogue, &node_id) else {
            tracing::warn!(dialogue = %dialogue, node = %node_id, "current node vanished; ending dialogue");
            self.end();
            return None;
        };
        let visible = visible_choices(node, &*state);
        let Some(&(_, choice)) = visible.get(index) else {
            tracing::warn!(index, visible = visible.len(), "choice index out of range");
            return None;
        };

        let outcome = match &choice.action {
            Some(actions) => Executor::new(state, content).execute(actions),
            None => Default::default(),
        };
        self.history.push(HistoryLine {
            node: node_id.clone(),
            npc_text: node.text.clone(),
            reply: choice.text.clone(),
        });

        if choice.closes_dialogue || outcome.ends_dialogue() {
            self.end();
            return None;
        }

        let next = choice
            .next_node
            .as_deref()
            .or_else(|| outcome.goto_node())
            .unwrap_or(node_id.as_str())
            .to_string();
        if content.node(&dialogue, &next).is_none() {
            tracing::warn!(dialogue = %dialogue, node = %next, "next node missing; ending dialogue");
            self.end();
            return None;
        }
        self.phase = DialoguePhase::AtNode {
            npc,
            dialogue,
            node: next,
        };
        self.current_view(&*state, content)
    }

    /// Leave the conversation and forget its history.
    pub fn end(&mut self) {
        if self.is_active() {
            tracing::debug!("dialogue ended");
        }
        self.phase = DialoguePhase::Idle;
        self.history.clear();
    }

    /// Render the current node with fresh choice filtering.
    pub fn current_view<V: WorldView + ?Sized>(
        &self,
        view: &V,
        content: &Content,
    ) -> Option<DialogueView> {
        let DialoguePhase::AtNode {
            npc,
            dialogue,
            node,
        } = &self.phase
        else {
            return None;
        };
        let doc = content.dialogues.get(dialogue)?;
        let raw = doc.nodes.get(node)?;
        Some(DialogueView {
            npc: npc.clone(),
            dialogue: dialogue.clone(),
            node: node.clone(),
            speaker: doc.speaker.clone(),
            text: raw.text.clone(),
            choices: visible_choices(raw, view)
                .into_iter()
                .map(|(source_index, choice)| VisibleChoice {
                    source_index,
                    text: choice.text.clone(),
                })
                .collect(),
        })
    }
}
