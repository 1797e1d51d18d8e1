//! Static expansion of a dialogue graph into a choice tree.
//!
//! Used by authoring tools to see every path through a conversation. Each
//! branch carries its own set of visited nodes, so two sibling choices that
//! lead to the same node both expand it; only a node repeated on the same
//! path becomes a [`PreviewNode::Revisit`] leaf.
//!
//! Per-branch visited sets make densely linked dialogues grow factorially,
//! so expansion is bounded twice: by depth and by a total node budget
//! shared across the whole tree. Nodes past either bound become
//! [`PreviewNode::Truncated`] leaves.

use std::collections::HashSet;
use std::fmt::Write as _;

use rb_core::content::{DialogueDoc, ROOT_NODE};
use rb_core::{Content, EngineConfig, WorldView};
use rb_dsl::condition::evaluate_opt;

/// One node of the preview tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewNode {
    /// An expanded node with its choices.
    Node {
        /// Node id within the dialogue.
        id: String,
        /// NPC line.
        text: String,
        /// Every choice, visible or not.
        choices: Vec<PreviewChoice>,
    },
    /// The node already appears higher up on this path.
    Revisit(String),
    /// A `next_node` pointing at a node that does not exist.
    Missing(String),
    /// Expansion stopped at the depth cap or the node budget.
    Truncated(String),
}

/// One choice of a preview node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewChoice {
    /// Reply text.
    pub text: String,
    /// Raw condition string.
    pub condition: Option<String>,
    /// Raw action string.
    pub action: Option<String>,
    /// Whether the condition holds in the world the preview was taken from.
    pub visible: bool,
    /// Whether picking the choice ends the conversation.
    pub closes_dialogue: bool,
    /// Where the choice leads; `None` when it stays put or closes.
    pub next: Option<PreviewNode>,
}

/// Bounds on a preview expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLimits {
    /// Deepest level expanded; the root is depth 0.
    pub max_depth: usize,
    /// Total `Node`s expanded across the whole tree.
    pub max_nodes: usize,
}

impl PreviewLimits {
    /// Limits taken from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_depth: config.preview_depth,
            max_nodes: config.preview_node_limit,
        }
    }

    /// Same node budget, different depth cap.
    pub fn with_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl PreviewNode {
    /// Number of expanded `Node`s in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            PreviewNode::Node { choices, .. } => {
                1 + choices
                    .iter()
                    .filter_map(|c| c.next.as_ref())
                    .map(PreviewNode::node_count)
                    .sum::<usize>()
            }
            _ => 0,
        }
    }

    /// Whether any branch was cut short.
    pub fn is_truncated(&self) -> bool {
        match self {
            PreviewNode::Truncated(_) => true,
            PreviewNode::Node { choices, .. } => choices
                .iter()
                .filter_map(|c| c.next.as_ref())
                .any(PreviewNode::is_truncated),
            _ => false,
        }
    }

    /// Indented text rendering, one line per node and choice.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        match self {
            PreviewNode::Node { id, text, choices } => {
                let _ = writeln!(out, "{pad}[{id}] {text}");
                for choice in choices {
                    let mut marks = String::new();
                    if !choice.visible {
                        marks.push_str(" (hidden)");
                    }
                    if choice.closes_dialogue {
                        marks.push_str(" (closes)");
                    }
                    let _ = writeln!(out, "{pad}  > {}{marks}", choice.text);
                    if let Some(next) = &choice.next {
                        next.render_into(out, depth + 2);
                    }
                }
            }
            PreviewNode::Revisit(id) => {
                let _ = writeln!(out, "{pad}(back to [{id}])");
            }
            PreviewNode::Missing(id) => {
                let _ = writeln!(out, "{pad}(missing node [{id}])");
            }
            PreviewNode::Truncated(id) => {
                let _ = writeln!(out, "{pad}([{id}] not expanded)");
            }
        }
    }
}

/// Expand `dialogue` from its root node within `limits`.
///
/// Returns `None` for an unknown dialogue. Choice visibility is evaluated
/// against `view` but hidden choices are still expanded. Expansion is
/// depth-first, so once the node budget runs out the later branches are
/// the ones left truncated.
pub fn preview_tree<V: WorldView + ?Sized>(
    content: &Content,
    dialogue: &str,
    view: &V,
    limits: PreviewLimits,
) -> Option<PreviewNode> {
    let Some(doc) = content.dialogues.get(dialogue) else {
        tracing::warn!(dialogue, "cannot preview unknown dialogue");
        return None;
    };
    let mut expander = Expander {
        doc,
        view,
        limits,
        expanded: 0,
    };
    let tree = expander.expand(ROOT_NODE, &HashSet::new(), 0);
    if expander.expanded >= limits.max_nodes {
        tracing::debug!(dialogue, budget = limits.max_nodes, "preview node budget spent");
    }
    Some(tree)
}

struct Expander<'a, V: ?Sized> {
    doc: &'a DialogueDoc,
    view: &'a V,
    limits: PreviewLimits,
    expanded: usize,
}

impl<V: WorldView + ?Sized> Expander<'_, V> {
    fn expand(&mut self, node_id: &str, path: &HashSet<String>, depth: usize) -> PreviewNode {
        if path.contains(node_id) {
            return PreviewNode::Revisit(node_id.to_string());
        }
        let doc = self.doc;
        let Some(node) = doc.nodes.get(node_id) else {
            return PreviewNode::Missing(node_id.to_string());
        };
        if depth >= self.limits.max_depth || self.expanded >= self.limits.max_nodes {
            return PreviewNode::Truncated(node_id.to_string());
        }
        self.expanded += 1;

        let mut branch = path.clone();
        branch.insert(node_id.to_string());

        let mut choices = Vec::with_capacity(node.choices.len());
        for choice in &node.choices {
            let next = match (&choice.next_node, choice.closes_dialogue) {
                (Some(next), false) => Some(self.expand(next, &branch, depth + 1)),
                _ => None,
            };
            choices.push(PreviewChoice {
                text: choice.text.clone(),
                condition: choice.condition.clone(),
                action: choice.action.clone(),
                visible: evaluate_opt(choice.condition.as_deref(), self.view),
                closes_dialogue: choice.closes_dialogue,
                next,
            });
        }

        PreviewNode::Node {
            id: node_id.to_string(),
            text: node.text.clone(),
            choices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::{EngineConfig, WorldState};

    const CONTENT: &str = r#"{
        "dialogues": {
            "loop": { "nodes": {
                "0": { "text": "Root", "choices": [
                    { "text": "Left", "next_node": "a" },
                    { "text": "Right", "next_node": "b" },
                    { "text": "Secret", "condition": "world_flags.secret==true", "next_node": "a" },
                    { "text": "Leave", "closes_dialogue": true }
                ] },
                "a": { "text": "A", "choices": [
                    { "text": "Back", "next_node": "0" },
                    { "text": "On", "next_node": "c" }
                ] },
                "b": { "text": "B", "choices": [
                    { "text": "Across", "next_node": "a" },
                    { "text": "Void", "next_node": "zzz" }
                ] },
                "c": { "text": "C", "choices": [] }
            } }
        }
    }"#;

    fn setup() -> (Content, WorldState) {
        (
            Content::from_json(CONTENT).unwrap(),
            WorldState::new(&EngineConfig::default()),
        )
    }

    fn deep() -> PreviewLimits {
        PreviewLimits {
            max_depth: 32,
            max_nodes: 1000,
        }
    }

    /// A dialogue of `n` topic nodes, each linking to every other one.
    fn hub_content(n: usize) -> Content {
        let nodes: Vec<String> = (0..n)
            .map(|i| {
                let choices: Vec<String> = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| format!(r#"{{ "text": "Ask about {j}", "next_node": "{j}" }}"#))
                    .collect();
                format!(
                    r#""{i}": {{ "text": "Topic {i}", "choices": [{}] }}"#,
                    choices.join(",")
                )
            })
            .collect();
        let json = format!(
            r#"{{ "dialogues": {{ "hub": {{ "nodes": {{ {} }} }} }} }}"#,
            nodes.join(",")
        );
        Content::from_json(&json).unwrap()
    }

    fn choices(node: &PreviewNode) -> &[PreviewChoice] {
        match node {
            PreviewNode::Node { choices, .. } => choices,
            other => panic!("expected node, got {other:?}"),
        }
    }

    #[test]
    fn cycles_become_revisit_leaves() {
        let (content, state) = setup();
        let tree = preview_tree(&content, "loop", &state, deep()).unwrap();
        let left = choices(&tree)[0].next.as_ref().unwrap();
        let back = choices(left)[0].next.as_ref().unwrap();
        assert_eq!(*back, PreviewNode::Revisit("0".into()));
    }

    #[test]
    fn siblings_do_not_share_visited_nodes() {
        let (content, state) = setup();
        let tree = preview_tree(&content, "loop", &state, deep()).unwrap();
        // "a" is reached from root directly and again through "b"; both expand.
        let via_b = choices(&tree)[1].next.as_ref().unwrap();
        let across = choices(via_b)[0].next.as_ref().unwrap();
        assert!(matches!(across, PreviewNode::Node { id, .. } if id == "a"));
        let secret = choices(&tree)[2].next.as_ref().unwrap();
        assert!(matches!(secret, PreviewNode::Node { id, .. } if id == "a"));
    }

    #[test]
    fn hidden_choices_are_marked_but_expanded() {
        let (content, mut state) = setup();
        let tree = preview_tree(&content, "loop", &state, deep()).unwrap();
        assert!(!choices(&tree)[2].visible);
        assert!(choices(&tree)[2].next.is_some());

        state.flags.set("secret", true);
        let tree = preview_tree(&content, "loop", &state, deep()).unwrap();
        assert!(choices(&tree)[2].visible);
    }

    #[test]
    fn missing_and_closing() {
        let (content, state) = setup();
        let tree = preview_tree(&content, "loop", &state, deep()).unwrap();
        let via_b = choices(&tree)[1].next.as_ref().unwrap();
        assert_eq!(
            choices(via_b)[1].next,
            Some(PreviewNode::Missing("zzz".into()))
        );
        assert!(choices(&tree)[3].next.is_none());
        assert!(tree.render().contains("(closes)"));
    }

    #[test]
    fn depth_cap_truncates() {
        let (content, state) = setup();
        let tree = preview_tree(&content, "loop", &state, deep().with_depth(1)).unwrap();
        assert_eq!(
            choices(&tree)[0].next,
            Some(PreviewNode::Truncated("a".into()))
        );
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn unknown_dialogue() {
        let (content, state) = setup();
        assert!(preview_tree(&content, "nope", &state, deep()).is_none());
    }

    #[test]
    fn densely_linked_dialogue_stays_within_budget() {
        let content = hub_content(12);
        let state = WorldState::new(&content.config);
        let limits = PreviewLimits::from_config(&content.config);
        let tree = preview_tree(&content, "hub", &state, limits).unwrap();
        assert_eq!(tree.node_count(), content.config.preview_node_limit);
        assert!(tree.is_truncated());
        assert!(tree.render().contains("not expanded"));
    }

    #[test]
    fn small_dialogue_is_not_truncated() {
        let content = hub_content(3);
        let state = WorldState::new(&content.config);
        let tree = preview_tree(&content, "hub", &state, PreviewLimits::default()).unwrap();
        // 0 -> {1 -> 2, 2 -> 1}: five nodes, every other link is a revisit.
        assert_eq!(tree.node_count(), 5);
        assert!(!tree.is_truncated());
    }
}
