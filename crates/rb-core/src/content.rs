//! Static content documents.
//!
//! Content is loaded once and only read afterwards. Cross references
//! (a choice's `next_node`, an NPC's dialogue id) are not validated here;
//! lookups that miss simply return `None`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::CoreResult;
use crate::inventory::ItemTraits;

/// Node every dialogue starts at.
pub const ROOT_NODE: &str = "0";

/// A quest definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    /// Display title.
    pub title: String,
    /// Ordered stage objectives.
    #[serde(default)]
    pub stages: Vec<String>,
}

impl QuestDef {
    /// Number of stages.
    pub fn stage_count(&self) -> u32 {
        self.stages.len() as u32
    }
}

/// A job definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDef {
    /// Display name.
    pub name: String,
    /// Copper paid per shift; engine default when absent.
    #[serde(default)]
    pub wage_copper: Option<u64>,
    /// Rehire cooldown after dismissal; engine default when absent.
    #[serde(default)]
    pub rehire_cooldown_days: Option<i64>,
}

/// An item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Display name.
    pub name: String,
    /// Weight of one unit.
    #[serde(default)]
    pub weight: f64,
    /// Whether identical units share a stack.
    #[serde(default = "default_true")]
    pub stackable: bool,
    /// Shop value in copper.
    #[serde(default)]
    pub value_copper: u64,
}

fn default_true() -> bool {
    true
}

/// A conditional replacement for an NPC's default dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOverride {
    /// Condition expression that selects this dialogue.
    pub condition: String,
    /// Dialogue id to use when the condition holds.
    pub dialogue: String,
}

/// An NPC definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    /// Display name.
    pub name: String,
    /// Default dialogue id.
    pub dialogue: String,
    /// Line spoken the first time the player talks to this NPC.
    #[serde(default)]
    pub greeting: Option<String>,
    /// Event-scoped dialogues, checked first.
    #[serde(default)]
    pub event_overrides: Vec<DialogueOverride>,
    /// Quest-state dialogues, checked after event overrides.
    #[serde(default)]
    pub quest_dialogues: Vec<DialogueOverride>,
}

/// A single selectable line in a dialogue node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueChoice {
    /// Text shown to the player.
    pub text: String,
    /// Visibility condition; absent means always visible.
    #[serde(default)]
    pub condition: Option<String>,
    /// Action string run on selection.
    #[serde(default, alias = "onSelect")]
    pub action: Option<String>,
    /// Node to move to after selection.
    #[serde(default)]
    pub next_node: Option<String>,
    /// End the conversation after selection.
    #[serde(default)]
    pub closes_dialogue: bool,
}

/// A dialogue node: a line of NPC text and the player's options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// NPC text.
    pub text: String,
    /// Player options.
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

/// A dialogue graph. May contain cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueDoc {
    /// Speaker name shown above the text.
    #[serde(default)]
    pub speaker: Option<String>,
    /// Nodes keyed by node id; the conversation starts at [`ROOT_NODE`].
    pub nodes: BTreeMap<String, DialogueNode>,
}

/// An action offered at a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAction {
    /// Identifier, unique within the location.
    pub id: String,
    /// Text shown to the player.
    pub label: String,
    /// Visibility condition; absent means always offered.
    #[serde(default)]
    pub condition: Option<String>,
    /// Action string run when chosen.
    #[serde(default)]
    pub action: Option<String>,
}

/// A location definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDef {
    /// Display name.
    pub name: String,
    /// Offered actions, in display order.
    #[serde(default)]
    pub actions: Vec<LocationAction>,
}

/// A replayed moment in time the player can step into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalInstanceDef {
    /// Location the player is placed at.
    pub location: String,
    /// Year.
    pub year: i64,
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-30.
    pub day_of_month: u32,
    /// Hour, 0-23.
    #[serde(default)]
    pub hour: u32,
    /// Minute, 0-59.
    #[serde(default)]
    pub minute: u32,
    /// Weather during the instance.
    #[serde(default)]
    pub weather: Option<String>,
}

/// Every content table, indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Quest titles and stage names.
    #[serde(default)]
    pub quests: BTreeMap<String, QuestDef>,
    /// Hireable jobs.
    #[serde(default)]
    pub jobs: BTreeMap<String, JobDef>,
    /// Item catalog.
    #[serde(default)]
    pub items: BTreeMap<String, ItemDef>,
    /// NPCs and which dialogue each one opens.
    #[serde(default)]
    pub npcs: BTreeMap<String, NpcDef>,
    /// Dialogue trees.
    #[serde(default)]
    pub dialogues: BTreeMap<String, DialogueDoc>,
    /// Locations and their actions.
    #[serde(default)]
    pub locations: BTreeMap<String, LocationDef>,
    /// Fixed moments in the past the player can step into.
    #[serde(default)]
    pub temporal_instances: BTreeMap<String, TemporalInstanceDef>,
    /// Engine tunables carried with the content.
    #[serde(default)]
    pub config: EngineConfig,
}

impl Content {
    /// Parse content from a JSON string.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse content from a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let content = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.display(),
            quests = content.quests.len(),
            dialogues = content.dialogues.len(),
            locations = content.locations.len(),
            "loaded content"
        );
        Ok(content)
    }

    /// Storage traits for an item; unknown items stack and weigh nothing.
    pub fn item_traits(&self, item: &str) -> ItemTraits {
        self.items
            .get(item)
            .map(|def| ItemTraits {
                stackable: def.stackable,
                weight: def.weight,
            })
            .unwrap_or_default()
    }

    /// Display name for an item, falling back to its id.
    pub fn item_name<'a>(&'a self, item: &'a str) -> &'a str {
        self.items.get(item).map_or(item, |def| def.name.as_str())
    }

    /// Look up a dialogue node.
    pub fn node(&self, dialogue: &str, node: &str) -> Option<&DialogueNode> {
        self.dialogues.get(dialogue)?.nodes.get(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "quests": { "q1": { "title": "Lost Ledger", "stages": ["find", "return"] } },
        "items": { "sword": { "name": "Sword", "weight": 3.5, "stackable": false } },
        "dialogues": {
            "boric_main": {
                "speaker": "Boric",
                "nodes": {
                    "0": {
                        "text": "What do you want?",
                        "choices": [
                            { "text": "Work?", "onSelect": "hire_job:job_dockhand", "closes_dialogue": true }
                        ]
                    }
                }
            }
        },
        "config": { "plank_cost_copper": 3 }
    }"#;

    #[test]
    fn parse_sample() {
        let content = Content::from_json(SAMPLE).unwrap();
        assert_eq!(content.quests["q1"].stage_count(), 2);
        assert_eq!(content.config.plank_cost_copper, 3);
        assert!(content.jobs.is_empty());
    }

    #[test]
    fn on_select_alias_maps_to_action() {
        let content = Content::from_json(SAMPLE).unwrap();
        let node = content.node("boric_main", ROOT_NODE).unwrap();
        assert_eq!(
            node.choices[0].action.as_deref(),
            Some("hire_job:job_dockhand")
        );
        assert!(node.choices[0].closes_dialogue);
    }

    #[test]
    fn item_traits_default_for_unknown() {
        let content = Content::from_json(SAMPLE).unwrap();
        assert!(!content.item_traits("sword").stackable);
        assert!(content.item_traits("pebble").stackable);
        assert_eq!(content.item_name("pebble"), "pebble");
        assert_eq!(content.item_name("sword"), "Sword");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Content::from_json("{ nope").is_err());
    }
}
