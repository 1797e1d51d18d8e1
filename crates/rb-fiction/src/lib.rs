//! Riverbend's runtime: everything that turns content plus world state into
//! play.
//!
//! The [`Executor`] applies action strings to a [`rb_core::WorldState`],
//! the [`DialogueEngine`] walks NPC conversations, and the location filter
//! decides which location actions are on offer. [`GameSession`] ties these
//! together around one owned state and one content document.

/// Error types for the runtime.
pub mod error;
/// Action string execution.
pub mod executor;
/// Dialogue state machine.
pub mod dialogue;
/// Location action filtering.
pub mod location;
/// Static choice-tree preview.
pub mod preview;
/// Session façade and content loading.
pub mod session;

pub use dialogue::{DialogueEngine, DialogueView, HistoryLine, VisibleChoice};
pub use error::{ActionError, ActionResult, FictionError, FictionResult};
pub use executor::{Directive, Executor, Outcome, execute};
pub use location::{available_actions, perform_location_action};
pub use preview::{PreviewChoice, PreviewLimits, PreviewNode, preview_tree};
pub use session::{GameSession, load_content};
