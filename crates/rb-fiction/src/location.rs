//! Location actions.

use rb_core::content::LocationAction;
use rb_core::{Content, WorldState, WorldView};
use rb_dsl::condition::evaluate_opt;

use crate::executor::{Outcome, execute};

/// Actions offered at `location` right now, in declared order.
///
/// `None` if the location does not exist.
pub fn available_actions<'c, V: WorldView + ?Sized>(
    content: &'c Content,
    location: &str,
    view: &V,
) -> Option<Vec<&'c LocationAction>> {
    let Some(def) = content.locations.get(location) else {
        tracing::warn!(location, "unknown location");
        return None;
    };
    Some(
        def.actions
            .iter()
            .filter(|action| evaluate_opt(action.condition.as_deref(), view))
            .collect(),
    )
}

/// Run the location action `action_id` if it is currently offered.
///
/// Visibility is checked again here, so a stale menu cannot run an action
/// whose condition stopped holding. `None` if nothing ran.
pub fn perform_location_action(
    state: &mut WorldState,
    content: &Content,
    location: &str,
    action_id: &str,
) -> Option<Outcome> {
    let offered = available_actions(content, location, &*state)?;
    let Some(action) = offered.into_iter().find(|a| a.id == action_id) else {
        tracing::warn!(location, action = action_id, "action not available here");
        return None;
    };
    Some(match &action.action {
        Some(actions) => execute(state, content, actions),
        None => Outcome::default(),
    })
}
