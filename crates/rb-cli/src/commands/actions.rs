use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use rb_fiction::GameSession;

pub fn run(
    location: &str,
    content: &Path,
    state: Option<&Path>,
    perform: Option<&str>,
    save: Option<&Path>,
) -> Result<(), String> {
    let content = super::load_content(content)?;
    let state = super::load_state(state, &content.config)?;
    let mut session = GameSession::with_state(content, state);

    if let Some(action_id) = perform {
        let outcome = session
            .perform_location_action(location, action_id)
            .ok_or_else(|| format!("`{action_id}` is not available at `{location}`"))?;
        super::print_outcome(&outcome);
        if let Some(path) = save {
            super::save_state(session.state(), path)?;
        }
        return Ok(());
    }

    let offered = session
        .available_actions(location)
        .ok_or_else(|| format!("unknown location `{location}`"))?;

    if offered.is_empty() {
        println!("  Nothing to do here right now.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Action"]);
    for action in &offered {
        table.add_row(vec![&action.id, &action.label]);
    }
    println!("{table}");
    println!();
    println!("  {} actions", offered.len());

    Ok(())
}
