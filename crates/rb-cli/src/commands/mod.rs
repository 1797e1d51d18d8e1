pub mod actions;
pub mod eval;
pub mod exec;
pub mod lint;
pub mod preview;
pub mod show;
pub mod talk;

use std::fs;
use std::path::Path;

use colored::Colorize;
use rb_core::{Content, EngineConfig, WorldState};
use rb_fiction::{Directive, Outcome};

/// Load and lint a content file, refusing it on lint errors.
fn load_content(path: &Path) -> Result<Content, String> {
    rb_fiction::load_content(path).map_err(|e| format!("{}: {e}", path.display()))
}

/// Read a saved state, or start a fresh world from `config`.
fn load_state(path: Option<&Path>, config: &EngineConfig) -> Result<WorldState, String> {
    let Some(path) = path else {
        return Ok(WorldState::new(config));
    };
    let json = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    WorldState::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

fn save_state(state: &WorldState, path: &Path) -> Result<(), String> {
    let json = state.to_json().map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    println!("  Saved state to {}", path.display());
    Ok(())
}

/// Print what an action string did: directives, then refusals.
fn print_outcome(outcome: &Outcome) {
    println!(
        "  {} applied, {} rejected",
        outcome.applied,
        outcome.rejected.len()
    );
    for directive in &outcome.directives {
        let text = match directive {
            Directive::OpenShop(shop) => format!("open shop `{shop}`"),
            Directive::GotoNode(node) => format!("go to node `{node}`"),
            Directive::EndDialogue => "end dialogue".to_string(),
        };
        println!("  {} {text}", "->".cyan());
    }
    for error in &outcome.rejected {
        println!("  {} {error}", "x".red());
    }
}
