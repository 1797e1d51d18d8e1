use std::path::Path;

use rb_fiction::{PreviewLimits, preview_tree};

pub fn run(
    dialogue: &str,
    content: &Path,
    state: Option<&Path>,
    depth: Option<usize>,
) -> Result<(), String> {
    let content = super::load_content(content)?;
    let state = super::load_state(state, &content.config)?;
    let mut limits = PreviewLimits::from_config(&content.config);
    if let Some(depth) = depth {
        limits = limits.with_depth(depth);
    }

    let tree = preview_tree(&content, dialogue, &state, limits)
        .ok_or_else(|| format!("unknown dialogue `{dialogue}`"))?;

    print!("{}", tree.render());
    println!();
    println!("  {} nodes expanded", tree.node_count());
    if tree.node_count() >= limits.max_nodes {
        println!(
            "  node budget of {} reached; raise `preview_node_limit` to see more",
            limits.max_nodes
        );
    }
    Ok(())
}
