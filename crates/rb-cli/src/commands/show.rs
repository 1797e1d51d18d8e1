use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rb_core::{DiaryKind, WorldState};

pub fn run(path: &Path, json: bool) -> Result<(), String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let state = WorldState::from_json(&raw).map_err(|e| format!("{}: {e}", path.display()))?;

    if json {
        let out = serde_json::to_string_pretty(&state).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!("  {}", state.clock.to_string().bold());
    println!(
        "  {} ({}), weather: {}",
        state.clock.period().name(),
        state.clock.season.name(),
        if state.clock.weather.is_empty() {
            "-"
        } else {
            state.clock.weather.as_str()
        }
    );
    if let Some(location) = &state.location {
        println!("  at {location}");
    }
    if state.temporal_backup.is_some() {
        println!("  {}", "inside a temporal instance".yellow());
    }
    println!("  purse: {}", state.character.purse);
    println!();

    print_quests(&state);
    print_job(&state);
    print_inventory(&state);
    print_flags(&state);
    print_relationships(&state);
    print_diary(&state);

    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn print_quests(state: &WorldState) {
    let mut quests = state.quests.iter().peekable();
    if quests.peek().is_none() {
        return;
    }
    let mut table = new_table(vec!["Quest", "Stage", "Status"]);
    for (id, record) in quests {
        let status = if record.completed {
            "completed"
        } else if record.active {
            "active"
        } else {
            "inactive"
        };
        table.add_row(vec![
            id.to_string(),
            format!("{}/{}", record.current_stage, record.stage_count),
            status.to_string(),
        ]);
    }
    println!("{table}");
}

fn print_job(state: &WorldState) {
    if let Some(job) = state.employment.active() {
        println!(
            "  job: {} (performance {}, {} days worked)",
            job.job_id.bold(),
            job.performance,
            job.days_worked
        );
    }
    for (job, fired) in state.employment.fired_jobs() {
        println!(
            "  fired from {job}: {} (rehire from day {})",
            fired.reason, fired.rehired_from
        );
    }
}

fn print_inventory(state: &WorldState) {
    let inventory = &state.inventory;
    let mut items = inventory.item_ids().peekable();
    if items.peek().is_none() {
        return;
    }
    let mut table = new_table(vec!["Item", "Qty"]);
    for item in items {
        table.add_row(vec![item.to_string(), inventory.quantity(item).to_string()]);
    }
    println!("{table}");
    let weight = format!(
        "  carrying {:.1} / {:.1}",
        inventory.current_weight(),
        inventory.max_weight
    );
    if inventory.is_overloaded() {
        println!("{}", weight.red());
    } else {
        println!("{weight}");
    }
}

fn print_flags(state: &WorldState) {
    let set: Vec<&str> = state
        .flags
        .iter()
        .filter(|(_, value)| *value)
        .map(|(name, _)| name)
        .collect();
    if !set.is_empty() {
        println!("  flags: {}", set.join(", "));
    }
}

fn print_relationships(state: &WorldState) {
    let mut npcs = state.relationships.iter().peekable();
    if npcs.peek().is_none() {
        return;
    }
    let mut table = new_table(vec!["NPC", "Friendship", "Love", "Fear", "Obedience"]);
    for (npc, rel) in npcs {
        let bond = |b: Option<rb_core::Bond>| b.map_or("-".to_string(), |b| b.value.to_string());
        table.add_row(vec![
            npc.to_string(),
            rel.friendship.value.to_string(),
            bond(rel.love),
            bond(rel.fear),
            bond(rel.obedience),
        ]);
    }
    println!("{table}");
}

fn print_diary(state: &WorldState) {
    if state.diary.is_empty() {
        return;
    }
    println!();
    println!("  {}", "Diary".bold());
    for entry in state.diary.entries() {
        let line = format!("  day {:>4}  {}", entry.day, entry.text);
        match entry.kind {
            DiaryKind::Refusal => println!("{}", line.dimmed()),
            _ => println!("{line}"),
        }
    }
}
