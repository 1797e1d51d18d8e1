use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use rb_fiction::{DialogueView, GameSession};

pub fn run(
    npc: &str,
    content: &Path,
    state: Option<&Path>,
    choose: &[usize],
    save: Option<&Path>,
) -> Result<(), String> {
    let content = super::load_content(content)?;
    let state = super::load_state(state, &content.config)?;
    let mut session = GameSession::with_state(content, state);

    let view = session
        .start_dialogue(npc)
        .ok_or_else(|| format!("cannot talk to `{npc}`"))?;
    print_view(&session, &view);

    if choose.is_empty() {
        let stdin = io::stdin();
        prompt();
        for line in stdin.lock().lines() {
            let line = line.map_err(|e| e.to_string())?;
            let line = line.trim();
            if line.is_empty() || line == "q" {
                break;
            }
            match line.parse::<usize>() {
                Ok(pick) => {
                    if let Err(e) = pick_choice(&mut session, pick) {
                        println!("  {}", e.yellow());
                    }
                }
                Err(_) => println!("  {}", "enter a choice number, or q to leave".yellow()),
            }
            if !session.dialogue().is_active() {
                break;
            }
            prompt();
        }
    } else {
        for &pick in choose {
            if !session.dialogue().is_active() {
                return Err(format!("conversation already over before choice {pick}"));
            }
            pick_choice(&mut session, pick)?;
        }
    }

    if session.dialogue().is_active() {
        println!("  (conversation left open)");
        session.end_dialogue();
    } else {
        println!("  (conversation over)");
    }

    if let Some(path) = save {
        super::save_state(session.state(), path)?;
    }
    Ok(())
}

/// Pick a 1-based choice and print where it leads.
fn pick_choice(session: &mut GameSession, pick: usize) -> Result<(), String> {
    if pick == 0 {
        return Err("choices are numbered from 1".into());
    }
    match session.select_response(pick - 1) {
        Some(view) => print_view(session, &view),
        None if session.dialogue().is_active() => {
            return Err(format!("no choice {pick} here"));
        }
        None => {}
    }
    Ok(())
}

fn print_view(session: &GameSession, view: &DialogueView) {
    let speaker = view
        .speaker
        .clone()
        .or_else(|| session.content().npcs.get(&view.npc).map(|n| n.name.clone()))
        .unwrap_or_else(|| view.npc.clone());
    println!();
    println!("  {}: {}", speaker.bold(), view.text);
    for (i, choice) in view.choices.iter().enumerate() {
        println!("    {}. {}", i + 1, choice.text);
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
