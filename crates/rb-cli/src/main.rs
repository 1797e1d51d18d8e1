//! CLI frontend for the Riverbend condition and action engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rb",
    about = "Riverbend: conditions, actions, and dialogue for narrative RPG content",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every condition and action string in a content file
    Lint {
        /// Content JSON file
        content: PathBuf,
    },

    /// Evaluate a condition against a saved world state
    Eval {
        /// Condition, e.g. `job.job_dockhand==true && currency.copper>=10`
        condition: String,

        /// Saved state (fresh world if omitted)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// List every check with the value it read
        #[arg(long)]
        explain: bool,
    },

    /// Run an action string against a world state
    Exec {
        /// Actions, e.g. `grant_item:log:5|start_quest:q_ledger`
        actions: String,

        /// Content JSON file
        #[arg(short, long)]
        content: PathBuf,

        /// Saved state (fresh world if omitted)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Write the resulting state here
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print a saved world state
    Show {
        /// Saved state file
        state: PathBuf,

        /// Print the raw JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Talk to an NPC
    Talk {
        /// NPC id
        npc: String,

        /// Content JSON file
        #[arg(short, long)]
        content: PathBuf,

        /// Saved state (fresh world if omitted)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Choices to pick, 1-based and comma-separated (reads stdin if omitted)
        #[arg(long, value_delimiter = ',')]
        choose: Vec<usize>,

        /// Write the resulting state here
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List, or perform, the actions offered at a location
    Actions {
        /// Location id
        location: String,

        /// Content JSON file
        #[arg(short, long)]
        content: PathBuf,

        /// Saved state (fresh world if omitted)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Perform the action with this id
        #[arg(long)]
        perform: Option<String>,

        /// Write the resulting state here
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print the full choice tree of a dialogue
    Preview {
        /// Dialogue id
        dialogue: String,

        /// Content JSON file
        #[arg(short, long)]
        content: PathBuf,

        /// Saved state used to mark hidden choices (fresh world if omitted)
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Maximum depth (defaults to the content's configured depth)
        #[arg(long)]
        depth: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Lint { content } => commands::lint::run(&content),
        Commands::Eval {
            condition,
            state,
            explain,
        } => commands::eval::run(&condition, state.as_deref(), explain),
        Commands::Exec {
            actions,
            content,
            state,
            save,
        } => commands::exec::run(&actions, &content, state.as_deref(), save.as_deref()),
        Commands::Show { state, json } => commands::show::run(&state, json),
        Commands::Talk {
            npc,
            content,
            state,
            choose,
            save,
        } => commands::talk::run(&npc, &content, state.as_deref(), &choose, save.as_deref()),
        Commands::Actions {
            location,
            content,
            state,
            perform,
            save,
        } => commands::actions::run(
            &location,
            &content,
            state.as_deref(),
            perform.as_deref(),
            save.as_deref(),
        ),
        Commands::Preview {
            dialogue,
            content,
            state,
            depth,
        } => commands::preview::run(&dialogue, &content, state.as_deref(), depth),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
