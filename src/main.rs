//! # Weekplan
//!
//! A weekly task planner for the terminal: plan tasks on weekdays, filter
//! them by category, priority and completion, and follow your progress.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! weekplan
//! # or explicitly
//! weekplan ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `Left`/`Right` (`h`/`l`): Previous / next weekday
//! *   `Up`/`Down` (`k`/`j`): Move selection
//! *   `w`: Toggle weekend mode
//! *   `a`: Add a task to the selected day
//! *   `e`: Edit title
//! *   `Space`: Toggle done
//! *   `d`: Delete selected task
//! *   `x`: Clear completed tasks
//! *   `c` / `p` / `f`: Cycle category / priority / completion filter
//! *   `/`: Search
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! weekplan add "Buy groceries" --day saturday --category shopping --priority high
//! weekplan list --day saturday --pending
//! weekplan toggle <ID>
//! weekplan stats --weekend
//! weekplan export --output backup.json
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved to `weekday-app-tasks.json` in your local data directory
//! (`~/.local/share/weekplan/` on Linux). Override with `--db` or the
//! `WEEKPLAN_DB` environment variable.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use weekplan::commands::*;
use weekplan::models::{Category, FilterOptions, Priority, Weekday};
use weekplan::repository::TaskRepository;
use weekplan::storage::TaskStore;
use weekplan::tui::run_tui;

#[derive(Parser)]
#[command(name = "weekplan")]
#[command(about = "Weekly task planner for the terminal", long_about = None)]
struct Cli {
    /// Path to the tasks file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Weekday (monday..sunday), defaults to today
        #[arg(short = 'w', long)]
        day: Option<Weekday>,
        /// Category (work, personal, health, shopping, weekend-fun, family, hobbies, other)
        #[arg(short, long)]
        category: Option<Category>,
        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Longer description
        #[arg(short = 'D', long)]
        description: Option<String>,
        /// Due date in YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    List {
        /// Only tasks on this weekday
        #[arg(short = 'w', long)]
        day: Option<Weekday>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Only pending tasks
        #[arg(long, conflicts_with = "done")]
        pending: bool,
        /// Only completed tasks
        #[arg(long)]
        done: bool,
        /// Case-insensitive search in title and description
        #[arg(short, long)]
        search: Option<String>,
        /// Only weekend tasks
        #[arg(long)]
        weekend: bool,
    },
    /// Toggle a task between pending and done
    Toggle {
        id: String,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description (empty string clears it)
        #[arg(short = 'D', long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<Category>,
        #[arg(short, long)]
        priority: Option<Priority>,
        /// New weekday
        #[arg(short = 'w', long)]
        day: Option<Weekday>,
        /// New due date in YYYY-MM-DD (empty string clears it)
        #[arg(long)]
        due: Option<String>,
    },
    /// Remove all completed tasks
    ClearCompleted,
    /// Show completion statistics
    Stats {
        /// Weekday for the daily summary, defaults to today
        #[arg(short = 'w', long)]
        day: Option<Weekday>,
        /// Weekend mode
        #[arg(long)]
        weekend: bool,
    },
    /// Show the week with task counts and suggested categories
    Days {
        /// Weekend mode
        #[arg(long)]
        weekend: bool,
    },
    /// Export tasks as JSON
    Export {
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all tasks with the contents of a JSON export
    Import {
        file: PathBuf,
    },
    /// Reset the database (delete all tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn init_tracing(verbose: u8, quiet: u8) {
    let default_level = if quiet >= 2 {
        "off"
    } else if quiet == 1 {
        "error"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Some(Commands::Completions { shell }) = &cli.command {
        let shell_enum = match shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "powershell" => Shell::PowerShell,
            "elvish" => Shell::Elvish,
            _ => {
                eprintln!("Unsupported shell: {}", shell);
                return;
            }
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "weekplan", &mut io::stdout());
        return;
    }

    let store = cli.db.map(TaskStore::new).unwrap_or_else(TaskStore::from_env);
    debug!(path = %store.path().display(), "opening task store");
    if let Err(e) = store.create_parent_dir() {
        warn!(path = %store.path().display(), error = %e, "changes will not be saved");
    }
    let mut repo = TaskRepository::open(store);

    match cli.command {
        Some(Commands::Add { title, day, category, priority, description, due }) => {
            cmd_add(&mut repo, title, day, category, priority, description, due, false)
        }
        Some(Commands::List { day, category, priority, pending, done, search, weekend }) => {
            let completed = if pending { Some(false) } else if done { Some(true) } else { None };
            let options = FilterOptions {
                category,
                completed,
                priority,
                search_term: search,
                weekday: day,
                show_weekend_only: weekend.then_some(true),
            };
            cmd_list(&repo, &options)
        }
        Some(Commands::Toggle { id }) => cmd_toggle(&mut repo, &id, false),
        Some(Commands::Remove { id }) => cmd_remove(&mut repo, &id, false),
        Some(Commands::Edit { id, title, description, category, priority, day, due }) => {
            cmd_edit(&mut repo, &id, title, description, category, priority, day, due, false)
        }
        Some(Commands::ClearCompleted) => cmd_clear_completed(&mut repo, false),
        Some(Commands::Stats { day, weekend }) => cmd_stats(&repo, day, weekend),
        Some(Commands::Days { weekend }) => cmd_days(&repo, weekend),
        Some(Commands::Export { output }) => cmd_export(&repo, output.as_deref(), false),
        Some(Commands::Import { file }) => cmd_import(&mut repo, &file, false),
        Some(Commands::Reset { force }) => cmd_reset(&mut repo, force),
        Some(Commands::Completions { .. }) => {}
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(repo) {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
