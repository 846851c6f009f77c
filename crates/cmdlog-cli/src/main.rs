use clap::{Parser, Subcommand};

use cmdlog::commands;
use cmdlog::hook;

#[derive(Parser)]
#[command(name = "cmdlog", version, about = "Track AI command usage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one command-usage record
    Log {
        /// Command name, e.g. '/commit' or 'deep-research'
        command: String,
        /// Optional grouping label, e.g. 'git' or 'research'
        #[arg(long)]
        category: Option<String>,
        /// Optional free-text note about where/why it was used
        #[arg(long)]
        context: Option<String>,
    },
    /// Show recent usage history as JSON
    History {
        /// Max rows to return
        #[arg(long, default_value_t = 20)]
        limit: i64,
        /// Filter by command name (partial match)
        #[arg(long)]
        command: Option<String>,
        /// Filter by category (exact match)
        #[arg(long)]
        category: Option<String>,
    },
    /// Search history by keyword across command, category, and context
    Search {
        query: String,
        /// Max rows to return
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Show usage statistics
    Stats {
        /// How many top items to show per ranking
        #[arg(long, default_value_t = 10)]
        top_n: i64,
    },
    /// Delete a usage record by id
    Delete { id: i64 },
    /// Claude Code hook integration
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },
}

#[derive(Subcommand)]
enum HookAction {
    /// Handle a PostToolUse payload from stdin (never fails)
    Handle,
    /// Install the hook shim and register it in Claude Code settings
    Install {
        /// Register in the user-level settings instead of the project
        #[arg(long)]
        global: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let result = match cli.command {
        Commands::Log {
            command,
            category,
            context,
        } => commands::cmd_log(&command, category, context).await,
        Commands::History {
            limit,
            command,
            category,
        } => commands::cmd_history(limit, command, category).await,
        Commands::Search { query, limit } => commands::cmd_search(&query, limit).await,
        Commands::Stats { top_n } => commands::cmd_stats(top_n).await,
        Commands::Delete { id } => commands::cmd_delete(id).await,
        Commands::Hook { action } => match action {
            HookAction::Handle => {
                // A logging failure must never block the calling assistant.
                hook::handle().await;
                return 0;
            }
            HookAction::Install { global } => hook::install(global).map(|()| 0),
        },
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[cmdlog] error: {err:#}");
            1
        }
    }
}
