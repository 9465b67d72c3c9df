//! CLI argument definitions for the todo tool.

use clap::{Parser, Subcommand};

/// todo - branch-specific todo lists stored as markdown files.
///
/// Each list lives in `.todo/<name>.md` and is tied to the git branch
/// `feature/<name>`. Start with `todo init`, then `todo list <name>`.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(author, version, about = "A CLI tool for managing branch-specific todo lists", long_about = None)]
pub struct Cli {
    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if todo was started in <path> instead of the current directory.
    /// The path must exist. Bypasses git root detection - uses the path literally.
    #[arg(short = 'C', long = "repo", global = true, env = "TODO_REPO")]
    pub repo_path: Option<std::path::PathBuf>,

    /// Editor command for `todo edit` (overrides config and $EDITOR)
    #[arg(long, global = true, env = "TODO_EDITOR")]
    pub editor: Option<String>,

    /// Prefix of the git branches backing lists (default: feature/)
    #[arg(long, global = true, env = "TODO_BRANCH_PREFIX")]
    pub branch_prefix: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new todo-enabled git repository
    Init,

    /// Add a todo item to the current branch's list
    Add {
        /// Item text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark a todo item as completed
    Check {
        /// Item number (1-based)
        item: String,
    },

    /// Mark a todo item as not completed
    Uncheck {
        /// Item number (1-based)
        item: String,
    },

    /// Show progress for current list, specific list, or all lists
    Progress {
        /// List to show (defaults to the current list)
        name: Option<String>,

        /// Show every list
        #[arg(short, long)]
        all: bool,
    },

    /// Show all lists or switch to/create/delete a specific list
    List {
        /// List to switch to (created if missing)
        name: Option<String>,

        /// Delete the specified list (branch and file)
        #[arg(short, long)]
        delete: bool,

        /// Answer yes to confirmation prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Show history of completed todos across all lists
    History,

    /// Open a list file in your editor
    Edit {
        /// List to edit (defaults to the current list)
        name: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Output comprehensive information about todo CLI for LLM assistants
    Info,

    /// Show the version of todo CLI
    Version,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show every setting with its effective value and source
    List,

    /// Show one setting
    Get {
        /// Setting name (editor, output-format, branch-prefix)
        key: String,
    },

    /// Change a setting in the project config (or the system config)
    Set {
        /// Setting name (editor, output-format, branch-prefix)
        key: String,

        /// New value
        value: String,

        /// Write to the system config instead of the project config
        #[arg(long)]
        system: bool,
    },
}
