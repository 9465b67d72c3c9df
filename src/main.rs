//! todo CLI - branch-specific todo lists stored as markdown files.

use clap::Parser;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use todo_cli::cli::{Cli, Commands, ConfigCommands};
use todo_cli::commands::{self, Context, Output};
use todo_cli::config::{
    ConfigOverrides, ConfigPaths, OutputFormat, Resolved, ResolvedConfig, ValueSource,
    resolve_config,
};
use todo_cli::logging;
use todo_cli::storage::ListStore;
use todo_cli::vcs::{GitCli, find_git_root};

fn main() {
    logging::init();
    let cli = Cli::parse();

    // Determine repo path: --repo flag > TODO_REPO env > auto-detect git root > cwd
    let repo_path = resolve_repo_path(cli.repo_path.clone(), cli.json);

    let mut overrides = ConfigOverrides::new();
    if let Some(ref editor) = cli.editor {
        overrides = overrides.with_editor(editor);
    }
    if let Some(ref prefix) = cli.branch_prefix {
        overrides = overrides.with_branch_prefix(prefix);
    }
    if cli.json {
        overrides = overrides.with_output_format(OutputFormat::Json);
    }

    let paths = ConfigPaths::for_project(&repo_path);
    let config = match resolve_config(&paths, &overrides, |var| env::var(var).ok()) {
        Ok(config) => config,
        // `config set` is how a broken file gets fixed
        Err(e) if is_config_set(&cli.command) => {
            tracing::warn!(error = %e, "ignoring unreadable config for config set");
            let mut config = ResolvedConfig::default();
            if cli.json {
                config.output_format = Resolved::new(OutputFormat::Json, ValueSource::CliFlag);
            }
            config
        }
        Err(e) => fail(&e.to_string(), cli.json),
    };
    let json = *config.output_format() == OutputFormat::Json;

    let git = GitCli::new(&repo_path);
    let ctx = Context::new(ListStore::new(&repo_path), &git, config);

    tracing::debug!(repo = %repo_path.display(), command = ?cli.command, "running command");
    let result = run_command(cli.command, &ctx, &paths, json);

    match result {
        Ok(()) => {}
        Err(todo_cli::Error::Cancelled) => {
            if json {
                println!("{}", serde_json::json!({ "cancelled": true }));
            } else {
                println!("Operation cancelled.");
            }
        }
        Err(e) => fail(&e.to_string(), json),
    }
}

fn is_config_set(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Config {
            command: ConfigCommands::Set { .. }
        }
    )
}

/// Report an error on stderr and exit with status 1.
fn fail(message: &str, json: bool) -> ! {
    if json {
        eprintln!("{}", serde_json::json!({ "error": message }));
    } else {
        eprintln!("Error: {}", message);
    }
    process::exit(1);
}

/// Resolve the repository path based on explicit flag, environment variable, or auto-detection.
///
/// An explicit path is used literally. Otherwise the git root of the current
/// directory is used so every subdirectory shares the same `.todo/`.
fn resolve_repo_path(explicit_path: Option<PathBuf>, json: bool) -> PathBuf {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                fail(
                    &format!("Specified repo path does not exist: {}", path.display()),
                    json,
                );
            }
            path
        }
        None => {
            let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            find_git_root(&cwd).unwrap_or(cwd)
        }
    }
}

fn run_command(
    command: Commands,
    ctx: &Context<'_, GitCli>,
    paths: &ConfigPaths,
    json: bool,
) -> Result<(), todo_cli::Error> {
    match command {
        Commands::Init => output(&commands::init(ctx)?, json),

        Commands::Add { text } => output(&commands::add(ctx, &text.join(" "))?, json),

        Commands::Check { item } => output(&commands::check(ctx, &item)?, json),

        Commands::Uncheck { item } => output(&commands::uncheck(ctx, &item)?, json),

        Commands::Progress { name, all } => output(&commands::progress(ctx, name, all)?, json),

        Commands::List { name, delete, yes } => {
            let mut confirm = |message: &str| {
                if yes {
                    Ok(true)
                } else {
                    prompt(message, json)
                }
            };

            match (name, delete) {
                (None, true) => {
                    return Err(todo_cli::Error::InvalidInput(
                        "--delete requires a list name".to_string(),
                    ));
                }
                (None, false) => output(&commands::list_all(ctx)?, json),
                (Some(name), true) => {
                    output(&commands::list_delete(ctx, &name, &mut confirm)?, json)
                }
                (Some(name), false) => {
                    output(&commands::list_switch(ctx, &name, &mut confirm)?, json)
                }
            }
        }

        Commands::History => output(&commands::history(ctx)?, json),

        Commands::Edit { name } => output(&commands::edit(ctx, name)?, json),

        Commands::Config { command } => match command {
            ConfigCommands::List => output(&commands::config_list(ctx), json),
            ConfigCommands::Get { key } => output(&commands::config_get(ctx, &key)?, json),
            ConfigCommands::Set { key, value, system } => {
                output(&commands::config_set(paths, &key, &value, system)?, json)
            }
        },

        Commands::Info => output(&commands::info(), json),

        Commands::Version => output(&commands::version(), json),
    }

    Ok(())
}

fn output<T: Output>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is a no.
///
/// In JSON mode the question goes to stderr so stdout stays parseable.
fn prompt(message: &str, json: bool) -> Result<bool, todo_cli::Error> {
    let question = format!("{} (y/N): ", message);
    if json {
        eprint!("{}", question);
        io::stderr().flush()?;
    } else {
        print!("{}", question);
        io::stdout().flush()?;
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(is_yes(&line))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
