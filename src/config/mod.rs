//! Configuration for the todo CLI.
//!
//! Preferences live in KDL files at two levels:
//! - System: `~/.config/todo-cli/config.kdl` (or `$TODO_CONFIG_DIR/config.kdl`)
//! - Project: `<project>/.todo/config.kdl`
//!
//! Contains:
//! - `editor` - Editor command for `todo edit`
//! - `output-format` - "human" or "json"
//! - `branch-prefix` - Prefix of list branches (default `feature/`)
//!
//! ## Precedence
//!
//! CLI flag > project config > system config > environment (editor only) > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_DIR_ENV, ConfigOverrides, ConfigPaths, Resolved, ResolvedConfig, ValueSource,
    read_config_file, resolve_config, write_config_file,
};
#[cfg(unix)]
pub use schema::CONFIG_FILE_MODE;
pub use schema::{CONFIG_KEYS, OutputFormat, TodoConfig};
