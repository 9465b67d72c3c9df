//! todo-cli - Branch-specific todo lists stored as markdown checkbox files.
//!
//! This library provides the core functionality for the `todo` CLI tool,
//! including the checkbox codec, list storage, item operations and the
//! branch-backed current-list state.

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod current;
pub mod editor;
pub mod items;
pub mod logging;
pub mod models;
pub mod storage;
pub mod vcs;


/// Library-level error type for todo operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid item ID: {0}")]
    InvalidId(String),

    #[error(
        "This directory is not set up for todo management. Run 'todo init' to initialize a todo-enabled git repository"
    )]
    NotARepository,

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("List '{0}' does not exist")]
    ListNotFound(String),

    #[error(
        "Cannot delete list '{0}' because you are currently on it. Switch to another list first (e.g., 'todo list main')"
    )]
    CurrentListDelete(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for todo operations.
pub type Result<T> = std::result::Result<T, Error>;
