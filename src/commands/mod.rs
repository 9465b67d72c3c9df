//! Command implementations for the todo CLI.
//!
//! This module contains the business logic for each CLI command. Every command
//! returns a result value implementing [`Output`], which `main` renders as
//! JSON or as human-readable text.
//!
//! Commands receive a [`Context`] holding the list store, the version-control
//! collaborator and the resolved configuration; nothing here reads global
//! state.

use crate::config::{
    CONFIG_KEYS, ConfigPaths, ResolvedConfig, TodoConfig, read_config_file, write_config_file,
};
use crate::current::{CurrentList, ListContext, SwitchOutcome};
use crate::editor;
use crate::items;
use crate::models::{ListSummary, TodoItem, TodoList};
use crate::storage::ListStore;
use crate::vcs::VersionControl;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output: Serialize {
    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
    }

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Callback asking the user a yes/no question.
pub type Confirm<'c> = &'c mut dyn FnMut(&str) -> Result<bool>;

/// Everything a command needs to run.
pub struct Context<'a, V: VersionControl + ?Sized> {
    pub store: ListStore,
    pub vcs: &'a V,
    pub config: ResolvedConfig,
}

impl<'a, V: VersionControl + ?Sized> Context<'a, V> {
    pub fn new(store: ListStore, vcs: &'a V, config: ResolvedConfig) -> Self {
        Self { store, vcs, config }
    }

    /// Branch-backed current-list resolver using the configured prefix.
    pub fn current(&self) -> CurrentList<'a, V> {
        CurrentList::new(self.vcs, self.config.branch_prefix())
    }

    /// Fail unless the project is a git repository with at least one commit.
    pub fn require_setup(&self) -> Result<()> {
        if self.vcs.is_repository() && self.vcs.has_commits() {
            Ok(())
        } else {
            Err(Error::NotARepository)
        }
    }

    /// Resolve the list implied by the checked-out branch.
    pub fn resolve_current(&self) -> Result<ListContext> {
        let list = self.current().get_current()?;
        validate_list_name(list.name()).map_err(|_| {
            Error::InvalidInput(format!(
                "the current branch does not map to a list name ('{}'). Switch lists with 'todo list <name>'",
                list.name()
            ))
        })?;
        Ok(list)
    }

    /// Use `name` when given, otherwise the current list.
    fn resolve_named_or_current(&self, name: Option<String>) -> Result<ListContext> {
        match name {
            Some(name) => {
                validate_list_name(&name)?;
                Ok(ListContext::new(name))
            }
            None => self.resolve_current(),
        }
    }
}

/// Reject names that cannot serve as both a file stem and a branch suffix.
pub fn validate_list_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| -> Result<()> {
        Err(Error::InvalidInput(format!(
            "invalid list name '{}': {}",
            name, reason
        )))
    };

    if name.trim().is_empty() {
        return invalid("name cannot be empty");
    }
    if name.starts_with('.') || name.starts_with('-') {
        return invalid("name cannot start with '.' or '-'");
    }
    if name.contains(['/', '\\']) {
        return invalid("name cannot contain path separators");
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("name cannot contain whitespace");
    }
    Ok(())
}

// === Init ===

#[derive(Debug, Serialize)]
pub struct InitResult {
    /// False when the repository was already set up
    pub initialized: bool,
    pub path: PathBuf,
}

impl Output for InitResult {
    fn to_human(&self) -> String {
        if self.initialized {
            "✅ Todo repository initialized successfully!\nYou can now create todo lists with: todo list <name>".to_string()
        } else {
            "Todo repository already initialized.\nCreate or switch lists with: todo list <name>"
                .to_string()
        }
    }
}

/// Make the project a git repository with an initial commit and a todo directory.
pub fn init<V: VersionControl + ?Sized>(ctx: &Context<'_, V>) -> Result<InitResult> {
    let ready = ctx.vcs.is_repository() && ctx.vcs.has_commits() && ctx.store.dir().is_dir();

    ctx.vcs.init_repository()?;
    ctx.store.ensure_dir()?;

    Ok(InitResult {
        initialized: !ready,
        path: ctx.store.root().to_path_buf(),
    })
}

// === Add / check / uncheck ===

#[derive(Debug, Serialize)]
pub struct AddResult {
    pub list: String,
    pub item: TodoItem,
}

impl Output for AddResult {
    fn to_human(&self) -> String {
        format!(
            "Added todo item to list '{}': {}",
            self.list, self.item.text
        )
    }
}

/// Add an item to the current list.
pub fn add<V: VersionControl + ?Sized>(ctx: &Context<'_, V>, text: &str) -> Result<AddResult> {
    ctx.require_setup()?;
    let list = ctx.resolve_current()?;
    let item = items::add(&ctx.store, &list, text)?;
    Ok(AddResult {
        list: list.name,
        item,
    })
}

#[derive(Debug, Serialize)]
pub struct ItemUpdateResult {
    pub list: String,
    pub item: TodoItem,
}

impl Output for ItemUpdateResult {
    fn to_human(&self) -> String {
        let state = if self.item.completed {
            "completed"
        } else {
            "not completed"
        };
        format!(
            "Marked item {} as {} in list '{}'",
            self.item.id, state, self.list
        )
    }
}

/// Mark an item of the current list as completed.
pub fn check<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    item_number: &str,
) -> Result<ItemUpdateResult> {
    set_completed(ctx, item_number, true)
}

/// Mark an item of the current list as not completed.
pub fn uncheck<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    item_number: &str,
) -> Result<ItemUpdateResult> {
    set_completed(ctx, item_number, false)
}

fn set_completed<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    item_number: &str,
    value: bool,
) -> Result<ItemUpdateResult> {
    ctx.require_setup()?;
    let id = items::parse_item_id(item_number)?;
    let list = ctx.resolve_current()?;
    let item = items::set_completed(&ctx.store, &list, id, value)?;
    Ok(ItemUpdateResult {
        list: list.name,
        item,
    })
}

// === Progress ===

/// One list with all of its items.
#[derive(Debug, Serialize)]
pub struct ListView {
    pub name: String,
    pub items: Vec<TodoItem>,
    pub completed: usize,
    pub total: usize,
}

impl ListView {
    fn new(name: impl Into<String>, list: TodoList) -> Self {
        Self {
            name: name.into(),
            completed: list.completed_count(),
            total: list.len(),
            items: list.items,
        }
    }
}

impl Output for ListView {
    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return format!("No todos for list '{}'", self.name);
        }

        let mut out = format!("Todo list for '{}':\n\n", self.name);
        for item in &self.items {
            let status = if item.completed { "[x]" } else { "[ ]" };
            let _ = writeln!(out, "{}. {} {}", item.id, status, item.text);
        }
        let _ = write!(
            out,
            "\nProgress: {}/{} completed",
            self.completed, self.total
        );
        out
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProgressResult {
    Single(ListView),
    All { lists: Vec<ListView> },
}

impl Output for ProgressResult {
    fn to_human(&self) -> String {
        match self {
            ProgressResult::Single(view) => view.to_human(),
            ProgressResult::All { lists } if lists.is_empty() => "No lists found".to_string(),
            ProgressResult::All { lists } => lists
                .iter()
                .map(Output::to_human)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// Show progress for the current list, a named list, or all lists.
pub fn progress<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    name: Option<String>,
    all: bool,
) -> Result<ProgressResult> {
    ctx.require_setup()?;

    if all {
        if name.is_some() {
            return Err(Error::InvalidInput(
                "cannot use --all flag with a list name".to_string(),
            ));
        }
        let mut lists = Vec::new();
        for name in ctx.store.enumerate()? {
            let list = ctx.store.read(&name)?;
            lists.push(ListView::new(name, list));
        }
        return Ok(ProgressResult::All { lists });
    }

    let explicit = name.is_some();
    let list = ctx.resolve_named_or_current(name)?;
    if explicit && !ctx.store.exists(list.name()) {
        return Err(Error::ListNotFound(list.name));
    }

    let todo = ctx.store.read(list.name())?;
    Ok(ProgressResult::Single(ListView::new(list.name, todo)))
}

// === List ===

#[derive(Debug, Serialize)]
pub struct ListsOverview {
    /// Current list, when it can be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    pub lists: Vec<ListSummary>,
}

impl Output for ListsOverview {
    fn to_human(&self) -> String {
        if self.lists.is_empty() {
            return "No lists found".to_string();
        }

        let mut out = String::from("Lists:\n");
        for summary in &self.lists {
            let marker = if self.current.as_deref() == Some(summary.name.as_str()) {
                "*"
            } else {
                " "
            };
            if summary.total == 0 {
                let _ = write!(out, "\n{} {} - No todos", marker, summary.name);
            } else {
                let _ = write!(
                    out,
                    "\n{} {} - {}/{} completed ({}%)",
                    marker, summary.name, summary.completed, summary.total, summary.percent
                );
            }
        }
        out
    }
}

/// Summarize every list.
pub fn list_all<V: VersionControl + ?Sized>(ctx: &Context<'_, V>) -> Result<ListsOverview> {
    ctx.require_setup()?;

    let mut lists = Vec::new();
    for name in ctx.store.enumerate()? {
        let list = ctx.store.read(&name)?;
        lists.push(ListSummary::from_list(name, &list));
    }

    Ok(ListsOverview {
        current: ctx.resolve_current().ok().map(|l| l.name),
        lists,
    })
}

#[derive(Debug, Serialize)]
pub struct SwitchResult {
    pub list: String,
    pub outcome: SwitchOutcome,
    /// Whether the list file had to be created
    pub file_created: bool,
    pub view: ListView,
}

impl Output for SwitchResult {
    fn to_human(&self) -> String {
        let mut out = match self.outcome {
            SwitchOutcome::Existing => format!("Switched to existing list '{}'", self.list),
            SwitchOutcome::Created => format!("Created and switched to list '{}'", self.list),
        };
        if self.file_created {
            let _ = write!(
                out,
                "\nInitialized todo file: {}",
                ListStore::display_path(&self.list)
            );
        }
        let _ = write!(out, "\n\n{}", self.view.to_human());
        out
    }
}

/// Switch to a list, creating its branch and file when missing.
///
/// Uncommitted changes travel with the checkout, so the user is asked first.
pub fn list_switch<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    name: &str,
    confirm: Confirm<'_>,
) -> Result<SwitchResult> {
    ctx.require_setup()?;
    validate_list_name(name)?;

    if ctx.vcs.has_uncommitted_changes()? {
        let proceed = confirm(
            "⚠️  Warning: You have uncommitted changes that will be brought to the new branch.\nConsider committing or stashing your changes first.\nDo you want to continue?",
        )?;
        if !proceed {
            return Err(Error::Cancelled);
        }
    }

    let outcome = ctx.current().set_current(name)?;
    let file_created = ctx.store.create(name)?;
    let view = ListView::new(name, ctx.store.read(name)?);

    Ok(SwitchResult {
        list: name.to_string(),
        outcome,
        file_created,
        view,
    })
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub list: String,
    pub branch_deleted: bool,
    pub file_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Output for DeleteResult {
    fn to_human(&self) -> String {
        let mut out = String::new();
        if let Some(ref warning) = self.warning {
            let _ = writeln!(out, "Warning: {}", warning);
        }
        let _ = write!(out, "Successfully deleted list '{}'", self.list);
        out
    }
}

/// Delete a list's branch and file.
///
/// The current list can never be deleted; that check happens before anything
/// is touched.
pub fn list_delete<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    name: &str,
    confirm: Confirm<'_>,
) -> Result<DeleteResult> {
    ctx.require_setup()?;
    validate_list_name(name)?;

    let current = ctx.current();
    if current.is_current(name)? {
        return Err(Error::CurrentListDelete(name.to_string()));
    }
    if !current.exists(name)? {
        return Err(Error::ListNotFound(name.to_string()));
    }

    let proceed = confirm(&format!(
        "Are you sure you want to delete list '{}'? This will remove both the branch and todo file.",
        name
    ))?;
    if !proceed {
        return Err(Error::Cancelled);
    }

    current.remove(name)?;

    let (file_deleted, warning) = match ctx.store.delete(name) {
        Ok(deleted) => (deleted, None),
        Err(e) => {
            tracing::warn!(list = name, error = %e, "could not delete todo file");
            (false, Some(format!("Could not delete todo file: {}", e)))
        }
    };

    Ok(DeleteResult {
        list: name.to_string(),
        branch_deleted: true,
        file_deleted,
        warning,
    })
}

// === History ===

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub text: String,
    pub list: String,
    pub completed_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct HistoryResult {
    /// Newest first
    pub entries: Vec<HistoryEntry>,
}

impl Output for HistoryResult {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No completed todos found.".to_string();
        }

        let mut out = String::from("Completed Todo History:\n");
        let mut current_date = None;
        for entry in &self.entries {
            let date = entry.completed_at.date();
            if current_date != Some(date) {
                let _ = write!(out, "\n📅 {}\n", date.format("%A, %B %-d, %Y"));
                current_date = Some(date);
            }
            let _ = writeln!(
                out,
                "  ✅ {} [{}] ({})",
                entry.text,
                entry.list,
                entry.completed_at.format("%H:%M")
            );
        }
        out.trim_end().to_string()
    }
}

/// Collect completed items with timestamps across all lists, newest first.
pub fn history<V: VersionControl + ?Sized>(ctx: &Context<'_, V>) -> Result<HistoryResult> {
    ctx.require_setup()?;

    let mut entries = Vec::new();
    for name in ctx.store.enumerate()? {
        let list = match ctx.store.read(&name) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(list = %name, error = %e, "skipping unreadable list");
                continue;
            }
        };
        for item in list.items {
            if let (true, Some(at)) = (item.completed, item.completed_at) {
                entries.push(HistoryEntry {
                    text: item.text,
                    list: name.clone(),
                    completed_at: at,
                });
            }
        }
    }

    entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    Ok(HistoryResult { entries })
}

// === Edit ===

#[derive(Debug, Serialize)]
pub struct EditResult {
    pub list: String,
    pub path: PathBuf,
    pub file_created: bool,
    pub items: usize,
}

impl Output for EditResult {
    fn to_human(&self) -> String {
        format!(
            "Edited {} ({} items)",
            ListStore::display_path(&self.list),
            self.items
        )
    }
}

/// Open a list file in the configured editor, creating it first if needed.
///
/// Nothing is written when no editor is configured.
pub fn edit<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    name: Option<String>,
) -> Result<EditResult> {
    ctx.require_setup()?;
    let list = ctx.resolve_named_or_current(name)?;

    let editor = editor::require_editor(ctx.config.editor())?;

    let file_created = ctx.store.create(list.name())?;
    let path = ctx.store.path_for(list.name());
    editor::open_in_editor(Some(editor), &path)?;

    let items = ctx.store.read(list.name())?.len();
    Ok(EditResult {
        list: list.name,
        path,
        file_created,
        items,
    })
}

// === Config ===

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub source: String,
}

impl Output for ConfigEntry {
    fn to_human(&self) -> String {
        match self.value {
            Some(ref value) => value.clone(),
            None => format!("{} is not set", self.key),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigListResult {
    pub entries: Vec<ConfigEntry>,
}

impl Output for ConfigListResult {
    fn to_human(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{} = {} ({})",
                    e.key,
                    e.value.as_deref().unwrap_or("<unset>"),
                    e.source
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Show the effective value and source of every config key.
pub fn config_list<V: VersionControl + ?Sized>(ctx: &Context<'_, V>) -> ConfigListResult {
    let config = &ctx.config;
    let editor = config.editor.as_ref();
    ConfigListResult {
        entries: vec![
            ConfigEntry {
                key: "editor".to_string(),
                value: editor.map(|r| r.value.clone()),
                source: editor
                    .map(|r| r.source.to_string())
                    .unwrap_or_else(|| "unset".to_string()),
            },
            ConfigEntry {
                key: "output-format".to_string(),
                value: Some(config.output_format().to_string()),
                source: config.output_format.source.to_string(),
            },
            ConfigEntry {
                key: "branch-prefix".to_string(),
                value: Some(config.branch_prefix().to_string()),
                source: config.branch_prefix.source.to_string(),
            },
        ],
    }
}

/// Show the effective value of one config key.
pub fn config_get<V: VersionControl + ?Sized>(
    ctx: &Context<'_, V>,
    key: &str,
) -> Result<ConfigEntry> {
    validate_config_key(key)?;
    config_list(ctx)
        .entries
        .into_iter()
        .find(|entry| entry.key == key)
        .ok_or_else(|| Error::Config(format!("unknown config key '{}'", key)))
}

#[derive(Debug, Serialize)]
pub struct ConfigSetResult {
    pub key: String,
    pub value: String,
    pub path: PathBuf,
    /// The previous file could not be parsed and was replaced
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub replaced_invalid: bool,
}

impl Output for ConfigSetResult {
    fn to_human(&self) -> String {
        let mut out = format!("Set {} = {} in {}", self.key, self.value, self.path.display());
        if self.replaced_invalid {
            out.push_str("\nWarning: the previous file could not be parsed and was replaced");
        }
        out
    }
}

/// Write one key to the project (or system) config file.
pub fn config_set(
    paths: &ConfigPaths,
    key: &str,
    value: &str,
    system: bool,
) -> Result<ConfigSetResult> {
    let path = if system {
        paths
            .system
            .clone()
            .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?
    } else {
        paths.project.clone()
    };

    validate_config_key(key)?;

    // An unparseable file is replaced so `config set` can repair it.
    let (mut config, replaced_invalid) = match read_config_file(&path) {
        Ok(config) => (config, false),
        Err(Error::Config(reason)) if path.is_file() => {
            tracing::warn!(path = %path.display(), %reason, "replacing unreadable config file");
            (TodoConfig::new(), true)
        }
        Err(e) => return Err(e),
    };
    config.set(key, value).map_err(Error::Config)?;
    write_config_file(&path, &config)?;

    Ok(ConfigSetResult {
        key: key.to_string(),
        value: value.to_string(),
        path,
        replaced_invalid,
    })
}

/// Validate a config key name.
pub fn validate_config_key(key: &str) -> Result<()> {
    if CONFIG_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "unknown config key '{}' (expected one of: {})",
            key,
            CONFIG_KEYS.join(", ")
        )))
    }
}

// === Info / version ===

#[derive(Debug, Serialize)]
pub struct InfoResult {
    pub guide: String,
}

impl Output for InfoResult {
    fn to_human(&self) -> String {
        self.guide.clone()
    }
}

/// Usage guide aimed at assistants driving the CLI.
pub fn info() -> InfoResult {
    InfoResult {
        guide: INFO_GUIDE.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct VersionResult {
    pub version: String,
    pub commit: String,
    pub built: String,
}

impl Output for VersionResult {
    fn to_human(&self) -> String {
        format!(
            "todo CLI v{} ({}, built {})",
            self.version, self.commit, self.built
        )
    }
}

pub fn version() -> VersionResult {
    VersionResult {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("TODO_GIT_COMMIT").to_string(),
        built: env!("TODO_BUILD_TIMESTAMP").to_string(),
    }
}

const INFO_GUIDE: &str = r#"# Todo CLI - LLM Assistant Guide

## Overview
A git-integrated CLI for branch-specific todo lists. Each list is tied to a git
branch and stored as a markdown file.

## Core Concepts
- **Lists**: each list corresponds to a branch named <branch-prefix><list-name> (default prefix: feature/)
- **Storage**: items live in .todo/<list-name>.md
- **Branch integration**: switching lists switches branches
- **Safety**: warns about uncommitted changes before switching

## Commands
- `todo init` - make the directory a git repository ready for todo lists
- `todo list` - show all lists with progress percentages (current list marked with *)
- `todo list <name>` - switch to or create a list (creates the branch and file)
- `todo list --delete <name>` - delete a list's branch and file (asks for confirmation; -y skips)
- `todo add "<text>"` - add an item to the current list
- `todo check <number>` / `todo uncheck <number>` - toggle an item (1-based numbers)
- `todo progress [name]` - show a list; `--all` shows every list
- `todo history` - completed items across all lists, newest first
- `todo edit [name]` - open a list file in $EDITOR
- `todo config list|get|set` - inspect or change preferences
- `todo version` - show the CLI version
- Add `--json` to any command for machine-readable output

## File Format
```
# Todo List for feature-name

- [ ] Incomplete task
- [x] Completed task (completed: 2024-01-15 10:30)
```
Item numbers are positions in the file and change if the file is reordered.
Lines that are not checkbox items are dropped when the tool rewrites a file.

## Common Workflows
1. `todo list feature-name` (creates branch + todo file)
2. `todo add "First task"`, `todo add "Second task"`
3. `todo check 1` as work completes
4. `todo progress` to review, `todo list` for the overview
5. `todo list --delete finished-feature` to clean up (switch away first)

## Errors
- Outside a git repository with commits: run `todo init`
- The current list cannot be deleted
- Item numbers must be within the list"#;
