//! Common test utilities for todo CLI integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never touch the
//! user's git config or `~/.config/todo-cli/`.

#![allow(dead_code)]

use assert_cmd::Command;
use std::process::Command as StdCommand;
pub use tempfile::TempDir;

/// A test environment with an isolated repository and config directory.
///
/// Each `TestEnv` creates two temporary directories:
/// - `repo_dir`: Acts as the project root (a git repository once initialized)
/// - `config_dir`: Holds the system config (via `TODO_CONFIG_DIR` env var)
///
/// The `todo()` method returns a `Command` that sets the environment
/// per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub repo_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            repo_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a new test environment and run `todo init` in it.
    pub fn init() -> Self {
        let env = Self::new();
        env.todo().arg("init").assert().success();
        env
    }

    /// Get a Command for the todo binary with isolated git and config state.
    pub fn todo(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_todo"));
        cmd.current_dir(self.repo_dir.path());
        cmd.env("TODO_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("TODO_REPO");
        cmd.env_remove("TODO_EDITOR");
        cmd.env_remove("TODO_BRANCH_PREFIX");
        cmd.env_remove("TODO_LOG");
        cmd.env_remove("VISUAL");
        cmd.env_remove("EDITOR");
        isolate_git(&mut cmd, self.repo_dir.path());
        cmd
    }

    /// Run a raw git command in the repository and return its stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let mut cmd = StdCommand::new("git");
        cmd.args(args).current_dir(self.repo_dir.path());
        isolate_git_std(&mut cmd, self.repo_dir.path());
        let output = cmd.output().expect("Failed to run git");
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Name of the checked-out branch.
    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Get the path to the repo directory.
    pub fn path(&self) -> &std::path::Path {
        self.repo_dir.path()
    }

    /// Path of a list file inside the repo.
    pub fn list_path(&self, name: &str) -> std::path::PathBuf {
        self.repo_dir.path().join(".todo").join(format!("{}.md", name))
    }

    /// Get the path to the config directory.
    pub fn config_path(&self) -> &std::path::Path {
        self.config_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// True when a `git` binary is on PATH. Tests needing git skip otherwise.
pub fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

const GIT_ENV: [(&str, &str); 6] = [
    ("GIT_AUTHOR_NAME", "Todo Test"),
    ("GIT_AUTHOR_EMAIL", "todo@test.invalid"),
    ("GIT_COMMITTER_NAME", "Todo Test"),
    ("GIT_COMMITTER_EMAIL", "todo@test.invalid"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
];

fn ceiling(repo: &std::path::Path) -> std::path::PathBuf {
    repo.parent().unwrap_or(repo).to_path_buf()
}

fn isolate_git(cmd: &mut Command, repo: &std::path::Path) {
    for (key, value) in GIT_ENV {
        cmd.env(key, value);
    }
    cmd.env("GIT_CEILING_DIRECTORIES", ceiling(repo));
}

fn isolate_git_std(cmd: &mut StdCommand, repo: &std::path::Path) {
    for (key, value) in GIT_ENV {
        cmd.env(key, value);
    }
    cmd.env("GIT_CEILING_DIRECTORIES", ceiling(repo));
}
