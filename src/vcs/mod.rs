//! Version-control integration.
//!
//! Lists are tied to git branches: switching lists checks out
//! `<prefix><list-name>`. Everything the rest of the crate needs from git goes
//! through the [`VersionControl`] trait so it can be replaced by an in-memory
//! double in tests.
//!
//! [`GitCli`] implements the trait by shelling out to the `git` binary in the
//! project root.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Operations the todo tool needs from a version-control system.
pub trait VersionControl {
    /// Whether the project root is inside a repository.
    fn is_repository(&self) -> bool;

    /// Whether the repository has at least one commit.
    fn has_commits(&self) -> bool;

    /// Initialize a repository and make sure it has an initial commit.
    fn init_repository(&self) -> Result<()>;

    /// Name of the checked-out branch, or a short hash when HEAD is detached.
    fn current_branch(&self) -> Result<String>;

    /// Check whether a local branch exists.
    fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// Create a branch from HEAD and check it out.
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Check out an existing branch.
    fn checkout_branch(&self, branch: &str) -> Result<()>;

    /// Force-delete a local branch.
    fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Whether the working tree has staged, unstaged or untracked changes.
    fn has_uncommitted_changes(&self) -> Result<bool>;
}

/// Find the top-level directory of the git repository containing `path`.
pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

/// Version control backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Path to the working tree.
    repo_path: PathBuf,
}

impl GitCli {
    /// Create a git backend operating in `repo_path`.
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    /// Run git with the given arguments and capture its output.
    fn git(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(?args, "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| Error::Git(format!("Failed to run git: {}", e)))
    }

    /// Run git and require success, mapping failures to a descriptive error.
    fn git_checked(&self, args: &[&str], action: &str) -> Result<Output> {
        let output = self.git(args)?;
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stderr.contains("not a git repository") {
            return Err(Error::NotARepository);
        }
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        Err(Error::Git(format!("failed to {}: {}", action, detail)))
    }

    fn succeeds(&self, args: &[&str]) -> bool {
        self.git(args)
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn ensure_repository(&self) -> Result<()> {
        if self.is_repository() {
            Ok(())
        } else {
            Err(Error::NotARepository)
        }
    }
}

impl VersionControl for GitCli {
    fn is_repository(&self) -> bool {
        self.succeeds(&["rev-parse", "--git-dir"])
    }

    fn has_commits(&self) -> bool {
        self.succeeds(&["rev-parse", "--verify", "--quiet", "HEAD"])
    }

    fn init_repository(&self) -> Result<()> {
        if !self.is_repository() {
            self.git_checked(&["init"], "initialize repository")?;
            tracing::info!(path = %self.repo_path.display(), "initialized git repository");
        }

        if !self.has_commits() {
            self.git_checked(
                &["commit", "--allow-empty", "-m", "Initial commit"],
                "create initial commit",
            )?;
            tracing::info!("created initial commit");
        }

        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        self.ensure_repository()?;

        let output = self.git(&["symbolic-ref", "--quiet", "--short", "HEAD"])?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        // Detached HEAD
        let output = self.git_checked(&["rev-parse", "--short=7", "HEAD"], "get HEAD")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        self.ensure_repository()?;
        let reference = format!("refs/heads/{}", branch);
        Ok(self.succeeds(&["rev-parse", "--verify", "--quiet", &reference]))
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.git_checked(
            &["checkout", "-b", branch],
            &format!("create branch {}", branch),
        )?;
        tracing::info!(branch, "created branch");
        Ok(())
    }

    fn checkout_branch(&self, branch: &str) -> Result<()> {
        if !self.branch_exists(branch)? {
            return Err(Error::Git(format!("branch {} does not exist", branch)));
        }
        self.git_checked(
            &["checkout", branch],
            &format!("switch to branch {}", branch),
        )?;
        tracing::info!(branch, "checked out branch");
        Ok(())
    }

    fn delete_branch(&self, branch: &str) -> Result<()> {
        self.git_checked(
            &["branch", "-D", branch],
            &format!("delete branch {}", branch),
        )?;
        tracing::info!(branch, "deleted branch");
        Ok(())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let output = self.git_checked(&["status", "--porcelain"], "check git status")?;
        Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;
    use tempfile::TempDir;

    fn git_available() -> bool {
        StdCommand::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Create a git repository with one commit in a temp directory.
    fn create_git_repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        let run = |args: &[&str]| {
            StdCommand::new("git")
                .args(args)
                .current_dir(temp.path())
                .output()
                .expect("Failed to run git");
        };
        run(&["init", "-b", "main"]);
        run(&["config", "user.email", "test@test.com"]);
        run(&["config", "user.name", "Test"]);
        run(&["commit", "--allow-empty", "-m", "Initial commit"]);
        temp
    }

    #[test]
    fn test_not_a_repository() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let git = GitCli::new(temp.path());
        // A temp dir could live inside some outer checkout; only assert when it does not.
        if find_git_root(temp.path()).is_none() {
            assert!(!git.is_repository());
            assert!(matches!(git.current_branch(), Err(Error::NotARepository)));
        }
    }

    #[test]
    fn test_branch_lifecycle() {
        if !git_available() {
            return;
        }
        let temp = create_git_repo();
        let git = GitCli::new(temp.path());

        assert!(git.is_repository());
        assert!(git.has_commits());
        assert_eq!(git.current_branch().unwrap(), "main");
        assert!(!git.branch_exists("feature/auth").unwrap());

        git.create_branch("feature/auth").unwrap();
        assert_eq!(git.current_branch().unwrap(), "feature/auth");
        assert!(git.branch_exists("feature/auth").unwrap());

        git.checkout_branch("main").unwrap();
        assert_eq!(git.current_branch().unwrap(), "main");

        git.delete_branch("feature/auth").unwrap();
        assert!(!git.branch_exists("feature/auth").unwrap());
    }

    #[test]
    fn test_checkout_missing_branch_fails() {
        if !git_available() {
            return;
        }
        let temp = create_git_repo();
        let git = GitCli::new(temp.path());
        assert!(matches!(
            git.checkout_branch("feature/nope"),
            Err(Error::Git(_))
        ));
    }

    #[test]
    fn test_uncommitted_changes() {
        if !git_available() {
            return;
        }
        let temp = create_git_repo();
        let git = GitCli::new(temp.path());
        assert!(!git.has_uncommitted_changes().unwrap());

        std::fs::write(temp.path().join("scratch.txt"), "dirty").unwrap();
        assert!(git.has_uncommitted_changes().unwrap());
    }

    #[test]
    fn test_find_git_root_from_subdirectory() {
        if !git_available() {
            return;
        }
        let temp = create_git_repo();
        let sub = temp.path().join("a").join("b");
        std::fs::create_dir_all(&sub).unwrap();

        let root = find_git_root(&sub).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }
}
