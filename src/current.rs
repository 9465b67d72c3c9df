//! Current-list state.
//!
//! The active list is derived from the checked-out branch: `feature/auth`
//! maps to the list `auth`, any other branch name maps to itself. Switching
//! lists checks out (or creates) the matching branch.

use crate::Result;
use crate::vcs::VersionControl;
use serde::Serialize;

/// Default prefix for list branches.
pub const DEFAULT_BRANCH_PREFIX: &str = "feature/";

/// The resolved list a command operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListContext {
    pub name: String,
}

impl ListContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How a switch was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchOutcome {
    /// The branch already existed and was checked out
    Existing,
    /// The branch was created and checked out
    Created,
}

/// Branch-backed current-list pointer.
pub struct CurrentList<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    prefix: String,
}

impl<'a, V: VersionControl + ?Sized> CurrentList<'a, V> {
    /// Create a resolver using `prefix` for list branches.
    pub fn new(vcs: &'a V, prefix: impl Into<String>) -> Self {
        Self {
            vcs,
            prefix: prefix.into(),
        }
    }

    /// Branch that backs the list `name`.
    pub fn branch_for(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// List name for a branch: the prefix is stripped when present.
    pub fn list_name_for_branch(&self, branch: &str) -> String {
        if self.prefix.is_empty() {
            return branch.to_string();
        }
        branch
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(branch)
            .to_string()
    }

    /// Resolve the active list from the checked-out branch.
    pub fn get_current(&self) -> Result<ListContext> {
        let branch = self.vcs.current_branch()?;
        let name = self.list_name_for_branch(&branch);
        tracing::debug!(branch = %branch, list = %name, "resolved current list");
        Ok(ListContext::new(name))
    }

    /// Whether `name` is the active list.
    ///
    /// Uses the same branch-to-list mapping as [`CurrentList::get_current`], so
    /// an unprefixed branch `main` makes the list `main` current.
    pub fn is_current(&self, name: &str) -> Result<bool> {
        Ok(self.get_current()?.name() == name)
    }

    /// Whether a branch exists for the list `name`.
    pub fn exists(&self, name: &str) -> Result<bool> {
        self.vcs.branch_exists(&self.branch_for(name))
    }

    /// Make `name` the active list, creating its branch if needed.
    pub fn set_current(&self, name: &str) -> Result<SwitchOutcome> {
        let branch = self.branch_for(name);
        if self.vcs.branch_exists(&branch)? {
            self.vcs.checkout_branch(&branch)?;
            tracing::info!(list = name, branch = %branch, "switched to existing list");
            Ok(SwitchOutcome::Existing)
        } else {
            self.vcs.create_branch(&branch)?;
            tracing::info!(list = name, branch = %branch, "created list branch");
            Ok(SwitchOutcome::Created)
        }
    }

    /// Remove the branch backing `name`.
    pub fn remove(&self, name: &str) -> Result<()> {
        self.vcs.delete_branch(&self.branch_for(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::test_utils::MemoryVcs;

    #[test]
    fn test_get_current_plain_branch() {
        let vcs = MemoryVcs::new();
        let current = CurrentList::new(&vcs, DEFAULT_BRANCH_PREFIX);
        assert_eq!(current.get_current().unwrap(), ListContext::new("main"));
    }

    #[test]
    fn test_get_current_strips_prefix() {
        let vcs = MemoryVcs::new();
        *vcs.head.borrow_mut() = "feature/auth".to_string();
        let current = CurrentList::new(&vcs, DEFAULT_BRANCH_PREFIX);
        assert_eq!(current.get_current().unwrap().name(), "auth");
    }

    #[test]
    fn test_get_current_outside_repository() {
        let vcs = MemoryVcs::outside_repository();
        let current = CurrentList::new(&vcs, DEFAULT_BRANCH_PREFIX);
        assert!(matches!(current.get_current(), Err(Error::NotARepository)));
    }

    #[test]
    fn test_custom_prefix() {
        let vcs = MemoryVcs::new();
        let current = CurrentList::new(&vcs, "todo/");
        assert_eq!(current.branch_for("x"), "todo/x");
        assert_eq!(current.list_name_for_branch("todo/x"), "x");
        assert_eq!(current.list_name_for_branch("feature/x"), "feature/x");
    }

    #[test]
    fn test_empty_prefix() {
        let vcs = MemoryVcs::new();
        let current = CurrentList::new(&vcs, "");
        assert_eq!(current.branch_for("x"), "x");
        assert_eq!(current.list_name_for_branch("x"), "x");
    }

    #[test]
    fn test_set_current_creates_then_switches() {
        let vcs = MemoryVcs::new();
        let current = CurrentList::new(&vcs, DEFAULT_BRANCH_PREFIX);

        assert_eq!(current.set_current("auth").unwrap(), SwitchOutcome::Created);
        assert_eq!(current.get_current().unwrap().name(), "auth");
        assert!(current.is_current("auth").unwrap());

        vcs.checkout_branch("main").unwrap();
        assert!(!current.is_current("auth").unwrap());

        assert_eq!(current.set_current("auth").unwrap(), SwitchOutcome::Existing);
        assert_eq!(current.get_current().unwrap().name(), "auth");
    }

    #[test]
    fn test_is_current_on_unprefixed_branch() {
        let vcs = MemoryVcs::new();
        let current = CurrentList::new(&vcs, DEFAULT_BRANCH_PREFIX);
        current.set_current("main").unwrap();
        vcs.checkout_branch("main").unwrap();

        assert!(current.is_current("main").unwrap());
        assert!(current.exists("main").unwrap());
    }

    #[test]
    fn test_remove_branch() {
        let vcs = MemoryVcs::new();
        let current = CurrentList::new(&vcs, DEFAULT_BRANCH_PREFIX);
        current.set_current("old").unwrap();
        vcs.checkout_branch("main").unwrap();

        current.remove("old").unwrap();
        assert!(!current.exists("old").unwrap());
    }
}
