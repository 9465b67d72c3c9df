//! Storage layer for todo lists.
//!
//! Each list is one markdown file under the project's todo directory:
//!
//! ```text
//! <project-root>/.todo/<list-name>.md
//! ```
//!
//! `ListStore` is the only component that touches list files. List names are
//! used verbatim as file stems; callers are responsible for keeping them
//! path-safe.

use crate::codec;
use crate::models::TodoList;
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the directory holding list files, relative to the project root.
pub const TODO_DIR: &str = ".todo";

/// Extension of list files.
const LIST_EXTENSION: &str = "md";

/// Permissions for the todo directory (Unix: 0755).
#[cfg(unix)]
pub const TODO_DIR_MODE: u32 = 0o755;

/// Permissions for list files (Unix: 0644).
#[cfg(unix)]
pub const LIST_FILE_MODE: u32 = 0o644;

/// Storage manager for the lists of a single project.
#[derive(Debug, Clone)]
pub struct ListStore {
    /// Project root the todo directory lives in
    root: PathBuf,
}

impl ListStore {
    /// Create a store for the given project root. Nothing is touched on disk.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Project root this store operates in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the todo directory.
    pub fn dir(&self) -> PathBuf {
        self.root.join(TODO_DIR)
    }

    /// Path of the file backing `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir().join(format!("{}.{}", name, LIST_EXTENSION))
    }

    /// Project-relative path of a list file, for user-facing messages.
    pub fn display_path(name: &str) -> String {
        format!("{}/{}.{}", TODO_DIR, name, LIST_EXTENSION)
    }

    /// Check whether a list file exists.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Create the todo directory if it does not exist.
    pub fn ensure_dir(&self) -> Result<()> {
        let dir = self.dir();
        if dir.is_dir() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(TODO_DIR_MODE);
        }
        builder.create(&dir).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to create {} directory: {}", TODO_DIR, e),
            ))
        })?;

        tracing::debug!(dir = %dir.display(), "created todo directory");
        Ok(())
    }

    /// Create an empty list file containing only the header.
    ///
    /// Returns `false` (and leaves the file alone) if the list already exists.
    pub fn create(&self, name: &str) -> Result<bool> {
        if self.exists(name) {
            return Ok(false);
        }

        self.ensure_dir()?;
        self.write_contents(name, &codec::serialize(name, &[]))?;
        tracing::info!(list = name, "created list file");
        Ok(true)
    }

    /// Names of all lists, sorted.
    ///
    /// Only regular `*.md` files count; a missing todo directory means no lists.
    pub fn enumerate(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(self.dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LIST_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Remove a list file. A missing file is not an error.
    ///
    /// Returns whether a file was actually removed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => {
                tracing::info!(list = name, "deleted list file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Read and parse a list. A missing file reads as an empty list.
    pub fn read(&self, name: &str) -> Result<TodoList> {
        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(list = name, "list file missing, treating as empty");
                return Ok(TodoList::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(TodoList::from_items(codec::parse(&content)))
    }

    /// Serialize and write a list, replacing the whole file.
    pub fn write(&self, name: &str, list: &TodoList) -> Result<()> {
        self.ensure_dir()?;
        self.write_contents(name, &codec::serialize(name, &list.items))?;
        tracing::debug!(list = name, items = list.len(), "wrote list file");
        Ok(())
    }

    /// Write through a temp file in the todo directory, then rename over the target.
    fn write_contents(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.path_for(name);
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        tmp.write_all(contents.as_bytes())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(LIST_FILE_MODE))?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}
