//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags and their environment variables (passed in as [`ConfigOverrides`])
//! 2. Project config.kdl (`<project>/.todo/config.kdl`)
//! 3. System config.kdl (`~/.config/todo-cli/config.kdl`, or `$TODO_CONFIG_DIR/config.kdl`)
//! 4. `VISUAL` / `EDITOR` environment variables (editor only)
//! 5. Built-in defaults

use crate::config::{OutputFormat, TodoConfig};
use crate::current::DEFAULT_BRANCH_PREFIX;
use crate::storage::TODO_DIR;
use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "TODO_CONFIG_DIR";

/// File name of both config files.
pub const CONFIG_FILE_NAME: &str = "config.kdl";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from the project config.kdl
    Project,
    /// Value from the system config.kdl
    System,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::Project => write!(f, "project"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Editor command, if any source provides one
    pub editor: Option<Resolved<String>>,
    pub output_format: Resolved<OutputFormat>,
    pub branch_prefix: Resolved<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            editor: None,
            output_format: Resolved::new(OutputFormat::Human, ValueSource::Default),
            branch_prefix: Resolved::new(DEFAULT_BRANCH_PREFIX.to_string(), ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn editor(&self) -> Option<&str> {
        self.editor.as_ref().map(|r| r.value.as_str())
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format.value
    }

    pub fn branch_prefix(&self) -> &str {
        &self.branch_prefix.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub editor: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub branch_prefix: Option<String>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_branch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.branch_prefix = Some(prefix.into());
        self
    }
}

/// Locations of the two config files.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// System-wide config file, if a config directory could be determined
    pub system: Option<PathBuf>,
    /// Project config file
    pub project: PathBuf,
}

impl ConfigPaths {
    /// Standard locations for a project root.
    pub fn for_project(root: &Path) -> Self {
        let system_dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|d| d.join("todo-cli")));

        Self {
            system: system_dir.map(|d| d.join(CONFIG_FILE_NAME)),
            project: root.join(TODO_DIR).join(CONFIG_FILE_NAME),
        }
    }
}

/// Read a config file. A missing file yields an empty config.
pub fn read_config_file(path: &Path) -> Result<TodoConfig> {
    if !path.exists() {
        return Ok(TodoConfig::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let doc: KdlDocument = content
        .parse()
        .map_err(|e| Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

    let config = TodoConfig::from_kdl(&doc);
    config
        .validate()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(config)
}

/// Write a config file, creating its directory if needed.
pub fn write_config_file(path: &Path, config: &TodoConfig) -> Result<()> {
    config.validate().map_err(Error::Config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, config.to_kdl().to_string())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(
            path,
            fs::Permissions::from_mode(crate::config::CONFIG_FILE_MODE),
        )?;
    }

    tracing::debug!(path = %path.display(), "wrote config file");
    Ok(())
}

/// Resolve configuration with the full precedence chain.
///
/// `env` looks up environment variables; it is a parameter so tests do not
/// depend on the process environment.
pub fn resolve_config(
    paths: &ConfigPaths,
    overrides: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let mut result = ResolvedConfig::default();

    let system_config = match paths.system {
        Some(ref path) => read_config_file(path)?,
        None => TodoConfig::new(),
    };
    let project_config = read_config_file(&paths.project)?;

    // Resolve editor
    if let Some(ref editor) = overrides.editor {
        result.editor = Some(Resolved::new(editor.clone(), ValueSource::CliFlag));
    } else if let Some(ref editor) = project_config.editor {
        result.editor = Some(Resolved::new(editor.clone(), ValueSource::Project));
    } else if let Some(ref editor) = system_config.editor {
        result.editor = Some(Resolved::new(editor.clone(), ValueSource::System));
    } else {
        for var in ["VISUAL", "EDITOR"] {
            if let Some(value) = env(var).filter(|v| !v.trim().is_empty()) {
                result.editor = Some(Resolved::new(value, ValueSource::EnvVar(var.to_string())));
                break;
            }
        }
    }

    // Resolve output_format
    if let Some(ref format) = overrides.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::CliFlag);
    } else if let Some(ref format) = project_config.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::Project);
    } else if let Some(ref format) = system_config.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::System);
    }

    // Resolve branch_prefix
    if let Some(ref prefix) = overrides.branch_prefix {
        result.branch_prefix = Resolved::new(prefix.clone(), ValueSource::CliFlag);
    } else if let Some(ref prefix) = project_config.branch_prefix {
        result.branch_prefix = Resolved::new(prefix.clone(), ValueSource::Project);
    } else if let Some(ref prefix) = system_config.branch_prefix {
        result.branch_prefix = Resolved::new(prefix.clone(), ValueSource::System);
    }

    Ok(result)
}
